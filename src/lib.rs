//! Nutrilin Library
//!
//! Food search and meal composition against the remote nutrition services.

pub mod api;
pub mod build_info;
pub mod config;
pub mod controllers;
pub mod models;
pub mod session;
pub mod view;
