//! Nutrition service API
//!
//! HTTP access to the remote search and calculation services.

pub mod client;

pub use client::{ApiError, ApiResult, HttpNutritionApi, NutritionApi, DEFAULT_API_URL};
