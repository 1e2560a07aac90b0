//! Controllers
//!
//! The two debounced request flows: search and meal calculation.

pub mod calculation;
pub mod debounce;
pub mod search;
pub mod sink;

pub use calculation::{CalculationController, CalculationEvent, CalculationStatus, CalculationUpdate};
pub use debounce::{Debouncer, RequestFence, RequestToken, DEFAULT_DEBOUNCE};
pub use search::{SearchController, SearchEvent, SearchUpdate};
pub use sink::EventSink;
