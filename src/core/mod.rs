//! Core conversion logic: records, selection, ratios and refresh transitions

pub mod config;
pub mod currency;
pub mod log;
pub mod ratio;
pub mod refresh;
pub mod selection;

// Re-export main types for cleaner imports
pub use currency::{CurrencyRecord, CurrencySource};
pub use ratio::calculate_result;
pub use refresh::{AppState, RefreshOutcome};
pub use selection::{SelectionState, Side};
