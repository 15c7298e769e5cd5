//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `http`: reqwest client posting scan summaries to the history endpoint
//! - `sanitize`: patient data filtering for logs

pub mod http;
pub mod sanitize;

pub use http::{HistoryError, HttpHistorySink};
