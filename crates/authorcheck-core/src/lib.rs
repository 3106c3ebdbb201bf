//! authorcheck Core
//!
//! Core types and error handling shared across the authorcheck crates.
//!
//! This crate provides:
//! - The error type and `Result` alias used by every library crate
//! - Request and ranked-score types exchanged between the classifier and
//!   the interaction layer

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassificationRequest, LabelScore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationRequest, LabelScore};
}
