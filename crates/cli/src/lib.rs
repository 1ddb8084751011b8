//! Terminal output helpers for the h2site tools
//!
//! - Status lines and headers
//! - Distance, score and duration formatting
//! - Spinners for network calls

#![warn(missing_docs)]

pub mod output;
pub mod progress;
