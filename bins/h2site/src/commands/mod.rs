//! CLI command implementations

pub mod analyze;
pub mod assets;
pub mod classify;
pub mod geocode;
pub mod health;
pub mod nearby;
pub mod reports;
pub mod score;
pub mod summarize;
