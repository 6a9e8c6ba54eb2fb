//! Utilities shared across the Kanvas packages.
//!
//! - `logger`: tracing subscriber setup
//! - `time`: wall-clock helpers and the `Clock` abstraction

pub mod logger;
pub mod time;
