//! Shared infrastructure for the tokenkeep crates

#![forbid(unsafe_code)]

pub mod logging;

pub use logging::LoggingTransformer;
