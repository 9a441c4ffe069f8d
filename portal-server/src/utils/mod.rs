//! Utilities: logging and clinic time zone helpers

pub mod logger;
pub mod time;
