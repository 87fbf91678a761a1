//! Application initialization.
//!
//! Logger setup with custom formatting, shared by the binary and by tests
//! that want readable output.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
