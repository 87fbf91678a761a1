//! Application-level utilities.
//!
//! Progress logging, shutdown wiring, and end-of-run statistics printing
//! used by the binary entry point.

pub mod logging;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use logging::log_progress;
pub use shutdown::cancel_on_ctrl_c;
pub use statistics::{print_rejection_statistics, print_run_summary};
