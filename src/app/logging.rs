//! Progress logging utilities.

use log::info;

/// Logs indexing progress with a rough throughput figure.
///
/// # Arguments
///
/// * `start_time` - When the pipeline started
/// * `indexed` - Documents indexed so far
pub fn log_progress(start_time: std::time::Instant, indexed: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        indexed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Indexed {} documents in {:.2} seconds (~{:.2} docs/sec)",
        indexed, elapsed_secs, rate
    );
}
