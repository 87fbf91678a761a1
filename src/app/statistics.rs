//! End-of-run statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{IngestStats, RejectionKind};
use crate::pipeline::IndexReport;

/// Prints per-category rejection counts to the log.
///
/// Stays silent when nothing was rejected.
pub fn print_rejection_statistics(stats: &IngestStats) {
    let total = stats.total_rejected();
    if total == 0 {
        return;
    }
    info!("Rejection Counts ({} total):", total);
    for kind in RejectionKind::iter() {
        let count = stats.rejected(kind);
        if count > 0 {
            info!("   {}: {}", kind.as_str(), count);
        }
    }
}

/// Prints a simple one-line summary of the run.
///
/// This provides immediate feedback to the user in a concise format.
/// Works with both plain and JSON log formats (log::info! handles formatting).
pub fn print_run_summary(report: &IndexReport) {
    info!(
        "✅ Indexed {} document{} ({} parsed, {} rejected) with {} workers in {:.1}s",
        report.documents_indexed,
        if report.documents_indexed == 1 { "" } else { "s" },
        report.records_parsed,
        report.records_rejected,
        report.workers,
        report.elapsed_seconds
    );
}
