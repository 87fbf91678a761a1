//! Graceful shutdown handling.

use log::warn;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` when the process receives Ctrl-C.
///
/// The pipeline reacts by unwinding both sides without committing. The
/// listener task ends with the process; its handle is not joined.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Ctrl-C received; aborting the run without a commit");
                cancel.cancel();
            }
            Err(e) => warn!("failed to listen for Ctrl-C: {e}"),
        }
    });
}
