use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Resolves once the host should stop: either the process got Ctrl-C or another part of the host
/// cancelled the token, typically because the browser closed the connection.
///
/// On Windows detached processes can't detect signals sent to them, there the browser closing
/// stdin is the only reliable way to stop the host.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => {},
    };
}
