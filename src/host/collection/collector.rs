use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

use crate::browser_api::{BrowserEvent, EventSource};

/// Pulls events out of the browser connection and queues them for the
/// [ProcessingModule](crate::host::processing::ProcessingModule).
pub struct EventCollector {
    next: mpsc::Sender<BrowserEvent>,
    source: Box<dyn EventSource>,
    shutdown: CancellationToken,
}

impl EventCollector {
    pub fn new(
        next: mpsc::Sender<BrowserEvent>,
        source: Box<dyn EventSource>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            next,
            source,
            shutdown,
        }
    }

    /// Executes the collector event loop. Returning drops the sender, which lets the processing
    /// module drain the queue and finish.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let event = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                event = self.source.next_event() => event
            };

            match event {
                Ok(Some(event)) => {
                    let span = info_span!("Queueing browser event");
                    debug!("Sending message {:?}", event);
                    self.next
                        .send(event)
                        .instrument(span)
                        .await
                        .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
                }
                Ok(None) => {
                    info!("Browser closed the connection");
                    self.shutdown.cancel();
                    return Ok(());
                }
                Err(e) => {
                    error!("Browser connection is broken {:?}", e);
                    self.shutdown.cancel();
                    return Err(e);
                }
            }
        }
    }
}
