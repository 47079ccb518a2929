use anyhow::Result;
use module::EventProcessor;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info_span, Instrument};

use crate::browser_api::BrowserEvent;

pub mod module;
pub mod tracker;

/// Single consumer of browser events. Each event is handled to completion, lookups and storage
/// writes included, before the next one is received, which keeps a time interval owned by exactly
/// one handler.
pub struct ProcessingModule<Processor> {
    receiver: Receiver<BrowserEvent>,
    processor: Processor,
}

impl<P: EventProcessor> ProcessingModule<P> {
    pub fn new(receiver: Receiver<BrowserEvent>, processor: P) -> Self {
        Self {
            receiver,
            processor,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(event) = self.receiver.recv().await {
            debug!("Processing event {:?}", event);
            let span = info_span!("Handling browser event");
            // Failures only cost the interval being closed, the next event is handled as usual.
            if let Err(e) = self
                .processor
                .process_next(event.clone())
                .instrument(span)
                .await
            {
                error!("Error processing event {:?}: {e:?}", event)
            }
        }

        self.receiver.close();
        self.processor.finalize().await
    }
}
