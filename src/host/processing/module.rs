use anyhow::Result;

use crate::browser_api::BrowserEvent;

/// Represents an event processor. Implementations get every event in order and are never
/// called concurrently.
pub trait EventProcessor {
    fn process_next(&mut self, event: BrowserEvent) -> impl std::future::Future<Output = Result<()>>;

    /// Called once after the last event, when the browser disconnects or the host shuts down.
    fn finalize(&mut self) -> impl std::future::Future<Output = Result<()>>;
}
