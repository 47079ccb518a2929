use std::path::PathBuf;

use anyhow::Result;
use collection::collector::EventCollector;
use processing::{tracker::Tracker, ProcessingModule};
use storage::log_store::JsonLogStore;
use tokio::{io::AsyncRead, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    browser_api::{
        native_messaging::NativeMessagingSource, registry::TabRegistry, BrowserEvent, EventSource,
    },
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod collection;
pub mod processing;
pub mod shutdown;
pub mod storage;

/// Events waiting for the tracker. The browser only produces a handful per user action.
const EVENT_QUEUE_SIZE: usize = 32;

/// Represents the starting point for the host. Runs until the browser closes `input` or the
/// process is interrupted.
pub async fn start_host(dir: PathBuf, input: impl AsyncRead + Unpin + Send + 'static) -> Result<()> {
    run_host(dir, NativeMessagingSource::new(input), DefaultClock).await
}

async fn run_host(
    dir: PathBuf,
    source: impl EventSource + 'static,
    clock: impl Clock,
) -> Result<()> {
    info!("Recording into {dir:?}");
    let (sender, receiver) = mpsc::channel::<BrowserEvent>(EVENT_QUEUE_SIZE);

    let shutdown_token = CancellationToken::new();

    let collector = create_collector(sender, source, &shutdown_token);

    let processor = create_processor(dir, receiver, clock)?;

    let (_, collection_result, processing_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        collector.run(),
        processor.run(),
    );

    if let Err(collection_result) = collection_result {
        error!("Collection module got an error {:?}", collection_result);
    }

    if let Err(processing_result) = processing_result {
        error!("Processing module got an error {:?}", processing_result);
    }

    Ok(())
}

fn create_collector(
    sender: mpsc::Sender<BrowserEvent>,
    source: impl EventSource + 'static,
    shutdown_token: &CancellationToken,
) -> EventCollector {
    EventCollector::new(sender, Box::new(source), shutdown_token.clone())
}

fn create_processor(
    dir: PathBuf,
    receiver: mpsc::Receiver<BrowserEvent>,
    clock: impl Clock,
) -> Result<ProcessingModule<Tracker<TabRegistry, JsonLogStore>>, anyhow::Error> {
    let store = JsonLogStore::new(dir)?;
    let tracker = Tracker::new(TabRegistry::new(), store, Box::new(clock));
    Ok(ProcessingModule::new(receiver, tracker))
}

#[cfg(test)]
mod host_tests {
    use anyhow::Result;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;
    use tempfile::tempdir;

    use crate::{
        browser_api::native_messaging::{test_framing::write_message, NativeMessagingSource},
        host::{
            run_host,
            storage::log_store::{JsonLogStore, LogStore},
        },
        utils::{clock::test_clock::ManualClock, logging::TEST_LOGGING},
    };

    fn test_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 7, 4, 0, 0, 0).unwrap()
    }

    /// Drives the whole host through a native messaging pipe. Every transition reads the clock
    /// once and the clock moves 5 seconds per read.
    #[tokio::test]
    async fn smoke_test_host() -> Result<()> {
        *TEST_LOGGING;
        let (mut browser, host_input) = tokio::io::duplex(4096);
        let clock = ManualClock::stepping(test_start(), Duration::seconds(5));
        let dir = tempdir()?;

        let messages = [
            json!({"type": "tabActivated", "tabId": 1, "url": "https://a.com/x"}),
            json!({"type": "tabUpdated", "tabId": 2, "url": "https://b.com/y", "status": "loading"}),
            json!({"type": "somethingNew", "payload": 1}),
            json!({"type": "tabActivated", "tabId": 2}),
            json!({"type": "tabActivated", "tabId": 3, "url": "about:blank"}),
            json!({"type": "windowFocusChanged", "windowId": -1}),
            json!({"type": "tabUpdated", "tabId": 3, "url": "https://c.com/", "status": "complete"}),
            json!({"type": "windowFocusChanged", "windowId": 4}),
            json!({"type": "tabActivated", "tabId": 1}),
        ];
        for message in &messages {
            write_message(&mut browser, message).await?;
        }
        drop(browser);

        run_host(
            dir.path().to_path_buf(),
            NativeMessagingSource::new(host_input),
            clock,
        )
        .await?;

        let storage = JsonLogStore::new(dir.path().to_path_buf())?;
        let log = storage.read_all().await?;
        let day = &log["2018-07-04"];

        // a.com: 0s..5s, then from the last activation at 20s until the browser disconnected.
        let a = &day["a.com"];
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].url, "https://a.com/x");
        assert_eq!(a[0].time_spent, 5);
        assert_eq!(a[0].start_time, test_start());
        assert_eq!(a[1].time_spent, 5);
        assert_eq!(a[1].start_time, test_start() + Duration::seconds(20));
        assert_eq!(a[1].end_time, test_start() + Duration::seconds(25));

        let b = &day["b.com"];
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].url, "https://b.com/y");
        assert_eq!(b[0].time_spent, 5);

        assert_eq!(day.len(), 2);
        Ok(())
    }
}
