//! Contract between the host and the browser extension that forwards tab events.
//! [native_messaging::NativeMessagingSource] decodes the events sent by the browser and
//! [registry::TabRegistry] keeps track of the tabs they mention.

pub mod native_messaging;
pub mod registry;

use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// `chrome.windows.WINDOW_ID_NONE`, reported when no browser window has focus.
pub const WINDOW_ID_NONE: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Complete,
    #[serde(other)]
    Unknown,
}

/// Events forwarded by the extension. Every message carries a `type` tag, for example
/// `{"type":"tabUpdated","tabId":4,"url":"https://a.com/","status":"complete"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BrowserEvent {
    /// Foregrounded tab changed. The extension includes the url when it already knows it.
    TabActivated {
        tab_id: TabId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Navigation or reload of any tab.
    TabUpdated {
        tab_id: TabId,
        url: String,
        status: LoadStatus,
    },
    TabRemoved {
        tab_id: TabId,
    },
    /// `null` and [WINDOW_ID_NONE] both mean that no browser window holds focus.
    WindowFocusChanged {
        #[serde(default)]
        window_id: Option<i64>,
    },
}

pub fn window_has_focus(window_id: Option<i64>) -> bool {
    matches!(window_id, Some(id) if id != WINDOW_ID_NONE)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TabLookupError {
    #[error("tab {0} no longer exists")]
    NotFound(TabId),
}

/// Resolves tabs to the url they currently display.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TabDirectory: Send + Sync {
    async fn tab_url(&self, tab_id: TabId) -> Result<String, TabLookupError>;

    /// Lets the directory learn from the event stream before the event is handled.
    fn record_event(&self, event: &BrowserEvent);
}

/// Produces browser events one at a time. `None` means the browser closed the connection.
#[async_trait]
pub trait EventSource: Send {
    async fn next_event(&mut self) -> Result<Option<BrowserEvent>>;
}
