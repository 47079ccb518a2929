use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;
use tracing::trace;

use super::{BrowserEvent, TabDirectory, TabId, TabLookupError};

/// [TabDirectory] fed by the event stream itself. A tab is known from the first event that
/// carries its url until the browser reports it as removed.
#[derive(Default)]
pub struct TabRegistry {
    tabs: RwLock<HashMap<TabId, String>>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_url(&self, tab_id: TabId, url: &str) {
        trace!("Tab {tab_id} now shows {url}");
        self.tabs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tab_id, url.to_owned());
    }

    fn remove(&self, tab_id: TabId) {
        trace!("Tab {tab_id} removed");
        self.tabs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&tab_id);
    }
}

#[async_trait]
impl TabDirectory for TabRegistry {
    async fn tab_url(&self, tab_id: TabId) -> Result<String, TabLookupError> {
        self.tabs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tab_id)
            .cloned()
            .ok_or(TabLookupError::NotFound(tab_id))
    }

    fn record_event(&self, event: &BrowserEvent) {
        match event {
            BrowserEvent::TabActivated {
                tab_id,
                url: Some(url),
            }
            | BrowserEvent::TabUpdated { tab_id, url, .. } => self.set_url(*tab_id, url),
            BrowserEvent::TabRemoved { tab_id } => self.remove(*tab_id),
            BrowserEvent::TabActivated { url: None, .. }
            | BrowserEvent::WindowFocusChanged { .. } => {}
        }
    }
}
