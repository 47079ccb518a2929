use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::{
    browser_api::{window_has_focus, BrowserEvent, LoadStatus, TabDirectory, TabId},
    host::storage::{entities::TimeEntry, log_store::LogStore},
    utils::{clock::Clock, time::rounded_seconds},
};

use super::module::EventProcessor;

/// Host part of a url, the key time is attributed to. Urls without one (`about:blank`,
/// `file:///…`, garbage) can't be attributed.
pub fn domain_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_owned)
}

/// The tab currently believed to be in front of the user, and since when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub tab_id: TabId,
    pub url: String,
    pub started: DateTime<Utc>,
}

impl Observation {
    pub fn new(tab_id: TabId, url: String, started: DateTime<Utc>) -> Self {
        Self {
            tab_id,
            url,
            started,
        }
    }

    /// Ends the observation at `end`, attributing it to `url`. The whole interval belongs to the
    /// day it ended on, even if it started the day before.
    pub fn close(&self, url: &str, end: DateTime<Utc>) -> Option<ClosedInterval> {
        let domain = domain_of(url)?;
        Some(ClosedInterval {
            date: end.date_naive(),
            domain,
            entry: TimeEntry {
                url: url.to_owned(),
                time_spent: rounded_seconds(self.started, end),
                start_time: self.started,
                end_time: end,
            },
        })
    }
}

/// An interval ready to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedInterval {
    pub date: NaiveDate,
    pub domain: String,
    pub entry: TimeEntry,
}

/// Attributes time to tabs. Holds at most one [Observation]; every transition closes the previous
/// one and persists it.
///
/// State always advances before the closed interval is written, so a failed write loses that
/// interval and nothing else.
pub struct Tracker<D, S> {
    directory: D,
    store: S,
    clock: Box<dyn Clock>,
    observation: Option<Observation>,
}

impl<D: TabDirectory, S: LogStore> Tracker<D, S> {
    pub fn new(directory: D, store: S, clock: Box<dyn Clock>) -> Self {
        Self {
            directory,
            store,
            clock,
            observation: None,
        }
    }

    pub fn observation(&self) -> Option<&Observation> {
        self.observation.as_ref()
    }

    /// The foregrounded tab changed to `tab_id`.
    #[instrument(skip(self))]
    pub async fn on_tab_activated(&mut self, tab_id: TabId) -> Result<Option<ClosedInterval>> {
        let now = self.clock.time();

        let closed = match self.observation.take() {
            // The previous tab is attributed to whatever it shows right now.
            Some(previous) => match self.directory.tab_url(previous.tab_id).await {
                Ok(url) => previous.close(&url, now),
                Err(e) => {
                    debug!("Dropping interval of the previous tab: {e}");
                    None
                }
            },
            None => None,
        };

        match self.directory.tab_url(tab_id).await {
            Ok(url) => {
                info!("Switched to tab {tab_id}: {url}");
                self.observation = Some(Observation::new(tab_id, url, now));
            }
            Err(e) => warn!("Activated tab can't be resolved, waiting for the next event: {e}"),
        }

        self.persist(closed).await
    }

    /// A tab finished or started loading `url`. Only completed loads of the observed tab matter.
    #[instrument(skip(self))]
    pub async fn on_tab_navigated(
        &mut self,
        tab_id: TabId,
        url: String,
        status: LoadStatus,
    ) -> Result<Option<ClosedInterval>> {
        let observed = matches!(&self.observation, Some(current) if current.tab_id == tab_id);
        if !observed || status != LoadStatus::Complete {
            return Ok(None);
        }

        let now = self.clock.time();
        info!("Tab {tab_id} navigated to {url}");
        let closed = self
            .observation
            .replace(Observation::new(tab_id, url, now))
            .and_then(|previous| previous.close(&previous.url, now));

        self.persist(closed).await
    }

    /// Focus moved to `window_id`. Gaining focus doesn't resume tracking by itself, the browser
    /// follows up with an activation.
    pub async fn on_window_focus_changed(
        &mut self,
        window_id: Option<i64>,
    ) -> Result<Option<ClosedInterval>> {
        if window_has_focus(window_id) {
            return Ok(None);
        }
        self.on_window_focus_lost().await
    }

    /// No browser window holds focus anymore.
    #[instrument(skip(self))]
    pub async fn on_window_focus_lost(&mut self) -> Result<Option<ClosedInterval>> {
        let closed = self.stop_observing();
        if closed.is_some() {
            info!("Window unfocused, stopped tracking");
        }
        self.persist(closed).await
    }

    fn stop_observing(&mut self) -> Option<ClosedInterval> {
        let observation = self.observation.take()?;
        // No lookup here, unlike activation: the tab keeps the url it was last observed with.
        observation.close(&observation.url, self.clock.time())
    }

    async fn persist(&self, closed: Option<ClosedInterval>) -> Result<Option<ClosedInterval>> {
        let Some(closed) = closed else {
            return Ok(None);
        };

        info!(
            "Logging {}s on {} ({}) for {}",
            closed.entry.time_spent, closed.entry.url, closed.domain, closed.date
        );
        self.store
            .append(closed.date, closed.domain.clone(), closed.entry.clone())
            .await
            .with_context(|| {
                format!(
                    "Interval of {}s on {} was lost",
                    closed.entry.time_spent, closed.domain
                )
            })?;
        Ok(Some(closed))
    }
}

impl<D: TabDirectory, S: LogStore> EventProcessor for Tracker<D, S> {
    async fn process_next(&mut self, event: BrowserEvent) -> Result<()> {
        self.directory.record_event(&event);

        match event {
            BrowserEvent::TabActivated { tab_id, .. } => self.on_tab_activated(tab_id).await?,
            BrowserEvent::TabUpdated {
                tab_id,
                url,
                status,
            } => self.on_tab_navigated(tab_id, url, status).await?,
            BrowserEvent::WindowFocusChanged { window_id } => {
                self.on_window_focus_changed(window_id).await?
            }
            BrowserEvent::TabRemoved { .. } => None,
        };
        Ok(())
    }

    /// Closes whatever is still observed so the last tab isn't lost when the browser exits.
    async fn finalize(&mut self) -> Result<()> {
        let closed = self.stop_observing();
        self.persist(closed).await?;
        Ok(())
    }
}
