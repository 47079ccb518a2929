use crate::host::storage::entities::{ActivityLog, TimeEntry};

#[derive(Debug, PartialEq, Eq)]
pub struct DomainUsage {
    pub domain: String,
    pub seconds: u64,
    pub entries: Vec<TimeEntry>,
}

impl DomainUsage {
    fn new(domain: String, entries: Vec<TimeEntry>) -> Self {
        Self {
            domain,
            seconds: entries.iter().map(|v| v.time_spent).sum(),
            entries,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct DayUsage {
    pub date: String,
    pub seconds: u64,
    pub domains: Vec<DomainUsage>,
}

/// Turns the log into per-day summaries, most recent day first. `only` keeps a single day.
/// Domains keep the order the log stores them in.
pub fn analyze_days(log: ActivityLog, only: Option<&str>) -> Vec<DayUsage> {
    log.into_iter()
        .rev()
        .filter(|(date, _)| only.map_or(true, |only| only == date))
        .map(|(date, domains)| {
            let domains = domains
                .into_iter()
                .map(|(domain, entries)| DomainUsage::new(domain, entries))
                .collect::<Vec<_>>();
            DayUsage {
                date,
                seconds: domains.iter().map(|v| v.seconds).sum(),
                domains,
            }
        })
        .collect()
}
