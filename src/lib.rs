//! Native messaging host that attributes wall-clock time to the browser tab in focus.
//! The browser forwards tab and window events, the host turns them into closed intervals
//! and appends them to a JSON log which the cli summarizes per day and domain.
//!

pub mod browser_api;
pub mod cli;
pub mod fs;
pub mod host;
pub mod utils;
