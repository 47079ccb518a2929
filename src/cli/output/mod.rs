pub mod analysis;

use std::fmt::{self, Write};

use ansi_term::{Colour, Style};
use analysis::DayUsage;

/// Renders day summaries as text. A day is a header followed by one line per domain, and with
/// `details` the individual entries below each domain.
pub fn render_days(days: &[DayUsage], details: bool, colored: bool) -> Result<String, fmt::Error> {
    let header = if colored {
        Style::new().bold().underline()
    } else {
        Style::new()
    };
    let domain_style = if colored {
        Colour::Cyan.normal()
    } else {
        Style::new()
    };

    let mut out = String::new();
    for day in days {
        writeln!(
            out,
            "{}\t{}",
            header.paint(day.date.as_str()),
            format_duration(day.seconds)
        )?;
        for domain in &day.domains {
            writeln!(
                out,
                "{}\t{}",
                format_duration(domain.seconds),
                domain_style.paint(domain.domain.as_str())
            )?;
            if details {
                for entry in &domain.entries {
                    writeln!(out, "\t  {} - {}s", entry.url, entry.time_spent)?;
                }
            }
        }
        out.push('\n');
    }
    Ok(out)
}

pub fn format_duration(seconds: u64) -> String {
    let (hours, minutes, seconds) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
