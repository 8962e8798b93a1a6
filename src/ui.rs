use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::models::Verdict;
use crate::probe::ProbeEvent;
use crate::utils::truncate_middle;

/// Tallies shown next to the progress bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub finished: u64,
    pub found: u64,
    pub unreachable: u64,
}

impl ProgressStats {
    fn record(&mut self, verdict: Verdict) {
        self.finished += 1;
        match verdict {
            Verdict::Found => self.found += 1,
            Verdict::Unreachable => self.unreachable += 1,
            Verdict::NotFound | Verdict::Ambiguous => {}
        }
    }
}

/// Progress bar over the platforms of one username run.
pub struct ProbeProgress {
    bar: ProgressBar,
    stats: ProgressStats,
}

impl ProbeProgress {
    pub fn new(total_platforms: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total_platforms)
        };

        match ProgressStyle::with_template(
            "{prefix} {spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
        ) {
            Ok(progress_style) => bar.set_style(
                progress_style
                    .progress_chars("█▉▊▋▌▍▎▏  ")
                    .tick_strings(&["▰▱▱▱▱", "▰▰▱▱▱", "▰▰▰▱▱", "▰▰▰▰▱", "▰▰▰▰▰", "▱▰▰▰▰"]),
            ),
            Err(e) => log::debug!("Progress template rejected: {}", e),
        }
        bar.set_prefix(style("🔍 PROBE").green().bold().to_string());

        Self {
            bar,
            stats: ProgressStats::default(),
        }
    }

    /// Drain probe events until every sender is dropped.
    pub async fn run(mut self, mut events: mpsc::Receiver<ProbeEvent>) -> ProgressStats {
        while let Some(event) = events.recv().await {
            self.apply(event);
        }
        self.bar.finish_with_message(style("✅ probes complete").green().bold().to_string());
        self.stats
    }

    fn apply(&mut self, event: ProbeEvent) {
        match event {
            ProbeEvent::Started(platform) => {
                log::trace!("UI: probe started - {}", platform);
                self.bar.set_message(format!(
                    "{} {}",
                    style("checking").dim(),
                    style(truncate_middle(&platform, 24)).white().bold()
                ));
            }
            ProbeEvent::Finished { platform, verdict } => {
                log::debug!("UI: {} finished as {}", platform, verdict);
                self.stats.record(verdict);
                self.bar.inc(1);
                if verdict == Verdict::Found {
                    self.bar.println(format!("  {} {}", style("✔").green().bold(), style(&platform).white()));
                }
            }
        }
    }
}
