//! Orchestrates one run: settings and catalog in, a rendered report out.

use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::aggregator::Aggregator;
use crate::catalog::PlatformCatalog;
use crate::cli::{Args, Target};
use crate::config::Settings;
use crate::errors::{PhoenixError, PhoenixResult};
use crate::media::{analyze_image, compare_candidates, effective_threshold, search_directory};
use crate::models::{ImageReport, Investigation, InvestigationReport};
use crate::probe::ProbeScheduler;
use crate::reporter::Reporter;
use crate::ui::ProbeProgress;

pub struct Investigator {
    args: Args,
    settings: Settings,
}

impl Investigator {
    pub fn new(args: Args) -> PhoenixResult<Self> {
        let settings = Settings::from_args(&args)?;
        log::info!("Investigator initialized");
        Ok(Self { args, settings })
    }

    /// Run the investigation the command line asked for, print the summary
    /// and write JSON when `--output` is set.
    pub async fn run(&self) -> PhoenixResult<Investigation> {
        let start = Instant::now();
        let investigation = match self.args.target() {
            Some(Target::Username(username)) => {
                let catalog = self.settings.load_catalog()?;
                let scheduler = ProbeScheduler::new(self.settings.probe.clone())?;
                Investigation::Username(self.investigate_username(&username, &catalog, scheduler).await?)
            }
            Some(Target::Image(path)) => Investigation::Image(self.investigate_image(&path).await?),
            None => return Err(PhoenixError::validation("exactly one of --username or --image is required")),
        };
        log::info!("Investigation completed in {:.2}s", start.elapsed().as_secs_f64());

        if !self.args.quiet {
            println!("{}", Reporter::render(&investigation));
        }
        if let Some(output) = &self.args.output {
            Reporter::write_json(&investigation, output)?;
        }
        Ok(investigation)
    }

    /// Probe `username` with `scheduler` and aggregate in catalog order.
    pub async fn investigate_username(
        &self,
        username: &str,
        catalog: &PlatformCatalog,
        scheduler: ProbeScheduler,
    ) -> PhoenixResult<InvestigationReport> {
        log::info!("Starting username investigation: {}", username);

        let (tx, rx) = mpsc::channel(catalog.len().max(1) * 2);
        let progress = ProbeProgress::new(catalog.len() as u64, self.args.quiet);
        let ui_task = tokio::spawn(progress.run(rx));

        let scheduler = scheduler.with_events(tx);
        let outcome = scheduler.probe_username(username, catalog).await;
        // the progress task ends once the last event sender is gone
        drop(scheduler);
        match ui_task.await {
            Ok(stats) => log::debug!("Progress: {:?}", stats),
            Err(e) => log::error!("UI task error: {}", e),
        }

        Aggregator::new(catalog).aggregate(username, outcome?)
    }

    /// Build the image report, then fill in any requested comparisons.
    pub async fn investigate_image(&self, path: &Path) -> PhoenixResult<ImageReport> {
        let options = self.settings.fingerprint.clone();
        let path = path.to_path_buf();
        let compare = self.args.compare.clone();
        let search_dir = self.args.search_dir.clone();

        // decoding and hashing are CPU-bound
        tokio::task::spawn_blocking(move || {
            let mut report = analyze_image(&path, &options)?;
            let threshold = effective_threshold(&report.fingerprint, &options);

            if !compare.is_empty() {
                report
                    .comparisons
                    .extend(compare_candidates(&report.fingerprint, &compare, threshold, &options)?);
            }
            if let Some(dir) = &search_dir {
                report
                    .comparisons
                    .extend(search_directory(&report.fingerprint, dir, Some(&path), threshold, &options)?);
            }
            Ok(report)
        })
        .await?
    }
}
