//! Run settings derived from the command line.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::PlatformCatalog;
use crate::cli::Args;
use crate::errors::{PhoenixError, PhoenixResult};
use crate::fingerprint::HashConfig;
use crate::probe::ProbeOptions;

/// Longest request timeout or run deadline accepted, in seconds (one day).
pub const MAX_WAIT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct FingerprintOptions {
    pub hash: HashConfig,
    /// Differing-bit threshold; `None` means 10% of the combined hash width.
    pub threshold: Option<u32>,
    pub max_image_bytes: u64,
    /// Directory search threads, 0 = one per CPU.
    pub threads: usize,
    pub max_depth: usize,
}

impl Default for FingerprintOptions {
    fn default() -> Self {
        Self {
            hash: HashConfig::default(),
            threshold: None,
            max_image_bytes: 50 * 1024 * 1024,
            threads: 0,
            max_depth: 10,
        }
    }
}

impl FingerprintOptions {
    pub fn thread_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub probe: ProbeOptions,
    pub fingerprint: FingerprintOptions,
    pub catalog_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_args(args: &Args) -> PhoenixResult<Self> {
        if args.workers == 0 {
            return Err(PhoenixError::validation("--workers must be at least 1"));
        }
        if args.timeout_secs == 0 || args.deadline_secs == 0 {
            return Err(PhoenixError::validation("timeouts must be at least one second"));
        }
        if args.timeout_secs > MAX_WAIT_SECS || args.deadline_secs > MAX_WAIT_SECS {
            return Err(PhoenixError::validation(format!(
                "timeouts may not exceed {} seconds",
                MAX_WAIT_SECS
            )));
        }
        if args.max_body_kb == 0 {
            return Err(PhoenixError::validation("--max-body-kb must be at least 1"));
        }
        let max_body_bytes = args
            .max_body_kb
            .checked_mul(1024)
            .ok_or_else(|| PhoenixError::validation(format!("--max-body-kb {} is too large", args.max_body_kb)))?;
        let max_image_bytes = args
            .max_image_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| PhoenixError::validation(format!("--max-image-mb {} is too large", args.max_image_mb)))?;

        let probe = ProbeOptions {
            workers: args.workers,
            request_timeout: Duration::from_secs(args.timeout_secs),
            max_retries: args.retries,
            max_body_bytes,
            deadline: Duration::from_secs(args.deadline_secs),
            ..ProbeOptions::default()
        };

        let fingerprint = FingerprintOptions {
            hash: HashConfig::new(args.hash_grid)?,
            threshold: args.threshold,
            max_image_bytes,
            threads: args.threads,
            max_depth: args.max_depth,
        };

        Ok(Self {
            probe,
            fingerprint,
            catalog_path: args.catalog.clone(),
        })
    }

    /// The configured catalog file, or the built-in one.
    pub fn load_catalog(&self) -> PhoenixResult<PlatformCatalog> {
        match &self.catalog_path {
            Some(path) => PlatformCatalog::load(path),
            None => {
                let catalog = PlatformCatalog::builtin()?;
                log::info!("Using built-in catalog of {} platforms", catalog.len());
                Ok(catalog)
            }
        }
    }
}
