//! iPhoenix
//!
//! Public footprint investigation: checks a username across a catalog of
//! public platforms with bounded, rate-limited concurrent probes, and
//! fingerprints images for near-duplicate search.

pub mod aggregator;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod investigator;
pub mod media;
pub mod models;
pub mod probe;
pub mod reporter;
pub mod ui;
pub mod utils;

pub use aggregator::Aggregator;
pub use catalog::{DetectionRule, PlatformCatalog, PlatformDefinition, RateLimit};
pub use errors::{PhoenixError, PhoenixResult, ProbeError};
pub use fingerprint::{compute_fingerprint, is_likely_duplicate, similarity, ImageFingerprint};
pub use investigator::Investigator;
pub use models::{InvestigationReport, ProbeResult, Verdict};
pub use probe::{ProbeOptions, ProbeScheduler};
