use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ProbeError;
use crate::fingerprint::ImageFingerprint;

/// Printed with and serialized into every report.
pub const REPORT_DISCLAIMER: &str = "This report contains publicly available information only. \
It does not claim identity, ownership, or location of any individual.";

/// Existence verdict for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Found,
    NotFound,
    Ambiguous,
    Unreachable,
}

impl Verdict {
    /// Found and NotFound are definitive; the rest lower confidence.
    pub fn is_definitive(self) -> bool {
        matches!(self, Verdict::Found | Verdict::NotFound)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Found => write!(f, "found"),
            Verdict::NotFound => write!(f, "not found"),
            Verdict::Ambiguous => write!(f, "ambiguous"),
            Verdict::Unreachable => write!(f, "unreachable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub platform: String,
    pub url: String,
    pub verdict: Verdict,
    pub http_status: Option<u16>,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub attempts: u32,
    pub error: Option<ProbeError>,
}

impl ProbeResult {
    /// Result for a platform that never produced a response.
    pub fn unreachable(platform: impl Into<String>, url: impl Into<String>, error: ProbeError) -> Self {
        Self {
            platform: platform.into(),
            url: url.into(),
            verdict: Verdict::Unreachable,
            http_status: None,
            elapsed: Duration::ZERO,
            attempts: 0,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub found: usize,
    pub not_found: usize,
    pub ambiguous: usize,
    pub unreachable: usize,
}

impl ReportSummary {
    pub fn tally(results: &[ProbeResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.verdict {
                Verdict::Found => summary.found += 1,
                Verdict::NotFound => summary.not_found += 1,
                Verdict::Ambiguous => summary.ambiguous += 1,
                Verdict::Unreachable => summary.unreachable += 1,
            }
        }
        summary
    }

    pub fn inconclusive(&self) -> usize {
        self.ambiguous + self.unreachable
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestigationReport {
    pub target: String,
    pub generated_at: String,
    pub results: Vec<ProbeResult>,
    pub overall_confidence: f64,
    pub summary: ReportSummary,
    pub caveats: Vec<&'static str>,
    pub disclaimer: &'static str,
}

/// Image investigation output.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub extension: Option<String>,
    pub format: Option<&'static str>,
    pub width: u32,
    pub height: u32,
    pub sha256: String,
    pub md5: String,
    pub fingerprint: ImageFingerprint,
    pub reuse_indicators: Vec<String>,
    pub comparisons: Vec<DuplicateMatch>,
    pub reverse_search_suggestions: Vec<&'static str>,
    pub disclaimer: &'static str,
}

/// Fingerprint distance between the investigated image and a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateMatch {
    pub path: PathBuf,
    pub distance: u32,
    pub likely_duplicate: bool,
}

/// Outcome of one run, whichever target it investigated.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Investigation {
    Username(InvestigationReport),
    Image(ImageReport),
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}
