//! Aggregator
//!
//! Folds per-platform results, which arrive in completion order, into a
//! report in catalog order with an overall confidence score.

use std::collections::HashMap;

use crate::catalog::PlatformCatalog;
use crate::errors::{PhoenixError, PhoenixResult, ProbeError};
use crate::models::{InvestigationReport, ProbeResult, ReportSummary, REPORT_DISCLAIMER};

/// Caveats attached to every username report.
pub const REPORT_CAVEATS: [&str; 3] = [
    "Presence does not imply ownership",
    "Accounts may be impersonations",
    "Always verify through official channels",
];

pub struct Aggregator<'a> {
    catalog: &'a PlatformCatalog,
}

impl<'a> Aggregator<'a> {
    pub fn new(catalog: &'a PlatformCatalog) -> Self {
        Self { catalog }
    }

    /// Build the report for `target`.
    ///
    /// Fails on a platform reported twice or one the catalog does not know.
    /// A catalog platform with no result is listed as unreachable.
    pub fn aggregate(&self, target: &str, results: Vec<ProbeResult>) -> PhoenixResult<InvestigationReport> {
        let mut slots: Vec<Option<ProbeResult>> = vec![None; self.catalog.len()];
        let index: HashMap<&str, usize> = self
            .catalog
            .list_platforms()
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.as_str(), i))
            .collect();

        for result in results {
            let position = *index.get(result.platform.as_str()).ok_or_else(|| {
                PhoenixError::catalog(format!("result for unknown platform '{}'", result.platform))
            })?;
            if slots[position].is_some() {
                return Err(PhoenixError::DuplicatePlatform(result.platform));
            }
            slots[position] = Some(result);
        }

        let ordered: Vec<ProbeResult> = slots
            .into_iter()
            .zip(self.catalog.list_platforms())
            .map(|(slot, platform)| {
                slot.unwrap_or_else(|| {
                    log::warn!("No result delivered for {}", platform.name);
                    ProbeResult::unreachable(&platform.name, platform.render_url(target), ProbeError::Missing)
                })
            })
            .collect();

        let summary = ReportSummary::tally(&ordered);
        let overall_confidence = overall_confidence(&ordered);
        log::debug!(
            "Aggregated {} results for '{}': confidence {:.2}",
            ordered.len(),
            target,
            overall_confidence
        );

        Ok(InvestigationReport {
            target: target.to_string(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            results: ordered,
            overall_confidence,
            summary,
            caveats: REPORT_CAVEATS.to_vec(),
            disclaimer: REPORT_DISCLAIMER,
        })
    }
}

/// Fraction of platforms with a definitive verdict; 0.0 for none.
pub fn overall_confidence(results: &[ProbeResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let definitive = results.iter().filter(|r| r.verdict.is_definitive()).count();
    definitive as f64 / results.len() as f64
}
