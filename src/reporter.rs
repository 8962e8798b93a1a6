use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::errors::{PhoenixError, PhoenixResult};
use crate::models::{ImageReport, Investigation, InvestigationReport, Verdict};

/// Renders reports for the terminal and writes them as JSON.
pub struct Reporter;

impl Reporter {
    pub fn render(investigation: &Investigation) -> String {
        match investigation {
            Investigation::Username(report) => Self::render_username(report),
            Investigation::Image(report) => Self::render_image(report),
        }
    }

    pub fn render_username(report: &InvestigationReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n🎯 USERNAME INVESTIGATION: {}", report.target);
        let _ = writeln!(out, "═══════════════════════════════════════");
        let _ = writeln!(out, "Generated: {}", report.generated_at);
        let _ = writeln!(out);

        for result in &report.results {
            let status = result
                .http_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "---".to_string());
            let _ = write!(
                out,
                "{} {:<14} {:<12} {:>4} {:>6}ms",
                verdict_icon(result.verdict),
                result.platform,
                result.verdict.to_string(),
                status,
                result.elapsed.as_millis()
            );
            match (&result.error, result.verdict) {
                (Some(error), _) => {
                    let _ = write!(out, "  ({})", error);
                }
                (None, Verdict::Found) => {
                    let _ = write!(out, "  {}", result.url);
                }
                _ => {}
            }
            let _ = writeln!(out);
        }

        let summary = &report.summary;
        let _ = writeln!(out, "\n📊 SUMMARY");
        let _ = writeln!(out, "═══════════════════════════════════════");
        let _ = writeln!(out, "✅ Found: {}", summary.found);
        let _ = writeln!(out, "❌ Not found: {}", summary.not_found);
        let _ = writeln!(out, "❔ Inconclusive: {}", summary.inconclusive());
        let _ = writeln!(out, "🎯 Overall confidence: {:.0}%", report.overall_confidence * 100.0);

        let _ = writeln!(out, "\n⚠️  CAVEATS");
        for caveat in &report.caveats {
            let _ = writeln!(out, "  - {}", caveat);
        }
        let _ = writeln!(out, "\n{}", report.disclaimer);
        out
    }

    pub fn render_image(report: &ImageReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n🖼️  IMAGE INVESTIGATION: {}", report.file_name);
        let _ = writeln!(out, "═══════════════════════════════════════");
        let _ = writeln!(out, "📁 Path: {}", report.path.display());
        let _ = writeln!(out, "💾 Size: {}", format_file_size(report.size_bytes));
        let _ = writeln!(out, "🧾 Format: {}", report.format.unwrap_or("unknown"));
        let _ = writeln!(out, "📐 Dimensions: {}x{}", report.width, report.height);
        let _ = writeln!(out, "🔑 SHA-256: {}", report.sha256);
        let _ = writeln!(out, "🔑 MD5: {}", report.md5);
        let _ = writeln!(out, "🧬 aHash: {}", report.fingerprint.average_hash);
        let _ = writeln!(out, "🧬 dHash: {}", report.fingerprint.difference_hash);

        if !report.reuse_indicators.is_empty() {
            let _ = writeln!(out, "\n🚩 REUSE INDICATORS");
            for indicator in &report.reuse_indicators {
                let _ = writeln!(out, "  - {}", indicator);
            }
        }

        if !report.comparisons.is_empty() {
            let _ = writeln!(out, "\n🔍 NEAR-DUPLICATES");
            let _ = writeln!(out, "═══════════════════════════════════════");
            for (i, m) in report.comparisons.iter().enumerate() {
                let marker = if m.likely_duplicate { "🔴" } else { "🟢" };
                let _ = writeln!(
                    out,
                    "{}. {} {} (distance {})",
                    i + 1,
                    marker,
                    m.path.display(),
                    m.distance
                );
            }
        }

        let _ = writeln!(out, "\n🌐 REVERSE SEARCH");
        for suggestion in &report.reverse_search_suggestions {
            let _ = writeln!(out, "  - {}", suggestion);
        }
        let _ = writeln!(out, "\n{}", report.disclaimer);
        out
    }

    pub fn write_json<T: Serialize>(value: &T, path: &Path) -> PhoenixResult<()> {
        log::info!("Writing JSON results to: {:?}", path);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(path, json).map_err(|e| PhoenixError::io(e, path.to_path_buf()))
    }
}

fn verdict_icon(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Found => "✅",
        Verdict::NotFound => "❌",
        Verdict::Ambiguous => "❔",
        Verdict::Unreachable => "⚠️ ",
    }
}

fn format_file_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = size as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", size as u64, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
