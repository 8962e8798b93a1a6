//! Response classification against a platform's detection rule.

use crate::catalog::DetectionRule;
use crate::models::Verdict;

use super::transport::HttpResponse;

/// Turn a usable response to a GET of `request_url` into a verdict.
///
/// Matching is case-insensitive. URL markers only apply when the host
/// redirected away from `request_url`, so a username that happens to
/// contain a marker (`author` and `/auth`) cannot trip them.
pub fn classify(rule: &DetectionRule, request_url: &str, response: &HttpResponse) -> Verdict {
    match rule {
        DetectionRule::StatusCode {
            found_status,
            not_found_status,
        } => {
            if response.status == *found_status {
                Verdict::Found
            } else if response.status == *not_found_status {
                Verdict::NotFound
            } else {
                Verdict::Ambiguous
            }
        }
        DetectionRule::BodyPattern {
            not_found_markers,
            found_markers,
            found_status,
            not_found_status,
            min_body_len,
            not_found_url_markers,
        } => {
            let final_url = response.final_url.to_lowercase();
            if redirected(request_url, &final_url) && contains_any(&final_url, not_found_url_markers) {
                return Verdict::NotFound;
            }

            let body = String::from_utf8_lossy(&response.body).to_lowercase();
            if contains_any(&body, not_found_markers) {
                return Verdict::NotFound;
            }
            if Some(response.status) == *not_found_status {
                return Verdict::NotFound;
            }

            let found_marker_ok = found_markers.is_empty() || contains_any(&body, found_markers);
            if response.status == *found_status && response.body.len() >= *min_body_len && found_marker_ok {
                Verdict::Found
            } else {
                Verdict::Ambiguous
            }
        }
    }
}

fn redirected(request_url: &str, final_url: &str) -> bool {
    request_url.trim_end_matches('/').to_lowercase() != final_url.trim_end_matches('/')
}

fn contains_any(haystack: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| haystack.contains(&m.to_lowercase()))
}
