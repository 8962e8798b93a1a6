//! Platform Catalog
//!
//! The immutable table of probe definitions the scheduler works from. Each
//! entry pairs a URL template with a declarative detection rule, so adding
//! a platform (including one that answers 200 for unknown users) is a data
//! change only.

mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::errors::{PhoenixError, PhoenixResult};

/// Placeholder substituted with the percent-encoded username.
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// How a platform's response is turned into a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionRule {
    /// The platform answers with distinct status codes.
    StatusCode {
        found_status: u16,
        not_found_status: u16,
    },
    /// Soft-404 platforms: the body (or the redirect target) decides.
    BodyPattern {
        /// Any of these in the body means "not found".
        #[serde(default)]
        not_found_markers: Vec<String>,
        /// When non-empty, one of these must be present for "found".
        #[serde(default)]
        found_markers: Vec<String>,
        #[serde(default = "default_found_status")]
        found_status: u16,
        #[serde(default)]
        not_found_status: Option<u16>,
        #[serde(default)]
        min_body_len: usize,
        /// Matched against the final URL after redirects, e.g. "/login".
        #[serde(default)]
        not_found_url_markers: Vec<String>,
    },
}

fn default_found_status() -> u16 {
    200
}

/// At most `requests` requests per `per` to one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub requests: u32,
    pub per: Duration,
}

impl RateLimit {
    pub fn per_second(requests: u32) -> Self {
        Self {
            requests,
            per: Duration::from_secs(1),
        }
    }

    /// Minimum spacing between two request starts.
    pub fn interval(&self) -> Duration {
        self.per / self.requests.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDefinition {
    pub name: String,
    pub url_template: String,
    pub detection_rule: DetectionRule,
    pub rate_limit: RateLimit,
}

impl PlatformDefinition {
    /// Profile URL for `username`, which is percent-encoded first.
    pub fn render_url(&self, username: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(username.as_bytes()).collect();
        self.url_template.replacen(USERNAME_PLACEHOLDER, &encoded, 1)
    }

    /// Host the rate limit applies to.
    pub fn host(&self) -> PhoenixResult<String> {
        let sample = self.url_template.replacen(USERNAME_PLACEHOLDER, "probe", 1);
        let parsed = url::Url::parse(&sample).map_err(|e| {
            PhoenixError::catalog(format!("{}: invalid URL template '{}': {}", self.name, self.url_template, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PhoenixError::catalog(format!(
                "{}: only http/https templates are allowed, got '{}'",
                self.name,
                parsed.scheme()
            )));
        }
        parsed
            .host_str()
            .map(|h| h.to_ascii_lowercase())
            .ok_or_else(|| PhoenixError::catalog(format!("{}: URL template has no host", self.name)))
    }

    fn validate(&self) -> PhoenixResult<()> {
        if self.name.trim().is_empty() {
            return Err(PhoenixError::catalog("platform with empty name"));
        }

        let placeholders = self.url_template.matches(USERNAME_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(PhoenixError::catalog(format!(
                "{}: URL template must contain exactly one {} placeholder, found {}",
                self.name, USERNAME_PLACEHOLDER, placeholders
            )));
        }
        self.host()?;

        if self.rate_limit.requests == 0 || self.rate_limit.per.is_zero() {
            return Err(PhoenixError::catalog(format!(
                "{}: rate limit must be positive ({} per {:?})",
                self.name, self.rate_limit.requests, self.rate_limit.per
            )));
        }

        if let DetectionRule::BodyPattern {
            not_found_markers,
            found_markers,
            not_found_status,
            not_found_url_markers,
            ..
        } = &self.detection_rule
        {
            let markers = not_found_markers.iter().chain(found_markers).chain(not_found_url_markers);
            if markers.clone().any(|m| m.is_empty()) {
                return Err(PhoenixError::catalog(format!("{}: empty body marker", self.name)));
            }
            if markers.count() == 0 && not_found_status.is_none() {
                return Err(PhoenixError::catalog(format!(
                    "{}: body pattern rule declares nothing to match",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Validated, read-only set of platform definitions in declaration order.
#[derive(Debug, Clone)]
pub struct PlatformCatalog {
    platforms: Vec<PlatformDefinition>,
}

impl PlatformCatalog {
    pub fn new(platforms: Vec<PlatformDefinition>) -> PhoenixResult<Self> {
        let catalog = Self { platforms };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The public platforms shipped with the tool.
    pub fn builtin() -> PhoenixResult<Self> {
        Self::new(builtin::platform_definitions())
    }

    /// Load a catalog from a TOML file of `[[platform]]` tables.
    pub fn load(path: &Path) -> PhoenixResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PhoenixError::io(e, path.to_path_buf()))?;
        let catalog = Self::from_toml_str(&content)?;
        log::info!("Loaded {} platforms from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str) -> PhoenixResult<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.platform.into_iter().map(PlatformDefinition::from).collect())
    }

    pub fn validate(&self) -> PhoenixResult<()> {
        if self.platforms.is_empty() {
            return Err(PhoenixError::catalog("catalog has no platforms"));
        }
        let mut seen = HashSet::new();
        for platform in &self.platforms {
            platform.validate()?;
            if !seen.insert(platform.name.as_str()) {
                return Err(PhoenixError::catalog(format!("duplicate platform name '{}'", platform.name)));
            }
        }
        Ok(())
    }

    pub fn list_platforms(&self) -> &[PlatformDefinition] {
        &self.platforms
    }

    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    platform: Vec<PlatformEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlatformEntry {
    name: String,
    url_template: String,
    rule: DetectionRule,
    rate_limit: RateLimitEntry,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RateLimitEntry {
    requests: u32,
    per_ms: u64,
}

impl From<PlatformEntry> for PlatformDefinition {
    fn from(entry: PlatformEntry) -> Self {
        Self {
            name: entry.name,
            url_template: entry.url_template,
            detection_rule: entry.rule,
            rate_limit: RateLimit {
                requests: entry.rate_limit.requests,
                per: Duration::from_millis(entry.rate_limit.per_ms),
            },
        }
    }
}
