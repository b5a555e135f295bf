use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A person found in one search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Best-effort person name.
    pub name: Option<String>,
    /// The line mentioning the institution. Records without one are never emitted.
    pub headline: Option<String>,
    /// A line matching one of the known place names.
    pub location: Option<String>,
    /// Canonical `https://<site>/in/<handle>/`, or empty when unresolved.
    #[serde(default)]
    pub profile_url: String,
}

impl ProfileRecord {
    /// Name to show in outputs: the name, else the headline, else `Unknown`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.headline.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn has_profile_url(&self) -> bool {
        !self.profile_url.trim().is_empty()
    }
}

/// One people-search phrase. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for simulating human browsing behavior via randomized delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Minimum sleep duration in milliseconds.
    pub min_delay_ms: u64,
    /// Maximum sleep duration in milliseconds.
    pub max_delay_ms: u64,
    /// Whether the randomized delay logic is active.
    pub enabled: bool,
}

impl Default for DelayConfig {
    /// Default configuration: 1000ms - 3000ms, enabled.
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            enabled: true,
        }
    }
}

impl DelayConfig {
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Picks a duration inside the window. Zero when disabled.
    pub fn sample(&self) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        let (lo, hi) = if self.min_delay_ms <= self.max_delay_ms {
            (self.min_delay_ms, self.max_delay_ms)
        } else {
            (self.max_delay_ms, self.min_delay_ms)
        };
        let ms = rand::rng().random_range(lo..=hi);
        Duration::from_millis(ms)
    }

    pub async fn pause(&self) {
        let wait = self.sample();
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

/// Summary of one harvest run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Records emitted across all queries, before deduplication.
    pub collected: usize,
    /// Records left after deduplication.
    pub unique: usize,
    /// Unique records that carry a canonical profile URL.
    pub with_profile_url: usize,
    /// Rows the remote table confirmed. `None` when no remote table was configured.
    pub remote_saved: Option<usize>,
    pub csv_path: Option<PathBuf>,
    /// True when a user interrupt cut collection short.
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub records: Vec<ProfileRecord>,
}

impl RunReport {
    /// Share of unique records with a resolved URL, in percent.
    pub fn url_success_rate(&self) -> f64 {
        if self.unique == 0 {
            return 0.0;
        }
        self.with_profile_url as f64 / self.unique as f64 * 100.0
    }
}
