use crate::config::RemoteSettings;
use crate::error::{Result, ScraperError};
use crate::models::ProfileRecord;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

pub const NAME_MAX: usize = 100;
pub const PROFILE_URL_MAX: usize = 500;
pub const LOCATION_MAX: usize = 100;
pub const ABOUT_MAX: usize = 200;

/// Matches every row in a PostgREST delete; the nil UUID is never issued.
const DELETE_ALL_FILTER: &str = "neq.00000000-0000-0000-0000-000000000000";

/// One row of the remote profile table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRow {
    pub profile_id: String,
    pub name: String,
    pub profile_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// The headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

impl RemoteRow {
    /// Fresh `profile_id`, fields cut to the column caps.
    pub fn from_record(record: &ProfileRecord) -> Self {
        Self {
            profile_id: Uuid::new_v4().to_string(),
            name: truncate_chars(record.display_name(), NAME_MAX),
            profile_url: truncate_chars(&record.profile_url, PROFILE_URL_MAX),
            location: non_empty(record.location.as_deref())
                .map(|l| truncate_chars(l, LOCATION_MAX)),
            about: non_empty(record.headline.as_deref()).map(|h| truncate_chars(h, ABOUT_MAX)),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Storage for the deduplicated profiles.
#[async_trait]
pub trait RemoteTable: Send + Sync {
    /// Removes every existing row.
    async fn delete_all(&self) -> Result<()>;

    /// Inserts one row. `Ok(true)` when the store confirms the row.
    async fn insert(&self, row: &RemoteRow) -> Result<bool>;
}

/// Replaces the table contents with `records`. Returns the confirmed count.
///
/// Not transactional: a failed delete is logged and inserts still run, and
/// each failed insert is logged and skipped.
pub async fn replace_all(table: &dyn RemoteTable, records: &[ProfileRecord]) -> usize {
    info!("clearing existing rows");
    if let Err(e) = table.delete_all().await {
        warn!(error = %e, "could not clear remote table");
    }

    let mut saved = 0;
    for record in records {
        let row = RemoteRow::from_record(record);
        match table.insert(&row).await {
            Ok(true) => saved += 1,
            Ok(false) => warn!(name = %row.name, "insert returned no data"),
            Err(e) => warn!(name = %row.name, error = %e, "error saving profile"),
        }
    }

    info!(saved, total = records.len(), "remote table updated");
    saved
}

/// A Supabase table reached through its PostgREST endpoint.
pub struct SupabaseTable {
    client: reqwest::Client,
    endpoint: String,
}

impl SupabaseTable {
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&settings.api_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", settings.api_key))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                settings.base_url.trim_end_matches('/'),
                settings.table
            ),
        })
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ScraperError::ConfigError(format!("invalid api key header: {}", e)))
}

#[async_trait]
impl RemoteTable for SupabaseTable {
    async fn delete_all(&self) -> Result<()> {
        self.client
            .delete(&self.endpoint)
            .query(&[("id", DELETE_ALL_FILTER)])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn insert(&self, row: &RemoteRow) -> Result<bool> {
        let inserted: Vec<serde_json::Value> = self
            .client
            .post(&self.endpoint)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(!inserted.is_empty())
    }
}
