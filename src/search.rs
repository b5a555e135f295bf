use crate::config::{HarvestConfig, PacingConfig, SearchConfig};
use crate::error::{Result, ScraperError};
use crate::models::{ProfileRecord, SearchQuery};
use crate::navigator::Navigator;
use crate::parsers::links::LinkResolver;
use crate::parsers::record::RecordBuilder;
use reqwest::Url;
use tracing::{debug, info, warn};

/// Runs each configured query and feeds its results to the record builder.
pub struct SearchDriver {
    builder: RecordBuilder,
    search: SearchConfig,
    pacing: PacingConfig,
}

impl SearchDriver {
    pub fn new(builder: RecordBuilder, search: SearchConfig, pacing: PacingConfig) -> Self {
        Self {
            builder,
            search,
            pacing,
        }
    }

    /// Builds the standard resolver chain and record builder from a config.
    pub fn from_config(config: &HarvestConfig) -> Result<Self> {
        config.validate()?;
        let resolver = LinkResolver::standard(
            &config.extraction,
            &config.search,
            config.pacing.after_navigation.clone(),
        )?;
        let builder = RecordBuilder::new(config.extraction.clone(), resolver);
        Ok(Self::new(
            builder,
            config.search.clone(),
            config.pacing.clone(),
        ))
    }

    pub fn queries(&self) -> &[SearchQuery] {
        &self.search.queries
    }

    pub fn search_url(&self, query: &SearchQuery) -> Result<String> {
        let url = Url::parse_with_params(&self.search.search_url, &[("keywords", query.as_str())])
            .map_err(|e| {
                ScraperError::ConfigError(format!("bad search url {}: {}", self.search.search_url, e))
            })?;
        Ok(url.to_string())
    }

    /// Runs one query, appending records to `out` as they are built.
    /// Returns how many records this query added.
    pub async fn run_query(
        &self,
        navigator: &dyn Navigator,
        query: &SearchQuery,
        out: &mut Vec<ProfileRecord>,
    ) -> Result<usize> {
        let url = self.search_url(query)?;
        info!(%query, "searching");
        navigator.goto(&url).await?;
        self.pacing.search_load.pause().await;

        for pass in 0..self.search.scroll_passes {
            if let Err(e) = navigator.scroll().await {
                debug!(pass, error = %e, "scroll failed");
            }
            self.pacing.scroll.pause().await;
        }

        let containers = navigator
            .find_elements(&self.search.container_selector)
            .await?;
        info!(%query, found = containers.len(), "search results");

        let mut added = 0;
        for (i, container) in containers.iter().take(self.search.result_cap).enumerate() {
            debug!(result = i + 1, "processing result");
            match self.builder.build(container, navigator).await {
                Some(record) => {
                    out.push(record);
                    added += 1;
                }
                None => debug!(result = i + 1, "result skipped"),
            }
            self.pacing.between_results.pause().await;
        }

        Ok(added)
    }

    /// Runs every query in order. A failing query is logged and skipped; the
    /// records it produced before failing are kept.
    pub async fn run_all(&self, navigator: &dyn Navigator, out: &mut Vec<ProfileRecord>) -> usize {
        let before = out.len();

        for query in &self.search.queries {
            match self.run_query(navigator, query, out).await {
                Ok(0) => warn!(%query, "no profiles found"),
                Ok(n) => info!(%query, profiles = n, "query finished"),
                Err(e) => warn!(%query, error = %e, "query failed"),
            }
            self.pacing.between_queries.pause().await;
        }

        out.len() - before
    }
}
