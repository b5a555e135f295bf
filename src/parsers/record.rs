use crate::config::ExtractionConfig;
use crate::models::ProfileRecord;
use crate::navigator::{Element, Navigator};
use crate::parsers::enhance;
use crate::parsers::links::LinkResolver;
use crate::parsers::text::{self, ProfileFields};
use tracing::debug;

/// Turns one result container into at most one profile record.
pub struct RecordBuilder {
    config: ExtractionConfig,
    resolver: LinkResolver,
}

impl RecordBuilder {
    pub fn new(config: ExtractionConfig, resolver: LinkResolver) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn fields(&self, container: &Element) -> ProfileFields {
        text::classify_lines(&container.lines(), &self.config)
    }

    /// `None` when the container never mentions the institution or no line
    /// qualifies as the headline. The link resolver only runs for containers
    /// that pass both checks.
    pub async fn build(
        &self,
        container: &Element,
        navigator: &dyn Navigator,
    ) -> Option<ProfileRecord> {
        let lines = container.lines();
        if !text::is_relevant(&lines, &self.config) {
            debug!("no institution keyword, skipping result");
            return None;
        }

        let ProfileFields {
            headline,
            name,
            location,
        } = text::classify_lines(&lines, &self.config);

        let Some(headline) = headline else {
            debug!("no headline line, skipping result");
            return None;
        };
        let name = name.or_else(|| {
            let guessed = enhance::name_from_headline(&headline, &self.config);
            if let Some(guessed) = &guessed {
                debug!(%guessed, "name taken from headline");
            }
            guessed
        });
        debug!(%headline, ?name, ?location, "extracted fields");

        let profile_url = self
            .resolver
            .resolve(container, navigator)
            .await
            .unwrap_or_default();
        if profile_url.is_empty() {
            debug!("no profile url found");
        }

        Some(ProfileRecord {
            name,
            headline: Some(headline),
            location,
            profile_url,
        })
    }
}
