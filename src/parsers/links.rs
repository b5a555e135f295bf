use crate::config::{ExtractionConfig, SearchConfig};
use crate::error::{Result, ScraperError};
use crate::models::DelayConfig;
use crate::navigator::{Element, NavigationGuard, Navigator};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// A borrowed view over one hyperlink address.
#[derive(Debug, Clone, Copy)]
pub struct LinkCandidate<'a> {
    href: &'a str,
}

impl<'a> LinkCandidate<'a> {
    pub fn new(href: &'a str) -> Self {
        Self { href: href.trim() }
    }

    pub fn href(&self) -> &'a str {
        self.href
    }
}

/// Extracts the handle after the profile-path marker and rebuilds the
/// canonical `https://<host><marker><handle>/` form.
#[derive(Debug)]
pub struct ProfileLinkPattern {
    regex: Regex,
    marker: String,
    default_host: String,
    allowed_host: Option<String>,
}

impl ProfileLinkPattern {
    pub fn new(marker: &str, default_host: &str) -> Result<Self> {
        let pattern = format!(
            r"^(?:(?:https?:)?//([^/?#]+))?{}([^/?#]+)",
            regex::escape(marker)
        );
        let regex = Regex::new(&pattern)
            .map_err(|e| ScraperError::ConfigError(format!("bad profile marker: {}", e)))?;
        Ok(Self {
            regex,
            marker: marker.to_string(),
            default_host: default_host.to_string(),
            allowed_host: None,
        })
    }

    /// Only accept absolute links on `host` or its subdomains.
    pub fn with_allowed_host(mut self, host: Option<String>) -> Self {
        self.allowed_host = host.map(|h| h.to_lowercase());
        self
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self::new(&config.profile_path_marker, &config.default_site_host)?
            .with_allowed_host(config.allowed_profile_host.clone()))
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Canonical profile URL for a link, if it points at a profile.
    /// Relative links resolve against the default host.
    pub fn canonicalize(&self, candidate: LinkCandidate<'_>) -> Option<String> {
        let caps = self.regex.captures(candidate.href())?;
        let host = match caps.get(1) {
            Some(m) if self.host_allowed(m.as_str()) => m.as_str(),
            Some(m) => {
                debug!(host = m.as_str(), "profile link on another site, ignoring");
                return None;
            }
            None => self.default_host.as_str(),
        };
        let handle = caps.get(2)?.as_str();
        Some(format!("https://{}{}{}/", host, self.marker, handle))
    }

    fn host_allowed(&self, host: &str) -> bool {
        let Some(allowed) = &self.allowed_host else {
            return true;
        };
        let host = host.to_lowercase();
        let host = host.split(':').next().unwrap_or_default();
        host == allowed.as_str() || host.ends_with(&format!(".{}", allowed))
    }
}

/// One way of finding a result's profile URL.
#[async_trait]
pub trait LinkStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, container: &Element, navigator: &dyn Navigator)
    -> Result<Option<String>>;
}

fn first_canonical(links: &[Element], pattern: &ProfileLinkPattern) -> Option<String> {
    links.iter().find_map(|link| {
        let href = link.attr("href")?;
        pattern.canonicalize(LinkCandidate::new(&href))
    })
}

/// Scans links whose `href` already contains the profile marker.
pub struct DirectAttributeScan {
    selector: String,
    pattern: Arc<ProfileLinkPattern>,
}

impl DirectAttributeScan {
    pub fn new(pattern: Arc<ProfileLinkPattern>) -> Self {
        let selector = format!("a[href*=\"{}\"]", pattern.marker());
        Self { selector, pattern }
    }
}

#[async_trait]
impl LinkStrategy for DirectAttributeScan {
    fn name(&self) -> &'static str {
        "direct-attribute"
    }

    async fn resolve(&self, container: &Element, _: &dyn Navigator) -> Result<Option<String>> {
        let links = container.select(&self.selector)?;
        Ok(first_canonical(&links, &self.pattern))
    }
}

/// Scans every link in the container.
pub struct BroadScan {
    pattern: Arc<ProfileLinkPattern>,
}

impl BroadScan {
    pub fn new(pattern: Arc<ProfileLinkPattern>) -> Self {
        Self { pattern }
    }
}

#[async_trait]
impl LinkStrategy for BroadScan {
    fn name(&self) -> &'static str {
        "broad-scan"
    }

    async fn resolve(&self, container: &Element, _: &dyn Navigator) -> Result<Option<String>> {
        let links = container.select("a")?;
        Ok(first_canonical(&links, &self.pattern))
    }
}

/// Clicks the result's title link and reads where the browser landed.
/// The previous page is restored on every path.
pub struct NavigateAndObserve {
    title_selector: String,
    pattern: Arc<ProfileLinkPattern>,
    settle: DelayConfig,
}

impl NavigateAndObserve {
    pub fn new(title_selector: &str, pattern: Arc<ProfileLinkPattern>, settle: DelayConfig) -> Self {
        Self {
            title_selector: title_selector.to_string(),
            pattern,
            settle,
        }
    }

    async fn follow(
        &self,
        navigator: &dyn Navigator,
        origin: &str,
        link: &Element,
    ) -> Result<Option<String>> {
        navigator.click(link).await?;
        self.settle.pause().await;

        let landed = navigator.current_url().await?;
        if landed == origin || !landed.contains(self.pattern.marker()) {
            debug!(%landed, "title link did not land on a profile");
            return Ok(None);
        }
        Ok(self.pattern.canonicalize(LinkCandidate::new(&landed)))
    }
}

#[async_trait]
impl LinkStrategy for NavigateAndObserve {
    fn name(&self) -> &'static str {
        "navigate-and-observe"
    }

    async fn resolve(
        &self,
        container: &Element,
        navigator: &dyn Navigator,
    ) -> Result<Option<String>> {
        let links = container.select(&self.title_selector)?;
        let Some(link) = links.first() else {
            return Ok(None);
        };

        let guard = NavigationGuard::enter(navigator).await?;
        let observed = self.follow(navigator, guard.origin(), link).await;
        let origin = guard.origin().to_string();
        if let Err(e) = guard.restore().await {
            warn!(%origin, error = %e, "could not return to search results");
        }
        self.settle.pause().await;

        observed
    }
}

/// Ordered strategy chain; the first strategy to produce a URL wins.
pub struct LinkResolver {
    strategies: Vec<Box<dyn LinkStrategy>>,
}

impl LinkResolver {
    pub fn new(strategies: Vec<Box<dyn LinkStrategy>>) -> Self {
        Self { strategies }
    }

    /// Direct-attribute scan, then broad scan, then navigate-and-observe.
    pub fn standard(
        extraction: &ExtractionConfig,
        search: &SearchConfig,
        settle: DelayConfig,
    ) -> Result<Self> {
        let pattern = Arc::new(ProfileLinkPattern::from_config(extraction)?);
        Ok(Self::new(vec![
            Box::new(DirectAttributeScan::new(pattern.clone())),
            Box::new(BroadScan::new(pattern.clone())),
            Box::new(NavigateAndObserve::new(
                &search.title_link_selector,
                pattern,
                settle,
            )),
        ]))
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// A failing strategy counts as a miss and the chain moves on.
    pub async fn resolve(&self, container: &Element, navigator: &dyn Navigator) -> Option<String> {
        for strategy in &self.strategies {
            match strategy.resolve(container, navigator).await {
                Ok(Some(url)) => {
                    debug!(strategy = strategy.name(), %url, "resolved profile url");
                    return Some(url);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "link strategy failed");
                }
            }
        }
        None
    }
}
