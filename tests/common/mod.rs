// tests/common/mod.rs
#![allow(dead_code)]

use alumni_scout_core::persist::remote::{RemoteRow, RemoteTable};
use alumni_scout_core::{Element, HarvestConfig, Navigator, PacingConfig, Result, ScraperError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

pub const SEARCH_PAGE: &str = "https://www.linkedin.com/search/results/people/?keywords=cit";
pub const SITE: &str = "https://www.linkedin.com";

/// Config with every think-time pause switched off.
pub fn fast_config() -> HarvestConfig {
    HarvestConfig {
        pacing: PacingConfig::disabled(),
        ..Default::default()
    }
}

/// One search result container: a text line per entry, then bare links.
pub fn container(lines: &[&str], hrefs: &[&str]) -> String {
    let mut html = String::from("<li class=\"entity-result\">");
    for line in lines {
        html.push_str(&format!("<div>{}</div>", line));
    }
    for href in hrefs {
        html.push_str(&format!("<a href=\"{}\"></a>", href));
    }
    html.push_str("</li>");
    html
}

/// A container whose only link is the title link around the name.
pub fn titled_container(name: &str, title_href: &str, lines: &[&str]) -> String {
    let mut html = format!(
        "<li class=\"entity-result\"><span class=\"entity-result__title-text\"><a href=\"{}\">{}</a></span>",
        title_href, name
    );
    for line in lines {
        html.push_str(&format!("<div>{}</div>", line));
    }
    html.push_str("</li>");
    html
}

pub fn results_page(containers: &[String]) -> String {
    format!(
        "<html><body><ul class=\"results\">{}</ul></body></html>",
        containers.concat()
    )
}

pub fn element(html: &str) -> Element {
    Element::from_html(html)
}

#[derive(Default)]
struct State {
    current: Option<String>,
    history: Vec<String>,
    visits: Vec<String>,
    clicks: usize,
    backs: usize,
    failing_reads: usize,
}

/// In-memory navigator over a fixed set of pages.
#[derive(Default)]
pub struct FakeNavigator {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    failing: HashSet<String>,
    hanging: HashSet<String>,
    fail_reads_after_click: usize,
    state: Mutex<State>,
}

impl FakeNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Visiting `from` lands on `to`.
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// `goto(url)` never completes.
    pub fn hanging_on(mut self, url: &str) -> Self {
        self.hanging.insert(url.to_string());
        self
    }

    /// The next `n` reads of the current address after a click fail.
    pub fn failing_reads_after_click(mut self, n: usize) -> Self {
        self.fail_reads_after_click = n;
        self
    }

    /// Starts the session on `url` without counting a visit.
    pub fn starting_at(self, url: &str) -> Self {
        self.state().current = Some(url.to_string());
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn clicks(&self) -> usize {
        self.state().clicks
    }

    pub fn backs(&self) -> usize {
        self.state().backs
    }

    pub fn visits(&self) -> Vec<String> {
        self.state().visits.clone()
    }

    pub fn location(&self) -> Option<String> {
        self.state().current.clone()
    }
}

#[async_trait]
impl Navigator for FakeNavigator {
    async fn goto(&self, url: &str) -> Result<()> {
        if self.hanging.contains(url) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(url) {
            return Err(ScraperError::NavigationError(format!("cannot load {}", url)));
        }
        let landed = self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        let mut state = self.state();
        if let Some(prev) = state.current.take() {
            state.history.push(prev);
        }
        state.visits.push(url.to_string());
        state.current = Some(landed);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let mut state = self.state();
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(ScraperError::NavigationError("page crashed".to_string()));
        }
        Ok(state.current.clone().unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn page_text(&self) -> Result<String> {
        let current = self.state().current.clone().unwrap_or_default();
        let html = self.pages.get(&current).cloned().unwrap_or_default();
        Ok(Element::from_html(format!("<div>{}</div>", html)).text())
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Element>> {
        let current = self.state().current.clone().unwrap_or_default();
        let html = self.pages.get(&current).cloned().unwrap_or_default();
        Element::from_html(format!("<div>{}</div>", html)).select(selector)
    }

    async fn click(&self, element: &Element) -> Result<()> {
        let href = element
            .attr("href")
            .ok_or_else(|| ScraperError::ElementNotFound("href".to_string()))?;
        let target = if href.starts_with('/') {
            format!("{}{}", SITE, href)
        } else {
            href
        };
        self.state().clicks += 1;
        self.goto(&target).await?;
        let mut state = self.state();
        state.failing_reads = self.fail_reads_after_click;
        Ok(())
    }

    async fn back(&self) -> Result<()> {
        let mut state = self.state();
        state.backs += 1;
        let prev = state
            .history
            .pop()
            .ok_or_else(|| ScraperError::NavigationError("no history".to_string()))?;
        state.current = Some(prev);
        Ok(())
    }
}

/// Remote table kept in memory.
#[derive(Default)]
pub struct MemoryTable {
    rows: Mutex<Vec<RemoteRow>>,
    reject_names: HashSet<String>,
    fail_delete: bool,
}

impl MemoryTable {
    pub fn with_rows(rows: Vec<RemoteRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn rejecting(mut self, name: &str) -> Self {
        self.reject_names.insert(name.to_string());
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn rows(&self) -> Vec<RemoteRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteTable for MemoryTable {
    async fn delete_all(&self) -> Result<()> {
        if self.fail_delete {
            return Err(ScraperError::PersistenceError("delete refused".to_string()));
        }
        self.rows.lock().unwrap().clear();
        Ok(())
    }

    async fn insert(&self, row: &RemoteRow) -> Result<bool> {
        if self.reject_names.contains(&row.name) {
            return Err(ScraperError::PersistenceError("insert refused".to_string()));
        }
        self.rows.lock().unwrap().push(row.clone());
        Ok(true)
    }
}

/// Shares a [`MemoryTable`] between a test and the pipeline that owns a box.
pub struct SharedTable(pub std::sync::Arc<MemoryTable>);

#[async_trait]
impl RemoteTable for SharedTable {
    async fn delete_all(&self) -> Result<()> {
        self.0.delete_all().await
    }

    async fn insert(&self, row: &RemoteRow) -> Result<bool> {
        self.0.insert(row).await
    }
}
