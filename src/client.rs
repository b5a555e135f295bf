use crate::config::Credentials;
use crate::error::{Result, ScraperError};
use crate::models::DelayConfig;
use crate::navigator::{self, Element, Navigator};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::Html;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

const LOGIN_PAGE_URL: &str = "https://www.linkedin.com/login";
const LOGIN_SUBMIT_URL: &str = "https://www.linkedin.com/checkpoint/lg/login-submit";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BLANK_PAGE: &str = "about:blank";

/// Pages kept for `back`; older ones are forgotten.
pub const HISTORY_LIMIT: usize = 8;

/// Addresses that only a signed-in session lands on.
const SIGNED_IN_MARKERS: &[&str] = &["feed", "mynetwork", "/in/"];

#[derive(Debug, Clone)]
struct Page {
    url: String,
    html: String,
}

#[derive(Default)]
struct History {
    current: Option<Page>,
    previous: Vec<Page>,
}

/// A [`Navigator`] over plain HTTP: a cookie-keeping reqwest client plus a
/// page history. Clicking follows the element's `href`.
pub struct HttpNavigator {
    client: reqwest::Client,
    delay_config: DelayConfig,
    history: Mutex<History>,
}

impl HttpNavigator {
    pub fn new() -> Result<Self> {
        Self::with_config(DelayConfig::default())
    }

    pub fn with_config(delay_config: DelayConfig) -> Result<Self> {
        let cookie_jar = Arc::new(Jar::default());

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = reqwest::Client::builder()
            .cookie_provider(cookie_jar)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            delay_config,
            history: Mutex::new(History::default()),
        })
    }

    fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn current_page(&self) -> Result<Page> {
        self.history()
            .current
            .clone()
            .ok_or_else(|| ScraperError::NavigationError("no page loaded".to_string()))
    }

    fn visit(&self, page: Page) {
        let mut history = self.history();
        if let Some(prev) = history.current.take() {
            history.previous.push(prev);
            if history.previous.len() > HISTORY_LIMIT {
                history.previous.remove(0);
            }
        }
        history.current = Some(page);
    }

    async fn fetch(&self, url: &str) -> Result<Page> {
        self.delay_config.pause().await;
        let response = self.client.get(url).send().await?.error_for_status()?;
        let final_url = response.url().to_string();
        let html = response.text().await?;
        debug!(requested = url, landed = %final_url, "fetched page");
        Ok(Page {
            url: final_url,
            html,
        })
    }

    /// Signs in with the site's login form, keeping the session cookies.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        info!("logging in");
        let login_page = self.fetch(LOGIN_PAGE_URL).await?;
        let form = parse_login_form(&login_page)?;

        let mut params = HashMap::new();
        params.insert("session_key", credentials.username.as_str());
        params.insert("session_password", credentials.password.as_str());
        params.insert("loginCsrfParam", form.csrf_token.as_str());

        self.delay_config.pause().await;
        let response = self
            .client
            .post(form.action.as_str())
            .form(&params)
            .send()
            .await?;

        let final_url = response.url().to_string();
        let html = response.text().await?;

        if final_url.contains("/login") {
            warn!(%final_url, "still on the login page");
            return Err(ScraperError::AuthenticationFailed);
        }
        if SIGNED_IN_MARKERS.iter().any(|m| final_url.contains(m)) {
            info!("login successful");
        } else {
            warn!(%final_url, "login status unclear, continuing anyway");
        }

        self.visit(Page {
            url: final_url,
            html,
        });
        Ok(())
    }
}

struct LoginForm {
    action: String,
    csrf_token: String,
}

fn parse_login_form(page: &Page) -> Result<LoginForm> {
    let document = Html::parse_document(&page.html);

    let token_selector = navigator::parse_selector("input[name=\"loginCsrfParam\"]")?;
    let csrf_token = document
        .select(&token_selector)
        .next()
        .and_then(|element| element.value().attr("value"))
        .ok_or(ScraperError::TokenNotFound)?
        .to_string();

    let form_selector = navigator::parse_selector("form[action*=\"login-submit\"]")?;
    let action = document
        .select(&form_selector)
        .next()
        .and_then(|form| form.value().attr("action"))
        .and_then(|action| resolve_href(&page.url, action).ok())
        .unwrap_or_else(|| LOGIN_SUBMIT_URL.to_string());

    Ok(LoginForm { action, csrf_token })
}

fn resolve_href(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base)
        .map_err(|e| ScraperError::NavigationError(format!("bad base url {}: {}", base, e)))?;
    let joined = base
        .join(href)
        .map_err(|e| ScraperError::NavigationError(format!("bad link {}: {}", href, e)))?;
    Ok(joined.to_string())
}

fn select_elements(html: &str, selector: &str) -> Result<Vec<Element>> {
    let selector = navigator::parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).map(Element::from_ref).collect())
}

fn page_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    navigator::text_lines(document.root_element())
}

#[async_trait]
impl Navigator for HttpNavigator {
    async fn goto(&self, url: &str) -> Result<()> {
        let page = self.fetch(url).await?;
        self.visit(page);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .history()
            .current
            .as_ref()
            .map(|page| page.url.clone())
            .unwrap_or_else(|| BLANK_PAGE.to_string()))
    }

    async fn page_text(&self) -> Result<String> {
        let page = self.current_page()?;
        Ok(page_lines(&page.html).join("\n"))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Element>> {
        let page = self.current_page()?;
        select_elements(&page.html, selector)
    }

    async fn click(&self, element: &Element) -> Result<()> {
        let href = element
            .attr("href")
            .ok_or_else(|| ScraperError::ElementNotFound("href on clicked element".to_string()))?;
        let base = self.current_url().await?;
        let target = resolve_href(&base, &href)?;
        self.goto(&target).await
    }

    async fn back(&self) -> Result<()> {
        let mut history = self.history();
        let prev = history
            .previous
            .pop()
            .ok_or_else(|| ScraperError::NavigationError("no page to go back to".to_string()))?;
        history.current = Some(prev);
        Ok(())
    }
}
