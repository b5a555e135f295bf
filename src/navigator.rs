use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// A detached snapshot of one element: its outer HTML.
///
/// Snapshots outlive the page they came from, so a result container can be
/// inspected after the navigator has moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    html: String,
}

impl Element {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub(crate) fn from_ref(element: ElementRef<'_>) -> Self {
        Self::from_html(element.html())
    }

    pub fn outer_html(&self) -> &str {
        &self.html
    }

    /// Visible text split into display lines, in document order.
    pub fn lines(&self) -> Vec<String> {
        let fragment = Html::parse_fragment(&self.html);
        match root_of(&fragment) {
            Some(root) => text_lines(root),
            None => Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }

    /// Value of an attribute on the snapshot's root element.
    pub fn attr(&self, name: &str) -> Option<String> {
        let fragment = Html::parse_fragment(&self.html);
        root_of(&fragment)?.value().attr(name).map(str::to_string)
    }

    /// Descendants matching a CSS selector, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<Element>> {
        let selector = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.html);
        let Some(root) = root_of(&fragment) else {
            return Ok(Vec::new());
        };
        Ok(root.select(&selector).map(Element::from_ref).collect())
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScraperError::InvalidSelector(format!("{}: {:?}", selector, e)))
}

/// Elements that start a new display line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

/// Elements whose text never renders.
const HIDDEN_TAGS: &[&str] = &["head", "noscript", "script", "style", "template", "title"];

/// Rendered lines of an element: inline text is joined, whitespace is
/// collapsed, and a line ends at block boundaries and `<br>`.
pub(crate) fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    collect_lines(element, &mut current, &mut lines);
    end_line(&mut current, &mut lines);
    lines
}

fn collect_lines(element: ElementRef<'_>, current: &mut String, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            current.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        let tag = child.value().name();
        if tag == "br" {
            end_line(current, lines);
            continue;
        }
        if HIDDEN_TAGS.contains(&tag) {
            continue;
        }

        let block = BLOCK_TAGS.contains(&tag);
        if block {
            end_line(current, lines);
        }
        collect_lines(child, current, lines);
        if block {
            end_line(current, lines);
        }
    }
}

fn end_line(current: &mut String, lines: &mut Vec<String>) {
    let line = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

fn root_of(fragment: &Html) -> Option<ElementRef<'_>> {
    fragment.root_element().children().find_map(ElementRef::wrap)
}

/// The browsing session the scraper drives.
///
/// Every call blocks until the page-level response for it has been observed.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Loads an address and makes it the current page.
    async fn goto(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Rendered text of the whole current page.
    async fn page_text(&self) -> Result<String>;

    /// Elements on the current page matching a CSS selector.
    async fn find_elements(&self, selector: &str) -> Result<Vec<Element>>;

    /// Activates an element, typically following a link.
    async fn click(&self, element: &Element) -> Result<()>;

    /// Returns to the previous page.
    async fn back(&self) -> Result<()>;

    /// Scrolls to the bottom so lazily loaded results render.
    async fn scroll(&self) -> Result<()> {
        Ok(())
    }
}

/// Remembers the current page and brings the navigator back to it.
///
/// Call [`NavigationGuard::restore`] on every path out of the guarded block.
/// Dropping an unrestored guard only logs, since restoring needs to await.
pub struct NavigationGuard<'a> {
    navigator: &'a dyn Navigator,
    origin: String,
    restored: bool,
}

impl<'a> NavigationGuard<'a> {
    pub async fn enter(navigator: &'a dyn Navigator) -> Result<Self> {
        let origin = navigator.current_url().await?;
        Ok(Self {
            navigator,
            origin,
            restored: false,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Goes back if the page changed. Falls back to reloading the origin when
    /// `back` fails.
    pub async fn restore(mut self) -> Result<()> {
        self.restored = true;

        let moved = match self.navigator.current_url().await {
            Ok(url) => url != self.origin,
            Err(_) => true,
        };
        if !moved {
            return Ok(());
        }

        if let Err(e) = self.navigator.back().await {
            warn!(origin = %self.origin, error = %e, "back failed, reloading origin");
            self.navigator.goto(&self.origin).await?;
        }
        Ok(())
    }
}

impl Drop for NavigationGuard<'_> {
    fn drop(&mut self) {
        if !self.restored {
            warn!(origin = %self.origin, "navigation guard dropped without restoring");
        }
    }
}
