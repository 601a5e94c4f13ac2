//! Offline page backed by captured HTML.
//!
//! Each URL maps to an ordered list of snapshots of the same listing. Every
//! scroll advances to the next snapshot, which mimics a feed that appends
//! items as it is scrolled. A URL without snapshots never renders a body.

use crate::error::SessionError;
use crate::session::{Page, PageElement, Scope};
use scraper::{ElementRef, Html, Selector};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct SnapshotPage {
    routes: HashMap<String, Vec<String>>,
    current: RefCell<Option<String>>,
    position: Cell<usize>,
}

/// An element of a snapshot, held as its own outer HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotElement {
    html: String,
}

impl SnapshotPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the snapshots served for `url`, oldest first
    pub fn with_route<I, S>(mut self, url: &str, snapshots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes
            .insert(url.to_string(), snapshots.into_iter().map(Into::into).collect());
        self
    }

    /// Loads `{prefix}-*.html` files from `dir`, sorted by name, for each
    /// `(prefix, url)` pair
    pub fn from_dir(dir: &Path, routes: &[(&str, &str)]) -> Result<Self, SessionError> {
        let entries = fs::read_dir(dir).map_err(|source| SessionError::Snapshot {
            path: dir.display().to_string(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SessionError::Snapshot {
                path: dir.display().to_string(),
                source,
            })?;
            files.push(entry.path());
        }
        files.sort();

        let mut page = Self::new();
        for (prefix, url) in routes {
            let mut snapshots = Vec::new();
            for path in &files {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if !(name.starts_with(&format!("{}-", prefix)) && name.ends_with(".html")) {
                    continue;
                }
                let html = fs::read_to_string(path).map_err(|source| SessionError::Snapshot {
                    path: path.display().to_string(),
                    source,
                })?;
                snapshots.push(html);
            }
            ::log::debug!("Loaded {} snapshots for {}", snapshots.len(), url);
            page = page.with_route(url, snapshots);
        }
        Ok(page)
    }

    fn current_html(&self) -> Option<String> {
        let current = self.current.borrow();
        let snapshots = self.routes.get(current.as_deref()?)?;
        let last = snapshots.len().checked_sub(1)?;
        snapshots.get(self.position.get().min(last)).cloned()
    }

    fn current_document(&self) -> Html {
        Html::parse_document(&self.current_html().unwrap_or_default())
    }
}

fn parse_selector(css: &str) -> Result<Selector, SessionError> {
    Selector::parse(css).map_err(|_| SessionError::InvalidSelector {
        pattern: css.to_string(),
    })
}

impl Scope for SnapshotPage {
    type Element = SnapshotElement;

    async fn find_all(&self, css: &str) -> Result<Vec<SnapshotElement>, SessionError> {
        let selector = parse_selector(css)?;
        let doc = self.current_document();
        Ok(doc
            .select(&selector)
            .map(|el| SnapshotElement { html: el.html() })
            .collect())
    }
}

impl Page for SnapshotPage {
    async fn goto(&self, url: &str) -> Result<(), SessionError> {
        *self.current.borrow_mut() = Some(url.to_string());
        self.position.set(0);
        Ok(())
    }

    async fn title(&self) -> Result<String, SessionError> {
        let selector = parse_selector("title")?;
        let doc = self.current_document();
        Ok(doc
            .select(&selector)
            .next()
            .map(|t| t.text().collect::<String>())
            .unwrap_or_default())
    }

    async fn wait_for_body(&self, _timeout: Duration) -> Result<bool, SessionError> {
        Ok(self.current_html().is_some())
    }

    async fn source(&self) -> Result<String, SessionError> {
        Ok(self.current_html().unwrap_or_default())
    }

    async fn scroll_to_bottom(&self) -> Result<(), SessionError> {
        self.position.set(self.position.get() + 1);
        Ok(())
    }

    async fn close(self) -> Result<(), SessionError> {
        Ok(())
    }
}

impl SnapshotElement {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl Scope for SnapshotElement {
    type Element = SnapshotElement;

    async fn find_all(&self, css: &str) -> Result<Vec<SnapshotElement>, SessionError> {
        let selector = parse_selector(css)?;
        let fragment = Html::parse_fragment(&self.html);
        let Some(item) = fragment.root_element().children().find_map(ElementRef::wrap) else {
            return Ok(Vec::new());
        };

        // Scoped queries see descendants only, like a browser's element query
        Ok(fragment
            .select(&selector)
            .filter(|el| el.id() != item.id())
            .map(|el| SnapshotElement { html: el.html() })
            .collect())
    }
}

impl PageElement for SnapshotElement {
    async fn text(&self) -> Result<String, SessionError> {
        let fragment = Html::parse_fragment(&self.html);
        Ok(fragment.root_element().text().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><head><title>overview for someone</title></head><body>
        <article><h3>First</h3><p>Body of the first post</p></article>
        <article><h3>Second</h3></article>
    </body></html>"#;

    #[tokio::test]
    async fn test_page_queries() {
        let page = SnapshotPage::new().with_route("https://example.com/a", [LISTING]);
        page.goto("https://example.com/a").await.unwrap();

        assert!(page.wait_for_body(Duration::ZERO).await.unwrap());
        assert_eq!(page.title().await.unwrap(), "overview for someone");

        let articles = page.find_all("article").await.unwrap();
        assert_eq!(articles.len(), 2);

        let titles = articles[0].find_all("h3").await.unwrap();
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].text().await.unwrap(), "First");
    }

    #[tokio::test]
    async fn test_scoped_query_excludes_the_element_itself() {
        let el = SnapshotElement::new("<div class=\"x\"><div class=\"x\">inner</div></div>");
        let found = el.find_all("div.x").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text().await.unwrap(), "inner");
    }

    #[tokio::test]
    async fn test_scroll_advances_and_saturates() {
        let page = SnapshotPage::new().with_route(
            "u",
            [
                "<body><p>1</p></body>",
                "<body><p>1</p><p>2</p></body>",
            ],
        );
        page.goto("u").await.unwrap();
        assert_eq!(page.find_all("p").await.unwrap().len(), 1);
        page.scroll_to_bottom().await.unwrap();
        assert_eq!(page.find_all("p").await.unwrap().len(), 2);
        page.scroll_to_bottom().await.unwrap();
        assert_eq!(page.find_all("p").await.unwrap().len(), 2);

        // Navigating again starts from the first snapshot
        page.goto("u").await.unwrap();
        assert_eq!(page.find_all("p").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_never_renders() {
        let page = SnapshotPage::new();
        page.goto("https://example.com/missing").await.unwrap();
        assert!(!page.wait_for_body(Duration::from_secs(10)).await.unwrap());
        assert!(page.find_all("article").await.unwrap().is_empty());
        assert_eq!(page.source().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_invalid_selector() {
        let page = SnapshotPage::new().with_route("u", [LISTING]);
        page.goto("u").await.unwrap();
        assert!(matches!(
            page.find_all("div[[").await,
            Err(SessionError::InvalidSelector { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("posts-1.html"), "<body><p>b</p><p>c</p></body>").unwrap();
        fs::write(dir.path().join("posts-0.html"), "<body><p>a</p></body>").unwrap();
        fs::write(dir.path().join("comments-0.html"), "<body></body>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let page =
            SnapshotPage::from_dir(dir.path(), &[("posts", "p"), ("comments", "c")]).unwrap();
        page.goto("p").await.unwrap();
        assert_eq!(page.find_all("p").await.unwrap().len(), 1);
        page.scroll_to_bottom().await.unwrap();
        assert_eq!(page.find_all("p").await.unwrap().len(), 2);

        page.goto("c").await.unwrap();
        assert!(page.wait_for_body(Duration::ZERO).await.unwrap());
        assert!(page.find_all("p").await.unwrap().is_empty());
    }
}
