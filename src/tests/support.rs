use crate::error::SessionError;
use crate::pagination::Clock;
use crate::session::snapshot::SnapshotElement;
use crate::session::{Page, PageElement, Scope, SnapshotPage};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub const POSTS_URL: &str = "https://www.reddit.com/user/someone/submitted/";
pub const COMMENTS_URL: &str = "https://www.reddit.com/user/someone/comments/";

/// Clock that returns immediately and remembers what it was asked to wait
#[derive(Default)]
pub struct InstantClock {
    pub slept: RefCell<Vec<Duration>>,
}

impl Clock for InstantClock {
    async fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

pub fn post(title: &str, body: &str) -> String {
    format!(
        r#"<div data-testid="post-container"><h3>{title}</h3><div data-testid="post-text">{body}</div><a href="/r/rust/">r/rust</a></div>"#
    )
}

pub fn numbered_posts(range: std::ops::Range<usize>) -> Vec<String> {
    range
        .map(|i| post(&format!("Post {}", i), &format!("Body text of post number {}", i)))
        .collect()
}

pub fn comment(text: &str) -> String {
    format!(r#"<shreddit-comment><div slot="comment-body"><p>{text}</p></div></shreddit-comment>"#)
}

pub fn listing(items: &[String]) -> String {
    format!(
        "<html><head><title>listing</title></head><body><main>{}</main></body></html>",
        items.concat()
    )
}

/// Snapshot page whose elements marked `data-flaky` fail like detached
/// nodes, and which can be told to lose the session on scroll.
pub struct FlakyPage {
    inner: SnapshotPage,
    fail_scroll: bool,
    closed: Rc<Cell<usize>>,
}

impl FlakyPage {
    pub fn new(inner: SnapshotPage) -> Self {
        Self {
            inner,
            fail_scroll: false,
            closed: Rc::new(Cell::new(0)),
        }
    }

    pub fn failing_on_scroll(mut self) -> Self {
        self.fail_scroll = true;
        self
    }

    /// Shared counter of `close` calls, readable after the page is consumed
    pub fn close_count(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closed)
    }
}

pub struct FlakyElement(SnapshotElement);

impl FlakyElement {
    fn is_flaky(&self) -> bool {
        self.0.html().contains("data-flaky")
    }
}

impl Scope for FlakyPage {
    type Element = FlakyElement;

    async fn find_all(&self, css: &str) -> Result<Vec<FlakyElement>, SessionError> {
        let found = self.inner.find_all(css).await?;
        Ok(found.into_iter().map(FlakyElement).collect())
    }
}

impl Page for FlakyPage {
    async fn goto(&self, url: &str) -> Result<(), SessionError> {
        self.inner.goto(url).await
    }

    async fn title(&self) -> Result<String, SessionError> {
        self.inner.title().await
    }

    async fn wait_for_body(&self, timeout: Duration) -> Result<bool, SessionError> {
        self.inner.wait_for_body(timeout).await
    }

    async fn source(&self) -> Result<String, SessionError> {
        self.inner.source().await
    }

    async fn scroll_to_bottom(&self) -> Result<(), SessionError> {
        if self.fail_scroll {
            return Err(SessionError::Snapshot {
                path: "browser".to_string(),
                source: std::io::Error::other("browser crashed"),
            });
        }
        self.inner.scroll_to_bottom().await
    }

    async fn close(self) -> Result<(), SessionError> {
        self.closed.set(self.closed.get() + 1);
        self.inner.close().await
    }
}

impl Scope for FlakyElement {
    type Element = FlakyElement;

    async fn find_all(&self, css: &str) -> Result<Vec<FlakyElement>, SessionError> {
        if self.is_flaky() {
            return Err(SessionError::StaleElement);
        }
        let found = self.0.find_all(css).await?;
        Ok(found.into_iter().map(FlakyElement).collect())
    }
}

impl PageElement for FlakyElement {
    async fn text(&self) -> Result<String, SessionError> {
        if self.is_flaky() {
            return Err(SessionError::StaleElement);
        }
        self.0.text().await
    }
}
