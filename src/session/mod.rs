//! Browser session abstraction.
//!
//! The collection engine only talks to these traits, so the same loop runs
//! against a live WebDriver session or against captured HTML snapshots.

pub mod snapshot;
pub mod webdriver;

pub use snapshot::SnapshotPage;
pub use webdriver::WebDriverSession;

use crate::error::SessionError;
use std::time::Duration;

/// Something CSS patterns can be evaluated against: the whole page or one
/// item element.
#[allow(async_fn_in_trait)]
pub trait Scope {
    type Element: PageElement;

    /// All elements matching `css` within this scope, in document order
    async fn find_all(&self, css: &str) -> Result<Vec<Self::Element>, SessionError>;
}

/// A rendered node. Handles are only valid until the page next mutates.
#[allow(async_fn_in_trait)]
pub trait PageElement: Scope<Element = Self> + Sized {
    /// Rendered text of the element, including descendants
    async fn text(&self) -> Result<String, SessionError>;
}

/// A live document bound to one navigation target at a time.
#[allow(async_fn_in_trait)]
pub trait Page: Scope {
    async fn goto(&self, url: &str) -> Result<(), SessionError>;

    async fn title(&self) -> Result<String, SessionError>;

    /// Waits up to `timeout` for the document body.
    ///
    /// Returns `Ok(false)` on timeout; that is a page that failed to
    /// render, not a broken session.
    async fn wait_for_body(&self, timeout: Duration) -> Result<bool, SessionError>;

    async fn source(&self) -> Result<String, SessionError>;

    /// Scrolls to the bottom of the document so the page loads more items
    async fn scroll_to_bottom(&self) -> Result<(), SessionError>;

    /// Releases the session. Consumes the handle so it can only happen once.
    async fn close(self) -> Result<(), SessionError>;
}
