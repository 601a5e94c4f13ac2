use crate::error::SessionError;
use crate::locator::locate;
use crate::selectors::SelectorChain;
use crate::session::Page;
use std::time::Duration;

/// Source of fixed pauses.
///
/// The target page gives no reliable "finished loading" signal, so the
/// collector waits fixed durations. Tests substitute a clock that returns
/// immediately.
#[allow(async_fn_in_trait)]
pub trait Clock {
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Grows an infinitely scrolling listing and measures it
pub struct Paginator<'a, C> {
    clock: &'a C,
    settle: Duration,
}

impl<'a, C: Clock> Paginator<'a, C> {
    pub fn new(clock: &'a C, settle: Duration) -> Self {
        Self { clock, settle }
    }

    /// Scrolls to the bottom so the page appends more items
    pub async fn grow<P: Page>(&self, page: &P) -> Result<(), SessionError> {
        page.scroll_to_bottom().await
    }

    /// Gives asynchronously rendered items time to appear
    pub async fn settle(&self) {
        self.clock.sleep(self.settle).await;
    }

    /// Number of items the chain currently locates on the page
    pub async fn snapshot_item_count<P: Page>(
        &self,
        page: &P,
        chain: &SelectorChain,
    ) -> Result<usize, SessionError> {
        Ok(locate(page, chain).await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SnapshotPage;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingClock {
        slept: RefCell<Vec<Duration>>,
    }

    impl Clock for RecordingClock {
        async fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
        }
    }

    #[tokio::test]
    async fn test_grow_settle_and_count() {
        let page = SnapshotPage::new().with_route(
            "u",
            [
                "<body><article>1</article></body>",
                "<body><article>1</article><article>2</article><article>3</article></body>",
            ],
        );
        page.goto("u").await.unwrap();

        let clock = RecordingClock::default();
        let paginator = Paginator::new(&clock, Duration::from_secs(3));
        let chain = SelectorChain::new(["div.Post", "article"]);

        assert_eq!(paginator.snapshot_item_count(&page, &chain).await.unwrap(), 1);
        paginator.grow(&page).await.unwrap();
        paginator.settle().await;
        assert_eq!(paginator.snapshot_item_count(&page, &chain).await.unwrap(), 3);
        assert_eq!(*clock.slept.borrow(), vec![Duration::from_secs(3)]);
    }

    #[tokio::test]
    async fn test_tokio_clock_sleeps() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
