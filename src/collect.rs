//! Scroll-driven collection of one listing.
//!
//! A pass locates every item container on the page, extracts the ones past
//! the cursor, then scrolls and re-counts. Feeds only ever append, so items
//! before the cursor have been handled and are never extracted again.
//! Element handles do not outlive a pass.

use crate::config::{HarvestConfig, TargetConfig};
use crate::error::SessionError;
use crate::extract::ItemExtractor;
use crate::locator::locate;
use crate::pagination::{Clock, Paginator};
use crate::session::Page;
use crate::text;
use std::time::Duration;

/// Why a collection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The item cap was reached
    CapReached,
    /// The maximum number of scrolls was used up
    ScrollLimit,
    /// A scroll produced no new items; end of the feed
    Stagnated,
    /// The document body never appeared
    NavigationTimeout,
    /// The page says the profile is missing or private
    ProfileUnavailable,
    /// No container pattern matched anything on the page
    StructureMismatch,
}

/// Records gathered from one listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<R> {
    pub records: Vec<R>,
    pub stop: StopReason,
    pub scrolls: usize,
}

impl<R> Collection<R> {
    fn empty(stop: StopReason) -> Self {
        Self {
            records: Vec::new(),
            stop,
            scrolls: 0,
        }
    }
}

/// Outcome of looking for item containers in one pass
enum Pass<E> {
    Items(Vec<E>),
    Unavailable,
    Unrecognized,
}

/// Runs the collection state machine against a page
pub struct Collector<'a, C> {
    paginator: Paginator<'a, C>,
    clock: &'a C,
    navigation_settle: Duration,
    body_timeout: Duration,
    not_found_markers: &'a [String],
}

impl<'a, C: Clock> Collector<'a, C> {
    pub fn new(config: &'a HarvestConfig, clock: &'a C) -> Self {
        Self {
            paginator: Paginator::new(clock, config.scroll_settle()),
            clock,
            navigation_settle: config.navigation_settle(),
            body_timeout: config.body_timeout(),
            not_found_markers: &config.not_found_markers,
        }
    }

    /// Collects up to `target.max_items` records from the listing at `url`.
    ///
    /// Page-level problems end the collection early with whatever was
    /// gathered. Only a failing session is returned as an error.
    pub async fn collect<P, X>(
        &self,
        page: &P,
        url: &str,
        target: &TargetConfig,
        extractor: &X,
    ) -> Result<Collection<X::Record>, SessionError>
    where
        P: Page,
        X: ItemExtractor,
    {
        let kind = X::KIND;
        ::log::info!("Scraping {} from: {}", kind, url);

        page.goto(url).await?;
        self.clock.sleep(self.navigation_settle).await;

        match page.title().await {
            Ok(title) => ::log::info!("Page title: {}", title),
            Err(e) => ::log::debug!("Could not read page title: {}", e),
        }

        if !page.wait_for_body(self.body_timeout).await? {
            ::log::warn!("Page failed to load properly: {}", url);
            return Ok(Collection::empty(StopReason::NavigationTimeout));
        }
        ::log::debug!("Page body loaded successfully");

        let mut records = Vec::new();
        let mut cursor = 0;
        let mut scrolls = 0;
        let mut first_pass = true;

        let stop = loop {
            if records.len() >= target.max_items {
                break StopReason::CapReached;
            }

            let items = match self.find_items(page, target, kind, first_pass).await? {
                Pass::Items(items) => items,
                Pass::Unavailable => return Ok(Collection::empty(StopReason::ProfileUnavailable)),
                Pass::Unrecognized => break StopReason::StructureMismatch,
            };
            first_pass = false;

            let matched = items.len();
            let before = records.len();
            for item in items.iter().skip(cursor) {
                cursor += 1;
                if let Some(record) = extractor.extract(item).await {
                    if extractor.accepts(&record) {
                        records.push(record);
                    }
                }
                if records.len() >= target.max_items {
                    break;
                }
            }
            // Handles are stale once the page grows
            drop(items);

            ::log::info!(
                "Added {} new {}, total: {}",
                records.len() - before,
                kind,
                records.len()
            );

            if records.len() >= target.max_items {
                break StopReason::CapReached;
            }
            if scrolls >= target.max_scrolls {
                break StopReason::ScrollLimit;
            }

            self.paginator.grow(page).await?;
            self.paginator.settle().await;
            scrolls += 1;

            let grown = self
                .paginator
                .snapshot_item_count(page, &target.items)
                .await?;
            if target.stagnation.is_stagnant(matched, grown) {
                ::log::info!("No new {} found after scrolling", kind);
                break StopReason::Stagnated;
            }
            ::log::debug!("{} {} after scroll {} (was {})", grown, kind, scrolls, matched);
        };

        ::log::info!(
            "Finished {}: {} collected after {} scrolls ({:?})",
            kind,
            records.len(),
            scrolls,
            stop
        );
        Ok(Collection {
            records,
            stop,
            scrolls,
        })
    }

    async fn find_items<P: Page>(
        &self,
        page: &P,
        target: &TargetConfig,
        kind: &str,
        first_pass: bool,
    ) -> Result<Pass<P::Element>, SessionError> {
        let located = locate(page, &target.items).await?;
        if let Some(pattern) = &located.pattern {
            ::log::info!("Found {} {} using selector: {}", located.len(), kind, pattern);
            return Ok(Pass::Items(located.elements));
        }

        ::log::warn!("No {} found with any selector", kind);
        let source = page.source().await?;

        if first_pass && text::contains_any(&source, self.not_found_markers) {
            ::log::warn!("User doesn't exist or profile is private");
            return Ok(Pass::Unavailable);
        }

        if let Some(fallback) = &target.fallback {
            if text::contains_any_ignore_case(&source, &fallback.hints) {
                ::log::info!("Page contains {}-related content, trying alternative selectors", kind);
                let located = locate(page, &fallback.items).await?;
                if let Some(pattern) = &located.pattern {
                    ::log::info!(
                        "Found {} elements with alternative selector: {}",
                        located.len(),
                        pattern
                    );
                    return Ok(Pass::Items(located.elements));
                }
            }
        }

        ::log::debug!("Page source preview: {}", text::preview(&source, 1000));
        Ok(Pass::Unrecognized)
    }
}
