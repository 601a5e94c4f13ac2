pub mod collect;
pub mod config;
pub mod error;
pub mod extract;
pub mod locator;
pub mod pagination;
pub mod persona;
pub mod profile;
pub mod results;
pub mod selectors;
pub mod session;
pub mod text;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use config::HarvestConfig;
pub use error::{ConfigError, HarvestError, SessionError};
pub use profile::{Listing, Profile};
pub use results::{CommentRecord, Harvest, PostRecord};

use collect::Collector;
use extract::{CommentExtractor, PostExtractor};
use pagination::{Clock, TokioClock};
use session::{Page, SnapshotPage, WebDriverSession};
use std::path::Path;

/// Collects a profile's posts and comments.
///
/// Owns the browser session for the duration of one [`Harvester::collect`]
/// call and always releases it, whether collection finishes or fails.
pub struct Harvester<C = TokioClock> {
    config: HarvestConfig,
    clock: C,
}

impl Default for Harvester<TokioClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl Harvester<TokioClock> {
    /// Create a harvester with default settings
    pub fn new() -> Self {
        Self::with_config(HarvestConfig::default())
    }

    pub fn with_config(config: HarvestConfig) -> Self {
        Self {
            config,
            clock: TokioClock,
        }
    }
}

impl<C: Clock> Harvester<C> {
    /// Replace the clock used for settle pauses
    pub fn with_clock<D: Clock>(self, clock: D) -> Harvester<D> {
        Harvester {
            config: self.config,
            clock,
        }
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        self.config = HarvestConfig::from_file(path)?;
        Ok(self)
    }

    /// Set the maximum number of posts to collect
    pub fn with_max_posts(mut self, max_posts: usize) -> Self {
        self.config.posts.max_items = max_posts;
        self
    }

    /// Set the maximum number of comments to collect
    pub fn with_max_comments(mut self, max_comments: usize) -> Self {
        self.config.comments.max_items = max_comments;
        self
    }

    /// Set how many times each listing may be scrolled
    pub fn with_max_scrolls(mut self, posts: usize, comments: usize) -> Self {
        self.config.posts.max_scrolls = posts;
        self.config.comments.max_scrolls = comments;
        self
    }

    /// Run the browser with or without a window
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = url.into();
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Launch a browser session and collect posts, then comments
    pub async fn collect(&self, username: &str) -> Result<Harvest, HarvestError> {
        let profile = Profile::parse(username)?;
        self.config.validate()?;

        let session = WebDriverSession::launch(&self.config).await?;
        self.collect_with(session, &profile).await
    }

    /// Collect from captured HTML snapshots instead of a live browser.
    ///
    /// `dir` holds `posts-*.html` and `comments-*.html`, one file per
    /// scroll position, in name order.
    pub async fn replay(&self, username: &str, dir: &Path) -> Result<Harvest, HarvestError> {
        let profile = Profile::parse(username)?;
        self.config.validate()?;

        let posts_url = profile.listing_url(&self.config.base_url, Listing::Posts)?;
        let comments_url = profile.listing_url(&self.config.base_url, Listing::Comments)?;
        let page = SnapshotPage::from_dir(
            dir,
            &[
                (Listing::Posts.snapshot_prefix(), posts_url.as_str()),
                (Listing::Comments.snapshot_prefix(), comments_url.as_str()),
            ],
        )?;
        self.collect_with(page, &profile).await
    }

    /// Collect both listings through `page`, then release it
    pub async fn collect_with<P: Page>(
        &self,
        page: P,
        profile: &Profile,
    ) -> Result<Harvest, HarvestError> {
        ::log::info!("Scraping data for user: {}", profile.username());

        let outcome = self.collect_listings(&page, profile).await;
        if let Err(e) = &outcome {
            ::log::error!("Collection for {} failed: {}", profile.username(), e);
        }

        match page.close().await {
            Ok(()) => ::log::debug!("Session released"),
            Err(e) => ::log::warn!("Failed to release session: {}", e),
        }
        outcome
    }

    async fn collect_listings<P: Page>(
        &self,
        page: &P,
        profile: &Profile,
    ) -> Result<Harvest, HarvestError> {
        let config = &self.config;
        let collector = Collector::new(config, &self.clock);

        let posts_url = profile.listing_url(&config.base_url, Listing::Posts)?;
        let posts = collector
            .collect(
                page,
                &posts_url,
                &config.posts,
                &PostExtractor::new(&config.post_fields, &config.posts),
            )
            .await?;
        ::log::info!("Found {} posts", posts.records.len());

        let comments_url = profile.listing_url(&config.base_url, Listing::Comments)?;
        let comments = collector
            .collect(
                page,
                &comments_url,
                &config.comments,
                &CommentExtractor::new(&config.comment_fields, &config.comments),
            )
            .await?;
        ::log::info!("Found {} comments", comments.records.len());

        Ok(Harvest {
            posts: posts.records,
            comments: comments.records,
        })
    }
}
