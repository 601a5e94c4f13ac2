use crate::error::ConfigError;
use crate::selectors::{self, SelectorChain};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Site root the profile URLs are built from
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether the browser runs without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Desktop user agent, keeps the site from serving the mobile layout
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Pause after navigating to a listing
    #[serde(default = "default_navigation_settle_ms")]
    pub navigation_settle_ms: u64,

    /// Pause after each scroll, lets lazily loaded items render
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,

    /// Upper bound on waiting for the document body
    #[serde(default = "default_body_timeout_secs")]
    pub body_timeout_secs: u64,

    /// Page source fragments that mean the profile is missing or private
    #[serde(default = "default_not_found_markers")]
    pub not_found_markers: Vec<String>,

    #[serde(default = "TargetConfig::posts", deserialize_with = "posts_target")]
    pub posts: TargetConfig,

    #[serde(default = "TargetConfig::comments", deserialize_with = "comments_target")]
    pub comments: TargetConfig,

    #[serde(default)]
    pub post_fields: PostFields,

    #[serde(default)]
    pub comment_fields: CommentFields,
}

/// How a listing is judged to have stopped growing after a scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stagnation {
    /// Stop when the match count is exactly the same as before the scroll
    Unchanged,
    /// Stop when the match count did not increase
    NotGrown,
}

impl Stagnation {
    pub fn is_stagnant(self, before: usize, after: usize) -> bool {
        match self {
            Stagnation::Unchanged => after == before,
            Stagnation::NotGrown => after <= before,
        }
    }
}

/// Per-listing collection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Maximum number of records to keep
    pub max_items: usize,

    /// Maximum number of scroll attempts
    pub max_scrolls: usize,

    pub stagnation: Stagnation,

    /// Item container patterns
    pub items: SelectorChain,

    /// Broader container patterns used when `items` finds nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackItems>,

    /// Text fragments at or below this length are ignored
    pub min_fragment_chars: usize,

    /// Raw-text lines must be longer than this to stand in for content
    pub min_line_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackItems {
    /// Case-insensitive words that must appear in the page source
    pub hints: Vec<String>,
    pub items: SelectorChain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFields {
    pub title: SelectorChain,
    pub content: SelectorChain,
    pub subreddit: SelectorChain,
}

impl Default for PostFields {
    fn default() -> Self {
        Self {
            title: selectors::post_title(),
            content: selectors::post_content(),
            subreddit: selectors::post_subreddit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentFields {
    pub text: SelectorChain,
}

impl Default for CommentFields {
    fn default() -> Self {
        Self {
            text: selectors::comment_text(),
        }
    }
}

impl TargetConfig {
    pub fn posts() -> Self {
        Self {
            max_items: 20,
            max_scrolls: 10,
            stagnation: Stagnation::Unchanged,
            items: selectors::post_items(),
            fallback: None,
            min_fragment_chars: 10,
            min_line_chars: 50,
        }
    }

    pub fn comments() -> Self {
        Self {
            max_items: 30,
            max_scrolls: 15,
            stagnation: Stagnation::NotGrown,
            items: selectors::comment_items(),
            fallback: Some(FallbackItems {
                hints: vec!["comment".to_string(), "usertext".to_string()],
                items: selectors::comment_items_fallback(),
            }),
            min_fragment_chars: 5,
            min_line_chars: 20,
        }
    }
}

/// Per-listing settings as they appear in a config file. Omitted fields
/// keep the listing's own defaults.
#[derive(Debug, Default, Deserialize)]
struct TargetOverrides {
    max_items: Option<usize>,
    max_scrolls: Option<usize>,
    stagnation: Option<Stagnation>,
    items: Option<SelectorChain>,
    fallback: Option<FallbackItems>,
    min_fragment_chars: Option<usize>,
    min_line_chars: Option<usize>,
}

impl TargetOverrides {
    fn apply(self, mut target: TargetConfig) -> TargetConfig {
        if let Some(max_items) = self.max_items {
            target.max_items = max_items;
        }
        if let Some(max_scrolls) = self.max_scrolls {
            target.max_scrolls = max_scrolls;
        }
        if let Some(stagnation) = self.stagnation {
            target.stagnation = stagnation;
        }
        if let Some(items) = self.items {
            target.items = items;
        }
        if let Some(fallback) = self.fallback {
            target.fallback = Some(fallback);
        }
        if let Some(min_fragment_chars) = self.min_fragment_chars {
            target.min_fragment_chars = min_fragment_chars;
        }
        if let Some(min_line_chars) = self.min_line_chars {
            target.min_line_chars = min_line_chars;
        }
        target
    }
}

fn posts_target<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TargetConfig, D::Error> {
    Ok(TargetOverrides::deserialize(deserializer)?.apply(TargetConfig::posts()))
}

fn comments_target<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TargetConfig, D::Error> {
    Ok(TargetOverrides::deserialize(deserializer)?.apply(TargetConfig::comments()))
}

fn default_base_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_navigation_settle_ms() -> u64 {
    5000
}

fn default_scroll_settle_ms() -> u64 {
    3000
}

fn default_body_timeout_secs() -> u64 {
    10
}

fn default_not_found_markers() -> Vec<String> {
    vec!["User not found".to_string(), "doesn't exist".to_string()]
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            navigation_settle_ms: default_navigation_settle_ms(),
            scroll_settle_ms: default_scroll_settle_ms(),
            body_timeout_secs: default_body_timeout_secs(),
            not_found_markers: default_not_found_markers(),
            posts: TargetConfig::posts(),
            comments: TargetConfig::comments(),
            post_fields: PostFields::default(),
            comment_fields: CommentFields::default(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the base URL and every selector chain
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })?;

        let mut chains = vec![
            ("posts.items", &self.posts.items),
            ("comments.items", &self.comments.items),
            ("post_fields.title", &self.post_fields.title),
            ("post_fields.content", &self.post_fields.content),
            ("post_fields.subreddit", &self.post_fields.subreddit),
            ("comment_fields.text", &self.comment_fields.text),
        ];
        if let Some(fallback) = &self.posts.fallback {
            chains.push(("posts.fallback.items", &fallback.items));
        }
        if let Some(fallback) = &self.comments.fallback {
            chains.push(("comments.fallback.items", &fallback.items));
        }

        for (field, chain) in chains {
            if chain.is_empty() {
                return Err(ConfigError::EmptyChain { field });
            }
            if let Some(pattern) = chain.first_invalid() {
                return Err(ConfigError::InvalidSelector {
                    field,
                    pattern: pattern.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn navigation_settle(&self) -> Duration {
        Duration::from_millis(self.navigation_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn body_timeout(&self) -> Duration {
        Duration::from_secs(self.body_timeout_secs)
    }
}
