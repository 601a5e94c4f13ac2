use crate::error::{ConfigError, HarvestError};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:/?u/)?([A-Za-z0-9_-]{3,20})/?$").expect("Invalid username pattern")
});

/// The two listings collected for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Posts,
    Comments,
}

impl Listing {
    fn path_segment(self) -> &'static str {
        match self {
            Listing::Posts => "submitted",
            Listing::Comments => "comments",
        }
    }

    /// File name prefix of replay snapshots for this listing
    pub fn snapshot_prefix(self) -> &'static str {
        match self {
            Listing::Posts => "posts",
            Listing::Comments => "comments",
        }
    }
}

/// A validated profile identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    username: String,
}

impl Profile {
    /// Accepts `name`, `u/name` and `/u/name`
    pub fn parse(input: &str) -> Result<Self, HarvestError> {
        let trimmed = input.trim();
        let captures = USERNAME
            .captures(trimmed)
            .ok_or_else(|| HarvestError::InvalidUsername(trimmed.to_string()))?;
        Ok(Self {
            username: captures[1].to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `{base}/user/{name}/submitted/` or `{base}/user/{name}/comments/`.
    ///
    /// Any path on the base URL is kept as a prefix.
    pub fn listing_url(&self, base_url: &str, listing: Listing) -> Result<String, ConfigError> {
        let mut base = Url::parse(base_url).map_err(|source| ConfigError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if !base.path().ends_with('/') {
            let prefix = format!("{}/", base.path());
            base.set_path(&prefix);
        }
        let path = format!("user/{}/{}/", self.username, listing.path_segment());
        let url = base.join(&path).map_err(|source| ConfigError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(url.to_string())
    }
}
