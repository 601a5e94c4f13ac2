use serde::{Deserialize, Serialize};

pub const NO_TITLE: &str = "No title found";
pub const NO_CONTENT: &str = "No content found";
pub const NO_TEXT: &str = "No text found";
pub const UNKNOWN_SUBREDDIT: &str = "Unknown";

/// One submitted post. Fields that could not be extracted hold a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    pub content: String,
    pub subreddit: String,
}

/// One comment. `text` is never the sentinel in a finished harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub text: String,
}

impl CommentRecord {
    /// Comments without recoverable text are dropped rather than kept.
    pub fn has_text(&self) -> bool {
        let text = self.text.trim();
        !text.is_empty() && text != NO_TEXT
    }
}

/// Everything collected for one profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harvest {
    pub posts: Vec<PostRecord>,
    pub comments: Vec<CommentRecord>,
}

impl Harvest {
    /// UTF-8 JSON with 2-space indentation, non-ASCII left unescaped
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn posts_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.posts)
    }

    pub fn comments_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.comments)
    }
}
