use serde::{Deserialize, Serialize};

/// Ordered list of CSS patterns for one logical field or item type.
///
/// Earlier patterns are preferred; later ones cover older or alternate page
/// layouts. The first pattern that matches anything wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorChain(Vec<String>);

impl SelectorChain {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(patterns.into_iter().map(Into::into).collect())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first pattern that is not valid CSS, if any.
    pub fn first_invalid(&self) -> Option<&str> {
        self.patterns()
            .find(|pattern| scraper::Selector::parse(pattern).is_err())
    }
}

pub fn post_items() -> SelectorChain {
    SelectorChain::new([
        r#"[data-testid="post-container"]"#,
        r#"div[data-click-id="body"]"#,
        r#"div[data-testid="post"]"#,
        "article",
        "div.Post",
        r#"div[role="article"]"#,
        "div.thing",
        "shreddit-post",
    ])
}

pub fn comment_items() -> SelectorChain {
    SelectorChain::new([
        r#"[data-testid="comment"]"#,
        r#"div[data-testid="comment-tree-item"]"#,
        "div.Comment",
        r#"div[role="article"]"#,
        r#"div.thing[data-type="comment"]"#,
        "shreddit-comment",
        r#"div[data-testid="comment-body-header"]"#,
        "div.Comment__body",
        r#"article[data-testid="comment"]"#,
        "div.usertext",
        r#"div[id*="thing_t1_"]"#,
    ])
}

/// Broad patterns tried when no comment container matched but the page
/// clearly carries comment markup.
pub fn comment_items_fallback() -> SelectorChain {
    SelectorChain::new([
        r#"div[data-type="comment"]"#,
        "div.usertext-body",
        r#"div[class*="comment"]"#,
        r#"div[class*="Comment"]"#,
        "p",
    ])
}

pub fn post_title() -> SelectorChain {
    SelectorChain::new([
        r#"[data-testid="post-content"] h3"#,
        "h3",
        "h2",
        "h1",
        r#"[data-adclicklocation="title"]"#,
        ".title a",
        r#"a[data-click-id="body"]"#,
        "shreddit-post h1",
        r#"[slot="title"]"#,
    ])
}

pub fn post_content() -> SelectorChain {
    SelectorChain::new([
        r#"[data-testid="post-content"] div[data-testid="post-text"]"#,
        r#"div[data-testid="post-text"]"#,
        r#"[data-click-id="text"]"#,
        "div.usertext-body",
        r#"div[data-testid="post-text-container"]"#,
        r#"shreddit-post div[slot="text-body"]"#,
        "div.RichTextJSON-root",
        r#"div[data-testid="post-rtjson-content"]"#,
        "div.s-prose",
        r#"div[data-adclicklocation="media"]"#,
        "div.Post__content",
        r#"div[data-testid="post-content"] > div:last-child"#,
        "p",
    ])
}

pub fn post_subreddit() -> SelectorChain {
    SelectorChain::new([
        r#"[data-testid="subreddit-name"]"#,
        ".subreddit",
        r#"a[href*="/r/"]"#,
        r#"span[data-testid="subreddit-name"]"#,
    ])
}

pub fn comment_text() -> SelectorChain {
    SelectorChain::new([
        r#"[data-testid="comment-text"]"#,
        r#"div[data-testid="comment-text"]"#,
        "div.usertext-body",
        "div.Comment__body",
        r#"div[data-testid="comment-text-container"]"#,
        r#"shreddit-comment div[slot="comment-body"]"#,
        "div.RichTextJSON-root",
        r#"div[data-testid="comment-rtjson-content"]"#,
        "div.s-prose",
        "div.md",
        "p",
        "div.Comment__body .RichTextJSON-root",
    ])
}
