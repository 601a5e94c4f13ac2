use crate::config::{CommentFields, PostFields, TargetConfig};
use crate::error::SessionError;
use crate::locator::first_text;
use crate::results::{CommentRecord, NO_CONTENT, NO_TEXT, NO_TITLE, PostRecord, UNKNOWN_SUBREDDIT};
use crate::selectors::SelectorChain;
use crate::session::PageElement;
use crate::text;

/// Turns one item element into a record.
///
/// Extraction never fails outward: a driver error while reading an item
/// yields `None` and the caller moves on to the next item.
#[allow(async_fn_in_trait)]
pub trait ItemExtractor {
    type Record;

    /// Plural noun used in log lines
    const KIND: &'static str;

    async fn extract<E: PageElement>(&self, item: &E) -> Option<Self::Record>;

    /// Whether an extracted record belongs in the result
    fn accepts(&self, _record: &Self::Record) -> bool {
        true
    }
}

/// Length thresholds for body text
#[derive(Debug, Clone, Copy)]
pub struct TextRules {
    pub min_fragment_chars: usize,
    pub min_line_chars: usize,
}

impl From<&TargetConfig> for TextRules {
    fn from(target: &TargetConfig) -> Self {
        Self {
            min_fragment_chars: target.min_fragment_chars,
            min_line_chars: target.min_line_chars,
        }
    }
}

/// Body text of an item.
///
/// Patterns are tried in order; for each one that matches, the substantial
/// text of every match is joined, and the first non-empty join wins. When
/// no pattern yields text, the first long line of the item's raw text is
/// used instead.
pub async fn body_text<E: PageElement>(
    item: &E,
    chain: &SelectorChain,
    rules: TextRules,
) -> Result<Option<String>, SessionError> {
    for pattern in chain.patterns() {
        let elements = item.find_all(pattern).await?;
        if elements.is_empty() {
            continue;
        }

        let mut fragments = Vec::with_capacity(elements.len());
        for element in &elements {
            fragments.push(element.text().await?);
        }

        let joined = text::join_substantial(&fragments, rules.min_fragment_chars);
        if !joined.is_empty() {
            ::log::trace!("Body text from {} ({} fragments)", pattern, elements.len());
            return Ok(Some(joined));
        }
    }

    let raw = item.text().await?;
    Ok(text::first_substantial_line(&raw, rules.min_line_chars))
}

pub struct PostExtractor<'a> {
    fields: &'a PostFields,
    rules: TextRules,
}

impl<'a> PostExtractor<'a> {
    pub fn new(fields: &'a PostFields, target: &TargetConfig) -> Self {
        Self {
            fields,
            rules: TextRules::from(target),
        }
    }

    async fn try_extract<E: PageElement>(&self, item: &E) -> Result<PostRecord, SessionError> {
        let title = first_text(item, &self.fields.title)
            .await?
            .unwrap_or_else(|| NO_TITLE.to_string());

        let content = body_text(item, &self.fields.content, self.rules)
            .await?
            .unwrap_or_else(|| NO_CONTENT.to_string());

        let subreddit = first_text(item, &self.fields.subreddit)
            .await?
            .unwrap_or_else(|| UNKNOWN_SUBREDDIT.to_string());

        Ok(PostRecord {
            title,
            content,
            subreddit,
        })
    }
}

impl ItemExtractor for PostExtractor<'_> {
    type Record = PostRecord;
    const KIND: &'static str = "posts";

    async fn extract<E: PageElement>(&self, item: &E) -> Option<PostRecord> {
        match self.try_extract(item).await {
            Ok(post) => {
                ::log::debug!("Extracted post: {}", text::preview(&post.title, 50));
                ::log::debug!("Content length: {}", text::char_len(&post.content));
                Some(post)
            }
            Err(e) => {
                ::log::warn!("Error extracting post data: {}", e);
                None
            }
        }
    }
}

pub struct CommentExtractor<'a> {
    fields: &'a CommentFields,
    rules: TextRules,
}

impl<'a> CommentExtractor<'a> {
    pub fn new(fields: &'a CommentFields, target: &TargetConfig) -> Self {
        Self {
            fields,
            rules: TextRules::from(target),
        }
    }
}

impl ItemExtractor for CommentExtractor<'_> {
    type Record = CommentRecord;
    const KIND: &'static str = "comments";

    async fn extract<E: PageElement>(&self, item: &E) -> Option<CommentRecord> {
        match body_text(item, &self.fields.text, self.rules).await {
            Ok(found) => {
                let body = found.unwrap_or_else(|| NO_TEXT.to_string());
                ::log::debug!("Extracted comment: {}", text::preview(&body, 50));
                Some(CommentRecord { text: body })
            }
            Err(e) => {
                ::log::warn!("Error extracting comment data: {}", e);
                None
            }
        }
    }

    fn accepts(&self, record: &CommentRecord) -> bool {
        record.has_text()
    }
}
