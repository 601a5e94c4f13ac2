use crate::error::SessionError;
use crate::selectors::SelectorChain;
use crate::session::{PageElement, Scope};
use crate::text;

/// Result of evaluating a selector chain
pub struct Located<E> {
    /// Pattern that produced the matches, `None` if nothing matched
    pub pattern: Option<String>,
    pub elements: Vec<E>,
}

impl<E> Located<E> {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

/// Matches of the first pattern in `chain` that finds anything in `scope`.
///
/// Later patterns are not evaluated once one matches, even if they would
/// match more elements. An empty result means nothing matched and is not an
/// error; errors come only from the driver.
pub async fn locate<S: Scope>(
    scope: &S,
    chain: &SelectorChain,
) -> Result<Located<S::Element>, SessionError> {
    for pattern in chain.patterns() {
        let elements = scope.find_all(pattern).await?;
        if !elements.is_empty() {
            ::log::trace!("{} matches for {}", elements.len(), pattern);
            return Ok(Located {
                pattern: Some(pattern.to_string()),
                elements,
            });
        }
    }
    Ok(Located {
        pattern: None,
        elements: Vec::new(),
    })
}

/// Rendered text of the first element located by `chain`, trimmed.
///
/// `None` when no pattern matched. A match whose text is empty yields
/// `Some("")`, which is different from not finding the field at all.
pub async fn first_text<S: Scope>(
    scope: &S,
    chain: &SelectorChain,
) -> Result<Option<String>, SessionError> {
    let located = locate(scope, chain).await?;
    match located.elements.first() {
        Some(element) => Ok(Some(text::normalize(&element.text().await?))),
        None => Ok(None),
    }
}
