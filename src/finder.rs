//! Element lookup filtered by exact rendered text.

use crate::errors::{HarnessError, Result};
use crate::selector::Selector;
use crate::session::{WebElement, WebSession};

/// Query the current document and keep only the elements whose rendered text
/// equals `text` exactly.
///
/// Exactly one match returns the handle; no match returns `None` (the
/// implicit wait has already run its course inside the query). More than one
/// match is an `AmbiguousMatch` error: a scenario step about to click cannot
/// meaningfully pick between equally-labelled elements.
pub async fn find_element_with_text<S: WebSession>(
    session: &mut S,
    selector: &Selector,
    text: &str,
) -> Result<Option<S::Element>> {
    let elements = session.find_elements(selector).await?;

    let mut matched = Vec::new();
    for element in elements {
        if element.text().await? == text {
            matched.push(element);
        }
    }

    match matched.len() {
        0 => Ok(None),
        1 => Ok(matched.into_iter().next()),
        count => Err(HarnessError::AmbiguousMatch {
            selector: selector.to_string(),
            text: text.to_string(),
            count,
        }),
    }
}

/// Like [`find_element_with_text`], but a step that cannot proceed without
/// the element: no match becomes a `QueryTimeout` error.
pub async fn require_element_with_text<S: WebSession>(
    session: &mut S,
    selector: &Selector,
    text: &str,
) -> Result<S::Element> {
    find_element_with_text(session, selector, text)
        .await?
        .ok_or_else(|| HarnessError::QueryTimeout {
            selector: selector.to_string(),
            text: text.to_string(),
        })
}

/// First element matching a plain selector, for nodes addressed without a
/// text filter (search box by name, viewer close button by class).
pub async fn require_element<S: WebSession>(
    session: &mut S,
    selector: &Selector,
) -> Result<S::Element> {
    let mut elements = session.find_elements(selector).await?;
    if elements.is_empty() {
        return Err(HarnessError::QueryTimeout {
            selector: selector.to_string(),
            text: String::new(),
        });
    }
    Ok(elements.remove(0))
}
