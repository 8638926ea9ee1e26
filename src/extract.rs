//! Field extraction: read one displayed message off the live page.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FetchError, Result};
use crate::model::message::{AttachmentRef, Message};
use crate::page::{ElementRole, LinkRef, Page};

/// Matches attachment link text: a filename with a 3–4 character extension
/// followed by a parenthesized size, e.g. `"notes.docx (45K)"`,
/// `"video.mp4 (1.5M)"`. Group 1 is the filename. Links whose text does not
/// match are navigational or decorative, not attachments.
static ATTACHMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+\.\w{3,4}) \(\d+(?:\.\d+)?[KM]?\)").expect("valid pattern"));

/// Read the currently displayed message.
///
/// Assumes the page is showing exactly one message. Sender and body are
/// required; either being absent is a fatal [`FetchError::Extraction`].
/// Body text is taken verbatim, displayed line breaks included.
pub fn extract(page: &dyn Page) -> Result<Message> {
    let sender_raw_name = page
        .element_text(ElementRole::Sender)?
        .ok_or_else(|| FetchError::Extraction("sender name".to_string()))?;

    let body_text = page
        .element_text(ElementRole::Body)?
        .ok_or_else(|| FetchError::Extraction("body text".to_string()))?;

    let attachments: Vec<AttachmentRef> = page
        .links()?
        .iter()
        .filter_map(attachment_from_link)
        .collect();

    tracing::debug!(
        sender = %sender_raw_name,
        attachments = attachments.len(),
        "Extracted message fields"
    );

    Ok(Message {
        sender_raw_name,
        body_text,
        attachments,
    })
}

/// Interpret one hyperlink as an attachment, or `None` when its text does
/// not have the attachment shape.
pub fn attachment_from_link(link: &LinkRef) -> Option<AttachmentRef> {
    let captures = ATTACHMENT_PATTERN.captures(&link.text)?;
    Some(AttachmentRef {
        display_text: link.text.clone(),
        filename: captures[1].to_string(),
        url: link.href.clone(),
    })
}
