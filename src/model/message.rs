//! The transient per-iteration message and its attachment references.

/// One displayed inbox message, captured from the live page.
///
/// Created by the field extractor, consumed by the downloader, then
/// discarded. The controller never holds more than one at a time.
#[derive(Debug, Clone)]
pub struct Message {
    /// Sender display name exactly as the page shows it.
    pub sender_raw_name: String,

    /// Body text with the displayed line breaks preserved verbatim.
    pub body_text: String,

    /// Attachment links, in page order.
    pub attachments: Vec<AttachmentRef>,
}

/// A single attachment link, derived entirely from page content.
///
/// Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Link text as shown in the page, e.g. `"report.pdf (123K)"`.
    pub display_text: String,

    /// Filename parsed out of the display text, e.g. `"report.pdf"`.
    pub filename: String,

    /// Resolved download href.
    pub url: String,
}
