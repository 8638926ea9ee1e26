//! The page abstraction: a narrow capability view of the live inbox.
//!
//! The browser is a stateful external object whose only observable state is
//! the currently displayed message. The core never touches the driver
//! directly; it sees exactly four capabilities: read a unique element's
//! text, enumerate hyperlinks, enumerate action controls, activate one
//! control. [`chrome::ChromePage`] backs them with a real browser;
//! [`memory::MemoryPage`] is a scripted fake for tests.

pub mod chrome;
pub mod memory;

use crate::error::Result;

/// The uniquely-identified text elements of a message card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// The sender display name.
    Sender,
    /// The message body paragraph (line breaks preserved).
    Body,
}

/// A hyperlink-like element: visible text plus resolved href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Visible link text.
    pub text: String,
    /// Resolved download href.
    pub href: String,
}

/// Opaque handle to one action control, valid until the page changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlId(pub(crate) usize);

/// One action control with its accessible label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    /// Accessible label / tooltip text (empty when the control has none).
    pub label: String,
    /// Handle to pass to [`Page::activate`].
    pub id: ControlId,
}

/// Capability interface over the live page.
///
/// Implementations are blocking; the whole run is single-threaded.
pub trait Page {
    /// Text of the unique element for `role`, or `None` when it is absent.
    fn element_text(&self, role: ElementRole) -> Result<Option<String>>;

    /// Every hyperlink-like element on the page, in document order.
    fn links(&self) -> Result<Vec<LinkRef>>;

    /// Every action control on the page, in document order.
    fn action_items(&self) -> Result<Vec<ActionItem>>;

    /// Activate a control, causing the displayed message to change.
    fn activate(&mut self, control: ControlId) -> Result<()>;
}
