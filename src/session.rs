//! The traversal state machine: extract → resolve → persist → navigate,
//! one message at a time, until the inbox is exhausted.

use std::path::PathBuf;

use crate::download::{self, Transport};
use crate::error::Result;
use crate::extract;
use crate::model::identity::ResolvedIdentity;
use crate::model::message::Message;
use crate::page::{ControlId, Page};
use crate::resolve;
use crate::roster::Roster;

/// Accessible label of the control that advances to the next message.
const NEXT_LABEL: &str = "Next";

/// Controller states. `Terminated` is final and never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Extracting,
    Resolving,
    Persisting,
    Navigating,
    Terminated,
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    /// Messages persisted.
    pub messages: usize,
    /// Attachment files written (body files not counted).
    pub attachments: usize,
    /// Total bytes written, bodies included.
    pub bytes: u64,
}

/// Find the pagination control, or `None` when the inbox is exhausted.
///
/// `None` is the normal terminal condition, not an error.
pub fn find_next(page: &dyn Page) -> Result<Option<ControlId>> {
    Ok(page
        .action_items()?
        .into_iter()
        .find(|item| item.label == NEXT_LABEL)
        .map(|item| item.id))
}

/// Walks the inbox sequentially, persisting every message.
///
/// Owns the page for the whole run; the browser resource is released
/// exactly once when the controller is dropped, on success and on the
/// fatal-error path alike. At most one message's fields are held at a
/// time; the page is the sole source of truth.
pub struct SessionController<P: Page, T: Transport> {
    page: P,
    transport: T,
    roster: Roster,
    downloads_root: PathBuf,
    state: State,
    current: Option<Message>,
    resolved: Option<ResolvedIdentity>,
    summary: RunSummary,
}

impl<P: Page, T: Transport> SessionController<P, T> {
    /// Build a controller over a page that is ready and displaying the
    /// first message.
    pub fn new(page: P, transport: T, roster: Roster, downloads_root: PathBuf) -> Self {
        Self {
            page,
            transport,
            roster,
            downloads_root,
            state: State::Idle,
            current: None,
            resolved: None,
            summary: RunSummary::default(),
        }
    }

    /// Current state, for observability.
    pub fn state(&self) -> State {
        self.state
    }

    /// Run to completion or to the first fatal error.
    ///
    /// `progress` is invoked with the running message count after each
    /// persisted message. Errors propagate unmodified; nothing is retried.
    pub fn run(mut self, progress: &dyn Fn(usize)) -> Result<RunSummary> {
        loop {
            tracing::trace!(state = ?self.state, "State transition");
            match self.state {
                State::Idle => {
                    self.state = State::Extracting;
                }
                State::Extracting => {
                    let message = extract::extract(&self.page)?;
                    tracing::info!(
                        sender = %message.sender_raw_name,
                        attachments = message.attachments.len(),
                        "Extracted message"
                    );
                    self.current = Some(message);
                    self.state = State::Resolving;
                }
                State::Resolving => {
                    let message = self.current.as_ref().expect("message set in Extracting");
                    let identity = resolve::resolve(&message.sender_raw_name, &self.roster);
                    tracing::info!(
                        canonical = %identity.canonical_name,
                        group = %identity.group,
                        "Resolved sender"
                    );
                    self.resolved = Some(identity);
                    self.state = State::Persisting;
                }
                State::Persisting => {
                    let message = self.current.take().expect("message set in Extracting");
                    let identity = self.resolved.take().expect("identity set in Resolving");
                    let dir = download::target_directory(&self.downloads_root, &identity);
                    let report = download::download(&dir, &message, &self.transport)?;
                    tracing::info!(
                        dir = %dir.display(),
                        files = report.files,
                        bytes = report.bytes,
                        "Persisted message"
                    );
                    self.summary.messages += 1;
                    self.summary.attachments += report.files - 1;
                    self.summary.bytes += report.bytes;
                    progress(self.summary.messages);
                    self.state = State::Navigating;
                }
                State::Navigating => {
                    match find_next(&self.page)? {
                        Some(control) => {
                            self.page.activate(control)?;
                            self.state = State::Extracting;
                        }
                        None => {
                            self.state = State::Terminated;
                        }
                    }
                }
                State::Terminated => break,
            }
        }
        tracing::info!(
            messages = self.summary.messages,
            attachments = self.summary.attachments,
            "Run complete"
        );
        Ok(self.summary)
    }
}
