//! Scripted in-memory [`Page`] implementation for tests.

use super::{ActionItem, ControlId, ElementRole, LinkRef, Page};
use crate::error::{FetchError, Result};

/// One scripted message card.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMessage {
    /// Sender element text, `None` to simulate a missing element.
    pub sender: Option<String>,
    /// Body element text, `None` to simulate a missing element.
    pub body: Option<String>,
    /// Every hyperlink on the page while this message is displayed.
    pub links: Vec<LinkRef>,
    /// Extra action-control labels shown alongside the navigation ones.
    pub extra_actions: Vec<String>,
}

impl ScriptedMessage {
    /// A well-formed message with the given sender and body.
    pub fn new(sender: &str, body: &str) -> Self {
        Self {
            sender: Some(sender.to_string()),
            body: Some(body.to_string()),
            ..Self::default()
        }
    }

    /// Add a hyperlink to the scripted page.
    pub fn with_link(mut self, text: &str, href: &str) -> Self {
        self.links.push(LinkRef {
            text: text.to_string(),
            href: href.to_string(),
        });
        self
    }
}

/// An inbox scripted as a fixed sequence of messages.
///
/// A `"Next"` action control is present while messages remain; activating
/// it advances to the following message, mirroring the live inbox.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    messages: Vec<ScriptedMessage>,
    index: usize,
    activations: usize,
}

impl MemoryPage {
    /// Build a page displaying the first of `messages`.
    pub fn new(messages: Vec<ScriptedMessage>) -> Self {
        Self {
            messages,
            index: 0,
            activations: 0,
        }
    }

    /// Index of the currently displayed message.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// How many times a control has been activated.
    pub fn activations(&self) -> usize {
        self.activations
    }

    fn current(&self) -> &ScriptedMessage {
        &self.messages[self.index]
    }

    fn has_next(&self) -> bool {
        self.index + 1 < self.messages.len()
    }
}

impl Page for MemoryPage {
    fn element_text(&self, role: ElementRole) -> Result<Option<String>> {
        let message = self.current();
        Ok(match role {
            ElementRole::Sender => message.sender.clone(),
            ElementRole::Body => message.body.clone(),
        })
    }

    fn links(&self) -> Result<Vec<LinkRef>> {
        Ok(self.current().links.clone())
    }

    fn action_items(&self) -> Result<Vec<ActionItem>> {
        let mut labels: Vec<String> = self.current().extra_actions.clone();
        if self.has_next() {
            labels.push("Next".to_string());
        }
        Ok(labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| ActionItem {
                label,
                id: ControlId(index),
            })
            .collect())
    }

    fn activate(&mut self, control: ControlId) -> Result<()> {
        let items = self.action_items()?;
        let item = items.get(control.0).ok_or_else(|| {
            FetchError::Page(format!("no action item with index {}", control.0))
        })?;
        self.activations += 1;
        if item.label == "Next" {
            self.index += 1;
        }
        Ok(())
    }
}
