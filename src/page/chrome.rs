//! Chrome-backed [`Page`] implementation for the Algebraix inbox.
//!
//! Drives a real browser through the `headless_chrome` crate. Selectors
//! target the Algebraix material-card markup; the inbox is a single-page
//! app, so "navigation" between messages swaps the card content in place
//! without a page load.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, Element, LaunchOptionsBuilder, Tab};

use super::{ActionItem, ControlId, ElementRole, LinkRef, Page};
use crate::error::{FetchError, Result};

/// Sender display name on the open message card.
const SENDER_SELECTOR: &str = ".material-card__text--primary";

/// Body paragraph of the open message card.
const BODY_SELECTOR: &str =
    ".material-card__body--paragraph.material-card__body--respect-lines.text-break";

/// Toolbar controls (previous/next/archive/…).
const ACTION_ITEM_SELECTOR: &str = ".X_LOAD.action-item";

/// Attribute carrying a control's tooltip label.
const ACTION_LABEL_ATTR: &str = "data-original-title";

/// The card swaps in place after a control is clicked; the selectors never
/// disappear, so a short settle delay is the only available signal.
const NAVIGATION_SETTLE: Duration = Duration::from_millis(500);

/// How long to keep an idle CDP connection alive. Must cover a manual
/// login pause, during which no protocol traffic flows.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(3600);

/// Options for launching the browser.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// URL of the inbox to open.
    pub inbox_url: String,
    /// Explicit Chrome/Chromium binary, or `None` for auto-detection.
    pub chrome_binary: Option<PathBuf>,
    /// Run without a visible window. Keep `false` for manual login.
    pub headless: bool,
}

/// A live browser tab showing the inbox.
///
/// The browser process is owned by this value and shuts down when it is
/// dropped, exactly once, on success and error paths alike.
pub struct ChromePage {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromePage {
    /// Launch the browser and navigate to the inbox URL.
    pub fn launch(options: &BrowserOptions) -> Result<Self> {
        let mut builder = LaunchOptionsBuilder::default();
        builder.headless(options.headless);
        builder.idle_browser_timeout(IDLE_BROWSER_TIMEOUT);
        if let Some(path) = &options.chrome_binary {
            builder.path(Some(path.clone()));
        }
        let launch = builder
            .build()
            .map_err(|e| FetchError::Page(e.to_string()))?;

        let browser = Browser::new(launch).map_err(page_err)?;
        let tab = browser.new_tab().map_err(page_err)?;
        tab.navigate_to(&options.inbox_url).map_err(page_err)?;
        tab.wait_until_navigated().map_err(page_err)?;
        tracing::info!(url = %options.inbox_url, "Browser launched");

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    /// Block until a message card is displayed, or give up after `timeout`.
    ///
    /// Call after any manual login step, before starting traversal.
    pub fn wait_for_message(&self, timeout: Duration) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(SENDER_SELECTOR, timeout)
            .map(|_| ())
            .map_err(|e| {
                FetchError::Page(format!("no message card appeared within {timeout:?}: {e}"))
            })
    }

    /// Resolved (absolute) href of an anchor element, if it has one.
    fn absolute_href(element: &Element<'_>) -> Result<Option<String>> {
        let remote = element
            .call_js_fn("function() { return this.href || null; }", vec![], false)
            .map_err(page_err)?;
        Ok(remote
            .value
            .and_then(|v| v.as_str().map(|s| s.to_string())))
    }
}

impl Page for ChromePage {
    fn element_text(&self, role: ElementRole) -> Result<Option<String>> {
        let selector = match role {
            ElementRole::Sender => SENDER_SELECTOR,
            ElementRole::Body => BODY_SELECTOR,
        };
        // A missing node and a failed query are indistinguishable in the
        // CDP response; both mean the element cannot be read.
        match self.tab.find_element(selector) {
            Ok(element) => {
                let text = element.get_inner_text().map_err(page_err)?;
                Ok(Some(text))
            }
            Err(_) => Ok(None),
        }
    }

    fn links(&self) -> Result<Vec<LinkRef>> {
        let elements = match self.tab.find_elements("a") {
            Ok(elements) => elements,
            Err(_) => return Ok(Vec::new()),
        };
        let mut links = Vec::with_capacity(elements.len());
        for element in &elements {
            let text = element.get_inner_text().map_err(page_err)?;
            // Anchors without an href cannot be downloaded from; skip them.
            if let Some(href) = Self::absolute_href(element)? {
                links.push(LinkRef { text, href });
            }
        }
        Ok(links)
    }

    fn action_items(&self) -> Result<Vec<ActionItem>> {
        let elements = match self.tab.find_elements(ACTION_ITEM_SELECTOR) {
            Ok(elements) => elements,
            Err(_) => return Ok(Vec::new()),
        };
        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let label = element
                .get_attribute_value(ACTION_LABEL_ATTR)
                .map_err(page_err)?
                .unwrap_or_default();
            items.push(ActionItem {
                label,
                id: ControlId(index),
            });
        }
        Ok(items)
    }

    fn activate(&mut self, control: ControlId) -> Result<()> {
        let elements = self.tab.find_elements(ACTION_ITEM_SELECTOR).map_err(page_err)?;
        let element = elements.get(control.0).ok_or_else(|| {
            FetchError::Page(format!("action item {} disappeared before activation", control.0))
        })?;
        element.click().map_err(page_err)?;
        std::thread::sleep(NAVIGATION_SETTLE);
        self.tab
            .wait_for_element(SENDER_SELECTOR)
            .map_err(page_err)?;
        Ok(())
    }
}

fn page_err(e: anyhow::Error) -> FetchError {
    FetchError::Page(e.to_string())
}
