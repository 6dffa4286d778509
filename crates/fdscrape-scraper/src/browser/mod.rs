//! Browser capability used by the catalog walker.
//!
//! [`Browser`] is the seam between the pagination loop and whatever renders
//! the pages. [`ChromeSession`] drives a real Chromium over CDP;
//! [`SnapshotBrowser`] replays saved HTML pages through the same calls.

mod chrome;
mod snapshot;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use fdscrape_core::PaginationRules;

use crate::error::ScraperError;

pub use chrome::{ChromeSession, LaunchOptions};
pub use snapshot::{ReplayStats, SnapshotBrowser};

/// How to find a pagination control on the rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Anchor whose whitespace-normalized text equals this string exactly.
    LinkText(String),
    /// First element matching a CSS selector.
    Css(String),
}

impl Locator {
    /// Ordered locators for a "Next" control: link text first, then each
    /// CSS fallback.
    #[must_use]
    pub fn for_next_page(rules: &PaginationRules) -> Vec<Self> {
        rules
            .next_link_text
            .iter()
            .map(|text| Self::LinkText(text.clone()))
            .chain(rules.next_selectors.iter().map(|css| Self::Css(css.clone())))
            .collect()
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LinkText(text) => write!(f, "link text \"{text}\""),
            Self::Css(css) => write!(f, "css \"{css}\""),
        }
    }
}

/// A single exclusively-owned browser tab.
#[async_trait]
pub trait Browser: Send {
    /// Loads `url` in the tab.
    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Waits until an element matching `selector` is present.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::WaitTimeout`] if nothing matches within
    /// `timeout`.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError>;

    /// Scrolls the window to the bottom of the document.
    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError>;

    /// Full rendered page source.
    async fn current_html(&mut self) -> Result<String, ScraperError>;

    /// Clicks the first control found by `locators`, tried in order.
    ///
    /// The control is scrolled into view and `settle` elapses before the
    /// click. A control that is found but cannot be clicked is logged and the
    /// next locator is tried. Returns `Ok(false)` when no locator gets a
    /// click through.
    async fn click_if_present(
        &mut self,
        locators: &[Locator],
        settle: Duration,
    ) -> Result<bool, ScraperError>;

    /// Releases the browser.
    async fn close(self) -> Result<(), ScraperError>;
}

/// Runs `click` for each locator in order until one reports a click.
///
/// `click` yields `Ok(false)` when its locator finds nothing and `Err` when
/// the control was found but the click failed; both move on to the next
/// locator.
pub(crate) async fn click_first<'l, F, Fut>(locators: &'l [Locator], mut click: F) -> bool
where
    F: FnMut(&'l Locator) -> Fut,
    Fut: Future<Output = Result<bool, ScraperError>>,
{
    for locator in locators {
        match click(locator).await {
            Ok(true) => return true,
            Ok(false) => tracing::debug!(%locator, "next control not found"),
            Err(e) => tracing::warn!(
                %locator,
                error = %e,
                "next control could not be clicked, trying next locator"
            ),
        }
    }
    false
}
