use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};

use super::{click_first, Browser, Locator};
use crate::error::ScraperError;
use crate::extract::compile_selector;
use crate::text::element_text;

/// Page shown after clicking past the last snapshot.
const BLANK_PAGE: &str = "<html><head></head><body></body></html>";

/// Call counters shared between a [`SnapshotBrowser`] and its owner.
#[derive(Debug, Default)]
pub struct ReplayStats {
    navigations: AtomicUsize,
    scrolls: AtomicUsize,
    clicks: AtomicUsize,
    closes: AtomicUsize,
}

impl ReplayStats {
    #[must_use]
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::Relaxed)
    }
}

/// Replays saved rendered pages in order.
///
/// `navigate` shows the first snapshot. A click whose locator matches the
/// current snapshot moves to the next one; clicking on the last snapshot
/// lands on an empty page, as a dead "Next" link would. Locators passed to
/// [`SnapshotBrowser::block_clicks`] still match but their clicks fail, like
/// a control covered by an overlay.
#[derive(Debug)]
pub struct SnapshotBrowser {
    pages: Vec<String>,
    position: Option<usize>,
    blocked: Vec<Locator>,
    stats: Arc<ReplayStats>,
}

impl SnapshotBrowser {
    #[must_use]
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self {
            pages,
            position: None,
            blocked: Vec::new(),
            stats: Arc::default(),
        }
    }

    /// Loads every `*.html` / `*.htm` file in `dir`, sorted by file name.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Io`]: the directory or a file cannot be read.
    /// - [`ScraperError::NoSnapshots`]: the directory holds no HTML files.
    pub fn from_dir(dir: &Path) -> Result<Self, ScraperError> {
        let entries = std::fs::read_dir(dir).map_err(|e| ScraperError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ScraperError::io(dir, e))?.path();
            let is_html = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm")
                });
            if is_html && path.is_file() {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(ScraperError::NoSnapshots {
                dir: dir.to_path_buf(),
            });
        }
        paths.sort();

        let pages = paths
            .iter()
            .map(|path| std::fs::read_to_string(path).map_err(|e| ScraperError::io(path, e)))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(dir = %dir.display(), pages = pages.len(), "loaded snapshots");
        Ok(Self::from_pages(pages))
    }

    /// Counters that stay readable after the browser is consumed by `close`.
    #[must_use]
    pub fn stats(&self) -> Arc<ReplayStats> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Makes clicks on controls found by `locator` fail.
    #[must_use]
    pub fn block_clicks(mut self, locator: Locator) -> Self {
        self.blocked.push(locator);
        self
    }

    fn click_control(&self, html: &str, locator: &Locator) -> Result<bool, ScraperError> {
        if !locate(html, locator)? {
            return Ok(false);
        }
        if self.blocked.contains(locator) {
            return Err(ScraperError::browser("click", "element click intercepted"));
        }
        Ok(true)
    }

    fn page(&self) -> Result<&str, ScraperError> {
        let position = self
            .position
            .ok_or_else(|| ScraperError::browser("content", "no page loaded"))?;
        Ok(self.pages.get(position).map_or(BLANK_PAGE, String::as_str))
    }
}

fn has_match(html: &str, selector: &Selector) -> bool {
    Html::parse_document(html).select(selector).next().is_some()
}

fn locate(html: &str, locator: &Locator) -> Result<bool, ScraperError> {
    match locator {
        Locator::LinkText(text) => {
            let anchors = compile_selector("a")?;
            Ok(Html::parse_document(html)
                .select(&anchors)
                .any(|a| element_text(a) == *text))
        }
        Locator::Css(css) => Ok(has_match(html, &compile_selector(css)?)),
    }
}

#[async_trait]
impl Browser for SnapshotBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        tracing::debug!(url, "replaying from first snapshot");
        self.stats.navigations.fetch_add(1, Ordering::Relaxed);
        self.position = Some(0);
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        let compiled = compile_selector(selector)?;
        if has_match(self.page()?, &compiled) {
            Ok(())
        } else {
            Err(ScraperError::WaitTimeout {
                selector: selector.to_owned(),
                timeout_secs: timeout.as_secs(),
            })
        }
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
        self.stats.scrolls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn current_html(&mut self) -> Result<String, ScraperError> {
        self.page().map(str::to_owned)
    }

    async fn click_if_present(
        &mut self,
        locators: &[Locator],
        settle: Duration,
    ) -> Result<bool, ScraperError> {
        let html = self.page()?;
        let clicked = click_first(locators, |locator| {
            std::future::ready(self.click_control(html, locator))
        })
        .await;
        if !clicked {
            return Ok(false);
        }

        tokio::time::sleep(settle).await;
        self.stats.clicks.fetch_add(1, Ordering::Relaxed);
        self.position = self
            .position
            .map(|p| (p + 1).min(self.pages.len()));
        Ok(true)
    }

    async fn close(self) -> Result<(), ScraperError> {
        self.stats.closes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
