//! Catalog pagination loop.
//!
//! [`CatalogWalker::walk`] owns the browser for the whole run: it loads the
//! start page, extracts every page it can reach through the "Next" control,
//! and closes the browser exactly once before returning, on success and on
//! failure alike.

use std::time::Duration;

use fdscrape_core::{AppConfig, CatalogRules, ProductRecord};

use crate::browser::{Browser, Locator};
use crate::error::ScraperError;
use crate::extract::PageExtractor;

/// Timing knobs for one walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkSettings {
    /// Bound on every wait for the tile marker.
    pub wait_timeout: Duration,
    /// Scroll-to-bottom passes per page before the snapshot is taken.
    pub scroll_passes: u32,
    /// Pause after each scroll pass.
    pub scroll_pause: Duration,
    /// Pause between scrolling the "Next" control into view and clicking it.
    pub click_pause: Duration,
    /// Stop after this many pages. `None` follows pagination to its end.
    pub max_pages: Option<usize>,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(20),
            scroll_passes: 2,
            scroll_pause: Duration::from_secs(1),
            click_pause: Duration::from_millis(300),
            max_pages: None,
        }
    }
}

impl From<&AppConfig> for WalkSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            wait_timeout: Duration::from_secs(config.wait_timeout_secs),
            scroll_passes: config.scroll_passes,
            scroll_pause: Duration::from_millis(config.scroll_pause_ms),
            click_pause: Duration::from_millis(config.click_pause_ms),
            max_pages: config.max_pages,
        }
    }
}

/// Why the pagination loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No locator got a click through on a "Next" control.
    NoNextControl,
    /// Tiles did not reappear after clicking "Next".
    PaginationTimeout,
    /// The configured page cap was reached.
    PageLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutcome {
    /// Every record extracted, in page-then-tile order. Not deduplicated.
    pub records: Vec<ProductRecord>,
    pub pages_visited: usize,
    pub stop: StopReason,
}

pub struct CatalogWalker {
    extractor: PageExtractor,
    next_controls: Vec<Locator>,
    settings: WalkSettings,
}

impl CatalogWalker {
    /// # Errors
    ///
    /// Returns an error if a selector or pattern in `rules` does not compile.
    pub fn new(rules: &CatalogRules, settings: WalkSettings) -> Result<Self, ScraperError> {
        Ok(Self {
            extractor: PageExtractor::new(rules)?,
            next_controls: Locator::for_next_page(&rules.pagination),
            settings,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &WalkSettings {
        &self.settings
    }

    /// Walks the catalog starting at `start_url`, then closes `browser`.
    ///
    /// # Errors
    ///
    /// Fails if navigation fails, if tiles never appear on the start page,
    /// or if a page snapshot cannot be read. Pagination problems end the walk
    /// normally instead.
    pub async fn walk<B: Browser>(
        &self,
        mut browser: B,
        start_url: &str,
    ) -> Result<WalkOutcome, ScraperError> {
        let result = self.run(&mut browser, start_url).await;
        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "browser did not shut down cleanly");
        }
        result
    }

    async fn run<B: Browser>(
        &self,
        browser: &mut B,
        start_url: &str,
    ) -> Result<WalkOutcome, ScraperError> {
        let tile = self.extractor.tile_selector();

        tracing::info!(url = start_url, "visiting catalog");
        browser.navigate(start_url).await?;
        tracing::info!(selector = tile, "waiting for product tiles");
        if let Err(e) = browser
            .wait_for_selector(tile, self.settings.wait_timeout)
            .await
        {
            tracing::error!(url = start_url, error = %e, "product tiles never appeared");
            return Err(e);
        }

        let mut records = Vec::new();
        let mut page = 1_usize;

        let stop = loop {
            self.nudge_lazy_content(browser, page).await;

            let html = browser.current_html().await?;
            let batch = self.extractor.extract_page(&html);
            tracing::info!(page, tiles = batch.tiles_found, "raw tiles found");
            tracing::info!(page, records = batch.records.len(), "products parsed");
            records.extend(batch.records);

            if self.settings.max_pages.is_some_and(|max| page >= max) {
                tracing::info!(page, "page limit reached");
                break StopReason::PageLimit;
            }

            match browser
                .click_if_present(&self.next_controls, self.settings.click_pause)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::info!(page, "No more pages detected.");
                    break StopReason::NoNextControl;
                }
                Err(e) => {
                    tracing::warn!(page, error = %e, "next control could not be clicked");
                    break StopReason::NoNextControl;
                }
            }

            if let Err(e) = browser
                .wait_for_selector(tile, self.settings.wait_timeout)
                .await
            {
                tracing::warn!(page, error = %e, "pagination wait failed");
                break StopReason::PaginationTimeout;
            }

            page += 1;
        };

        tracing::info!(
            pages = page,
            records = records.len(),
            stop = ?stop,
            "catalog walk finished"
        );

        Ok(WalkOutcome {
            records,
            pages_visited: page,
            stop,
        })
    }

    /// Fixed number of scroll passes with a fixed pause. Failures are logged
    /// and ignored.
    async fn nudge_lazy_content<B: Browser>(&self, browser: &mut B, page: usize) {
        for pass in 0..self.settings.scroll_passes {
            if let Err(e) = browser.scroll_to_bottom().await {
                tracing::warn!(page, pass, error = %e, "scroll failed");
            }
            tokio::time::sleep(self.settings.scroll_pause).await;
        }
    }
}

#[cfg(test)]
#[path = "walker_test.rs"]
mod tests;
