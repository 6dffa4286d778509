use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use fdscrape_core::AppConfig;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{click_first, Browser, Locator};
use crate::error::ScraperError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Launch flags for [`ChromeSession`].
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub user_agent: String,
}

impl From<&AppConfig> for LaunchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            headless: config.headless,
            chrome_path: config.chrome_path.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// One Chromium process with a single tab, driven over CDP.
pub struct ChromeSession {
    browser: CdpBrowser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launches Chromium and opens a blank tab.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Launch`] if the config is rejected or the
    /// process cannot be started, and [`ScraperError::Browser`] if the tab
    /// cannot be opened.
    pub async fn launch(options: &LaunchOptions) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", options.user_agent))
            .no_sandbox();
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScraperError::Launch)?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| ScraperError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "CDP handler error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::browser("new_page", e))?;

        tracing::debug!(headless = options.headless, "chromium launched");

        Ok(Self {
            browser,
            page,
            handler,
        })
    }
}

async fn locate(page: &Page, locator: &Locator) -> Option<Element> {
    let found = match locator {
        Locator::LinkText(text) => page.find_xpath(link_text_xpath(text)).await,
        Locator::Css(css) => page.find_element(css.as_str()).await,
    };
    found.ok()
}

/// Scrolls the control into view and clicks it. `Ok(false)` when the
/// locator finds nothing.
async fn click_control(
    page: &Page,
    locator: &Locator,
    settle: Duration,
) -> Result<bool, ScraperError> {
    let Some(element) = locate(page, locator).await else {
        return Ok(false);
    };
    tracing::debug!(%locator, "next control found");
    element
        .scroll_into_view()
        .await
        .map_err(|e| ScraperError::browser("scroll_into_view", e))?;
    tokio::time::sleep(settle).await;
    element
        .click()
        .await
        .map_err(|e| ScraperError::browser("click", e))?;
    Ok(true)
}

#[async_trait]
impl Browser for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScraperError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        let page = &self.page;
        let poll = async {
            loop {
                if page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };
        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| ScraperError::WaitTimeout {
                selector: selector.to_owned(),
                timeout_secs: timeout.as_secs(),
            })
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
        self.page
            .evaluate(SCROLL_TO_BOTTOM_JS)
            .await
            .map_err(|e| ScraperError::browser("evaluate", e))?;
        Ok(())
    }

    async fn current_html(&mut self) -> Result<String, ScraperError> {
        self.page
            .content()
            .await
            .map_err(|e| ScraperError::browser("content", e))
    }

    async fn click_if_present(
        &mut self,
        locators: &[Locator],
        settle: Duration,
    ) -> Result<bool, ScraperError> {
        let page = &self.page;
        Ok(click_first(locators, |locator| click_control(page, locator, settle)).await)
    }

    async fn close(mut self) -> Result<(), ScraperError> {
        let result = async {
            self.browser
                .close()
                .await
                .map_err(|e| ScraperError::browser("close", e))?;
            self.browser
                .wait()
                .await
                .map_err(|e| ScraperError::browser("wait", e))?;
            Ok(())
        }
        .await;
        self.handler.abort();
        result
    }
}

/// XPath matching an anchor whose normalized text equals `text`.
fn link_text_xpath(text: &str) -> String {
    format!("//a[normalize-space(.)={}]", xpath_literal(text))
}

/// Quotes `text` as an XPath 1.0 string literal. XPath has no escapes, so a
/// value holding both quote kinds is built with `concat()`.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{text}'")
    } else if !text.contains('"') {
        format!("\"{text}\"")
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
