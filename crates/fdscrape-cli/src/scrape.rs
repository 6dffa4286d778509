//! Handlers for the `walk`, `replay` and `rules` commands.
//!
//! Both walk flavours end in [`save_outcome`]: a run that finds nothing
//! writes nothing and still succeeds. A fatal walker error propagates to
//! `main`, which exits non-zero; the browser has already been closed by then.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use fdscrape_core::{AppConfig, CatalogRules};
use fdscrape_scraper::{
    write_records, CatalogWalker, ChromeSession, LaunchOptions, SnapshotBrowser, WalkOutcome,
    WalkSettings,
};

/// Command-line values that take precedence over the environment.
#[derive(Debug, Default)]
pub(crate) struct WalkOverrides {
    pub url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub max_pages: Option<usize>,
    pub headful: bool,
}

impl WalkOverrides {
    pub(crate) fn apply(self, config: &mut AppConfig) {
        if let Some(url) = self.url {
            config.start_url = url;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if self.max_pages.is_some() {
            config.max_pages = self.max_pages;
        }
        if self.headful {
            config.headless = false;
        }
    }
}

/// Built-in rules, or the YAML file named by `FDSCRAPE_RULES_PATH`.
pub(crate) fn load_effective_rules(config: &AppConfig) -> anyhow::Result<CatalogRules> {
    match &config.rules_path {
        Some(path) => {
            let rules = fdscrape_core::load_rules(path)
                .with_context(|| format!("failed to load rules from {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded catalog rules");
            Ok(rules)
        }
        None => Ok(CatalogRules::default()),
    }
}

pub(crate) fn render_rules(rules: &CatalogRules) -> anyhow::Result<String> {
    serde_yaml::to_string(rules).context("failed to serialize rules")
}

/// Live run against Chromium.
pub(crate) async fn run_walk(config: &AppConfig, rules: &CatalogRules) -> anyhow::Result<()> {
    let walker = CatalogWalker::new(rules, WalkSettings::from(config))
        .context("catalog rules do not compile")?;

    tracing::info!(headless = config.headless, "setting up browser");
    let browser = ChromeSession::launch(&LaunchOptions::from(config))
        .await
        .context("failed to launch Chromium")?;

    let outcome = walker
        .walk(browser, &config.start_url)
        .await
        .with_context(|| format!("catalog walk from {} failed", config.start_url))?;

    save_outcome(config, &outcome)?;
    tracing::info!("End of Web Extraction");
    Ok(())
}

/// Offline run over a directory of saved pages.
pub(crate) async fn run_replay(
    config: &AppConfig,
    rules: &CatalogRules,
    dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    // Saved pages are already fully rendered.
    let settings = WalkSettings {
        scroll_pause: Duration::ZERO,
        click_pause: Duration::ZERO,
        ..WalkSettings::from(config)
    };
    let walker = CatalogWalker::new(rules, settings).context("catalog rules do not compile")?;
    let browser = SnapshotBrowser::from_dir(dir)
        .with_context(|| format!("failed to load snapshots from {}", dir.display()))?;
    tracing::info!(
        dir = %dir.display(),
        pages = browser.page_count(),
        "replaying saved pages"
    );

    let start_url = format!("file://{}", dir.display());
    let outcome = walker
        .walk(browser, &start_url)
        .await
        .with_context(|| format!("replay of {} failed", dir.display()))?;

    save_outcome(config, &outcome)
}

/// Writes CSV and JSON for a non-empty outcome. Returns the written paths.
fn save_outcome(config: &AppConfig, outcome: &WalkOutcome) -> anyhow::Result<Vec<PathBuf>> {
    if outcome.records.is_empty() {
        tracing::info!(
            pages = outcome.pages_visited,
            "No products extracted. Nothing to save."
        );
        return Ok(Vec::new());
    }

    write_records(&config.output_dir, &config.output_stem, &outcome.records).with_context(|| {
        format!(
            "failed to write output to {}",
            config.output_dir.display()
        )
    })
}
