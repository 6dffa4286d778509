use std::path::PathBuf;

pub const DEFAULT_START_URL: &str = "https://www.framesdirect.com/eyeglasses/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.6778.265 Safari/537.36";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub start_url: String,
    pub log_level: String,
    /// Optional YAML override for the built-in catalog rules.
    pub rules_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// File name without extension; `.csv` and `.json` are appended.
    pub output_stem: String,
    pub wait_timeout_secs: u64,
    pub scroll_passes: u32,
    pub scroll_pause_ms: u64,
    pub click_pause_ms: u64,
    pub user_agent: String,
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    /// `None` walks until pagination runs out.
    pub max_pages: Option<usize>,
}
