pub mod browser;
pub mod error;
pub mod extract;
pub mod output;
pub mod text;
pub mod walker;

pub use browser::{Browser, ChromeSession, LaunchOptions, Locator, ReplayStats, SnapshotBrowser};
pub use error::ScraperError;
pub use extract::{PageBatch, PageExtractor};
pub use output::{read_json, write_csv, write_json, write_records, OutputFormat};
pub use text::{collapse_whitespace, parse_price};
pub use walker::{CatalogWalker, StopReason, WalkOutcome, WalkSettings};
