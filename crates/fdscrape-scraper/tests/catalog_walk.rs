//! End-to-end walks over saved catalog pages.
//!
//! Pages are written to a temp directory and replayed through
//! `SnapshotBrowser`, so the full path from directory loading through
//! pagination, extraction and CSV/JSON output runs without Chromium.

use std::path::Path;
use std::time::Duration;

use fdscrape_core::{CatalogRules, ProductRecord};
use fdscrape_scraper::{
    read_json, write_records, CatalogWalker, ScraperError, SnapshotBrowser, StopReason,
    WalkSettings,
};

const PAGE_ONE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Eyeglasses | FramesDirect</title></head>
<body>
  <div class="catalog-grid">
    <div class="prod-holder" data-description="Ray-Ban_RB5154.Clubmaster_49">
      <span class="catalog-name">Ray-Ban</span>
      <span class="prod-title prod-name">RB5154 Clubmaster</span>
      <span class="product-list-price">$1,450.00</span>
      <span class="price">$1,234.56</span>
      <span class="discount-badge">20% Off</span>
    </div>
    <div class="prod-holder" data-description="Oakley_OX8046.Airdrop_57">
      <span class="catalog-name">Oakley</span>
      <span class="product-list-price">$203.00</span>
      <span class="price">$172.55</span>
      <span class="discount-badge">Extra 15% Off</span>
    </div>
    <div class="prod-holder" data-description="Persol_PO3007V_50">
      <span class="catalog-name">Persol</span>
      <del>$310.00</del>
      <span class="price">$263.50</span>
      <p class="promo">Today only: 15% off frames</p>
    </div>
  </div>
  <ul class="pagination">
    <li class="prev disabled"><span>Previous</span></li>
    <li class="next"><a href="?page=2">Next</a></li>
  </ul>
</body>
</html>"#;

const PAGE_TWO: &str = r#"<!DOCTYPE html>
<html>
<body>
  <div class="catalog-grid">
    <div class="prod-holder" data-description="Gucci_GG0061S_56">
      <span class="catalog-name">Gucci</span>
      <span class="price">$395</span>
    </div>
  </div>
  <ul class="pagination">
    <li class="prev"><a href="?page=1">Previous</a></li>
  </ul>
</body>
</html>"#;

fn instant_settings() -> WalkSettings {
    WalkSettings {
        wait_timeout: Duration::ZERO,
        scroll_passes: 2,
        scroll_pause: Duration::ZERO,
        click_pause: Duration::ZERO,
        max_pages: None,
    }
}

fn record(
    brand: &str,
    name: &str,
    former: Option<f64>,
    current: f64,
    discount: Option<&str>,
) -> ProductRecord {
    ProductRecord {
        brand: Some(brand.to_string()),
        product_name: Some(name.to_string()),
        former_price: former,
        current_price: Some(current),
        discount: discount.map(str::to_string),
    }
}

fn expected_records() -> Vec<ProductRecord> {
    vec![
        record("Ray-Ban", "RB5154 Clubmaster", Some(1450.0), 1234.56, Some("20% Off")),
        record("Oakley", "OX8046 Airdrop", Some(203.0), 172.55, Some("Extra 15% Off")),
        record("Persol", "PO3007V", Some(310.0), 263.5, Some("15% off")),
        record("Gucci", "GG0061S", None, 395.0, None),
    ]
}

fn write_pages(dir: &Path, pages: &[&str]) {
    for (i, html) in pages.iter().enumerate() {
        std::fs::write(dir.join(format!("page-{:02}.html", i + 1)), html).unwrap();
    }
}

async fn walk_dir(dir: &Path) -> Result<fdscrape_scraper::WalkOutcome, ScraperError> {
    let browser = SnapshotBrowser::from_dir(dir)?;
    CatalogWalker::new(&CatalogRules::default(), instant_settings())?
        .walk(browser, &format!("file://{}", dir.display()))
        .await
}

// ---------------------------------------------------------------------------
// two-page catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn two_page_catalog_yields_four_records_in_order() {
    let pages = tempfile::tempdir().unwrap();
    write_pages(pages.path(), &[PAGE_ONE, PAGE_TWO]);

    let outcome = walk_dir(pages.path()).await.unwrap();

    assert_eq!(outcome.records, expected_records());
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.stop, StopReason::NoNextControl);
}

#[tokio::test]
async fn two_page_catalog_outputs_match_records() {
    let pages = tempfile::tempdir().unwrap();
    write_pages(pages.path(), &[PAGE_ONE, PAGE_TWO]);
    let out = tempfile::tempdir().unwrap();

    let outcome = walk_dir(pages.path()).await.unwrap();
    let paths = write_records(out.path(), "framesdirect_data", &outcome.records).unwrap();

    let csv = std::fs::read_to_string(&paths[0]).unwrap();
    assert_eq!(
        csv.lines().collect::<Vec<_>>(),
        vec![
            "Brand,Product_Name,Former_Price,Current_Price,Discount",
            "Ray-Ban,RB5154 Clubmaster,1450.0,1234.56,20% Off",
            "Oakley,OX8046 Airdrop,203.0,172.55,Extra 15% Off",
            "Persol,PO3007V,310.0,263.5,15% off",
            "Gucci,GG0061S,,395.0,",
        ]
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths[1]).unwrap()).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["Brand"], "Ray-Ban");
    assert_eq!(rows[2]["Discount"], "15% off");
    assert!(rows[3]["Former_Price"].is_null());
    assert!(rows[3]["Discount"].is_null());

    assert_eq!(read_json(&paths[1]).unwrap(), expected_records());
}

// ---------------------------------------------------------------------------
// failure paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_page_without_tiles_fails() {
    let pages = tempfile::tempdir().unwrap();
    write_pages(
        pages.path(),
        &["<html><body><h1>Pardon Our Interruption</h1></body></html>"],
    );

    let browser = SnapshotBrowser::from_dir(pages.path()).unwrap();
    let stats = browser.stats();
    let err = CatalogWalker::new(&CatalogRules::default(), instant_settings())
        .unwrap()
        .walk(browser, "https://www.framesdirect.com/eyeglasses/")
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::WaitTimeout { .. }), "got: {err:?}");
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn dead_next_link_returns_partial_results() {
    let pages = tempfile::tempdir().unwrap();
    write_pages(pages.path(), &[PAGE_ONE]);

    let outcome = walk_dir(pages.path()).await.unwrap();

    assert_eq!(outcome.records, expected_records()[..3].to_vec());
    assert_eq!(outcome.stop, StopReason::PaginationTimeout);
}

#[tokio::test]
async fn repeated_page_produces_duplicate_records() {
    let pages = tempfile::tempdir().unwrap();
    write_pages(pages.path(), &[PAGE_ONE, PAGE_ONE, PAGE_TWO]);

    let outcome = walk_dir(pages.path()).await.unwrap();

    assert_eq!(outcome.records.len(), 7);
    assert_eq!(outcome.records[..3], outcome.records[3..6]);
}

#[tokio::test]
async fn empty_snapshot_directory_is_rejected() {
    let pages = tempfile::tempdir().unwrap();
    let err = walk_dir(pages.path()).await.unwrap_err();
    assert!(matches!(err, ScraperError::NoSnapshots { .. }));
}
