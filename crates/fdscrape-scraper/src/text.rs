//! Text normalization and price parsing for rendered listing markup.
//!
//! All extracted strings go through [`collapse_whitespace`] so that stored
//! values reflect what a shopper sees, not how the markup happens to be
//! indented.

use std::sync::LazyLock;

use scraper::ElementRef;

/// Number-like run: digits with optional thousands commas and an optional
/// decimal fraction (`"1,234.56"`), or a bare fraction (`".99"`). A lone `.`
/// never matches.
static PRICE_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\d[\d,]*(?:\.\d+)?|\.\d+").expect("valid price regex")
});

/// Collapses every whitespace run to a single space and trims both ends.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with adjacent text nodes concatenated.
///
/// `"<b>Ray</b>-Ban"` reads `"Ray-Ban"`. Use this for labels such as brand
/// and product name.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Visible text of an element with a space between text nodes.
///
/// Keeps numbers in neighbouring nodes apart (`"<s>$99</s><b>$79</b>"` reads
/// `"$99 $79"`). Use this for prices and whole-tile scans.
pub(crate) fn spaced_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Parses the first number-like substring of `text` as a price.
///
/// Thousands separators are stripped before parsing. Returns `None` when the
/// text holds no digits, so a missing price never reads as zero.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let m = PRICE_RE.find(text)?;
    m.as_str().replace(',', "").parse::<f64>().ok()
}
