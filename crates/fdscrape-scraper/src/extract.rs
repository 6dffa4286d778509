//! Product tile extraction from one rendered listing page.
//!
//! [`PageExtractor`] compiles a [`CatalogRules`] set once and is then a pure
//! function of an HTML snapshot: no I/O, no browser access. Each field is
//! resolved independently through its ordered rule list, so a field that
//! cannot be found is left `None` without affecting its siblings or other
//! tiles.

use fdscrape_core::{CatalogRules, ProductRecord, TextRule};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;
use crate::text::{collapse_whitespace, element_text, parse_price, spaced_text};

/// Result of extracting one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBatch {
    /// Number of elements matching the tile marker, kept or not.
    pub tiles_found: usize,
    /// Records for tiles with a brand or a name, in document order.
    pub records: Vec<ProductRecord>,
}

/// Compiled form of a [`TextRule`].
#[derive(Debug)]
enum FieldRule {
    DescriptionPart {
        attribute: String,
        delimiter: String,
        index: usize,
        min_parts: usize,
        separators: Vec<char>,
    },
    Selectors(Vec<Selector>),
    Pattern(Regex),
}

impl FieldRule {
    fn compile(rule: &TextRule) -> Result<Self, ScraperError> {
        Ok(match rule {
            TextRule::DescriptionPart {
                attribute,
                delimiter,
                index,
                min_parts,
                separators,
            } => Self::DescriptionPart {
                attribute: attribute.clone(),
                delimiter: delimiter.clone(),
                index: *index,
                min_parts: *min_parts,
                separators: separators.chars().collect(),
            },
            TextRule::Selectors(list) => Self::Selectors(compile_selectors(list)?),
            TextRule::Pattern(pattern) => {
                Self::Pattern(Regex::new(pattern).map_err(|source| {
                    ScraperError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    }
                })?)
            }
        })
    }

    /// Applies the rule to one tile. Empty results count as no match.
    fn apply(&self, tile: ElementRef<'_>) -> Option<String> {
        let value = match self {
            Self::DescriptionPart {
                attribute,
                delimiter,
                index,
                min_parts,
                separators,
            } => {
                let raw = tile.value().attr(attribute)?;
                let parts: Vec<&str> = raw.split(delimiter.as_str()).collect();
                if parts.len() < *min_parts {
                    return None;
                }
                let part: String = parts
                    .get(*index)?
                    .chars()
                    .map(|c| if separators.contains(&c) { ' ' } else { c })
                    .collect();
                collapse_whitespace(&part)
            }
            Self::Selectors(selectors) => selectors
                .iter()
                .flat_map(|selector| tile.select(selector))
                .map(element_text)
                .find(|text| !text.is_empty())?,
            Self::Pattern(re) => re.find(&spaced_text(tile))?.as_str().to_owned(),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Extracts [`ProductRecord`]s from rendered listing HTML.
#[derive(Debug)]
pub struct PageExtractor {
    tile_css: String,
    tile: Selector,
    brand: Vec<FieldRule>,
    name: Vec<FieldRule>,
    discount: Vec<FieldRule>,
    current_price: Vec<Selector>,
    former_price: Vec<Selector>,
}

impl PageExtractor {
    /// Compiles every selector and pattern in `rules`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidSelector`]: a CSS selector does not parse.
    /// - [`ScraperError::InvalidPattern`]: a regex pattern does not compile.
    pub fn new(rules: &CatalogRules) -> Result<Self, ScraperError> {
        let compile_rules = |list: &[TextRule]| -> Result<Vec<FieldRule>, ScraperError> {
            list.iter().map(FieldRule::compile).collect()
        };

        Ok(Self {
            tile_css: rules.tile_selector.clone(),
            tile: compile_selector(&rules.tile_selector)?,
            brand: compile_rules(&rules.brand)?,
            name: compile_rules(&rules.name)?,
            discount: compile_rules(&rules.discount)?,
            current_price: compile_selectors(&rules.current_price)?,
            former_price: compile_selectors(&rules.former_price)?,
        })
    }

    /// The tile marker selector, as written in the rules.
    #[must_use]
    pub fn tile_selector(&self) -> &str {
        &self.tile_css
    }

    /// Extracts all identifiable records from `html`.
    #[must_use]
    pub fn extract(&self, html: &str) -> Vec<ProductRecord> {
        self.extract_page(html).records
    }

    /// Extracts records and reports how many tiles the page held.
    #[must_use]
    pub fn extract_page(&self, html: &str) -> PageBatch {
        let document = Html::parse_document(html);
        let mut batch = PageBatch::default();

        for tile in document.select(&self.tile) {
            batch.tiles_found += 1;
            let record = self.extract_tile(tile);
            if record.is_identifiable() {
                batch.records.push(record);
            }
        }

        batch
    }

    fn extract_tile(&self, tile: ElementRef<'_>) -> ProductRecord {
        ProductRecord {
            brand: resolve(&self.brand, tile),
            product_name: resolve(&self.name, tile),
            former_price: first_price(&self.former_price, tile),
            current_price: first_price(&self.current_price, tile),
            discount: resolve(&self.discount, tile),
        }
    }
}

/// First non-empty result of an ordered rule list.
fn resolve(rules: &[FieldRule], tile: ElementRef<'_>) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(tile))
}

/// Price from the first element, in selector-list order, whose text holds a
/// number. Elements without digits are skipped.
fn first_price(selectors: &[Selector], tile: ElementRef<'_>) -> Option<f64> {
    selectors
        .iter()
        .flat_map(|selector| tile.select(selector))
        .find_map(|element| parse_price(&spaced_text(element)))
}

pub(crate) fn compile_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::InvalidSelector {
        selector: css.to_owned(),
        reason: e.to_string(),
    })
}

fn compile_selectors(list: &[String]) -> Result<Vec<Selector>, ScraperError> {
    list.iter().map(|css| compile_selector(css)).collect()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
