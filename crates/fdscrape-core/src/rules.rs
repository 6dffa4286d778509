//! Site markup conventions for catalog extraction, kept as data.
//!
//! Every selector, attribute name and pattern the extractor and walker rely
//! on lives in [`CatalogRules`]. The defaults describe the FramesDirect
//! eyewear listing; a YAML file with the same shape replaces them without
//! touching extraction code (see [`load_rules`]).
//!
//! ## YAML shape
//!
//! ```yaml
//! tile_selector: div.prod-holder
//! brand:
//!   - description_part: { attribute: data-description, delimiter: "_", index: 0 }
//!   - selectors: [".catalog-name", ".brand"]
//! discount:
//!   - selectors: [".discount-badge"]
//!   - pattern: '(?i)\b\d{1,2}%\s*off\b'
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One strategy for resolving a text field from a product tile.
///
/// Field rule lists are evaluated in order and the first non-empty result
/// wins. In YAML each rule is a single-key map (`- selectors: [...]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRule {
    /// Split a tile attribute on `delimiter` and take part `index`.
    ///
    /// The attribute must yield at least `min_parts` parts, otherwise the rule
    /// does not apply. Every character in `separators` is replaced by a space
    /// before whitespace is collapsed.
    DescriptionPart {
        attribute: String,
        delimiter: String,
        index: usize,
        #[serde(default = "default_min_parts")]
        min_parts: usize,
        #[serde(default)]
        separators: String,
    },
    /// Visible text of the first matching element, tried selector by selector.
    Selectors(Vec<String>),
    /// First match of a regular expression in the tile's full visible text.
    Pattern(String),
}

/// How the walker finds the control that advances to the next listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRules {
    /// Exact anchor text tried before any CSS selector. `None` skips the
    /// link-text lookup.
    #[serde(default)]
    pub next_link_text: Option<String>,
    /// CSS fallbacks, tried in order.
    #[serde(default)]
    pub next_selectors: Vec<String>,
}

/// Complete extraction and pagination rule set for one catalog site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRules {
    /// Marker selector for a single product tile. Also used as the
    /// "page is rendered" signal by the walker.
    pub tile_selector: String,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub brand: Vec<TextRule>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub name: Vec<TextRule>,
    #[serde(default)]
    pub current_price: Vec<String>,
    #[serde(default)]
    pub former_price: Vec<String>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub discount: Vec<TextRule>,
    pub pagination: PaginationRules,
}

const DESCRIPTION_ATTR: &str = "data-description";

fn default_min_parts() -> usize {
    2
}

fn selectors(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

fn description_part(index: usize, separators: &str) -> TextRule {
    TextRule::DescriptionPart {
        attribute: DESCRIPTION_ATTR.to_owned(),
        delimiter: "_".to_owned(),
        index,
        min_parts: default_min_parts(),
        separators: separators.to_owned(),
    }
}

impl Default for CatalogRules {
    fn default() -> Self {
        Self {
            tile_selector: "div.prod-holder".to_owned(),
            brand: vec![
                description_part(0, ""),
                TextRule::Selectors(selectors(&[
                    ".catalog-name",
                    ".brand",
                    ".product-brand",
                    "[class*='brand']",
                ])),
            ],
            name: vec![
                description_part(1, "._"),
                TextRule::Selectors(selectors(&[
                    ".prod-title.prod-name",
                    "[class*='name']",
                    "[class*='title']",
                ])),
            ],
            current_price: selectors(&[
                "span.price",
                "[data-testid*='current']",
                "[class*='offer']",
            ]),
            former_price: selectors(&[
                ".product-list-price",
                "[class*='original']",
                "[class*='list']",
                "s",
                "del",
                "[data-testid*='original']",
            ]),
            discount: vec![
                TextRule::Selectors(selectors(&[
                    ".discount-badge",
                    "[class*='badge'][class*='discount']",
                    "[class*='off']",
                ])),
                TextRule::Pattern(r"(?i)\b\d{1,2}%\s*off\b".to_owned()),
            ],
            pagination: PaginationRules {
                next_link_text: Some("Next".to_owned()),
                next_selectors: selectors(&[
                    "a[aria-label='Next']",
                    "button[aria-label='Next']",
                    ".pagination .next a",
                    ".pagination-next a",
                    "li.next a",
                    "[rel='next']",
                ]),
            },
        }
    }
}

/// Load and validate a rule set from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<CatalogRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rules: CatalogRules = serde_yaml::from_str(&content).map_err(ConfigError::RulesFileParse)?;

    validate_rules(&rules)?;

    Ok(rules)
}

/// Structural checks only; selector and regex syntax is checked when the
/// scraper compiles the rules.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] naming the first offending field.
pub fn validate_rules(rules: &CatalogRules) -> Result<(), ConfigError> {
    if rules.tile_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "tile_selector must be non-empty".to_string(),
        ));
    }

    if rules.brand.is_empty() && rules.name.is_empty() {
        return Err(ConfigError::Validation(
            "at least one brand or name rule is required".to_string(),
        ));
    }

    let text_fields = [
        ("brand", &rules.brand),
        ("name", &rules.name),
        ("discount", &rules.discount),
    ];
    for (field, list) in text_fields {
        for rule in list {
            validate_text_rule(field, rule)?;
        }
    }

    let selector_fields = [
        ("current_price", &rules.current_price),
        ("former_price", &rules.former_price),
        ("pagination.next_selectors", &rules.pagination.next_selectors),
    ];
    for (field, list) in selector_fields {
        if list.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{field} contains an empty selector"
            )));
        }
    }

    if rules
        .pagination
        .next_link_text
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "pagination.next_link_text must be non-empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_text_rule(field: &str, rule: &TextRule) -> Result<(), ConfigError> {
    match rule {
        TextRule::DescriptionPart {
            attribute,
            delimiter,
            index,
            min_parts,
            ..
        } => {
            if attribute.trim().is_empty() || delimiter.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{field}: description_part needs an attribute and a delimiter"
                )));
            }
            if *min_parts == 0 || index >= min_parts {
                return Err(ConfigError::Validation(format!(
                    "{field}: description_part index {index} must be below min_parts {min_parts}"
                )));
            }
        }
        TextRule::Selectors(list) => {
            if list.is_empty() || list.iter().any(|s| s.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "{field}: selectors rule must list non-empty selectors"
                )));
            }
        }
        TextRule::Pattern(pattern) => {
            if pattern.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{field}: pattern must be non-empty"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
