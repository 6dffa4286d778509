use serde::{Deserialize, Serialize};

/// One product tile from a catalog listing page, reduced to the five fields
/// written to the CSV and JSON exports.
///
/// Field order is significant: it is the CSV column order and the JSON key
/// order (`Brand`, `Product_Name`, `Former_Price`, `Current_Price`, `Discount`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Brand")]
    pub brand: Option<String>,
    #[serde(rename = "Product_Name")]
    pub product_name: Option<String>,
    /// List / original price before any markdown, currency symbol stripped.
    #[serde(rename = "Former_Price")]
    pub former_price: Option<f64>,
    /// Price the tile is currently offered at, currency symbol stripped.
    #[serde(rename = "Current_Price")]
    pub current_price: Option<f64>,
    /// Free-form discount text, e.g. `"20% off"` or the badge label verbatim.
    #[serde(rename = "Discount")]
    pub discount: Option<String>,
}

impl ProductRecord {
    /// Returns `true` when the record carries a non-empty brand or product
    /// name. Tiles that fail this check are dropped during extraction.
    #[must_use]
    pub fn is_identifiable(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.brand) || present(&self.product_name)
    }
}
