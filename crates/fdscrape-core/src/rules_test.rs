use std::io::Write;

use super::*;

fn write_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write yaml");
    file
}

#[test]
fn default_rules_are_valid() {
    assert!(validate_rules(&CatalogRules::default()).is_ok());
}

#[test]
fn default_rules_prefer_description_attribute_for_brand_and_name() {
    let rules = CatalogRules::default();
    assert!(matches!(
        rules.brand.first(),
        Some(TextRule::DescriptionPart { index: 0, .. })
    ));
    assert!(matches!(
        rules.name.first(),
        Some(TextRule::DescriptionPart { index: 1, .. })
    ));
}

#[test]
fn default_pagination_tries_link_text_first() {
    let rules = CatalogRules::default();
    assert_eq!(rules.pagination.next_link_text.as_deref(), Some("Next"));
    assert_eq!(
        rules.pagination.next_selectors.last().map(String::as_str),
        Some("[rel='next']")
    );
}

#[test]
fn validate_rejects_empty_tile_selector() {
    let rules = CatalogRules {
        tile_selector: "  ".to_string(),
        ..CatalogRules::default()
    };
    let err = validate_rules(&rules).unwrap_err();
    assert!(err.to_string().contains("tile_selector"));
}

#[test]
fn validate_rejects_missing_brand_and_name_rules() {
    let rules = CatalogRules {
        brand: vec![],
        name: vec![],
        ..CatalogRules::default()
    };
    let err = validate_rules(&rules).unwrap_err();
    assert!(err.to_string().contains("brand or name"));
}

#[test]
fn validate_rejects_index_outside_min_parts() {
    let rules = CatalogRules {
        name: vec![TextRule::DescriptionPart {
            attribute: "data-description".to_string(),
            delimiter: "_".to_string(),
            index: 2,
            min_parts: 2,
            separators: String::new(),
        }],
        ..CatalogRules::default()
    };
    let err = validate_rules(&rules).unwrap_err();
    assert!(err.to_string().contains("index 2"));
}

#[test]
fn validate_rejects_empty_price_selector() {
    let mut rules = CatalogRules::default();
    rules.former_price.push(String::new());
    let err = validate_rules(&rules).unwrap_err();
    assert!(err.to_string().contains("former_price"));
}

#[test]
fn validate_rejects_blank_link_text() {
    let mut rules = CatalogRules::default();
    rules.pagination.next_link_text = Some(" ".to_string());
    let err = validate_rules(&rules).unwrap_err();
    assert!(err.to_string().contains("next_link_text"));
}

#[test]
fn yaml_round_trip_preserves_default_rules() {
    let yaml = serde_yaml::to_string(&CatalogRules::default()).unwrap();
    let parsed: CatalogRules = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, CatalogRules::default());
}

#[test]
fn load_rules_reads_minimal_yaml_with_defaults_for_optional_fields() {
    let file = write_yaml(
        r#"
tile_selector: article.product
name:
  - description_part: { attribute: data-sku-name, delimiter: "|", index: 0, min_parts: 1 }
  - selectors: [".title"]
discount:
  - pattern: '(?i)save \d+%'
pagination:
  next_selectors: ["a.next"]
"#,
    );
    let rules = load_rules(file.path()).expect("rules should load");
    assert_eq!(rules.tile_selector, "article.product");
    assert!(rules.brand.is_empty());
    assert!(rules.current_price.is_empty());
    assert!(rules.pagination.next_link_text.is_none());
    assert_eq!(
        rules.name[0],
        TextRule::DescriptionPart {
            attribute: "data-sku-name".to_string(),
            delimiter: "|".to_string(),
            index: 0,
            min_parts: 1,
            separators: String::new(),
        }
    );
}

#[test]
fn load_rules_reports_missing_file() {
    let err = load_rules(Path::new("/definitely/not/here/rules.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::RulesFileIo { .. }));
}

#[test]
fn load_rules_reports_parse_error() {
    let file = write_yaml("tile_selector: [unterminated");
    let err = load_rules(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::RulesFileParse(_)));
}

#[test]
fn load_rules_runs_validation() {
    let file = write_yaml(
        r#"
tile_selector: ""
name:
  - selectors: [".title"]
pagination: {}
"#,
    );
    let err = load_rules(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}
