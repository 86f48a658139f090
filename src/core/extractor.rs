use crate::core::strategy::{default_strategies, ExtractionStrategy, Record};
use crate::domain::model::{json_kind, CanonicalList, Identifier};
use crate::utils::error::{AnalyzerError, Result};
use serde::Serialize;
use serde_json::Value;

/// Keys that hold the relationship array in known export layouts, checked
/// before any other array member.
pub const PRIORITY_KEYS: [&str; 4] = [
    "relationships_following",
    "relationships_followers",
    "followers",
    "following",
];

/// Where the record collection was found inside the raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum CollectionSource {
    TopLevelArray,
    PriorityKey(String),
    FirstArrayMember(String),
}

/// Borrowed form of [`CollectionSource`] returned by the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSourceRef<'a> {
    TopLevelArray,
    PriorityKey(&'a str),
    FirstArrayMember(&'a str),
}

impl CollectionSourceRef<'_> {
    pub fn to_owned_source(self) -> CollectionSource {
        match self {
            Self::TopLevelArray => CollectionSource::TopLevelArray,
            Self::PriorityKey(key) => CollectionSource::PriorityKey(key.to_string()),
            Self::FirstArrayMember(key) => CollectionSource::FirstArrayMember(key.to_string()),
        }
    }
}

/// Locates the array of export records inside `raw`.
///
/// A top-level array is the collection itself. For objects the priority keys
/// win over any other array member, whatever their position; otherwise the
/// first array member in document order is used.
pub fn find_record_collection(raw: &Value) -> Option<(CollectionSourceRef<'_>, &[Value])> {
    match raw {
        Value::Array(items) => Some((CollectionSourceRef::TopLevelArray, items.as_slice())),
        Value::Object(members) => {
            for key in PRIORITY_KEYS {
                if let Some(Value::Array(items)) = members.get(key) {
                    return Some((CollectionSourceRef::PriorityKey(key), items.as_slice()));
                }
            }
            members.iter().find_map(|(key, value)| {
                value
                    .as_array()
                    .map(|items| (CollectionSourceRef::FirstArrayMember(key.as_str()), items.as_slice()))
            })
        }
        _ => None,
    }
}

/// Outcome of one extraction, detailed enough for a caller to tell "no
/// collection" apart from "collection without usable records".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub source: Option<CollectionSource>,
    pub records_seen: usize,
    pub records_skipped: usize,
    pub identifiers: CanonicalList,
}

impl ExtractionReport {
    /// Turns an empty extraction into the matching error for `file`.
    pub fn into_result(self, file: &str) -> Result<CanonicalList> {
        if self.source.is_none() {
            return Err(AnalyzerError::NoRecordCollectionFound {
                file: file.to_string(),
            });
        }
        if self.identifiers.is_empty() {
            return Err(AnalyzerError::NoIdentifiersExtracted {
                file: file.to_string(),
                records: self.records_seen,
            });
        }
        Ok(self.identifiers)
    }

    pub fn duplicates_removed(&self) -> usize {
        self.records_seen - self.records_skipped - self.identifiers.len()
    }
}

/// Reduces any supported export shape to a [`CanonicalList`].
pub struct IdentifierExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }
}

impl IdentifierExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Appends a strategy after the built-in ones.
    pub fn with_strategy(mut self, strategy: Box<dyn ExtractionStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// One identifier for one record, or `None` when every strategy fails.
    pub fn extract_identifier(&self, record: &Value) -> Option<Identifier> {
        let record = record.as_object()?;
        self.extract_from_record(record)
    }

    fn extract_from_record(&self, record: &Record) -> Option<Identifier> {
        self.strategies
            .iter()
            .filter(|strategy| strategy.applies(record))
            .find_map(|strategy| {
                let identifier = strategy.extract(record);
                if identifier.is_some() {
                    tracing::trace!("record matched strategy '{}'", strategy.name());
                }
                identifier
            })
    }

    pub fn extract_identifiers(&self, raw: &Value) -> CanonicalList {
        self.extract_with_report(raw).identifiers
    }

    pub fn extract_with_report(&self, raw: &Value) -> ExtractionReport {
        tracing::debug!("raw export shape: {}", ShapePreview::of(raw));

        let Some((source, records)) = find_record_collection(raw) else {
            tracing::warn!("no record collection found in {}", json_kind(raw));
            return ExtractionReport {
                source: None,
                records_seen: 0,
                records_skipped: 0,
                identifiers: CanonicalList::new(),
            };
        };

        tracing::debug!("found {} records via {:?}", records.len(), source);

        let mut skipped = 0;
        let identifiers: CanonicalList = records
            .iter()
            .filter_map(|record| {
                let identifier = self.extract_identifier(record);
                if identifier.is_none() {
                    skipped += 1;
                }
                identifier
            })
            .collect();

        if skipped > 0 {
            tracing::debug!("{} records yielded no username", skipped);
        }

        ExtractionReport {
            source: Some(source.to_owned_source()),
            records_seen: records.len(),
            records_skipped: skipped,
            identifiers,
        }
    }
}

/// Extracts with the built-in strategies; never fails, may be empty.
pub fn extract_identifiers(raw: &Value) -> CanonicalList {
    IdentifierExtractor::default().extract_identifiers(raw)
}

pub fn extract_identifier(record: &Value) -> Option<Identifier> {
    IdentifierExtractor::default().extract_identifier(record)
}

/// Debug summary of an unknown JSON value's structure.
#[derive(Debug, Clone, Serialize)]
pub struct ShapePreview {
    pub is_array: bool,
    pub top_level_keys: Vec<String>,
    pub array_key: Option<String>,
    pub array_length: Option<usize>,
    pub first_item: Option<Value>,
}

impl ShapePreview {
    pub fn of(raw: &Value) -> Self {
        let mut preview = Self {
            is_array: raw.is_array(),
            top_level_keys: Vec::new(),
            array_key: None,
            array_length: None,
            first_item: None,
        };

        match raw {
            Value::Array(items) => {
                preview.array_length = Some(items.len());
                preview.first_item = items.first().cloned();
            }
            Value::Object(members) => {
                preview.top_level_keys = members.keys().cloned().collect();
                if let Some((key, items)) = members
                    .iter()
                    .find_map(|(key, value)| value.as_array().map(|items| (key, items)))
                {
                    preview.array_key = Some(key.clone());
                    preview.array_length = Some(items.len());
                    preview.first_item = items.first().cloned();
                }
            }
            _ => {}
        }

        preview
    }
}

impl std::fmt::Display for ShapePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &CanonicalList) -> Vec<&str> {
        list.iter().map(Identifier::as_str).collect()
    }

    #[test]
    fn test_nested_string_list_data_under_priority_key() {
        let raw = json!({
            "relationships_following": [
                {"string_list_data": [{"value": "Ali_Dev", "href": "https://instagram.com/ali_dev"}]}
            ]
        });
        assert_eq!(names(&extract_identifiers(&raw)), vec!["ali_dev"]);
    }

    #[test]
    fn test_flat_records_deduplicate_case_insensitively() {
        let raw = json!([{"value": "SARA"}, {"value": "sara"}, {"username": "reza"}]);
        let list = extract_identifiers(&raw);
        let expected: CanonicalList = ["sara", "reza"]
            .into_iter()
            .filter_map(Identifier::parse)
            .collect();
        assert!(list.same_members(&expected));
    }

    #[test]
    fn test_href_only_records() {
        let raw = json!([{"href": "https://instagram.com/mina.art"}]);
        assert_eq!(names(&extract_identifiers(&raw)), vec!["mina.art"]);
    }

    #[test]
    fn test_no_collection_yields_empty_list() {
        assert!(extract_identifiers(&json!({"meta": "x"})).is_empty());
        assert!(extract_identifiers(&json!("followers")).is_empty());
        assert!(extract_identifiers(&json!(null)).is_empty());
    }

    #[test]
    fn test_priority_key_beats_earlier_array_member() {
        let raw = json!({
            "media": [{"title": "sunset"}],
            "relationships_following": [{"value": "ali_dev"}]
        });
        let (source, records) = find_record_collection(&raw).unwrap();
        assert_eq!(source, CollectionSourceRef::PriorityKey("relationships_following"));
        assert_eq!(records.len(), 1);
        assert_eq!(names(&extract_identifiers(&raw)), vec!["ali_dev"]);
    }

    #[test]
    fn test_priority_keys_checked_in_fixed_order() {
        let raw = json!({
            "following": [{"value": "b"}],
            "relationships_followers": [{"value": "a"}]
        });
        assert_eq!(names(&extract_identifiers(&raw)), vec!["a"]);
    }

    #[test]
    fn test_priority_key_must_hold_an_array() {
        let raw = json!({
            "followers": "not a list",
            "data": [{"username": "x"}]
        });
        let (source, _) = find_record_collection(&raw).unwrap();
        assert_eq!(source, CollectionSourceRef::FirstArrayMember("data"));
    }

    #[test]
    fn test_fallback_scan_uses_document_order() {
        let raw = json!({
            "zeta": [{"value": "first"}],
            "alpha": [{"value": "second"}]
        });
        assert_eq!(names(&extract_identifiers(&raw)), vec!["first"]);
    }

    #[test]
    fn test_strategy_priority_within_a_record() {
        let record = json!({
            "string_list_data": [{"value": "from_list"}],
            "value": "from_value",
            "username": "from_username"
        });
        assert_eq!(extract_identifier(&record).unwrap().as_str(), "from_list");

        let record = json!({"string_list_data": [], "title": "Title_Case"});
        assert_eq!(extract_identifier(&record).unwrap().as_str(), "title_case");

        let record = json!({"value": " ", "username": "", "name": "Nazanin"});
        assert_eq!(extract_identifier(&record).unwrap().as_str(), "nazanin");
    }

    #[test]
    fn test_non_object_records_are_skipped() {
        let raw = json!(["ali", 3, null, [{"value": "x"}], {"value": "kept"}]);
        let report = IdentifierExtractor::default().extract_with_report(&raw);
        assert_eq!(report.records_seen, 5);
        assert_eq!(report.records_skipped, 4);
        assert_eq!(names(&report.identifiers), vec!["kept"]);
    }

    #[test]
    fn test_report_distinguishes_empty_outcomes() {
        let extractor = IdentifierExtractor::default();

        let missing = extractor.extract_with_report(&json!({"meta": "x"}));
        assert!(matches!(
            missing.into_result("f.json"),
            Err(AnalyzerError::NoRecordCollectionFound { .. })
        ));

        let unusable = extractor.extract_with_report(&json!([{"id": 1}, {"id": 2}]));
        assert!(matches!(
            unusable.into_result("f.json"),
            Err(AnalyzerError::NoIdentifiersExtracted { records: 2, .. })
        ));
    }

    #[test]
    fn test_report_counts_duplicates() {
        let raw = json!([{"value": "a"}, {"value": "A"}, {"value": "b"}, {"id": 9}]);
        let report = IdentifierExtractor::default().extract_with_report(&raw);
        assert_eq!(report.source, Some(CollectionSource::TopLevelArray));
        assert_eq!(report.duplicates_removed(), 1);
    }

    #[test]
    fn test_extraction_is_idempotent_and_normalized() {
        let raw = json!({
            "relationships_followers": [
                {"string_list_data": [{"value": "  Hossein_JS "}]},
                {"string_list_data": [{"href": "https://www.instagram.com/Zahra.Vue"}]},
                {"username": "HOSSEIN_js"},
                {"name": "Fatemeh_CSS"}
            ]
        });
        let first = extract_identifiers(&raw);
        let second = extract_identifiers(&raw);
        assert!(first.same_members(&second));
        assert_eq!(first.len(), 3);
        for identifier in &first {
            let s = identifier.as_str();
            assert_eq!(s, s.trim());
            assert_eq!(s, s.to_lowercase());
            assert!(!s.is_empty());
        }
    }

    struct IdField;

    impl ExtractionStrategy for IdField {
        fn name(&self) -> &'static str {
            "id"
        }

        fn applies(&self, record: &Record) -> bool {
            record.contains_key("id")
        }

        fn extract(&self, record: &Record) -> Option<Identifier> {
            record
                .get("id")
                .map(|id| id.to_string())
                .and_then(|id| Identifier::parse(&id))
        }
    }

    #[test]
    fn test_custom_strategy_runs_after_builtins() {
        let extractor = IdentifierExtractor::default().with_strategy(Box::new(IdField));
        assert_eq!(extractor.strategy_names().last(), Some(&"id"));

        let raw = json!([{"id": 17}, {"id": 18, "username": "named"}]);
        let list = extractor.extract_identifiers(&raw);
        assert_eq!(names(&list), vec!["17", "named"]);
    }

    #[test]
    fn test_shape_preview() {
        let preview = ShapePreview::of(&json!({"meta": 1, "items": [{"value": "a"}]}));
        assert!(!preview.is_array);
        assert_eq!(preview.top_level_keys, vec!["meta", "items"]);
        assert_eq!(preview.array_key.as_deref(), Some("items"));
        assert_eq!(preview.array_length, Some(1));
    }
}
