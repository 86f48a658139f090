//! Ordered extraction strategies.
//!
//! Each strategy answers two questions about a record: does it have the shape
//! I understand (`applies`), and if so, which identifier does it yield
//! (`extract`). The extractor walks the list in priority order and stops at
//! the first strategy that yields an identifier.

use crate::core::normalize::{handle_from_url, non_blank_str};
use crate::domain::model::Identifier;
use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn applies(&self, record: &Record) -> bool;
    fn extract(&self, record: &Record) -> Option<Identifier>;
}

const STRING_LIST_DATA: &str = "string_list_data";

fn string_list_entries(record: &Record) -> Option<&Vec<Value>> {
    record.get(STRING_LIST_DATA).and_then(Value::as_array)
}

/// First `string_list_data[*].value` with content.
pub struct StringListValue;

impl ExtractionStrategy for StringListValue {
    fn name(&self) -> &'static str {
        "string_list_data.value"
    }

    fn applies(&self, record: &Record) -> bool {
        string_list_entries(record).is_some()
    }

    fn extract(&self, record: &Record) -> Option<Identifier> {
        string_list_entries(record)?
            .iter()
            .filter_map(Value::as_object)
            .find_map(|entry| non_blank_str(entry, "value"))
            .and_then(Identifier::parse)
    }
}

/// Falls back to the profile URLs inside `string_list_data`.
pub struct StringListHref;

impl ExtractionStrategy for StringListHref {
    fn name(&self) -> &'static str {
        "string_list_data.href"
    }

    fn applies(&self, record: &Record) -> bool {
        string_list_entries(record).is_some()
    }

    fn extract(&self, record: &Record) -> Option<Identifier> {
        string_list_entries(record)?
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|entry| entry.get("href").and_then(Value::as_str))
            .find_map(handle_from_url)
    }
}

/// A plain string member such as `value` or `username`.
pub struct DirectField(pub &'static str);

impl ExtractionStrategy for DirectField {
    fn name(&self) -> &'static str {
        self.0
    }

    fn applies(&self, record: &Record) -> bool {
        record.get(self.0).is_some_and(Value::is_string)
    }

    fn extract(&self, record: &Record) -> Option<Identifier> {
        non_blank_str(record, self.0).and_then(Identifier::parse)
    }
}

/// A top-level `href` holding a profile URL.
pub struct ProfileUrl;

impl ExtractionStrategy for ProfileUrl {
    fn name(&self) -> &'static str {
        "href"
    }

    fn applies(&self, record: &Record) -> bool {
        record.get("href").is_some_and(Value::is_string)
    }

    fn extract(&self, record: &Record) -> Option<Identifier> {
        record
            .get("href")
            .and_then(Value::as_str)
            .and_then(handle_from_url)
    }
}

/// `string_list_data.value` > `string_list_data.href` > `value` > `username`
/// > `name` > `title` > `href`.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(StringListValue),
        Box::new(StringListHref),
        Box::new(DirectField("value")),
        Box::new(DirectField("username")),
        Box::new(DirectField("name")),
        Box::new(DirectField("title")),
        Box::new(ProfileUrl),
    ]
}
