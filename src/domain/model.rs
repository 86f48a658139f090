use crate::utils::error::{AnalyzerError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A normalized account handle: trimmed, lowercased, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Normalizes `raw`; returns `None` when nothing but whitespace is left.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw.to_lowercase().trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn profile_url(&self) -> String {
        format!("https://instagram.com/{}", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = AnalyzerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value).ok_or_else(|| AnalyzerError::invalid_input("identifier is empty"))
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deduplicated identifiers for one side of the relationship.
///
/// Collecting into a `CanonicalList` keeps the first occurrence of every
/// identifier and drops the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Identifier>", into = "Vec<Identifier>")]
pub struct CanonicalList(Vec<Identifier>);

impl CanonicalList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from a JSON array of strings, normalizing each entry.
    ///
    /// Anything other than an array of strings is a caller bug and yields
    /// `InvalidInput`; blank strings are dropped like any other empty handle.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let items = value.as_array().ok_or_else(|| {
            AnalyzerError::invalid_input(format!(
                "expected an array of usernames, got {}",
                json_kind(value)
            ))
        })?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().ok_or_else(|| {
                    AnalyzerError::invalid_input(format!(
                        "element {} is {}, expected a string",
                        index,
                        json_kind(item)
                    ))
                })
            })
            .filter_map(|item| match item {
                Ok(raw) => Identifier::parse(raw).map(Ok),
                Err(e) => Some(Err(e)),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Identifier> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Identifier] {
        &self.0
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.0.contains(identifier)
    }

    pub fn membership(&self) -> HashSet<&Identifier> {
        self.0.iter().collect()
    }

    pub fn into_sorted(mut self) -> Self {
        self.0.sort_unstable();
        self
    }

    /// Order-insensitive equality; only uniqueness is part of the contract.
    pub fn same_members(&self, other: &CanonicalList) -> bool {
        self.len() == other.len() && self.membership() == other.membership()
    }
}

impl FromIterator<Identifier> for CanonicalList {
    fn from_iter<I: IntoIterator<Item = Identifier>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let unique = iter
            .into_iter()
            .filter(|identifier| seen.insert(identifier.clone()))
            .collect();
        Self(unique)
    }
}

impl From<Vec<Identifier>> for CanonicalList {
    fn from(value: Vec<Identifier>) -> Self {
        value.into_iter().collect()
    }
}

impl From<CanonicalList> for Vec<Identifier> {
    fn from(value: CanonicalList) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a CanonicalList {
    type Item = &'a Identifier;
    type IntoIter = std::slice::Iter<'a, Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Which export a list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSide {
    Followers,
    Following,
}

impl ListSide {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Following => "following",
        }
    }
}

impl fmt::Display for ListSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the pipeline gets its two lists from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Parse both export files.
    #[default]
    Files,
    /// Re-run reconciliation on the lists of the saved session.
    SavedState,
    /// Built-in sample lists.
    Demo,
}

/// The three derived categories, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub not_following_back: CanonicalList,
    pub mutual: CanonicalList,
    pub fans: CanonicalList,
}

impl ReconciliationResult {
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            not_following_back: self.not_following_back.len(),
            mutual: self.mutual.len(),
            fans: self.fans.len(),
        }
    }

    /// Category name paired with its list, in presentation order.
    pub fn categories(&self) -> [(&'static str, &CanonicalList); 3] {
        [
            ("not_following_back", &self.not_following_back),
            ("mutual", &self.mutual),
            ("fans", &self.fans),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub not_following_back: usize,
    pub mutual: usize,
    pub fans: usize,
}

/// Both canonical lists, ready for reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedLists {
    pub followers: CanonicalList,
    pub following: CanonicalList,
}

impl LoadedLists {
    pub fn side(&self, side: ListSide) -> &CanonicalList {
        match side {
            ListSide::Followers => &self.followers,
            ListSide::Following => &self.following,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub lists: LoadedLists,
    pub result: ReconciliationResult,
}

/// Persisted between runs so a reload can skip re-parsing the exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub followers: CanonicalList,
    pub following: CanonicalList,
    pub results: Option<ReconciliationResult>,
    pub saved_at: DateTime<Utc>,
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
