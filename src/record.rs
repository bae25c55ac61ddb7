//! String/number records and regex field extraction.
//!
//! A [`Record`] is an ordered field-name → value map, the shape of one
//! parsed log entry. [`extract`] runs a regex over one text field and
//! writes the captured groups back onto the record as new fields.
//!
//! Unlike the loose dynamic-record style this mirrors, the output-field
//! list is validated against the pattern's capture-group count up front,
//! so a mismatch is a typed error instead of silently undefined fields.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field value: text or a number.
///
/// Serializes untagged, so records round-trip to the plain JSON objects
/// a notebook feeds in: `{"url": "/a/1", "latency": 12.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A text field.
    Text(String),
    /// A numeric field.
    Number(f64),
}

impl Value {
    /// Returns the text content, or `None` for numbers.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// Returns the numeric content, or `None` for text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Text(_) => None,
            Value::Number(n) => Some(*n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// An ordered field-name → [`Value`] map representing one data record.
///
/// # Examples
/// ```
/// use nbstat::record::{Record, Value};
///
/// let mut entry = Record::new();
/// entry.set("url", "/api/v1/users/17");
/// entry.set("latency", 12.5);
///
/// assert_eq!(entry.get("url").and_then(Value::as_text), Some("/api/v1/users/17"));
/// assert_eq!(entry.get("latency").and_then(Value::as_number), Some(12.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets `field` to `value`, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns true if the record has a value under `field`.
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Error type for [`extract`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// The input field is not present on the record.
    #[error("record has no field named `{field}`")]
    MissingField {
        /// Name of the missing input field.
        field: String,
    },
    /// The input field holds a number, not text.
    #[error("field `{field}` is numeric, expected text")]
    NotText {
        /// Name of the non-text input field.
        field: String,
    },
    /// The number of output fields does not match the pattern's
    /// capture-group count.
    #[error("{expected} output field(s) supplied but pattern has {found} capture group(s)")]
    GroupCountMismatch {
        /// Output fields supplied by the caller.
        expected: usize,
        /// Capture groups present in the pattern.
        found: usize,
    },
}

/// Runs `pattern` against the text stored at `record[input_field]` and,
/// on a match, assigns capture group `i` to `output_fields[i]` as a text
/// value, mutating the record in place.
///
/// The contract is checked before anything runs: `output_fields.len()`
/// must equal the pattern's capture-group count. A pattern that simply
/// does not match is not an error — the record is left untouched and
/// `Ok(false)` is returned, so extraction can be attempted speculatively
/// over heterogeneous records.
///
/// An optional group that did not participate in the match leaves its
/// output field unassigned.
///
/// # Returns
/// - `Ok(true)` — matched, output fields assigned.
/// - `Ok(false)` — no match, record unchanged.
/// - `Err(_)` — contract violation, record unchanged.
///
/// # Examples
/// ```
/// use nbstat::record::{extract, Record, Value};
/// use regex::Regex;
///
/// let pattern = Regex::new(r"/a/(\d+)").unwrap();
/// let mut entry = Record::new();
/// entry.set("url", "/a/1");
///
/// assert_eq!(extract(&mut entry, "url", &pattern, &["id"]), Ok(true));
/// assert_eq!(entry.get("id").and_then(Value::as_text), Some("1"));
/// ```
pub fn extract(
    record: &mut Record,
    input_field: &str,
    pattern: &Regex,
    output_fields: &[&str],
) -> Result<bool, ExtractError> {
    let groups = pattern.captures_len() - 1;
    if groups != output_fields.len() {
        return Err(ExtractError::GroupCountMismatch {
            expected: output_fields.len(),
            found: groups,
        });
    }

    let value = record
        .get(input_field)
        .ok_or_else(|| ExtractError::MissingField {
            field: input_field.to_owned(),
        })?;
    let text = value
        .as_text()
        .ok_or_else(|| ExtractError::NotText {
            field: input_field.to_owned(),
        })?
        .to_owned();

    let Some(caps) = pattern.captures(&text) else {
        return Ok(false);
    };
    for (i, field) in output_fields.iter().enumerate() {
        if let Some(m) = caps.get(i + 1) {
            record.set(*field, m.as_str());
        }
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn url_record(url: &str) -> Record {
        let mut r = Record::new();
        r.set("url", url);
        r
    }

    // --- extract ---

    #[test]
    fn test_extract_match_assigns_fields() {
        let pattern = Regex::new(r"/a/(\d+)").unwrap();
        let mut entry = url_record("/a/1");
        assert_eq!(extract(&mut entry, "url", &pattern, &["id"]), Ok(true));
        assert_eq!(entry.get("id").and_then(Value::as_text), Some("1"));
    }

    #[test]
    fn test_extract_no_match_leaves_record_unchanged() {
        let pattern = Regex::new(r"/a/(\d+)").unwrap();
        let mut entry = url_record("/b");
        let before = entry.clone();
        assert_eq!(extract(&mut entry, "url", &pattern, &["id"]), Ok(false));
        assert_eq!(entry, before);
    }

    #[test]
    fn test_extract_multiple_groups() {
        let pattern = Regex::new(r"(\w+)=(\d+)").unwrap();
        let mut entry = url_record("retries=3");
        assert_eq!(
            extract(&mut entry, "url", &pattern, &["key", "count"]),
            Ok(true)
        );
        assert_eq!(entry.get("key").and_then(Value::as_text), Some("retries"));
        assert_eq!(entry.get("count").and_then(Value::as_text), Some("3"));
    }

    #[test]
    fn test_extract_group_count_mismatch() {
        let pattern = Regex::new(r"/a/(\d+)").unwrap();
        let mut entry = url_record("/a/1");
        let err = extract(&mut entry, "url", &pattern, &["id", "extra"]).unwrap_err();
        assert_eq!(
            err,
            ExtractError::GroupCountMismatch {
                expected: 2,
                found: 1
            }
        );
        // Contract violations must not half-assign fields.
        assert!(!entry.contains_field("id"));
    }

    #[test]
    fn test_extract_missing_field() {
        let pattern = Regex::new(r"(\d+)").unwrap();
        let mut entry = Record::new();
        assert_eq!(
            extract(&mut entry, "url", &pattern, &["id"]),
            Err(ExtractError::MissingField {
                field: "url".to_owned()
            })
        );
    }

    #[test]
    fn test_extract_numeric_input_field() {
        let pattern = Regex::new(r"(\d+)").unwrap();
        let mut entry = Record::new();
        entry.set("latency", 12.5);
        assert_eq!(
            extract(&mut entry, "latency", &pattern, &["id"]),
            Err(ExtractError::NotText {
                field: "latency".to_owned()
            })
        );
    }

    #[test]
    fn test_extract_optional_group_leaves_field_unset() {
        let pattern = Regex::new(r"(\d+)(?:\.(\d+))?").unwrap();
        let mut entry = url_record("42");
        assert_eq!(
            extract(&mut entry, "url", &pattern, &["whole", "frac"]),
            Ok(true)
        );
        assert_eq!(entry.get("whole").and_then(Value::as_text), Some("42"));
        assert!(!entry.contains_field("frac"));
    }

    #[test]
    fn test_extract_overwrites_existing_field() {
        let pattern = Regex::new(r"/a/(\d+)").unwrap();
        let mut entry = url_record("/a/7");
        entry.set("id", "stale");
        assert_eq!(extract(&mut entry, "url", &pattern, &["id"]), Ok(true));
        assert_eq!(entry.get("id").and_then(Value::as_text), Some("7"));
    }

    // --- Record / Value ---

    #[test]
    fn test_record_set_get() {
        let mut entry = Record::new();
        assert!(entry.is_empty());
        entry.set("status", 200.0);
        entry.set("path", "/health");
        assert_eq!(entry.len(), 2);
        assert_eq!(entry.get("status").and_then(Value::as_number), Some(200.0));
        assert_eq!(entry.get("path").and_then(Value::as_text), Some("/health"));
        assert_eq!(entry.get("missing"), None);
    }

    #[test]
    fn test_value_accessors_disjoint() {
        assert_eq!(Value::from(1.0).as_text(), None);
        assert_eq!(Value::from("x").as_number(), None);
    }

    #[test]
    fn test_record_from_iterator_and_iter() {
        let entry: Record = vec![
            ("b".to_owned(), Value::from(2.0)),
            ("a".to_owned(), Value::from("one")),
        ]
        .into_iter()
        .collect();
        let fields: Vec<&str> = entry.iter().map(|(k, _)| k).collect();
        assert_eq!(fields, vec!["a", "b"]);
    }

    #[test]
    fn test_record_json_round_trip() {
        let json = r#"{"latency": 12.5, "url": "/a/1"}"#;
        let entry: Record = serde_json::from_str(json).unwrap();
        assert_eq!(entry.get("latency").and_then(Value::as_number), Some(12.5));
        assert_eq!(entry.get("url").and_then(Value::as_text), Some("/a/1"));

        let back = serde_json::to_string(&entry).unwrap();
        let reparsed: Record = serde_json::from_str(&back).unwrap();
        assert_eq!(entry, reparsed);
    }
}
