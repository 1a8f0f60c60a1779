use crate::error::ParseError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A coerced field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Int(_)  => "integer",
            FieldValue::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Int(n)  => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self { FieldValue::Text(s.to_string()) }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self { FieldValue::Text(s) }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self { FieldValue::Int(n) }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self { FieldValue::Bool(b) }
}

/// One block of output: field name → typed value. A recurring field overwrites
/// the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> { self.fields.get(name) }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn into_fields(self) -> BTreeMap<String, FieldValue> { self.fields }

    /// Binds fields of one record type to struct attributes, removing each as it goes.
    pub fn take(self, record: &'static str) -> FieldTaker {
        FieldTaker { record, fields: self.fields }
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        Self { fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}

/// Consumes a [`Record`] field by field while building a typed record.
/// Whatever is left over ends up in the record's `extra` map.
pub struct FieldTaker {
    record: &'static str,
    fields: BTreeMap<String, FieldValue>,
}

impl FieldTaker {
    pub fn text(&mut self, field: &'static str) -> Result<Option<String>, ParseError> {
        match self.fields.remove(field) {
            None                        => Ok(None),
            Some(FieldValue::Text(s))   => Ok(Some(s)),
            Some(other)                 => Err(self.mismatch(field, "text", &other)),
        }
    }

    pub fn int(&mut self, field: &'static str) -> Result<Option<i64>, ParseError> {
        match self.fields.remove(field) {
            None                        => Ok(None),
            Some(FieldValue::Int(n))    => Ok(Some(n)),
            Some(other)                 => Err(self.mismatch(field, "integer", &other)),
        }
    }

    pub fn bool(&mut self, field: &'static str) -> Result<Option<bool>, ParseError> {
        match self.fields.remove(field) {
            None                        => Ok(None),
            Some(FieldValue::Bool(b))   => Ok(Some(b)),
            Some(other)                 => Err(self.mismatch(field, "boolean", &other)),
        }
    }

    pub fn required_text(&mut self, field: &'static str) -> Result<String, ParseError> {
        self.text(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn required_int(&mut self, field: &'static str) -> Result<i64, ParseError> {
        self.int(field)?.ok_or_else(|| self.missing(field))
    }

    /// Unrecognized fields, kept verbatim.
    pub fn rest(self) -> BTreeMap<String, FieldValue> { self.fields }

    fn missing(&self, field: &'static str) -> ParseError {
        ParseError::MissingField { record: self.record, field }
    }

    fn mismatch(&self, field: &'static str, expected: &'static str, found: &FieldValue) -> ParseError {
        ParseError::UnexpectedType {
            record: self.record,
            field,
            expected,
            found: format!("{} {:?}", found.type_name(), found.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        [
            ("Name", FieldValue::from("data")),
            ("Size", FieldValue::from(1_000_i64)),
            ("Bad Blocks Exist", FieldValue::from(false)),
            ("Strip Size", FieldValue::from("64 KB")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_insert_overwrites() {
        let mut rec = Record::new();
        rec.insert("State", "Degraded".into());
        rec.insert("State", "Optimal".into());
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("State"), Some(&FieldValue::from("Optimal")));
    }

    #[test]
    fn test_taker_binds_and_leaves_rest() {
        let mut t = sample().take("LogicalDevice");
        assert_eq!(t.required_text("Name").unwrap(), "data");
        assert_eq!(t.int("Size").unwrap(), Some(1_000));
        assert_eq!(t.bool("Bad Blocks Exist").unwrap(), Some(false));
        assert_eq!(t.bool("Absent").unwrap(), None);
        let rest = t.rest();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest["Strip Size"], FieldValue::from("64 KB"));
    }

    #[test]
    fn test_taker_missing_required() {
        let mut t = sample().take("LogicalDevice");
        let err = t.required_text("State").unwrap_err();
        assert!(matches!(err, ParseError::MissingField { field: "State", .. }));
    }

    #[test]
    fn test_taker_type_mismatch() {
        let mut t = sample().take("LogicalDevice");
        let err = t.int("Name").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedType { expected: "integer", .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from("Degraded").to_string(), "Degraded");
        assert_eq!(FieldValue::from(3_i64).to_string(), "3");
        assert_eq!(FieldValue::from(true).to_string(), "true");
    }
}
