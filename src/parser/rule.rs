use crate::error::CoerceError;
use crate::parser::coerce;
use crate::parser::record::FieldValue;
use once_cell::sync::Lazy;
use regex::Regex;

/// `key: value`, split at the first colon. The key must end in a word character.
static COLON_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<key>[^:]*\w)\s*:\s*(?P<value>.*?)\s*$").expect("static regex")
});

/// Split a line into its trimmed key and value, if it is a `key: value` line.
pub fn split_colon_field(line: &str) -> Option<(&str, &str)> {
    let caps = COLON_FIELD.captures(line)?;
    let key = caps.name("key")?.as_str().trim();
    let value = caps.name("value")?.as_str();
    Some((key, value))
}

/// How a matched value is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Int,
    IntOrNa,
    LeadingInt,
    YesNo,
    OkNotOk,
    Bytes,
    Duration,
}

impl Coercion {
    pub fn apply(self, value: &str) -> Result<FieldValue, CoerceError> {
        Ok(match self {
            Coercion::Text       => FieldValue::Text(value.to_string()),
            Coercion::Int        => FieldValue::Int(coerce::int(value)?),
            Coercion::IntOrNa    => FieldValue::Int(coerce::int_or_na(value)?),
            Coercion::LeadingInt => FieldValue::Int(coerce::leading_int(value)?),
            Coercion::YesNo      => FieldValue::Bool(coerce::yes_no_bool(value)),
            Coercion::OkNotOk    => FieldValue::Bool(coerce::ok_bool(value)),
            Coercion::Bytes      => FieldValue::Int(coerce::parse_bytes(value)?),
            Coercion::Duration   => FieldValue::Int(coerce::parse_duration(value)?),
        })
    }
}

/// What a matching rule does to the block being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Contributes a field.
    Normal,
    /// Contributes a field and begins a new block.
    BlockStarter,
    /// Swallows the line.
    Ignored,
}

/// Outcome of a rule that matched a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    Field { name: String, value: FieldValue, starts_block: bool },
    Ignore,
}

/// A coercion failure, before the block parser attaches the line number.
#[derive(Debug)]
pub struct RuleError {
    pub field:  String,
    pub value:  String,
    pub source: CoerceError,
}

/// Which keys a rule claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    Exact(&'static str),
    /// Keys carrying a varying suffix, e.g. an adapter number.
    Prefix(&'static str),
    Any,
}

impl KeyMatch {
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyMatch::Exact(k)  => key == *k,
            KeyMatch::Prefix(p) => key.starts_with(p),
            KeyMatch::Any       => true,
        }
    }
}

/// Recognizes one kind of `key: value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    key:      KeyMatch,
    coercion: Coercion,
    behavior: Behavior,
}

impl FieldRule {
    /// Matches only lines whose key is exactly `key`.
    pub fn field(key: &'static str, coercion: Coercion) -> Self {
        Self { key: KeyMatch::Exact(key), coercion, behavior: Behavior::Normal }
    }

    /// Matches lines whose key starts with `prefix`.
    pub fn prefixed(prefix: &'static str, coercion: Coercion) -> Self {
        Self { key: KeyMatch::Prefix(prefix), coercion, behavior: Behavior::Normal }
    }

    /// Matches every `key: value` line, keeping the value verbatim.
    pub fn wildcard() -> Self {
        Self { key: KeyMatch::Any, coercion: Coercion::Text, behavior: Behavior::Normal }
    }

    /// Shorthand for an ignored verbatim field.
    pub fn ignore(key: &'static str) -> Self {
        Self::field(key, Coercion::Text).ignored()
    }

    pub fn starts_block(mut self) -> Self {
        self.behavior = Behavior::BlockStarter;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.behavior = Behavior::Ignored;
        self
    }

    pub fn key(&self) -> KeyMatch { self.key }

    pub fn behavior(&self) -> Behavior { self.behavior }

    /// `Ok(None)` when the line is not this rule's.
    pub fn apply(&self, line: &str) -> Result<Option<RuleMatch>, RuleError> {
        let (key, value) = match split_colon_field(line) {
            Some(kv) => kv,
            None     => return Ok(None),
        };
        if !self.key.matches(key) {
            return Ok(None);
        }
        if self.behavior == Behavior::Ignored {
            return Ok(Some(RuleMatch::Ignore));
        }

        let value = self.coercion.apply(value).map_err(|source| RuleError {
            field: key.to_string(),
            value: value.to_string(),
            source,
        })?;
        Ok(Some(RuleMatch::Field {
            name: key.to_string(),
            value,
            starts_block: self.behavior == Behavior::BlockStarter,
        }))
    }
}
