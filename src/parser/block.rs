use crate::error::ParseError;
use crate::parser::record::Record;
use crate::parser::rule::{FieldRule, RuleError, RuleMatch};
use tracing::trace;

/// Groups `key: value` lines into records.
///
/// Rules are tried in order and the first match wins. A block-starter match
/// closes the current record (if it holds anything) before its own field is
/// stored. Lines no rule claims go to the fallback rule, or are dropped when
/// there is none.
#[derive(Debug, Clone)]
pub struct BlockParser {
    rules:    Vec<FieldRule>,
    fallback: Option<FieldRule>,
}

impl BlockParser {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules, fallback: None }
    }

    pub fn with_fallback(mut self, rule: FieldRule) -> Self {
        self.fallback = Some(rule);
        self
    }

    pub fn parse<I, S>(&self, lines: I) -> Result<Vec<Record>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = Vec::new();
        let mut current = Record::new();

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let matched = self.match_line(line).map_err(|e| ParseError::MalformedValue {
                line:   idx + 1,
                field:  e.field,
                value:  e.value,
                source: e.source,
            })?;

            match matched {
                Some(RuleMatch::Field { name, value, starts_block }) => {
                    if starts_block && !current.is_empty() {
                        records.push(std::mem::take(&mut current));
                    }
                    current.insert(name, value);
                }
                Some(RuleMatch::Ignore) => {}
                None => trace!(line = idx + 1, text = line, "no rule matched"),
            }
        }

        if !current.is_empty() {
            records.push(current);
        }
        Ok(records)
    }

    fn match_line(&self, line: &str) -> Result<Option<RuleMatch>, RuleError> {
        for rule in &self.rules {
            if let Some(m) = rule.apply(line)? {
                return Ok(Some(m));
            }
        }
        match &self.fallback {
            Some(rule) => Ok(rule.apply(line)?.map(|m| match m {
                // Only configured rules may open a block.
                RuleMatch::Field { name, value, .. } => RuleMatch::Field { name, value, starts_block: false },
                RuleMatch::Ignore => RuleMatch::Ignore,
            })),
            None => Ok(None),
        }
    }
}
