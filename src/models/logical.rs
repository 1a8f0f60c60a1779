use crate::error::ParseError;
use crate::models::{Component, FromRecord, HealthStatus, Problems};
use crate::parser::{BlockParser, Coercion, FieldRule, FieldValue, Record};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

const VIRTUAL_DRIVE: &str = "Virtual Drive";
const NAME:          &str = "Name";
const STATE:         &str = "State";
const SIZE:          &str = "Size";
const BAD_BLOCKS:    &str = "Bad Blocks Exist";

static PARSER: Lazy<BlockParser> = Lazy::new(|| {
    BlockParser::new(vec![
        // "Adapter 0 -- Virtual Drive Information:"
        FieldRule::prefixed("Adapter ", Coercion::Text).ignored(),
        FieldRule::field(VIRTUAL_DRIVE, Coercion::LeadingInt).starts_block(),
        FieldRule::field(BAD_BLOCKS, Coercion::YesNo),
        FieldRule::field(SIZE, Coercion::Bytes),
    ])
    .with_fallback(FieldRule::wildcard())
});

/// One virtual drive from `-LDInfo -Lall`.
#[derive(Debug, Clone)]
pub struct LogicalDevice {
    pub name:             String,
    pub state:            String,
    pub virtual_drive:    Option<i64>,
    pub size_bytes:       Option<i64>,
    pub bad_blocks_exist: Option<bool>,
    pub extra:            BTreeMap<String, FieldValue>,
}

impl FromRecord for LogicalDevice {
    fn parser() -> &'static BlockParser { &PARSER }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut f = record.take("LogicalDevice");
        Ok(LogicalDevice {
            name:             f.required_text(NAME)?,
            state:            f.required_text(STATE)?,
            virtual_drive:    f.int(VIRTUAL_DRIVE)?,
            size_bytes:       f.int(SIZE)?,
            bad_blocks_exist: f.bool(BAD_BLOCKS)?,
            extra:            f.rest(),
        })
    }
}

impl Component for LogicalDevice {
    fn identifier(&self) -> String {
        format!("VD {}", self.name)
    }

    fn health_status(&self) -> HealthStatus {
        let mut problems = Problems::new();
        if self.state != "Optimal" {
            problems.insert(STATE.to_string(), FieldValue::Text(self.state.clone()));
        }
        HealthStatus::from_problems(problems)
    }
}
