use crate::error::ParseError;
use crate::parser::{BlockParser, Coercion, FieldRule, Record};
use once_cell::sync::Lazy;
use serde::Serialize;

const MODE:       &str = "Patrol Read Mode";
const DELAY:      &str = "Patrol Read Execution Delay";
const ITERATIONS: &str = "Number of iterations completed";
const STATE:      &str = "Current State";

// No fallback: everything else in `-AdpPR -Info` output is dropped.
static PARSER: Lazy<BlockParser> = Lazy::new(|| {
    BlockParser::new(vec![
        FieldRule::field(MODE, Coercion::Text),
        FieldRule::field(DELAY, Coercion::Duration),
        FieldRule::field(ITERATIONS, Coercion::Int),
        FieldRule::field(STATE, Coercion::Text),
    ])
});

/// Status of the controller's background patrol read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatrolRead {
    pub mode:                 Option<String>,
    pub execution_delay_secs: Option<i64>,
    pub iterations_completed: Option<i64>,
    pub current_state:        Option<String>,
}

impl PatrolRead {
    /// The first block of `-AdpPR -Info` output is the status.
    pub fn from_output<I, S>(lines: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let record = PARSER
            .parse(lines)?
            .into_iter()
            .next()
            .ok_or(ParseError::NoRecords("patrol read"))?;
        Self::from_record(record)
    }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut f = record.take("PatrolRead");
        Ok(PatrolRead {
            mode:                 f.text(MODE)?,
            execution_delay_secs: f.int(DELAY)?,
            iterations_completed: f.int(ITERATIONS)?,
            current_state:        f.text(STATE)?,
        })
    }
}
