pub mod bbu;
pub mod disk;
pub mod logical;
pub mod patrol;

use crate::error::ParseError;
use crate::parser::{BlockParser, FieldValue, Record};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field name → the value that made it look unhealthy.
pub type Problems = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub problems: Problems,
    pub healthy:  bool,
}

impl HealthStatus {
    pub fn from_problems(problems: Problems) -> Self {
        let healthy = problems.is_empty();
        Self { problems, healthy }
    }
}

/// Anything on a controller that can be identified and health-checked.
pub trait Component {
    /// Display name used in reports and alerts.
    fn identifier(&self) -> String;

    fn health_status(&self) -> HealthStatus;

    fn healthy(&self) -> bool {
        self.health_status().healthy
    }

    /// One line per problem, ordered by field name.
    fn health_messages(&self) -> Vec<String> {
        self.health_status()
            .problems
            .iter()
            .map(|(field, value)| problem_message(field, value))
            .collect()
    }
}

pub fn problem_message(field: &str, value: &FieldValue) -> String {
    format!("{} was unexpectedly {}", field, value)
}

/// A record type built from one parsed block.
pub trait FromRecord: Sized {
    /// Block parser configured with this type's field rules.
    fn parser() -> &'static BlockParser;

    fn from_record(record: Record) -> Result<Self, ParseError>;

    /// Parse tool output and build one value per block, in output order.
    fn from_output<I, S>(lines: I) -> Result<Vec<Self>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::parser()
            .parse(lines)?
            .into_iter()
            .map(Self::from_record)
            .collect()
    }
}
