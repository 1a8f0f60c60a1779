//! Rule-driven parsing of MegaCli's `key: value` block output.

pub mod block;
pub mod coerce;
pub mod record;
pub mod rule;

pub use block::BlockParser;
pub use record::{FieldValue, Record};
pub use rule::{Behavior, Coercion, FieldRule, KeyMatch};
