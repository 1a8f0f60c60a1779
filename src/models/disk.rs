use crate::error::ParseError;
use crate::models::{Component, FromRecord, HealthStatus, Problems};
use crate::parser::{BlockParser, Coercion, FieldRule, FieldValue, Record};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

const ENCLOSURE_ID:    &str = "Enclosure Device ID";
const SLOT_NUMBER:     &str = "Slot Number";
const FIRMWARE_STATE:  &str = "Firmware state";
const OTHER_ERRORS:    &str = "Other Error Count";
const PREDICTIVE:      &str = "Predictive Failure Count";
const MEDIA_ERRORS:    &str = "Media Error Count";
const SMART_ALERT:     &str = "Drive has flagged a S.M.A.R.T alert";

static PARSER: Lazy<BlockParser> = Lazy::new(|| {
    BlockParser::new(vec![
        FieldRule::field(ENCLOSURE_ID, Coercion::IntOrNa).starts_block(),
        FieldRule::field(SLOT_NUMBER, Coercion::Int),
        FieldRule::field(OTHER_ERRORS, Coercion::Int),
        FieldRule::field(PREDICTIVE, Coercion::Int),
        FieldRule::field(MEDIA_ERRORS, Coercion::Int),
        FieldRule::field(SMART_ALERT, Coercion::YesNo),
    ])
    .with_fallback(FieldRule::wildcard())
});

/// Error counters a threshold can be set on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCounter {
    MediaErrors,
    OtherErrors,
    PredictiveFailures,
}

impl ErrorCounter {
    pub fn field(&self) -> &'static str {
        match self {
            ErrorCounter::MediaErrors        => MEDIA_ERRORS,
            ErrorCounter::OtherErrors        => OTHER_ERRORS,
            ErrorCounter::PredictiveFailures => PREDICTIVE,
        }
    }
}

/// One physical drive from `-PDList`.
#[derive(Debug, Clone)]
pub struct Disk {
    /// -1 when the drive reports "N/A".
    pub enclosure_id:             i64,
    pub slot_number:              i64,
    pub firmware_state:           String,
    pub media_error_count:        Option<i64>,
    pub other_error_count:        Option<i64>,
    pub predictive_failure_count: Option<i64>,
    pub smart_alert:              Option<bool>,
    /// Fields without a dedicated rule, verbatim.
    pub extra:                    BTreeMap<String, FieldValue>,
    thresholds:                   BTreeMap<ErrorCounter, i64>,
}

impl Disk {
    /// Counters monitored out of the box, each tolerating zero errors.
    pub fn default_thresholds() -> BTreeMap<ErrorCounter, i64> {
        BTreeMap::from([
            (ErrorCounter::MediaErrors, 0),
            (ErrorCounter::PredictiveFailures, 0),
        ])
    }

    /// Start monitoring `counter` (or change its limit): the disk is unhealthy
    /// once the count exceeds `limit`.
    pub fn set_threshold(&mut self, counter: ErrorCounter, limit: i64) {
        self.thresholds.insert(counter, limit);
    }

    pub fn threshold(&self, counter: ErrorCounter) -> Option<i64> {
        self.thresholds.get(&counter).copied()
    }

    pub fn error_count(&self, counter: ErrorCounter) -> Option<i64> {
        match counter {
            ErrorCounter::MediaErrors        => self.media_error_count,
            ErrorCounter::OtherErrors        => self.other_error_count,
            ErrorCounter::PredictiveFailures => self.predictive_failure_count,
        }
    }

    pub fn is_online(&self) -> bool {
        self.firmware_state.contains("Online")
    }
}

impl FromRecord for Disk {
    fn parser() -> &'static BlockParser { &PARSER }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut f = record.take("Disk");
        Ok(Disk {
            enclosure_id:             f.required_int(ENCLOSURE_ID)?,
            slot_number:              f.required_int(SLOT_NUMBER)?,
            firmware_state:           f.required_text(FIRMWARE_STATE)?,
            media_error_count:        f.int(MEDIA_ERRORS)?,
            other_error_count:        f.int(OTHER_ERRORS)?,
            predictive_failure_count: f.int(PREDICTIVE)?,
            smart_alert:              f.bool(SMART_ALERT)?,
            extra:                    f.rest(),
            thresholds:               Disk::default_thresholds(),
        })
    }
}

impl Component for Disk {
    fn identifier(&self) -> String {
        format!("PhysDrv [{}:{}]", self.enclosure_id, self.slot_number)
    }

    fn health_status(&self) -> HealthStatus {
        let mut problems = Problems::new();

        for (&counter, &limit) in &self.thresholds {
            let count = self.error_count(counter).unwrap_or(0);
            if count > limit {
                problems.insert(counter.field().to_string(), FieldValue::Int(count));
            }
        }
        if self.smart_alert == Some(true) {
            problems.insert(SMART_ALERT.to_string(), FieldValue::Bool(true));
        }
        if !self.is_online() {
            problems.insert(FIRMWARE_STATE.to_string(), FieldValue::Text(self.firmware_state.clone()));
        }

        HealthStatus::from_problems(problems)
    }
}
