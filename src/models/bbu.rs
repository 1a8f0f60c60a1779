use crate::error::ParseError;
use crate::models::{Component, FromRecord, HealthStatus, Problems};
use crate::parser::{BlockParser, Coercion, FieldRule, FieldValue, Record};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use tracing::debug;

const BATTERY_TYPE:  &str = "BatteryType";
const BATTERY_STATE: &str = "Battery State";
const VOLTAGE:       &str = "Voltage";
const TEMPERATURE:   &str = "Temperature";

const LEARN_CYCLE_REQUESTED:  &str = "Learn Cycle Requested";
const LEARN_CYCLE_ACTIVE:     &str = "Learn Cycle Active";
const LEARN_CYCLE_STATUS:     &str = "Learn Cycle Status";
const LEARN_CYCLE_TIMEOUT:    &str = "Learn Cycle Timeout";
const I2C_ERRORS:             &str = "I2c Errors Detected";
const PACK_MISSING:           &str = "Battery Pack Missing";
const REPLACEMENT_REQUIRED:   &str = "Battery Replacement required";
const CAPACITY_LOW:           &str = "Remaining Capacity Low";
const PERIODIC_LEARN:         &str = "Periodic Learn Required";
const TRANSPARENT_LEARN:      &str = "Transparent Learn";
const NO_CACHE_OFFLOAD_SPACE: &str = "No space to cache offload";
const ABOUT_TO_FAIL:          &str = "Pack is about to fail & should be replaced";
const OFFLOAD_PREMIUM:        &str = "Cache Offload premium feature required";
const MICROCODE_UPDATE:       &str = "Module microcode update required";

/// Reported as "not ok" when absent or false.
const NOT_OK: &str = "not ok";

static PARSER: Lazy<BlockParser> = Lazy::new(|| {
    BlockParser::new(vec![
        FieldRule::ignore("BBU status for Adapter"),
        // "Adapter 0: Get BBU Status Failed." on controllers without a battery
        FieldRule::prefixed("Adapter ", Coercion::Text).ignored(),
        FieldRule::ignore("FW error description"),
        FieldRule::field(BATTERY_TYPE, Coercion::Text).starts_block(),
        FieldRule::field(VOLTAGE, Coercion::OkNotOk),
        FieldRule::field(TEMPERATURE, Coercion::OkNotOk),
        FieldRule::field(LEARN_CYCLE_REQUESTED, Coercion::YesNo),
        FieldRule::field(LEARN_CYCLE_ACTIVE, Coercion::YesNo),
        FieldRule::field(LEARN_CYCLE_STATUS, Coercion::OkNotOk),
        FieldRule::field(LEARN_CYCLE_TIMEOUT, Coercion::YesNo),
        FieldRule::field(I2C_ERRORS, Coercion::YesNo),
        FieldRule::field(PACK_MISSING, Coercion::YesNo),
        FieldRule::field(REPLACEMENT_REQUIRED, Coercion::YesNo),
        FieldRule::field(CAPACITY_LOW, Coercion::YesNo),
        FieldRule::field(PERIODIC_LEARN, Coercion::YesNo),
        FieldRule::field(TRANSPARENT_LEARN, Coercion::YesNo),
        FieldRule::field(NO_CACHE_OFFLOAD_SPACE, Coercion::YesNo),
        FieldRule::field(ABOUT_TO_FAIL, Coercion::YesNo),
        FieldRule::field(OFFLOAD_PREMIUM, Coercion::YesNo),
        FieldRule::field(MICROCODE_UPDATE, Coercion::YesNo),
    ])
    .with_fallback(FieldRule::wildcard())
});

/// One battery backup unit from `-AdpBbuCmd -GetBbuStatus`.
#[derive(Debug, Clone)]
pub struct BatteryBackupUnit {
    pub battery_type:                     String,
    pub battery_state:                    String,
    /// The status section's "OK" wins over the raw millivolt reading above it.
    pub voltage_ok:                       Option<bool>,
    pub temperature_ok:                   Option<bool>,
    pub learn_cycle_requested:            Option<bool>,
    pub learn_cycle_active:               Option<bool>,
    pub learn_cycle_status_ok:            Option<bool>,
    pub learn_cycle_timeout:              Option<bool>,
    pub i2c_errors_detected:              Option<bool>,
    pub battery_pack_missing:             Option<bool>,
    pub battery_replacement_required:     Option<bool>,
    pub remaining_capacity_low:           Option<bool>,
    pub periodic_learn_required:          Option<bool>,
    pub transparent_learn:                Option<bool>,
    pub no_space_to_cache_offload:        Option<bool>,
    pub pack_about_to_fail:               Option<bool>,
    pub cache_offload_premium_required:   Option<bool>,
    pub module_microcode_update_required: Option<bool>,
    pub extra:                            BTreeMap<String, FieldValue>,
}

impl BatteryBackupUnit {
    /// Flags that mean the pack needs attention when set.
    pub fn failure_indicators(&self) -> [(&'static str, Option<bool>); 5] {
        [
            (ABOUT_TO_FAIL,        self.pack_about_to_fail),
            (CAPACITY_LOW,         self.remaining_capacity_low),
            (PACK_MISSING,         self.battery_pack_missing),
            (REPLACEMENT_REQUIRED, self.battery_replacement_required),
            (I2C_ERRORS,           self.i2c_errors_detected),
        ]
    }

    /// Readings that must be present and OK.
    pub fn required_ok(&self) -> [(&'static str, Option<bool>); 1] {
        [(TEMPERATURE, self.temperature_ok)]
    }
}

impl FromRecord for BatteryBackupUnit {
    fn parser() -> &'static BlockParser { &PARSER }

    fn from_record(record: Record) -> Result<Self, ParseError> {
        let mut f = record.take("BatteryBackupUnit");
        Ok(BatteryBackupUnit {
            battery_type:                     f.required_text(BATTERY_TYPE)?,
            battery_state:                    f.required_text(BATTERY_STATE)?,
            voltage_ok:                       f.bool(VOLTAGE)?,
            temperature_ok:                   f.bool(TEMPERATURE)?,
            learn_cycle_requested:            f.bool(LEARN_CYCLE_REQUESTED)?,
            learn_cycle_active:               f.bool(LEARN_CYCLE_ACTIVE)?,
            learn_cycle_status_ok:            f.bool(LEARN_CYCLE_STATUS)?,
            learn_cycle_timeout:              f.bool(LEARN_CYCLE_TIMEOUT)?,
            i2c_errors_detected:              f.bool(I2C_ERRORS)?,
            battery_pack_missing:             f.bool(PACK_MISSING)?,
            battery_replacement_required:     f.bool(REPLACEMENT_REQUIRED)?,
            remaining_capacity_low:           f.bool(CAPACITY_LOW)?,
            periodic_learn_required:          f.bool(PERIODIC_LEARN)?,
            transparent_learn:                f.bool(TRANSPARENT_LEARN)?,
            no_space_to_cache_offload:        f.bool(NO_CACHE_OFFLOAD_SPACE)?,
            pack_about_to_fail:               f.bool(ABOUT_TO_FAIL)?,
            cache_offload_premium_required:   f.bool(OFFLOAD_PREMIUM)?,
            module_microcode_update_required: f.bool(MICROCODE_UPDATE)?,
            extra:                            f.rest(),
        })
    }
}

impl Component for BatteryBackupUnit {
    fn identifier(&self) -> String {
        self.battery_type.clone()
    }

    fn health_status(&self) -> HealthStatus {
        let mut problems = Problems::new();

        if self.battery_state != "Optimal" {
            problems.insert(BATTERY_STATE.to_string(), FieldValue::Text(self.battery_state.clone()));
        }
        for (field, flag) in self.failure_indicators() {
            if flag == Some(true) {
                problems.insert(field.to_string(), FieldValue::Bool(true));
            }
        }
        // An absent reading and an explicit "not OK" are reported alike.
        for (field, ok) in self.required_ok() {
            if ok != Some(true) {
                if ok.is_none() {
                    debug!(battery = %self.battery_type, field, "reading absent from output");
                }
                problems.insert(field.to_string(), FieldValue::from(NOT_OK));
            }
        }

        HealthStatus::from_problems(problems)
    }
}
