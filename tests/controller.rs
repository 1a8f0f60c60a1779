use megamon::alerts::{self, Severity};
use megamon::collectors::megacli::split_output;
use megamon::collectors::{CommandRunner, MegaRaid};
use megamon::config::Config;
use megamon::error::{MegaError, ParseError};
use megamon::models::Component;
use megamon::parser::FieldValue;
use megamon::util::report;
use std::cell::RefCell;

/// Answers MegaCli invocations from captured output of a two-adapter box.
/// Adapter 1 has a failed drive, a degraded array and no battery.
#[derive(Default)]
struct Fixtures {
    calls: RefCell<Vec<String>>,
}

impl CommandRunner for Fixtures {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, MegaError> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(key.clone());
        let text = match key.as_str() {
            "-adpCount"                       => include_str!("fixtures/adp_count.txt"),
            "-PDList -a0"                     => include_str!("fixtures/pd_list_a0.txt"),
            "-PDList -a1"                     => include_str!("fixtures/pd_list_a1.txt"),
            "-LDInfo -Lall -a0"               => include_str!("fixtures/ld_info_a0.txt"),
            "-LDInfo -Lall -a1"               => include_str!("fixtures/ld_info_a1.txt"),
            "-AdpBbuCmd -GetBbuStatus -a0"    => include_str!("fixtures/bbu_a0.txt"),
            "-AdpBbuCmd -GetBbuStatus -a1"    => include_str!("fixtures/bbu_a1.txt"),
            "-AdpPR -Info -a0"                => include_str!("fixtures/patrol_a0.txt"),
            "-AdpPR -Info -a1"                => include_str!("fixtures/patrol_a1.txt"),
            _ => {
                return Err(MegaError::Spawn {
                    program: "MegaCli64".into(),
                    source:  std::io::Error::new(std::io::ErrorKind::NotFound, key),
                })
            }
        };
        Ok(split_output(text))
    }
}

fn raid() -> MegaRaid<Fixtures> {
    MegaRaid::new(Fixtures::default())
}

#[test]
fn test_controller_enumeration() {
    let raid = raid();
    assert_eq!(raid.controller_count().unwrap(), 2);
    let controllers = raid.controllers().unwrap();
    assert_eq!(controllers.iter().map(|c| c.index()).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(*raid.runner().calls.borrow(), vec!["-adpCount", "-adpCount"]);
}

#[test]
fn test_physical_disks() {
    let raid = raid();
    let disks = raid.controller(0).physical_disks().unwrap();
    assert_eq!(disks.len(), 2);

    assert_eq!(disks[0].identifier(), "PhysDrv [252:0]");
    assert!(disks[0].healthy());
    assert_eq!(
        disks[0].extra.get("Raw Size"),
        Some(&FieldValue::from("279.396 GB [0x22ecb25c Sectors]"))
    );
    assert_eq!(
        disks[0].extra.get("Drive's position"),
        Some(&FieldValue::from("DiskGroup: 0, Span: 0, Arm: 0"))
    );

    assert_eq!(disks[1].identifier(), "PhysDrv [252:1]");
    assert_eq!(disks[1].health_messages(), vec!["Media Error Count was unexpectedly 17"]);

    let failed = raid.controller(1).physical_disks().unwrap();
    assert_eq!(failed[0].enclosure_id, -1);
    assert_eq!(failed[0].health_messages(), vec![
        "Drive has flagged a S.M.A.R.T alert was unexpectedly true",
        "Firmware state was unexpectedly Failed",
    ]);
}

#[test]
fn test_logical_devices() {
    let raid = raid();
    let lds = raid.controller(0).logical_devices().unwrap();
    assert_eq!(lds.len(), 1);
    assert_eq!(lds[0].identifier(), "VD system");
    assert_eq!(lds[0].virtual_drive, Some(0));
    assert_eq!(lds[0].size_bytes, Some(278_875_000_000));
    assert_eq!(lds[0].bad_blocks_exist, Some(false));
    assert!(!lds[0].extra.contains_key("Adapter 0 -- Virtual Drive Information"));
    assert!(lds[0].healthy());

    let degraded = raid.controller(1).logical_devices().unwrap();
    assert_eq!(degraded[0].size_bytes, Some(1_000_000_000_000));
    assert_eq!(degraded[0].health_messages(), vec!["State was unexpectedly Degraded"]);
}

#[test]
fn test_battery_units() {
    let raid = raid();
    let bbus = raid.controller(0).battery_units().unwrap();
    assert_eq!(bbus.len(), 1);
    assert_eq!(bbus[0].identifier(), "iBBU");
    assert!(bbus[0].healthy(), "{:?}", bbus[0].health_messages());

    assert!(raid.controller(1).battery_units().unwrap().is_empty());
}

#[test]
fn test_patrol_read_status() {
    let raid = raid();
    let pr = raid.controller(0).patrol_read_status().unwrap();
    assert_eq!(pr.mode.as_deref(), Some("Auto"));
    assert_eq!(pr.execution_delay_secs, Some(604_800));
    assert_eq!(pr.iterations_completed, Some(52));
    assert_eq!(pr.current_state.as_deref(), Some("Stopped"));

    assert!(matches!(
        raid.controller(1).patrol_read_status(),
        Err(MegaError::Parse(ParseError::NoRecords(_)))
    ));
}

#[test]
fn test_unknown_adapter_is_a_command_error() {
    let raid = raid();
    assert!(matches!(raid.controller(7).physical_disks(), Err(MegaError::Spawn { .. })));
}

#[test]
fn test_snapshot_and_alerts() {
    let raid = raid();
    let mut cfg = Config::default();
    cfg.thresholds.other_error_count = Some(3);

    let snapshots = report::collect_snapshot(&raid, &cfg, None).unwrap();
    assert_eq!(snapshots.len(), 2);
    assert!(snapshots[0].patrol_read.is_some());
    assert!(snapshots[1].patrol_read.is_none());
    assert!(snapshots[1].batteries.is_empty());

    let active = alerts::evaluate(&snapshots, &cfg.alerts);
    let lines: Vec<String> = active
        .iter()
        .map(|a| format!("{} {}{}", a.severity.label(), a.prefix(), a.message))
        .collect();
    assert_eq!(lines, vec![
        "CRIT [a1] [VD data] State was unexpectedly Degraded",
        "CRIT [a1] [PhysDrv [-1:0]] Firmware state was unexpectedly Failed",
        "WARN [a0] [PhysDrv [252:1]] Media Error Count was unexpectedly 17",
        "WARN [a0] [PhysDrv [252:1]] Other Error Count was unexpectedly 4",
        "WARN [a1] [PhysDrv [-1:0]] Drive has flagged a S.M.A.R.T alert was unexpectedly true",
    ]);
    assert_eq!(active.iter().filter(|a| a.severity == Severity::Critical).count(), 2);

    let text = report::generate(&snapshots, &active);
    assert!(text.contains("Active Alerts (5)"));
    assert!(text.contains("── Adapter 1 "));
    assert!(text.contains("Patrol Read: mode Auto, state Stopped, every 7d, 52 iteration(s)"));

    let json = report::to_json(&snapshots, &active);
    assert_eq!(json["controllers"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["controllers"][0]["virtual_drives"][0]["size_bytes"], 278_875_000_000i64);
    assert_eq!(json["controllers"][1]["physical_drives"][0]["healthy"], false);
    assert_eq!(json["controllers"][0]["patrol_read"]["execution_delay_secs"], 604_800);
    assert_eq!(json["alerts"][0]["severity"], "Critical");
}

#[test]
fn test_snapshot_of_one_controller() {
    let raid = raid();
    let snapshots = report::collect_snapshot(&raid, &Config::default(), Some(1)).unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].index, 1);
    assert!(!raid.runner().calls.borrow().iter().any(|c| c == "-adpCount"));
}
