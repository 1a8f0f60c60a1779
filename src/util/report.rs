use crate::alerts::Alert;
use crate::collectors::{CommandRunner, Controller, MegaRaid};
use crate::config::Config;
use crate::models::bbu::BatteryBackupUnit;
use crate::models::disk::Disk;
use crate::models::logical::LogicalDevice;
use crate::models::patrol::PatrolRead;
use crate::models::Component;
use crate::util::human::{fmt_bytes, fmt_duration};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Everything read from one controller.
#[derive(Debug, Clone)]
pub struct ControllerSnapshot {
    pub index:           usize,
    pub disks:           Vec<Disk>,
    pub logical_devices: Vec<LogicalDevice>,
    pub batteries:       Vec<BatteryBackupUnit>,
    pub patrol_read:     Option<PatrolRead>,
}

/// Query every controller (or just `only`) and apply configured disk thresholds.
/// Battery and patrol read failures are logged and skipped; many adapters have neither.
pub fn collect_snapshot<R: CommandRunner>(
    raid: &MegaRaid<R>,
    cfg:  &Config,
    only: Option<usize>,
) -> Result<Vec<ControllerSnapshot>> {
    let controllers = match only {
        Some(i) => vec![raid.controller(i)],
        None    => raid.controllers().context("counting controllers")?,
    };
    controllers.iter().map(|c| collect_controller(c, cfg)).collect()
}

fn collect_controller<R: CommandRunner>(c: &Controller<'_, R>, cfg: &Config) -> Result<ControllerSnapshot> {
    let i = c.index();

    let mut disks = c.physical_disks()
        .with_context(|| format!("reading physical drives of adapter {}", i))?;
    for disk in &mut disks {
        cfg.thresholds.apply(disk);
    }
    let logical_devices = c.logical_devices()
        .with_context(|| format!("reading virtual drives of adapter {}", i))?;
    let batteries = c.battery_units().unwrap_or_else(|e| {
        warn!(adapter = i, "battery status unavailable: {}", e);
        Vec::new()
    });
    let patrol_read = c.patrol_read_status()
        .map_err(|e| warn!(adapter = i, "patrol read status unavailable: {}", e))
        .ok();

    info!(
        adapter = i,
        disks = disks.len(),
        virtual_drives = logical_devices.len(),
        batteries = batteries.len(),
        "controller read"
    );
    Ok(ControllerSnapshot { index: i, disks, logical_devices, batteries, patrol_read })
}

fn health_json(c: &dyn Component) -> Value {
    let status = c.health_status();
    json!({
        "identifier": c.identifier(),
        "healthy":    status.healthy,
        "problems":   status.problems,
    })
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(b), Value::Object(e)) = (base.as_object_mut(), extra) {
        b.extend(e);
    }
    base
}

/// Machine-readable snapshot, one object per controller.
pub fn to_json(snapshots: &[ControllerSnapshot], alerts: &[Alert]) -> Value {
    let controllers: Vec<Value> = snapshots.iter().map(|s| {
        json!({
            "index": s.index,
            "physical_drives": s.disks.iter().map(|d| merge(health_json(d), json!({
                "enclosure_id":             d.enclosure_id,
                "slot_number":              d.slot_number,
                "firmware_state":           d.firmware_state,
                "media_error_count":        d.media_error_count,
                "other_error_count":        d.other_error_count,
                "predictive_failure_count": d.predictive_failure_count,
                "smart_alert":              d.smart_alert,
                "fields":                   d.extra,
            }))).collect::<Vec<_>>(),
            "virtual_drives": s.logical_devices.iter().map(|ld| merge(health_json(ld), json!({
                "virtual_drive":    ld.virtual_drive,
                "name":             ld.name,
                "state":            ld.state,
                "size_bytes":       ld.size_bytes,
                "bad_blocks_exist": ld.bad_blocks_exist,
                "fields":           ld.extra,
            }))).collect::<Vec<_>>(),
            "batteries": s.batteries.iter().map(|b| merge(health_json(b), json!({
                "battery_type":   b.battery_type,
                "battery_state":  b.battery_state,
                "voltage_ok":     b.voltage_ok,
                "temperature_ok": b.temperature_ok,
                "fields":         b.extra,
            }))).collect::<Vec<_>>(),
            "patrol_read": s.patrol_read,
        })
    }).collect();

    json!({
        "megamon_version": env!("CARGO_PKG_VERSION"),
        "timestamp":       chrono::Local::now().to_rfc3339(),
        "controllers":     controllers,
        "alerts":          alerts,
    })
}

fn status_word(c: &dyn Component) -> &'static str {
    if c.healthy() { "OK" } else { "FAIL" }
}

/// Human-readable health report.
pub fn generate(snapshots: &[ControllerSnapshot], alerts: &[Alert]) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  megamon RAID Health Report ({})\n", now));
    out.push_str("═══════════════════════════════════════════════\n\n");

    // ── Active alerts ──────────────────────────────────────────────────
    out.push_str(&format!("── Active Alerts ({}) ─────────────────────────\n", alerts.len()));
    if alerts.is_empty() {
        out.push_str("  ● All components healthy\n");
    } else {
        for a in alerts {
            out.push_str(&format!("  [{}]  {}{}\n", a.severity.label(), a.prefix(), a.message));
        }
    }
    out.push('\n');

    for s in snapshots {
        out.push_str(&format!("── Adapter {} ──────────────────────────────────\n", s.index));

        out.push_str(&format!("  Virtual Drives ({})\n", s.logical_devices.len()));
        for ld in &s.logical_devices {
            let size = ld.size_bytes.map(fmt_bytes).unwrap_or_else(|| "—".to_string());
            out.push_str(&format!(
                "    {:<4} {:<24} {:<10} {:>10}  {}\n",
                status_word(ld), ld.identifier(), ld.state, size,
                if ld.bad_blocks_exist == Some(true) { "bad blocks" } else { "" },
            ));
        }

        out.push_str(&format!("  Physical Drives ({})\n", s.disks.len()));
        for d in &s.disks {
            out.push_str(&format!(
                "    {:<4} {:<16} {:<28} media:{:<4} pred:{:<4} other:{}\n",
                status_word(d), d.identifier(), d.firmware_state,
                d.media_error_count.unwrap_or(0),
                d.predictive_failure_count.unwrap_or(0),
                d.other_error_count.unwrap_or(0),
            ));
        }

        out.push_str(&format!("  Batteries ({})\n", s.batteries.len()));
        for b in &s.batteries {
            out.push_str(&format!("    {:<4} {:<16} {}\n", status_word(b), b.identifier(), b.battery_state));
        }

        if let Some(pr) = &s.patrol_read {
            out.push_str(&format!(
                "  Patrol Read: mode {}, state {}, every {}, {} iteration(s)\n",
                pr.mode.as_deref().unwrap_or("?"),
                pr.current_state.as_deref().unwrap_or("?"),
                pr.execution_delay_secs.map(fmt_duration).unwrap_or_else(|| "?".to_string()),
                pr.iterations_completed.unwrap_or(0),
            ));
        }
        out.push('\n');
    }

    out.push_str("═══════════════════════════════════════════════\n");
    out
}
