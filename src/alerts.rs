use crate::config::AlertConfig;
use crate::models::{problem_message, Component};
use crate::util::report::ControllerSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning  => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub severity:   Severity,
    pub controller: usize,
    pub component:  String,
    pub message:    String,
}

impl Alert {
    pub fn prefix(&self) -> String {
        format!("[a{}] [{}] ", self.controller, self.component)
    }
}

/// Which kind of component a problem came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Disk,
    LogicalDevice,
    Battery,
}

fn severity(kind: Kind, field: &str, cfg: &AlertConfig) -> Severity {
    match kind {
        Kind::LogicalDevice                          => Severity::Critical,
        Kind::Disk if field == "Firmware state"      => Severity::Critical,
        Kind::Disk                                   => Severity::Warning,
        Kind::Battery if cfg.bbu_critical            => Severity::Critical,
        Kind::Battery                                => Severity::Warning,
    }
}

fn push_problems(alerts: &mut Vec<Alert>, controller: usize, kind: Kind, c: &dyn Component, cfg: &AlertConfig) {
    let status = c.health_status();
    for (field, value) in &status.problems {
        alerts.push(Alert {
            severity:  severity(kind, field, cfg),
            controller,
            component: c.identifier(),
            message:   problem_message(field, value),
        });
    }
}

/// One alert per health problem, sorted Critical → Warning.
pub fn evaluate(snapshots: &[ControllerSnapshot], cfg: &AlertConfig) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = Vec::new();

    for snap in snapshots {
        for ld in &snap.logical_devices {
            push_problems(&mut alerts, snap.index, Kind::LogicalDevice, ld, cfg);
        }
        for disk in &snap.disks {
            push_problems(&mut alerts, snap.index, Kind::Disk, disk, cfg);
        }
        for bbu in &snap.batteries {
            push_problems(&mut alerts, snap.index, Kind::Battery, bbu, cfg);
        }
    }

    // Stable sort keeps component order within a severity.
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}
