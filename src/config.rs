use crate::models::disk::{Disk, ErrorCounter};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub thresholds: DiskThresholds,

    #[serde(default)]
    pub alerts: AlertConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path to the MegaCli binary
    pub megacli_path: String,
}

/// Error counts a drive may report before it is flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskThresholds {
    pub media_error_count:        i64,
    pub predictive_failure_count: i64,
    /// Unset = "Other Error Count" is not monitored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_error_count:        Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Rank battery problems as critical instead of warnings.
    pub bbu_critical: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { megacli_path: "/opt/MegaRAID/MegaCli/MegaCli64".into() }
    }
}

impl Default for DiskThresholds {
    fn default() -> Self {
        Self { media_error_count: 0, predictive_failure_count: 0, other_error_count: None }
    }
}

impl DiskThresholds {
    pub fn apply(&self, disk: &mut Disk) {
        disk.set_threshold(ErrorCounter::MediaErrors, self.media_error_count);
        disk.set_threshold(ErrorCounter::PredictiveFailures, self.predictive_failure_count);
        if let Some(limit) = self.other_error_count {
            disk.set_threshold(ErrorCounter::OtherErrors, limit);
        }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    /// Load the user config, writing defaults on first run.
    pub fn load() -> Self {
        let path = match Config::config_path() {
            Some(p) => p,
            None    => return Config::default(),
        };
        if !path.exists() {
            if let Err(e) = write_defaults(&path) {
                debug!(path = %path.display(), error = %e, "could not write default config");
            }
            return Config::default();
        }
        match Config::load_from(&path) {
            Ok(c)  => c,
            Err(e) => {
                warn!("using default config: {:#}", e);
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg: Config = toml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("megamon").join("megamon.toml"))
    }
}

fn write_defaults(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# megamon configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}
