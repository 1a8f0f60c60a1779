use crate::collectors::megacli::{CommandRunner, MegaRaid};
use crate::error::MegaError;
use crate::models::bbu::BatteryBackupUnit;
use crate::models::disk::Disk;
use crate::models::logical::LogicalDevice;
use crate::models::patrol::PatrolRead;
use crate::models::FromRecord;

/// One RAID adapter, addressed by its zero-based index.
pub struct Controller<'a, R: CommandRunner> {
    index:  usize,
    parent: &'a MegaRaid<R>,
}

impl<'a, R: CommandRunner> Controller<'a, R> {
    pub(crate) fn new(index: usize, parent: &'a MegaRaid<R>) -> Self {
        Self { index, parent }
    }

    pub fn index(&self) -> usize { self.index }

    fn adapter(&self) -> String {
        format!("-a{}", self.index)
    }

    /// Background patrol read state (`-AdpPR -Info`).
    pub fn patrol_read_status(&self) -> Result<PatrolRead, MegaError> {
        let lines = self.parent.run_command(&["-AdpPR", "-Info", &self.adapter()])?;
        Ok(PatrolRead::from_output(lines)?)
    }

    /// Physical drives (`-PDList`).
    pub fn physical_disks(&self) -> Result<Vec<Disk>, MegaError> {
        let lines = self.parent.run_command(&["-PDList", &self.adapter()])?;
        Ok(Disk::from_output(lines)?)
    }

    /// Virtual drives (`-LDInfo -Lall`).
    pub fn logical_devices(&self) -> Result<Vec<LogicalDevice>, MegaError> {
        let lines = self.parent.run_command(&["-LDInfo", "-Lall", &self.adapter()])?;
        Ok(LogicalDevice::from_output(lines)?)
    }

    /// Battery backup units (`-AdpBbuCmd -GetBbuStatus`).
    pub fn battery_units(&self) -> Result<Vec<BatteryBackupUnit>, MegaError> {
        let lines = self.parent.run_command(&["-AdpBbuCmd", "-GetBbuStatus", &self.adapter()])?;
        Ok(BatteryBackupUnit::from_output(lines)?)
    }
}
