pub mod controller;
pub mod megacli;

pub use controller::Controller;
pub use megacli::{CommandRunner, MegaCli, MegaRaid};
