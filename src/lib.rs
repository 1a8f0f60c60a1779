//! Health checks for LSI MegaRAID controllers, built on parsing the
//! block-structured text that `MegaCli` prints.

pub mod alerts;
pub mod collectors;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod util;
