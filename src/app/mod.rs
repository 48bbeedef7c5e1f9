#[cfg(feature = "cli")]
pub mod commands;
pub mod handler;
pub mod report;
