pub mod config;
pub mod error;
pub mod portfolio;
pub mod roster;
pub mod telemetry;
