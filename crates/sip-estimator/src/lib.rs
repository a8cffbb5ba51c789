//! Deterministic cost estimation for prefabricated SIP panel houses: a pure
//! pricing core driven by operator-swappable tables, plus the application
//! config, telemetry, and error plumbing shared by its transports.

pub mod config;
pub mod error;
pub mod pricing;
pub mod telemetry;
