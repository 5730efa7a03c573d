//! Export-readiness classification for companies registered with the provincial trade office.

pub mod classification;
pub mod config;
pub mod error;
pub mod telemetry;
