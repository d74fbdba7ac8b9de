//! Uptime Pinger Library
//!
//! Probes a list of HTTP services once per run and maintains a rolling,
//! bounded history and uptime percentage per service in a JSON status
//! document.

pub mod config;
pub mod descriptor;
pub mod errors;
pub mod merge;
pub mod probe;
pub mod runner;
pub mod status;
pub mod store;

pub use config::Config;
pub use descriptor::{ResolvedService, ServiceDescriptor};
pub use errors::{PingerError, Result};
pub use merge::{merge, placeholder_record, uptime_percent};
pub use probe::{HttpTransport, ProbeOutcome, Transport, probe};
pub use runner::{RunSummary, UptimeRunner};
pub use status::{Sample, ServiceRecord, ServiceStatus, StatusDocument};
