//! Background services.

mod auto_decline;

pub use auto_decline::{AutoDeclineMonitor, AutoDeclineMonitorConfig, SweepReport};
