//! HTTP DTOs for admin endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::jobs::SweepReport;

/// Request to force-cancel a booking on a user's behalf.
#[derive(Debug, Clone, Deserialize)]
pub struct ForceCancelRequest {
    pub reason: String,
}

/// Outcome of a manually triggered auto-decline sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub cancelled: usize,
    pub failed: usize,
    pub missing_link: usize,
}

impl From<SweepReport> for SweepResponse {
    fn from(report: SweepReport) -> Self {
        Self {
            cancelled: report.cancelled,
            failed: report.failed,
            missing_link: report.missing_link,
        }
    }
}
