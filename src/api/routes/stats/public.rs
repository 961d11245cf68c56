//! Public types for the stats API
use serde::Serialize;

use crate::calendar::StatsReport;

#[derive(Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: StatsReport,
}
