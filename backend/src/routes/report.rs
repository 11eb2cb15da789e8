use serde::{Deserialize, Serialize};

use crate::routes::journey::JourneyTable;
use crate::routes::step_chart::StepChartData;
use crate::routes::timeline::TimelineData;

/// Everything the dashboard renders for one batch of impression records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub timeline: TimelineData,
    pub step_chart: StepChartData,
    pub table: JourneyTable,
}
