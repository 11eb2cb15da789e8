use serde::{Deserialize, Serialize};

use crate::models::Timestamp;

// =========================================================
// Treatment step chart types
// =========================================================

/// A treatment level change of one flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPoint {
    pub timestamp: Timestamp,
    pub y: u32,
}

/// Step line of one flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSeries {
    pub flag: String,
    /// Lowest y value of this flag's band
    pub base: u32,
    /// Treatments in level order (first-seen)
    pub levels: Vec<String>,
    pub points: Vec<StepPoint>,
}

/// Step chart dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepChartData {
    pub flags: Vec<String>,
    pub series: Vec<StepSeries>,
    pub y_max: u32,
}
