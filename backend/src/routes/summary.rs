use serde::{Deserialize, Serialize};

// =========================================================
// Environment summary types
// =========================================================

/// One slice of the unique-key share chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySlice {
    pub id: String,
    pub label: String,
    pub value: u64,
    pub color: String,
}

/// Unique-key share for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSummary {
    /// Environment ids in first-seen order
    pub environments: Vec<String>,
    pub selected: Option<String>,
    pub slices: Vec<SummarySlice>,
}

/// Number of control impressions for a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCount {
    pub flag: String,
    pub control_count: u64,
}
