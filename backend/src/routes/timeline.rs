use serde::{Deserialize, Serialize};

use crate::error::RejectedRecord;
use crate::models::TimeWindow;

// =========================================================
// Treatment timeline (sparkline) types
// =========================================================

/// Fill pattern of a timeline segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Solid,
    /// Marks treatments sharing the overflow colour
    Crosshatch,
}

/// Colour and fill of a treatment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorSpec {
    pub hex: String,
    pub pattern: Pattern,
}

impl ColorSpec {
    pub fn solid(hex: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            pattern: Pattern::Solid,
        }
    }

    pub fn crosshatch(hex: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            pattern: Pattern::Crosshatch,
        }
    }
}

/// One maximal run of a single treatment, in window fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_fraction: f64,
    pub width_fraction: f64,
    pub treatment: String,
    pub color: ColorSpec,
}

impl Segment {
    pub fn end_fraction(&self) -> f64 {
        self.start_fraction + self.width_fraction
    }

    pub fn is_overflow(&self) -> bool {
        self.color.pattern == Pattern::Crosshatch
    }
}

/// Palette legend entry, in treatment discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub treatment: String,
    pub color: ColorSpec,
    pub is_overflow: bool,
}

/// One flag's sparkline row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagTimeline {
    pub flag: String,
    /// Number of treatment changes (ranking key)
    pub transitions: usize,
    pub impression_count: usize,
    pub segments: Vec<Segment>,
}

/// Complete timeline dataset for one rendering pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    pub window: Option<TimeWindow>,
    /// `YYYY-MM-DD` labels shared by every row
    pub ticks: Vec<String>,
    /// Rows ordered by descending activity
    pub rows: Vec<FlagTimeline>,
    pub legend: Vec<LegendEntry>,
    pub rejected: Vec<RejectedRecord>,
}

impl TimelineData {
    pub fn empty() -> Self {
        Self {
            window: None,
            ticks: vec![],
            rows: vec![],
            legend: vec![],
            rejected: vec![],
        }
    }

    pub fn row(&self, flag: &str) -> Option<&FlagTimeline> {
        self.rows.iter().find(|row| row.flag == flag)
    }
}
