use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RejectedRecord;

// =========================================================
// Daily impression volume types
// =========================================================

/// Impressions of one flag on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// One flag's daily series, sorted by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySeries {
    pub flag: String,
    pub points: Vec<DailyPoint>,
    pub total: u64,
}

/// Daily chart dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChartData {
    /// Series matching the selected filter, in first-seen order
    pub series: Vec<DailySeries>,
    /// Every flag, ranked by total impressions (filter options)
    pub flags: Vec<String>,
    /// Selected filter label ("All" or a flag name)
    pub selected: String,
    pub ticks: Vec<NaiveDate>,
    pub rejected: Vec<RejectedRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_date() {
        let point = DailyPoint {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            count: 12,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"date":"2024-05-01","count":12}"#);
    }
}
