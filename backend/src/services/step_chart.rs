//! Step-line view of treatment changes.
//!
//! Every flag owns a band of [`LEVEL_SPACING`] y units; inside the band each
//! treatment gets a level in the order the flag first showed it.

use std::collections::HashMap;

use crate::models::Impression;
use crate::routes::step_chart::{StepChartData, StepPoint, StepSeries};
use crate::services::series::SeriesSet;

/// Height of one flag's band.
pub const LEVEL_SPACING: u32 = 10;

/// Build the step chart; consecutive impressions at the same level collapse
/// into the first one.
pub fn build_step_chart(impressions: &[Impression]) -> StepChartData {
    let set = SeriesSet::build(impressions);
    let mut series = Vec::with_capacity(set.len());

    for (band, s) in set.iter().enumerate() {
        let base = band as u32 * LEVEL_SPACING;
        let mut levels: Vec<String> = Vec::new();
        let mut level_of: HashMap<&str, u32> = HashMap::new();
        let mut points = Vec::new();
        let mut last_y = None;

        for impression in s.impressions() {
            let treatment = impression.treatment.as_str();
            let level = *level_of.entry(treatment).or_insert_with(|| {
                levels.push(treatment.to_string());
                (levels.len() - 1) as u32
            });
            let y = base + level;
            if last_y == Some(y) {
                continue;
            }
            last_y = Some(y);
            points.push(StepPoint {
                timestamp: impression.timestamp,
                y,
            });
        }

        series.push(StepSeries {
            flag: s.flag().to_string(),
            base,
            levels,
            points,
        });
    }

    StepChartData {
        flags: set.flags().map(String::from).collect(),
        y_max: set.len() as u32 * LEVEL_SPACING,
        series,
    }
}

impl StepChartData {
    /// Flag owning the band that contains `y` (axis label lookup).
    pub fn flag_for_y(&self, y: u32) -> Option<&str> {
        self.flags
            .get((y / LEVEL_SPACING) as usize)
            .map(String::as_str)
    }
}
