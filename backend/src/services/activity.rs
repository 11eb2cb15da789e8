//! Flag ranking by treatment volatility.

use crate::services::series::{Series, SeriesSet};

/// Number of treatment changes between consecutive impressions. The first
/// impression is not a change.
pub fn count_transitions(series: &Series) -> usize {
    series
        .impressions()
        .windows(2)
        .filter(|pair| pair[0].treatment != pair[1].treatment)
        .count()
}

/// A series together with its transition count.
#[derive(Debug, Clone, Copy)]
pub struct RankedSeries<'a> {
    pub series: &'a Series,
    pub transitions: usize,
}

/// Series ordered by descending transition count; ties keep first-seen order.
pub fn rank_by_activity(set: &SeriesSet) -> Vec<RankedSeries<'_>> {
    let mut ranked: Vec<RankedSeries<'_>> = set
        .iter()
        .map(|series| RankedSeries {
            series,
            transitions: count_transitions(series),
        })
        .collect();

    // stable sort keeps input order among equal counts
    ranked.sort_by(|a, b| b.transitions.cmp(&a.transitions));
    ranked
}
