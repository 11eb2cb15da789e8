//! Per-flag chronological series.

use std::collections::HashMap;

use crate::models::{Impression, TimeWindow};

/// One flag's impressions, ascending by timestamp.
///
/// Built once by [`SeriesSet::build`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    flag: String,
    impressions: Vec<Impression>,
}

impl Series {
    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn impressions(&self) -> &[Impression] {
        &self.impressions
    }

    pub fn len(&self) -> usize {
        self.impressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impressions.is_empty()
    }

    /// Treatment labels in chronological order.
    pub fn treatments(&self) -> impl Iterator<Item = &str> {
        self.impressions.iter().map(|i| i.treatment.as_str())
    }
}

/// Series for every flag, iterated in first-seen flag order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    series: Vec<Series>,
    index: HashMap<String, usize>,
}

impl SeriesSet {
    /// Partition impressions by flag and sort each partition by timestamp.
    ///
    /// The sort is stable: impressions sharing a timestamp keep their input
    /// order. No impression is dropped.
    pub fn build(impressions: &[Impression]) -> Self {
        let mut series: Vec<Series> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for impression in impressions {
            let slot = *index.entry(impression.flag.clone()).or_insert_with(|| {
                series.push(Series {
                    flag: impression.flag.clone(),
                    impressions: Vec::new(),
                });
                series.len() - 1
            });
            series[slot].impressions.push(impression.clone());
        }

        for s in &mut series {
            s.impressions.sort_by_key(|i| i.timestamp);
        }

        Self { series, index }
    }

    pub fn get(&self, flag: &str) -> Option<&Series> {
        self.index.get(flag).map(|&slot| &self.series[slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(Series::flag)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn impression_count(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }

    /// Window spanning every impression of every series.
    pub fn window(&self) -> Option<TimeWindow> {
        TimeWindow::covering(
            self.series
                .iter()
                .flat_map(|s| s.impressions.iter().map(|i| i.timestamp)),
        )
    }
}

impl<'a> IntoIterator for &'a SeriesSet {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}
