//! Treatment timeline segmentation.
//!
//! A flag's chronological impressions are run-length encoded into maximal runs
//! of one treatment, and each run is positioned inside the window shared by
//! every flag rendered together. Identical consecutive treatments never start a
//! new segment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{TimeWindow, Timestamp};
use crate::routes::timeline::Segment;
use crate::services::palette::PaletteAssignment;
use crate::services::series::Series;

/// Where the boundary between two consecutive runs is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePoint {
    /// A run lasts until its last impression; the next run starts there. The
    /// first run is stretched back to the window start and the last one forward
    /// to the window end, so segments tile the whole window.
    #[default]
    LastSighting,
    /// A run lasts until the first impression of the next run. Nothing is drawn
    /// before the flag's first impression; the last run is filled to the
    /// window end.
    NextImpression,
}

impl fmt::Display for ChangePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangePoint::LastSighting => write!(f, "last_sighting"),
            ChangePoint::NextImpression => write!(f, "next_impression"),
        }
    }
}

impl FromStr for ChangePoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_sighting" => Ok(ChangePoint::LastSighting),
            "next_impression" => Ok(ChangePoint::NextImpression),
            other => Err(format!(
                "Unknown change point '{}'. Use last_sighting or next_impression.",
                other
            )),
        }
    }
}

/// A run of one treatment in absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreatmentRun<'a> {
    pub treatment: &'a str,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Run-length encode a series into treatment runs within `window`.
pub fn treatment_runs<'a>(
    series: &'a Series,
    window: &TimeWindow,
    change_point: ChangePoint,
) -> Vec<TreatmentRun<'a>> {
    let runs = match change_point {
        ChangePoint::LastSighting => runs_to_last_sighting(series, window),
        ChangePoint::NextImpression => runs_to_next_impression(series, window),
    };

    runs.into_iter()
        .map(|run| TreatmentRun {
            treatment: run.treatment,
            start: window.clamp(run.start),
            end: window.clamp(run.end),
        })
        .collect()
}

fn runs_to_last_sighting<'a>(series: &'a Series, window: &TimeWindow) -> Vec<TreatmentRun<'a>> {
    let mut runs = Vec::new();
    // (treatment, run start, last impression of the run)
    let mut current: Option<(&'a str, Timestamp, Timestamp)> = None;

    for impression in series.impressions() {
        let t = impression.timestamp;
        let treatment = impression.treatment.as_str();
        current = match current {
            None => Some((treatment, window.min_time, t)),
            Some((active, start, _)) if active == treatment => Some((active, start, t)),
            Some((active, start, last)) => {
                runs.push(TreatmentRun {
                    treatment: active,
                    start,
                    end: last,
                });
                Some((treatment, last, t))
            }
        };
    }

    if let Some((treatment, start, _)) = current {
        runs.push(TreatmentRun {
            treatment,
            start,
            end: window.max_time,
        });
    }

    runs
}

fn runs_to_next_impression<'a>(series: &'a Series, window: &TimeWindow) -> Vec<TreatmentRun<'a>> {
    let mut runs = Vec::new();
    let mut cursor = window.min_time;
    let mut current: Option<&'a str> = None;

    for impression in series.impressions() {
        let t = impression.timestamp;
        let treatment = impression.treatment.as_str();
        match current {
            Some(active) if active == treatment => {}
            Some(active) => {
                runs.push(TreatmentRun {
                    treatment: active,
                    start: cursor,
                    end: t,
                });
                cursor = t;
                current = Some(treatment);
            }
            None => {
                cursor = t;
                current = Some(treatment);
            }
        }
    }

    if let Some(treatment) = current {
        if cursor < window.max_time {
            runs.push(TreatmentRun {
                treatment,
                start: cursor,
                end: window.max_time,
            });
        }
    }

    runs
}

/// Segments of one series, coloured from `palette`, in window fractions.
///
/// A zero-length window uses a denominator of 1, which yields zero-width
/// segments instead of a division fault.
pub fn segment_series(
    series: &Series,
    window: &TimeWindow,
    palette: &PaletteAssignment,
    change_point: ChangePoint,
) -> Vec<Segment> {
    let denominator = window.denominator();

    treatment_runs(series, window, change_point)
        .into_iter()
        .map(|run| {
            let start_fraction = window.fraction_of(run.start);
            let width = (run.end.millis() - run.start.millis()) as f64 / denominator;
            Segment {
                start_fraction,
                width_fraction: width.clamp(0.0, 1.0 - start_fraction),
                treatment: run.treatment.to_string(),
                color: palette.resolve(run.treatment).color.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaletteConfig;
    use crate::models::Impression;
    use crate::services::series::SeriesSet;

    const EPS: f64 = 1e-9;

    fn ts(at: &str) -> Timestamp {
        Timestamp::parse(at).unwrap()
    }

    fn series(events: &[(&str, &str)]) -> SeriesSet {
        let impressions: Vec<_> = events
            .iter()
            .map(|(at, treatment)| Impression::new("flag", ts(at), *treatment))
            .collect();
        SeriesSet::build(&impressions)
    }

    fn segments(set: &SeriesSet, window: &TimeWindow, change_point: ChangePoint) -> Vec<Segment> {
        let series = set.get("flag").unwrap();
        let palette = PaletteAssignment::build(series.treatments(), &PaletteConfig::default());
        segment_series(series, window, &palette, change_point)
    }

    #[test]
    fn test_change_point_parse() {
        assert_eq!(
            "last_sighting".parse::<ChangePoint>().unwrap(),
            ChangePoint::LastSighting
        );
        assert_eq!(
            "NEXT_IMPRESSION".parse::<ChangePoint>().unwrap(),
            ChangePoint::NextImpression
        );
        assert!("whenever".parse::<ChangePoint>().is_err());
        assert_eq!(ChangePoint::NextImpression.to_string(), "next_impression");
    }

    #[test]
    fn test_merges_runs_and_moves_boundary_to_last_sighting() {
        // on at day 0 and day 1, off at day 4
        let set = series(&[
            ("2024-05-01", "on"),
            ("2024-05-02", "on"),
            ("2024-05-05", "off"),
        ]);
        let window = set.window().unwrap();
        let segs = segments(&set, &window, ChangePoint::LastSighting);

        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].treatment, "on");
        assert!((segs[0].start_fraction - 0.0).abs() < EPS);
        assert!((segs[0].width_fraction - 0.25).abs() < EPS);
        assert_eq!(segs[1].treatment, "off");
        assert!((segs[1].start_fraction - 0.25).abs() < EPS);
        assert!((segs[1].end_fraction() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_single_impression_spans_window() {
        let set = series(&[("2024-05-03", "on")]);
        let window = TimeWindow::new(ts("2024-05-01"), ts("2024-05-05"));
        let segs = segments(&set, &window, ChangePoint::LastSighting);

        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].start_fraction, 0.0);
        assert!((segs[0].width_fraction - 1.0).abs() < EPS);
    }

    #[test]
    fn test_alternating_treatments_tile_window() {
        let set = series(&[
            ("2024-05-02", "off"),
            ("2024-05-03", "on"),
            ("2024-05-04", "off"),
            ("2024-05-04", "off"),
        ]);
        let window = TimeWindow::new(ts("2024-05-01"), ts("2024-05-09"));
        let segs = segments(&set, &window, ChangePoint::LastSighting);

        let labels: Vec<_> = segs.iter().map(|s| s.treatment.as_str()).collect();
        assert_eq!(labels, vec!["off", "on", "off"]);
        let total: f64 = segs.iter().map(|s| s.width_fraction).sum();
        assert!((total - 1.0).abs() < EPS);
        for pair in segs.windows(2) {
            assert!((pair[0].end_fraction() - pair[1].start_fraction).abs() < EPS);
        }
    }

    #[test]
    fn test_segments_carry_palette_colors() {
        let set = series(&[("2024-05-01", "off"), ("2024-05-02", "on")]);
        let window = set.window().unwrap();
        let segs = segments(&set, &window, ChangePoint::LastSighting);
        assert_eq!(segs[0].color.hex, "#dc5b62");
        assert_eq!(segs[1].color.hex, "#8cadd3");
    }

    #[test]
    fn test_degenerate_window_yields_zero_width() {
        let set = series(&[("2024-05-01", "on"), ("2024-05-01", "off")]);
        let window = set.window().unwrap();
        assert!(window.is_degenerate());

        let segs = segments(&set, &window, ChangePoint::LastSighting);
        assert_eq!(segs.len(), 2);
        assert!(segs.iter().all(|s| s.width_fraction == 0.0));
        assert!(segs.iter().all(|s| s.start_fraction == 0.0));
    }

    #[test]
    fn test_next_impression_persists_until_change() {
        let set = series(&[
            ("2024-05-02", "on"),
            ("2024-05-03", "on"),
            ("2024-05-04", "off"),
        ]);
        let window = TimeWindow::new(ts("2024-05-01"), ts("2024-05-05"));
        let segs = segments(&set, &window, ChangePoint::NextImpression);

        assert_eq!(segs.len(), 2);
        // nothing before the first impression
        assert!((segs[0].start_fraction - 0.25).abs() < EPS);
        assert!((segs[0].width_fraction - 0.5).abs() < EPS);
        assert_eq!(segs[0].treatment, "on");
        assert!((segs[1].start_fraction - 0.75).abs() < EPS);
        assert!((segs[1].width_fraction - 0.25).abs() < EPS);
        assert_eq!(segs[1].treatment, "off");
    }

    #[test]
    fn test_next_impression_no_fill_at_window_end() {
        let set = series(&[("2024-05-01", "on"), ("2024-05-05", "off")]);
        let window = set.window().unwrap();
        let segs = segments(&set, &window, ChangePoint::NextImpression);

        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].treatment, "on");
        assert!((segs[0].width_fraction - 1.0).abs() < EPS);
    }

    #[test]
    fn test_runs_are_clamped_to_window() {
        let set = series(&[("2024-04-20", "on"), ("2024-05-10", "off")]);
        let window = TimeWindow::new(ts("2024-05-01"), ts("2024-05-05"));
        let runs = treatment_runs(set.get("flag").unwrap(), &window, ChangePoint::LastSighting);

        for run in &runs {
            assert!(run.start >= window.min_time && run.end <= window.max_time);
        }
    }
}
