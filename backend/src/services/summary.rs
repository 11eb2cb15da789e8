//! Environment unique-key summary and control counts.

use serde_json::Value;

use crate::config::{default_overflow_color, SummaryConfig};
use crate::routes::summary::{ControlCount, EnvironmentSummary, SummarySlice};
use crate::services::normalizer::{lenient_count, resolve_flag, FieldAccessor};

pub const ENVIRONMENT_FIELD: FieldAccessor = FieldAccessor {
    canonical: "environment",
    candidates: &["environmentId", "environment_id", "environment"],
};

pub const UNIQUE_KEYS_FIELD: FieldAccessor = FieldAccessor {
    canonical: "unique_keys",
    candidates: &["unique_key_count", "uniqueKeyCount"],
};

pub const CONTROL_COUNT_FIELD: FieldAccessor = FieldAccessor {
    canonical: "control_count",
    candidates: &["control_count", "controlCount"],
};

/// Colour of the `i`-th slice; the overflow colour when no colours are set.
fn slice_color(config: &SummaryConfig, i: usize) -> String {
    config
        .colors
        .get(i % config.colors.len().max(1))
        .cloned()
        .unwrap_or_else(default_overflow_color)
}

/// Unique-key share of the selected environment.
///
/// Environments are listed in first-seen order; without an explicit choice
/// the first one is selected. Slices keep input order and are cut at
/// `config.top_n`; colours cycle through `config.colors`.
pub fn build_environment_summary(
    records: &[Value],
    environment: Option<&str>,
    config: &SummaryConfig,
) -> EnvironmentSummary {
    let objects: Vec<_> = records.iter().filter_map(Value::as_object).collect();

    let mut environments: Vec<String> = Vec::new();
    for record in &objects {
        if let Some(env) = ENVIRONMENT_FIELD.resolve_text(record) {
            if !environments.contains(&env) {
                environments.push(env);
            }
        }
    }

    let selected = environment
        .map(String::from)
        .or_else(|| environments.first().cloned());

    let slices = match &selected {
        Some(env) => objects
            .iter()
            .filter(|record| {
                ENVIRONMENT_FIELD.resolve_text(record).as_deref() == Some(env.as_str())
            })
            .take(config.top_n)
            .enumerate()
            .map(|(i, record)| {
                let flag = resolve_flag(record);
                SummarySlice {
                    id: flag.clone(),
                    label: flag,
                    value: lenient_count(UNIQUE_KEYS_FIELD.resolve(record)),
                    color: slice_color(config, i),
                }
            })
            .collect(),
        None => vec![],
    };

    EnvironmentSummary {
        environments,
        selected,
        slices,
    }
}

/// Control-treatment impression count per flag, in input order.
pub fn normalize_control_counts(records: &[Value]) -> Vec<ControlCount> {
    records
        .iter()
        .filter_map(Value::as_object)
        .map(|record| ControlCount {
            flag: resolve_flag(record),
            control_count: lenient_count(CONTROL_COUNT_FIELD.resolve(record)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Value> {
        vec![
            json!({"environmentId": "prod", "splitName": "a", "unique_key_count": "120"}),
            json!({"environmentId": "stage", "splitName": "a", "unique_key_count": "4"}),
            json!({"environmentId": "prod", "splitName": "b", "unique_key_count": 80}),
            json!({"environmentId": "prod", "splitName": "c", "unique_key_count": "?"}),
        ]
    }

    #[test]
    fn test_empty_color_list_falls_back() {
        let config = SummaryConfig {
            top_n: 25,
            colors: vec![],
        };
        let summary = build_environment_summary(&records(), None, &config);
        assert_eq!(summary.slices.len(), 3);
        assert!(summary.slices.iter().all(|s| s.color == "#d9afca"));
    }

    #[test]
    fn test_defaults_to_first_environment() {
        let summary = build_environment_summary(&records(), None, &SummaryConfig::default());
        assert_eq!(summary.environments, vec!["prod", "stage"]);
        assert_eq!(summary.selected.as_deref(), Some("prod"));
        let values: Vec<_> = summary.slices.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![120, 80, 0]);
        assert_eq!(summary.slices[0].color, "#8cadd3");
        assert_eq!(summary.slices[1].color, "#dc5b62");
    }

    #[test]
    fn test_explicit_environment() {
        let summary =
            build_environment_summary(&records(), Some("stage"), &SummaryConfig::default());
        assert_eq!(summary.slices.len(), 1);
        assert_eq!(summary.slices[0].label, "a");
        assert_eq!(summary.slices[0].value, 4);
    }

    #[test]
    fn test_top_n_and_color_cycle() {
        let records: Vec<Value> = (0..30)
            .map(|i| json!({"environmentId": "prod", "splitName": format!("f{}", i), "unique_key_count": i}))
            .collect();
        let config = SummaryConfig {
            top_n: 25,
            colors: vec!["#000000".to_string(), "#ffffff".to_string()],
        };
        let summary = build_environment_summary(&records, None, &config);
        assert_eq!(summary.slices.len(), 25);
        assert_eq!(summary.slices[2].color, "#000000");
        assert_eq!(summary.slices[3].color, "#ffffff");
    }

    #[test]
    fn test_empty_records() {
        let summary = build_environment_summary(&[], None, &SummaryConfig::default());
        assert!(summary.environments.is_empty());
        assert!(summary.selected.is_none());
        assert!(summary.slices.is_empty());
    }

    #[test]
    fn test_control_counts() {
        let counts = normalize_control_counts(&[
            json!({"splitName": "a", "control_count": "12"}),
            json!({"splitname": "b", "control_count": null}),
            json!(null),
        ]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].control_count, 12);
        assert_eq!(counts[1].flag, "b");
        assert_eq!(counts[1].control_count, 0);
    }
}
