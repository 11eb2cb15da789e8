//! Treatment colour assignment.
//!
//! Well-known labels (`off`, `on`, `control` by default) always get their fixed
//! colour. Any other label gets the next unused colour of the secondary palette
//! in the order it is discovered; once that palette runs out, every further
//! label shares the overflow colour and is drawn crosshatched.
//!
//! An assignment is built once per rendering pass from the complete list of
//! treatments, so its result depends only on discovery order.

use std::collections::HashMap;

use crate::config::PaletteConfig;
use crate::routes::timeline::{ColorSpec, LegendEntry};

/// Appearance resolved for one treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: ColorSpec,
    pub is_overflow: bool,
}

/// Treatment → appearance for one rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteAssignment {
    entries: HashMap<String, PaletteEntry>,
    order: Vec<String>,
    overflow: PaletteEntry,
}

impl PaletteAssignment {
    /// Assign appearances to `treatments`, given in discovery order. Repeated
    /// labels are ignored after their first occurrence.
    pub fn build<'a, I>(treatments: I, config: &PaletteConfig) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let overflow = PaletteEntry {
            color: ColorSpec::crosshatch(config.overflow.clone()),
            is_overflow: true,
        };
        let mut entries = HashMap::new();
        let mut order = Vec::new();
        let mut extra = config.extra.iter();

        for treatment in treatments {
            if entries.contains_key(treatment) {
                continue;
            }

            let entry = match config.known.get(treatment) {
                Some(hex) => PaletteEntry {
                    color: ColorSpec::solid(hex.clone()),
                    is_overflow: false,
                },
                None => match extra.next() {
                    Some(hex) => PaletteEntry {
                        color: ColorSpec::solid(hex.clone()),
                        is_overflow: false,
                    },
                    None => overflow.clone(),
                },
            };

            entries.insert(treatment.to_string(), entry);
            order.push(treatment.to_string());
        }

        Self {
            entries,
            order,
            overflow,
        }
    }

    pub fn get(&self, treatment: &str) -> Option<&PaletteEntry> {
        self.entries.get(treatment)
    }

    /// Appearance of `treatment`; labels absent from the assignment get the
    /// overflow appearance.
    pub fn resolve(&self, treatment: &str) -> &PaletteEntry {
        self.entries.get(treatment).unwrap_or(&self.overflow)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn overflow_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_overflow).count()
    }

    /// Legend rows in discovery order.
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.order
            .iter()
            .map(|treatment| {
                let entry = self.resolve(treatment);
                LegendEntry {
                    treatment: treatment.clone(),
                    color: entry.color.clone(),
                    is_overflow: entry.is_overflow,
                }
            })
            .collect()
    }
}
