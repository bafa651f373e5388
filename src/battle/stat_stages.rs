use schema::StatKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Battle stat stages. A stat that is absent sits at stage 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatModifiers(BTreeMap<StatKind, i8>);

impl StatModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: StatKind) -> i8 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    /// Builder used for deltas: `StatModifiers::new().with(StatKind::Attack, 2)`.
    pub fn with(mut self, stat: StatKind, stage: i8) -> Self {
        if stage != 0 {
            self.0.insert(stat, stage);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, i8)> + '_ {
        self.0.iter().map(|(stat, stage)| (*stat, *stage))
    }

    pub fn is_neutral(&self) -> bool {
        self.0.values().all(|stage| *stage == 0)
    }
}

/// Multiplier for a regular stat stage.
pub fn stage_to_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(MIN_STAGE, MAX_STAGE);
    if stage >= 0 {
        (2.0 + stage as f64) / 2.0
    } else {
        2.0 / (2.0 + (-stage) as f64)
    }
}

/// Multiplier for the combined accuracy-minus-evasion stage.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(MIN_STAGE, MAX_STAGE);
    if stage >= 0 {
        (3.0 + stage as f64) / 3.0
    } else {
        3.0 / (3.0 + (-stage) as f64)
    }
}

/// Adds every stage present in `delta` to `current`, clamping each result.
/// Stats missing from `delta` are left alone.
pub fn add_stages(current: &StatModifiers, delta: &StatModifiers) -> StatModifiers {
    let mut next = current.clone();
    for (stat, change) in delta.iter() {
        let stage = (current.get(stat) as i16 + change as i16)
            .clamp(MIN_STAGE as i16, MAX_STAGE as i16) as i8;
        if stage == 0 {
            next.0.remove(&stat);
        } else {
            next.0.insert(stat, stage);
        }
    }
    next
}

/// Stat value after its stage multiplier, rounded, never below 1.
pub fn apply_stage(value: u16, stage: i8) -> u16 {
    if stage == 0 {
        return value;
    }
    ((value as f64 * stage_to_multiplier(stage)).round() as u16).max(1)
}
