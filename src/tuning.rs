//! Data-driven phase balance
//!
//! Speed is constant within a phase; a larger spawn interval leaves more room
//! between obstacles.

use serde::{Deserialize, Serialize};

use crate::settings::{ActionMode, Settings};
use crate::sim::obstacle::ObstacleKind;
use crate::sim::phase::Phase;

/// Balance values for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTuning {
    pub name: String,
    /// Scroll distance per tick
    pub speed: f64,
    /// Distance that must accumulate between spawn attempts
    pub spawn_interval: f64,
}

impl PhaseTuning {
    pub fn new(name: &str, speed: f64, spawn_interval: f64) -> Self {
        Self {
            name: name.to_string(),
            speed,
            spawn_interval,
        }
    }
}

/// Reference four-level workout
pub fn default_tuning() -> Vec<PhaseTuning> {
    vec![
        PhaseTuning::new("WARM UP", 0.25, 90.0),
        PhaseTuning::new("LIGHT CARDIO", 0.28, 80.0),
        PhaseTuning::new("MEDIUM CARDIO", 0.32, 70.0),
        PhaseTuning::new("INTENSE", 0.35, 60.0),
    ]
}

/// Obstacle kinds unlocked at a 1-based level
pub fn level_actions(settings: &Settings, level: u32) -> Vec<ObstacleKind> {
    use ObstacleKind::*;

    match settings.action_mode {
        ActionMode::Progressive => match level {
            1 => vec![Jump],
            2 => vec![Jump, Side],
            _ => vec![Jump, Side, Duck],
        },
        ActionMode::All => vec![Jump, Side, Duck],
        ActionMode::Custom => settings
            .custom_actions
            .get(level.saturating_sub(1) as usize)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Build the phase table from balance values and session settings
pub fn build_phases(tuning: &[PhaseTuning], settings: &Settings) -> Vec<Phase> {
    tuning
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let index = i as u32 + 1;
            Phase {
                index,
                name: t.name.clone(),
                speed: t.speed,
                spawn_interval: t.spawn_interval,
                allowed: level_actions(settings, index),
                duration_secs: settings.phase_duration_secs,
            }
        })
        .collect()
}
