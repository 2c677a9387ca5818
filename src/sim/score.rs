//! Workout time, calorie estimate and action counters

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_KCAL_PER_MINUTE, DUCK_KCAL, JUMP_KCAL, SIDE_STEP_KCAL};
use crate::format_clock;

/// A counted player exertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Jump,
    Duck,
    SideStep,
}

impl ActionKind {
    /// Calorie cost of one action (jump > duck > side step)
    pub fn kcal(&self) -> f64 {
        match self {
            ActionKind::Jump => JUMP_KCAL,
            ActionKind::Duck => DUCK_KCAL,
            ActionKind::SideStep => SIDE_STEP_KCAL,
        }
    }
}

/// Immutable score snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub elapsed_secs: f64,
    pub calories: f64,
    pub jumps: u32,
    pub ducks: u32,
    pub side_steps: u32,
}

impl ScoreStats {
    pub fn total_actions(&self) -> u32 {
        self.jumps + self.ducks + self.side_steps
    }

    /// Elapsed time as `m:ss`
    pub fn formatted_time(&self) -> String {
        format_clock(self.elapsed_secs)
    }

    pub fn formatted_calories(&self) -> String {
        format!("{:.1} kcal", self.calories)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    stats: ScoreStats,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count elapsed time plus the idle-exertion baseline
    pub fn add_time(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        self.stats.elapsed_secs += dt;
        self.stats.calories += BASE_KCAL_PER_MINUTE / 60.0 * dt;
    }

    pub fn add_action(&mut self, kind: ActionKind) {
        match kind {
            ActionKind::Jump => self.stats.jumps += 1,
            ActionKind::Duck => self.stats.ducks += 1,
            ActionKind::SideStep => self.stats.side_steps += 1,
        }
        self.stats.calories += kind.kcal();
    }

    pub fn stats(&self) -> ScoreStats {
        self.stats
    }

    pub fn reset(&mut self) {
        self.stats = ScoreStats::default();
    }
}
