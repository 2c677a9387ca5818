//! Stride Rush - A phase-based exercise runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacles, player, phases, transitions)
//! - `tuning`: Data-driven phase balance
//! - `settings`: Session preferences
//! - `content`: Phrase, scenario and call-to-action tables

pub mod content;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use content::ContentTables;
pub use error::ConfigError;
pub use settings::{ActionMode, ScenarioMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Track depth where obstacles appear (negative = ahead of the player)
    pub const SPAWN_Z: f64 = -50.0;
    /// Obstacles past this depth have left the screen behind the player
    pub const DESPAWN_Z: f64 = 10.0;

    /// Lateral x-coordinate of each lane (left, right)
    pub const LANE_X: [f64; 2] = [-2.0, 2.0];
    /// Lateral easing rate (units per second)
    pub const LATERAL_SPEED: f64 = 12.0;

    /// Eye height when standing
    pub const BASE_HEIGHT: f64 = 1.6;
    /// Eye height target while ducking
    pub const DUCK_HEIGHT: f64 = 0.8;
    /// Peak extra height of the jump arc
    pub const JUMP_AMPLITUDE: f64 = 2.5;
    /// Jump arc duration (seconds)
    pub const JUMP_DURATION: f64 = 0.6;
    /// Per-tick smoothing factor toward the duck height
    pub const DUCK_SMOOTHING: f64 = 0.3;
    /// Per-tick smoothing factor back to standing height
    pub const STAND_SMOOTHING: f64 = 0.2;
    /// Top of the player hitbox when standing; scales with eye height
    pub const HEAD_HEIGHT: f64 = 1.9;
    /// Player hitbox width
    pub const HITBOX_WIDTH: f64 = 0.8;

    /// Idle exertion (running in place)
    pub const BASE_KCAL_PER_MINUTE: f64 = 8.0;
    pub const JUMP_KCAL: f64 = 0.8;
    pub const DUCK_KCAL: f64 = 0.5;
    pub const SIDE_STEP_KCAL: f64 = 0.3;
}

/// Format seconds as `m:ss`
pub fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}
