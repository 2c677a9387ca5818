//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, pool record ids)
//! - No rendering, audio or platform dependencies

pub mod advisor;
pub mod autopilot;
pub mod obstacle;
pub mod phase;
pub mod player;
pub mod score;
pub mod selector;
pub mod state;
pub mod tick;
pub mod transition;

pub use advisor::{Advisory, AdvisoryWindow, CollisionCheck, Cue, ExtentCollision, advise};
pub use autopilot::autopilot_commands;
pub use obstacle::{Lane, Obstacle, ObstacleKind, ObstaclePool, PoolCapacity, SpawnOutcome};
pub use phase::{Phase, PhaseScheduler, PhaseSignal, SchedulerState};
pub use player::{Hitbox, Player, PlayerSnapshot, VerticalState};
pub use score::{ActionKind, ScoreAccumulator, ScoreStats};
pub use selector::SelectionBag;
pub use state::{GameEvent, GameState, HudSnapshot, SessionStatus};
pub use tick::{PlayerCommand, TickInput, tick};
pub use transition::{
    SequencerEvent, SequencerStatus, Stage, StageContent, StageKind, TransitionPlan,
    TransitionPlanner, TransitionSequencer,
};
