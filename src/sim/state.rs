//! Session state and presentation snapshots
//!
//! `GameState` is the explicit session context: every component lives here
//! and is advanced by `tick`. Nothing is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::advisor::{Advisory, CollisionCheck, ExtentCollision};
use super::obstacle::{Lane, Obstacle, ObstacleKind, ObstaclePool, PoolCapacity};
use super::phase::PhaseScheduler;
use super::player::{Player, PlayerSnapshot};
use super::score::{ScoreAccumulator, ScoreStats};
use super::tick::PlayerCommand;
use super::transition::{SequencerEvent, Stage, TransitionPlanner, TransitionSequencer};
use crate::content::ContentTables;
use crate::settings::Settings;
use crate::tuning::{PhaseTuning, build_phases, default_tuning};

/// Top-level session flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Not started (menu)
    Idle,
    /// Opening choreography before level 1
    Intro,
    /// Gameplay ticking
    Playing,
    /// Intermission between levels
    Transition,
    /// Closing stats and call-to-action sequence
    Results,
    /// Session over
    Complete,
}

/// Everything the presentation layer needs to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { seed: u64 },
    PhaseStarted { index: u32, name: String, speed: f64 },
    PhaseCompleted { index: u32 },
    Transition(SequencerEvent),
    ObstacleSpawned { id: u32, kind: ObstacleKind, lane: Option<Lane> },
    ObstacleDespawned { id: u32 },
    SpawnSkipped { kind: ObstacleKind },
    AdvisoryChanged(Option<Advisory>),
    Collision { id: u32, kind: ObstacleKind },
    PauseChanged { paused: bool },
    SessionComplete { stats: ScoreStats },
}

/// HUD values for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub status: SessionStatus,
    pub paused: bool,
    pub phase_index: u32,
    pub total_phases: u32,
    pub phase_name: String,
    pub progress: f64,
    pub time_remaining: f64,
    pub label: String,
    pub stats: ScoreStats,
    pub advisory: Option<Advisory>,
    pub scenario: Option<String>,
    pub collisions: u32,
}

pub struct GameState {
    pub(crate) settings: Settings,
    pub(crate) rng: Pcg32,
    pub(crate) status: SessionStatus,
    pub(crate) paused: bool,
    pub(crate) score: ScoreAccumulator,
    pub(crate) scheduler: PhaseScheduler,
    pub(crate) player: Player,
    pub(crate) pool: ObstaclePool,
    pub(crate) planner: TransitionPlanner,
    pub(crate) sequencer: Option<TransitionSequencer>,
    pub(crate) advisory: Option<Advisory>,
    pub(crate) collision: Box<dyn CollisionCheck>,
    /// Obstacles already reported as hits during their current pass
    pub(crate) hits: Vec<u32>,
    pub(crate) collisions: u32,
    pub(crate) scenario: Option<String>,
    pub(crate) events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Session with the reference phase table
    pub fn new(settings: Settings, content: &ContentTables) -> Self {
        Self::with_tuning(settings, content, &default_tuning())
    }

    pub fn with_tuning(settings: Settings, content: &ContentTables, tuning: &[PhaseTuning]) -> Self {
        let phases = build_phases(tuning, &settings);
        let planner = TransitionPlanner::new(content, &settings.scenario_mode, settings.timings);

        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            status: SessionStatus::Idle,
            paused: false,
            score: ScoreAccumulator::new(),
            scheduler: PhaseScheduler::new(phases),
            player: Player::new(),
            pool: ObstaclePool::new(PoolCapacity::default()),
            planner,
            sequencer: None,
            advisory: None,
            collision: Box::new(ExtentCollision::default()),
            hits: Vec::new(),
            collisions: 0,
            scenario: None,
            events: Vec::new(),
            time_ticks: 0,
            settings,
        }
    }

    /// Replace the hit test
    pub fn set_collision_check(&mut self, check: Box<dyn CollisionCheck>) {
        self.collision = check;
    }

    /// Reset everything and run the intro choreography
    pub fn start(&mut self) {
        self.reset();
        let plan = self.planner.plan_intro(self.scheduler.phases(), &mut self.rng);
        log::info!(
            "Session started: {} phases, intro {:.1}s",
            self.scheduler.total_phases(),
            plan.total_duration()
        );
        self.sequencer = Some(TransitionSequencer::new(plan));
        self.status = SessionStatus::Intro;
        self.events.push(GameEvent::SessionStarted {
            seed: self.settings.seed,
        });
    }

    /// Back to idle with all counters and histories cleared
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.settings.seed);
        self.status = SessionStatus::Idle;
        self.paused = false;
        self.score.reset();
        self.scheduler.reset();
        self.player.reset();
        self.pool.reset();
        self.planner.reset();
        self.sequencer = None;
        self.advisory = None;
        self.hits.clear();
        self.collisions = 0;
        self.scenario = None;
        self.events.clear();
        self.time_ticks = 0;
    }

    /// Pausing is honoured whenever a session is in progress; it freezes
    /// gameplay and transition timers alike
    pub(crate) fn toggle_pause(&mut self) {
        match self.status {
            SessionStatus::Intro
            | SessionStatus::Playing
            | SessionStatus::Transition
            | SessionStatus::Results => {
                self.paused = !self.paused;
                log::info!("Paused: {}", self.paused);
                self.events.push(GameEvent::PauseChanged {
                    paused: self.paused,
                });
            }
            SessionStatus::Idle | SessionStatus::Complete => {}
        }
    }

    /// Whether the current level has unlocked the action behind `command`
    pub fn level_allows(&self, command: PlayerCommand) -> bool {
        let allowed = &self.scheduler.current().allowed;
        match command {
            PlayerCommand::MoveLeft | PlayerCommand::MoveRight => allowed.contains(&ObstacleKind::Side),
            PlayerCommand::Jump => allowed.contains(&ObstacleKind::Jump),
            PlayerCommand::Duck => allowed.contains(&ObstacleKind::Duck),
            PlayerCommand::StandUp | PlayerCommand::TogglePause => true,
        }
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> HudSnapshot {
        let phase = self.scheduler.current();
        HudSnapshot {
            status: self.status,
            paused: self.paused,
            phase_index: phase.index,
            total_phases: self.scheduler.total_phases(),
            phase_name: phase.name.clone(),
            progress: self.scheduler.progress(),
            time_remaining: self.scheduler.time_remaining(),
            label: self.scheduler.label(),
            stats: self.score.stats(),
            advisory: self.advisory,
            scenario: self.scenario.clone(),
            collisions: self.collisions,
        }
    }

    /// Active obstacles for rendering
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.pool.active().cloned().collect()
    }

    pub fn player(&self) -> PlayerSnapshot {
        self.player.snapshot()
    }

    pub fn stats(&self) -> ScoreStats {
        self.score.stats()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn advisory(&self) -> Option<Advisory> {
        self.advisory
    }

    /// Stage of the running intro, intermission or closing sequence
    pub fn current_stage(&self) -> Option<&Stage> {
        self.sequencer.as_ref().and_then(|s| s.current_stage())
    }

    pub fn scheduler(&self) -> &PhaseScheduler {
        &self.scheduler
    }

    pub fn pool(&self) -> &ObstaclePool {
        &self.pool
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let state = GameState::new(Settings::default(), &ContentTables::default());
        assert_eq!(state.status(), SessionStatus::Idle);
        assert_eq!(state.hud().label, "PHASE 1/4 - WARM UP (4:00)");
        assert!(state.obstacles().is_empty());
    }

    #[test]
    fn test_start_enters_intro() {
        let mut state = GameState::new(Settings::default(), &ContentTables::default());
        state.start();
        assert_eq!(state.status(), SessionStatus::Intro);
        assert!(state.current_stage().is_some());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::SessionStarted { seed: 12345 }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_pause_ignored_when_idle() {
        let mut state = GameState::new(Settings::default(), &ContentTables::default());
        state.toggle_pause();
        assert!(!state.is_paused());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_level_gating() {
        let state = GameState::new(Settings::default(), &ContentTables::default());
        // Progressive level 1 only unlocks jumping
        assert!(state.level_allows(PlayerCommand::Jump));
        assert!(!state.level_allows(PlayerCommand::Duck));
        assert!(!state.level_allows(PlayerCommand::MoveLeft));
        assert!(state.level_allows(PlayerCommand::StandUp));
    }

    #[test]
    fn test_bad_tuning_is_repaired() {
        let tuning = vec![PhaseTuning::new("BROKEN", -1.0, f64::NAN)];
        let state = GameState::with_tuning(Settings::default(), &ContentTables::default(), &tuning);
        let phase = state.scheduler().current();
        assert_eq!(phase.speed, 0.25);
        assert_eq!(phase.spawn_interval, 90.0);
        assert_eq!(phase.name, "BROKEN");
    }
}
