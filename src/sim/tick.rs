//! Fixed timestep simulation tick
//!
//! Within one gameplay tick the order is fixed: score, phase clock, player,
//! obstacle pool, collision, advisory. Phase parameter changes are therefore
//! visible to the same tick's obstacle advance and spawn decision.

use serde::{Deserialize, Serialize};

use super::advisor::advise;
use super::autopilot::autopilot_commands;
use super::obstacle::SpawnOutcome;
use super::state::{GameEvent, GameState, SessionStatus};
use super::transition::{SequencerEvent, SequencerStatus, TransitionSequencer};

/// Discrete player intent, delivered once per input edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCommand {
    MoveLeft,
    MoveRight,
    Jump,
    /// Held: pair with `StandUp` on release
    Duck,
    StandUp,
    TogglePause,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands queued since the previous tick, in arrival order
    pub commands: Vec<PlayerCommand>,
    /// Idle/demo mode - the autopilot plays the level
    pub autopilot: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) {
    let mut gameplay = Vec::with_capacity(input.commands.len());
    for command in &input.commands {
        match command {
            PlayerCommand::TogglePause => state.toggle_pause(),
            // Releasing the duck key always counts, even between levels
            PlayerCommand::StandUp => state.player.stand_up(),
            other => gameplay.push(*other),
        }
    }

    // Paused sessions freeze gameplay and transition timers alike
    if state.paused {
        return;
    }

    match state.status {
        SessionStatus::Idle | SessionStatus::Complete => {}
        SessionStatus::Intro | SessionStatus::Transition | SessionStatus::Results => {
            state.time_ticks += 1;
            advance_transition(state, dt);
        }
        SessionStatus::Playing => {
            state.time_ticks += 1;
            if input.autopilot {
                gameplay.extend(autopilot_commands(state));
            }
            play(state, &gameplay, dt);
        }
    }
}

fn advance_transition(state: &mut GameState, dt: f64) {
    let Some(sequencer) = state.sequencer.as_mut() else {
        log::warn!("No sequence running in {:?}", state.status);
        if state.status == SessionStatus::Results {
            complete_session(state);
        } else {
            state.status = SessionStatus::Playing;
        }
        return;
    };

    let mut out = Vec::new();
    let status = sequencer.advance(dt, &mut out);
    let mut next_level = None;
    for event in out {
        match &event {
            SequencerEvent::ScenarioApplied { id } => state.scenario = Some(id.clone()),
            SequencerEvent::Finished { next_level: level } => next_level = *level,
            _ => {}
        }
        state.events.push(GameEvent::Transition(event));
    }

    if status == SequencerStatus::Finished {
        state.sequencer = None;
        let Some(level) = next_level.filter(|_| state.status != SessionStatus::Results) else {
            complete_session(state);
            return;
        };
        let phase = state.scheduler.start_phase(level, &mut state.pool);
        state.events.push(GameEvent::PhaseStarted {
            index: phase.index,
            name: phase.name.clone(),
            speed: phase.speed,
        });
        state.status = SessionStatus::Playing;
    }
}

fn complete_session(state: &mut GameState) {
    state.status = SessionStatus::Complete;
    state.events.push(GameEvent::SessionComplete {
        stats: state.score.stats(),
    });
}

fn play(state: &mut GameState, commands: &[PlayerCommand], dt: f64) {
    state.score.add_time(dt);

    if let Some(signal) = state.scheduler.tick(dt) {
        state.events.push(GameEvent::PhaseCompleted {
            index: signal.index,
        });
        if state.advisory.take().is_some() {
            state.events.push(GameEvent::AdvisoryChanged(None));
        }
        state.player.land();

        let next = if signal.is_last {
            None
        } else {
            state.scheduler.phase(signal.index + 1).cloned()
        };
        let Some(next) = next else {
            let stats = state.score.stats();
            log::info!(
                "Workout complete: {} / {} / {} actions",
                stats.formatted_time(),
                stats.formatted_calories(),
                stats.total_actions()
            );
            let plan = state.planner.plan_completion(stats, &mut state.rng);
            state.sequencer = Some(TransitionSequencer::new(plan));
            state.status = SessionStatus::Results;
            advance_transition(state, 0.0);
            return;
        };
        let plan = state.planner.plan_transition(&next, &mut state.rng);
        log::info!(
            "Intermission before level {} ({:.1}s)",
            next.index,
            plan.total_duration()
        );
        state.sequencer = Some(TransitionSequencer::new(plan));
        state.status = SessionStatus::Transition;
        // Announce the first stage right away
        advance_transition(state, 0.0);
        return;
    }

    for &command in commands {
        if !state.level_allows(command) {
            continue;
        }
        let action = match command {
            PlayerCommand::MoveLeft => state.player.move_left(),
            PlayerCommand::MoveRight => state.player.move_right(),
            PlayerCommand::Jump => state.player.jump(),
            PlayerCommand::Duck => state.player.duck(),
            PlayerCommand::StandUp => {
                state.player.stand_up();
                None
            }
            PlayerCommand::TogglePause => None,
        };
        if let Some(action) = action {
            state.score.add_action(action);
        }
    }
    state.player.update(dt);

    let speed = state.scheduler.speed();
    let report = state.pool.tick(speed, &mut state.rng);
    match report.spawn {
        Some(SpawnOutcome::Spawned { id, kind, lane }) => {
            state.events.push(GameEvent::ObstacleSpawned { id, kind, lane });
        }
        Some(SpawnOutcome::Exhausted { kind }) => {
            state.events.push(GameEvent::SpawnSkipped { kind });
        }
        None => {}
    }
    for id in report.despawned {
        state.hits.retain(|&hit| hit != id);
        state.events.push(GameEvent::ObstacleDespawned { id });
    }

    if let Some(nearest) = state.pool.peek_nearest() {
        if !state.hits.contains(&nearest.id) && state.collision.collides(&state.player, nearest) {
            log::debug!("Hit {} obstacle {}", nearest.kind.as_str(), nearest.id);
            state.hits.push(nearest.id);
            state.collisions += 1;
            state.events.push(GameEvent::Collision {
                id: nearest.id,
                kind: nearest.kind,
            });
        }
    }

    let advisory = advise(&state.pool, &state.settings.advisory);
    if advisory != state.advisory {
        state.advisory = advisory;
        state.events.push(GameEvent::AdvisoryChanged(advisory));
    }
}
