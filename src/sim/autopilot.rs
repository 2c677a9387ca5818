//! Idle/demo mode: derive player commands from what lies ahead

use super::advisor::Cue;
use super::obstacle::{Lane, ObstacleKind};
use super::player::VerticalState;
use super::state::GameState;
use super::tick::PlayerCommand;
use crate::consts::{JUMP_DURATION, SIM_DT};

/// Obstacles up to this depth still count as ahead of the player
const LOOKAHEAD_LIMIT: f64 = 1.5;
/// Start ducking once a bar is this close
const DUCK_DISTANCE: f64 = 8.0;

/// Commands the autopilot would press this tick
pub fn autopilot_commands(state: &GameState) -> Vec<PlayerCommand> {
    let mut commands = Vec::new();
    let player = &state.player;

    // Side steps follow the advisory cue as soon as it shows
    match state.advisory.map(|a| a.cue) {
        Some(Cue::Left) => commands.push(PlayerCommand::MoveLeft),
        Some(Cue::Right) => commands.push(PlayerCommand::MoveRight),
        _ => {}
    }

    let Some(obstacle) = state.pool.nearest_ahead(LOOKAHEAD_LIMIT) else {
        if player.vertical == VerticalState::Ducking {
            commands.push(PlayerCommand::StandUp);
        }
        return commands;
    };

    let speed = state.scheduler.speed();
    match obstacle.kind {
        ObstacleKind::Side => {
            // Late dodge if the advisory window was missed
            if obstacle.lane == Some(player.lane) {
                commands.push(match player.lane.opposite() {
                    Lane::Left => PlayerCommand::MoveLeft,
                    Lane::Right => PlayerCommand::MoveRight,
                });
            }
            if player.vertical == VerticalState::Ducking {
                commands.push(PlayerCommand::StandUp);
            }
        }
        ObstacleKind::Jump => {
            // Peak of the arc lines up with the hurdle
            let takeoff = -(speed * (JUMP_DURATION / 2.0) / SIM_DT);
            if obstacle.z >= takeoff && player.vertical != VerticalState::Jumping {
                if player.vertical == VerticalState::Ducking {
                    commands.push(PlayerCommand::StandUp);
                }
                commands.push(PlayerCommand::Jump);
            }
        }
        ObstacleKind::Duck => {
            if obstacle.z >= -DUCK_DISTANCE && player.vertical == VerticalState::Grounded {
                commands.push(PlayerCommand::Duck);
            }
        }
    }

    commands
}
