//! Player lane and vertical state machine
//!
//! Lateral movement eases toward the target lane at a bounded rate; jumps
//! follow a half-sine arc; ducking eases down with per-tick smoothing.

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::obstacle::Lane;
use super::score::ActionKind;
use crate::consts::*;

/// Vertical state. Jumping and ducking are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalState {
    Grounded,
    Jumping,
    Ducking,
}

/// Axis-aligned body extent (x = lateral, y = height above the track)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub min: DVec2,
    pub max: DVec2,
}

impl Hitbox {
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Overlap test against another extent
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Presentation snapshot of the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub lane: Lane,
    pub vertical: VerticalState,
    pub lateral_offset: f64,
    pub vertical_offset: f64,
    pub hitbox: Hitbox,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub lane: Lane,
    pub vertical: VerticalState,
    /// Current lateral x and eye height
    pub pos: DVec2,
    /// Seconds into the current jump arc
    pub jump_elapsed: f64,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: Lane::Left,
            vertical: VerticalState::Grounded,
            pos: DVec2::new(Lane::Left.x(), BASE_HEIGHT),
            jump_elapsed: 0.0,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_left(&mut self) -> Option<ActionKind> {
        if self.lane == Lane::Left {
            return None;
        }
        self.lane = Lane::Left;
        Some(ActionKind::SideStep)
    }

    pub fn move_right(&mut self) -> Option<ActionKind> {
        if self.lane == Lane::Right {
            return None;
        }
        self.lane = Lane::Right;
        Some(ActionKind::SideStep)
    }

    pub fn jump(&mut self) -> Option<ActionKind> {
        if self.vertical != VerticalState::Grounded {
            return None;
        }
        self.vertical = VerticalState::Jumping;
        self.jump_elapsed = 0.0;
        Some(ActionKind::Jump)
    }

    pub fn duck(&mut self) -> Option<ActionKind> {
        if self.vertical != VerticalState::Grounded {
            return None;
        }
        self.vertical = VerticalState::Ducking;
        Some(ActionKind::Duck)
    }

    pub fn stand_up(&mut self) {
        if self.vertical == VerticalState::Ducking {
            self.vertical = VerticalState::Grounded;
        }
    }

    /// Cut a jump short, e.g. when the level ends mid-air
    pub fn land(&mut self) {
        if self.vertical == VerticalState::Jumping {
            self.vertical = VerticalState::Grounded;
            self.jump_elapsed = 0.0;
            self.pos.y = BASE_HEIGHT;
        }
    }

    /// Interpolate lateral and vertical position
    pub fn update(&mut self, dt: f64) {
        let target_x = self.lane.x();
        let diff = target_x - self.pos.x;
        let step = LATERAL_SPEED * dt;
        if diff.abs() <= step {
            self.pos.x = target_x;
        } else {
            self.pos.x += diff.signum() * step;
        }

        match self.vertical {
            VerticalState::Jumping => {
                self.jump_elapsed += dt;
                let t = self.jump_elapsed / JUMP_DURATION;
                if t >= 1.0 {
                    self.vertical = VerticalState::Grounded;
                    self.jump_elapsed = 0.0;
                    self.pos.y = BASE_HEIGHT;
                } else {
                    self.pos.y = BASE_HEIGHT + JUMP_AMPLITUDE * (PI * t).sin();
                }
            }
            VerticalState::Ducking => {
                self.pos.y += (DUCK_HEIGHT - self.pos.y) * DUCK_SMOOTHING;
            }
            VerticalState::Grounded => {
                self.pos.y += (BASE_HEIGHT - self.pos.y) * STAND_SMOOTHING;
            }
        }
    }

    /// Height above standing eye level (negative while ducking)
    pub fn vertical_offset(&self) -> f64 {
        self.pos.y - BASE_HEIGHT
    }

    /// Body extent for collision checks, by vertical state
    pub fn hitbox(&self) -> Hitbox {
        let (min_y, max_y) = match self.vertical {
            // Feet lift off the track by the arc offset
            VerticalState::Jumping => (self.vertical_offset().max(0.0), self.pos.y + 0.3),
            // Head follows the eased eye height, so a fresh duck still has to settle
            VerticalState::Ducking | VerticalState::Grounded => {
                (0.0, HEAD_HEIGHT * self.pos.y / BASE_HEIGHT)
            }
        };
        Hitbox {
            min: DVec2::new(self.pos.x - HITBOX_WIDTH / 2.0, min_y),
            max: DVec2::new(self.pos.x + HITBOX_WIDTH / 2.0, max_y),
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            lane: self.lane,
            vertical: self.vertical,
            lateral_offset: self.pos.x,
            vertical_offset: self.vertical_offset(),
            hitbox: self.hitbox(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
