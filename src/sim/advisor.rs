//! Lookahead advisory for the nearest obstacle, plus the collision predicate

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::obstacle::{Lane, Obstacle, ObstacleKind, ObstaclePool};
use super::player::{Hitbox, Player};

/// Depth window `[far_warn, near_cutoff)` in which the nearest obstacle is announced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryWindow {
    pub far_warn: f64,
    pub near_cutoff: f64,
}

impl Default for AdvisoryWindow {
    fn default() -> Self {
        Self {
            far_warn: -45.0,
            near_cutoff: -5.0,
        }
    }
}

impl AdvisoryWindow {
    pub fn contains(&self, z: f64) -> bool {
        z >= self.far_warn && z < self.near_cutoff
    }
}

/// The move the player should make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Jump,
    Duck,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub kind: ObstacleKind,
    pub lane: Option<Lane>,
    pub cue: Cue,
}

/// Announce the nearest active obstacle if it lies inside `window`
pub fn advise(pool: &ObstaclePool, window: &AdvisoryWindow) -> Option<Advisory> {
    let nearest = pool.peek_nearest()?;
    if !window.contains(nearest.z) {
        return None;
    }

    let cue = match nearest.kind {
        ObstacleKind::Jump => Cue::Jump,
        ObstacleKind::Duck => Cue::Duck,
        // Step away from the blocked lane
        ObstacleKind::Side => match nearest.lane {
            Some(Lane::Left) => Cue::Right,
            Some(Lane::Right) | None => Cue::Left,
        },
    };

    Some(Advisory {
        kind: nearest.kind,
        lane: nearest.lane,
        cue,
    })
}

/// Pluggable hit test between the player and an obstacle
pub trait CollisionCheck {
    fn collides(&self, player: &Player, obstacle: &Obstacle) -> bool;
}

/// Compares the player hitbox against a fixed extent per obstacle kind when
/// the obstacle is level with the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentCollision {
    /// Half-depth of the slab around z = 0 where obstacles can touch the player
    pub reach: f64,
}

impl Default for ExtentCollision {
    fn default() -> Self {
        Self { reach: 1.0 }
    }
}

impl ExtentCollision {
    /// Body extent of an obstacle (x = lateral, y = height)
    pub fn extent(obstacle: &Obstacle) -> Hitbox {
        match obstacle.kind {
            // Low hurdle across the track
            ObstacleKind::Jump => Hitbox {
                min: DVec2::new(-4.0, 0.0),
                max: DVec2::new(4.0, 1.0),
            },
            // Overhead bar
            ObstacleKind::Duck => Hitbox {
                min: DVec2::new(-5.0, 1.0),
                max: DVec2::new(5.0, 2.5),
            },
            ObstacleKind::Side => {
                let x = obstacle.lane.map(|l| l.x()).unwrap_or(0.0);
                Hitbox {
                    min: DVec2::new(x - 1.5, 0.0),
                    max: DVec2::new(x + 1.5, 4.0),
                }
            }
        }
    }
}

impl CollisionCheck for ExtentCollision {
    fn collides(&self, player: &Player, obstacle: &Obstacle) -> bool {
        obstacle.active
            && obstacle.z.abs() <= self.reach
            && player.hitbox().overlaps(&Self::extent(obstacle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::obstacle::{PoolCapacity, SpawnOutcome};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pool_with(kind: ObstacleKind) -> (ObstaclePool, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        pool.configure(&[kind], 1.0e9);
        assert!(matches!(pool.try_spawn(&mut rng), SpawnOutcome::Spawned { .. }));
        (pool, rng)
    }

    #[test]
    fn test_window_bounds() {
        let (mut pool, mut rng) = pool_with(ObstacleKind::Jump);
        let window = AdvisoryWindow::default();

        // Spawned at -50: too far
        assert!(advise(&pool, &window).is_none());

        pool.tick(5.0, &mut rng);
        let advisory = advise(&pool, &window).unwrap();
        assert_eq!(advisory.cue, Cue::Jump);

        // -5 is outside the half-open window
        pool.tick(40.0, &mut rng);
        assert!(advise(&pool, &window).is_none());
    }

    #[test]
    fn test_side_cue_points_away() {
        let (mut pool, mut rng) = pool_with(ObstacleKind::Side);
        pool.tick(20.0, &mut rng);
        let advisory = advise(&pool, &AdvisoryWindow::default()).unwrap();
        match advisory.lane {
            Some(Lane::Left) => assert_eq!(advisory.cue, Cue::Right),
            Some(Lane::Right) => assert_eq!(advisory.cue, Cue::Left),
            None => panic!("side obstacle without lane"),
        }
    }

    #[test]
    fn test_empty_pool_has_no_advisory() {
        let pool = ObstaclePool::new(PoolCapacity::default());
        assert!(advise(&pool, &AdvisoryWindow::default()).is_none());
    }

    fn obstacle(kind: ObstacleKind, lane: Option<Lane>) -> Obstacle {
        Obstacle {
            id: 1,
            kind,
            lane,
            z: 0.0,
            active: true,
        }
    }

    #[test]
    fn test_collision_depends_on_state() {
        let check = ExtentCollision::default();
        let hurdle = obstacle(ObstacleKind::Jump, None);
        let bar = obstacle(ObstacleKind::Duck, None);

        let mut player = Player::new();
        assert!(check.collides(&player, &hurdle));
        assert!(check.collides(&player, &bar));

        player.duck();
        for _ in 0..30 {
            player.update(SIM_DT);
        }
        assert!(!check.collides(&player, &bar));
        player.stand_up();

        player.jump();
        player.update(crate::consts::JUMP_DURATION / 2.0);
        assert!(!check.collides(&player, &hurdle));
    }

    #[test]
    fn test_side_collision_by_lane() {
        let check = ExtentCollision::default();
        let player = Player::new();
        assert!(check.collides(&player, &obstacle(ObstacleKind::Side, Some(Lane::Left))));
        assert!(!check.collides(&player, &obstacle(ObstacleKind::Side, Some(Lane::Right))));

        let mut far = obstacle(ObstacleKind::Side, Some(Lane::Left));
        far.z = -20.0;
        assert!(!check.collides(&player, &far));
    }
}
