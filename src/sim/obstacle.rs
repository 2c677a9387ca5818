//! Obstacle pool and spawner
//!
//! Obstacles are pre-allocated per kind and toggled active/inactive; they are
//! never destroyed during a session. Spawning is driven by distance traveled,
//! not time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{DESPAWN_Z, SPAWN_Z};

/// What the player must do to clear an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Jump,
    Duck,
    Side,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Jump, ObstacleKind::Duck, ObstacleKind::Side];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Jump => "jump",
            ObstacleKind::Duck => "duck",
            ObstacleKind::Side => "side",
        }
    }
}

/// One of the two lateral lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub fn index(&self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Right => 1,
        }
    }

    pub fn opposite(&self) -> Lane {
        match self {
            Lane::Left => Lane::Right,
            Lane::Right => Lane::Left,
        }
    }

    pub fn x(&self) -> f64 {
        crate::consts::LANE_X[self.index()]
    }
}

/// A pooled obstacle record (no rendering payload)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Only set for `Side` obstacles
    pub lane: Option<Lane>,
    pub z: f64,
    pub active: bool,
}

/// Fixed pool sizes per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCapacity {
    pub jump: usize,
    pub duck: usize,
    pub side: usize,
}

impl Default for PoolCapacity {
    /// Sized for every kind being allowed at once
    fn default() -> Self {
        Self {
            jump: 3,
            duck: 3,
            side: 4,
        }
    }
}

impl PoolCapacity {
    pub fn for_kind(&self, kind: ObstacleKind) -> usize {
        match kind {
            ObstacleKind::Jump => self.jump,
            ObstacleKind::Duck => self.duck,
            ObstacleKind::Side => self.side,
        }
    }
}

/// Result of one spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned { id: u32, kind: ObstacleKind, lane: Option<Lane> },
    /// No inactive obstacle of the chosen kind was left
    Exhausted { kind: ObstacleKind },
}

/// Diagnostics counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub spawn_attempts: u32,
    pub spawned: u32,
    pub exhausted: u32,
    pub despawned: u32,
}

/// What happened to the pool during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolTick {
    pub spawn: Option<SpawnOutcome>,
    pub despawned: Vec<u32>,
}

/// Arena of obstacle records plus the spawn cadence
#[derive(Debug, Clone)]
pub struct ObstaclePool {
    obstacles: Vec<Obstacle>,
    /// Arena indices of active obstacles, in spawn order
    active: Vec<usize>,
    capacity: PoolCapacity,
    allowed: Vec<ObstacleKind>,
    spawn_interval: f64,
    distance_traveled: f64,
    last_side_lane: Option<Lane>,
    spawn_z: f64,
    despawn_z: f64,
    stats: PoolStats,
}

impl ObstaclePool {
    pub fn new(capacity: PoolCapacity) -> Self {
        let mut obstacles = Vec::new();
        let mut next_id = 1;
        for kind in ObstacleKind::ALL {
            for _ in 0..capacity.for_kind(kind) {
                obstacles.push(Obstacle {
                    id: next_id,
                    kind,
                    lane: None,
                    z: SPAWN_Z,
                    active: false,
                });
                next_id += 1;
            }
        }
        log::debug!("Obstacle pool created with {} records", obstacles.len());

        Self {
            obstacles,
            active: Vec::new(),
            capacity,
            allowed: vec![ObstacleKind::Jump],
            spawn_interval: 20.0,
            distance_traveled: 0.0,
            last_side_lane: None,
            spawn_z: SPAWN_Z,
            despawn_z: DESPAWN_Z,
            stats: PoolStats::default(),
        }
    }

    /// Override the spawn and despawn depths
    pub fn with_depths(mut self, spawn_z: f64, despawn_z: f64) -> Self {
        self.spawn_z = spawn_z;
        self.despawn_z = despawn_z;
        self
    }

    /// Restrict spawning to `allowed` kinds at the given distance cadence
    pub fn configure(&mut self, allowed: &[ObstacleKind], spawn_interval: f64) {
        let mut kinds: Vec<ObstacleKind> = Vec::with_capacity(allowed.len());
        for kind in allowed {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        if kinds.is_empty() {
            log::warn!("No obstacle kinds allowed, falling back to jump");
            kinds.push(ObstacleKind::Jump);
        }
        self.allowed = kinds;
        self.spawn_interval = spawn_interval;
        log::debug!(
            "Pool configured: allowed={:?}, interval={}",
            self.allowed,
            self.spawn_interval
        );
    }

    /// Advance the cadence, maybe spawn, then move every active obstacle
    pub fn tick(&mut self, speed: f64, rng: &mut impl Rng) -> PoolTick {
        let mut report = PoolTick::default();

        self.distance_traveled += speed;
        if self.distance_traveled >= self.spawn_interval {
            report.spawn = Some(self.try_spawn(rng));
            // Excess distance is discarded, not carried over
            self.distance_traveled = 0.0;
        }

        let despawn_z = self.despawn_z;
        let obstacles = &mut self.obstacles;
        self.active.retain(|&idx| {
            let obstacle = &mut obstacles[idx];
            obstacle.z += speed;
            if obstacle.z > despawn_z {
                obstacle.active = false;
                report.despawned.push(obstacle.id);
                false
            } else {
                true
            }
        });
        self.stats.despawned += report.despawned.len() as u32;

        report
    }

    /// Pick an allowed kind and activate a free record of that kind
    pub fn try_spawn(&mut self, rng: &mut impl Rng) -> SpawnOutcome {
        self.stats.spawn_attempts += 1;
        let kind = self.allowed[rng.random_range(0..self.allowed.len())];

        let Some(idx) = self
            .obstacles
            .iter()
            .position(|o| o.kind == kind && !o.active)
        else {
            self.stats.exhausted += 1;
            log::warn!("No inactive {} obstacle left, spawn skipped", kind.as_str());
            return SpawnOutcome::Exhausted { kind };
        };

        let lane = if kind == ObstacleKind::Side {
            let lane = match self.last_side_lane {
                Some(previous) => previous.opposite(),
                None if rng.random_bool(0.5) => Lane::Left,
                None => Lane::Right,
            };
            self.last_side_lane = Some(lane);
            Some(lane)
        } else {
            None
        };

        let obstacle = &mut self.obstacles[idx];
        obstacle.active = true;
        obstacle.z = self.spawn_z;
        obstacle.lane = lane;
        self.active.push(idx);
        self.stats.spawned += 1;

        log::debug!(
            "Spawned {} obstacle {} at z={} lane={:?} ({} active)",
            kind.as_str(),
            obstacle.id,
            self.spawn_z,
            lane,
            self.active.len()
        );

        SpawnOutcome::Spawned {
            id: obstacle.id,
            kind,
            lane,
        }
    }

    /// Active obstacle closest to the player (greatest z)
    pub fn peek_nearest(&self) -> Option<&Obstacle> {
        self.active
            .iter()
            .map(|&idx| &self.obstacles[idx])
            .max_by(|a, b| a.z.total_cmp(&b.z))
    }

    /// Nearest active obstacle that has not yet passed `max_z`
    pub fn nearest_ahead(&self, max_z: f64) -> Option<&Obstacle> {
        self.active()
            .filter(|o| o.z <= max_z)
            .max_by(|a, b| a.z.total_cmp(&b.z))
    }

    /// Return every obstacle to the pool and forget the side-lane history
    pub fn reset(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.active = false;
            obstacle.lane = None;
        }
        self.active.clear();
        self.distance_traveled = 0.0;
        self.last_side_lane = None;
        self.stats = PoolStats::default();
    }

    /// All records, active or not
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Active records in spawn order
    pub fn active(&self) -> impl Iterator<Item = &Obstacle> {
        self.active.iter().map(|&idx| &self.obstacles[idx])
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_count_of(&self, kind: ObstacleKind) -> usize {
        self.active().filter(|o| o.kind == kind).count()
    }

    pub fn capacity(&self) -> PoolCapacity {
        self.capacity
    }

    pub fn allowed(&self) -> &[ObstacleKind] {
        &self.allowed
    }

    pub fn spawn_interval(&self) -> f64 {
        self.spawn_interval
    }

    pub fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn side_only(capacity: usize) -> ObstaclePool {
        let mut pool = ObstaclePool::new(PoolCapacity {
            jump: 3,
            duck: 3,
            side: capacity,
        });
        pool.configure(&[ObstacleKind::Side], 20.0);
        pool
    }

    #[test]
    fn test_side_pool_exhaustion() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pool = side_only(3);

        for _ in 0..3 {
            assert!(matches!(pool.try_spawn(&mut rng), SpawnOutcome::Spawned { .. }));
        }
        assert_eq!(pool.active_count(), 3);

        let outcome = pool.try_spawn(&mut rng);
        assert_eq!(outcome, SpawnOutcome::Exhausted { kind: ObstacleKind::Side });
        assert_eq!(pool.active_count(), 3);
        assert_eq!(pool.stats().exhausted, 1);
    }

    #[test]
    fn test_spawn_cadence_discards_excess() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        pool.configure(&[ObstacleKind::Jump], 20.0);

        for _ in 0..66 {
            let report = pool.tick(0.3, &mut rng);
            assert!(report.spawn.is_none());
        }
        assert_eq!(pool.stats().spawn_attempts, 0);

        let report = pool.tick(0.3, &mut rng);
        assert!(report.spawn.is_some());
        assert_eq!(pool.stats().spawn_attempts, 1);
        assert_eq!(pool.distance_traveled(), 0.0);
    }

    #[test]
    fn test_empty_allowed_falls_back_to_jump() {
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        pool.configure(&[], 10.0);
        assert_eq!(pool.allowed(), &[ObstacleKind::Jump]);
    }

    #[test]
    fn test_despawn_returns_to_pool() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = ObstaclePool::new(PoolCapacity::default()).with_depths(-2.0, 0.5);
        pool.configure(&[ObstacleKind::Duck], 1000.0);
        let SpawnOutcome::Spawned { id, .. } = pool.try_spawn(&mut rng) else {
            panic!("spawn should succeed");
        };

        let first = pool.tick(1.0, &mut rng);
        assert!(first.despawned.is_empty());
        let second = pool.tick(1.0, &mut rng);
        assert!(second.despawned.is_empty());
        let third = pool.tick(1.0, &mut rng);
        assert_eq!(third.despawned, vec![id]);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.obstacles().iter().all(|o| !o.active));
    }

    #[test]
    fn test_peek_nearest() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        pool.configure(&[ObstacleKind::Jump], 1000.0);
        assert!(pool.peek_nearest().is_none());

        pool.try_spawn(&mut rng);
        pool.tick(10.0, &mut rng);
        pool.try_spawn(&mut rng);

        let nearest = pool.peek_nearest().map(|o| o.z);
        assert_eq!(nearest, Some(SPAWN_Z + 10.0));
    }

    #[test]
    fn test_nearest_ahead_skips_passed() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        pool.configure(&[ObstacleKind::Duck], 1000.0);
        pool.try_spawn(&mut rng);
        pool.tick(52.0, &mut rng);
        pool.try_spawn(&mut rng);

        assert_eq!(pool.peek_nearest().map(|o| o.z), Some(SPAWN_Z + 52.0));
        assert_eq!(pool.nearest_ahead(1.5).map(|o| o.z), Some(SPAWN_Z));
        assert!(pool.nearest_ahead(SPAWN_Z - 1.0).is_none());
    }

    #[test]
    fn test_reset_forgets_side_history() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut pool = side_only(4);
        pool.try_spawn(&mut rng);
        pool.reset();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.distance_traveled(), 0.0);
        assert_eq!(pool.stats(), PoolStats::default());
        assert!(pool.obstacles().iter().all(|o| o.lane.is_none()));
    }

    proptest! {
        #[test]
        fn prop_pool_conservation_and_typing(
            seed in any::<u64>(),
            speed in 0.1f64..3.0,
            interval in 1.0f64..40.0,
            mask in 1u8..8,
            ticks in 1usize..600,
        ) {
            let allowed: Vec<ObstacleKind> = ObstacleKind::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, k)| *k)
                .collect();
            let mut rng = Pcg32::seed_from_u64(seed);
            let capacity = PoolCapacity::default();
            let mut pool = ObstaclePool::new(capacity);
            pool.configure(&allowed, interval);
            let total = pool.obstacles().len();

            for _ in 0..ticks {
                let before: Vec<(u32, f64)> = pool.active().map(|o| (o.id, o.z)).collect();
                let report = pool.tick(speed, &mut rng);

                if let Some(SpawnOutcome::Spawned { kind, .. }) = report.spawn {
                    prop_assert!(allowed.contains(&kind));
                }
                for kind in ObstacleKind::ALL {
                    prop_assert!(pool.active_count_of(kind) <= capacity.for_kind(kind));
                }
                prop_assert_eq!(pool.obstacles().len(), total);
                let flagged = pool.obstacles().iter().filter(|o| o.active).count();
                prop_assert_eq!(flagged, pool.active_count());

                // Survivors moved forward by exactly `speed`
                for (id, z) in before {
                    if let Some(o) = pool.active().find(|o| o.id == id) {
                        prop_assert!((o.z - (z + speed)).abs() < 1e-9);
                    } else {
                        prop_assert!(report.despawned.contains(&id));
                    }
                }
            }
        }

        #[test]
        fn prop_side_lanes_alternate(seed in any::<u64>(), attempts in 2usize..50) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pool = ObstaclePool::new(PoolCapacity::default());
            pool.configure(&[ObstacleKind::Jump, ObstacleKind::Side], 1.0e9);

            let mut previous: Option<Lane> = None;
            for _ in 0..attempts {
                if let SpawnOutcome::Spawned { lane: Some(lane), .. } = pool.try_spawn(&mut rng) {
                    if let Some(prev) = previous {
                        prop_assert_ne!(prev, lane);
                    }
                    previous = Some(lane);
                }
                // Keep records free so spawns keep succeeding
                pool.tick(100.0, &mut rng);
            }
        }
    }
}
