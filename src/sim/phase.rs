//! Phase (level) scheduler
//!
//! Phases run back to back on one cumulative game clock: phase `i` ends once
//! the clock reaches the summed durations of phases `1..=i`.

use serde::{Deserialize, Serialize};

use super::obstacle::{ObstacleKind, ObstaclePool};
use crate::format_clock;

/// One level of the workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// 1-based level number
    pub index: u32,
    pub name: String,
    pub speed: f64,
    pub spawn_interval: f64,
    pub allowed: Vec<ObstacleKind>,
    pub duration_secs: f64,
}

impl Phase {
    /// Used when a session is configured without any phases
    pub fn fallback() -> Self {
        Self {
            index: 1,
            name: "WARM UP".to_string(),
            speed: 0.25,
            spawn_interval: 90.0,
            allowed: vec![ObstacleKind::Jump],
            duration_secs: 240.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    /// Clock is advancing through the current phase
    Running,
    /// Current phase finished; waiting for `start_phase` of the next one
    AwaitingTransition,
    /// Last phase finished
    Complete,
}

/// Raised once when the current phase's time is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSignal {
    pub index: u32,
    pub is_last: bool,
}

#[derive(Debug, Clone)]
pub struct PhaseScheduler {
    phases: Vec<Phase>,
    /// 0-based position in `phases`
    current: usize,
    game_time: f64,
    state: SchedulerState,
}

/// Replace a non-positive or non-finite value with `fallback`
fn repair(index: u32, field: &str, value: &mut f64, fallback: f64) {
    if !value.is_finite() || *value <= 0.0 {
        log::warn!("Phase {} has invalid {} {}, using {}", index, field, value, fallback);
        *value = fallback;
    }
}

impl PhaseScheduler {
    pub fn new(phases: Vec<Phase>) -> Self {
        let mut phases = phases;
        if phases.is_empty() {
            log::warn!("Empty phase table, using a single default phase");
            phases.push(Phase::fallback());
        }
        let fallback = Phase::fallback();
        for (i, phase) in phases.iter_mut().enumerate() {
            phase.index = i as u32 + 1;
            if phase.allowed.is_empty() {
                log::warn!("Phase {} allows no obstacles, falling back to jump", phase.index);
                phase.allowed.push(ObstacleKind::Jump);
            }
            repair(phase.index, "duration", &mut phase.duration_secs, fallback.duration_secs);
            repair(phase.index, "speed", &mut phase.speed, fallback.speed);
            repair(phase.index, "spawn interval", &mut phase.spawn_interval, fallback.spawn_interval);
        }

        Self {
            phases,
            current: 0,
            game_time: 0.0,
            state: SchedulerState::Running,
        }
    }

    /// Enter 1-based phase `index` and push its spawn settings into the pool
    pub fn start_phase(&mut self, index: u32, pool: &mut ObstaclePool) -> &Phase {
        let clamped = index.clamp(1, self.total_phases());
        if clamped != index {
            log::warn!("Phase {} out of range, starting phase {}", index, clamped);
        }
        self.current = clamped as usize - 1;
        self.state = SchedulerState::Running;
        // Skipping ahead moves the clock to the phase's start
        self.game_time = self.game_time.max(self.phase_start());

        let phase = &self.phases[self.current];
        pool.configure(&phase.allowed, phase.spawn_interval);
        log::info!(
            "Phase {}/{} '{}' started: speed={}, interval={}",
            phase.index,
            self.phases.len(),
            phase.name,
            phase.speed,
            phase.spawn_interval
        );
        phase
    }

    /// Advance the clock; returns a signal exactly once per phase end
    pub fn tick(&mut self, dt: f64) -> Option<PhaseSignal> {
        if self.state != SchedulerState::Running {
            return None;
        }
        self.game_time += dt;

        if self.game_time < self.phase_end() {
            return None;
        }

        let index = self.current().index;
        let is_last = self.current + 1 >= self.phases.len();
        self.state = if is_last {
            SchedulerState::Complete
        } else {
            SchedulerState::AwaitingTransition
        };
        log::info!("Phase {} complete (last: {})", index, is_last);
        Some(PhaseSignal { index, is_last })
    }

    /// Clock time at which the current phase began
    fn phase_start(&self) -> f64 {
        self.phases[..self.current]
            .iter()
            .map(|p| p.duration_secs)
            .sum()
    }

    fn phase_end(&self) -> f64 {
        self.phase_start() + self.current().duration_secs
    }

    /// Fraction of the current phase elapsed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        let in_phase = self.game_time - self.phase_start();
        (in_phase / self.current().duration_secs).clamp(0.0, 1.0)
    }

    pub fn time_remaining(&self) -> f64 {
        (self.phase_end() - self.game_time).max(0.0)
    }

    /// HUD label, e.g. `PHASE 2/4 - LIGHT CARDIO (3:12)`
    pub fn label(&self) -> String {
        format!(
            "PHASE {}/{} - {} ({})",
            self.current().index,
            self.total_phases(),
            self.current().name,
            format_clock(self.time_remaining())
        )
    }

    pub fn current(&self) -> &Phase {
        &self.phases[self.current]
    }

    /// Phase by 1-based index
    pub fn phase(&self, index: u32) -> Option<&Phase> {
        index
            .checked_sub(1)
            .and_then(|i| self.phases.get(i as usize))
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn speed(&self) -> f64 {
        self.current().speed
    }

    pub fn total_phases(&self) -> u32 {
        self.phases.len() as u32
    }

    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.game_time = 0.0;
        self.state = SchedulerState::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::PoolCapacity;

    fn phases(n: u32, duration: f64) -> Vec<Phase> {
        (1..=n)
            .map(|i| Phase {
                index: i,
                name: format!("P{}", i),
                speed: 0.2 + i as f64 * 0.05,
                spawn_interval: 50.0,
                allowed: vec![ObstacleKind::Jump, ObstacleKind::Side],
                duration_secs: duration,
            })
            .collect()
    }

    #[test]
    fn test_signals_once_at_boundary() {
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        let mut scheduler = PhaseScheduler::new(phases(2, 10.0));
        scheduler.start_phase(1, &mut pool);

        let mut signals = Vec::new();
        for _ in 0..9 {
            if let Some(s) = scheduler.tick(1.0) {
                signals.push(s);
            }
        }
        assert!(signals.is_empty());

        signals.extend(scheduler.tick(1.0));
        assert_eq!(signals, vec![PhaseSignal { index: 1, is_last: false }]);
        assert_eq!(scheduler.state(), SchedulerState::AwaitingTransition);

        // No repeat while waiting for the transition
        assert!(scheduler.tick(5.0).is_none());
        assert_eq!(scheduler.game_time(), 10.0);
    }

    #[test]
    fn test_phase_two_ends_at_cumulative_time() {
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        let mut scheduler = PhaseScheduler::new(phases(2, 10.0));
        scheduler.start_phase(1, &mut pool);
        for _ in 0..10 {
            scheduler.tick(1.0);
        }
        scheduler.start_phase(2, &mut pool);
        assert_eq!(scheduler.progress(), 0.0);
        assert_eq!(scheduler.time_remaining(), 10.0);
        assert_eq!(pool.spawn_interval(), 50.0);
        assert_eq!(pool.allowed(), &[ObstacleKind::Jump, ObstacleKind::Side]);

        for _ in 0..5 {
            assert!(scheduler.tick(1.0).is_none());
        }
        assert!((scheduler.progress() - 0.5).abs() < 1e-9);
        assert_eq!(scheduler.label(), "PHASE 2/2 - P2 (0:05)");

        for _ in 0..4 {
            assert!(scheduler.tick(1.0).is_none());
        }
        let signal = scheduler.tick(1.0);
        assert_eq!(signal, Some(PhaseSignal { index: 2, is_last: true }));
        assert_eq!(scheduler.state(), SchedulerState::Complete);
        assert_eq!(scheduler.progress(), 1.0);
        assert_eq!(scheduler.time_remaining(), 0.0);
    }

    #[test]
    fn test_empty_table_falls_back() {
        let scheduler = PhaseScheduler::new(Vec::new());
        assert_eq!(scheduler.total_phases(), 1);
        assert_eq!(scheduler.current().allowed, vec![ObstacleKind::Jump]);
    }

    #[test]
    fn test_invalid_phase_entries_are_repaired() {
        let mut table = phases(3, -1.0);
        table[0].allowed.clear();
        table[1].spawn_interval = f64::NAN;
        table[1].duration_secs = f64::INFINITY;
        table[2].speed = 0.0;
        table[2].duration_secs = 30.0;
        let scheduler = PhaseScheduler::new(table);
        let fallback = Phase::fallback();

        let phases = scheduler.phases();
        assert_eq!(phases[0].allowed, vec![ObstacleKind::Jump]);
        assert_eq!(phases[0].duration_secs, fallback.duration_secs);
        assert_eq!(phases[1].spawn_interval, fallback.spawn_interval);
        assert_eq!(phases[1].duration_secs, fallback.duration_secs);
        assert_eq!(phases[2].speed, fallback.speed);
        assert_eq!(phases[2].duration_secs, 30.0);
        // Untouched fields survive
        assert!((phases[0].speed - 0.25).abs() < 1e-12);
        assert_eq!(phases[2].spawn_interval, 50.0);
    }

    #[test]
    fn test_speed_constant_within_phase() {
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        let mut scheduler = PhaseScheduler::new(phases(3, 10.0));
        scheduler.start_phase(1, &mut pool);
        let speed = scheduler.speed();
        for _ in 0..9 {
            scheduler.tick(1.0);
            assert_eq!(scheduler.speed(), speed);
        }
    }

    #[test]
    fn test_single_phase_session() {
        let mut pool = ObstaclePool::new(PoolCapacity::default());
        let mut scheduler = PhaseScheduler::new(phases(1, 2.0));
        scheduler.start_phase(1, &mut pool);
        assert!(scheduler.tick(1.5).is_none());
        assert_eq!(
            scheduler.tick(1.0),
            Some(PhaseSignal { index: 1, is_last: true })
        );
    }
}
