//! Between-level choreography
//!
//! A `TransitionPlan` is an ordered list of fixed-duration stages whose
//! content is chosen when the plan is built. `TransitionSequencer` walks the
//! plan on the game tick: stages never overlap, are never skipped or
//! reordered, and the total run time is the sum of stage durations.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleKind;
use super::phase::Phase;
use super::score::ScoreStats;
use super::selector::SelectionBag;
use crate::content::{ContentTables, Scenario};
use crate::format_clock;
use crate::settings::{ScenarioMode, TransitionTimings};

/// History sizes of the phrase and scenario bags
pub const REST_HISTORY: usize = 5;
pub const HYPE_HISTORY: usize = 10;
pub const SCENARIO_HISTORY: usize = 4;
pub const CTA_HISTORY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageKind {
    /// Session opening lines
    Intro,
    Rest,
    Motivation,
    /// Upcoming level and its unlocked actions
    Preview,
    /// Call to action, scenario change and countdown
    CallToAction,
    /// End-of-session stats reveal
    Results,
    /// Closing lines after the session
    Outro,
}

/// Action icons shown in the level preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewAction {
    Run,
    Jump,
    Duck,
    Side,
}

impl From<ObstacleKind> for PreviewAction {
    fn from(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::Jump => PreviewAction::Jump,
            ObstacleKind::Duck => PreviewAction::Duck,
            ObstacleKind::Side => PreviewAction::Side,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageContent {
    None,
    Line(String),
    Phrase(String),
    Preview {
        level: u32,
        name: String,
        actions: Vec<PreviewAction>,
        fade_in_secs: f64,
    },
    CallToAction {
        category: Option<String>,
        prompt: Option<String>,
        scenario: String,
        countdown: u32,
    },
    /// Final stats shown after the last level
    Results { stats: ScoreStats },
    /// End-of-session call-to-action section
    Prompt {
        category: String,
        prompt: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub kind: StageKind,
    pub duration: f64,
    pub content: StageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPlan {
    /// Level that starts when the plan finishes; `None` ends the session
    pub next_level: Option<u32>,
    pub stages: Vec<Stage>,
}

impl TransitionPlan {
    pub fn total_duration(&self) -> f64 {
        self.stages.iter().map(|s| s.duration).sum()
    }
}

/// Output of the sequencer for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequencerEvent {
    StageEntered {
        index: usize,
        kind: StageKind,
        content: StageContent,
        duration: f64,
    },
    /// Countdown ring value; counts down to 1
    CountdownTick { remaining: u32 },
    ScenarioApplied { id: String },
    Finished { next_level: Option<u32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerStatus {
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub struct TransitionSequencer {
    plan: TransitionPlan,
    current: usize,
    elapsed_in_stage: f64,
    total_elapsed: f64,
    countdown_emitted: u32,
    started: bool,
    finished: bool,
}

impl TransitionSequencer {
    pub fn new(plan: TransitionPlan) -> Self {
        Self {
            plan,
            current: 0,
            elapsed_in_stage: 0.0,
            total_elapsed: 0.0,
            countdown_emitted: 0,
            started: false,
            finished: false,
        }
    }

    /// Advance stage timers by `dt`, carrying leftover time into the next stage
    pub fn advance(&mut self, dt: f64, out: &mut Vec<SequencerEvent>) -> SequencerStatus {
        if self.finished {
            return SequencerStatus::Finished;
        }
        if !self.started {
            self.started = true;
            self.enter_stage(out);
        }

        let mut remaining = dt.max(0.0);
        loop {
            let Some(duration) = self.plan.stages.get(self.current).map(|s| s.duration) else {
                break;
            };
            let left = (duration - self.elapsed_in_stage).max(0.0);
            if remaining < left {
                self.elapsed_in_stage += remaining;
                self.total_elapsed += remaining;
                self.emit_countdown(out);
                return SequencerStatus::Running;
            }

            remaining -= left;
            self.total_elapsed += left;
            self.elapsed_in_stage = duration;
            self.emit_countdown(out);

            self.current += 1;
            self.elapsed_in_stage = 0.0;
            self.enter_stage(out);
        }

        self.finished = true;
        log::debug!(
            "Transition to level {:?} finished after {:.2}s",
            self.plan.next_level,
            self.total_elapsed
        );
        out.push(SequencerEvent::Finished {
            next_level: self.plan.next_level,
        });
        SequencerStatus::Finished
    }

    fn enter_stage(&mut self, out: &mut Vec<SequencerEvent>) {
        self.countdown_emitted = 0;
        let Some(stage) = self.plan.stages.get(self.current) else {
            return;
        };
        log::debug!("Stage {} {:?} ({}s)", self.current, stage.kind, stage.duration);
        out.push(SequencerEvent::StageEntered {
            index: self.current,
            kind: stage.kind,
            content: stage.content.clone(),
            duration: stage.duration,
        });
        if let StageContent::CallToAction { scenario, .. } = &stage.content {
            out.push(SequencerEvent::ScenarioApplied {
                id: scenario.clone(),
            });
        }
        self.emit_countdown(out);
    }

    /// Fire every countdown tick whose start time has been reached
    fn emit_countdown(&mut self, out: &mut Vec<SequencerEvent>) {
        let Some(stage) = self.plan.stages.get(self.current) else {
            return;
        };
        let StageContent::CallToAction { countdown, .. } = stage.content else {
            return;
        };
        if countdown == 0 {
            return;
        }
        let tick_len = stage.duration / countdown as f64;
        while self.countdown_emitted < countdown
            && self.elapsed_in_stage >= self.countdown_emitted as f64 * tick_len
        {
            out.push(SequencerEvent::CountdownTick {
                remaining: countdown - self.countdown_emitted,
            });
            self.countdown_emitted += 1;
        }
    }

    pub fn plan(&self) -> &TransitionPlan {
        &self.plan
    }

    pub fn current_stage(&self) -> Option<&Stage> {
        self.plan.stages.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn elapsed_in_stage(&self) -> f64 {
        self.elapsed_in_stage
    }

    pub fn total_elapsed(&self) -> f64 {
        self.total_elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Scenario rotation
#[derive(Debug, Clone)]
enum ScenarioPicker {
    Random(SelectionBag<usize>),
    Fixed(usize),
}

/// Builds transition plans, keeping selection history across a session
#[derive(Debug, Clone)]
pub struct TransitionPlanner {
    timings: TransitionTimings,
    rest: SelectionBag<String>,
    hype: SelectionBag<String>,
    scenarios: Vec<Scenario>,
    picker: ScenarioPicker,
    categories: Vec<(String, SelectionBag<String>)>,
    /// Category index per transition (entering level 2, 3, ...)
    schedule: Vec<usize>,
    outro: Vec<String>,
}

impl TransitionPlanner {
    pub fn new(content: &ContentTables, mode: &ScenarioMode, timings: TransitionTimings) -> Self {
        let mut scenarios = content.scenarios.clone();
        if scenarios.is_empty() {
            log::warn!("No scenarios configured, using a placeholder");
            scenarios.push(Scenario {
                id: "default".to_string(),
                name: "Default".to_string(),
                has_walls: false,
            });
        }

        let picker = match mode {
            ScenarioMode::Random => {
                ScenarioPicker::Random(SelectionBag::new((0..scenarios.len()).collect(), SCENARIO_HISTORY))
            }
            ScenarioMode::Specific { id } => ScenarioPicker::Fixed(content.scenario_index_or_first(id)),
        };

        let categories: Vec<(String, SelectionBag<String>)> = content
            .cta_categories
            .iter()
            .map(|c| (c.id.clone(), SelectionBag::new(c.prompts.clone(), CTA_HISTORY)))
            .collect();

        let schedule = if categories.is_empty() {
            Vec::new()
        } else {
            content
                .cta_schedule
                .iter()
                .map(|id| content.category_index_or_first(id))
                .collect()
        };

        Self {
            timings,
            outro: content.outro_lines.clone(),
            rest: SelectionBag::new(content.rest_phrases.clone(), REST_HISTORY),
            hype: SelectionBag::new(content.hype_phrases.clone(), HYPE_HISTORY),
            scenarios,
            picker,
            categories,
            schedule,
        }
    }

    fn next_scenario(&mut self, rng: &mut impl Rng) -> String {
        let idx = match &mut self.picker {
            ScenarioPicker::Random(bag) => bag.draw(rng).copied().unwrap_or(0),
            ScenarioPicker::Fixed(idx) => *idx,
        };
        self.scenarios[idx].id.clone()
    }

    fn preview(&self, phase: &Phase) -> Stage {
        let mut actions = vec![PreviewAction::Run];
        actions.extend(phase.allowed.iter().map(|k| PreviewAction::from(*k)));
        Stage {
            kind: StageKind::Preview,
            duration: self.timings.preview_secs,
            content: StageContent::Preview {
                level: phase.index,
                name: phase.name.clone(),
                actions,
                fade_in_secs: self.timings.preview_secs.min(0.5),
            },
        }
    }

    fn call_to_action(&mut self, transition: Option<usize>, rng: &mut impl Rng) -> Stage {
        let category = transition.and_then(|t| self.schedule.get(t).copied());
        let (category, prompt) = match category {
            Some(idx) => {
                let (id, bag) = &mut self.categories[idx];
                (Some(id.clone()), bag.draw(rng).cloned())
            }
            None => (None, None),
        };

        Stage {
            kind: StageKind::CallToAction,
            duration: self.timings.countdown_secs(),
            content: StageContent::CallToAction {
                category,
                prompt,
                scenario: self.next_scenario(rng),
                countdown: self.timings.countdown_ticks,
            },
        }
    }

    fn phrase(bag: &mut SelectionBag<String>, rng: &mut impl Rng) -> StageContent {
        match bag.draw(rng) {
            Some(phrase) => StageContent::Phrase(phrase.clone()),
            None => StageContent::None,
        }
    }

    /// Plan the intermission before `next` (level 2 onward)
    pub fn plan_transition(&mut self, next: &Phase, rng: &mut impl Rng) -> TransitionPlan {
        let rest = Self::phrase(&mut self.rest, rng);
        let hype = Self::phrase(&mut self.hype, rng);
        let transition = (next.index as usize).checked_sub(2);

        let stages = vec![
            Stage {
                kind: StageKind::Rest,
                duration: self.timings.rest_secs,
                content: rest,
            },
            Stage {
                kind: StageKind::Motivation,
                duration: self.timings.motivation_secs,
                content: hype,
            },
            self.preview(next),
            self.call_to_action(transition, rng),
        ];

        TransitionPlan {
            next_level: Some(next.index),
            stages,
        }
    }

    /// Plan the opening sequence before level 1
    pub fn plan_intro(&mut self, phases: &[Phase], rng: &mut impl Rng) -> TransitionPlan {
        let line = |text: String| Stage {
            kind: StageKind::Intro,
            duration: self.timings.intro_line_secs,
            content: StageContent::Line(text),
        };

        let each = phases.first().map(|p| p.duration_secs).unwrap_or(0.0);
        let mut stages = vec![
            line("GET READY FOR YOUR WORKOUT!".to_string()),
            line(format!("{} LEVELS • {} EACH", phases.len(), format_clock(each))),
        ];
        for phase in phases {
            stages.push(line(format!(
                "LEVEL {}: {} ({})",
                phase.index,
                phase.name,
                format_clock(phase.duration_secs)
            )));
        }
        stages.push(line("LET'S GO!".to_string()));

        let first = phases.first().cloned().unwrap_or_else(Phase::fallback);
        stages.push(self.preview(&first));
        stages.push(self.call_to_action(None, rng));

        TransitionPlan {
            next_level: Some(first.index),
            stages,
        }
    }

    /// Plan the closing sequence after the last level: stats, one section
    /// per call-to-action category, then the outro lines
    pub fn plan_completion(&mut self, stats: ScoreStats, rng: &mut impl Rng) -> TransitionPlan {
        let mut stages = vec![Stage {
            kind: StageKind::Results,
            duration: self.timings.results_secs,
            content: StageContent::Results { stats },
        }];
        for (id, bag) in &mut self.categories {
            stages.push(Stage {
                kind: StageKind::CallToAction,
                duration: self.timings.cta_section_secs,
                content: StageContent::Prompt {
                    category: id.clone(),
                    prompt: bag.draw(rng).cloned(),
                },
            });
        }
        for text in &self.outro {
            stages.push(Stage {
                kind: StageKind::Outro,
                duration: self.timings.outro_line_secs,
                content: StageContent::Line(text.clone()),
            });
        }

        TransitionPlan {
            next_level: None,
            stages,
        }
    }

    /// Forget all selection history
    pub fn reset(&mut self) {
        self.rest.clear_history();
        self.hype.clear_history();
        if let ScenarioPicker::Random(bag) = &mut self.picker {
            bag.clear_history();
        }
        for (_, bag) in &mut self.categories {
            bag.clear_history();
        }
    }
}
