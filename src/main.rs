//! Stride Rush headless runner
//!
//! Plays a full session on autopilot with a fixed-timestep loop and logs the
//! event stream. Usage: `stride-rush [settings.json] [content.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stride Rush (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => stride_rush::Settings::load(path),
        None => stride_rush::Settings::default(),
    };
    let content = match args.next() {
        Some(path) => match stride_rush::ContentTables::load(&path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to load content from {}: {}", path, e);
                stride_rush::ContentTables::default()
            }
        },
        None => stride_rush::ContentTables::default(),
    };

    headless::run(settings, &content);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by the host page
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use stride_rush::consts::{MAX_SUBSTEPS, SIM_DT};
    use stride_rush::sim::{
        GameEvent, GameState, SequencerEvent, SessionStatus, StageContent, TickInput, tick,
    };
    use stride_rush::{ContentTables, Settings};

    /// Simulated frame length; two ticks per frame on average
    const FRAME_DT: f64 = 1.0 / 30.0;

    struct Runner {
        state: GameState,
        accumulator: f64,
        input: TickInput,
        frames: u64,
    }

    impl Runner {
        fn new(settings: Settings, content: &ContentTables) -> Self {
            Self {
                state: GameState::new(settings, content),
                accumulator: 0.0,
                input: TickInput {
                    autopilot: true,
                    ..Default::default()
                },
                frames: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Commands are one-shot
                self.input.commands.clear();
            }
            self.frames += 1;

            for event in self.state.drain_events() {
                report(&event);
            }
        }
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::PhaseStarted { index, name, speed } => {
                println!("== LEVEL {}: {} (speed {:.2})", index, name, speed);
            }
            GameEvent::Transition(SequencerEvent::StageEntered { kind, content, .. }) => {
                match content {
                    StageContent::Line(text) | StageContent::Phrase(text) => {
                        println!("   [{:?}] {}", kind, text);
                    }
                    StageContent::Preview { level, name, actions, .. } => {
                        println!("   [{:?}] level {} {} {:?}", kind, level, name, actions);
                    }
                    StageContent::CallToAction { prompt, scenario, .. } => {
                        if let Some(prompt) = prompt {
                            println!("   [{:?}] {}", kind, prompt);
                        }
                        println!("   scenario: {}", scenario);
                    }
                    StageContent::Results { stats } => {
                        println!(
                            "   [{:?}] {} / {}",
                            kind,
                            stats.formatted_time(),
                            stats.formatted_calories()
                        );
                    }
                    StageContent::Prompt { category, prompt } => {
                        println!("   [{:?}] {}: {}", kind, category, prompt.as_deref().unwrap_or("-"));
                    }
                    StageContent::None => {}
                }
            }
            GameEvent::Collision { id, kind } => {
                println!("   hit {} obstacle #{}", kind.as_str(), id);
            }
            GameEvent::SessionComplete { stats } => {
                println!("== WORKOUT COMPLETE");
                println!("   time:     {}", stats.formatted_time());
                println!("   calories: {}", stats.formatted_calories());
                println!(
                    "   actions:  {} ({} jumps, {} ducks, {} side steps)",
                    stats.total_actions(),
                    stats.jumps,
                    stats.ducks,
                    stats.side_steps
                );
            }
            other => log::debug!("{:?}", other),
        }
    }

    pub fn run(settings: Settings, content: &ContentTables) {
        let mut runner = Runner::new(settings, content);
        runner.state.start();
        for event in runner.state.drain_events() {
            report(&event);
        }

        while runner.state.status() != SessionStatus::Complete {
            runner.update(FRAME_DT);
        }

        let hud = runner.state.hud();
        log::info!(
            "Finished after {} frames / {} ticks, {} collisions",
            runner.frames,
            runner.state.time_ticks,
            hud.collisions
        );
    }
}
