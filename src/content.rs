//! Content tables injected into the transition choreography
//!
//! The core never generates text; it only selects ids and strings from
//! these tables. Tables are validated once when loaded.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A visual scenario the presentation layer knows how to build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    /// Enclosed track (side walls visible)
    #[serde(default)]
    pub has_walls: bool,
}

impl Scenario {
    fn new(id: &str, name: &str, has_walls: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            has_walls,
        }
    }
}

/// A rotating set of call-to-action prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaCategory {
    pub id: String,
    pub prompts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTables {
    pub rest_phrases: Vec<String>,
    pub hype_phrases: Vec<String>,
    pub scenarios: Vec<Scenario>,
    pub cta_categories: Vec<CtaCategory>,
    /// Category id per transition: entry 0 is shown entering level 2, and so on
    pub cta_schedule: Vec<String>,
    /// Closing lines after the end-of-session call-to-action sections
    #[serde(default = "default_outro_lines")]
    pub outro_lines: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_outro_lines() -> Vec<String> {
    strings(&["READY FOR THE NEXT ONE?", "WATCH THE NEXT WORKOUT"])
}

impl Default for ContentTables {
    fn default() -> Self {
        Self {
            rest_phrases: strings(&[
                "TAKE A DEEP BREATH...",
                "REST & RECOVER",
                "BREATHE IN... BREATHE OUT...",
                "HYDRATE & PREPARE",
                "CATCH YOUR BREATH",
                "RECOVERY TIME",
                "RELAX YOUR MUSCLES",
                "SHAKE IT OFF",
                "PREPARE FOR NEXT LEVEL",
                "RESET YOUR MIND",
                "INHALE... EXHALE...",
                "RECHARGE YOUR ENERGY",
                "QUICK BREATHER",
                "CALM YOUR HEART RATE",
                "GET READY AGAIN",
            ]),
            hype_phrases: strings(&[
                "YOU'RE DOING AMAZING!",
                "KEEP IT UP!",
                "YOU GOT THIS!",
                "STAY STRONG!",
                "NEVER GIVE UP!",
                "ALMOST THERE!",
                "FEEL THE ENERGY!",
                "UNLEASH YOUR POWER!",
                "FULL POWER!",
                "MAXIMUM EFFORT!",
                "FEEL THE BURN!",
                "TURBO MODE!",
                "PUSH YOUR LIMITS!",
                "TIME TO LEVEL UP!",
                "NO LIMITS!",
                "DIG DEEPER!",
                "LEGENDARY!",
                "UNSTOPPABLE!",
                "ON FIRE!",
                "CRUSHING IT!",
                "FIND YOUR RHYTHM!",
                "STAY IN THE ZONE!",
                "FEEL THE BEAT!",
                "KEEP THE PACE!",
                "MIND OVER MATTER!",
                "MAKE IT COUNT!",
                "EVERY REP MATTERS!",
                "BEAST MODE ON!",
                "NO EXCUSES!",
                "OWN THIS MOMENT!",
                "MAKE YOURSELF PROUD!",
                "GREATNESS AWAITS!",
                "SWEAT IS SUCCESS!",
                "PAIN IS TEMPORARY!",
                "NEXT LEVEL!",
                "TOP TIER!",
                "LET'S GOOO!",
                "BOOM!",
                "EPIC!",
                "GODLIKE!",
            ]),
            scenarios: vec![
                Scenario::new("city", "City Run", false),
                Scenario::new("rooftop", "Rooftop Run", false),
                Scenario::new("winter", "Winter Wonderland", false),
                Scenario::new("beach", "Beach Run", false),
                Scenario::new("tunnel", "Tunnel Run", true),
                Scenario::new("neon", "Neon City", true),
                Scenario::new("jungle", "Jungle Path", false),
                Scenario::new("space", "Space Station", true),
                Scenario::new("sunset", "Sunset Highway", false),
                Scenario::new("crystal", "Crystal Cave", true),
            ],
            cta_categories: vec![
                CtaCategory {
                    id: "subscribe".to_string(),
                    prompts: strings(&[
                        "SUBSCRIBE FOR A NEW WORKOUT EVERY WEEK",
                        "JOIN THE CREW - HIT SUBSCRIBE",
                        "DON'T MISS THE NEXT RUN - SUBSCRIBE",
                    ]),
                },
                CtaCategory {
                    id: "like".to_string(),
                    prompts: strings(&[
                        "FEELING THE BURN? LEAVE A LIKE",
                        "SMASH THAT LIKE BUTTON",
                        "A LIKE KEEPS THE WORKOUTS COMING",
                    ]),
                },
                CtaCategory {
                    id: "comment".to_string(),
                    prompts: strings(&[
                        "COMMENT YOUR CALORIE COUNT",
                        "TELL US YOUR FAVOURITE LEVEL",
                        "DROP A COMMENT WHEN YOU FINISH",
                    ]),
                },
            ],
            cta_schedule: strings(&["subscribe", "like", "comment"]),
            outro_lines: default_outro_lines(),
        }
    }
}

impl ContentTables {
    /// Parse and validate tables from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tables: ContentTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Read tables from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every table non-empty and every scheduled category defined
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rest_phrases.is_empty() {
            return Err(ConfigError::EmptyTable { table: "rest_phrases" });
        }
        if self.hype_phrases.is_empty() {
            return Err(ConfigError::EmptyTable { table: "hype_phrases" });
        }
        if self.scenarios.is_empty() {
            return Err(ConfigError::EmptyTable { table: "scenarios" });
        }
        if let Some(empty) = self.cta_categories.iter().find(|c| c.prompts.is_empty()) {
            log::warn!("Call-to-action category '{}' has no prompts", empty.id);
            return Err(ConfigError::EmptyTable { table: "cta_categories.prompts" });
        }
        for id in &self.cta_schedule {
            if self.category_index(id).is_none() {
                return Err(ConfigError::UnknownCategory { id: id.clone() });
            }
        }
        Ok(())
    }

    pub fn category_index(&self, id: &str) -> Option<usize> {
        self.cta_categories.iter().position(|c| c.id == id)
    }

    /// Category position by id, falling back to the first entry
    pub fn category_index_or_first(&self, id: &str) -> usize {
        self.category_index(id).unwrap_or_else(|| {
            log::warn!("Unknown call-to-action category '{}', using the first", id);
            0
        })
    }

    /// Scenario position by id, falling back to the first entry
    pub fn scenario_index_or_first(&self, id: &str) -> usize {
        self.scenarios.iter().position(|s| s.id == id).unwrap_or_else(|| {
            log::warn!("Unknown scenario '{}', using the first entry", id);
            0
        })
    }
}
