//! Session settings and preferences
//!
//! Loaded from a JSON file; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::advisor::AdvisoryWindow;
use crate::sim::obstacle::ObstacleKind;

/// How obstacle kinds unlock across levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActionMode {
    /// Jump first, then side steps, then ducking
    #[default]
    Progressive,
    /// Every kind from level 1
    All,
    /// Per-level lists from `Settings::custom_actions`
    Custom,
}

impl ActionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionMode::Progressive => "progressive",
            ActionMode::All => "all",
            ActionMode::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "progressive" => Some(ActionMode::Progressive),
            "all" => Some(ActionMode::All),
            "custom" => Some(ActionMode::Custom),
            _ => None,
        }
    }
}

/// Which scenario each level uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScenarioMode {
    /// Rotate without recent repeats
    #[default]
    Random,
    /// Always the given scenario id
    Specific { id: String },
}

/// Stage durations of the between-level choreography (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTimings {
    pub rest_secs: f64,
    pub motivation_secs: f64,
    pub preview_secs: f64,
    pub countdown_ticks: u32,
    pub countdown_tick_secs: f64,
    pub intro_line_secs: f64,
    /// Stats reveal after the last level
    pub results_secs: f64,
    /// Each end-of-session call-to-action section
    pub cta_section_secs: f64,
    /// Each closing line after the call-to-action sections
    pub outro_line_secs: f64,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            rest_secs: 5.0,
            motivation_secs: 5.0,
            preview_secs: 3.0,
            countdown_ticks: 5,
            countdown_tick_secs: 1.0,
            intro_line_secs: 1.2,
            results_secs: 5.0,
            cta_section_secs: 2.5,
            outro_line_secs: 1.8,
        }
    }
}

impl TransitionTimings {
    pub fn countdown_secs(&self) -> f64 {
        self.countdown_ticks as f64 * self.countdown_tick_secs
    }

    /// Reject negative or non-finite durations
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("rest_secs", self.rest_secs),
            ("motivation_secs", self.motivation_secs),
            ("preview_secs", self.preview_secs),
            ("countdown_tick_secs", self.countdown_tick_secs),
            ("intro_line_secs", self.intro_line_secs),
            ("results_secs", self.results_secs),
            ("cta_section_secs", self.cta_section_secs),
            ("outro_line_secs", self.outro_line_secs),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Length of every level (default 4 minutes)
    pub phase_duration_secs: f64,
    pub action_mode: ActionMode,
    /// Level 1 first; only read in `ActionMode::Custom`
    pub custom_actions: Vec<Vec<ObstacleKind>>,
    pub scenario_mode: ScenarioMode,
    /// RNG seed for reproducible sessions
    pub seed: u64,
    pub timings: TransitionTimings,
    pub advisory: AdvisoryWindow,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            phase_duration_secs: 240.0,
            action_mode: ActionMode::Progressive,
            custom_actions: Vec::new(),
            scenario_mode: ScenarioMode::Random,
            seed: 12345,
            timings: TransitionTimings::default(),
            advisory: AdvisoryWindow::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.phase_duration_secs > 0.0) || !self.phase_duration_secs.is_finite() {
            return Err(ConfigError::InvalidDuration {
                field: "phase_duration_secs",
                value: self.phase_duration_secs,
            });
        }
        self.timings.validate()
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_mode_from_str() {
        assert_eq!(ActionMode::from_str("ALL"), Some(ActionMode::All));
        assert_eq!(ActionMode::from_str("custom"), Some(ActionMode::Custom));
        assert_eq!(ActionMode::from_str("hard"), None);
        assert_eq!(ActionMode::Progressive.as_str(), "progressive");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(
            r#"{ "phase_duration_secs": 60.0, "scenario_mode": { "Specific": { "id": "neon" } } }"#,
        )
        .unwrap();
        assert_eq!(settings.phase_duration_secs, 60.0);
        assert_eq!(
            settings.scenario_mode,
            ScenarioMode::Specific { id: "neon".to_string() }
        );
        assert_eq!(settings.timings, TransitionTimings::default());
    }

    #[test]
    fn test_invalid_durations_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "phase_duration_secs": 0.0 }"#),
            Err(ConfigError::InvalidDuration { field: "phase_duration_secs", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "timings": { "rest_secs": -1.0 } }"#),
            Err(ConfigError::InvalidDuration { field: "rest_secs", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "timings": { "cta_section_secs": -2.5 } }"#),
            Err(ConfigError::InvalidDuration { field: "cta_section_secs", .. })
        ));
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let settings = Settings::load("/nonexistent/stride-rush/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_countdown_secs() {
        assert_eq!(TransitionTimings::default().countdown_secs(), 5.0);
    }
}
