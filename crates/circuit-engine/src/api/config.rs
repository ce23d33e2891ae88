use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::question::Question;
use crate::error::ConfigError;

/// Everything needed to set up a round, provided by the game variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundConfig {
    /// One wire per question.
    pub questions: Vec<Question>,
    /// Countdown length in seconds (default: 300).
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: u32,
    /// Wrong connections allowed before the round fails (default: 3).
    #[serde(default = "default_lives")]
    pub lives_total: u32,
    /// Pointer-down grab radius around a plug (default: 30).
    #[serde(default = "default_plug_radius")]
    pub plug_radius: f32,
    /// Drop radius around a socket without reported bounds (default: 40).
    #[serde(default = "default_socket_radius")]
    pub socket_radius: f32,
}

fn default_time_limit() -> u32 {
    300
}

fn default_lives() -> u32 {
    3
}

fn default_plug_radius() -> f32 {
    30.0
}

fn default_socket_radius() -> f32 {
    40.0
}

impl RoundConfig {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            time_limit_seconds: default_time_limit(),
            lives_total: default_lives(),
            plug_radius: default_plug_radius(),
            socket_radius: default_socket_radius(),
        }
    }

    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit_seconds = seconds;
        self
    }

    pub fn with_lives(mut self, lives: u32) -> Self {
        self.lives_total = lives;
        self
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        let mut seen = HashSet::with_capacity(self.questions.len());
        for q in &self.questions {
            if !seen.insert(q.id) {
                return Err(ConfigError::DuplicateWire(q.id));
            }
            if q.answer.trim().is_empty() {
                return Err(ConfigError::EmptyAnswer(q.id));
            }
        }
        if self.lives_total == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.time_limit_seconds == 0 {
            return Err(ConfigError::NoTime);
        }
        Ok(())
    }
}
