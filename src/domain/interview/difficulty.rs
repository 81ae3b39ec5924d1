//! Difficulty tiers and the adaptation rule.
//!
//! A deterministic hysteresis over recent performance, not a learned
//! policy: the same history always produces the same tier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// One tier harder, capped at Hard.
    pub fn step_up(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// One tier easier, floored at Easy.
    pub fn step_down(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty tier: {}", other)),
        }
    }
}

/// Decides the next question's tier from rolling performance.
#[derive(Debug, Clone, Copy)]
pub struct DifficultyAdapter {
    /// Trailing mean at or above this steps the tier up.
    pub step_up_threshold: f64,
    /// Trailing mean below this steps the tier down.
    pub step_down_threshold: f64,
    /// How many recent scores the trailing mean covers.
    pub window: usize,
}

impl Default for DifficultyAdapter {
    fn default() -> Self {
        Self {
            step_up_threshold: 7.0,
            step_down_threshold: 4.0,
            window: 3,
        }
    }
}

impl DifficultyAdapter {
    pub fn new(step_up_threshold: f64, step_down_threshold: f64, window: usize) -> Self {
        Self {
            step_up_threshold,
            step_down_threshold,
            window: window.max(1),
        }
    }

    /// Picks the next tier from the score history and the current tier.
    pub fn next_tier(&self, history: &[f64], current: Difficulty) -> Difficulty {
        if history.is_empty() {
            return current;
        }

        let start = history.len().saturating_sub(self.window);
        let recent = &history[start..];
        let mean = recent.iter().sum::<f64>() / recent.len() as f64;

        if mean >= self.step_up_threshold {
            current.step_up()
        } else if mean < self.step_down_threshold {
            current.step_down()
        } else {
            current
        }
    }
}
