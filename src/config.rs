use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// A word counts as matched when its similarity is strictly above this.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    #[serde(default = "default_fluency_factor")]
    pub fluency_factor: f64,
    #[serde(default = "default_accuracy_weight")]
    pub accuracy_weight: f64,
    #[serde(default = "default_fluency_weight")]
    pub fluency_weight: f64,
    #[serde(default = "default_completeness_weight")]
    pub completeness_weight: f64,
    /// Characters removed from text before tokenizing.
    #[serde(default = "default_punctuation")]
    pub punctuation: String,
    /// Error rate used when a transcript has to be simulated from the reference text.
    #[serde(default = "default_simulated_error_rate")]
    pub simulated_error_rate: f64,
}

impl ScoringConfig {
    pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;
    pub const DEFAULT_FLUENCY_FACTOR: f64 = 0.8;
    pub const DEFAULT_ACCURACY_WEIGHT: f64 = 0.6;
    pub const DEFAULT_FLUENCY_WEIGHT: f64 = 0.2;
    pub const DEFAULT_COMPLETENESS_WEIGHT: f64 = 0.2;
    pub const DEFAULT_PUNCTUATION: &'static str = ".,/#!$%^&*;:{}=-_`~()";
    pub const DEFAULT_SIMULATED_ERROR_RATE: f64 = 0.2;

    pub fn load(path: &Path) -> Result<Self, AssessmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AssessmentError::io("read scoring config", e))?;
        serde_json::from_str(&data).map_err(|e| AssessmentError::json("parse scoring config", e))
    }

    pub fn validate(&self) -> Result<(), AssessmentError> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(AssessmentError::invalid_input(format!(
                "match_threshold must be within [0, 1], got {}",
                self.match_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.simulated_error_rate) {
            return Err(AssessmentError::invalid_input(format!(
                "simulated_error_rate must be within [0, 1], got {}",
                self.simulated_error_rate
            )));
        }
        for (name, value) in [
            ("fluency_factor", self.fluency_factor),
            ("accuracy_weight", self.accuracy_weight),
            ("fluency_weight", self.fluency_weight),
            ("completeness_weight", self.completeness_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AssessmentError::invalid_input(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        let weight_sum = self.accuracy_weight + self.fluency_weight + self.completeness_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(AssessmentError::invalid_input(format!(
                "score weights must sum to 1, got {weight_sum}"
            )));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_threshold: Self::DEFAULT_MATCH_THRESHOLD,
            fluency_factor: Self::DEFAULT_FLUENCY_FACTOR,
            accuracy_weight: Self::DEFAULT_ACCURACY_WEIGHT,
            fluency_weight: Self::DEFAULT_FLUENCY_WEIGHT,
            completeness_weight: Self::DEFAULT_COMPLETENESS_WEIGHT,
            punctuation: Self::DEFAULT_PUNCTUATION.to_string(),
            simulated_error_rate: Self::DEFAULT_SIMULATED_ERROR_RATE,
        }
    }
}

fn default_match_threshold() -> f64 {
    ScoringConfig::DEFAULT_MATCH_THRESHOLD
}
fn default_fluency_factor() -> f64 {
    ScoringConfig::DEFAULT_FLUENCY_FACTOR
}
fn default_accuracy_weight() -> f64 {
    ScoringConfig::DEFAULT_ACCURACY_WEIGHT
}
fn default_fluency_weight() -> f64 {
    ScoringConfig::DEFAULT_FLUENCY_WEIGHT
}
fn default_completeness_weight() -> f64 {
    ScoringConfig::DEFAULT_COMPLETENESS_WEIGHT
}
fn default_punctuation() -> String {
    ScoringConfig::DEFAULT_PUNCTUATION.to_string()
}
fn default_simulated_error_rate() -> f64 {
    ScoringConfig::DEFAULT_SIMULATED_ERROR_RATE
}
