use serde::Serialize;

use crate::config::ScoringConfig;
use crate::error::AssessmentError;

const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateScores {
    pub accuracy: u32,
    pub fluency: u32,
    pub completeness: u32,
    pub pronunciation: u32,
}

/// Round half up. Inputs are non-negative, so this matches rounding half away from zero.
pub fn round_half_up(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value + 0.5).floor() as u32
}

/// Converts a ratio in [0, 1] to a whole percentage.
pub fn round_percent(ratio: f64) -> u32 {
    round_half_up(ratio * 100.0)
}

pub fn aggregate_scores(
    reference_len: usize,
    transcript_len: usize,
    match_count: usize,
    config: &ScoringConfig,
) -> Result<AggregateScores, AssessmentError> {
    if reference_len == 0 {
        return Err(AssessmentError::invalid_input(
            "reference text has no words to score against",
        ));
    }
    let reference_len = reference_len as f64;

    let completeness = round_percent(transcript_len as f64 / reference_len).min(MAX_SCORE);
    let accuracy = round_percent(match_count as f64 / reference_len).min(MAX_SCORE);
    let fluency = round_half_up(
        (completeness as f64 + accuracy as f64) / 2.0 * config.fluency_factor,
    )
    .min(MAX_SCORE);
    let pronunciation = round_half_up(
        accuracy as f64 * config.accuracy_weight
            + fluency as f64 * config.fluency_weight
            + completeness as f64 * config.completeness_weight,
    )
    .min(MAX_SCORE);

    Ok(AggregateScores {
        accuracy,
        fluency,
        completeness,
        pronunciation,
    })
}
