use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::ScoringConfig;
use crate::error::AssessmentError;
use crate::pipeline::traits::{TextTokenizer, TranscriptSimulator, WordAligner};
use crate::scoring::alignment::{align_words, AlignmentSummary};
use crate::scoring::normalization::tokenize_with;
use crate::scoring::simulation::simulate_transcript_errors;
use crate::types::Token;

pub struct PunctuationStrippingTokenizer {
    punctuation: String,
}

impl PunctuationStrippingTokenizer {
    pub fn new(punctuation: impl Into<String>) -> Self {
        Self {
            punctuation: punctuation.into(),
        }
    }
}

impl Default for PunctuationStrippingTokenizer {
    fn default() -> Self {
        Self::new(ScoringConfig::DEFAULT_PUNCTUATION)
    }
}

impl TextTokenizer for PunctuationStrippingTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        tokenize_with(text, &self.punctuation)
    }
}

pub struct PositionalWordAligner {
    match_threshold: f64,
}

impl PositionalWordAligner {
    pub fn new(match_threshold: f64) -> Self {
        Self { match_threshold }
    }
}

impl Default for PositionalWordAligner {
    fn default() -> Self {
        Self::new(ScoringConfig::DEFAULT_MATCH_THRESHOLD)
    }
}

impl WordAligner for PositionalWordAligner {
    fn align(&self, reference: &[Token], transcript: &[Token]) -> AlignmentSummary {
        align_words(reference, transcript, self.match_threshold)
    }
}

/// Simulator backed by a seedable generator shared behind a mutex, so the
/// scorer can stay `&self` while draws remain reproducible for a given seed.
pub struct SeededTranscriptSimulator {
    rng: Mutex<StdRng>,
}

impl SeededTranscriptSimulator {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl TranscriptSimulator for SeededTranscriptSimulator {
    fn simulate(&self, text: &str, error_rate: f64) -> Result<String, AssessmentError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        simulate_transcript_errors(text, error_rate, &mut *rng)
    }
}
