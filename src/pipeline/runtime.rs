use crate::config::ScoringConfig;
use crate::error::AssessmentError;
use crate::pipeline::traits::{TextTokenizer, TranscriptSimulator, WordAligner};
use crate::scoring::aggregate::aggregate_scores;
use crate::types::{AssessmentRequest, AssessmentResponse, AssessmentResult};

pub struct PronunciationScorer {
    config: ScoringConfig,
    tokenizer: Box<dyn TextTokenizer>,
    word_aligner: Box<dyn WordAligner>,
    simulator: Option<Box<dyn TranscriptSimulator>>,
}

pub(crate) struct PronunciationScorerParts {
    pub config: ScoringConfig,
    pub tokenizer: Box<dyn TextTokenizer>,
    pub word_aligner: Box<dyn WordAligner>,
    pub simulator: Option<Box<dyn TranscriptSimulator>>,
}

impl PronunciationScorer {
    pub(crate) fn from_parts(parts: PronunciationScorerParts) -> Self {
        Self {
            config: parts.config,
            tokenizer: parts.tokenizer,
            word_aligner: parts.word_aligner,
            simulator: parts.simulator,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn has_simulator(&self) -> bool {
        self.simulator.is_some()
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    /// Scores `transcript` against `reference_text`.
    ///
    /// Fails with `InvalidInput` when the reference has no words after
    /// normalization; an empty transcript is valid and scores zero.
    pub fn assess(
        &self,
        transcript: &str,
        reference_text: &str,
    ) -> Result<AssessmentResult, AssessmentError> {
        let reference_words = self.tokenizer.tokenize(reference_text);
        if reference_words.is_empty() {
            return Err(AssessmentError::invalid_input(
                "reference text contains no words",
            ));
        }
        let transcript_words = self.tokenizer.tokenize(transcript);

        let summary = self.word_aligner.align(&reference_words, &transcript_words);
        if summary.words.len() != reference_words.len() {
            return Err(AssessmentError::invalid_input(format!(
                "word aligner returned {} scores for {} reference words",
                summary.words.len(),
                reference_words.len()
            )));
        }

        if transcript_words.len() > reference_words.len() {
            tracing::warn!(
                reference_words = reference_words.len(),
                transcript_words = transcript_words.len(),
                "transcript longer than reference; completeness clamped"
            );
        }

        let scores = aggregate_scores(
            reference_words.len(),
            transcript_words.len(),
            summary.match_count,
            &self.config,
        )?;
        tracing::debug!(
            reference_words = reference_words.len(),
            transcript_words = transcript_words.len(),
            matched = summary.match_count,
            accuracy = scores.accuracy,
            fluency = scores.fluency,
            completeness = scores.completeness,
            pronunciation = scores.pronunciation,
            "pronunciation assessed"
        );

        Ok(AssessmentResult {
            accuracy: scores.accuracy,
            fluency: scores.fluency,
            completeness: scores.completeness,
            pronunciation: scores.pronunciation,
            words: summary.words,
        })
    }

    /// Resolves the transcript for a request and scores it.
    ///
    /// A recognized transcript wins. Audio without one falls back to a
    /// simulated transcript of the reference text, since speech recognition
    /// happens outside this crate.
    pub fn assess_request(
        &self,
        request: &AssessmentRequest,
    ) -> Result<AssessmentResponse, AssessmentError> {
        if request.reference_text.trim().is_empty() {
            return Err(AssessmentError::invalid_input("referenceText is required"));
        }

        let transcript = self.resolve_transcript(request)?;
        let result = self.assess(&transcript, &request.reference_text)?;
        Ok(AssessmentResponse { result, transcript })
    }

    fn resolve_transcript(&self, request: &AssessmentRequest) -> Result<String, AssessmentError> {
        if let Some(text) = request
            .recognized_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
        {
            return Ok(text.to_string());
        }

        let has_audio = request
            .audio_base64
            .as_deref()
            .is_some_and(|audio| !audio.is_empty());
        match (&self.simulator, has_audio) {
            (Some(simulator), true) => {
                tracing::warn!(
                    error_rate = self.config.simulated_error_rate,
                    "no recognized transcript; simulating one from the reference text"
                );
                simulator.simulate(&request.reference_text, self.config.simulated_error_rate)
            }
            _ => Err(AssessmentError::invalid_input(
                "recognizedText or audioBase64 is required",
            )),
        }
    }
}

/// Scores with the default configuration and strategies.
pub fn assess(
    transcript: &str,
    reference_text: &str,
) -> Result<AssessmentResult, AssessmentError> {
    crate::pipeline::builder::PronunciationScorerBuilder::default()
        .without_simulation()
        .build()?
        .assess(transcript, reference_text)
}
