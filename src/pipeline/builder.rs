use crate::config::ScoringConfig;
use crate::error::AssessmentError;
use crate::pipeline::defaults::{
    PositionalWordAligner, PunctuationStrippingTokenizer, SeededTranscriptSimulator,
};
use crate::pipeline::runtime::{PronunciationScorer, PronunciationScorerParts};
use crate::pipeline::traits::{TextTokenizer, TranscriptSimulator, WordAligner};

pub struct PronunciationScorerBuilder {
    config: ScoringConfig,
    tokenizer: Option<Box<dyn TextTokenizer>>,
    word_aligner: Option<Box<dyn WordAligner>>,
    simulator: Option<Box<dyn TranscriptSimulator>>,
    simulation_seed: Option<u64>,
    simulation_enabled: bool,
}

impl PronunciationScorerBuilder {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            tokenizer: None,
            word_aligner: None,
            simulator: None,
            simulation_seed: None,
            simulation_enabled: true,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn TextTokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_word_aligner(mut self, word_aligner: Box<dyn WordAligner>) -> Self {
        self.word_aligner = Some(word_aligner);
        self
    }

    pub fn with_simulator(mut self, simulator: Box<dyn TranscriptSimulator>) -> Self {
        self.simulator = Some(simulator);
        self
    }

    /// Seeds the default simulator. Ignored when a custom simulator is set.
    pub fn with_simulation_seed(mut self, seed: u64) -> Self {
        self.simulation_seed = Some(seed);
        self
    }

    /// Requests without a recognized transcript fail instead of being simulated.
    pub fn without_simulation(mut self) -> Self {
        self.simulation_enabled = false;
        self
    }

    pub fn build(self) -> Result<PronunciationScorer, AssessmentError> {
        self.config.validate()?;

        let simulator: Option<Box<dyn TranscriptSimulator>> = if !self.simulation_enabled {
            None
        } else if let Some(simulator) = self.simulator {
            Some(simulator)
        } else {
            Some(Box::new(match self.simulation_seed {
                Some(seed) => SeededTranscriptSimulator::from_seed(seed),
                None => SeededTranscriptSimulator::from_entropy(),
            }))
        };

        let tokenizer = self.tokenizer.unwrap_or_else(|| {
            Box::new(PunctuationStrippingTokenizer::new(
                self.config.punctuation.clone(),
            ))
        });
        let word_aligner = self
            .word_aligner
            .unwrap_or_else(|| Box::new(PositionalWordAligner::new(self.config.match_threshold)));

        Ok(PronunciationScorer::from_parts(PronunciationScorerParts {
            config: self.config,
            tokenizer,
            word_aligner,
            simulator,
        }))
    }
}

impl Default for PronunciationScorerBuilder {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
