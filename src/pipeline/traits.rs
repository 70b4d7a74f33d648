use crate::error::AssessmentError;
use crate::scoring::alignment::AlignmentSummary;
use crate::types::Token;

pub trait TextTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

pub trait WordAligner: Send + Sync {
    /// Must return exactly one `WordScore` per reference token.
    fn align(&self, reference: &[Token], transcript: &[Token]) -> AlignmentSummary;
}

pub trait TranscriptSimulator: Send + Sync {
    fn simulate(&self, text: &str, error_rate: f64) -> Result<String, AssessmentError>;
}
