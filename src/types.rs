use serde::{Deserialize, Serialize};

/// A lowercased, punctuation-stripped word.
pub type Token = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    None,
    Mispronunciation,
}

impl ErrorType {
    pub fn is_error(self) -> bool {
        self != Self::None
    }
}

/// Score for one reference-word position.
///
/// Serialized camelCase; the PascalCase shape (`Word`, `AccuracyScore`,
/// `ErrorType`) produced by speech-assessment services is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordScore {
    #[serde(alias = "Word")]
    pub word: Token,
    /// Similarity to the aligned transcript word, as a percentage in [0, 100].
    #[serde(alias = "AccuracyScore")]
    pub accuracy_score: u32,
    #[serde(alias = "ErrorType")]
    pub error_type: ErrorType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub accuracy: u32,
    pub fluency: u32,
    pub completeness: u32,
    pub pronunciation: u32,
    /// One entry per reference word, in reference order.
    pub words: Vec<WordScore>,
}

impl AssessmentResult {
    pub fn mispronounced_words(&self) -> impl Iterator<Item = &WordScore> {
        self.words.iter().filter(|w| w.error_type.is_error())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    #[serde(default)]
    pub audio_base64: Option<String>,
    #[serde(default)]
    pub reference_text: String,
    #[serde(default)]
    pub recognized_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    #[serde(flatten)]
    pub result: AssessmentResult,
    pub transcript: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&crate::error::AssessmentError> for ErrorBody {
    fn from(err: &crate::error::AssessmentError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
