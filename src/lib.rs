pub mod config;
pub mod error;
pub mod pipeline;
pub mod scoring;
pub mod types;

pub use config::ScoringConfig;
pub use error::AssessmentError;
pub use pipeline::builder::PronunciationScorerBuilder;
pub use pipeline::runtime::{assess, PronunciationScorer};
pub use pipeline::traits::{TextTokenizer, TranscriptSimulator, WordAligner};
pub use scoring::report::{
    aggregate_case_reports, compute_case_report, AggregateReport, CaseReport, Meta, Report,
};
pub use scoring::similarity::{levenshtein_distance, string_similarity};
pub use scoring::simulation::simulate_transcript_errors;
pub use types::{
    AssessmentRequest, AssessmentResponse, AssessmentResult, ErrorBody, ErrorType, Token,
    WordScore,
};
