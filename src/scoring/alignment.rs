use crate::scoring::aggregate::round_percent;
use crate::scoring::similarity::string_similarity;
use crate::types::{ErrorType, Token, WordScore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentSummary {
    pub words: Vec<WordScore>,
    pub match_count: usize,
}

/// Scores each reference word against the transcript word at the same index.
///
/// Transcript words beyond the reference length are ignored; reference words
/// past the end of the transcript are compared against an empty token and
/// therefore score 0.
pub fn align_words(
    reference: &[Token],
    transcript: &[Token],
    match_threshold: f64,
) -> AlignmentSummary {
    let mut words = Vec::with_capacity(reference.len());
    let mut match_count = 0usize;

    for (i, ref_word) in reference.iter().enumerate() {
        let heard = transcript.get(i).map(String::as_str).unwrap_or("");
        let similarity = string_similarity(ref_word, heard);
        let is_match = similarity > match_threshold;
        if is_match {
            match_count += 1;
        }
        words.push(WordScore {
            word: ref_word.clone(),
            accuracy_score: round_percent(similarity),
            error_type: if is_match {
                ErrorType::None
            } else {
                ErrorType::Mispronunciation
            },
        });
    }

    debug_assert_eq!(words.len(), reference.len());
    AlignmentSummary { words, match_count }
}
