use crate::config::ScoringConfig;
use crate::types::Token;

/// Lowercases `text` and drops every character listed in `punctuation`.
pub fn normalize_text(text: &str, punctuation: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !punctuation.contains(*c))
        .collect()
}

pub fn tokenize_with(text: &str, punctuation: &str) -> Vec<Token> {
    normalize_text(text, punctuation)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with(text, ScoringConfig::DEFAULT_PUNCTUATION)
}
