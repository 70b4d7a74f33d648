use rand::Rng;

use crate::error::AssessmentError;

const DROP_PROBABILITY: f64 = 0.3;
const PLURALIZE_PROBABILITY: f64 = 0.3;
const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Degrades `text` the way a noisy recognizer might, for demo and test inputs.
///
/// Each space-separated word is corrupted with probability `error_rate`: it is
/// dropped, gets an `s` appended, or has its first lowercase vowel replaced by
/// `a`.
pub fn simulate_transcript_errors<R: Rng + ?Sized>(
    text: &str,
    error_rate: f64,
    rng: &mut R,
) -> Result<String, AssessmentError> {
    if !(0.0..=1.0).contains(&error_rate) {
        return Err(AssessmentError::invalid_input(format!(
            "error_rate must be within [0, 1], got {error_rate}"
        )));
    }

    let words: Vec<String> = text
        .split(' ')
        .map(|word| {
            if rng.gen::<f64>() >= error_rate {
                return word.to_string();
            }
            let branch = rng.gen::<f64>();
            if branch < DROP_PROBABILITY {
                String::new()
            } else if branch < DROP_PROBABILITY + PLURALIZE_PROBABILITY {
                format!("{word}s")
            } else {
                replace_first_vowel(word)
            }
        })
        .filter(|word| !word.is_empty())
        .collect();

    Ok(words.join(" "))
}

fn replace_first_vowel(word: &str) -> String {
    match word.find(&VOWELS[..]) {
        Some(idx) => {
            let mut out = String::with_capacity(word.len());
            out.push_str(&word[..idx]);
            out.push('a');
            // Vowels are single-byte.
            out.push_str(&word[idx + 1..]);
            out
        }
        None => word.to_string(),
    }
}
