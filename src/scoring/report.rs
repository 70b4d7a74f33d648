use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::error::AssessmentError;
use crate::types::{AssessmentResult, WordScore};

const OUTLIER_TOP_N: usize = 10;
const WEAK_WORDS_TOP_N: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub cases: Vec<CaseReport>,
    pub aggregates: AggregateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub config: ScoringConfig,
    pub case_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub reference_text: String,
    pub transcript: String,
    pub reference_word_count: u32,
    pub transcript_word_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<CaseScores>,
    pub words: Vec<WordScore>,
    pub mispronounced: Vec<String>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CaseScores {
    pub accuracy: u32,
    pub fluency: u32,
    pub completeness: u32,
    pub pronunciation: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub counts: AggregateCounts,
    pub accuracy: Option<MetricDistribution>,
    pub fluency: Option<MetricDistribution>,
    pub completeness: Option<MetricDistribution>,
    pub pronunciation: Option<MetricDistribution>,
    pub lowest_pronunciation: Vec<OutlierEntry>,
    pub weak_words: Vec<WeakWord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateCounts {
    pub total: u32,
    pub scored: u32,
    pub failed: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricDistribution {
    pub mean: f32,
    pub p50: f32,
    pub p90: f32,
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlierEntry {
    pub id: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeakWord {
    pub word: String,
    pub mispronounced: u32,
    pub attempts: u32,
}

/// Builds the per-case entry. Failed cases keep their inputs and carry the
/// error in `notes`, without scores.
pub fn compute_case_report(
    id: &str,
    reference_text: &str,
    transcript: &str,
    transcript_word_count: usize,
    outcome: Result<&AssessmentResult, &AssessmentError>,
) -> CaseReport {
    let mut notes = Vec::new();
    if transcript_word_count == 0 {
        notes.push("empty_transcript".to_string());
    }

    let result = match outcome {
        Ok(result) => Some(result),
        Err(err) => {
            notes.push(format!("assessment_failed:{err}"));
            None
        }
    };
    let reference_word_count = result.map(|r| r.words.len()).unwrap_or(0);
    if result.is_some() && transcript_word_count > reference_word_count {
        notes.push(format!(
            "transcript_longer_than_reference:transcript={transcript_word_count} reference={reference_word_count}"
        ));
    }

    let scores = result.map(|r| CaseScores {
        accuracy: r.accuracy,
        fluency: r.fluency,
        completeness: r.completeness,
        pronunciation: r.pronunciation,
    });
    let mispronounced = result
        .map(|r| r.mispronounced_words().map(|w| w.word.clone()).collect())
        .unwrap_or_default();

    CaseReport {
        id: id.to_string(),
        reference_text: reference_text.to_string(),
        transcript: transcript.to_string(),
        reference_word_count: to_u32(reference_word_count),
        transcript_word_count: to_u32(transcript_word_count),
        scores,
        words: result.map(|r| r.words.clone()).unwrap_or_default(),
        mispronounced,
        notes,
    }
}

pub fn aggregate_case_reports(cases: &[CaseReport]) -> AggregateReport {
    let scored: Vec<(&CaseReport, CaseScores)> = cases
        .iter()
        .filter_map(|case| case.scores.map(|scores| (case, scores)))
        .collect();

    let metric = |pick: fn(&CaseScores) -> u32| {
        let values: Vec<f64> = scored.iter().map(|(_, s)| pick(s) as f64).collect();
        distribution_or_none(&values)
    };

    AggregateReport {
        counts: AggregateCounts {
            total: to_u32(cases.len()),
            scored: to_u32(scored.len()),
            failed: to_u32(cases.len().saturating_sub(scored.len())),
        },
        accuracy: metric(|s| s.accuracy),
        fluency: metric(|s| s.fluency),
        completeness: metric(|s| s.completeness),
        pronunciation: metric(|s| s.pronunciation),
        lowest_pronunciation: lowest_outliers(&scored, OUTLIER_TOP_N),
        weak_words: rank_weak_words(cases, WEAK_WORDS_TOP_N),
    }
}

fn lowest_outliers(scored: &[(&CaseReport, CaseScores)], top_n: usize) -> Vec<OutlierEntry> {
    let mut entries: Vec<OutlierEntry> = scored
        .iter()
        .map(|(case, scores)| OutlierEntry {
            id: case.id.clone(),
            value: scores.pronunciation,
        })
        .collect();
    entries.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.id.cmp(&b.id)));
    entries.truncate(top_n);
    entries
}

fn rank_weak_words(cases: &[CaseReport], top_n: usize) -> Vec<WeakWord> {
    let mut attempts: HashMap<&str, u32> = HashMap::new();
    let mut misses: HashMap<&str, u32> = HashMap::new();
    for case in cases.iter().filter(|case| case.scores.is_some()) {
        for word in &case.words {
            *attempts.entry(word.word.as_str()).or_default() += 1;
        }
        for word in &case.mispronounced {
            *misses.entry(word.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<WeakWord> = misses
        .into_iter()
        .map(|(word, mispronounced)| WeakWord {
            word: word.to_string(),
            mispronounced,
            attempts: attempts.get(word).copied().unwrap_or(mispronounced),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.mispronounced
            .cmp(&a.mispronounced)
            .then_with(|| a.word.cmp(&b.word))
    });
    ranked.truncate(top_n);
    ranked
}

fn distribution_or_none(values: &[f64]) -> Option<MetricDistribution> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    Some(MetricDistribution {
        mean: mean(&sorted) as f32,
        p50: percentile_sorted(&sorted, 0.5) as f32,
        p90: percentile_sorted(&sorted, 0.9) as f32,
        min: sorted[0] as f32,
        max: sorted[sorted.len() - 1] as f32,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let clamped = percentile.clamp(0.0, 1.0);
    let max_index = (sorted_values.len() - 1) as f64;
    let rank = clamped * max_index;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorType;

    fn word(word: &str, accuracy_score: u32, error_type: ErrorType) -> WordScore {
        WordScore {
            word: word.to_string(),
            accuracy_score,
            error_type,
        }
    }

    fn result(pronunciation: u32, words: Vec<WordScore>) -> AssessmentResult {
        AssessmentResult {
            accuracy: pronunciation,
            fluency: pronunciation,
            completeness: 100,
            pronunciation,
            words,
        }
    }

    fn scored_case(id: &str, pronunciation: u32, words: Vec<WordScore>) -> CaseReport {
        let transcript_len = words.len();
        compute_case_report(
            id,
            "ref",
            "heard",
            transcript_len,
            Ok(&result(pronunciation, words)),
        )
    }

    #[test]
    fn case_report_lists_mispronounced_words() {
        let case = scored_case(
            "a",
            60,
            vec![
                word("i", 100, ErrorType::None),
                word("go", 0, ErrorType::Mispronunciation),
            ],
        );
        assert_eq!(case.reference_word_count, 2);
        assert_eq!(case.mispronounced, ["go"]);
        assert!(case.notes.is_empty());
        assert_eq!(case.scores.map(|s| s.pronunciation), Some(60));
    }

    #[test]
    fn case_report_notes_long_and_empty_transcripts() {
        let r = result(96, vec![word("hi", 100, ErrorType::None)]);
        let long = compute_case_report("long", "hi", "hi hi hi", 3, Ok(&r));
        assert_eq!(
            long.notes,
            ["transcript_longer_than_reference:transcript=3 reference=1"]
        );

        let r = result(0, vec![word("hi", 0, ErrorType::Mispronunciation)]);
        let empty = compute_case_report("empty", "hi", "", 0, Ok(&r));
        assert_eq!(empty.notes, ["empty_transcript"]);
    }

    #[test]
    fn failed_case_has_no_scores() {
        let err = AssessmentError::invalid_input("reference text is empty");
        let case = compute_case_report("bad", "", "hello", 1, Err(&err));
        assert!(case.scores.is_none());
        assert!(case.words.is_empty());
        assert_eq!(
            case.notes,
            ["assessment_failed:invalid input: reference text is empty"]
        );
    }

    #[test]
    fn aggregate_counts_and_distribution() {
        let err = AssessmentError::invalid_input("empty");
        let cases = vec![
            scored_case("a", 40, vec![word("x", 0, ErrorType::Mispronunciation)]),
            scored_case("b", 80, vec![word("x", 100, ErrorType::None)]),
            scored_case("c", 60, vec![word("y", 10, ErrorType::Mispronunciation)]),
            compute_case_report("d", "", "", 0, Err(&err)),
        ];
        let aggregates = aggregate_case_reports(&cases);
        assert_eq!(aggregates.counts.total, 4);
        assert_eq!(aggregates.counts.scored, 3);
        assert_eq!(aggregates.counts.failed, 1);

        let pronunciation = aggregates.pronunciation.expect("distribution");
        assert_eq!(pronunciation.mean, 60.0);
        assert_eq!(pronunciation.p50, 60.0);
        assert_eq!(pronunciation.min, 40.0);
        assert_eq!(pronunciation.max, 80.0);
        assert!((pronunciation.p90 - 76.0).abs() < 1e-4);
    }

    #[test]
    fn aggregate_without_scored_cases_has_no_distributions() {
        let aggregates = aggregate_case_reports(&[]);
        assert_eq!(aggregates.counts.total, 0);
        assert!(aggregates.accuracy.is_none());
        assert!(aggregates.lowest_pronunciation.is_empty());
        assert!(aggregates.weak_words.is_empty());
    }

    #[test]
    fn lowest_pronunciation_sorted_ascending_with_id_ties() {
        let cases = vec![
            scored_case("b", 50, vec![]),
            scored_case("a", 50, vec![]),
            scored_case("c", 20, vec![]),
        ];
        let ids: Vec<_> = aggregate_case_reports(&cases)
            .lowest_pronunciation
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn weak_words_ranked_by_miss_count() {
        let cases = vec![
            scored_case(
                "a",
                30,
                vec![
                    word("three", 20, ErrorType::Mispronunciation),
                    word("tree", 50, ErrorType::Mispronunciation),
                ],
            ),
            scored_case(
                "b",
                50,
                vec![
                    word("three", 40, ErrorType::Mispronunciation),
                    word("tree", 100, ErrorType::None),
                ],
            ),
        ];
        let weak = aggregate_case_reports(&cases).weak_words;
        assert_eq!(
            weak,
            vec![
                WeakWord {
                    word: "three".to_string(),
                    mispronounced: 2,
                    attempts: 2,
                },
                WeakWord {
                    word: "tree".to_string(),
                    mispronounced: 1,
                    attempts: 2,
                },
            ]
        );
    }
}
