use std::fs;
use std::path::PathBuf;

use libtest_mimic::{Arguments, Failed, Trial};
use pronunciation_scoring::{
    AssessmentRequest, AssessmentResult, PronunciationScorer, PronunciationScorerBuilder,
    ScoringConfig,
};
use serde::Deserialize;

const SUITE_NAME: &str = "assessment_reference_matches_fixture";
const FIXTURE_PATH: &str = "test-data/assessment_cases.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceCase {
    id: String,
    reference_text: String,
    recognized_text: String,
    #[serde(default)]
    expected: Option<AssessmentResult>,
    #[serde(default)]
    expected_error: Option<String>,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let cases = match load_cases(&repo_root) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(&args, format!("No reference cases found in {FIXTURE_PATH}."));
        return;
    }

    let mut tests = Vec::with_capacity(cases.len() + 1);
    for case in cases {
        let test_name = format!("{SUITE_NAME}::case::{}", case.id);
        tests.push(Trial::test(test_name, move || {
            run_reference_case(&case).map_err(Failed::from)
        }));
    }
    tests.push(Trial::test(
        format!("{SUITE_NAME}::request::recognized_text_round_trip"),
        || run_request_round_trip().map_err(Failed::from),
    ));

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn load_cases(repo_root: &std::path::Path) -> Result<Vec<ReferenceCase>, String> {
    let path = repo_root.join(FIXTURE_PATH);
    let contents = fs::read_to_string(&path)
        .map_err(|err| format!("Failed to read fixture '{}': {err}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("Failed to parse fixture '{}': {err}", path.display()))
}

fn scorer() -> Result<PronunciationScorer, String> {
    PronunciationScorerBuilder::new(ScoringConfig::default())
        .without_simulation()
        .build()
        .map_err(|err| format!("Failed to build scorer: {err}"))
}

fn run_reference_case(case: &ReferenceCase) -> Result<(), String> {
    let scorer = scorer()?;
    let outcome = scorer.assess(&case.recognized_text, &case.reference_text);

    match (&case.expected, &case.expected_error, outcome) {
        (Some(expected), None, Ok(observed)) => compare_result(&case.id, expected, &observed),
        (None, Some(kind), Err(err)) => {
            if kind == "invalid_input" && err.is_invalid_input() {
                Ok(())
            } else {
                Err(format!("{}: expected {kind} error, got '{err}'", case.id))
            }
        }
        (Some(_), None, Err(err)) => Err(format!("{}: assess() failed: {err}", case.id)),
        (None, Some(kind), Ok(observed)) => Err(format!(
            "{}: expected {kind} error, got pronunciation={}",
            case.id, observed.pronunciation
        )),
        _ => Err(format!(
            "{}: fixture must set exactly one of expected / expectedError",
            case.id
        )),
    }
}

fn compare_result(
    id: &str,
    expected: &AssessmentResult,
    observed: &AssessmentResult,
) -> Result<(), String> {
    let pairs = [
        ("accuracy", expected.accuracy, observed.accuracy),
        ("fluency", expected.fluency, observed.fluency),
        ("completeness", expected.completeness, observed.completeness),
        ("pronunciation", expected.pronunciation, observed.pronunciation),
    ];
    for (name, want, got) in pairs {
        if want != got {
            return Err(format!("{id}: {name} mismatch (expected {want}, got {got})"));
        }
    }

    if observed.words.len() != expected.words.len() {
        return Err(format!(
            "{id}: word count mismatch (expected {}, got {})",
            expected.words.len(),
            observed.words.len()
        ));
    }
    for (idx, (want, got)) in expected.words.iter().zip(observed.words.iter()).enumerate() {
        if want != got {
            return Err(format!(
                "{id}: word mismatch at index {idx} (expected {want:?}, got {got:?})"
            ));
        }
    }
    Ok(())
}

fn run_request_round_trip() -> Result<(), String> {
    let scorer = scorer()?;
    let request: AssessmentRequest = serde_json::from_str(
        r#"{ "referenceText": "I go to school", "recognizedText": "I go to school" }"#,
    )
    .map_err(|err| format!("request parse failed: {err}"))?;
    let response = scorer
        .assess_request(&request)
        .map_err(|err| format!("assess_request failed: {err}"))?;

    let json = serde_json::to_value(&response).map_err(|err| err.to_string())?;
    let expected = serde_json::json!({
        "accuracy": 100,
        "fluency": 80,
        "completeness": 100,
        "pronunciation": 96,
        "words": [
            { "word": "i", "accuracyScore": 100, "errorType": "None" },
            { "word": "go", "accuracyScore": 100, "errorType": "None" },
            { "word": "to", "accuracyScore": 100, "errorType": "None" },
            { "word": "school", "accuracyScore": 100, "errorType": "None" }
        ],
        "transcript": "I go to school"
    });
    if json != expected {
        return Err(format!("response JSON mismatch: {json}"));
    }
    Ok(())
}
