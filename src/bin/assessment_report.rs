use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pronunciation_scoring::{
    aggregate_case_reports, compute_case_report, AssessmentRequest, CaseReport, Meta,
    PronunciationScorer, PronunciationScorerBuilder, Report, ScoringConfig,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[path = "assessment_report/json_report_formatter.rs"]
mod json_report_formatter;

const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full report: cases plus aggregates.
    Json,
    /// One case per line, no aggregates.
    Jsonl,
}

#[derive(Debug, Parser)]
#[command(name = "assessment_report")]
#[command(about = "Score transcripts against reference texts and write a pronunciation report")]
struct Args {
    #[arg(long, env = "PRONUNCIATION_REPORT_CASES")]
    cases: PathBuf,
    #[arg(long, env = "PRONUNCIATION_REPORT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "PRONUNCIATION_REPORT_OUT")]
    out: Option<PathBuf>,
    #[arg(
        long,
        env = "PRONUNCIATION_REPORT_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    output_format: OutputFormat,
    #[arg(long, env = "PRONUNCIATION_REPORT_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "PRONUNCIATION_REPORT_OFFSET", default_value_t = 0)]
    offset: usize,
    /// Overrides `simulated_error_rate` from the config file.
    #[arg(long, env = "PRONUNCIATION_REPORT_SIMULATE_ERROR_RATE")]
    simulate_error_rate: Option<f64>,
    #[arg(long, env = "PRONUNCIATION_REPORT_SEED")]
    seed: Option<u64>,
    /// Fail cases that have audio but no recognized text instead of simulating a transcript.
    #[arg(long, env = "PRONUNCIATION_REPORT_NO_SIMULATION", default_value_t = false)]
    no_simulation: bool,
}

#[derive(Debug, Deserialize)]
struct Case {
    id: String,
    #[serde(flatten)]
    request: AssessmentRequest,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pronunciation_scoring=info,assessment_report=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let cwd = std::env::current_dir()
        .map_err(|err| format!("Failed to resolve working directory: {err}"))?;

    let config = load_config(args.config.as_deref(), args.simulate_error_rate)?;
    let scorer = build_scorer(config.clone(), args.seed, args.no_simulation)?;

    let cases_path = resolve_path(&cwd, &args.cases);
    let mut cases = load_cases(&cases_path)?;
    if args.offset > 0 {
        cases = cases.into_iter().skip(args.offset).collect();
    }
    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }
    if cases.is_empty() {
        return Err("No cases selected after applying offset/limit.".to_string());
    }
    tracing::info!(cases = cases.len(), path = %cases_path.display(), "scoring cases");

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );

    let started = Instant::now();
    let mut case_reports: Vec<CaseReport> = Vec::with_capacity(cases.len());
    for case in &cases {
        progress.set_message(case.id.clone());
        case_reports.push(score_case(&scorer, case));
        progress.inc(1);
    }
    progress.finish_with_message("scoring complete");

    let failed = case_reports.iter().filter(|c| c.scores.is_none()).count();
    tracing::info!(
        scored = case_reports.len() - failed,
        failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scoring pass finished"
    );

    let out_path = resolve_out_path(&cwd, args.out.as_ref(), args.output_format);
    match args.output_format {
        OutputFormat::Json => {
            let aggregates = aggregate_case_reports(&case_reports);
            let report = Report {
                schema_version: REPORT_SCHEMA_VERSION,
                meta: Meta {
                    generated_at: Utc::now().to_rfc3339(),
                    config,
                    case_count: case_reports.len(),
                },
                cases: case_reports,
                aggregates,
            };
            json_report_formatter::write_report(&out_path, &report)?;
        }
        OutputFormat::Jsonl => json_report_formatter::write_cases_jsonl(&out_path, &case_reports)?,
    }
    println!("{}", out_path.display());
    Ok(())
}

fn score_case(scorer: &PronunciationScorer, case: &Case) -> CaseReport {
    let request = &case.request;
    match scorer.assess_request(request) {
        Ok(response) => {
            let transcript_word_count = scorer.tokenize(&response.transcript).len();
            compute_case_report(
                &case.id,
                &request.reference_text,
                &response.transcript,
                transcript_word_count,
                Ok(&response.result),
            )
        }
        Err(err) => {
            tracing::warn!(case = %case.id, error = %err, "case not scored");
            let transcript = request.recognized_text.clone().unwrap_or_default();
            let transcript_word_count = scorer.tokenize(&transcript).len();
            compute_case_report(
                &case.id,
                &request.reference_text,
                &transcript,
                transcript_word_count,
                Err(&err),
            )
        }
    }
}

fn load_config(path: Option<&Path>, error_rate: Option<f64>) -> Result<ScoringConfig, String> {
    let mut config = match path {
        Some(path) => ScoringConfig::load(path)
            .map_err(|err| format!("Failed to load scoring config '{}': {err}", path.display()))?,
        None => ScoringConfig::default(),
    };
    if let Some(rate) = error_rate {
        config.simulated_error_rate = rate;
    }
    Ok(config)
}

fn build_scorer(
    config: ScoringConfig,
    seed: Option<u64>,
    no_simulation: bool,
) -> Result<PronunciationScorer, String> {
    let mut builder = PronunciationScorerBuilder::new(config);
    if let Some(seed) = seed {
        builder = builder.with_simulation_seed(seed);
    }
    if no_simulation {
        builder = builder.without_simulation();
    }
    builder
        .build()
        .map_err(|err| format!("Failed to build PronunciationScorer: {err}"))
}

fn load_cases(path: &Path) -> Result<Vec<Case>, String> {
    require_path_exists(path, "Missing --cases file.")?;
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read cases file '{}': {err}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("Failed to parse cases file '{}': {err}", path.display()))
}

fn resolve_out_path(cwd: &Path, out: Option<&PathBuf>, format: OutputFormat) -> PathBuf {
    if let Some(path) = out {
        return resolve_path(cwd, path);
    }

    let run_id = Utc::now().format("%Y%m%dT%H%M%SZ");
    let extension = match format {
        OutputFormat::Json => "json",
        OutputFormat::Jsonl => "jsonl",
    };
    cwd.join("target")
        .join("assessment_reports")
        .join(format!("assessment-report-{run_id}.{extension}"))
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}
