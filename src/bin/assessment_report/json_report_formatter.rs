use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use pronunciation_scoring::{CaseReport, Report};

/// Writes the whole report as one pretty-printed JSON document.
pub fn write_report(path: &Path, report: &Report) -> Result<(), String> {
    let mut writer = create_output(path)?;
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|err| format!("Failed to serialize report '{}': {err}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|err| format!("Failed to finalize report '{}': {err}", path.display()))
}

/// Writes one compact JSON object per case, for streaming into other tools.
pub fn write_cases_jsonl(path: &Path, cases: &[CaseReport]) -> Result<(), String> {
    let mut writer = create_output(path)?;
    for case in cases {
        serde_json::to_writer(&mut writer, case).map_err(|err| {
            format!(
                "Failed to serialize case '{}' into '{}': {err}",
                case.id,
                path.display()
            )
        })?;
        writer
            .write_all(b"\n")
            .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
    }
    writer
        .flush()
        .map_err(|err| format!("Failed to finalize '{}': {err}", path.display()))
}

fn create_output(path: &Path) -> Result<BufWriter<File>, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create report output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    File::create(path)
        .map(BufWriter::new)
        .map_err(|err| format!("Failed to create report file '{}': {err}", path.display()))
}
