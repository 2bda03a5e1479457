use super::{CheckStats, OutputFormatter};
use crate::linter::Problem;
use crate::scaffold::ScaffoldReport;
use serde::Serialize;
use std::path::PathBuf;

/// JSON output formatter
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    stats: JsonStats,
    files: Vec<JsonFileResult<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonStats {
    total_files: usize,
    files_with_problems: usize,
    total_problems: usize,
    errors: usize,
    warnings: usize,
}

impl From<&CheckStats> for JsonStats {
    fn from(stats: &CheckStats) -> Self {
        Self {
            total_files: stats.total_files,
            files_with_problems: stats.files_with_problems,
            total_problems: stats.total_problems,
            errors: stats.errors,
            warnings: stats.warnings,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonFileResult<'a> {
    path: String,
    problems: &'a [Problem],
}

impl OutputFormatter for JsonFormatter {
    fn format_results(&self, results: &[(PathBuf, Vec<Problem>)]) -> String {
        let stats = CheckStats::from_results(results);
        let output = JsonOutput {
            stats: JsonStats::from(&stats),
            files: results
                .iter()
                .map(|(path, problems)| JsonFileResult {
                    path: path.display().to_string(),
                    problems,
                })
                .collect(),
        };

        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize results: {}\"}}", e))
    }

    fn format_report(&self, report: &ScaffoldReport) -> String {
        serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize report: {}\"}}", e))
    }
}
