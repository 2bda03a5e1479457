pub mod human;
pub mod json;

use crate::cli::OutputFormat;
use crate::linter::{Level, Problem};
use crate::scaffold::ScaffoldReport;
use std::path::PathBuf;

/// Renders command results for the terminal or for machines
pub trait OutputFormatter {
    /// Format template check results
    fn format_results(&self, results: &[(PathBuf, Vec<Problem>)]) -> String;

    /// Format the summary of a finished scaffold run
    fn format_report(&self, report: &ScaffoldReport) -> String;
}

/// Get the appropriate formatter for the given format
pub fn get_formatter(format: &OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Human => Box::new(human::HumanFormatter::new()),
        OutputFormat::Json => Box::new(json::JsonFormatter::new()),
    }
}

/// Statistics about check results
#[derive(Debug, Default)]
pub struct CheckStats {
    pub total_files: usize,
    pub files_with_problems: usize,
    pub total_problems: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckStats {
    /// Calculate statistics from check results
    pub fn from_results(results: &[(PathBuf, Vec<Problem>)]) -> Self {
        let mut stats = Self {
            total_files: results.len(),
            files_with_problems: results.iter().filter(|(_, problems)| !problems.is_empty()).count(),
            ..Self::default()
        };

        for (_, problems) in results {
            stats.total_problems += problems.len();

            for problem in problems {
                match problem.level {
                    Level::Error => stats.errors += 1,
                    Level::Warning => stats.warnings += 1,
                }
            }
        }

        stats
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_stats_empty() {
        let stats = CheckStats::from_results(&[]);

        assert_eq!(stats.total_files, 0);
        assert!(!stats.has_errors());
        assert_eq!(stats.total_problems, 0);
    }

    #[test]
    fn test_check_stats_with_problems() {
        let results = vec![
            (PathBuf::from("app.js"), vec![
                Problem::new(1, Level::Error, "unbalanced-endif", "no #IF"),
                Problem::new(4, Level::Warning, "empty-block", "empty"),
            ]),
            (PathBuf::from("db.js"), vec![]),
        ];

        let stats = CheckStats::from_results(&results);

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.files_with_problems, 1);
        assert_eq!(stats.total_problems, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.warnings, 1);
        assert!(stats.has_errors());
    }
}
