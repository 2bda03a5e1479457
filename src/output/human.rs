use super::{CheckStats, OutputFormatter};
use crate::linter::{Level, Problem};
use crate::scaffold::ScaffoldReport;
use colored::Colorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Human-readable output formatter
#[derive(Debug, Default)]
pub struct HumanFormatter {
    use_colors: bool,
}

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        Self::with_colors(Self::should_use_colors())
    }

    /// Create a new human formatter with explicit color setting
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn should_use_colors() -> bool {
        std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
    }

    fn format_level(&self, level: &Level) -> String {
        if !self.use_colors {
            return level.to_string();
        }
        match level {
            Level::Error => level.to_string().red().to_string(),
            Level::Warning => level.to_string().yellow().to_string(),
        }
    }

    fn format_path(&self, path: &Path) -> String {
        if self.use_colors {
            path.display().to_string().bold().to_string()
        } else {
            path.display().to_string()
        }
    }

    fn format_code(&self, code: &str) -> String {
        let text = format!("({})", code);
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text
        }
    }

    fn format_stats(&self, stats: &CheckStats) -> String {
        let mut parts = Vec::new();

        if stats.errors > 0 {
            let text = format!("{} error{}", stats.errors, plural(stats.errors));
            parts.push(if self.use_colors { text.red().to_string() } else { text });
        }

        if stats.warnings > 0 {
            let text = format!("{} warning{}", stats.warnings, plural(stats.warnings));
            parts.push(if self.use_colors { text.yellow().to_string() } else { text });
        }

        if parts.is_empty() {
            let text = format!("No problems found in {} file{}", stats.total_files, plural(stats.total_files));
            if self.use_colors { text.green().to_string() } else { text }
        } else {
            format!("Found {}", parts.join(", "))
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_colors {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

impl OutputFormatter for HumanFormatter {
    fn format_results(&self, results: &[(PathBuf, Vec<Problem>)]) -> String {
        let mut output = Vec::new();
        let stats = CheckStats::from_results(results);

        for (file_path, problems) in results {
            if problems.is_empty() {
                continue;
            }

            output.push(self.format_path(file_path));

            for problem in problems {
                output.push(format!(
                    "  {}: {} {} {}",
                    problem.line,
                    self.format_level(&problem.level),
                    problem.message,
                    self.format_code(&problem.code)
                ));
            }

            output.push(String::new());
        }

        output.push(self.format_stats(&stats));

        output.join("\n")
    }

    fn format_report(&self, report: &ScaffoldReport) -> String {
        let mut output = Vec::new();

        let done = format!("Project {} created at {}", report.project_name, report.project_dir.display());
        output.push(if self.use_colors { done.green().bold().to_string() } else { done });

        let enabled = report.features.enabled();
        output.push(format!(
            "Features: {}",
            if enabled.is_empty() { "none".to_string() } else { enabled.join(", ") }
        ));
        output.push(format!("Files: {}", report.files.len()));

        if !report.installed {
            output.push("Dependencies were not installed".to_string());
        }

        output.push(String::new());
        output.push(self.heading("Next steps:"));
        for step in &report.next_steps {
            output.push(format!("  {}", step));
        }

        output.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureFlags;

    #[test]
    fn test_human_formatter_no_problems() {
        let formatter = HumanFormatter::with_colors(false);
        let results = vec![(PathBuf::from("a.js"), vec![]), (PathBuf::from("b.js"), vec![])];

        assert_eq!(formatter.format_results(&results), "No problems found in 2 files");
    }

    #[test]
    fn test_human_formatter_with_problems() {
        let formatter = HumanFormatter::with_colors(false);
        let results = vec![(
            PathBuf::from("app.js"),
            vec![
                Problem::new(3, Level::Error, "unknown-feature", "unknown feature 'graphql' in #IF directive"),
                Problem::new(9, Level::Warning, "empty-block", "#IF block has no content"),
            ],
        )];

        let output = formatter.format_results(&results);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "app.js");
        assert_eq!(lines[1], "  3: error unknown feature 'graphql' in #IF directive (unknown-feature)");
        assert_eq!(lines[2], "  9: warning #IF block has no content (empty-block)");
        assert_eq!(lines[4], "Found 1 error, 1 warning");
    }

    #[test]
    fn test_format_level_no_colors() {
        let formatter = HumanFormatter::with_colors(false);

        assert_eq!(formatter.format_level(&Level::Error), "error");
        assert_eq!(formatter.format_level(&Level::Warning), "warning");
    }

    #[test]
    fn test_format_report() {
        let formatter = HumanFormatter::with_colors(false);
        let mut features = FeatureFlags::new();
        features.set("cors", true);
        features.set("jwt", false);

        let report = ScaffoldReport {
            project_name: "shop".to_string(),
            project_dir: PathBuf::from("/tmp/shop"),
            features,
            files: vec![PathBuf::from("backend/src/app.js")],
            dependencies: vec![],
            installed: false,
            next_steps: vec!["cd shop".to_string()],
        };

        let output = formatter.format_report(&report);

        assert!(output.starts_with("Project shop created at /tmp/shop"));
        assert!(output.contains("Features: cors\n"));
        assert!(output.contains("Dependencies were not installed"));
        assert!(output.ends_with("Next steps:\n  cd shop"));
    }
}
