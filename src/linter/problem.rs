use serde::{Deserialize, Serialize};

/// Severity of a template problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Suspicious but renders fine
    Warning,
    /// The template cannot be rendered
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// A problem found in a template file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Line number (1-based)
    pub line: usize,
    pub level: Level,
    /// Short identifier of the check that found the problem
    pub code: String,
    pub message: String,
}

impl Problem {
    pub fn new(line: usize, level: Level, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line,
            level,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Message including the code
    pub fn formatted_message(&self) -> String {
        format!("{} ({})", self.message, self.code)
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.line, self.formatted_message())
    }
}

impl PartialOrd for Problem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Problem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.level.cmp(&other.level))
            .then_with(|| self.code.cmp(&other.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Warning.to_string(), "warning");
        assert_eq!(Level::Error.to_string(), "error");
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn test_problem_display() {
        let problem = Problem::new(10, Level::Error, "unbalanced-endif", "#ENDIF without a matching #IF");
        assert_eq!(problem.to_string(), "10: #ENDIF without a matching #IF (unbalanced-endif)");
    }

    #[test]
    fn test_problem_ordering() {
        let p1 = Problem::new(1, Level::Error, "a", "msg");
        let p2 = Problem::new(2, Level::Warning, "a", "msg");
        let p3 = Problem::new(1, Level::Warning, "a", "msg");

        assert!(p1 < p2);
        assert!(p3 < p1);
    }

    #[test]
    fn test_serde_level_lowercase() {
        let json = serde_json::to_string(&Level::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
