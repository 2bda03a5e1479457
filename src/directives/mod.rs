//! Conditional template directives.
//!
//! Template files carry `#IF <feature>` / `#ENDIF` markers inside the host
//! language's single-line comments:
//!
//! ```text
//! import express from "express";
//! // #IF cors
//! import cors from "cors";
//! // #ENDIF
//! ```
//!
//! [`filter`] drops every marker line and every line enclosed by a scope whose
//! feature is disabled. Scopes nest; a line survives only when all enclosing
//! features are enabled.

use crate::features::FeatureFlags;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors raised while evaluating directives. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("line {line}: unknown feature '{feature}' in #IF directive")]
    UnknownFeature { feature: String, line: usize },

    #[error("line {line}: #ENDIF without a matching #IF")]
    Unbalanced { line: usize },

    #[error("line {line}: #IF is never closed ({depth} open scope(s) at end of input)")]
    Unterminated { line: usize, depth: usize },

    #[error("line {line}: #IF directive is missing a feature name")]
    MissingFeatureName { line: usize },
}

impl DirectiveError {
    /// Line the error points at
    pub fn line(&self) -> usize {
        match self {
            DirectiveError::UnknownFeature { line, .. }
            | DirectiveError::Unbalanced { line }
            | DirectiveError::Unterminated { line, .. }
            | DirectiveError::MissingFeatureName { line } => *line,
        }
    }

    /// Message without the line prefix
    pub fn description(&self) -> String {
        match self {
            DirectiveError::UnknownFeature { feature, .. } => {
                format!("unknown feature '{}' in #IF directive", feature)
            }
            DirectiveError::Unbalanced { .. } => "#ENDIF without a matching #IF".to_string(),
            DirectiveError::Unterminated { depth, .. } => {
                format!("#IF is never closed ({} open scope(s) at end of input)", depth)
            }
            DirectiveError::MissingFeatureName { .. } => "#IF directive is missing a feature name".to_string(),
        }
    }

    /// Short identifier used when reporting problems
    pub fn code(&self) -> &'static str {
        match self {
            DirectiveError::UnknownFeature { .. } => "unknown-feature",
            DirectiveError::Unbalanced { .. } => "unbalanced-endif",
            DirectiveError::Unterminated { .. } => "unterminated-if",
            DirectiveError::MissingFeatureName { .. } => "missing-feature-name",
        }
    }
}

/// A recognized marker line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker<'a> {
    /// `#IF name`; `None` when the name is missing
    If(Option<&'a str>),
    EndIf,
}

// Comment openers accepted in front of a marker: `//`, `#`, `--`, `/*`, `{/*`, `<!--`.
// The feature name is the first whitespace-delimited token, minus a directly
// attached `*/`, `*/}` or `-->` closer.
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?://|#|--|\{/\*|/\*|<!--)\s*#(?:(?P<endif>ENDIF)\b|IF(?:\s+(?P<name>[^\s*\-]\S*?)(?:\*/\}?|-->)?(?:\s|$)|\s|$))",
    )
    .expect("Invalid marker regex")
});

/// Classify a single (untrimmed) line
pub fn parse_marker(line: &str) -> Option<Marker<'_>> {
    let captures = MARKER_REGEX.captures(line.trim())?;

    if captures.name("endif").is_some() {
        return Some(Marker::EndIf);
    }

    Some(Marker::If(captures.name("name").map(|m| m.as_str())))
}

/// Returns true if the text contains at least one marker line
pub fn has_directives(source: &str) -> bool {
    source.split('\n').any(|line| parse_marker(line).is_some())
}

/// Filter `source` against `flags`.
///
/// Lines are split on `\n` and re-joined with `\n`, so text without markers
/// comes back byte-for-byte, trailing newline included. Nothing is returned on
/// error.
pub fn filter(source: &str, flags: &FeatureFlags) -> Result<String, DirectiveError> {
    // (value, line of the #IF)
    let mut stack: Vec<(bool, usize)> = Vec::new();
    let mut output: Vec<&str> = Vec::new();

    for (index, line) in source.split('\n').enumerate() {
        let line_number = index + 1;

        match parse_marker(line) {
            Some(Marker::If(Some(name))) => {
                let enabled = flags.get(name).ok_or_else(|| DirectiveError::UnknownFeature {
                    feature: name.to_string(),
                    line: line_number,
                })?;
                stack.push((enabled, line_number));
            }
            Some(Marker::If(None)) => {
                return Err(DirectiveError::MissingFeatureName { line: line_number });
            }
            Some(Marker::EndIf) => {
                if stack.pop().is_none() {
                    return Err(DirectiveError::Unbalanced { line: line_number });
                }
            }
            None => {
                if stack.iter().all(|(enabled, _)| *enabled) {
                    output.push(line);
                }
            }
        }
    }

    if let Some((_, line)) = stack.last() {
        return Err(DirectiveError::Unterminated {
            line: *line,
            depth: stack.len(),
        });
    }

    Ok(output.join("\n"))
}
