use super::{Level, Problem};
use crate::directives::{self, Marker};
use crate::features::{FeatureFlags, FeatureRegistry};
use crate::templates::TemplateSource;
use eyre::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into when checking a tree
const SKIPPED_DIRS: [&str; 3] = [".git", "node_modules", "dist"];

/// Template trees checked when no paths are given
pub const TEMPLATE_TREES: [&str; 2] = ["backend", "frontend"];

// Directive keywords anywhere on a line, whether or not they form a marker
static KEYWORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(?:IF|ENDIF)(?:\s|$|\*/|-->)").expect("Invalid keyword regex"));

/// Validates directive usage in template files
pub struct Checker {
    flags: FeatureFlags,
}

impl Checker {
    /// Checker that accepts every feature of `registry`
    pub fn new(registry: &FeatureRegistry) -> Self {
        Self {
            flags: registry.all_enabled(),
        }
    }

    /// Check a template's text
    pub fn check_content(&self, content: &str) -> Vec<Problem> {
        if let Err(err) = directives::filter(content, &self.flags) {
            return vec![Problem::new(err.line(), Level::Error, err.code(), err.description())];
        }

        let mut problems = empty_blocks(content);
        problems.extend(unrecognized_markers(content));
        problems.sort();
        problems
    }

    /// Check a single file; binary files have no problems
    pub fn check_file<P: AsRef<Path>>(&self, file_path: P) -> Result<Vec<Problem>> {
        let file_path = file_path.as_ref();
        let bytes = std::fs::read(file_path)
            .map_err(|e| eyre::eyre!("Failed to read file {}: {}", file_path.display(), e))?;

        match std::str::from_utf8(&bytes) {
            Ok(content) => Ok(self.check_content(content)),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Check files and directories
    pub fn check_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<(PathBuf, Vec<Problem>)>> {
        let mut results = Vec::new();

        for path in paths {
            let path = path.as_ref();

            if path.is_file() {
                results.push((path.to_path_buf(), self.check_file(path)?));
            } else if path.is_dir() {
                for entry in WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(|e| !is_skipped_dir(e))
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                {
                    let file_path = entry.path();
                    results.push((file_path.to_path_buf(), self.check_file(file_path)?));
                }
            } else {
                return Err(eyre::eyre!("Path does not exist: {}", path.display()));
            }
        }

        Ok(results)
    }

    /// Check every tree of a template source
    pub fn check_source(&self, source: &dyn TemplateSource) -> Result<Vec<(PathBuf, Vec<Problem>)>> {
        let mut results = Vec::new();

        for tree in TEMPLATE_TREES {
            for file in source.files(tree)? {
                let problems = file.text().map(|text| self.check_content(text)).unwrap_or_default();
                results.push((PathBuf::from(file.origin), problems));
            }
        }

        Ok(results)
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Warn about `#IF` / `#ENDIF` text that the filter keeps because it is not a
/// marker line, e.g. a missing comment opener or trailing code in front of it
fn unrecognized_markers(content: &str) -> Vec<Problem> {
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| directives::parse_marker(line).is_none() && KEYWORD_REGEX.is_match(line))
        .map(|(index, _)| {
            Problem::new(
                index + 1,
                Level::Warning,
                "unrecognized-directive",
                "directive keyword outside a marker comment is kept as text",
            )
        })
        .collect()
}

/// Warn about `#IF` blocks that enclose nothing. Expects balanced input.
fn empty_blocks(content: &str) -> Vec<Problem> {
    let mut problems = Vec::new();
    // (line of the #IF, has content)
    let mut open: Vec<(usize, bool)> = Vec::new();

    for (index, line) in content.split('\n').enumerate() {
        match directives::parse_marker(line) {
            Some(Marker::If(_)) => {
                if let Some(parent) = open.last_mut() {
                    parent.1 = true;
                }
                open.push((index + 1, false));
            }
            Some(Marker::EndIf) => {
                if let Some((if_line, false)) = open.pop() {
                    problems.push(Problem::new(
                        if_line,
                        Level::Warning,
                        "empty-block",
                        "#IF block has no content",
                    ));
                }
            }
            None => {
                if !line.trim().is_empty() {
                    if let Some(current) = open.last_mut() {
                        current.1 = true;
                    }
                }
            }
        }
    }

    problems
}
