use eyre::{Context, Result};
use rust_embed::RustEmbed;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Template trees shipped with the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
#[exclude = "**/.DS_Store"]
struct Embedded;

/// A single file of a template tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the target directory (e.g. `src/app.js`)
    pub path: PathBuf,
    /// Where the file came from, used in error messages
    pub origin: String,
    pub contents: Vec<u8>,
}

impl TemplateFile {
    /// Contents as text, `None` for binary files
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

/// Provides the files of a template tree such as `backend` or `frontend`
pub trait TemplateSource {
    /// Human-readable location of the templates
    fn describe(&self) -> String;

    /// Files of one tree, sorted by path
    fn files(&self, tree: &str) -> Result<Vec<TemplateFile>>;
}

/// Templates compiled into the binary
#[derive(Debug, Default)]
pub struct EmbeddedTemplates;

impl TemplateSource for EmbeddedTemplates {
    fn describe(&self) -> String {
        "built-in templates".to_string()
    }

    fn files(&self, tree: &str) -> Result<Vec<TemplateFile>> {
        let prefix = format!("{}/", tree);
        let mut files: Vec<TemplateFile> = Embedded::iter()
            .filter(|name| name.starts_with(&prefix))
            .filter_map(|name| {
                let file = Embedded::get(&name)?;
                Some(TemplateFile {
                    path: PathBuf::from(&name[prefix.len()..]),
                    origin: format!("templates/{}", name),
                    contents: file.data.into_owned(),
                })
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

/// Templates read from a directory on disk
#[derive(Debug)]
pub struct DirTemplates {
    root: PathBuf,
}

impl DirTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for DirTemplates {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn files(&self, tree: &str) -> Result<Vec<TemplateFile>> {
        let tree_root = self.root.join(tree);
        if !tree_root.is_dir() {
            return Err(eyre::eyre!(
                "Template directory not found: {}",
                tree_root.display()
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&tree_root).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", tree_root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let full_path = entry.path();
            let relative = full_path
                .strip_prefix(&tree_root)
                .with_context(|| format!("Unexpected path {}", full_path.display()))?;
            let contents = std::fs::read(full_path)
                .with_context(|| format!("Failed to read template {}", full_path.display()))?;

            files.push(TemplateFile {
                path: relative.to_path_buf(),
                origin: full_path.display().to_string(),
                contents,
            });
        }

        Ok(files)
    }
}

/// Pick the template source: an explicit directory or the built-in trees
pub fn resolve(dir: Option<&Path>) -> Box<dyn TemplateSource> {
    match dir {
        Some(dir) => {
            log::debug!("using templates from {}", dir.display());
            Box::new(DirTemplates::new(dir))
        }
        None => Box::new(EmbeddedTemplates),
    }
}
