use crate::directives;
use crate::features::FeatureFlags;
use crate::templates::TemplateSource;
use eyre::{Result, WrapErr};
use std::fs;
use std::path::{Path, PathBuf};

/// A file ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Filter every text file of `tree` against `flags`.
///
/// Binary files pass through untouched. A file whose directives remove all of
/// its content is dropped. The whole tree is rendered before anything is
/// written, so a broken template leaves no half-generated output behind.
pub fn render_tree(source: &dyn TemplateSource, tree: &str, flags: &FeatureFlags) -> Result<Vec<RenderedFile>> {
    let mut rendered = Vec::new();

    for file in source.files(tree)? {
        let Some(text) = file.text() else {
            log::debug!("copying binary template {}", file.origin);
            rendered.push(RenderedFile {
                path: file.path,
                contents: file.contents,
            });
            continue;
        };

        if !directives::has_directives(text) {
            rendered.push(RenderedFile {
                path: file.path,
                contents: file.contents,
            });
            continue;
        }

        let output = directives::filter(text, flags)
            .wrap_err_with(|| format!("Failed to process template {}", file.origin))?;

        if output.trim().is_empty() {
            log::debug!("skipping {}: no content left after filtering", file.origin);
            continue;
        }

        log::debug!("filtered {}", file.origin);
        rendered.push(RenderedFile {
            path: file.path,
            contents: output.into_bytes(),
        });
    }

    Ok(rendered)
}

/// Write rendered files under `dest`, returning their paths relative to `dest`
pub fn write_files(dest: &Path, files: &[RenderedFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let target = dest.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&target, &file.contents)
            .wrap_err_with(|| format!("Failed to write {}", target.display()))?;
        written.push(file.path.clone());
    }

    Ok(written)
}
