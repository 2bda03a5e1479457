//! Project generation: templates, directive filtering, manifests and installs.
//!
//! Every step runs in order on the calling thread. All files are written
//! before the package manager is started.

pub mod extras;
pub mod install;
pub mod manifest;
pub mod render;

use crate::config::PackageManager;
use crate::features::{FeatureFlags, FeatureRegistry, Target};
use crate::templates::TemplateSource;
use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use install::{CommandInstaller, Installer};
pub use manifest::DependencyPlan;

const TARGETS: [Target; 2] = [Target::Backend, Target::Frontend];

/// What to generate and where
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub project_name: String,
    /// Directory the project directory is created in
    pub parent_dir: PathBuf,
    pub flags: FeatureFlags,
    pub package_manager: PackageManager,
    pub install: bool,
    pub force: bool,
}

/// Outcome of a scaffold run
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub project_name: String,
    pub project_dir: PathBuf,
    pub features: FeatureFlags,
    /// Generated files, relative to the project directory
    pub files: Vec<PathBuf>,
    pub dependencies: Vec<DependencyPlan>,
    pub installed: bool,
    pub next_steps: Vec<String>,
}

/// Drives a scaffold run
pub struct Scaffolder<'a> {
    registry: FeatureRegistry,
    templates: &'a dyn TemplateSource,
    installer: &'a dyn Installer,
    show_progress: bool,
}

impl<'a> Scaffolder<'a> {
    pub fn new(templates: &'a dyn TemplateSource, installer: &'a dyn Installer) -> Self {
        Self {
            registry: FeatureRegistry::builtin(),
            templates,
            installer,
            show_progress: false,
        }
    }

    /// Show a spinner while files are generated
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Generate the project described by `options`
    pub fn run(&self, options: &ScaffoldOptions) -> Result<ScaffoldReport> {
        validate_project_name(&options.project_name)?;

        let targets: Vec<Target> = TARGETS
            .into_iter()
            .filter(|t| t.dir_name().is_some_and(|name| options.flags.is_enabled(name)))
            .collect();
        if targets.is_empty() {
            return Err(eyre::eyre!(
                "Nothing to generate: both backend and frontend are disabled"
            ));
        }

        // Every tree is rendered before the project directory is touched
        let mut rendered = Vec::with_capacity(targets.len());
        for target in &targets {
            let files = self
                .render_target(*target, options)
                .with_context(|| format!("Failed to generate {}", target))?;
            rendered.push((*target, files));
        }

        let project_dir = options.parent_dir.join(&options.project_name);
        prepare_project_dir(&project_dir, options.force)?;

        let spinner = self.spinner()?;
        spinner.set_message(format!("Scaffolding {}...", options.project_name));

        let mut files = Vec::new();
        let mut dependencies = Vec::new();

        for (target, target_files) in &rendered {
            let generated = self
                .write_target(*target, &project_dir, target_files, options)
                .with_context(|| format!("Failed to write {}", target))?;
            files.extend(generated);
            dependencies.push(DependencyPlan::for_target(&self.registry, *target, &options.flags));
        }

        for plan in &dependencies {
            let dir = target_dir(&project_dir, plan.target);
            manifest::write_manifest(&dir, &options.project_name, plan, &options.flags)?;
            files.push(relative(plan.target, Path::new("package.json")));
        }

        files.sort();
        files.dedup();
        spinner.finish_with_message("Project structure created");

        if options.install {
            for plan in &dependencies {
                let dir = target_dir(&project_dir, plan.target);
                self.installer.install(&dir, &plan.dependencies, false)?;
                self.installer.install(&dir, &plan.dev_dependencies, true)?;
            }
        } else {
            log::info!("skipping dependency installation");
        }

        let next_steps = next_steps(options, &targets);

        Ok(ScaffoldReport {
            project_name: options.project_name.clone(),
            project_dir,
            features: options.flags.clone(),
            files,
            dependencies,
            installed: options.install,
            next_steps,
        })
    }

    fn render_target(&self, target: Target, options: &ScaffoldOptions) -> Result<Vec<render::RenderedFile>> {
        match target.dir_name() {
            Some(tree) => render::render_tree(self.templates, tree, &options.flags),
            None => Ok(Vec::new()),
        }
    }

    fn write_target(
        &self,
        target: Target,
        project_dir: &Path,
        rendered: &[render::RenderedFile],
        options: &ScaffoldOptions,
    ) -> Result<Vec<PathBuf>> {
        let dir = target_dir(project_dir, target);

        let mut written = render::write_files(&dir, rendered)?;
        log::debug!("wrote {} files into {}", written.len(), dir.display());

        let extra = match target {
            Target::Backend => extras::backend_extras(&dir, &options.project_name, &options.flags)?,
            Target::Frontend => extras::frontend_extras(&dir, &options.flags)?,
            Target::Project => Vec::new(),
        };
        written.extend(extra);

        Ok(written.into_iter().map(|path| relative(target, &path)).collect())
    }

    fn spinner(&self) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Ok(spinner)
    }
}

fn target_dir(project_dir: &Path, target: Target) -> PathBuf {
    match target.dir_name() {
        Some(name) => project_dir.join(name),
        None => project_dir.to_path_buf(),
    }
}

fn relative(target: Target, path: &Path) -> PathBuf {
    match target.dir_name() {
        Some(name) => Path::new(name).join(path),
        None => path.to_path_buf(),
    }
}

/// Project names become directory names; reject anything that is not a single path component
pub fn validate_project_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(eyre::eyre!("Project name must not be empty"));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(eyre::eyre!(
            "Invalid project name '{}': must be a plain directory name",
            name
        ));
    }
    if trimmed != name {
        return Err(eyre::eyre!(
            "Invalid project name '{}': leading or trailing whitespace",
            name
        ));
    }
    Ok(())
}

fn prepare_project_dir(dir: &Path, force: bool) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(eyre::eyre!("{} exists and is not a directory", dir.display()));
        }
        let non_empty = fs::read_dir(dir)
            .with_context(|| format!("Failed to read {}", dir.display()))?
            .next()
            .is_some();
        if non_empty && !force {
            return Err(eyre::eyre!(
                "Directory {} is not empty (use --force to generate into it anyway)",
                dir.display()
            ));
        }
    }

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

fn next_steps(options: &ScaffoldOptions, targets: &[Target]) -> Vec<String> {
    let mut steps = vec![format!("cd {}", options.project_name)];

    for target in targets {
        let Some(name) = target.dir_name() else {
            continue;
        };
        if options.install {
            steps.push(format!("cd {} && {}", name, options.package_manager.run_dev()));
        } else {
            steps.push(format!(
                "cd {} && {} install && {}",
                name,
                options.package_manager.program(),
                options.package_manager.run_dev()
            ));
        }
    }

    steps
}
