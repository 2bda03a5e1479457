use crate::features::{FeatureFlags, FeatureRegistry};
use clap::ValueEnum;
use eyre::{Context, ContextCompat, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Package manager used to install dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    /// Executable name
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Arguments that add packages, before the package list
    pub fn install_args(&self, dev: bool) -> Vec<&'static str> {
        match (self, dev) {
            (PackageManager::Npm, false) => vec!["install"],
            (PackageManager::Npm, true) => vec!["install", "--save-dev"],
            (PackageManager::Pnpm, false) => vec!["add"],
            (PackageManager::Pnpm, true) => vec!["add", "--save-dev"],
            (PackageManager::Yarn, false) => vec!["add"],
            (PackageManager::Yarn, true) => vec!["add", "--dev"],
        }
    }

    /// Command shown in the "next steps" hint
    pub fn run_dev(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm run dev",
            PackageManager::Pnpm => "pnpm dev",
            PackageManager::Yarn => "yarn dev",
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Scaffolder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Default project name offered at the prompt
    pub project_name: String,
    /// Package manager used for installs
    pub package_manager: PackageManager,
    /// Whether to run the package manager after generating files
    pub install: bool,
    /// Directory holding `backend/` and `frontend/` templates instead of the built-in ones
    pub templates: Option<PathBuf>,
    /// Preset answers; features listed here are not prompted for
    pub features: FeatureFlags,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path.clone(),
            None => Self::default_config_path()?,
        };

        if config_file.exists() {
            log::debug!("loading config from {}", config_file.display());

            let content = fs::read_to_string(&config_file).with_context(|| {
                format!("Failed to read config file: {}", config_file.display())
            })?;

            let config: Config = serde_yaml::from_str(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_file.display())
            })?;

            config.validate().with_context(|| {
                format!("Invalid config file: {}", config_file.display())
            })?;

            Ok(config)
        } else if config_path.is_some() {
            Err(eyre::eyre!("Config file not found: {}", config_file.display()))
        } else {
            log::debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> Result<PathBuf> {
        let candidates = vec![
            PathBuf::from(".create-mern-app.yaml"),
            PathBuf::from(".create-mern-app.yml"),
        ];

        for candidate in candidates {
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        let config_dir = dirs::config_local_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .context("Could not determine config directory")?;

        Ok(config_dir.join("create-mern-app").join("config.yaml"))
    }

    /// Reject preset answers for features that do not exist
    pub fn validate(&self) -> Result<()> {
        let registry = FeatureRegistry::builtin();
        for (id, _) in self.features.iter() {
            registry.validate_id(id)?;
        }
        Ok(())
    }

    /// Template directory override, resolved against `base` when relative
    pub fn templates_dir(&self, base: &Path) -> Option<PathBuf> {
        self.templates.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                base.join(dir)
            }
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: "mern-stack-app".to_string(),
            package_manager: PackageManager::Npm,
            install: true,
            templates: None,
            features: FeatureFlags::new(),
        }
    }
}
