use crate::config::PackageManager;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON format for machine processing
    Json,
}

/// Command-line interface for the MERN project scaffolder
#[derive(Parser)]
#[command(
    name = "create-mern-app",
    about = "Scaffold a MERN stack project from feature-gated templates",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Name of the project directory to create
    #[arg(help = "Project name (prompted for when omitted)")]
    pub name: Option<String>,

    /// Accept defaults for every question that is not preset
    #[arg(short, long, help = "Accept default answers without prompting")]
    pub yes: bool,

    /// Enable features
    #[arg(long, global = true, help = "Enable features (comma-separated)")]
    pub enable: Vec<String>,

    /// Disable features
    #[arg(long, global = true, help = "Disable features (comma-separated)")]
    pub disable: Vec<String>,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    /// Template directory override
    #[arg(long, global = true, help = "Directory containing backend/ and frontend/ templates")]
    pub templates: Option<PathBuf>,

    /// Package manager override
    #[arg(long, value_enum, help = "Package manager used to install dependencies")]
    pub package_manager: Option<PackageManager>,

    /// Skip dependency installation
    #[arg(long, help = "Generate files only, do not install dependencies")]
    pub no_install: bool,

    /// Allow generating into a non-empty directory
    #[arg(long, help = "Generate into an existing non-empty directory")]
    pub force: bool,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the available features and their defaults
    Features,
    /// Show the effective configuration and exit
    ShowConfig,
    /// Filter a single template file and print the result
    Render {
        /// Template file to filter
        file: PathBuf,
        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate the directives in template files
    Check {
        /// Files or directories to check (defaults to the active templates)
        paths: Vec<PathBuf>,
    },
}

impl Cli {
    /// Parse enabled features from comma-separated strings
    pub fn get_enabled_features(&self) -> Vec<String> {
        split_list(&self.enable)
    }

    /// Parse disabled features from comma-separated strings
    pub fn get_disabled_features(&self) -> Vec<String> {
        split_list(&self.disable)
    }
}

fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|s| s.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Provide a default implementation for testing
impl Default for Cli {
    fn default() -> Self {
        Self {
            command: None,
            name: None,
            yes: false,
            enable: Vec::new(),
            disable: Vec::new(),
            config: None,
            templates: None,
            package_manager: None,
            no_install: false,
            force: false,
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Human);
    }

    #[test]
    fn test_get_enabled_features() {
        let cli = Cli {
            enable: vec!["cors,jwt".to_string(), " lint ".to_string(), ",".to_string()],
            ..Default::default()
        };

        assert_eq!(cli.get_enabled_features(), vec!["cors", "jwt", "lint"]);
    }

    #[test]
    fn test_get_disabled_features() {
        let cli = Cli {
            disable: vec!["mongo".to_string()],
            ..Default::default()
        };

        assert_eq!(cli.get_disabled_features(), vec!["mongo"]);
    }

    #[test]
    fn test_parse_scaffold_args() {
        let cli = Cli::try_parse_from([
            "create-mern-app",
            "shop",
            "--yes",
            "--disable",
            "mongo,jwt",
            "--package-manager",
            "pnpm",
            "--no-install",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.name.as_deref(), Some("shop"));
        assert!(cli.yes);
        assert!(cli.no_install);
        assert_eq!(cli.package_manager, Some(PackageManager::Pnpm));
        assert_eq!(cli.get_disabled_features(), vec!["mongo", "jwt"]);
    }

    #[test]
    fn test_parse_render_subcommand() {
        let cli = Cli::try_parse_from(["create-mern-app", "render", "app.js", "--enable", "cors"]).unwrap();

        match &cli.command {
            Some(Commands::Render { file, output }) => {
                assert_eq!(*file, PathBuf::from("app.js"));
                assert!(output.is_none());
            }
            other => panic!("Expected Render command, got: {:?}", other),
        }
        assert_eq!(cli.get_enabled_features(), vec!["cors"]);
    }

    #[test]
    fn test_parse_check_subcommand() {
        let cli = Cli::try_parse_from(["create-mern-app", "check", "a", "b", "-f", "json"]).unwrap();

        assert!(matches!(cli.command, Some(Commands::Check { ref paths }) if paths.len() == 2));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
