use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use std::io::IsTerminal;
use std::path::Path;

mod cli;
mod config;
mod directives;
mod features;
mod linter;
mod output;
mod prompt;
mod scaffold;
mod templates;

use cli::{Cli, Commands, OutputFormat};
use config::Config;
use features::{FeatureFlags, FeatureRegistry};
use linter::Checker;
use output::{get_formatter, CheckStats};
use prompt::{DefaultsPrompter, Prompter, TerminalPrompter};
use scaffold::{CommandInstaller, ScaffoldOptions, Scaffolder};

fn main() -> Result<()> {
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Apply CLI overrides to configuration
    apply_cli_overrides(&mut config, &cli)?;

    match &cli.command {
        Some(Commands::Features) => list_features(),
        Some(Commands::ShowConfig) => show_config(&config),
        Some(Commands::Render { file, output }) => render_file(&config, file, output.as_deref()),
        Some(Commands::Check { paths }) => check(&config, paths, &cli),
        None => create_project(&config, &cli),
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Apply CLI overrides to the configuration
fn apply_cli_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    let registry = FeatureRegistry::builtin();

    for id in cli.get_enabled_features() {
        registry.validate_id(&id)?;
        config.features.set(id, true);
    }

    for id in cli.get_disabled_features() {
        registry.validate_id(&id)?;
        config.features.set(id, false);
    }

    if let Some(templates) = &cli.templates {
        config.templates = Some(templates.clone());
    }

    if let Some(manager) = cli.package_manager {
        config.package_manager = manager;
    }

    if cli.no_install {
        config.install = false;
    }

    Ok(())
}

/// Preset answers layered over the feature defaults
fn effective_flags(config: &Config) -> FeatureFlags {
    let mut flags = FeatureRegistry::builtin().default_flags();
    for (id, enabled) in config.features.iter() {
        flags.set(id, enabled);
    }
    flags
}

fn template_source(config: &Config) -> Result<Box<dyn templates::TemplateSource>> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(templates::resolve(config.templates_dir(&cwd).as_deref()))
}

/// List all available features
fn list_features() -> Result<()> {
    let registry = FeatureRegistry::builtin();

    println!("Available features:");
    println!();

    for feature in registry.features() {
        println!("  {} [{}]", feature.id, feature.target);
        println!("    {}", feature.prompt);
        println!("    default: {}", if feature.default { "yes" } else { "no" });

        let packages: Vec<&str> = feature
            .packages
            .iter()
            .chain(feature.dev_packages.iter())
            .copied()
            .collect();
        if !packages.is_empty() {
            println!("    packages: {}", packages.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Show the effective configuration
fn show_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;

    println!("Effective configuration:");
    println!("{}", yaml);

    Ok(())
}

/// Filter one template file with the configured features
fn render_file(config: &Config, file: &Path, output: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read template {}", file.display()))?;

    let rendered = directives::filter(&content, &effective_flags(config))
        .with_context(|| format!("Failed to process template {}", file.display()))?;

    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Validate directives in templates
fn check(config: &Config, paths: &[std::path::PathBuf], cli: &Cli) -> Result<()> {
    let checker = Checker::new(&FeatureRegistry::builtin());

    let results = if paths.is_empty() {
        checker.check_source(template_source(config)?.as_ref())?
    } else {
        checker.check_paths(paths)?
    };

    let formatter = get_formatter(&cli.format);
    println!("{}", formatter.format_results(&results));

    let stats = CheckStats::from_results(&results);
    if cli.verbose {
        eprintln!("Checked {} files", stats.total_files);
    }

    if stats.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Ask the questions, generate the project, install dependencies
fn create_project(config: &Config, cli: &Cli) -> Result<()> {
    let interactive = !cli.yes && std::io::stdin().is_terminal();
    let human = cli.format == OutputFormat::Human;

    if human && interactive {
        eprintln!("{}", "\n Create MERN Stack App\n".cyan().bold());
    }

    let prompter: Box<dyn Prompter> = if interactive {
        Box::new(TerminalPrompter::default())
    } else {
        Box::new(DefaultsPrompter)
    };

    let project_name = match &cli.name {
        Some(name) => name.clone(),
        None => prompter.project_name(&config.project_name)?,
    };

    let registry = FeatureRegistry::builtin();
    let flags = prompt::resolve_flags(&registry, &config.features, prompter.as_ref())?;

    let options = ScaffoldOptions {
        project_name,
        parent_dir: std::env::current_dir().context("Failed to determine current directory")?,
        flags,
        package_manager: config.package_manager,
        install: config.install,
        force: cli.force,
    };

    let templates = template_source(config)?;
    log::debug!("using {}", templates.describe());

    let installer = CommandInstaller::new(config.package_manager);
    let scaffolder = Scaffolder::new(templates.as_ref(), &installer)
        .with_progress(human && std::io::stderr().is_terminal());

    let report = scaffolder.run(&options).context("Scaffolding failed")?;

    let formatter = get_formatter(&cli.format);
    println!("{}", formatter.format_report(&report));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackageManager;
    use std::path::PathBuf;

    #[test]
    fn test_apply_cli_overrides_features() {
        let mut config = Config::default();
        let cli = Cli {
            enable: vec!["lint".to_string()],
            disable: vec!["mongo,jwt".to_string()],
            ..Default::default()
        };

        apply_cli_overrides(&mut config, &cli).expect("Failed to apply overrides");

        assert_eq!(config.features.get("lint"), Some(true));
        assert_eq!(config.features.get("mongo"), Some(false));
        assert_eq!(config.features.get("jwt"), Some(false));
        assert_eq!(config.features.get("cors"), None);
    }

    #[test]
    fn test_apply_cli_overrides_rejects_unknown_feature() {
        let mut config = Config::default();
        let cli = Cli {
            enable: vec!["graphql".to_string()],
            ..Default::default()
        };

        let err = apply_cli_overrides(&mut config, &cli).unwrap_err();
        assert!(err.to_string().contains("graphql"));
    }

    #[test]
    fn test_apply_cli_overrides_install_and_templates() {
        let mut config = Config::default();
        let cli = Cli {
            no_install: true,
            package_manager: Some(PackageManager::Yarn),
            templates: Some(PathBuf::from("my-templates")),
            ..Default::default()
        };

        apply_cli_overrides(&mut config, &cli).expect("Failed to apply overrides");

        assert!(!config.install);
        assert_eq!(config.package_manager, PackageManager::Yarn);
        assert_eq!(config.templates, Some(PathBuf::from("my-templates")));
    }

    #[test]
    fn test_effective_flags_layer_over_defaults() {
        let mut config = Config::default();
        config.features.set("lint", true);
        config.features.set("cors", false);

        let flags = effective_flags(&config);

        assert_eq!(flags.get("lint"), Some(true));
        assert_eq!(flags.get("cors"), Some(false));
        assert_eq!(flags.get("jwt"), Some(true));
    }
}
