use crate::features::{Feature, FeatureFlags, FeatureRegistry};
use crate::scaffold::validate_project_name;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use eyre::{Context, Result};

/// Source of answers to the scaffolding questions
pub trait Prompter {
    fn project_name(&self, default: &str) -> Result<String>;

    fn confirm(&self, feature: &Feature) -> Result<bool>;
}

/// Asks on the terminal
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Prompter for TerminalPrompter {
    fn project_name(&self, default: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt("Project name?")
            .default(default.to_string())
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                validate_project_name(input).map_err(|e| e.to_string())
            })
            .interact_text()
            .context("Failed to read project name")
    }

    fn confirm(&self, feature: &Feature) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(feature.prompt)
            .default(feature.default)
            .interact()
            .with_context(|| format!("Failed to read answer for '{}'", feature.id))
    }
}

/// Answers every question with its default
#[derive(Debug, Default)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn project_name(&self, default: &str) -> Result<String> {
        Ok(default.to_string())
    }

    fn confirm(&self, feature: &Feature) -> Result<bool> {
        Ok(feature.default)
    }
}

/// Build the full flag set: preset answers win, features of a disabled target
/// are switched off without asking, everything else goes to the prompter.
pub fn resolve_flags(registry: &FeatureRegistry, preset: &FeatureFlags, prompter: &dyn Prompter) -> Result<FeatureFlags> {
    let mut flags = FeatureFlags::new();

    for feature in registry.features() {
        let enabled = if let Some(value) = preset.get(feature.id) {
            value
        } else if !registry.is_applicable(feature, &flags) {
            false
        } else {
            prompter.confirm(feature)?
        };

        log::debug!("feature {} = {}", feature.id, enabled);
        flags.set(feature.id, enabled);
    }

    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Answers `true` to everything and records what was asked
    #[derive(Default)]
    struct RecordingPrompter {
        asked: RefCell<Vec<&'static str>>,
    }

    impl Prompter for RecordingPrompter {
        fn project_name(&self, _default: &str) -> Result<String> {
            Ok("recorded".to_string())
        }

        fn confirm(&self, feature: &Feature) -> Result<bool> {
            self.asked.borrow_mut().push(feature.id);
            Ok(true)
        }
    }

    #[test]
    fn test_defaults_prompter() {
        let registry = FeatureRegistry::builtin();
        let flags = resolve_flags(&registry, &FeatureFlags::new(), &DefaultsPrompter).unwrap();

        assert_eq!(flags, registry.default_flags());
        assert_eq!(DefaultsPrompter.project_name("app").unwrap(), "app");
    }

    #[test]
    fn test_preset_answers_are_not_asked() {
        let registry = FeatureRegistry::builtin();
        let mut preset = FeatureFlags::new();
        preset.set("lint", false);
        preset.set("cors", false);

        let prompter = RecordingPrompter::default();
        let flags = resolve_flags(&registry, &preset, &prompter).unwrap();

        let asked = prompter.asked.borrow();
        assert!(!asked.contains(&"lint"));
        assert!(!asked.contains(&"cors"));
        assert!(asked.contains(&"jwt"));
        assert_eq!(flags.get("cors"), Some(false));
        assert_eq!(flags.get("jwt"), Some(true));
    }

    #[test]
    fn test_disabled_backend_skips_backend_questions() {
        let registry = FeatureRegistry::builtin();
        let mut preset = FeatureFlags::new();
        preset.set("backend", false);

        let prompter = RecordingPrompter::default();
        let flags = resolve_flags(&registry, &preset, &prompter).unwrap();

        let asked = prompter.asked.borrow();
        for id in ["mongo", "dotenv", "cors", "jwt", "bcrypt", "morgan", "helmet"] {
            assert!(!asked.contains(&id), "{} should not be asked", id);
            assert_eq!(flags.get(id), Some(false));
        }
        assert!(asked.contains(&"tailwind"));
        assert_eq!(flags.iter().count(), registry.features().len());
    }
}
