use eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which part of the generated project a feature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Top-level switch (backend/frontend themselves)
    Project,
    /// Node + Express backend
    Backend,
    /// React + Vite frontend
    Frontend,
}

impl Target {
    /// Directory name of the target inside the generated project
    pub fn dir_name(&self) -> Option<&'static str> {
        match self {
            Target::Project => None,
            Target::Backend => Some("backend"),
            Target::Frontend => Some("frontend"),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Project => write!(f, "project"),
            Target::Backend => write!(f, "backend"),
            Target::Frontend => write!(f, "frontend"),
        }
    }
}

/// A yes/no option offered to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub id: &'static str,
    pub prompt: &'static str,
    pub default: bool,
    pub target: Target,
    /// npm packages added to `dependencies` when enabled
    pub packages: &'static [&'static str],
    /// npm packages added to `devDependencies` when enabled
    pub dev_packages: &'static [&'static str],
}

/// Feature name to enabled mapping handed to the directive filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, bool>);

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, feature: impl Into<String>, enabled: bool) {
        self.0.insert(feature.into(), enabled);
    }

    /// Value of a feature, `None` if it is not part of the mapping
    pub fn get(&self, feature: &str) -> Option<bool> {
        self.0.get(feature).copied()
    }

    /// Missing features count as disabled
    pub fn is_enabled(&self, feature: &str) -> bool {
        self.get(feature).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Ids of enabled features, in name order
    pub fn enabled(&self) -> Vec<&str> {
        self.iter().filter(|(_, on)| *on).map(|(k, _)| k).collect()
    }
}

impl FromIterator<(String, bool)> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The set of features the scaffolder knows about
pub struct FeatureRegistry {
    features: Vec<Feature>,
}

impl FeatureRegistry {
    /// Registry with the built-in MERN features
    pub fn builtin() -> Self {
        Self {
            features: builtin_features(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// All features in prompt order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.id).collect()
    }

    /// Flags with every feature at its default value
    pub fn default_flags(&self) -> FeatureFlags {
        self.features
            .iter()
            .map(|f| (f.id.to_string(), f.default))
            .collect()
    }

    /// Flags with every feature enabled, used to validate templates
    pub fn all_enabled(&self) -> FeatureFlags {
        self.features.iter().map(|f| (f.id.to_string(), true)).collect()
    }

    /// Fail with the list of valid ids if `id` is unknown
    pub fn validate_id(&self, id: &str) -> Result<()> {
        if self.get(id).is_some() {
            Ok(())
        } else {
            Err(eyre::eyre!(
                "Unknown feature '{}'. Valid features: {}",
                id,
                self.ids().join(", ")
            ))
        }
    }

    /// Whether a feature applies given the top-level switches already chosen
    pub fn is_applicable(&self, feature: &Feature, flags: &FeatureFlags) -> bool {
        match feature.target {
            Target::Project => true,
            Target::Backend => flags.is_enabled("backend"),
            Target::Frontend => flags.is_enabled("frontend"),
        }
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_features() -> Vec<Feature> {
    vec![
        Feature {
            id: "backend",
            prompt: "Include backend (Node + Express)?",
            default: true,
            target: Target::Project,
            packages: &["express", "express-async-handler", "express-validator"],
            dev_packages: &["nodemon"],
        },
        Feature {
            id: "frontend",
            prompt: "Include frontend (React + Vite)?",
            default: true,
            target: Target::Project,
            packages: &["react", "react-dom"],
            dev_packages: &["vite", "@vitejs/plugin-react"],
        },
        Feature {
            id: "mongo",
            prompt: "Use MongoDB (Mongoose)?",
            default: true,
            target: Target::Backend,
            packages: &["mongoose"],
            dev_packages: &[],
        },
        Feature {
            id: "dotenv",
            prompt: "Add .env support?",
            default: true,
            target: Target::Backend,
            packages: &["dotenv"],
            dev_packages: &[],
        },
        Feature {
            id: "cors",
            prompt: "Add CORS support?",
            default: true,
            target: Target::Backend,
            packages: &["cors"],
            dev_packages: &[],
        },
        Feature {
            id: "jwt",
            prompt: "Add JWT authentication boilerplate?",
            default: true,
            target: Target::Backend,
            packages: &["jsonwebtoken"],
            dev_packages: &[],
        },
        Feature {
            id: "bcrypt",
            prompt: "Add password hashing (bcrypt)?",
            default: true,
            target: Target::Backend,
            packages: &["bcryptjs"],
            dev_packages: &[],
        },
        Feature {
            id: "morgan",
            prompt: "Add request logging (morgan)?",
            default: true,
            target: Target::Backend,
            packages: &["morgan"],
            dev_packages: &[],
        },
        Feature {
            id: "helmet",
            prompt: "Add security headers (helmet)?",
            default: true,
            target: Target::Backend,
            packages: &["helmet"],
            dev_packages: &[],
        },
        Feature {
            id: "axios",
            prompt: "Add Axios in frontend?",
            default: true,
            target: Target::Frontend,
            packages: &["axios"],
            dev_packages: &[],
        },
        Feature {
            id: "router",
            prompt: "Add React Router DOM?",
            default: true,
            target: Target::Frontend,
            packages: &["react-router-dom"],
            dev_packages: &[],
        },
        Feature {
            id: "tailwind",
            prompt: "Add Tailwind CSS?",
            default: true,
            target: Target::Frontend,
            packages: &[],
            dev_packages: &["tailwindcss", "@tailwindcss/postcss", "postcss", "autoprefixer"],
        },
        Feature {
            id: "lint",
            prompt: "Add ESLint + Prettier?",
            default: false,
            target: Target::Frontend,
            packages: &[],
            dev_packages: &["eslint", "prettier", "eslint-plugin-react", "eslint-plugin-react-hooks"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_are_unique() {
        let registry = FeatureRegistry::builtin();
        let mut ids = registry.ids();
        let total = ids.len();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), total);
        assert_eq!(total, 13);
    }

    #[test]
    fn test_default_flags() {
        let flags = FeatureRegistry::builtin().default_flags();

        assert_eq!(flags.get("backend"), Some(true));
        assert_eq!(flags.get("lint"), Some(false));
        assert_eq!(flags.get("nope"), None);
    }

    #[test]
    fn test_validate_id() {
        let registry = FeatureRegistry::builtin();

        assert!(registry.validate_id("cors").is_ok());
        let err = registry.validate_id("graphql").unwrap_err();
        assert!(err.to_string().contains("graphql"));
        assert!(err.to_string().contains("cors"));
    }

    #[test]
    fn test_is_applicable() {
        let registry = FeatureRegistry::builtin();
        let mut flags = FeatureFlags::new();
        flags.set("backend", false);
        flags.set("frontend", true);

        let cors = registry.get("cors").unwrap();
        let axios = registry.get("axios").unwrap();
        let backend = registry.get("backend").unwrap();

        assert!(!registry.is_applicable(cors, &flags));
        assert!(registry.is_applicable(axios, &flags));
        assert!(registry.is_applicable(backend, &flags));
    }

    #[test]
    fn test_flags_enabled_and_serde() {
        let mut flags = FeatureFlags::new();
        flags.set("cors", true);
        flags.set("jwt", false);

        assert_eq!(flags.enabled(), vec!["cors"]);
        assert!(!flags.is_enabled("missing"));

        let yaml = serde_yaml::to_string(&flags).unwrap();
        let back: FeatureFlags = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, flags);
    }

    #[test]
    fn test_target_dir_name() {
        assert_eq!(Target::Backend.dir_name(), Some("backend"));
        assert_eq!(Target::Frontend.dir_name(), Some("frontend"));
        assert_eq!(Target::Project.dir_name(), None);
    }
}
