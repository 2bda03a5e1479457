use crate::features::{FeatureFlags, FeatureRegistry, Target};
use eyre::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::Path;

/// Packages to install for one target directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyPlan {
    pub target: Target,
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

impl DependencyPlan {
    /// Collect packages of the target's own switch plus every enabled feature of that target
    pub fn for_target(registry: &FeatureRegistry, target: Target, flags: &FeatureFlags) -> Self {
        let mut dependencies = Vec::new();
        let mut dev_dependencies = Vec::new();

        for feature in registry.features() {
            let owns_target = feature.target == Target::Project && target.dir_name() == Some(feature.id);
            let belongs = owns_target || feature.target == target;

            if !belongs || !flags.is_enabled(feature.id) {
                continue;
            }

            push_unique(&mut dependencies, feature.packages);
            push_unique(&mut dev_dependencies, feature.dev_packages);
        }

        Self {
            target,
            dependencies,
            dev_dependencies,
        }
    }
}

fn push_unique(into: &mut Vec<String>, packages: &[&str]) {
    for package in packages {
        if !into.iter().any(|p| p == package) {
            into.push(package.to_string());
        }
    }
}

fn scripts(target: Target, flags: &FeatureFlags) -> Value {
    match target {
        Target::Backend => json!({
            "dev": "nodemon src/server.js",
            "start": "node src/server.js",
        }),
        Target::Frontend => {
            let mut scripts = json!({
                "dev": "vite",
                "build": "vite build",
                "preview": "vite preview",
            });
            if flags.is_enabled("lint") {
                scripts["lint"] = json!("eslint src");
                scripts["format"] = json!("prettier --write src");
            }
            scripts
        }
        Target::Project => json!({}),
    }
}

fn dependency_map(packages: &[String]) -> Map<String, Value> {
    packages
        .iter()
        .map(|p| (p.clone(), Value::String("latest".to_string())))
        .collect()
}

/// Merge `packages` into the object at `key`; versions already pinned are kept
fn merge_dependencies(manifest: &mut Map<String, Value>, key: &str, packages: &[String]) {
    if packages.is_empty() {
        return;
    }

    let entry = manifest
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    match entry {
        Value::Object(existing) => {
            for (name, version) in dependency_map(packages) {
                existing.entry(name).or_insert(version);
            }
        }
        other => *other = Value::Object(dependency_map(packages)),
    }
}

/// Build the `package.json` content for a target, starting from `existing` when the template has one
pub fn build_manifest(
    project_name: &str,
    plan: &DependencyPlan,
    flags: &FeatureFlags,
    existing: Option<Value>,
) -> Value {
    let mut manifest = match existing {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    manifest
        .entry("name")
        .or_insert_with(|| json!(format!("{}-{}", project_name, plan.target)));
    manifest.entry("version").or_insert_with(|| json!("0.1.0"));
    manifest.entry("private").or_insert_with(|| json!(true));
    manifest.entry("type").or_insert_with(|| json!("module"));
    manifest
        .entry("scripts")
        .or_insert_with(|| scripts(plan.target, flags));

    merge_dependencies(&mut manifest, "dependencies", &plan.dependencies);
    merge_dependencies(&mut manifest, "devDependencies", &plan.dev_dependencies);

    Value::Object(manifest)
}

/// Write or update `<dir>/package.json`
pub fn write_manifest(dir: &Path, project_name: &str, plan: &DependencyPlan, flags: &FeatureFlags) -> Result<()> {
    let path = dir.join("package.json");

    let existing = if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Some(
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
        )
    } else {
        None
    };

    let manifest = build_manifest(project_name, plan, flags, existing);
    let mut content = serde_json::to_string_pretty(&manifest).context("Failed to serialize package.json")?;
    content.push('\n');

    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("wrote {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn flags_with(overrides: &[(&str, bool)]) -> FeatureFlags {
        let mut flags = FeatureRegistry::builtin().default_flags();
        for (id, on) in overrides {
            flags.set(*id, *on);
        }
        flags
    }

    #[test]
    fn test_backend_plan_defaults() {
        let registry = FeatureRegistry::builtin();
        let plan = DependencyPlan::for_target(&registry, Target::Backend, &flags_with(&[]));

        assert_eq!(
            plan.dependencies,
            vec![
                "express",
                "express-async-handler",
                "express-validator",
                "mongoose",
                "dotenv",
                "cors",
                "jsonwebtoken",
                "bcryptjs",
                "morgan",
                "helmet"
            ]
        );
        assert_eq!(plan.dev_dependencies, vec!["nodemon"]);
    }

    #[test]
    fn test_backend_plan_minimal() {
        let registry = FeatureRegistry::builtin();
        let flags = flags_with(&[
            ("mongo", false),
            ("dotenv", false),
            ("cors", false),
            ("jwt", false),
            ("bcrypt", false),
            ("morgan", false),
            ("helmet", false),
        ]);
        let plan = DependencyPlan::for_target(&registry, Target::Backend, &flags);

        assert_eq!(plan.dependencies, vec!["express", "express-async-handler", "express-validator"]);
    }

    #[test]
    fn test_frontend_plan_with_lint() {
        let registry = FeatureRegistry::builtin();
        let flags = flags_with(&[("lint", true), ("tailwind", false), ("axios", false)]);
        let plan = DependencyPlan::for_target(&registry, Target::Frontend, &flags);

        assert_eq!(plan.dependencies, vec!["react", "react-dom", "react-router-dom"]);
        assert!(plan.dev_dependencies.contains(&"eslint".to_string()));
        assert!(plan.dev_dependencies.contains(&"vite".to_string()));
        assert!(!plan.dev_dependencies.contains(&"tailwindcss".to_string()));
    }

    #[test]
    fn test_plan_empty_when_target_disabled() {
        let registry = FeatureRegistry::builtin();
        let flags = flags_with(&[("backend", false)]);
        let plan = DependencyPlan::for_target(&registry, Target::Backend, &flags);

        // Backend features are still flagged on but the backend itself is off
        assert!(!plan.dependencies.contains(&"express".to_string()));
    }

    #[test]
    fn test_build_manifest_keeps_existing_pins() {
        let registry = FeatureRegistry::builtin();
        let flags = flags_with(&[]);
        let plan = DependencyPlan::for_target(&registry, Target::Backend, &flags);
        let existing = json!({
            "name": "custom",
            "dependencies": { "express": "^4.19.0" }
        });

        let manifest = build_manifest("shop", &plan, &flags, Some(existing));

        assert_eq!(manifest["name"], "custom");
        assert_eq!(manifest["dependencies"]["express"], "^4.19.0");
        assert_eq!(manifest["dependencies"]["cors"], "latest");
        assert_eq!(manifest["devDependencies"]["nodemon"], "latest");
        assert_eq!(manifest["scripts"]["dev"], "nodemon src/server.js");
    }

    #[test]
    fn test_write_manifest() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let registry = FeatureRegistry::builtin();
        let flags = flags_with(&[("lint", true)]);
        let plan = DependencyPlan::for_target(&registry, Target::Frontend, &flags);

        write_manifest(dir.path(), "shop", &plan, &flags).expect("Failed to write manifest");

        let written: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("package.json")).unwrap()).unwrap();
        assert_eq!(written["name"], "shop-frontend");
        assert_eq!(written["type"], "module");
        assert_eq!(written["scripts"]["lint"], "eslint src");
        assert_eq!(written["dependencies"]["react"], "latest");
    }
}
