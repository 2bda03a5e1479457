use crate::features::FeatureFlags;
use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const TAILWIND_CONFIG: &str = r#"/** @type {import('tailwindcss').Config} */
export default {
  content: ["./index.html", "./src/**/*.{js,jsx}"],
  theme: {
    extend: {},
  },
  plugins: [],
};
"#;

const POSTCSS_CONFIG: &str = r#"export default {
  plugins: {
    "@tailwindcss/postcss": {},
    autoprefixer: {},
  },
};
"#;

const TAILWIND_CSS: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n";

const ESLINT_CONFIG: &str = r#"import react from "eslint-plugin-react";
import reactHooks from "eslint-plugin-react-hooks";

export default [
  {
    files: ["src/**/*.{js,jsx}"],
    languageOptions: {
      ecmaVersion: "latest",
      sourceType: "module",
      parserOptions: { ecmaFeatures: { jsx: true } },
    },
    plugins: { react, "react-hooks": reactHooks },
    rules: {
      ...react.configs.recommended.rules,
      ...reactHooks.configs.recommended.rules,
      "react/react-in-jsx-scope": "off",
    },
    settings: { react: { version: "detect" } },
  },
];
"#;

const PRETTIER_CONFIG: &str = "{\n  \"semi\": true,\n  \"singleQuote\": false,\n  \"trailingComma\": \"all\"\n}\n";

const CSS_IMPORT: &str = "import \"./index.css\";\n";

/// Contents of the backend `.env` file
pub fn env_file(project_name: &str) -> String {
    format!(
        "PORT=5000\nMONGO_URI=mongodb://127.0.0.1:27017/{}\nJWT_SECRET=supersecretkey\n",
        project_name
    )
}

fn write(dir: &Path, relative: &str, contents: &str, written: &mut Vec<PathBuf>) -> Result<()> {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    written.push(PathBuf::from(relative));
    Ok(())
}

/// Files generated for the backend beyond its template
pub fn backend_extras(dir: &Path, project_name: &str, flags: &FeatureFlags) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if flags.is_enabled("dotenv") {
        write(dir, ".env", &env_file(project_name), &mut written)?;
    }

    Ok(written)
}

/// Files generated for the frontend beyond its template
pub fn frontend_extras(dir: &Path, flags: &FeatureFlags) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if flags.is_enabled("tailwind") {
        write(dir, "tailwind.config.js", TAILWIND_CONFIG, &mut written)?;
        write(dir, "postcss.config.js", POSTCSS_CONFIG, &mut written)?;
        write(dir, "src/index.css", TAILWIND_CSS, &mut written)?;

        if ensure_css_import(&dir.join("src").join("main.jsx"))? {
            written.push(PathBuf::from("src/main.jsx"));
        }
    }

    if flags.is_enabled("lint") {
        write(dir, "eslint.config.js", ESLINT_CONFIG, &mut written)?;
        write(dir, ".prettierrc", PRETTIER_CONFIG, &mut written)?;
    }

    Ok(written)
}

/// Prepend the stylesheet import to the entry module unless it already has one.
/// Returns true if the file was changed.
pub fn ensure_css_import(main_path: &Path) -> Result<bool> {
    if !main_path.exists() {
        log::warn!("{} not found, skipping stylesheet import", main_path.display());
        return Ok(false);
    }

    let content = fs::read_to_string(main_path)
        .with_context(|| format!("Failed to read {}", main_path.display()))?;

    if content.contains("index.css") {
        return Ok(false);
    }

    fs::write(main_path, format!("{}{}", CSS_IMPORT, content))
        .with_context(|| format!("Failed to write {}", main_path.display()))?;
    Ok(true)
}
