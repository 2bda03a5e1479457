use crate::config::PackageManager;
use eyre::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Installs npm packages into a generated directory
pub trait Installer {
    fn install(&self, dir: &Path, packages: &[String], dev: bool) -> Result<()>;
}

/// Runs the package manager as a child process and waits for it
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    manager: PackageManager,
}

impl CommandInstaller {
    pub fn new(manager: PackageManager) -> Self {
        Self { manager }
    }

    /// Program and arguments for one install invocation
    pub fn command_line(&self, packages: &[String], dev: bool) -> (String, Vec<String>) {
        let mut args: Vec<String> = self
            .manager
            .install_args(dev)
            .into_iter()
            .map(String::from)
            .collect();
        args.extend(packages.iter().cloned());
        (self.manager.program().to_string(), args)
    }
}

impl Installer for CommandInstaller {
    fn install(&self, dir: &Path, packages: &[String], dev: bool) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let (program, args) = self.command_line(packages, dev);
        let display = format!("{} {}", program, args.join(" "));
        log::info!("running `{}` in {}", display, dir.display());

        let status = Command::new(&program)
            .args(&args)
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("Failed to run `{}` (is {} installed?)", display, program))?;

        if !status.success() {
            return Err(eyre::eyre!(
                "`{}` failed in {} ({})",
                display,
                dir.display(),
                status
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Records install calls instead of running anything
    #[derive(Debug, Default)]
    pub struct RecordingInstaller {
        pub calls: RefCell<Vec<(PathBuf, Vec<String>, bool)>>,
    }

    impl Installer for RecordingInstaller {
        fn install(&self, dir: &Path, packages: &[String], dev: bool) -> Result<()> {
            if !packages.is_empty() {
                self.calls
                    .borrow_mut()
                    .push((dir.to_path_buf(), packages.to_vec(), dev));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_npm() {
        let installer = CommandInstaller::new(PackageManager::Npm);
        let (program, args) = installer.command_line(&["express".to_string(), "cors".to_string()], false);

        assert_eq!(program, "npm");
        assert_eq!(args, vec!["install", "express", "cors"]);
    }

    #[test]
    fn test_command_line_yarn_dev() {
        let installer = CommandInstaller::new(PackageManager::Yarn);
        let (program, args) = installer.command_line(&["nodemon".to_string()], true);

        assert_eq!(program, "yarn");
        assert_eq!(args, vec!["add", "--dev", "nodemon"]);
    }

    #[test]
    fn test_empty_package_list_is_noop() {
        // Would fail if it tried to spawn a nonexistent directory
        let installer = CommandInstaller::new(PackageManager::Npm);
        installer
            .install(Path::new("/does/not/exist"), &[], false)
            .expect("Empty install should not spawn");
    }
}
