//! Project loading.
//!
//! Turns a project location (a `tsconfig.json` or a directory) into a root
//! directory and the ordered list of source files to convert.

mod files;
pub mod tsconfig;

pub use files::collect_source_files;
pub use tsconfig::{Patterns, ResolvedConfig, TsConfig};

use crate::error::Error;
use std::path::{Path, PathBuf};

/// Config file looked up when the project is given as a directory.
pub const CONFIG_FILE: &str = "tsconfig.json";

/// Where to find the project.
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    /// Directory relative `project` paths resolve from.
    pub cwd: PathBuf,
    /// A config file or a project directory. `None` means `cwd`.
    pub project: Option<PathBuf>,
}

impl ProjectOptions {
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd, project: None }
    }

    #[must_use]
    pub fn with_project(mut self, project: impl Into<PathBuf>) -> Self {
        self.project = Some(project.into());
        self
    }

    fn target(&self) -> PathBuf {
        match &self.project {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.cwd.join(p),
            None => self.cwd.clone(),
        }
    }
}

/// A loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    root_dir: PathBuf,
    config_path: Option<PathBuf>,
    source_files: Vec<PathBuf>,
}

impl Project {
    /// Load the project described by `options`.
    ///
    /// Fails with [`Error::ProjectNotFound`] when no root directory can be
    /// determined; nothing on disk is touched in that case.
    pub fn load(options: &ProjectOptions) -> Result<Self, Error> {
        let target = options.target();
        let target = dunce::canonicalize(&target)
            .map_err(|_| Error::ProjectNotFound { start: target.clone() })?;

        let (root_dir, config_path) = if target.is_dir() {
            let config = target.join(CONFIG_FILE);
            let config = config.is_file().then_some(config);
            (target, config)
        } else {
            let root = target
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| Error::ProjectNotFound { start: target.clone() })?;
            (root, Some(target))
        };

        let config = match &config_path {
            Some(path) => tsconfig::load(path)?,
            None => ResolvedConfig::default(),
        };
        let source_files = collect_source_files(&root_dir, &config)?;

        Ok(Self {
            root_dir,
            config_path,
            source_files,
        })
    }

    /// Directory holding the config file (or the project directory).
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Absolute paths of all source files, sorted.
    #[must_use]
    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_directory_with_tsconfig() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("tool.ts"), "").unwrap();
        fs::write(dir.path().join("tsconfig.json"), r#"{ "include": ["src"] }"#).unwrap();

        let project = Project::load(&ProjectOptions::new(dir.path().to_path_buf())).unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        assert_eq!(project.root_dir(), root);
        assert_eq!(project.config_path(), Some(root.join("tsconfig.json").as_path()));
        assert_eq!(project.source_files(), [root.join("src/a.ts")]);
    }

    #[test]
    fn test_load_directory_without_tsconfig() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.ts"), "").unwrap();

        let project = Project::load(&ProjectOptions::new(dir.path().to_path_buf())).unwrap();
        assert!(project.config_path().is_none());
        assert_eq!(project.source_files().len(), 1);
    }

    #[test]
    fn test_load_config_file_relative_to_cwd() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/tsconfig.build.json"), "{}").unwrap();
        fs::write(dir.path().join("app/main.ts"), "").unwrap();

        let options =
            ProjectOptions::new(dir.path().to_path_buf()).with_project("app/tsconfig.build.json");
        let project = Project::load(&options).unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        assert_eq!(project.root_dir(), root.join("app"));
        assert_eq!(project.source_files(), [root.join("app/main.ts")]);
    }

    #[test]
    fn test_missing_project_is_fatal() {
        let dir = tempdir().unwrap();
        let options = ProjectOptions::new(dir.path().to_path_buf()).with_project("nope");
        let err = Project::load(&options).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound { .. }));
    }
}
