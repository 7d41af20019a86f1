//! `tsconfig.json` loading.
//!
//! Handles JSONC (comments, trailing commas) and `extends` chains. Only the
//! fields that decide the file set are kept.

use crate::error::Error;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Raw `tsconfig.json` contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    pub extends: Option<Extends>,
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

/// `extends` is a single path or, since TypeScript 5.0, a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    fn paths(&self) -> Vec<&str> {
        match self {
            Self::One(p) => vec![p.as_str()],
            Self::Many(ps) => ps.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub allow_js: Option<bool>,
    pub out_dir: Option<String>,
}

/// Patterns together with the directory they are relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patterns {
    pub base: PathBuf,
    pub patterns: Vec<String>,
}

/// A config with its `extends` chain applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub files: Option<Patterns>,
    pub include: Option<Patterns>,
    pub exclude: Option<Patterns>,
    pub allow_js: Option<bool>,
    pub out_dir: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Overlay `child` on `self`; set fields of the child win.
    fn merge(self, child: Self) -> Self {
        Self {
            files: child.files.or(self.files),
            include: child.include.or(self.include),
            exclude: child.exclude.or(self.exclude),
            allow_js: child.allow_js.or(self.allow_js),
            out_dir: child.out_dir.or(self.out_dir),
        }
    }
}

/// Parse JSONC config text.
pub fn parse_tsconfig(path: &Path, content: &str) -> Result<TsConfig, Error> {
    json5::from_str(content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse a config file.
pub fn read_tsconfig(path: &Path) -> Result<TsConfig, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tsconfig(path, &content)
}

/// Load `path` and everything it extends.
pub fn load(path: &Path) -> Result<ResolvedConfig, Error> {
    resolve_extends_chain(path, &mut HashSet::new())
}

fn resolve_extends_chain(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<ResolvedConfig, Error> {
    let canonical = dunce::canonicalize(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    if !visited.insert(canonical.clone()) {
        return Err(Error::ExtendsCycle { path: canonical });
    }

    let config = read_tsconfig(&canonical)?;
    let dir = canonical.parent().unwrap_or(Path::new("/")).to_path_buf();

    let mut resolved = ResolvedConfig::default();
    if let Some(extends) = &config.extends {
        for spec in extends.paths() {
            let parent_path = locate_extended(&dir, spec)?;
            let parent = resolve_extends_chain(&parent_path, visited)?;
            resolved = resolved.merge(parent);
        }
    }

    visited.remove(&canonical);
    Ok(resolved.merge(own_settings(&dir, config)))
}

/// Settings declared directly in one config file, anchored at `dir`.
fn own_settings(dir: &Path, config: TsConfig) -> ResolvedConfig {
    let anchor = |patterns: Option<Vec<String>>| {
        patterns.map(|patterns| Patterns {
            base: dir.to_path_buf(),
            patterns,
        })
    };

    ResolvedConfig {
        files: anchor(config.files),
        include: anchor(config.include),
        exclude: anchor(config.exclude),
        allow_js: config.compiler_options.allow_js,
        out_dir: config.compiler_options.out_dir.map(|o| dir.join(o)),
    }
}

/// Find the file an `extends` entry points at.
///
/// Relative and absolute paths resolve from the extending config, trying the
/// path as written and then with `.json` appended; anything else is looked up
/// in `node_modules` directories from `dir` upwards.
fn locate_extended(dir: &Path, spec: &str) -> Result<PathBuf, Error> {
    if spec.starts_with('.') || Path::new(spec).is_absolute() {
        let path = dir.join(spec);
        if path.is_file() {
            return Ok(path);
        }
        // a path missing both ways fails when it is read
        return Ok(json_suffixed(&path).unwrap_or(path));
    }

    for ancestor in dir.ancestors() {
        let base = ancestor.join("node_modules").join(spec);
        let candidates = [
            Some(base.clone()),
            json_suffixed(&base),
            Some(base.join("tsconfig.json")),
        ];
        for candidate in candidates.into_iter().flatten() {
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(Error::ConfigRead {
        path: dir.join(spec),
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("extended config '{spec}' not found"),
        ),
    })
}

/// `path` with `.json` appended, unless it already ends in `.json`.
fn json_suffixed(path: &Path) -> Option<PathBuf> {
    if path.extension().is_some_and(|e| e == "json") {
        return None;
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".json");
    Some(PathBuf::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_jsonc() {
        let content = r#"{
  // line comment
  "compilerOptions": { "allowJs": true, "outDir": "dist", },
  /* block */
  "include": ["src"],
}"#;
        let config = parse_tsconfig(Path::new("tsconfig.json"), content).unwrap();
        assert_eq!(config.include, Some(vec!["src".to_string()]));
        assert_eq!(config.compiler_options.allow_js, Some(true));
        assert_eq!(config.compiler_options.out_dir.as_deref(), Some("dist"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse_tsconfig(Path::new("/p/tsconfig.json"), "{ include: [").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("/p/tsconfig.json"));
    }

    #[test]
    fn test_extends_child_overrides_parent() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("configs")).unwrap();
        fs::write(
            dir.path().join("configs/base.json"),
            r#"{ "include": ["lib"], "exclude": ["gen"], "compilerOptions": { "allowJs": true, "outDir": "out" } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "extends": "./configs/base", "include": ["src"] }"#,
        )
        .unwrap();

        let resolved = load(&dir.path().join("tsconfig.json")).unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();

        let include = resolved.include.unwrap();
        assert_eq!(include.patterns, vec!["src".to_string()]);
        assert_eq!(include.base, root);

        // inherited settings stay anchored at the file declaring them
        let exclude = resolved.exclude.unwrap();
        assert_eq!(exclude.base, root.join("configs"));
        assert_eq!(resolved.allow_js, Some(true));
        assert_eq!(resolved.out_dir, Some(root.join("configs/out")));
    }

    #[test]
    fn test_extends_dotted_name_gets_json_suffix() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tsconfig.base.json"),
            r#"{ "compilerOptions": { "allowJs": true } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "extends": "./tsconfig.base" }"#,
        )
        .unwrap();

        let resolved = load(&dir.path().join("tsconfig.json")).unwrap();
        assert_eq!(resolved.allow_js, Some(true));
    }

    #[test]
    fn test_extends_path_as_written_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("base"), r#"{ "compilerOptions": { "allowJs": true } }"#).unwrap();
        fs::write(dir.path().join("tsconfig.json"), r#"{ "extends": "./base" }"#).unwrap();

        let resolved = load(&dir.path().join("tsconfig.json")).unwrap();
        assert_eq!(resolved.allow_js, Some(true));
    }

    #[test]
    fn test_extends_from_node_modules() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/@tsconfig/strict");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("tsconfig.json"), r#"{ "compilerOptions": { "allowJs": true } }"#).unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "extends": "@tsconfig/strict" }"#,
        )
        .unwrap();

        let resolved = load(&dir.path().join("tsconfig.json")).unwrap();
        assert_eq!(resolved.allow_js, Some(true));
    }

    #[test]
    fn test_extends_list_applies_in_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "compilerOptions": { "allowJs": true } }"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "compilerOptions": { "allowJs": false } }"#).unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{ "extends": ["./a.json", "./b.json"] }"#,
        )
        .unwrap();

        let resolved = load(&dir.path().join("tsconfig.json")).unwrap();
        assert_eq!(resolved.allow_js, Some(false));
    }

    #[test]
    fn test_extends_cycle() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();

        let err = load(&dir.path().join("a.json")).unwrap_err();
        assert!(matches!(err, Error::ExtendsCycle { .. }));
    }

    #[test]
    fn test_missing_extended_config() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tsconfig.json"), r#"{ "extends": "nope" }"#).unwrap();
        let err = load(&dir.path().join("tsconfig.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
