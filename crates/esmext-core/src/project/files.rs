//! Source file enumeration from `files` / `include` / `exclude`.

use super::tsconfig::{Patterns, ResolvedConfig};
use crate::error::Error;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// TypeScript source extensions, always part of the project.
const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// JavaScript extensions, part of the project with `allowJs`.
const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// Directories never entered by wildcard expansion.
const SKIP_DIRS: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Collect the project's source files under `root`, sorted and deduplicated.
pub fn collect_source_files(root: &Path, config: &ResolvedConfig) -> Result<Vec<PathBuf>, Error> {
    let allow_js = config.allow_js.unwrap_or(false);
    let mut files = BTreeSet::new();

    if let Some(explicit) = &config.files {
        for name in &explicit.patterns {
            let path = explicit.base.join(name);
            if !path.is_file() {
                return Err(Error::other(format!("File '{}' not found", path.display())));
            }
            files.insert(path);
        }
    }

    let include = match (&config.include, &config.files) {
        (Some(include), _) => include.clone(),
        (None, Some(_)) => return Ok(files.into_iter().collect()),
        (None, None) => Patterns {
            base: root.to_path_buf(),
            patterns: vec!["**/*".to_string()],
        },
    };
    let exclude = exclude_patterns(root, config);

    for raw in &include.patterns {
        let absolute = absolute_pattern(&include.base, raw);
        let Ok(pattern) = Pattern::new(&absolute) else {
            continue;
        };
        let walk_root = literal_prefix(&absolute);
        if !walk_root.exists() {
            continue;
        }

        for entry in WalkDir::new(&walk_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e, &exclude))
        {
            let entry = entry.map_err(|source| Error::Walk {
                root: walk_root.clone(),
                source,
            })?;
            let path = entry.path();
            if entry.file_type().is_file()
                && has_source_extension(path, allow_js)
                && pattern.matches_path_with(path, MATCH_OPTIONS)
            {
                files.insert(path.to_path_buf());
            }
        }
    }

    Ok(files.into_iter().collect())
}

/// Exclusions in effect: the configured ones, or the TypeScript defaults.
fn exclude_patterns(root: &Path, config: &ResolvedConfig) -> Vec<Pattern> {
    let mut raw: Vec<String> = match &config.exclude {
        Some(exclude) => exclude
            .patterns
            .iter()
            .map(|p| absolute_pattern(&exclude.base, p))
            .collect(),
        None => {
            let mut defaults: Vec<String> = SKIP_DIRS
                .iter()
                .map(|d| absolute_pattern(root, d))
                .collect();
            if let Some(out_dir) = &config.out_dir {
                defaults.push(escape_path(out_dir));
            }
            defaults
        }
    };

    // A directory pattern also covers everything below it
    let nested: Vec<String> = raw.iter().map(|p| format!("{p}/**/*")).collect();
    raw.extend(nested);
    raw.iter().filter_map(|p| Pattern::new(p).ok()).collect()
}

fn is_skipped(entry: &walkdir::DirEntry, exclude: &[Pattern]) -> bool {
    if entry.file_type().is_dir() {
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || SKIP_DIRS.contains(&&*name) {
            return true;
        }
    }
    exclude
        .iter()
        .any(|p| p.matches_path_with(entry.path(), MATCH_OPTIONS))
}

fn has_source_extension(path: &Path, allow_js: bool) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    TS_EXTENSIONS.contains(&ext) || (allow_js && JS_EXTENSIONS.contains(&ext))
}

/// Anchor `pattern` at `base`; a plain directory name means everything in it.
fn absolute_pattern(base: &Path, pattern: &str) -> String {
    let trimmed = pattern.trim_start_matches("./").trim_end_matches('/');
    let joined = escape_path(base);
    let has_wildcard = trimmed.contains(['*', '?', '[']);

    let mut absolute = if trimmed.is_empty() || trimmed == "." {
        joined
    } else {
        format!("{joined}/{trimmed}")
    };
    if !has_wildcard && Path::new(&absolute).is_dir() {
        absolute.push_str("/**/*");
    }
    absolute
}

/// Render a path as a glob that matches it literally.
fn escape_path(path: &Path) -> String {
    Pattern::escape(&path.to_string_lossy().replace('\\', "/"))
}

/// Longest leading run of path segments without wildcards.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    for segment in pattern.split('/') {
        if segment.contains(['*', '?', '[']) {
            break;
        }
        if segment.is_empty() {
            prefix.push("/");
        } else {
            prefix.push(segment);
        }
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
    }

    fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn root() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_default_include_all_ts() {
        let (_dir, root) = root();
        touch(&root, &["src/a.ts", "src/b.tsx", "src/c.js", "README.md", "lib/d.mts"]);

        let files = collect_source_files(&root, &ResolvedConfig::default()).unwrap();
        assert_eq!(relative(&root, files), ["lib/d.mts", "src/a.ts", "src/b.tsx"]);
    }

    #[test]
    fn test_allow_js() {
        let (_dir, root) = root();
        touch(&root, &["a.ts", "b.js", "c.jsx"]);

        let config = ResolvedConfig {
            allow_js: Some(true),
            ..Default::default()
        };
        let files = collect_source_files(&root, &config).unwrap();
        assert_eq!(relative(&root, files), ["a.ts", "b.js", "c.jsx"]);
    }

    #[test]
    fn test_skips_node_modules_and_hidden_dirs() {
        let (_dir, root) = root();
        touch(&root, &["a.ts", "node_modules/pkg/index.ts", ".cache/x.ts"]);

        let files = collect_source_files(&root, &ResolvedConfig::default()).unwrap();
        assert_eq!(relative(&root, files), ["a.ts"]);
    }

    #[test]
    fn test_include_directory_and_exclude_glob() {
        let (_dir, root) = root();
        touch(&root, &["src/a.ts", "src/a.test.ts", "scripts/b.ts"]);

        let config = ResolvedConfig {
            include: Some(Patterns {
                base: root.clone(),
                patterns: vec!["src".to_string()],
            }),
            exclude: Some(Patterns {
                base: root.clone(),
                patterns: vec!["**/*.test.ts".to_string()],
            }),
            ..Default::default()
        };
        let files = collect_source_files(&root, &config).unwrap();
        assert_eq!(relative(&root, files), ["src/a.ts"]);
    }

    #[test]
    fn test_out_dir_excluded_by_default() {
        let (_dir, root) = root();
        touch(&root, &["src/a.ts", "dist/a.d.ts"]);

        let config = ResolvedConfig {
            out_dir: Some(root.join("dist")),
            ..Default::default()
        };
        let files = collect_source_files(&root, &config).unwrap();
        assert_eq!(relative(&root, files), ["src/a.ts"]);
    }

    #[test]
    fn test_explicit_files_only() {
        let (_dir, root) = root();
        touch(&root, &["main.ts", "other.ts"]);

        let config = ResolvedConfig {
            files: Some(Patterns {
                base: root.clone(),
                patterns: vec!["main.ts".to_string()],
            }),
            ..Default::default()
        };
        let files = collect_source_files(&root, &config).unwrap();
        assert_eq!(relative(&root, files), ["main.ts"]);
    }

    #[test]
    fn test_missing_explicit_file() {
        let (_dir, root) = root();
        let config = ResolvedConfig {
            files: Some(Patterns {
                base: root.clone(),
                patterns: vec!["gone.ts".to_string()],
            }),
            ..Default::default()
        };
        assert!(collect_source_files(&root, &config).is_err());
    }

    #[test]
    fn test_literal_prefix() {
        assert_eq!(literal_prefix("/p/src/**/*"), PathBuf::from("/p/src"));
        assert_eq!(literal_prefix("/p/*.ts"), PathBuf::from("/p"));
    }
}
