//! Specifier info parsing.
//!
//! Purely syntactic: no filesystem access happens here.

use std::path::{Path, PathBuf};

/// Prefix that resolves from `<root>/src` instead of the importing file.
pub const ALIAS_PREFIX: &str = "~/";

/// Markers that make a specifier relative.
const RELATIVE_PREFIXES: &[&str] = &["./", "../", ALIAS_PREFIX];

/// Extensions split off the final path segment, in match order.
///
/// `.ts`/`.tsx` are not listed: a specifier naming a source file is
/// not a rewrite target and keeps `extension == ""`.
const RECOGNIZED_EXTENSIONS: &[&str] = &[".json", ".js", ".jsx", ".mjs", ".cjs"];

/// Snapshot of one module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Specifier exactly as written, without quotes.
    pub declaration: String,
    /// Whether the specifier starts with `./`, `../` or `~/`.
    pub is_relative: bool,
    /// Directory of the file containing the specifier.
    pub directory: PathBuf,
    /// Specifier with any recognized extension stripped.
    pub normalized: String,
    /// Recognized extension (with the dot), or empty.
    pub extension: String,
}

impl ModuleInfo {
    /// Whether the normalized path uses the `~/` source-root alias.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.normalized.starts_with(ALIAS_PREFIX)
    }
}

/// Parse `specifier`, written in the file at `source_file`.
///
/// Never fails: anything unexpected degrades to `is_relative == false` or an
/// empty extension.
#[must_use]
pub fn parse_info(source_file: &Path, specifier: &str) -> ModuleInfo {
    let is_relative = RELATIVE_PREFIXES.iter().any(|p| specifier.starts_with(p));
    let directory = source_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let (normalized, extension) = split_extension(specifier);

    ModuleInfo {
        declaration: specifier.to_string(),
        is_relative,
        directory,
        normalized: normalized.to_string(),
        extension: extension.to_string(),
    }
}

/// Split a recognized extension off the last path segment.
fn split_extension(specifier: &str) -> (&str, &str) {
    let segment_start = specifier.rfind('/').map_or(0, |i| i + 1);
    let segment = &specifier[segment_start..];

    for ext in RECOGNIZED_EXTENSIONS {
        if let Some(stem) = segment.strip_suffix(ext) {
            // `.json` on its own is a dotfile name, not an extension
            if stem.is_empty() || stem.ends_with('.') {
                continue;
            }
            let split = specifier.len() - ext.len();
            return (&specifier[..split], &specifier[split..]);
        }
    }

    (specifier, "")
}
