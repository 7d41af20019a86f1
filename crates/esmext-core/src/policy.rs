//! Path resolution policy.
//!
//! Decides the replacement for one specifier by probing the filesystem for
//! candidate source files in a fixed priority order. Probes are synchronous
//! and never cached: the tree is assumed not to change during a run.

use crate::specifier::{ModuleInfo, ALIAS_PREFIX};
use std::path::{Path, PathBuf};

/// Directory under the project root that `~/` points at.
const ALIAS_SOURCE_DIR: &str = "src";

/// Shape of a rewritten specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `<path>.js` for a `<path>.ts` module.
    Module,
    /// `<path>.jsx` for a `<path>.tsx` module.
    Component,
    /// `<path>/index.js` for a directory with `index.ts`.
    Index,
    /// `<path>/index.jsx` for a directory with `index.tsx`.
    IndexComponent,
    /// `<path>.json` plus a `type: 'json'` import attribute.
    Json,
}

impl Form {
    /// Suffix appended to the normalized specifier.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Module => ".js",
            Self::Component => ".jsx",
            Self::Index => "/index.js",
            Self::IndexComponent => "/index.jsx",
            Self::Json => ".json",
        }
    }
}

/// A decided rewrite for one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub form: Form,
    /// New specifier value, without quotes.
    pub specifier: String,
}

impl Replacement {
    fn new(info: &ModuleInfo, form: Form) -> Self {
        Self {
            form,
            specifier: format!("{}{}", info.normalized, form.suffix()),
        }
    }

    /// Source text replacing the whole string literal, quoted with `quote`.
    #[must_use]
    pub fn render(&self, quote: char) -> String {
        match self.form {
            Form::Json => format!(
                "{quote}{}{quote} with {{ type: {quote}json{quote} }}",
                self.specifier
            ),
            _ => format!("{quote}{}{quote}", self.specifier),
        }
    }
}

/// Probe order under `<root>/src` for `~/` specifiers.
const ALIAS_CANDIDATES: &[(&str, Form)] = &[
    (".ts", Form::Module),
    (".tsx", Form::Component),
    ("/index.ts", Form::Index),
    ("/index.tsx", Form::IndexComponent),
];

/// Probe order next to the importing file.
///
/// Unlike [`ALIAS_CANDIDATES`], `index.tsx` is preferred over `index.ts`.
const RELATIVE_CANDIDATES: &[(&str, Form)] = &[
    (".ts", Form::Module),
    (".tsx", Form::Component),
    ("/index.tsx", Form::IndexComponent),
    ("/index.ts", Form::Index),
];

/// Decide the replacement for `info`, or `None` to leave it untouched.
///
/// Every candidate path probed without a match is appended to `tried`.
#[must_use]
pub fn create_replacement(
    root_dir: &Path,
    info: &ModuleInfo,
    has_attribute_clause: bool,
    tried: &mut Vec<PathBuf>,
) -> Option<Replacement> {
    if has_attribute_clause || !info.is_relative {
        return None;
    }

    match info.extension.as_str() {
        ".json" => Some(Replacement::new(info, Form::Json)),
        "" => {
            if let Some(rest) = info.normalized.strip_prefix(ALIAS_PREFIX) {
                let base = root_dir.join(ALIAS_SOURCE_DIR);
                probe(info, &base, rest, ALIAS_CANDIDATES, tried)
            } else {
                probe(info, &info.directory, &info.normalized, RELATIVE_CANDIDATES, tried)
            }
        }
        _ => None,
    }
}

/// Return the form of the first candidate that exists as a file.
fn probe(
    info: &ModuleInfo,
    base: &Path,
    path: &str,
    candidates: &[(&str, Form)],
    tried: &mut Vec<PathBuf>,
) -> Option<Replacement> {
    for (suffix, form) in candidates {
        let candidate = base.join(format!("{path}{suffix}"));
        if candidate.is_file() {
            return Some(Replacement::new(info, *form));
        }
        tried.push(candidate);
    }
    None
}
