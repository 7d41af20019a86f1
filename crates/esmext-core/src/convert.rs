//! Project conversion.
//!
//! Walks every source file, runs each import/export specifier through
//! parse → policy → rewrite, and saves files that changed.

use crate::error::Error;
use crate::policy::create_replacement;
use crate::project::{Project, ProjectOptions};
use crate::source::{ModuleDeclaration, SourceFile};
use crate::specifier::parse_info;
use crate::version::REPORT_SCHEMA_VERSION;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How a conversion run behaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertSettings {
    /// Report visited files and unmatched probes to the observer.
    pub debug_logging: bool,
    /// Decide rewrites but never write files.
    pub dry_run: bool,
}

/// Receives progress from a conversion run.
///
/// The debug events (`file_checked`, `probe_missed`, `no_replacement`) are
/// only sent when [`ConvertSettings::debug_logging`] is set.
pub trait ConvertObserver {
    fn file_checked(&mut self, _path: &Path) {}
    fn probe_missed(&mut self, _candidate: &Path) {}
    fn no_replacement(&mut self, _path: &Path, _specifier: &str) {}
    fn specifier_rewritten(&mut self, _path: &Path, _declaration: &ModuleDeclaration, _to: &str) {}
    fn file_modified(&mut self, _path: &Path) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl ConvertObserver for NoopObserver {}

/// Outcome of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub schema_version: u32,
    pub root_dir: PathBuf,
    pub files_checked: usize,
    pub files_modified: Vec<PathBuf>,
    pub specifiers_rewritten: usize,
    pub dry_run: bool,
}

/// Convert the project described by `options`, saving modified files.
pub fn convert(options: &ProjectOptions, debug_logging: bool) -> Result<ConvertReport, Error> {
    let settings = ConvertSettings {
        debug_logging,
        dry_run: false,
    };
    convert_with(options, settings, &mut NoopObserver)
}

/// Convert with explicit settings, reporting progress to `observer`.
///
/// Files are saved one by one as soon as they are processed; an error
/// aborts the run and leaves earlier files rewritten.
pub fn convert_with(
    options: &ProjectOptions,
    settings: ConvertSettings,
    observer: &mut dyn ConvertObserver,
) -> Result<ConvertReport, Error> {
    let project = Project::load(options)?;
    let root_dir = project.root_dir();

    let mut report = ConvertReport {
        schema_version: REPORT_SCHEMA_VERSION,
        root_dir: root_dir.to_path_buf(),
        files_checked: 0,
        files_modified: Vec::new(),
        specifiers_rewritten: 0,
        dry_run: settings.dry_run,
    };

    for path in project.source_files() {
        if settings.debug_logging {
            observer.file_checked(path);
        }
        report.files_checked += 1;

        let mut file = SourceFile::read(path)?;
        let mut made_changes = false;

        for declaration in file.declarations() {
            if rewrite(root_dir, &mut file, &declaration, settings, observer) {
                report.specifiers_rewritten += 1;
                made_changes = true;
            }
        }

        if made_changes {
            if !settings.dry_run {
                file.save()?;
            }
            observer.file_modified(path);
            report.files_modified.push(path.clone());
        }
    }

    Ok(report)
}

/// Rewrite one declaration's specifier in `file` if the policy finds a
/// replacement. Returns whether the file changed.
pub fn rewrite(
    root_dir: &Path,
    file: &mut SourceFile,
    declaration: &ModuleDeclaration,
    settings: ConvertSettings,
    observer: &mut dyn ConvertObserver,
) -> bool {
    let literal = &declaration.specifier;
    let info = parse_info(file.path(), &literal.value);

    let mut tried = Vec::new();
    let replacement = create_replacement(root_dir, &info, declaration.has_attributes, &mut tried);

    let Some(replacement) = replacement else {
        if settings.debug_logging && info.is_relative && !declaration.has_attributes {
            for candidate in &tried {
                observer.probe_missed(candidate);
            }
            observer.no_replacement(file.path(), &info.declaration);
        }
        return false;
    };

    if !file.replace(literal, replacement.render(literal.quote)) {
        return false;
    }
    let path = file.path().to_path_buf();
    observer.specifier_rewritten(&path, declaration, &replacement.specifier);
    true
}
