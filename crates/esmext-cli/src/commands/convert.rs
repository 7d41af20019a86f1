//! `esmext` conversion command.
//!
//! Rewrites relative import/export specifiers of a project in place and
//! reports one line per modified file.

use esmext_core::{
    convert_with, ConvertObserver, ConvertSettings, ModuleDeclaration, ProjectOptions,
};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

/// Arguments of a conversion run.
#[derive(Debug)]
pub struct ConvertAction {
    pub cwd: PathBuf,
    pub project: Option<PathBuf>,
    pub debug: bool,
    pub dry_run: bool,
}

/// Console reporter: debug trace through `tracing`, modified files on stdout.
struct ConsoleObserver {
    dry_run: bool,
    /// Suppress human lines when the report goes to stdout as JSON.
    quiet: bool,
}

impl ConvertObserver for ConsoleObserver {
    fn file_checked(&mut self, path: &Path) {
        tracing::debug!("Checking: {}", path.display());
    }

    fn probe_missed(&mut self, candidate: &Path) {
        tracing::debug!("  not found: {}", candidate.display());
    }

    fn no_replacement(&mut self, _path: &Path, specifier: &str) {
        tracing::debug!("  no replacement: {specifier}");
    }

    fn specifier_rewritten(&mut self, path: &Path, declaration: &ModuleDeclaration, to: &str) {
        tracing::trace!(
            file = %path.display(),
            line = declaration.line,
            kind = declaration.kind.as_str(),
            "  {} -> {to}",
            declaration.specifier.value
        );
    }

    fn file_modified(&mut self, path: &Path) {
        if self.quiet {
            return;
        }
        if self.dry_run {
            println!("Would modify: {}", path.display());
        } else {
            println!("Modified: {}", path.display());
        }
    }
}

/// Run the conversion.
pub fn run(action: ConvertAction, json: bool) -> Result<()> {
    let mut options = ProjectOptions::new(action.cwd);
    if let Some(project) = action.project {
        options = options.with_project(project);
    }

    let settings = ConvertSettings {
        debug_logging: action.debug,
        dry_run: action.dry_run,
    };
    let mut observer = ConsoleObserver {
        dry_run: action.dry_run,
        quiet: json,
    };

    let report = convert_with(&options, settings, &mut observer).into_diagnostic()?;

    if json {
        println!("{}", serde_json::to_string(&report).into_diagnostic()?);
    } else {
        tracing::info!(
            files_checked = report.files_checked,
            files_modified = report.files_modified.len(),
            specifiers_rewritten = report.specifiers_rewritten,
            "conversion finished"
        );
    }

    Ok(())
}
