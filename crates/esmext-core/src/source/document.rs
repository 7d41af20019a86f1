//! In-memory source file with deferred, span-based edits.

use super::scan::{scan_declarations, ModuleDeclaration, StringLiteral};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// A loaded source file.
///
/// Queries run against the original text; replacements are recorded and only
/// reach disk through [`SourceFile::save`].
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    edits: Vec<Edit>,
}

impl SourceFile {
    /// Read the file at `path`.
    pub fn read(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::new(path.to_path_buf(), text))
    }

    #[must_use]
    pub fn new(path: PathBuf, text: String) -> Self {
        Self {
            path,
            text,
            edits: Vec::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Original text, without pending edits.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Import and export declarations carrying a module specifier.
    #[must_use]
    pub fn declarations(&self) -> Vec<ModuleDeclaration> {
        scan_declarations(&self.text)
    }

    /// Replace the source text of `literal` with `text`.
    ///
    /// Each literal can be replaced once; later calls for the same span return
    /// `false` and change nothing.
    pub fn replace(&mut self, literal: &StringLiteral, text: impl Into<String>) -> bool {
        if literal.end > self.text.len() || literal.start >= literal.end {
            return false;
        }
        if self
            .edits
            .iter()
            .any(|e| e.start < literal.end && literal.start < e.end)
        {
            return false;
        }
        self.edits.push(Edit {
            start: literal.start,
            end: literal.end,
            text: text.into(),
        });
        true
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Text with all pending edits applied.
    #[must_use]
    pub fn render(&self) -> String {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by_key(|e| std::cmp::Reverse(e.start));

        let mut out = self.text.clone();
        for edit in edits {
            out.replace_range(edit.start..edit.end, &edit.text);
        }
        out
    }

    /// Write the edited text back to the original path.
    ///
    /// Goes through a temp file in the same directory and a rename, so the
    /// file holds either the old or the new contents. Permissions of the
    /// original file are kept.
    pub fn save(&self) -> io::Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let permissions = fs::metadata(&self.path)?.permissions();

        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(self.render().as_bytes())?;
        temp.as_file().sync_all()?;
        fs::set_permissions(temp.path(), permissions)?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn literal(source: &str, value: &str) -> StringLiteral {
        scan_declarations(source)
            .into_iter()
            .map(|d| d.specifier)
            .find(|s| s.value == value)
            .unwrap()
    }

    #[test]
    fn test_render_applies_edits_in_any_order() {
        let source = "import a from './a';\nimport b from './b';\n";
        let mut file = SourceFile::new(PathBuf::from("x.ts"), source.to_string());
        let b = literal(source, "./b");
        let a = literal(source, "./a");

        assert!(file.replace(&b, "'./b.js'"));
        assert!(file.replace(&a, "'./a/index.js'"));
        assert_eq!(
            file.render(),
            "import a from './a/index.js';\nimport b from './b.js';\n"
        );
    }

    #[test]
    fn test_replace_same_span_once() {
        let source = "export * from \"./x\";";
        let mut file = SourceFile::new(PathBuf::from("x.ts"), source.to_string());
        let x = literal(source, "./x");

        assert!(file.replace(&x, "\"./x.js\""));
        assert!(!file.replace(&x, "\"./x.jsx\""));
        assert_eq!(file.render(), "export * from \"./x.js\";");
    }

    #[test]
    fn test_unmodified_renders_original() {
        let source = "import a from 'lodash';";
        let file = SourceFile::new(PathBuf::from("x.ts"), source.to_string());
        assert!(!file.is_modified());
        assert_eq!(file.render(), source);
    }

    #[test]
    fn test_save_overwrites_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "import b from './b';\n").unwrap();

        let mut file = SourceFile::read(&path).unwrap();
        let decl = file.declarations().remove(0);
        file.replace(&decl.specifier, "'./b.js'");
        file.save().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "import b from './b.js';\n");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "import b from './b';\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut file = SourceFile::read(&path).unwrap();
        let decl = file.declarations().remove(0);
        file.replace(&decl.specifier, "'./b.js'");
        file.save().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
