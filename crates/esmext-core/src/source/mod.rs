//! Source scanning and in-place editing.
//!
//! A lexical scanner finds import/export declarations without a full parse;
//! [`SourceFile`] holds the text and is the only place edits are applied.

mod document;
mod scan;

pub use document::SourceFile;
pub use scan::{scan_declarations, DeclarationKind, ModuleDeclaration, StringLiteral};
