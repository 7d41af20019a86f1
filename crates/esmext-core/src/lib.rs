#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Core of esmext.
//!
//! Rewrites extensionless relative import/export specifiers so that they name
//! an explicit file (`./b` → `./b.js`, `./c` → `./c/index.jsx`), as required by
//! native ESM loaders. Logging is left to the CLI crate; diagnostics leave this
//! crate through [`ConvertObserver`].

pub mod convert;
pub mod error;
pub mod policy;
pub mod project;
pub mod source;
pub mod specifier;
pub mod version;

pub use convert::{
    convert, convert_with, rewrite, ConvertObserver, ConvertReport, ConvertSettings,
    NoopObserver,
};
pub use error::Error;
pub use policy::{create_replacement, Form, Replacement};
pub use project::{Project, ProjectOptions};
pub use source::{scan_declarations, DeclarationKind, ModuleDeclaration, SourceFile, StringLiteral};
pub use specifier::{parse_info, ModuleInfo, ALIAS_PREFIX};
pub use version::VERSION;
