//! Source rewriting for [`tagfmt`] templates.
//!
//! A template source is a list of rust statements. Somewhere in it, a labeled block marks the
//! template body:
//!
//! ```text
//! let more_data = "DATA";
//!
//! 'template: {
//!     format!("<header>{more_data} {}</header>", || greeting)
//! }
//! ```
//!
//! # Pipeline
//!
//! ```custom
//! &str -> SourceFile -> (tag pass, label pass) -> Program
//! ```
//!
//! - [`SourceFile`] parses the statements with `syn`, and validates every template macro body
//!   (format string and arguments).
//! - [`transform::tag_templates`] rewrites untagged `format!` into the configured tag macro.
//! - [`transform::return_label`] replaces the labeled block with a `return`.
//! - [`Program`] holds the rewritten statements and its parameters, free identifiers that must
//!   be bound by the caller.
//!
//! [`tagfmt`]: <https://docs.rs/tagfmt>
//! [`SourceFile`]: file::SourceFile
//! [`Program`]: program::Program

pub mod syntax;
pub mod common;
mod error;

// ===== Input =====
pub mod config;

// ===== Data =====
pub mod file;
pub mod transform;
pub mod params;

// ===== Output =====
pub mod program;
pub mod codegen;

pub use error::{ConfigError, Error, ParseError, Result};

/// Parse and rewrite template source.
pub fn compile(source: &str, conf: &config::Config) -> Result<program::Program> {
    let file = file::SourceFile::parse(source, conf)?;
    program::Program::new(file, conf)
}
