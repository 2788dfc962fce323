//! Template compilation errors.
use thiserror::Error;

/// [`Result`][std::result::Result] alias for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error that can occur while compiling template source.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Template source is not valid code.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Rust syntax error, reported verbatim.
    #[error(transparent)]
    Syn(#[from] syn::Error),
    /// Invalid format string or arguments in a template macro.
    #[error("{message}")]
    Format { message: String },
}

impl From<tagfmt_core::ParseError> for ParseError {
    fn from(value: tagfmt_core::ParseError) -> Self {
        Self::Format { message: value.to_string() }
    }
}

/// Template source or configuration does not describe a single template.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `'template: { .. }` block.
    #[error("template source has no `'{label}: {{ .. }}` block")]
    MissingLabel { label: String },
    /// More than one `'template: { .. }` block.
    #[error("template source must have a single `'{label}: {{ .. }}` block, found {count}")]
    DuplicateLabel { label: String, count: usize },
    /// Configured tag or label is not an identifier.
    #[error("`{name}` is not a valid identifier")]
    InvalidName { name: String },
}
