use std::io;
use thiserror::Error;

pub use tagfmt_parser::{ConfigError, ParseError};

/// [`Result`][std::result::Result] alias for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error that can occur during compiling or rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// Template source is not valid.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Template source does not have exactly one labeled block.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Evaluating template failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An error raised while evaluating a template.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("cannot find value `{name}` in this scope")]
    Unbound { name: String },
    #[error("`{name}` is not a function, found {found}")]
    NotCallable { name: String, found: &'static str },
    #[error("expected {expected}, found {found}")]
    Type { expected: &'static str, found: &'static str },
    #[error("no method `{method}` found for {ty}")]
    NoMethod { method: String, ty: &'static str },
    /// Tag received fragments and values that do not interleave.
    #[error("tag received {fragments} fragments for {values} values, expected {}", .values + 1)]
    Arity { fragments: usize, values: usize },
    /// Closure calls nested deeper than `limit`.
    #[error("recursion limit of {limit} nested calls reached")]
    RecursionLimit { limit: usize },
    #[error("unsupported {0} in template")]
    Unsupported(String),
    /// Error from a native function.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Convert error to [`io::Error`].
    ///
    /// Errors other than [`Error::Io`] will become [`io::ErrorKind::InvalidData`].
    pub fn into_io(self) -> io::Error {
        match self {
            Error::Io(error) => error,
            err => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}

impl From<tagfmt_parser::Error> for Error {
    fn from(value: tagfmt_parser::Error) -> Self {
        match value {
            tagfmt_parser::Error::Parse(err) => Self::Parse(err),
            tagfmt_parser::Error::Config(err) => Self::Config(err),
        }
    }
}

impl From<syn::Error> for Error {
    fn from(value: syn::Error) -> Self {
        Self::Parse(ParseError::Syn(value))
    }
}

impl From<tagfmt_core::ParseError> for Error {
    fn from(value: tagfmt_core::ParseError) -> Self {
        Self::Parse(value.into())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(_: std::fmt::Error) -> Self {
        Self::Io(io::ErrorKind::Other.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arity_message() {
        let err = RuntimeError::Arity { fragments: 3, values: 1 };
        assert_eq!(err.to_string(), "tag received 3 fragments for 1 values, expected 2");
    }

    #[test]
    fn into_io() {
        let err = Error::from(RuntimeError::Custom("boom".into())).into_io();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(err.to_string(), "boom");
    }
}
