
/// [`Result`][std::result::Result] alias for [`ParseError`].
pub type Result<T,E = ParseError> = core::result::Result<T,E>;

/// An error that may occur during parsing in [`Parser`][super::Parser].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `{` that never gets closed.
    Unclosed,
    /// A single `}` outside of a placeholder.
    Unmatched,
    /// Placeholder content that is not `{}`, `{0}` or `{name}`.
    Placeholder(String),
}

impl std::error::Error for ParseError {}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unclosed => f.write_str("invalid format string: expected `}`, found end of string"),
            ParseError::Unmatched => f.write_str("invalid format string: unmatched `}` found"),
            ParseError::Placeholder(s) => f.write_str(s),
        }
    }
}
