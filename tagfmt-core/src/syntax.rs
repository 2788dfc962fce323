
/// A placeholder inside a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `{}`, takes the next positional argument.
    Next,
    /// `{0}`, explicit positional argument.
    Index(usize),
    /// `{name}`, named argument or captured identifier.
    Named(Box<str>),
}

impl Placeholder {
    /// Parse the content between `{` and `}`.
    pub fn parse(source: &str) -> Option<Placeholder> {
        let source = source.trim();
        let bytes = source.as_bytes();
        match bytes.first() {
            None => Some(Self::Next),
            Some(b) if b.is_ascii_digit() => source.parse().ok().map(Self::Index),
            Some(b) if b.is_ascii_alphabetic() || *b == b'_' => bytes
                .iter()
                .all(|e| e.is_ascii_alphanumeric() || *e == b'_')
                .then(|| Self::Named(source.into())),
            Some(_) => None,
        }
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Next => f.write_str("{}"),
            Self::Index(i) => write!(f, "{{{i}}}"),
            Self::Named(name) => write!(f, "{{{name}}}"),
        }
    }
}
