use crate::{ParseError, Result, Visitor};

/// Format string parser.
///
/// For more details see the [crate level docs][crate].
pub struct Parser<'a,V> {
    source: &'a str,

    // parser states
    index: usize,
    state: ParseState,
    visitor: V,
}

impl<'a, V> Parser<'a, V> {
    /// Create new [`Parser`].
    ///
    /// Requires a [`Visitor`] implementation, for collecting fragments use
    /// [`Fragments`][super::Fragments].
    pub fn new(source: &'a str, visitor: V) -> Self {
        Self {
            source,
            index: 0,
            state: ParseState::Static { start: 0 },
            visitor,
        }
    }
}

enum ParseState {
    Static { start: usize },
    Expr { start: usize },
    OpenExpr { start: usize, brace: usize },
    CloseStatic { start: usize, brace: usize },
}

impl<V> Parser<'_,V>
where
    V: Visitor,
{
    /// Start parsing.
    pub fn parse(mut self) -> Result<V::Output> {
        loop {
            let current = self.index;
            let Some(byte) = self.source.as_bytes().get(current) else {
                break self.parse_leftover()?;
            };

            self.index += 1;

            match self.state {
                ParseState::Static { start } => match byte {
                    b'{' => self.state = ParseState::OpenExpr { start, brace: current },
                    b'}' => self.state = ParseState::CloseStatic { start, brace: current },
                    _ => {}
                },
                ParseState::OpenExpr { start, brace } => {
                    if matches!(byte,b'{') {
                        // `{{`, keep one brace as static
                        self.visit_static(start..brace + 1)?;
                        self.state = ParseState::Static { start: current + 1 };
                        continue;
                    }

                    self.visit_static(start..brace)?;

                    if matches!(byte,b'}') {
                        self.visitor.visit_expr("")?;
                        self.state = ParseState::Static { start: current + 1 };
                    } else {
                        self.state = ParseState::Expr { start: current };
                    }
                }
                ParseState::Expr { start } => match byte {
                    b'}' => {
                        self.visitor.visit_expr(&self.source[start..current])?;
                        self.state = ParseState::Static { start: current + 1 };
                    }
                    b'{' => return Err(ParseError::Placeholder(format!(
                        "invalid format string: unexpected `{{` in `{}`",
                        &self.source[start..current],
                    ))),
                    _ => {}
                },
                ParseState::CloseStatic { start, brace } => {
                    if !matches!(byte,b'}') {
                        return Err(ParseError::Unmatched);
                    }
                    // `}}`, keep one brace as static
                    self.visit_static(start..brace + 1)?;
                    self.state = ParseState::Static { start: current + 1 };
                }
            }
        }

        self.visitor.finish()
    }

    fn visit_static(&mut self, range: std::ops::Range<usize>) -> Result<()> {
        // only split at ascii braces, so range is always at char boundary
        let statics = &self.source[range];
        if statics.is_empty() {
            return Ok(());
        }
        self.visitor.visit_static(statics)
    }

    fn parse_leftover(&mut self) -> Result<()> {
        match self.state {
            ParseState::Static { start } => self.visit_static(start..self.source.len()),
            ParseState::OpenExpr { .. } | ParseState::Expr { .. } => Err(ParseError::Unclosed),
            ParseState::CloseStatic { .. } => Err(ParseError::Unmatched),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default)]
    struct Collect(Vec<String>);

    impl Visitor for Collect {
        type Output = Vec<String>;

        fn visit_static(&mut self, source: &str) -> Result<()> {
            self.0.push(format!("S({source})"));
            Ok(())
        }

        fn visit_expr(&mut self, source: &str) -> Result<()> {
            self.0.push(format!("E({source})"));
            Ok(())
        }

        fn finish(self) -> Result<Self::Output> {
            Ok(self.0)
        }
    }

    fn parse(source: &str) -> Result<Vec<String>> {
        Parser::new(source, Collect::default()).parse()
    }

    #[test]
    fn basic() {
        assert_eq!(
            parse("<h1>{name}</h1> once").unwrap(),
            ["S(<h1>)", "E(name)", "S(</h1> once)"],
        );
    }

    #[test]
    fn escaped() {
        assert_eq!(
            parse("a {{b}} {}c").unwrap(),
            ["S(a {)", "S(b})", "S( )", "E()", "S(c)"],
        );
    }

    #[test]
    fn empty_static() {
        assert_eq!(parse("{a}{}").unwrap(), ["E(a)", "E()"]);
        assert_eq!(parse("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn unicode() {
        assert_eq!(parse("é{ü}ß").unwrap(), ["S(é)", "E(ü)", "S(ß)"]);
    }

    #[test]
    fn invalid() {
        assert_eq!(parse("a {b"), Err(ParseError::Unclosed));
        assert_eq!(parse("a {"), Err(ParseError::Unclosed));
        assert_eq!(parse("a } b"), Err(ParseError::Unmatched));
        assert_eq!(parse("a }"), Err(ParseError::Unmatched));
        assert!(matches!(parse("{a{b}}"), Err(ParseError::Placeholder(_))));
    }
}
