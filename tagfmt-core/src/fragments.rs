use std::rc::Rc;

use crate::{ParseError, Parser, Placeholder, Result, Visitor};

/// Literal fragments of a format string, split at each [`Placeholder`].
///
/// There is always exactly one more fragment than placeholders, leading and trailing fragments
/// are kept even when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    statics: Vec<Rc<str>>,
    holes: Vec<Placeholder>,
}

impl Fragments {
    /// Parse format string.
    pub fn parse(source: &str) -> Result<Fragments> {
        Parser::new(source, Collector::default()).parse()
    }

    /// Literal fragments.
    pub fn statics(&self) -> &[Rc<str>] {
        &self.statics
    }

    /// Placeholders, in source order.
    pub fn holes(&self) -> &[Placeholder] {
        &self.holes
    }

    /// Count of positional arguments required, `{}` and `{N}` combined.
    pub fn positional_count(&self) -> usize {
        let mut next = 0;
        let mut max = 0;
        for hole in &self.holes {
            match hole {
                Placeholder::Next => {
                    next += 1;
                    max = max.max(next);
                }
                Placeholder::Index(i) => max = max.max(i + 1),
                Placeholder::Named(_) => {}
            }
        }
        max
    }
}

#[derive(Default)]
struct Collector {
    current: String,
    statics: Vec<Rc<str>>,
    holes: Vec<Placeholder>,
}

impl Visitor for Collector {
    type Output = Fragments;

    fn visit_static(&mut self, source: &str) -> Result<()> {
        self.current.push_str(source);
        Ok(())
    }

    fn visit_expr(&mut self, source: &str) -> Result<()> {
        let Some(hole) = Placeholder::parse(source) else {
            let message = if source.contains(':') {
                format!("format spec in `{{{source}}}` is not supported in templates")
            } else {
                format!("invalid placeholder `{{{source}}}`, expected `{{}}`, `{{0}}` or `{{name}}`")
            };
            return Err(ParseError::Placeholder(message));
        };
        self.statics.push(std::mem::take(&mut self.current).into());
        self.holes.push(hole);
        Ok(())
    }

    fn finish(mut self) -> Result<Self::Output> {
        self.statics.push(self.current.into());
        debug_assert_eq!(self.statics.len(), self.holes.len() + 1);
        Ok(Fragments { statics: self.statics, holes: self.holes })
    }
}
