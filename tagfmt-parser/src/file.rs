use syn::{Block, LitInt, Macro, Stmt, parse::Parser, visit::Visit};

use crate::{
    ParseError,
    config::Config,
    syntax::{MacroKind, TemplateArgs},
};

/// Parsed template source.
pub struct SourceFile {
    stmts: Vec<Stmt>,
}

impl SourceFile {
    /// Parse source statements and validate template macros.
    pub fn parse(source: &str, conf: &Config) -> Result<SourceFile, ParseError> {
        let stmts = Block::parse_within.parse_str(source)?;
        let file = SourceFile { stmts };
        ValidateVisitor::validate(&file, conf)?;
        Ok(file)
    }

    /// Returns all statements.
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub(crate) fn into_stmts(self) -> Vec<Stmt> {
        self.stmts
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile").field("stmts", &self.stmts.len()).finish()
    }
}

// ===== Validation =====

/// Template macro validation.
///
/// Validate early to allows for infallible rewrite passes.
///
/// Will validate:
///
/// - template macro body is a format string followed by arguments
/// - format string placeholders and arguments matches
/// - integer literals fit in `i64`
struct ValidateVisitor<'a> {
    conf: &'a Config,
    error: Option<ParseError>,
}

impl<'a> ValidateVisitor<'a> {
    fn validate(file: &SourceFile, conf: &'a Config) -> Result<(), ParseError> {
        let mut me = Self { conf, error: None };
        for stmt in file.stmts() {
            me.visit_stmt(stmt);
        }
        match me.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn validate_macro(&mut self, mac: &Macro) -> Result<(), ParseError> {
        let kind = MacroKind::of(mac, self.conf);

        if matches!(kind, MacroKind::Vec) {
            let elems = mac.parse_body_with(
                syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated,
            )?;
            for expr in &elems {
                self.visit_expr(expr);
            }
            return Ok(());
        }

        if !kind.is_format() {
            return Ok(());
        }

        let templ = TemplateArgs::from_macro(mac)?;
        let fragments = templ.fragments()?;

        if let Err(message) = templ.validate(&fragments) {
            return Err(ParseError::Format { message });
        }

        for arg in &templ.args {
            self.visit_expr(arg.expr());
        }

        Ok(())
    }
}

impl<'ast> Visit<'ast> for ValidateVisitor<'_> {
    fn visit_macro(&mut self, mac: &'ast Macro) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.validate_macro(mac) {
            self.error = Some(err);
        }
    }

    fn visit_lit_int(&mut self, lit: &'ast LitInt) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = lit.base10_parse::<i64>() {
            self.error = Some(err.into());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(source: &str) -> Result<SourceFile, ParseError> {
        SourceFile::parse(source, &Config::default())
    }

    #[test]
    fn statements() {
        let file = parse("let a = 1; 'template: { format!(\"{a}\") }").unwrap();
        assert_eq!(file.stmts().len(), 2);
    }

    #[test]
    fn syntax_error() {
        let err = parse("let a = ;").unwrap_err();
        assert!(matches!(err, ParseError::Syn(_)));
    }

    #[test]
    fn format_error() {
        let err = parse("'template: { format!(\"{} {}\", 1) }").unwrap_err();
        assert!(matches!(err, ParseError::Format { .. }));

        let err = parse("'template: { html!(\"{oops\") }").unwrap_err();
        assert!(matches!(err, ParseError::Format { .. }));
    }

    #[test]
    fn nested_macro_error() {
        let err = parse("'template: { html!(\"{}\", || format!(\"{:?}\", 1)) }").unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn integer_overflow() {
        let err = parse("let a = 99999999999999999999; 'template: { format!(\"{a}\") }").unwrap_err();
        assert!(matches!(err, ParseError::Syn(_)));

        let err = parse("'template: { html!(\"{}\", vec![1, 99999999999999999999]) }").unwrap_err();
        assert!(matches!(err, ParseError::Syn(_)));

        assert!(parse("let a = 9223372036854775807; 'template: { format!(\"{a}\") }").is_ok());
    }

    #[test]
    fn macro_body_error() {
        let err = parse("'template: { html!(1, 2) }").unwrap_err();
        assert!(matches!(err, ParseError::Syn(_)));
    }
}
