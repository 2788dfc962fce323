//! The [`Program`] struct.
use syn::{Ident, Stmt};

use crate::{Result, config::Config, file::SourceFile, params, transform};

/// Rewritten template statements, ready to evaluate.
pub struct Program {
    stmts: Vec<Stmt>,
    params: Vec<Ident>,
}

impl Program {
    /// Run both rewrite passes over a parsed [`SourceFile`].
    pub fn new(file: SourceFile, conf: &Config) -> Result<Self> {
        let mut stmts = file.into_stmts();

        transform::tag_templates(&mut stmts, conf)?;
        transform::return_label(&mut stmts, conf)?;

        let params = params::free_idents(&stmts, conf);

        tracing::debug!(
            stmts = stmts.len(),
            params = ?params.iter().map(Ident::to_string).collect::<Vec<_>>(),
            "template source rewritten"
        );

        Ok(Self { stmts, params })
    }

    /// Returns rewritten statements.
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// Returns free identifiers, in first use order.
    pub fn params(&self) -> &[Ident] {
        &self.params
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("stmts", &self.stmts.len())
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use crate::{ConfigError, Error, compile, config::Config};

    #[test]
    fn compiled() {
        let program = compile(
            r#"let more_data = "DATA"; 'template: { format!("<header>{more_data} {}</header>", || mood) }"#,
            &Config::default(),
        )
        .unwrap();
        let params: Vec<_> = program.params().iter().map(|e| e.to_string()).collect();
        assert_eq!(params, ["html", "mood"]);
    }

    #[test]
    fn missing_label() {
        let err = compile(r#"format!("a")"#, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingLabel { .. })));
    }

    #[test]
    fn duplicate_label() {
        let err = compile("'template: { 1 } 'template: { 2 }", &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::DuplicateLabel { count: 2, .. })));
    }

    #[test]
    fn custom_label() {
        let conf = Config::default().with_label("body");
        assert!(compile("'body: { 1 }", &conf).is_ok());
        assert!(compile("'template: { 1 }", &conf).is_err());
    }

    #[test]
    fn invalid_tag() {
        let conf = Config::default().with_tag("not a tag");
        let err = compile("'template: { 1 }", &conf).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidName { .. })));
    }
}
