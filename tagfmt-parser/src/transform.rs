//! Rewrite passes over template statements.
//!
//! Both passes are independent, [`tag_templates`] then [`return_label`] is what
//! [`Program`][crate::program::Program] runs.
use syn::{Ident, Stmt};

use crate::{ConfigError, config::Config};

mod tag;
mod label;

pub use tag::TagVisitor;
pub use label::LabelVisitor;

/// Rewrite every untagged template macro into the configured tag macro.
///
/// ```text
/// format!("<p>{}</p>", x)  ->  html!("<p>{}</p>", x)
/// ```
pub fn tag_templates(stmts: &mut [Stmt], conf: &Config) -> Result<(), ConfigError> {
    let tag = ident(conf.tag())?;
    TagVisitor::new(tag, conf).visit_all(stmts);
    Ok(())
}

/// Replace the single labeled template block with a `return`.
///
/// ```text
/// 'template: { html!("..") }  ->  return { html!("..") };
/// ```
pub fn return_label(stmts: &mut [Stmt], conf: &Config) -> Result<(), ConfigError> {
    let label = ident(conf.label())?;
    let count = LabelVisitor::new(label).visit_all(stmts);

    match count {
        1 => Ok(()),
        0 => Err(ConfigError::MissingLabel { label: conf.label().into() }),
        count => Err(ConfigError::DuplicateLabel { label: conf.label().into(), count }),
    }
}

fn ident(name: &str) -> Result<Ident, ConfigError> {
    syn::parse_str(name).map_err(|_| ConfigError::InvalidName { name: name.into() })
}
