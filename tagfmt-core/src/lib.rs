//! The [`tagfmt`][1] format string parser.
//!
//! The [`Parser`] type only splits a format string into static contents and placeholders.
//! What to do with them is decided by a [`Visitor`] implementation.
//!
//! ```text
//! <h1>{name}</h1> {{literal}}
//! ```
//!
//! [`Parser`] will pass `"<h1>"` as static, `"name"` as placeholder, then `"</h1> {literal}"`
//! as static, with the doubled braces unescaped.
//!
//! [`Fragments`] is the [`Visitor`] used by the template runtime, it collects literal
//! fragments around each [`Placeholder`], so there is always one more fragment than
//! placeholders.
//!
//! [1]: <https://docs.rs/tagfmt>
mod syntax;
mod parser;
mod visitor;
mod fragments;
mod error;

pub use syntax::Placeholder;
pub use parser::Parser;
pub use visitor::Visitor;
pub use fragments::Fragments;
pub use error::{ParseError, Result};
