//! Tagged templates for rust format strings.
//!
//! A template is a list of rust statements with a single labeled block, the template body.
//! Every `format!` in it is processed by a tag, and the labeled block becomes the return value:
//!
//! ```
//! use tagfmt::{Context, compile};
//!
//! let templ = compile(r#"
//!     let more_data = "DATA";
//!
//!     'template: {
//!         format!(
//!             "<header>{more_data} {}</header>",
//!             || if mood == "curious" { format!("<h1>{name}</h1>") } else { format!("") },
//!         )
//!     }
//! "#).unwrap();
//!
//! let ctx = Context::new().with("name", "Romaric").with("mood", "curious");
//! assert_eq!(templ.render(&ctx).unwrap(), "<header>DATA <h1>Romaric</h1></header>");
//! ```
//!
//! # Values
//!
//! Interpolated [`Value`]s are processed into text by [`process`]:
//!
//! - functions are called without arguments and their result is processed
//! - lists are processed element wise and concatenated
//! - records are serialized as json
//! - `null`, undefined and `false` become empty string
//!
//! # Tags
//!
//! The default tag, [`tag`], interleaves fragments with processed values. Another tag is
//! selected by macro name, `escape!("<p>{}</p>", input)` html escapes values. Custom tags are
//! functions in [`Globals`] or [`Context`], called with the fragment list followed by each value.
//!
//! # Loading
//!
//! [`Loader`] compiles template files once, and recompiles them when they change, see
//! [`Reload`].
mod error;
mod value;
mod process;
mod tag;
mod context;
mod eval;
mod template;
mod loader;
mod write;

#[cfg(feature = "time")]
pub mod time;

use std::path::Path;

pub use error::{ConfigError, Error, ParseError, Result, RuntimeError};
pub use value::{Func, Record, Value};
pub use process::{process, process_into};
pub use tag::{escape, escape_fn, escape_into, tag, tag_fn, tag_into};
pub use context::{Context, Globals};
pub use template::Template;
pub use loader::Loader;
pub use write::{Escape, Writer};

pub use tagfmt_parser::config::{Config, Reload};
pub use tagfmt_macros::include_template;

/// Compile template source with default [`Config`].
pub fn compile(source: &str) -> Result<Template> {
    Template::compile(source)
}

/// Compile template source.
pub fn compile_with(source: &str, conf: &Config) -> Result<Template> {
    Template::compile_with(source, conf)
}

/// Read and compile template file with default [`Config`].
pub fn compile_file(path: impl AsRef<Path>) -> Result<Template> {
    Template::compile_file(path)
}
