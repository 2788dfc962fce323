//! Compiled template.
use std::{fmt, fs, path::Path, rc::Rc};
use tagfmt_parser::{codegen, config::Config, program::Program};

use crate::{
    Context, Globals, Result, Value, Writer, eval::Session, process::process_into,
};

/// A compiled template function.
///
/// Compiling parses the source, rewrites untagged templates into the configured tag, and turns
/// the labeled block into the function return. Rendering binds each parameter and evaluates the
/// function body.
///
/// ```
/// use tagfmt::{Context, Template};
///
/// let templ = Template::compile(r#"
///     let greeting = "Hello";
///     'template: {
///         format!("<p>{greeting}, {name}!</p>")
///     }
/// "#).unwrap();
///
/// let params = templ.params().iter().map(|e| &**e).collect::<Vec<_>>();
/// assert_eq!(params, ["html", "name"]);
///
/// let out = templ.render(&Context::new().with("name", "World")).unwrap();
/// assert_eq!(out, "<p>Hello, World!</p>");
/// ```
pub struct Template {
    program: Program,
    params: Vec<Rc<str>>,
    conf: Rc<Config>,
    globals: Globals,
}

impl Template {
    /// Compile template source with default [`Config`].
    pub fn compile(source: &str) -> Result<Template> {
        Self::compile_with(source, &Config::default())
    }

    pub fn compile_with(source: &str, conf: &Config) -> Result<Template> {
        let program = tagfmt_parser::compile(source, conf)?;
        let params = program.params().iter().map(|e| e.to_string().into()).collect();
        Ok(Template {
            program,
            params,
            conf: Rc::new(conf.clone()),
            globals: Globals::with_tag(conf.tag()),
        })
    }

    /// Read and compile template file with default [`Config`].
    pub fn compile_file(path: impl AsRef<Path>) -> Result<Template> {
        let source = fs::read_to_string(path)?;
        Self::compile(&source)
    }

    /// Replace the ambient scope.
    pub fn with_globals(mut self, globals: Globals) -> Self {
        self.globals = globals;
        self
    }

    pub fn globals_mut(&mut self) -> &mut Globals {
        &mut self.globals
    }

    /// Free identifiers of the template, in first use order.
    pub fn params(&self) -> &[Rc<str>] {
        &self.params
    }

    /// Rewritten source, as a rust function taking [`Context`].
    pub fn source(&self) -> String {
        codegen::source(&self.program)
    }

    pub fn render(&self, ctx: &Context) -> Result<String> {
        let mut buffer = String::with_capacity(128);
        self.render_into(ctx, &mut buffer)?;
        Ok(buffer)
    }

    pub fn render_into(&self, ctx: &Context, writer: &mut impl Writer) -> Result<()> {
        let session = Session::new(self.conf.clone());

        for name in &self.params {
            let value = match ctx.get(name).or_else(|| self.globals.get(name)) {
                Some(value) => value.clone(),
                None => {
                    tracing::trace!(param = &**name, "parameter not provided");
                    Value::Undefined
                }
            };
            session.declare(name.clone(), value);
        }

        let value = session.run(self.program.stmts())?;
        process_into(&value, writer)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("params", &self.params)
            .field("globals", &self.globals)
            .finish_non_exhaustive()
    }
}
