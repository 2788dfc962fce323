//! Template macros, `vec!` and printing.
use quote::ToTokens;
use std::rc::Rc;
use syn::{Expr, Macro, Token, punctuated::Punctuated};
use tagfmt_parser::syntax::{Binding, MacroKind, TemplateArgs};

use super::{Eval, Interpreter, unsupported};
use crate::{Error, RuntimeError, Value, tag::tag};

impl Interpreter {
    pub(super) fn eval_macro(&self, mac: &Macro) -> Eval {
        match MacroKind::of(mac, &self.conf) {
            MacroKind::Tagged(tag) => self.eval_tagged(&tag.to_string(), mac),
            // not rewritten, e.g. a config with different untagged list
            MacroKind::Untagged => self.eval_tagged(self.conf.tag(), mac),
            MacroKind::Print => self.eval_print(mac),
            MacroKind::Vec => {
                let elems = mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
                Ok(Value::List(self.eval_list(&elems)?.into()))
            }
            MacroKind::Other => unsupported(format_args!("macro `{}!`", mac.path.to_token_stream())),
        }
    }

    /// `tag!("..", args)` calls `tag` with fragments list followed by each value.
    fn eval_tagged(&self, name: &str, mac: &Macro) -> Eval {
        let tag = self.lookup(name)?;
        let (fragments, values) = self.template_values(mac)?;

        tracing::trace!(tag = name, values = values.len(), "evaluate tagged template");

        let mut args = Vec::with_capacity(values.len() + 1);
        args.push(Value::List(fragments.into_iter().map(Value::Str).collect()));
        args.extend(values);
        self.call(&tag, || name.to_owned(), args)
    }

    fn eval_print(&self, mac: &Macro) -> Eval {
        let (fragments, values) = self.template_values(mac)?;
        let out = tag(&fragments, &values)?;
        match mac.path.get_ident().map(|e| e.to_string()).as_deref() {
            Some("print") => print!("{out}"),
            Some("println") => println!("{out}"),
            Some("eprint") => eprint!("{out}"),
            _ => eprintln!("{out}"),
        }
        Ok(Value::Undefined)
    }

    /// Evaluate template arguments in placeholder order.
    ///
    /// Each argument is evaluated once, at its first placeholder, later placeholders reuse the
    /// value.
    fn template_values(&self, mac: &Macro) -> Eval<(Vec<Rc<str>>, Vec<Value>)> {
        let templ = TemplateArgs::from_macro(mac)?;
        let fragments = templ.fragments().map_err(Error::from)?;

        let mut args = vec![None::<Value>; templ.args.len()];
        let mut values = Vec::with_capacity(fragments.holes().len());

        for binding in templ.bindings(&fragments) {
            let value = match binding {
                Binding::Arg(i) => {
                    if let Some(Some(value)) = args.get(i) {
                        value.clone()
                    } else {
                        let Some(expr) = templ.arg_expr(i) else {
                            return Err(RuntimeError::Custom(format!(
                                "invalid reference to positional argument {i}"
                            ))
                            .into());
                        };
                        let value = self.eval_expr(expr)?;
                        args[i] = Some(value.clone());
                        value
                    }
                }
                Binding::Capture(name) => self.lookup(name)?,
            };
            values.push(value);
        }

        Ok((fragments.statics().to_vec(), values))
    }
}

#[cfg(test)]
mod test {
    use crate::{Context, Value, eval::Session, tag::tag_fn};
    use std::{cell::Cell, rc::Rc};
    use tagfmt_parser::config::Config;

    fn render(source: &str, ctx: Context) -> crate::Result<Value> {
        let stmts = syn::parse_str::<syn::Block>(&format!("{{ {source} }}"))?.stmts;
        let session = Session::new(Rc::new(Config::default()));
        session.declare("html".into(), tag_fn());
        for (name, value) in ctx.iter() {
            session.declare(name.into(), value.clone());
        }
        session.run(&stmts)
    }

    #[test]
    fn tagged() {
        let ctx = Context::new().with("name", "Romaric");
        let out = render(r#"return html!("<p>{name} {}</p>", 1 + 1);"#, ctx).unwrap();
        assert_eq!(out, Value::from("<p>Romaric 2</p>"));
    }

    #[test]
    fn arguments_evaluated_once() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let tick = Value::func("tick", move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::Int(counter.get()))
        });
        let ctx = Context::new().with("tick", tick);
        let out = render(r#"return html!("{0}{0}{x}", tick(), x = tick());"#, ctx).unwrap();
        assert_eq!(out, Value::from("112"));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn arguments_evaluated_in_placeholder_order() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let tick = Value::func("tick", move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::Int(counter.get()))
        });
        let ctx = Context::new().with("tick", tick);
        let out = render(r#"return html!("{1}-{0}", tick() * 10, tick());"#, ctx).unwrap();
        assert_eq!(out, Value::from("1-20"));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn custom_tag() {
        let upper = Value::func("upper", |args| {
            let out = crate::tag(args[0].as_list().unwrap_or_default(), &args[1..])?;
            Ok(Value::from(out.to_uppercase()))
        });
        let ctx = Context::new().with("upper", upper);
        let out = render(r#"return upper!("a{}c", "b");"#, ctx).unwrap();
        assert_eq!(out, Value::from("ABC"));
    }

    #[test]
    fn vec_macro() {
        let out = render("return vec![1, 2];", Context::new()).unwrap();
        assert_eq!(out, Value::list([1, 2]));
    }

    #[test]
    fn missing_tag() {
        let err = render(r#"return fancy!("x");"#, Context::new()).unwrap_err();
        assert_eq!(err.to_string(), "cannot find value `fancy` in this scope");
    }
}
