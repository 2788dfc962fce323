//! Syntax definition for template macros.
//!
//! Template macros share the `format!` argument syntax:
//!
//! ```text
//! html!("<p>{}: {name} {0}</p>", value, name = user.name)
//! ```
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{
    parse::{Parse, ParseStream},
    *,
};
use tagfmt_core::{Fragments, Placeholder};

use crate::{
    common::{PRINT_MACROS, VEC_MACRO, error},
    config::Config,
};

// ===== MacroKind =====

/// How a macro invocation is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind<'a> {
    /// `format!`, a template without tag.
    Untagged,
    /// `<tag>!`, a template processed by the named tag.
    Tagged(&'a Ident),
    /// `println!` and friends, output side effect.
    Print,
    /// `vec!`, list literal.
    Vec,
    /// Path macro like `std::format!`, unsupported.
    Other,
}

impl<'a> MacroKind<'a> {
    pub fn of(mac: &'a Macro, conf: &Config) -> Self {
        let Some(ident) = mac.path.get_ident() else {
            return Self::Other;
        };
        let name = ident.to_string();
        match () {
            _ if conf.is_untagged(&name) => Self::Untagged,
            _ if PRINT_MACROS.contains(&name.as_str()) => Self::Print,
            _ if name == VEC_MACRO => Self::Vec,
            _ => Self::Tagged(ident),
        }
    }

    /// Returns `true` if macro body is [`TemplateArgs`].
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Untagged | Self::Tagged(_) | Self::Print)
    }
}

// ===== TemplateArgs =====

/// `"<format>" [, <Expr>]* [, <Ident> = <Expr>]*`
pub struct TemplateArgs {
    pub format: LitStr,
    pub args: Vec<Arg>,
}

/// Single template argument.
pub enum Arg {
    /// `<Expr>`
    Positional(Expr),
    /// `<Ident> = <Expr>`
    Named(Ident, Expr),
}

/// What a placeholder is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<'a> {
    /// Index into [`TemplateArgs::args`].
    Arg(usize),
    /// Identifier captured from scope, `{name}` without named argument.
    Capture(&'a str),
}

impl TemplateArgs {
    /// Parse [`TemplateArgs`] from macro body.
    pub fn from_macro(mac: &Macro) -> Result<Self> {
        mac.parse_body()
    }

    /// Parse the format string into fragments.
    pub fn fragments(&self) -> tagfmt_core::Result<Fragments> {
        Fragments::parse(&self.format.value())
    }

    pub fn arg_expr(&self, index: usize) -> Option<&Expr> {
        self.args.get(index).map(Arg::expr)
    }

    pub fn args_mut(&mut self) -> impl Iterator<Item = &mut Expr> {
        self.args.iter_mut().map(|arg| match arg {
            Arg::Positional(expr) | Arg::Named(_, expr) => expr,
        })
    }

    fn positional_len(&self) -> usize {
        self.args.iter().take_while(|e| matches!(e, Arg::Positional(_))).count()
    }

    fn named(&self, name: &str) -> Option<usize> {
        self.args.iter().position(|e| matches!(e, Arg::Named(id, _) if id == name))
    }

    /// Bind each placeholder of given fragments, in fragment order.
    ///
    /// Bindings are only valid after [`TemplateArgs::validate`].
    pub fn bindings<'a>(&self, fragments: &'a Fragments) -> Vec<Binding<'a>> {
        let mut next = 0;
        fragments
            .holes()
            .iter()
            .map(|hole| match hole {
                Placeholder::Next => {
                    next += 1;
                    Binding::Arg(next - 1)
                }
                Placeholder::Index(i) => Binding::Arg(*i),
                Placeholder::Named(name) => match self.named(name) {
                    Some(i) => Binding::Arg(i),
                    None => Binding::Capture(name),
                },
            })
            .collect()
    }

    /// Check that every placeholder have an argument and every argument is used.
    ///
    /// Like `format!`, `{N}` and `{}` index every argument, so `{1}` in `"{1}{0}", a, b = 2`
    /// is the named argument `b`.
    pub fn validate(&self, fragments: &Fragments) -> std::result::Result<(), String> {
        let positional = self.positional_len();
        let total = self.args.len();
        let required = fragments.positional_count();

        if required > total {
            let (s, verb) = if total == 1 { ("", "is") } else { ("s", "are") };
            return Err(format!(
                "{required} positional argument{} in format string, but there {verb} {total} argument{s}",
                if required == 1 { "" } else { "s" },
            ));
        }

        let mut used = vec![false; self.args.len()];
        for binding in self.bindings(fragments) {
            if let Binding::Arg(i) = binding {
                used[i] = true;
            }
        }

        match used.iter().position(|e| !e) {
            Some(i) if i < positional => Err("argument never used".into()),
            Some(_) => Err("named argument never used".into()),
            None => Ok(()),
        }
    }
}

impl Arg {
    pub fn expr(&self) -> &Expr {
        match self {
            Arg::Positional(expr) | Arg::Named(_, expr) => expr,
        }
    }
}

// ===== Parse implementation =====

impl Parse for TemplateArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let format = input.parse()?;
        let mut args: Vec<Arg> = vec![];

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let arg: Arg = input.parse()?;
            if matches!(arg, Arg::Positional(_)) && matches!(args.last(), Some(Arg::Named(..))) {
                error!(arg.expr(), "positional arguments cannot follow named arguments");
            }
            args.push(arg);
        }

        Ok(Self { format, args })
    }
}

impl Parse for Arg {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(Ident) && input.peek2(Token![=]) && !input.peek2(Token![==]) {
            let name = input.parse()?;
            input.parse::<Token![=]>()?;
            Ok(Self::Named(name, input.parse()?))
        } else {
            input.parse().map(Self::Positional)
        }
    }
}

// ===== ToTokens implementation =====

impl ToTokens for TemplateArgs {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Self { format, args } = self;
        tokens.extend(quote! { #format #(, #args)* });
    }
}

impl ToTokens for Arg {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Arg::Positional(expr) => expr.to_tokens(tokens),
            Arg::Named(name, expr) => tokens.extend(quote! { #name = #expr }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(src: &str) -> TemplateArgs {
        syn::parse_str(src).unwrap()
    }

    #[test]
    fn parse() {
        let templ = args(r#""{} {name}", a == b, name = user.name,"#);
        assert_eq!(templ.format.value(), "{} {name}");
        assert!(matches!(templ.args[0], Arg::Positional(Expr::Binary(_))));
        assert!(matches!(&templ.args[1], Arg::Named(id, Expr::Field(_)) if id == "name"));
    }

    #[test]
    fn positional_after_named() {
        assert!(syn::parse_str::<TemplateArgs>(r#""{a}{}", a = 1, 2"#).is_err());
        assert!(syn::parse_str::<TemplateArgs>("1, 2").is_err());
    }

    #[test]
    fn bindings() {
        let templ = args(r#""{}{x}{0}{y}", a, x = b"#);
        let fragments = templ.fragments().unwrap();
        assert_eq!(
            templ.bindings(&fragments),
            [Binding::Arg(0), Binding::Arg(1), Binding::Arg(0), Binding::Capture("y")],
        );
        assert!(templ.validate(&fragments).is_ok());
    }

    #[test]
    fn validate() {
        let templ = args(r#""{} {}", a"#);
        let err = templ.validate(&templ.fragments().unwrap()).unwrap_err();
        assert_eq!(err, "2 positional arguments in format string, but there is 1 argument");

        let templ = args(r#""{}", a, b"#);
        assert_eq!(templ.validate(&templ.fragments().unwrap()).unwrap_err(), "argument never used");

        let templ = args(r#""{}", a, b = 1"#);
        assert_eq!(templ.validate(&templ.fragments().unwrap()).unwrap_err(), "named argument never used");
    }

    #[test]
    fn index_named_argument() {
        let templ = args(r#""{1}{0}", a, b = 2"#);
        let fragments = templ.fragments().unwrap();
        assert_eq!(templ.bindings(&fragments), [Binding::Arg(1), Binding::Arg(0)]);
        assert!(templ.validate(&fragments).is_ok());

        let templ = args(r#""{2}{0}", a, b = 2"#);
        let err = templ.validate(&templ.fragments().unwrap()).unwrap_err();
        assert_eq!(err, "3 positional arguments in format string, but there are 2 arguments");
    }

    #[test]
    fn macro_kind() {
        let conf = Config::default();
        let mac: Macro = syn::parse_quote!(format!("a"));
        assert_eq!(MacroKind::of(&mac, &conf), MacroKind::Untagged);
        let mac: Macro = syn::parse_quote!(println!("a"));
        assert_eq!(MacroKind::of(&mac, &conf), MacroKind::Print);
        let mac: Macro = syn::parse_quote!(vec![1]);
        assert_eq!(MacroKind::of(&mac, &conf), MacroKind::Vec);
        let mac: Macro = syn::parse_quote!(std::format!("a"));
        assert_eq!(MacroKind::of(&mac, &conf), MacroKind::Other);
        let mac: Macro = syn::parse_quote!(html!("a"));
        assert!(matches!(MacroKind::of(&mac, &conf), MacroKind::Tagged(id) if id == "html"));
    }
}
