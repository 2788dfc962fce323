use quote::ToTokens;
use syn::{
    Expr, Ident, Macro, Stmt, Token,
    punctuated::Punctuated,
    visit_mut::{self, VisitMut},
};

use crate::{
    config::Config,
    syntax::{MacroKind, TemplateArgs},
};

/// Tag insertion pass.
///
/// `syn` does not descend into macro bodies, so template arguments are parsed, visited, and
/// written back.
pub struct TagVisitor<'a> {
    tag: Ident,
    conf: &'a Config,
}

impl<'a> TagVisitor<'a> {
    pub fn new(tag: Ident, conf: &'a Config) -> Self {
        Self { tag, conf }
    }

    pub fn visit_all(&mut self, stmts: &mut [Stmt]) {
        for stmt in stmts {
            self.visit_stmt_mut(stmt);
        }
    }

    fn visit_format(&mut self, mac: &mut Macro) {
        // bodies are validated when parsing `SourceFile`
        let Ok(mut templ) = TemplateArgs::from_macro(mac) else {
            return;
        };
        for expr in templ.args_mut() {
            self.visit_expr_mut(expr);
        }
        mac.tokens = templ.into_token_stream();
    }

    fn visit_vec(&mut self, mac: &mut Macro) {
        let Ok(mut elems) = mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated) else {
            return;
        };
        for expr in elems.iter_mut() {
            self.visit_expr_mut(expr);
        }
        mac.tokens = elems.into_token_stream();
    }
}

impl VisitMut for TagVisitor<'_> {
    fn visit_macro_mut(&mut self, mac: &mut Macro) {
        match MacroKind::of(mac, self.conf) {
            MacroKind::Untagged => {
                self.visit_format(mac);
                let mut tag = self.tag.clone();
                tag.set_span(mac.path.segments[0].ident.span());
                mac.path = tag.into();
            }
            MacroKind::Tagged(_) | MacroKind::Print => self.visit_format(mac),
            MacroKind::Vec => self.visit_vec(mac),
            MacroKind::Other => visit_mut::visit_macro_mut(self, mac),
        }
    }
}
