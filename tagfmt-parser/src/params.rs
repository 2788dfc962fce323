//! Free identifier analysis.
//!
//! Every identifier a template reads without declaring it becomes a parameter, bound explicitly
//! by the caller when rendering.
use std::collections::HashSet;
use syn::{
    Block, Expr, ExprClosure, ExprForLoop, ExprPath, ExprStruct, Ident, Local, Macro, Pat, Stmt,
    visit::{self, Visit},
};

use crate::{
    config::Config,
    syntax::{Binding, MacroKind, TemplateArgs},
};

/// Identifiers that are not parameters even if undeclared.
const KEYWORDS: [&str; 1] = ["None"];

/// Collect free identifiers, in first use order.
pub fn free_idents(stmts: &[Stmt], conf: &Config) -> Vec<Ident> {
    let mut visitor = ParamVisitor {
        conf,
        scopes: vec![HashSet::new()],
        seen: HashSet::new(),
        params: vec![],
    };
    for stmt in stmts {
        visitor.visit_stmt(stmt);
    }
    visitor.params
}

struct ParamVisitor<'a> {
    conf: &'a Config,
    /// declared identifiers per scope
    scopes: Vec<HashSet<String>>,
    seen: HashSet<String>,
    params: Vec<Ident>,
}

impl ParamVisitor<'_> {
    fn is_bound(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|e| e.contains(name))
    }

    fn declare(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(pat) => {
                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert(pat.ident.to_string());
                }
                if let Some((_, sub)) = &pat.subpat {
                    self.declare(sub);
                }
            }
            Pat::Type(pat) => self.declare(&pat.pat),
            Pat::Reference(pat) => self.declare(&pat.pat),
            Pat::Paren(pat) => self.declare(&pat.pat),
            Pat::Tuple(pat) => pat.elems.iter().for_each(|e| self.declare(e)),
            Pat::Slice(pat) => pat.elems.iter().for_each(|e| self.declare(e)),
            _ => {}
        }
    }

    fn reference(&mut self, ident: &Ident) {
        let name = ident.to_string();
        if self.is_bound(&name) || KEYWORDS.contains(&name.as_str()) {
            return;
        }
        if self.seen.insert(name) {
            self.params.push(ident.clone());
        }
    }

    fn reference_name(&mut self, name: &str, span: proc_macro2::Span) {
        self.reference(&Ident::new(name, span));
    }

    fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
        self.scopes.push(HashSet::new());
        f(self);
        self.scopes.pop();
    }
}

impl<'ast> Visit<'ast> for ParamVisitor<'_> {
    fn visit_block(&mut self, block: &'ast Block) {
        self.scoped(|me| visit::visit_block(me, block));
    }

    fn visit_local(&mut self, local: &'ast Local) {
        // `let a = a;` reads the outer `a`
        if let Some(init) = &local.init {
            self.visit_expr(&init.expr);
            if let Some((_, diverge)) = &init.diverge {
                self.visit_expr(diverge);
            }
        }
        self.declare(&local.pat);
    }

    fn visit_expr_closure(&mut self, closure: &'ast ExprClosure) {
        self.scoped(|me| {
            for input in &closure.inputs {
                me.declare(input);
            }
            me.visit_expr(&closure.body);
        });
    }

    fn visit_expr_for_loop(&mut self, expr: &'ast ExprForLoop) {
        self.visit_expr(&expr.expr);
        self.scoped(|me| {
            me.declare(&expr.pat);
            me.visit_block(&expr.body);
        });
    }

    fn visit_expr_path(&mut self, path: &'ast ExprPath) {
        if let Some(ident) = path.path.get_ident() {
            self.reference(ident);
        }
    }

    fn visit_expr_struct(&mut self, expr: &'ast ExprStruct) {
        // struct name is only a record marker
        for field in &expr.fields {
            self.visit_expr(&field.expr);
        }
        if let Some(rest) = &expr.rest {
            self.visit_expr(rest);
        }
    }

    fn visit_macro(&mut self, mac: &'ast Macro) {
        let kind = MacroKind::of(mac, self.conf);

        if let MacroKind::Tagged(tag) = kind {
            self.reference(tag);
        }

        if matches!(kind, MacroKind::Vec) {
            if let Ok(elems) = mac.parse_body_with(
                syn::punctuated::Punctuated::<Expr, syn::Token![,]>::parse_terminated,
            ) {
                elems.iter().for_each(|e| self.visit_expr(e));
            }
            return;
        }

        if !kind.is_format() {
            return;
        }

        let Ok(templ) = TemplateArgs::from_macro(mac) else {
            return;
        };
        let Ok(fragments) = templ.fragments() else {
            return;
        };

        // placeholders are visited in fragment order, matching evaluation order
        let mut visited = vec![false; templ.args.len()];
        for binding in templ.bindings(&fragments) {
            match binding {
                Binding::Arg(i) => {
                    if let (Some(expr), Some(false)) = (templ.arg_expr(i), visited.get(i)) {
                        visited[i] = true;
                        self.visit_expr(expr);
                    }
                }
                Binding::Capture(name) => self.reference_name(name, templ.format.span()),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::file::SourceFile;

    fn params(source: &str) -> Vec<String> {
        let conf = Config::default();
        let file = SourceFile::parse(source, &conf).unwrap();
        free_idents(file.stmts(), &conf).iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn declared_are_not_params() {
        let out = params(r#"
            let more_data = "DATA";
            'template: {
                html!("<header>{more_data} {}</header>", || if mood == "curious" { "<h1>X</h1>" } else { "" })
            }
        "#);
        assert_eq!(out, ["html", "mood"]);
    }

    #[test]
    fn closure_params() {
        let out = params(r#"'template: { items.iter().map(|item| format!("<li>{item}</li>")).join(sep) }"#);
        assert_eq!(out, ["items", "sep"]);
    }

    #[test]
    fn shadowing() {
        let out = params("let name = name.to_uppercase(); 'template: { name }");
        assert_eq!(out, ["name"]);
    }

    #[test]
    fn block_scope() {
        let out = params("{ let a = 1; } 'template: { a }");
        assert_eq!(out, ["a"]);
    }

    #[test]
    fn for_loop() {
        let out = params("let mut s = 0; for x in xs { s += x; } 'template: { s }");
        assert_eq!(out, ["xs"]);
    }

    #[test]
    fn struct_record() {
        let out = params("'template: { Record { name, age: 1, id: None } }");
        assert_eq!(out, ["name"]);
    }

    #[test]
    fn fragment_order() {
        let out = params(r#"'template: { format!("{b}{}{a}", c, a = d) }"#);
        assert_eq!(out, ["b", "c", "d"]);
    }

    #[test]
    fn helper_calls() {
        let out = params(r#"println!("{}", user); 'template: { upper(user) }"#);
        assert_eq!(out, ["user", "upper"]);
    }
}
