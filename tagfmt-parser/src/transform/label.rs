use syn::{
    Expr, ExprBlock, ExprBreak, ExprReturn, Ident, Stmt,
    visit_mut::{self, VisitMut},
};

/// Label to return pass.
///
/// Statement level `'template: { .. }` becomes `return { .. };`, a `break 'template value`
/// inside it becomes `return value`.
pub struct LabelVisitor {
    label: Ident,
    count: usize,
    depth: usize,
}

impl LabelVisitor {
    pub fn new(label: Ident) -> Self {
        Self { label, count: 0, depth: 0 }
    }

    /// Visit all statements, returns the count of labeled blocks replaced.
    pub fn visit_all(mut self, stmts: &mut [Stmt]) -> usize {
        for stmt in stmts {
            self.visit_stmt_mut(stmt);
        }
        self.count
    }

    fn is_label(&self, expr: &ExprBlock) -> bool {
        matches!(&expr.label, Some(label) if label.name.ident == self.label)
    }
}

impl VisitMut for LabelVisitor {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        let Stmt::Expr(Expr::Block(block), _) = stmt else {
            return visit_mut::visit_stmt_mut(self, stmt);
        };

        if !self.is_label(block) {
            return visit_mut::visit_stmt_mut(self, stmt);
        }

        self.count += 1;
        self.depth += 1;
        visit_mut::visit_expr_block_mut(self, block);
        self.depth -= 1;

        let mut block = block.clone();
        block.label = None;

        *stmt = Stmt::Expr(
            Expr::Return(ExprReturn {
                attrs: vec![],
                return_token: <_>::default(),
                expr: Some(Box::new(Expr::Block(block))),
            }),
            Some(<_>::default()),
        );
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        visit_mut::visit_expr_mut(self, expr);

        if self.depth == 0 {
            return;
        }

        if let Expr::Break(ExprBreak { attrs, label: Some(label), expr: value, .. }) = expr {
            if label.ident == self.label {
                *expr = Expr::Return(ExprReturn {
                    attrs: std::mem::take(attrs),
                    return_token: <_>::default(),
                    expr: value.take(),
                });
            }
        }
    }
}

#[cfg(test)]
mod test {
    use quote::quote;
    use syn::{Block, parse::Parser};

    use super::*;

    fn rewrite(source: &str) -> (usize, String) {
        let mut stmts = Block::parse_within.parse_str(source).unwrap();
        let label = quote::format_ident!("template");
        let count = LabelVisitor::new(label).visit_all(&mut stmts);
        (count, quote!(#(#stmts)*).to_string())
    }

    #[test]
    fn labeled_block() {
        let (count, out) = rewrite("let a = 1; 'template: { a }");
        assert_eq!(count, 1);
        assert_eq!(out, quote!(let a = 1; return { a };).to_string());
    }

    #[test]
    fn break_label() {
        let (count, out) = rewrite("'template: { if a { break 'template 1; } 2 }");
        assert_eq!(count, 1);
        assert_eq!(out, quote!(return { if a { return 1; } 2 };).to_string());
    }

    #[test]
    fn other_label() {
        let (count, out) = rewrite("'other: { 1 }");
        assert_eq!(count, 0);
        assert_eq!(out, quote!('other: { 1 }).to_string());
    }

    #[test]
    fn counted() {
        let (count, _) = rewrite("'template: { 1 } let f = || { 'template: { 2 } };");
        assert_eq!(count, 2);
    }
}
