//! Evaluate rewritten template statements.
//!
//! A tree walking interpreter over the subset of rust syntax a template body may use. Each render
//! runs in a [`Session`], scopes captured by closures are released when the session ends.
use std::{ops::Deref, rc::Rc};
use syn::{Block, Expr, Pat, Stmt};
use tagfmt_parser::config::Config;

use crate::{Error, Result, RuntimeError, Value};

mod scope;
mod expr;
mod ops;
mod method;
mod macros;

use scope::{Arena, Scope};

/// Non local exit of evaluation.
pub(crate) enum Unwind {
    /// `return`, carries the returned value up to the enclosing function.
    Return(Value),
    Error(Error),
}

type Eval<T = Value> = std::result::Result<T, Unwind>;

impl From<Error> for Unwind {
    fn from(value: Error) -> Self {
        Self::Error(value)
    }
}

impl From<RuntimeError> for Unwind {
    fn from(value: RuntimeError) -> Self {
        Self::Error(value.into())
    }
}

impl From<syn::Error> for Unwind {
    fn from(value: syn::Error) -> Self {
        Self::Error(value.into())
    }
}

/// Function boundary, catch `return`.
fn finish(result: Eval) -> Result<Value> {
    match result {
        Ok(value) | Err(Unwind::Return(value)) => Ok(value),
        Err(Unwind::Error(err)) => Err(err),
    }
}

fn unsupported<T>(what: impl std::fmt::Display) -> Eval<T> {
    Err(RuntimeError::Unsupported(what.to_string()).into())
}

#[derive(Clone)]
pub(crate) struct Interpreter {
    scope: Rc<Scope>,
    arena: Rc<Arena>,
    conf: Rc<Config>,
}

impl Interpreter {
    fn child(&self) -> Interpreter {
        Interpreter {
            scope: self.arena.child(&self.scope),
            arena: self.arena.clone(),
            conf: self.conf.clone(),
        }
    }

    pub(crate) fn declare(&self, name: Rc<str>, value: Value) {
        self.scope.declare(name, value);
    }

    fn lookup(&self, name: &str) -> Eval {
        match self.scope.get(name) {
            Some(value) => Ok(value),
            None => Err(RuntimeError::Unbound { name: name.into() }.into()),
        }
    }

    /// Run function body, running off the end returns [`Value::Undefined`].
    pub(crate) fn run(&self, stmts: &[Stmt]) -> Result<Value> {
        finish(self.eval_stmts(stmts).map(|_| Value::Undefined))
    }

    /// Evaluates to the value of trailing expression.
    fn eval_stmts(&self, stmts: &[Stmt]) -> Eval {
        let mut last = Value::Undefined;
        for stmt in stmts {
            last = self.eval_stmt(stmt)?;
        }
        Ok(last)
    }

    fn eval_stmt(&self, stmt: &Stmt) -> Eval {
        match stmt {
            Stmt::Local(local) => {
                let value = match &local.init {
                    Some(init) if init.diverge.is_some() => return unsupported("`let else`"),
                    Some(init) => self.eval_expr(&init.expr)?,
                    None => Value::Undefined,
                };
                self.bind(&local.pat, value)?;
                Ok(Value::Undefined)
            }
            Stmt::Expr(expr, semi) => {
                let value = self.eval_expr(expr)?;
                Ok(if semi.is_some() { Value::Undefined } else { value })
            }
            Stmt::Macro(stmt) => {
                let value = self.eval_macro(&stmt.mac)?;
                Ok(if stmt.semi_token.is_some() { Value::Undefined } else { value })
            }
            Stmt::Item(_) => unsupported("item declaration"),
        }
    }

    fn eval_block(&self, block: &Block) -> Eval {
        self.child().eval_stmts(&block.stmts)
    }

    fn bind(&self, pat: &Pat, value: Value) -> Eval<()> {
        match pat {
            Pat::Ident(pat) if pat.subpat.is_none() => {
                self.declare(pat.ident.to_string().into(), value);
                Ok(())
            }
            Pat::Wild(_) => Ok(()),
            Pat::Type(pat) => self.bind(&pat.pat, value),
            Pat::Reference(pat) => self.bind(&pat.pat, value),
            Pat::Paren(pat) => self.bind(&pat.pat, value),
            Pat::Tuple(pat) => self.bind_list(pat.elems.iter(), value),
            Pat::Slice(pat) => self.bind_list(pat.elems.iter(), value),
            _ => unsupported("pattern"),
        }
    }

    fn bind_list<'a>(&self, pats: impl Iterator<Item = &'a Pat>, value: Value) -> Eval<()> {
        let items = match value {
            Value::List(items) => items,
            other => {
                return Err(RuntimeError::Type { expected: "list", found: other.type_name() }.into());
            }
        };
        for (i, pat) in pats.enumerate() {
            self.bind(pat, items.get(i).cloned().unwrap_or_default())?;
        }
        Ok(())
    }

    fn call(&self, callee: &Value, name: impl FnOnce() -> String, args: Vec<Value>) -> Eval {
        match callee {
            Value::Func(f) => Ok(f.call(args)?),
            _ => Err(RuntimeError::NotCallable { name: name(), found: callee.type_name() }.into()),
        }
    }
}

/// Evaluation state of a single render.
///
/// Closures capture their scope, and may be stored in that same scope. Dropping the session
/// clears every captured scope, which releases those cycles.
pub(crate) struct Session(Interpreter);

impl Session {
    pub(crate) fn new(conf: Rc<Config>) -> Session {
        let arena = Rc::new(Arena::default());
        Session(Interpreter {
            scope: arena.root(),
            arena,
            conf,
        })
    }
}

impl Deref for Session {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.0.arena.clear();
    }
}

/// Closure value, `|a, b| body`.
pub(crate) struct Closure {
    inputs: Vec<Pat>,
    body: Expr,
    env: Interpreter,
}

impl Closure {
    pub(crate) fn call(&self, args: Vec<Value>) -> Result<Value> {
        finish(self.invoke(args))
    }

    fn invoke(&self, args: Vec<Value>) -> Eval {
        let Some(_guard) = self.env.arena.enter() else {
            return Err(RuntimeError::RecursionLimit { limit: Arena::RECURSION_LIMIT }.into());
        };
        let frame = self.env.child();
        let mut args = args.into_iter();
        for pat in &self.inputs {
            frame.bind(pat, args.next().unwrap_or_default())?;
        }
        frame.eval_expr(&self.body)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Context;

    /// Evaluate statements with `ctx` declared in root scope.
    fn run(source: &str, ctx: Context) -> Result<Value> {
        let stmts = syn::parse_str::<syn::Block>(&format!("{{ {source} }}"))?.stmts;
        let session = Session::new(Rc::new(Config::default()));
        for (name, value) in ctx.iter() {
            session.declare(name.into(), value.clone());
        }
        session.run(&stmts)
    }

    #[test]
    fn return_value() {
        let out = run("let a = 1; let b = a + 2; return b * 2;", Context::new()).unwrap();
        assert_eq!(out, Value::Int(6));
    }

    #[test]
    fn no_return() {
        let out = run("let a = 1; a", Context::new()).unwrap();
        assert_eq!(out, Value::Undefined);
    }

    #[test]
    fn shadowing_scope() {
        let out = run("let a = 1; { let a = 2; } return a;", Context::new()).unwrap();
        assert_eq!(out, Value::Int(1));
    }

    #[test]
    fn assign_outer() {
        let out = run("let mut a = 1; { a = 5; } a += 1; return a;", Context::new()).unwrap();
        assert_eq!(out, Value::Int(6));
    }

    #[test]
    fn closure_captures() {
        let out = run("let n = 10; let add = |x| x + n; return add(5);", Context::new()).unwrap();
        assert_eq!(out, Value::Int(15));
    }

    #[test]
    fn closure_returns() {
        let out = run("let f = || { return 1; 2 }; return f() + 1;", Context::new()).unwrap();
        assert_eq!(out, Value::Int(2));
    }

    #[test]
    fn destructure() {
        let out = run("let (a, _, c) = (1, 2, 3); return [c, a];", Context::new()).unwrap();
        assert_eq!(out, Value::list([3, 1]));
    }

    #[test]
    fn unbound() {
        let err = run("return missing;", Context::new()).unwrap_err();
        assert_eq!(err.to_string(), "cannot find value `missing` in this scope");
    }

    #[test]
    fn not_callable() {
        let err = run("return name();", Context::new().with("name", "x")).unwrap_err();
        assert_eq!(err.to_string(), "`name` is not a function, found string");
    }

    #[test]
    fn unsupported_item() {
        let err = run("fn f() {} return 1;", Context::new()).unwrap_err();
        assert!(matches!(err, Error::Runtime(RuntimeError::Unsupported(_))));
    }

    #[test]
    fn session_release() {
        let stmts = syn::parse_str::<syn::Block>("{ let f = || f; return f; }").unwrap().stmts;
        let session = Session::new(Rc::new(Config::default()));
        let value = session.run(&stmts).unwrap();
        let arena = Rc::downgrade(&session.arena);
        drop(session);
        drop(value);
        assert!(arena.upgrade().is_none());
    }

    #[test]
    fn loop_scopes_are_not_retained() {
        let stmts = syn::parse_str::<syn::Block>(
            "{ let mut n = 0; for i in 0..100000 { let j = i; n += j; } return n; }",
        )
        .unwrap()
        .stmts;
        let session = Session::new(Rc::new(Config::default()));
        assert_eq!(session.run(&stmts).unwrap(), Value::Int(4_999_950_000));
        assert_eq!(session.arena.len(), 1);
    }

    #[test]
    fn closure_scopes_are_captured() {
        let stmts = syn::parse_str::<syn::Block>(
            "{ let mut fs = []; for i in 0..3 { fs = [|| i]; } return fs; }",
        )
        .unwrap()
        .stmts;
        let session = Session::new(Rc::new(Config::default()));
        session.run(&stmts).unwrap();
        // root, then the loop frame and body of each iteration
        assert_eq!(session.arena.len(), 1 + 3 * 2);
    }

    #[test]
    fn recursion_limit() {
        let stmts = syn::parse_str::<syn::Block>(
            "{ let f = |n| if n == 0 { 0 } else { 1 + f(n - 1) }; return [f(10), f(100000)]; }",
        )
        .unwrap()
        .stmts;
        let session = Session::new(Rc::new(Config::default()));
        let err = session.run(&stmts).unwrap_err();
        assert!(matches!(err, Error::Runtime(RuntimeError::RecursionLimit { limit: 64 })));

        let stmts = syn::parse_str::<syn::Block>(
            "{ let f = |n| if n == 0 { 0 } else { 1 + f(n - 1) }; return f(10); }",
        )
        .unwrap()
        .stmts;
        assert_eq!(session.run(&stmts).unwrap(), Value::Int(10));
    }
}
