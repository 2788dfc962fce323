use quote::ToTokens;
use std::rc::Rc;
use syn::{
    Expr, ExprClosure, ExprField, ExprForLoop, ExprIf, ExprIndex, ExprPath, ExprRange,
    ExprStruct, ExprUnary, Lit, Member, RangeLimits, UnOp, punctuated::Punctuated, token::Comma,
};

use super::{Closure, Eval, Interpreter, Unwind, unsupported};
use crate::{Record, RuntimeError, Value, value::Func};

impl Interpreter {
    pub(super) fn eval_expr(&self, expr: &Expr) -> Eval {
        match expr {
            Expr::Lit(lit) => eval_lit(&lit.lit),
            Expr::Path(path) => self.eval_path(path),
            Expr::Closure(closure) => Ok(self.closure(closure)),
            Expr::Call(call) => {
                let callee = self.eval_expr(&call.func)?;
                let args = self.eval_list(&call.args)?;
                self.call(&callee, || call.func.to_token_stream().to_string(), args)
            }
            Expr::MethodCall(call) => {
                let receiver = self.eval_expr(&call.receiver)?;
                let args = self.eval_list(&call.args)?;
                Ok(super::method::call(receiver, &call.method.to_string(), args)?)
            }
            Expr::Field(field) => self.eval_field(field),
            Expr::Index(index) => self.eval_index(index),
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Unary(unary) => self.eval_unary(unary),
            Expr::Reference(reference) => self.eval_expr(&reference.expr),
            Expr::Paren(paren) => self.eval_expr(&paren.expr),
            Expr::Group(group) => self.eval_expr(&group.expr),
            Expr::If(expr) => self.eval_if(expr),
            Expr::Block(block) if block.label.is_none() => self.eval_block(&block.block),
            Expr::ForLoop(expr) if expr.label.is_none() => self.eval_for(expr),
            Expr::Range(range) => eval_range(range, self),
            Expr::Array(array) => Ok(Value::List(self.eval_list(&array.elems)?.into())),
            Expr::Tuple(tuple) if tuple.elems.is_empty() => Ok(Value::Undefined),
            Expr::Tuple(tuple) => Ok(Value::List(self.eval_list(&tuple.elems)?.into())),
            Expr::Struct(expr) => self.eval_struct(expr),
            Expr::Macro(mac) => self.eval_macro(&mac.mac),
            Expr::Return(ret) => {
                let value = match &ret.expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Undefined,
                };
                Err(Unwind::Return(value))
            }
            Expr::Assign(assign) => {
                let value = self.eval_expr(&assign.right)?;
                self.assign(&assign.left, value)?;
                Ok(Value::Undefined)
            }
            _ => unsupported(format_args!("expression `{}`", expr.to_token_stream())),
        }
    }

    pub(super) fn eval_list(&self, exprs: &Punctuated<Expr, Comma>) -> Eval<Vec<Value>> {
        exprs.iter().map(|expr| self.eval_expr(expr)).collect()
    }

    fn eval_path(&self, path: &ExprPath) -> Eval {
        let Some(ident) = path.path.get_ident() else {
            return unsupported(format_args!("path `{}`", path.to_token_stream()));
        };
        match ident.to_string().as_str() {
            "None" => Ok(Value::Null),
            name => self.lookup(name),
        }
    }

    fn closure(&self, closure: &ExprClosure) -> Value {
        self.arena.capture(&self.scope);
        Value::Func(Func::closure(Closure {
            inputs: closure.inputs.iter().cloned().collect(),
            body: (*closure.body).clone(),
            env: self.clone(),
        }))
    }

    fn eval_field(&self, field: &ExprField) -> Eval {
        let base = self.eval_expr(&field.base)?;
        match (&base, &field.member) {
            (Value::Record(record), Member::Named(name)) => {
                Ok(record.get(name.to_string().as_str()).cloned().unwrap_or_default())
            }
            (Value::List(items), Member::Unnamed(index)) => {
                Ok(items.get(index.index as usize).cloned().unwrap_or_default())
            }
            (Value::Undefined | Value::Null, member) => Err(RuntimeError::Custom(format!(
                "cannot read field `{}` of {}",
                member.to_token_stream(),
                base.type_name(),
            ))
            .into()),
            _ => Ok(Value::Undefined),
        }
    }

    fn eval_index(&self, index: &ExprIndex) -> Eval {
        let base = self.eval_expr(&index.expr)?;
        let key = self.eval_expr(&index.index)?;
        match (&base, &key) {
            (Value::List(items), Value::Int(i)) => Ok(usize::try_from(*i)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or_default()),
            (Value::Str(s), Value::Int(i)) => Ok(usize::try_from(*i)
                .ok()
                .and_then(|i| s.chars().nth(i))
                .map_or(Value::Undefined, Value::from)),
            (Value::Record(record), Value::Str(key)) => {
                Ok(record.get(&**key).cloned().unwrap_or_default())
            }
            (Value::List(_) | Value::Str(_), _) => {
                Err(RuntimeError::Type { expected: "int", found: key.type_name() }.into())
            }
            (Value::Record(_), _) => {
                Err(RuntimeError::Type { expected: "string", found: key.type_name() }.into())
            }
            _ => Err(RuntimeError::Type { expected: "list or record", found: base.type_name() }.into()),
        }
    }

    fn eval_unary(&self, unary: &ExprUnary) -> Eval {
        let value = self.eval_expr(&unary.expr)?;
        match unary.op {
            UnOp::Not(_) => Ok(Value::Bool(!value.is_truthy())),
            UnOp::Neg(_) => Ok(super::ops::neg(value)?),
            UnOp::Deref(_) => Ok(value),
            _ => unsupported("unary operator"),
        }
    }

    fn eval_if(&self, expr: &ExprIf) -> Eval {
        if let Expr::Let(_) = &*expr.cond {
            return unsupported("`if let`");
        }
        if self.eval_expr(&expr.cond)?.is_truthy() {
            self.eval_block(&expr.then_branch)
        } else if let Some((_, else_branch)) = &expr.else_branch {
            self.eval_expr(else_branch)
        } else {
            Ok(Value::Undefined)
        }
    }

    fn eval_for(&self, expr: &ExprForLoop) -> Eval {
        let items = match self.eval_expr(&expr.expr)? {
            Value::List(items) => items,
            other => {
                return Err(RuntimeError::Type { expected: "list", found: other.type_name() }.into());
            }
        };
        for item in items.iter() {
            let frame = self.child();
            frame.bind(&expr.pat, item.clone())?;
            frame.eval_block(&expr.body)?;
        }
        Ok(Value::Undefined)
    }

    fn eval_struct(&self, expr: &ExprStruct) -> Eval {
        let mut fields = Vec::with_capacity(expr.fields.len());
        for field in &expr.fields {
            let Member::Named(name) = &field.member else {
                return unsupported("unnamed field in struct literal");
            };
            fields.push((Rc::<str>::from(name.to_string()), self.eval_expr(&field.expr)?));
        }

        let mut record = match &expr.rest {
            Some(rest) => match self.eval_expr(rest)? {
                Value::Record(record) => Record::clone(&record),
                other => {
                    return Err(RuntimeError::Type { expected: "record", found: other.type_name() }.into());
                }
            },
            None => Record::with_capacity(fields.len()),
        };
        record.extend(fields);
        Ok(Value::Record(Rc::new(record)))
    }

    /// Assignment target, only local variables are assignable.
    pub(super) fn assign(&self, target: &Expr, value: Value) -> Eval<()> {
        let Expr::Path(path) = target else {
            return unsupported(format_args!("assignment to `{}`", target.to_token_stream()));
        };
        let Some(ident) = path.path.get_ident() else {
            return unsupported(format_args!("assignment to `{}`", target.to_token_stream()));
        };
        let name = ident.to_string();
        match self.scope.assign(&name, value) {
            true => Ok(()),
            false => Err(RuntimeError::Unbound { name }.into()),
        }
    }
}

fn eval_lit(lit: &Lit) -> Eval {
    Ok(match lit {
        Lit::Str(lit) => Value::from(lit.value()),
        Lit::Char(lit) => Value::from(lit.value()),
        Lit::Int(lit) => Value::Int(lit.base10_parse()?),
        Lit::Float(lit) => Value::Float(lit.base10_parse()?),
        Lit::Bool(lit) => Value::Bool(lit.value),
        _ => return unsupported(format_args!("literal `{}`", lit.to_token_stream())),
    })
}

/// `a..b` and `a..=b` over integers, evaluated into a list.
fn eval_range(range: &ExprRange, interp: &Interpreter) -> Eval {
    let (Some(start), Some(end)) = (&range.start, &range.end) else {
        return unsupported("unbounded range");
    };
    let bound = |expr: &Expr| -> Eval<i64> {
        match interp.eval_expr(expr)? {
            Value::Int(i) => Ok(i),
            other => Err(RuntimeError::Type { expected: "int", found: other.type_name() }.into()),
        }
    };
    let (start, end) = (bound(start)?, bound(end)?);
    Ok(match range.limits {
        RangeLimits::HalfOpen(_) => (start..end).map(Value::Int).collect::<Vec<_>>().into(),
        RangeLimits::Closed(_) => (start..=end).map(Value::Int).collect::<Vec<_>>().into(),
    })
}

#[cfg(test)]
mod test {
    use crate::{Context, Error, RuntimeError, Value, eval::Session};
    use std::rc::Rc;
    use tagfmt_parser::config::Config;

    fn eval(source: &str) -> crate::Result<Value> {
        let ctx = Context::new()
            .with("user", Value::record([("name", "Romaric"), ("mood", "curious")]))
            .with("items", Value::list(["a", "b", "c"]));
        let expr = syn::parse_str::<syn::Expr>(source)?;
        let session = Session::new(Rc::new(Config::default()));
        for (name, value) in ctx.iter() {
            session.declare(name.into(), value.clone());
        }
        super::super::finish(session.eval_expr(&expr))
    }

    #[test]
    fn literals() {
        assert_eq!(eval("\"a\"").unwrap(), Value::from("a"));
        assert_eq!(eval("'c'").unwrap(), Value::from("c"));
        assert_eq!(eval("12").unwrap(), Value::Int(12));
        assert_eq!(eval("1.5").unwrap(), Value::Float(1.5));
        assert_eq!(eval("None").unwrap(), Value::Null);
        assert_eq!(eval("()").unwrap(), Value::Undefined);
    }

    #[test]
    fn field_and_index() {
        assert_eq!(eval("user.name").unwrap(), Value::from("Romaric"));
        assert_eq!(eval("user.missing").unwrap(), Value::Undefined);
        assert_eq!(eval("user[\"mood\"]").unwrap(), Value::from("curious"));
        assert_eq!(eval("items[1]").unwrap(), Value::from("b"));
        assert_eq!(eval("items[9]").unwrap(), Value::Undefined);
        assert!(eval("user.name.first.x").is_err());
    }

    #[test]
    fn conditional() {
        assert_eq!(eval("if user.mood == \"curious\" { 1 } else { 2 }").unwrap(), Value::Int(1));
        assert_eq!(eval("if false { 1 } else if 0 { 2 } else { 3 }").unwrap(), Value::Int(3));
        assert_eq!(eval("if false { 1 }").unwrap(), Value::Undefined);
    }

    #[test]
    fn struct_record() {
        let value = eval("Any { b: 2, a: user.name }").unwrap();
        assert_eq!(value, Value::record([("b", Value::Int(2)), ("a", Value::from("Romaric"))]));

        let value = eval("Any { mood: \"calm\", ..user }").unwrap();
        assert_eq!(value, Value::record([("name", "Romaric"), ("mood", "calm")]));
    }

    #[test]
    fn loop_and_range() {
        let value = eval("{ let mut n = 0; for i in 1..=4 { n += i; } n }").unwrap();
        assert_eq!(value, Value::Int(10));
    }

    #[test]
    fn unsupported() {
        let err = eval("loop {}").unwrap_err();
        assert!(matches!(err, Error::Runtime(RuntimeError::Unsupported(_))));
    }
}
