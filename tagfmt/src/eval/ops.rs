use std::cmp::Ordering;
use syn::{BinOp, ExprBinary};

use super::{Eval, Interpreter, unsupported};
use crate::{Result, RuntimeError, Value, process::process};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    /// Operator and whether it is a compound assignment.
    fn of(op: &BinOp) -> Option<(Op, bool)> {
        Some(match op {
            BinOp::Add(_) => (Op::Add, false),
            BinOp::Sub(_) => (Op::Sub, false),
            BinOp::Mul(_) => (Op::Mul, false),
            BinOp::Div(_) => (Op::Div, false),
            BinOp::Rem(_) => (Op::Rem, false),
            BinOp::Eq(_) => (Op::Eq, false),
            BinOp::Ne(_) => (Op::Ne, false),
            BinOp::Lt(_) => (Op::Lt, false),
            BinOp::Le(_) => (Op::Le, false),
            BinOp::Gt(_) => (Op::Gt, false),
            BinOp::Ge(_) => (Op::Ge, false),
            BinOp::AddAssign(_) => (Op::Add, true),
            BinOp::SubAssign(_) => (Op::Sub, true),
            BinOp::MulAssign(_) => (Op::Mul, true),
            BinOp::DivAssign(_) => (Op::Div, true),
            BinOp::RemAssign(_) => (Op::Rem, true),
            _ => return None,
        })
    }
}

impl Interpreter {
    pub(super) fn eval_binary(&self, binary: &ExprBinary) -> Eval {
        match binary.op {
            BinOp::And(_) => {
                let truthy = self.eval_expr(&binary.left)?.is_truthy()
                    && self.eval_expr(&binary.right)?.is_truthy();
                return Ok(Value::Bool(truthy));
            }
            BinOp::Or(_) => {
                let truthy = self.eval_expr(&binary.left)?.is_truthy()
                    || self.eval_expr(&binary.right)?.is_truthy();
                return Ok(Value::Bool(truthy));
            }
            _ => {}
        }

        let Some((op, assign)) = Op::of(&binary.op) else {
            return unsupported("binary operator");
        };
        let left = self.eval_expr(&binary.left)?;
        let right = self.eval_expr(&binary.right)?;
        let value = apply(op, left, right)?;

        if assign {
            self.assign(&binary.left, value)?;
            return Ok(Value::Undefined);
        }
        Ok(value)
    }
}

fn apply(op: Op, left: Value, right: Value) -> Result<Value> {
    match op {
        Op::Eq => Ok(Value::Bool(left == right)),
        Op::Ne => Ok(Value::Bool(left != right)),
        Op::Lt | Op::Le | Op::Gt | Op::Ge => {
            let ord = compare(&left, &right)?;
            Ok(Value::Bool(match (op, ord) {
                (_, None) => false,
                (Op::Lt, Some(ord)) => ord.is_lt(),
                (Op::Le, Some(ord)) => ord.is_le(),
                (Op::Gt, Some(ord)) => ord.is_gt(),
                (_, Some(ord)) => ord.is_ge(),
            }))
        }
        Op::Add if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) => {
            let mut out = process(&left)?;
            out.push_str(&process(&right)?);
            Ok(Value::from(out))
        }
        _ => arithmetic(op, left, right),
    }
}

fn compare(left: &Value, right: &Value) -> Result<Option<Ordering>> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        _ => match (number(left), number(right)) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => Err(mismatch(left, right)),
        },
    }
}

fn arithmetic(op: Op, left: Value, right: Value) -> Result<Value> {
    if let (Value::Int(a), Value::Int(b)) = (&left, &right) {
        let (a, b) = (*a, *b);
        let value = match op {
            Op::Add => a.checked_add(b),
            Op::Sub => a.checked_sub(b),
            Op::Mul => a.checked_mul(b),
            Op::Div if b == 0 => return Err(RuntimeError::Custom("attempt to divide by zero".into()).into()),
            Op::Div => a.checked_div(b),
            Op::Rem if b == 0 => {
                return Err(RuntimeError::Custom(
                    "attempt to calculate the remainder with a divisor of zero".into(),
                )
                .into());
            }
            Op::Rem => a.checked_rem(b),
            _ => unreachable!("comparison is handled in `apply`"),
        };
        return value
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Custom("arithmetic overflow".into()).into());
    }

    let (Some(a), Some(b)) = (number(&left), number(&right)) else {
        return Err(mismatch(&left, &right));
    };
    Ok(Value::Float(match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
        Op::Rem => a % b,
        _ => unreachable!("comparison is handled in `apply`"),
    }))
}

pub(super) fn neg(value: Value) -> Result<Value> {
    match value {
        Value::Int(i) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Custom("arithmetic overflow".into()).into()),
        Value::Float(f) => Ok(Value::Float(-f)),
        other => Err(RuntimeError::Type { expected: "number", found: other.type_name() }.into()),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn mismatch(left: &Value, right: &Value) -> crate::Error {
    let found = match number(left) {
        Some(_) => right.type_name(),
        None => left.type_name(),
    };
    RuntimeError::Type { expected: "number", found }.into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn int_arithmetic() {
        assert_eq!(apply(Op::Add, Value::Int(2), Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(apply(Op::Div, Value::Int(7), Value::Int(2)).unwrap(), Value::Int(3));
        assert_eq!(apply(Op::Rem, Value::Int(7), Value::Int(2)).unwrap(), Value::Int(1));
        assert!(apply(Op::Div, Value::Int(1), Value::Int(0)).is_err());
        assert!(apply(Op::Add, Value::Int(i64::MAX), Value::Int(1)).is_err());
    }

    #[test]
    fn float_promotion() {
        assert_eq!(apply(Op::Mul, Value::Int(2), Value::Float(1.5)).unwrap(), Value::Float(3.0));
        assert_eq!(apply(Op::Lt, Value::Int(1), Value::Float(1.5)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn string_concat() {
        let out = apply(Op::Add, Value::from("n = "), Value::Int(4)).unwrap();
        assert_eq!(out, Value::from("n = 4"));
    }

    #[test]
    fn compare_strings() {
        assert_eq!(apply(Op::Ge, Value::from("b"), Value::from("a")).unwrap(), Value::Bool(true));
        assert_eq!(apply(Op::Eq, Value::from("a"), Value::from("a")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn type_mismatch() {
        let err = apply(Op::Sub, Value::Int(1), Value::from(true)).unwrap_err();
        assert_eq!(err.to_string(), "expected number, found bool");
        assert!(apply(Op::Lt, Value::from("a"), Value::Int(1)).is_err());
    }
}
