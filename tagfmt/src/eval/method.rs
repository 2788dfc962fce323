//! Built in methods.
use std::rc::Rc;

use crate::{
    Result, RuntimeError, Value,
    process::{process, process_into},
    value::Func,
};

pub(super) fn call(receiver: Value, method: &str, args: Vec<Value>) -> Result<Value> {
    let ty = receiver.type_name();
    let mut args = Args { method, args: args.into_iter() };

    Ok(match (method, receiver) {
        ("clone" | "to_owned" | "into" | "as_str" | "iter" | "into_iter" | "collect", value) => value,
        ("to_string", value) => Value::from(process(&value)?),

        ("len", Value::Str(s)) => Value::from(s.chars().count()),
        ("len", Value::List(items)) => Value::from(items.len()),
        ("len", Value::Record(record)) => Value::from(record.len()),
        ("is_empty", Value::Str(s)) => Value::Bool(s.is_empty()),
        ("is_empty", Value::List(items)) => Value::Bool(items.is_empty()),
        ("is_empty", Value::Record(record)) => Value::Bool(record.is_empty()),

        ("to_uppercase", Value::Str(s)) => Value::from(s.to_uppercase()),
        ("to_lowercase", Value::Str(s)) => Value::from(s.to_lowercase()),
        ("trim", Value::Str(s)) => Value::from(s.trim()),
        ("contains", Value::Str(s)) => match args.next()? {
            Value::Str(needle) => Value::Bool(s.contains(&*needle)),
            other => return Err(RuntimeError::Type { expected: "string", found: other.type_name() }.into()),
        },

        ("contains", Value::List(items)) => {
            let needle = args.next()?;
            Value::Bool(items.contains(&needle))
        }
        ("map", Value::List(items)) => {
            let f = args.func()?;
            Value::List(
                items
                    .iter()
                    .map(|item| f.call(vec![item.clone()]))
                    .collect::<Result<Rc<[Value]>>>()?,
            )
        }
        ("filter", Value::List(items)) => {
            let f = args.func()?;
            let mut kept = Vec::with_capacity(items.len());
            for item in items.iter() {
                if f.call(vec![item.clone()])?.is_truthy() {
                    kept.push(item.clone());
                }
            }
            Value::from(kept)
        }
        ("join", Value::List(items)) => {
            let sep = match args.optional() {
                Some(Value::Str(sep)) => sep,
                Some(other) => {
                    return Err(RuntimeError::Type { expected: "string", found: other.type_name() }.into());
                }
                None => "".into(),
            };
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i != 0 {
                    out.push_str(&sep);
                }
                process_into(item, &mut out)?;
            }
            Value::from(out)
        }

        ("get", Value::List(items)) => match args.next()? {
            Value::Int(i) => usize::try_from(i).ok().and_then(|i| items.get(i)).cloned().into(),
            other => return Err(RuntimeError::Type { expected: "int", found: other.type_name() }.into()),
        },
        ("get", Value::Record(record)) => match args.next()? {
            Value::Str(key) => record.get(&*key).cloned().into(),
            other => return Err(RuntimeError::Type { expected: "string", found: other.type_name() }.into()),
        },

        ("is_some", value) => Value::Bool(!value.is_nullish()),
        ("is_none", value) => Value::Bool(value.is_nullish()),
        ("unwrap_or", value) if value.is_nullish() => args.next()?,
        ("unwrap_or", value) => value,

        _ => return Err(RuntimeError::NoMethod { method: method.into(), ty }.into()),
    })
}

struct Args<'a> {
    method: &'a str,
    args: std::vec::IntoIter<Value>,
}

impl Args<'_> {
    fn next(&mut self) -> Result<Value> {
        match self.args.next() {
            Some(value) => Ok(value),
            None => Err(RuntimeError::Custom(format!("`{}` expects an argument", self.method)).into()),
        }
    }

    fn optional(&mut self) -> Option<Value> {
        self.args.next()
    }

    fn func(&mut self) -> Result<Func> {
        match self.next()? {
            Value::Func(f) => Ok(f),
            other => Err(RuntimeError::Type { expected: "function", found: other.type_name() }.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn list() -> Value {
        Value::list(["a", "bb", "ccc"])
    }

    #[test]
    fn strings() {
        assert_eq!(call(Value::from(" Hi "), "trim", vec![]).unwrap(), Value::from("Hi"));
        assert_eq!(call(Value::from("Hi"), "to_uppercase", vec![]).unwrap(), Value::from("HI"));
        assert_eq!(call(Value::from("héllo"), "len", vec![]).unwrap(), Value::Int(5));
        assert_eq!(
            call(Value::from("curious"), "contains", vec![Value::from("rio")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(call(Value::Int(4), "to_string", vec![]).unwrap(), Value::from("4"));
    }

    #[test]
    fn map_filter_join() {
        let len = Value::func("len", |args| call(args[0].clone(), "len", vec![]));
        let mapped = call(list(), "map", vec![len]).unwrap();
        assert_eq!(mapped, Value::list([1, 2, 3]));

        let long = Value::func("long", |args| Ok(Value::Bool(args[0].as_ref().len() > 1)));
        let filtered = call(list(), "filter", vec![long]).unwrap();
        assert_eq!(filtered, Value::list(["bb", "ccc"]));

        let joined = call(list(), "join", vec![Value::from(", ")]).unwrap();
        assert_eq!(joined, Value::from("a, bb, ccc"));
    }

    #[test]
    fn option_like() {
        assert_eq!(call(Value::Null, "unwrap_or", vec![Value::from("x")]).unwrap(), Value::from("x"));
        assert_eq!(call(Value::from("y"), "unwrap_or", vec![Value::from("x")]).unwrap(), Value::from("y"));
        assert_eq!(call(Value::Undefined, "is_none", vec![]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn errors() {
        let err = call(Value::Int(1), "trim", vec![]).unwrap_err();
        assert_eq!(err.to_string(), "no method `trim` found for int");
        let err = call(list(), "map", vec![]).unwrap_err();
        assert_eq!(err.to_string(), "`map` expects an argument");
    }
}
