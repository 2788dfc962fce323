//! Runtime values.
use indexmap::IndexMap;
use serde_json::Value as Json;
use std::{fmt, rc::Rc};

use crate::{Result, eval::Closure};

/// Insertion ordered record fields.
pub type Record = IndexMap<Rc<str>, Value>;

/// A value bound to a template parameter, or produced while evaluating one.
///
/// Cloning is cheap, strings, lists and records are reference counted.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Missing value, a parameter that is not provided.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<[Value]>),
    Record(Rc<Record>),
    Func(Func),
}

impl Value {
    /// Create native function value.
    pub fn func(
        name: impl Into<Box<str>>,
        f: impl Fn(Vec<Value>) -> Result<Value> + 'static,
    ) -> Value {
        Value::Func(Func::native(name, f))
    }

    /// Create record value from fields.
    pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Value
    where
        K: Into<Rc<str>>,
        V: Into<Value>,
    {
        Value::Record(Rc::new(
            fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }

    /// Create list value.
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Func(_) => "function",
        }
    }

    /// `false`, `null`, `undefined`, `0`, `NaN` and empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::List(_) | Value::Record(_) | Value::Func(_) => true,
        }
    }

    /// Returns `true` for [`Value::Null`] and [`Value::Undefined`].
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Func> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Convert to json.
    ///
    /// Returns `None` for values json cannot represent, functions and undefined. Those are
    /// omitted from records and become `null` in lists.
    pub fn to_json(&self) -> Option<Json> {
        Some(match self {
            Value::Undefined | Value::Func(_) => return None,
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => float_json(*f),
            Value::Str(s) => Json::String(s.to_string()),
            Value::List(items) => Json::Array(
                items.iter().map(|e| e.to_json().unwrap_or(Json::Null)).collect(),
            ),
            Value::Record(record) => Json::Object(
                record
                    .iter()
                    .filter_map(|(k, v)| Some((k.to_string(), v.to_json()?)))
                    .collect(),
            ),
        })
    }
}

/// integral floats serialize without fraction
fn float_json(f: f64) -> Json {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;

    if f.fract() == 0.0 && f.abs() <= MAX_SAFE {
        return Json::from(f as i64);
    }
    serde_json::Number::from_f64(f).map_or(Json::Null, Json::Number)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// ===== Func =====

/// Callable value.
#[derive(Clone)]
pub struct Func(Rc<FuncKind>);

enum FuncKind {
    Native {
        name: Box<str>,
        f: Box<dyn Fn(Vec<Value>) -> Result<Value>>,
    },
    Closure(Closure),
}

impl Func {
    pub fn native(name: impl Into<Box<str>>, f: impl Fn(Vec<Value>) -> Result<Value> + 'static) -> Func {
        Func(Rc::new(FuncKind::Native { name: name.into(), f: Box::new(f) }))
    }

    pub(crate) fn closure(closure: Closure) -> Func {
        Func(Rc::new(FuncKind::Closure(closure)))
    }

    pub fn name(&self) -> &str {
        match &*self.0 {
            FuncKind::Native { name, .. } => name,
            FuncKind::Closure(_) => "closure",
        }
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value> {
        match &*self.0 {
            FuncKind::Native { f, .. } => f(args),
            FuncKind::Closure(closure) => closure.call(args),
        }
    }

    /// Returns `true` if both are the same function.
    pub fn ptr_eq(&self, other: &Func) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func({})", self.name())
    }
}

// ===== Conversion =====

macro_rules! from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

from! {
    bool => |v| Value::Bool(v),
    i32 => |v| Value::Int(v.into()),
    u32 => |v| Value::Int(v.into()),
    i64 => |v| Value::Int(v),
    usize => |v| i64::try_from(v).map_or(Value::Float(v as f64), Value::Int),
    f32 => |v| Value::Float(v.into()),
    f64 => |v| Value::Float(v),
    &str => |v| Value::Str(v.into()),
    String => |v| Value::Str(v.into()),
    Rc<str> => |v| Value::Str(v),
    char => |v| Value::Str(v.to_string().into()),
    Record => |v| Value::Record(Rc::new(v)),
    Func => |v| Value::Func(v),
    Json => |v| Value::from_json(v),
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::list(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl Value {
    /// Convert from json, numbers become [`Value::Int`] when they fit.
    pub fn from_json(json: Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::list(items),
            Json::Object(map) => Value::record(map),
        }
    }
}
