//! Value processor, turns any [`Value`] into text.
use crate::{Result, Value, Writer};

/// Process value into string.
///
/// - functions are called without arguments, and the result is processed
/// - lists are processed element wise and concatenated
/// - records are serialized as json
/// - `null`, `undefined` and `false` become empty string
pub fn process(value: &Value) -> Result<String> {
    let mut buffer = String::new();
    process_into(value, &mut buffer)?;
    Ok(buffer)
}

/// Process value into [`Writer`].
pub fn process_into<W: Writer + ?Sized>(value: &Value, writer: &mut W) -> Result<()> {
    match value {
        Value::Func(f) => process_into(&f.call(vec![])?, writer),
        Value::List(items) => {
            for item in items.iter() {
                process_into(item, writer)?;
            }
            Ok(())
        }
        Value::Record(_) => match value.to_json() {
            Some(json) => writer.write_str(&json.to_string()),
            None => Ok(()),
        },
        Value::Str(s) => writer.write_str(s),
        Value::Int(i) => writer.write_str(itoa::Buffer::new().format(*i)),
        Value::Float(f) => writer.write_str(&format_float(*f)),
        Value::Bool(true) => writer.write_str("true"),
        Value::Bool(false) | Value::Null | Value::Undefined => Ok(()),
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".into()
    } else if f.is_infinite() {
        let inf = if f > 0.0 { "Infinity" } else { "-Infinity" };
        inf.into()
    } else if f == 0.0 {
        // `-0` displays as `0`
        "0".into()
    } else {
        f.to_string()
    }
}
