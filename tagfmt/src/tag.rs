//! Template tags, interleave fragments with processed values.
use crate::{Escape, Result, RuntimeError, Value, Writer, process::process_into};

/// Render tagged template.
///
/// `fragments` must have exactly one more element than `values`. Each value is processed with
/// [`process`][crate::process] and placed between its surrounding fragments.
///
/// ```
/// use tagfmt::{Value, tag};
///
/// let out = tag(&["<p>", "</p>"], &[Value::from("x")]).unwrap();
/// assert_eq!(out, "<p>x</p>");
/// ```
pub fn tag(fragments: &[impl AsRef<str>], values: &[Value]) -> Result<String> {
    let mut buffer = String::with_capacity(fragments.iter().map(|e| e.as_ref().len()).sum());
    tag_into(&mut buffer, fragments, values)?;
    Ok(buffer)
}

/// Render tagged template into [`Writer`].
pub fn tag_into(
    writer: &mut impl Writer,
    fragments: &[impl AsRef<str>],
    values: &[Value],
) -> Result<()> {
    interleave(writer, fragments, values, |value, writer| process_into(value, writer))
}

/// Same as [`tag`], but processed values are html escaped.
///
/// ```
/// use tagfmt::{Value, escape};
///
/// let out = escape(&["<p>", "</p>"], &[Value::from("<script>")]).unwrap();
/// assert_eq!(out, "<p>&lt;script&gt;</p>");
/// ```
pub fn escape(fragments: &[impl AsRef<str>], values: &[Value]) -> Result<String> {
    let mut buffer = String::new();
    escape_into(&mut buffer, fragments, values)?;
    Ok(buffer)
}

/// Same as [`tag_into`], but processed values are html escaped.
pub fn escape_into(
    writer: &mut impl Writer,
    fragments: &[impl AsRef<str>],
    values: &[Value],
) -> Result<()> {
    interleave(writer, fragments, values, |value, writer| {
        process_into(value, &mut Escape(writer))
    })
}

fn interleave<W: Writer>(
    writer: &mut W,
    fragments: &[impl AsRef<str>],
    values: &[Value],
    mut process: impl FnMut(&Value, &mut W) -> Result<()>,
) -> Result<()> {
    let [first, rest @ ..] = fragments else {
        return Err(arity(fragments.len(), values.len()));
    };
    if rest.len() != values.len() {
        return Err(arity(fragments.len(), values.len()));
    }

    tracing::trace!(values = values.len(), "tagged template");

    writer.write_str(first.as_ref())?;
    for (value, fragment) in values.iter().zip(rest) {
        process(value, writer)?;
        writer.write_str(fragment.as_ref())?;
    }
    Ok(())
}

fn arity(fragments: usize, values: usize) -> crate::Error {
    RuntimeError::Arity { fragments, values }.into()
}

/// [`tag`] as function value, called as `tag(fragments, values..)`.
pub fn tag_fn() -> Value {
    Value::func("tag", |args| {
        let (fragments, values) = split_args(args)?;
        tag(&fragments, &values).map(Value::from)
    })
}

/// [`escape`] as function value, called as `escape(fragments, values..)`.
pub fn escape_fn() -> Value {
    Value::func("escape", |args| {
        let (fragments, values) = split_args(args)?;
        escape(&fragments, &values).map(Value::from)
    })
}

fn split_args(args: Vec<Value>) -> Result<(Vec<Value>, Vec<Value>)> {
    let mut args = args.into_iter();
    let fragments = match args.next() {
        Some(Value::List(fragments)) => fragments,
        found => {
            let found = found.as_ref().map_or("nothing", Value::type_name);
            return Err(RuntimeError::Type { expected: "list of fragments", found }.into());
        }
    };
    let fragments = fragments
        .iter()
        .map(|e| match e {
            Value::Str(_) => Ok(e.clone()),
            _ => Err(RuntimeError::Type { expected: "string", found: e.type_name() }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((fragments, args.collect()))
}

impl AsRef<str> for Value {
    /// String content, empty for non string values.
    fn as_ref(&self) -> &str {
        self.as_str().unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interleave_values() {
        let out = tag(&["a", "b", "c"], &[Value::from(1), Value::from(2)]).unwrap();
        assert_eq!(out, "a1b2c");
    }

    #[test]
    fn empty_fragments() {
        let out = tag(&["", ""], &[Value::from("only")]).unwrap();
        assert_eq!(out, "only");
        assert_eq!(tag(&["static"], &[]).unwrap(), "static");
    }

    #[test]
    fn arity() {
        let err = tag(&["a", "b"], &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Runtime(RuntimeError::Arity { fragments: 2, values: 0 })
        ));
        let err = tag(&[] as &[&str], &[]).unwrap_err();
        assert!(matches!(err, crate::Error::Runtime(RuntimeError::Arity { .. })));
    }

    #[test]
    fn reentrant() {
        let inner = Value::func("inner", |_| tag(&["<b>", "</b>"], &[Value::from(1)]).map(Value::from));
        let out = tag(&["<a>", "</a>"], &[inner]).unwrap();
        assert_eq!(out, "<a><b>1</b></a>");
    }

    #[test]
    fn escape_values_only() {
        let out = escape(&["<p title=\"", "\">"], &[Value::from("\"&\"")]).unwrap();
        assert_eq!(out, "<p title=\"&quot;&amp;&quot;\">");
    }

    #[test]
    fn tag_function() {
        let fragments = Value::list(["<i>", "</i>"]);
        let out = tag_fn().as_func().unwrap().call(vec![fragments, Value::from(7)]).unwrap();
        assert_eq!(out, Value::from("<i>7</i>"));
    }

    #[test]
    fn tag_function_bad_fragments() {
        let err = tag_fn().as_func().unwrap().call(vec![Value::from("x")]).unwrap_err();
        assert_eq!(err.to_string(), "expected list of fragments, found string");
    }
}
