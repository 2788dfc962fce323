
// ===== Namespace =====

/// `ToTokens` for public name
pub(crate) struct Context;

impl quote::ToTokens for Context {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        quote::quote! {::tagfmt::Context}.to_tokens(tokens);
    }
}

// ===== Constants =====

/// Builtin macros that take a format string but are not templates.
pub const PRINT_MACROS: [&str; 4] = ["print", "println", "eprint", "eprintln"];

/// Builtin macro for list literal.
pub const VEC_MACRO: &str = "vec";

/// Path resolution.
///
/// user given path:
///
/// - `./layout`, resolve relative from current source file
/// - `layout`, resolve from `templates` directory
/// - `/layout`, resolve from current directory
///
/// currently, rust is unable to get rust source file path,
/// for now, relative path in macro returns error.
///
/// [issue]: <https://github.com/rust-lang/rust/issues/54725>
pub mod path {
    use std::path::{Component, Path, PathBuf};

    use crate::config::Config;

    /// Resolve path the way `include_template!` does, against given current directory.
    pub fn resolve(path: &str, cwd: impl Into<PathBuf>, conf: &Config) -> Result<PathBuf, String> {
        let mut cwd = cwd.into();
        let path = match () {
            _ if path.starts_with('.') => return Err(format!(
                "cannot get template file using relative path `{path}`"
            )),
            _ if path.starts_with('/') => path.trim_start_matches('/'),
            _ => {
                cwd.push(conf.templ_dir());
                path
            }
        };
        Ok(resolve_at(path, cwd))
    }

    /// Resolve path relative to given directory, absolute path is kept as is.
    pub fn resolve_at(path: impl AsRef<Path>, cwd: impl Into<PathBuf>) -> PathBuf {
        let mut cwd = cwd.into();
        cwd.push(path);
        normalize(cwd.as_path())
    }

    /// Copied from [cargo][1]
    ///
    /// [1]: https://github.com/rust-lang/cargo/blob/fede83ccf973457de319ba6fa0e36ead454d2e20/src/cargo/util/paths.rs#L61
    pub fn normalize(path: &Path) -> PathBuf {
        let mut components = path.components().peekable();
        let mut ret = if let Some(c @ Component::Prefix(..)) = components.peek().cloned() {
            components.next();
            PathBuf::from(c.as_os_str())
        } else {
            PathBuf::new()
        };

        for component in components {
            match component {
                Component::Prefix(..) => unreachable!(),
                Component::RootDir => {
                    ret.push(component.as_os_str());
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    ret.pop();
                }
                Component::Normal(c) => {
                    ret.push(c);
                }
            }
        }
        ret
    }

}

// ===== macros =====

/// Everything will return `Result<T, syn::Error>`
///
/// `error!(?option, "{}", error)`, unwrap option with error as standard `format!`.
///
/// `error!(spanned, "`{path}`: {}")`, standard `format!` with `spanned`s span.
///
/// `error!("{}",error)`, standard `format!`
macro_rules! error {
    (@ $s:expr, $($tt:tt)*) => {
        return Err(syn::Error::new($s, format!($($tt)*)).into())
    };
    (?$s:expr, $($tt:tt)*) => {
        match $s { Some(ok) => ok, None => crate::common::error!($($tt)*), }
    };
    ($s:expr, $($tt:tt)*) => {
        crate::common::error!(@ syn::spanned::Spanned::span(&$s), $($tt)*)
    };
    ($($tt:tt)*) => {
        crate::common::error!(@ proc_macro2::Span::call_site(), $($tt)*)
    };
}

pub(crate) use error;
