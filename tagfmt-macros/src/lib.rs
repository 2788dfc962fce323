//! macros for `tagfmt` template
mod include;

/// Compile template file, checked at build time.
///
/// The template is parsed and rewritten during compilation, so invalid source is a compile error.
/// Expands to `tagfmt::Result<tagfmt::Template>`.
///
/// Path resolution:
///
/// - `/index.tmpl`, resolve from crate root
/// - `index.tmpl`, resolve from `templates` directory in crate root
///
/// Depending on [`Reload`][1], the file is read again at runtime, otherwise the source is
/// embedded in the binary.
///
/// [1]: <https://docs.rs/tagfmt/latest/tagfmt/enum.Reload.html>
#[proc_macro]
pub fn include_template(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    match include::include(syn::parse_macro_input!(input as syn::LitStr)) {
        Ok(ok) => ok.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
