//! `include_template!` macro
use proc_macro2::TokenStream;
use quote::quote;
use std::{fs, path::PathBuf};
use syn::{LitStr, Result};
use tagfmt_parser::{
    common::path,
    config::{Config, Reload},
};

/// output code:
///
/// 1. source, an `include_str` to embed source and trigger recompile on template change
/// 2. reload check, read file at runtime when reload is enabled
pub fn include(input: LitStr) -> Result<TokenStream> {
    let conf = Config::from_env();
    let span = input.span();

    let path = path::resolve(&input.value(), crate_root()?, &conf)
        .map_err(|err| syn::Error::new(span, err))?;

    let source = fs::read_to_string(&path).map_err(|err| {
        syn::Error::new(span, format!("failed to read `{}`: {err}", path.display()))
    })?;

    if let Err(err) = tagfmt_parser::compile(&source, &conf) {
        return Err(syn::Error::new(span, format!("`{}`: {err}", path.display())));
    }

    let path = LitStr::new(&path.to_string_lossy(), span);
    let reload = match conf.reload() {
        Reload::Debug => quote! { cfg!(debug_assertions) },
        Reload::Modified | Reload::Always => quote! { true },
        Reload::Never => quote! { false },
    };

    Ok(quote! {{
        const SOURCE: &str = include_str!(#path);
        if #reload {
            ::tagfmt::compile_file(#path)
        } else {
            ::tagfmt::compile(SOURCE)
        }
    }})
}

fn crate_root() -> Result<PathBuf> {
    match std::env::var_os("CARGO_MANIFEST_DIR") {
        Some(dir) => Ok(dir.into()),
        None => std::env::current_dir().map_err(|err| {
            syn::Error::new(
                proc_macro2::Span::call_site(),
                format!("failed to get current directory: {err}"),
            )
        }),
    }
}
