//! Emit a [`Program`] as rust source.
//!
//! ```text
//! fn template(::tagfmt::Context { mood, html, .. }: ::tagfmt::Context) -> String {
//!     let more_data = "DATA";
//!     return { html!("<header>{more_data} {}</header>", || mood) };
//! }
//! ```
//!
//! Parameters are destructured explicitly from the context, so the emitted body has no
//! implicit scope lookup.
use proc_macro2::TokenStream;
use quote::quote;

use crate::{common::Context, program::Program};

/// Generate template function tokens.
pub fn generate(program: &Program) -> TokenStream {
    let params = program.params();
    let stmts = program.stmts();
    quote! {
        fn template(#Context { #(#params,)* .. }: #Context) -> String {
            #(#stmts)*
        }
    }
}

/// Generate template function source.
pub fn source(program: &Program) -> String {
    generate(program).to_string()
}
