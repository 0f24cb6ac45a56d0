use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{ItemFn, parse_macro_input};

/// Exports a function as a `sys/random.h` C symbol.
///
/// This attribute macro:
/// 1. Renames `fn foo` to `fn sysrandom_foo`
/// 2. Adds `#[unsafe(no_mangle)]` and `unsafe extern "C"`
/// 3. Registers the symbol mapping `foo` -> `sysrandom_foo`
///
/// The prefix keeps the export from interposing on the host C library's own
/// `foo`. Callers that want the override resolve it through
/// `crate::symbols::lookup`.
///
/// # Example
///
/// ```ignore
/// #[random_symbol]
/// pub fn getentropy(buffer: *mut libc::c_void, length: libc::size_t) -> libc::c_int {
///     // implementation
/// }
/// ```
///
/// Expands to:
///
/// ```ignore
/// #[unsafe(no_mangle)]
/// pub unsafe extern "C" fn sysrandom_getentropy(buffer: *mut libc::c_void, length: libc::size_t) -> libc::c_int {
///     // implementation
/// }
///
/// #[linkme::distributed_slice(crate::symbols::RANDOM_SYMBOLS)]
/// static _SYSRANDOM_SYM_GETENTROPY: (&str, crate::symbols::FnPtr) =
///     ("getentropy", crate::symbols::FnPtr(sysrandom_getentropy as *const ()));
/// ```
#[proc_macro_attribute]
pub fn random_symbol(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let attrs = &input.attrs;

    let c_name = &sig.ident;
    let export_name = format_ident!("sysrandom_{}", c_name);
    let symbol_name = c_name.to_string();
    let static_name = format_ident!("_SYSRANDOM_SYM_{}", symbol_name.to_uppercase());

    let inputs = &sig.inputs;
    let output = &sig.output;

    let expanded = quote! {
        #(#attrs)*
        #[unsafe(no_mangle)]
        #vis unsafe extern "C" fn #export_name(#inputs) #output #block

        #[linkme::distributed_slice(crate::symbols::RANDOM_SYMBOLS)]
        static #static_name: (&str, crate::symbols::FnPtr) =
            (#symbol_name, crate::symbols::FnPtr(#export_name as *const ()));
    };

    TokenStream::from(expanded)
}
