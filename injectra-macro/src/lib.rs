use proc_macro::TokenStream;

mod injectable;
mod module;

/// Derive macro for making a struct injectable into the DI container
///
/// Field handling:
/// - `Arc<T>` fields are resolved recursively as `T`
/// - `Arc<dyn Trait>` fields look up a registered `Arc<dyn Trait>` value
/// - any other field is a cloned value (registered, defaulted or from context)
///
/// # Example
/// ```ignore
/// use injectra::prelude::*;
///
/// #[derive(Injectable)]
/// #[injectable(scope = "singleton")]
/// pub struct HashRepository {
///     #[inject(default = String::from(":memory:"))]
///     dsn: String,
///     #[inject(name = "clock")]
///     now: Arc<Clock>,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}

/// Attribute macro for defining a module of providers
///
/// Providers are registered with the scope they declare, unless overridden with
/// `=> singleton` / `=> transient`.
///
/// # Example
/// ```ignore
/// use injectra::module;
///
/// #[module(
///     imports = [StorageModule],
///     providers = [HashService, HashRepository => singleton],
/// )]
/// pub struct AppModule;
/// ```
#[proc_macro_attribute]
pub fn module(attr: TokenStream, item: TokenStream) -> TokenStream {
    module::module_attribute(attr, item)
}
