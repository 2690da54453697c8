use crate::di::Container;
use crate::error::Result;

/// Trait for groups of providers registered together
///
/// Modules are typically defined using the `#[module]` macro, which implements this
/// trait by registering every listed provider with the scope it declares.
///
/// # Example
/// ```ignore
/// use injectra::module;
///
/// #[module(
///     imports = [StorageModule],
///     providers = [HashService, HashRepository],
/// )]
/// pub struct AppModule;
/// ```
pub trait Module {
    /// Register all providers in this module
    fn register(container: &mut Container) -> Result<()>;
}
