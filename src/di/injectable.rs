use crate::di::descriptor::Dependency;
use crate::di::metadata::Arguments;
use crate::di::scope::Scope;
use crate::error::Result;

/// Trait for types the container can build from their declared dependencies.
///
/// This trait is typically implemented automatically via `#[derive(Injectable)]`.
///
/// # Example
/// ```
/// use injectra::{Arguments, Dependency, Injectable, Result, Scope};
/// use std::sync::Arc;
///
/// struct Config;
///
/// impl Injectable for Config {
///     const SCOPE: Scope = Scope::Singleton;
///
///     fn dependencies() -> Vec<Dependency> {
///         Vec::new()
///     }
///
///     fn construct(_args: Arguments) -> Result<Self> {
///         Ok(Config)
///     }
/// }
///
/// struct Repo {
///     config: Arc<Config>,
/// }
///
/// impl Injectable for Repo {
///     fn dependencies() -> Vec<Dependency> {
///         vec![Dependency::inject::<Config>("config")]
///     }
///
///     fn construct(args: Arguments) -> Result<Self> {
///         Ok(Repo { config: args.get("config")? })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Scope used when the type is registered through its own declaration.
    const SCOPE: Scope = Scope::Transient;

    /// Constructor parameters, in declared order.
    fn dependencies() -> Vec<Dependency>;

    /// Build an instance from resolved arguments.
    ///
    /// # Errors
    /// Returns an error if an argument is missing or has an unexpected type, or if
    /// the constructor itself fails.
    fn construct(args: Arguments) -> Result<Self>;
}
