use crate::config::ContainerConfig;
use crate::di::{Arguments, Container, ContextMatcher, Dependency, Injectable, Scope};
use crate::error::{InjectError, Result};
use crate::module::Module;

/// Builder for constructing a dependency injection container
///
/// Use this to configure and register services before building the final container.
/// Registration errors are collected and reported by [`ContainerBuilder::build`].
///
/// # Example
/// ```
/// use injectra::{ContainerBuilder, ContainerConfig};
///
/// let container = ContainerBuilder::new()
///     .config(ContainerConfig::default())
///     .instance(String::from("sqlite::memory:"))
///     .build()
///     .unwrap();
/// assert_eq!(*container.resolve_registered::<String>().unwrap(), "sqlite::memory:");
/// ```
pub struct ContainerBuilder {
    container: Container,
    failure: Option<InjectError>,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            container: Container::new(),
            failure: None,
        }
    }

    /// Start over from a configured container. Call this before registering.
    pub fn config(mut self, config: ContainerConfig) -> Self {
        self.container = Container::with_config(&config);
        self
    }

    pub fn context_matcher<M: ContextMatcher + 'static>(mut self, matcher: M) -> Self {
        self.container.set_context_matcher(matcher);
        self
    }

    /// Register an injectable type with an explicit scope
    pub fn register<T: Injectable>(self, scope: Scope) -> Self {
        self.try_with(|container| container.register::<T>(scope).map(|_| ()))
    }

    /// Register an injectable type with the scope it declares
    pub fn provide<T: Injectable>(self) -> Self {
        self.try_with(|container| container.register_declared::<T>().map(|_| ()))
    }

    /// Register a constructor closure for a non-injectable type
    pub fn factory<T, F>(self, scope: Scope, dependencies: Vec<Dependency>, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arguments) -> Result<T> + Send + Sync + 'static,
    {
        self.try_with(|container| {
            container
                .register_factory::<T, F>(scope, dependencies, factory)
                .map(|_| ())
        })
    }

    /// Register a service instance
    pub fn instance<T: 'static + Send + Sync>(mut self, instance: T) -> Self {
        self.container.register_instance(instance);
        self
    }

    /// Register every provider of a module
    pub fn module<M: Module>(self) -> Self {
        self.try_with(M::register)
    }

    fn try_with(mut self, f: impl FnOnce(&mut Container) -> Result<()>) -> Self {
        if self.failure.is_none() {
            if let Err(e) = f(&mut self.container) {
                self.failure = Some(e);
            }
        }
        self
    }

    /// Build the container, failing with the first registration error
    pub fn build(self) -> Result<Container> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(self.container),
        }
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
