use crate::di::container::Container;
use crate::di::context::Context;
use crate::di::injectable::Injectable;
use crate::error::Result;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A callable that resolves `T` from a shared container.
///
/// This is what a host framework holds on to as its own dependency provider; it
/// never touches the registry or the cache directly.
///
/// # Example
/// ```
/// use injectra::{Container, Context};
/// use std::sync::Arc;
///
/// # use injectra::{Arguments, Dependency, Injectable, Result};
/// # struct Clock;
/// # impl Injectable for Clock {
/// #     fn dependencies() -> Vec<Dependency> { Vec::new() }
/// #     fn construct(_args: Arguments) -> Result<Self> { Ok(Clock) }
/// # }
/// let container = Arc::new(Container::new());
/// let make_clock = container.factory::<Clock>();
/// let clock = make_clock.call().unwrap();
/// ```
pub struct Factory<T> {
    container: Arc<Container>,
    seed: Context,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> Factory<T> {
    pub fn call(&self) -> Result<Arc<T>> {
        self.container.resolve_with::<T>(&self.seed)
    }

    /// Resolve with `context` layered over the seed; per-call values win.
    pub fn call_with(&self, context: &Context) -> Result<Arc<T>> {
        if self.seed.is_empty() {
            return self.container.resolve_with::<T>(context);
        }
        let mut merged = self.seed.clone();
        merged.merge(context);
        self.container.resolve_with::<T>(&merged)
    }

    /// Turn the factory into a plain closure.
    pub fn into_fn(self) -> impl Fn() -> Result<Arc<T>> + Send + Sync + 'static {
        move || self.call()
    }
}

impl<T> Factory<T> {
    pub fn seed(&self) -> &Context {
        &self.seed
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            container: Arc::clone(&self.container),
            seed: self.seed.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("target", &std::any::type_name::<T>())
            .field("seed", &self.seed)
            .finish()
    }
}

impl Container {
    /// A zero-argument factory for `T`.
    pub fn factory<T: Injectable>(self: &Arc<Self>) -> Factory<T> {
        self.factory_with::<T>(Context::default())
    }

    /// A factory whose every call starts from `seed`.
    pub fn factory_with<T: Injectable>(self: &Arc<Self>, seed: Context) -> Factory<T> {
        Factory {
            container: Arc::clone(self),
            seed,
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::descriptor::Dependency;
    use crate::di::metadata::Arguments;
    use crate::di::scope::Scope;

    struct Greeter {
        greeting: String,
    }

    impl Injectable for Greeter {
        fn dependencies() -> Vec<Dependency> {
            vec![Dependency::value::<String>("greeting").with_default(String::from("hello"))]
        }

        fn construct(args: Arguments) -> Result<Self> {
            Ok(Greeter {
                greeting: args.value("greeting")?,
            })
        }
    }

    #[test]
    fn test_factory_produces_fresh_transients() {
        let container = Arc::new(Container::new());
        let factory = container.factory::<Greeter>();

        let first = factory.call().unwrap();
        let second = factory.call().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.greeting, "hello");
    }

    #[test]
    fn test_call_context_overrides_seed() {
        let container = Arc::new(Container::new());
        let factory = container
            .factory_with::<Greeter>(Context::new().with("greeting", String::from("hi")));

        assert_eq!(factory.call().unwrap().greeting, "hi");
        let overridden = factory
            .call_with(&Context::new().with("greeting", String::from("hey")))
            .unwrap();
        assert_eq!(overridden.greeting, "hey");
    }

    #[test]
    fn test_factory_sees_registrations_and_singletons() {
        let mut container = Container::new();
        container.register::<Greeter>(Scope::Singleton).unwrap();
        let container = Arc::new(container);

        let make = container.factory::<Greeter>().into_fn();
        assert!(Arc::ptr_eq(&make().unwrap(), &make().unwrap()));
    }
}
