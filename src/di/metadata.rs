use crate::di::descriptor::{DeclaredType, Dependency, Instance, TypeRef};
use crate::di::injectable::Injectable;
use crate::di::scope::Scope;
use crate::error::{InjectError, Result};
use std::fmt;
use std::sync::Arc;

/// Type-erased constructor stored alongside the metadata.
type ConstructorFn = Arc<dyn Fn(Arguments) -> Result<Instance> + Send + Sync>;

/// Recorded shape of a type's constructor: scope plus ordered dependencies.
#[derive(Clone)]
pub struct ClassMetadata {
    target: TypeRef,
    scope: Scope,
    parameters: Vec<Dependency>,
    constructor: ConstructorFn,
}

impl ClassMetadata {
    /// Build metadata for an `Injectable` type with an explicit scope.
    ///
    /// # Errors
    /// Returns [`InjectError::MissingTypeHint`] if a parameter has neither a type
    /// nor a default.
    pub fn of<T: Injectable>(scope: Scope) -> Result<Self> {
        Self::from_fn::<T, _>(scope, T::dependencies(), T::construct)
    }

    /// Metadata for a type that was never registered. Always transient.
    pub(crate) fn plain<T: Injectable>() -> Result<Self> {
        Self::of::<T>(Scope::Transient)
    }

    /// Build metadata from an explicit dependency list and constructor closure.
    pub fn from_fn<T, F>(scope: Scope, parameters: Vec<Dependency>, constructor: F) -> Result<Self>
    where
        T: Send + Sync + 'static,
        F: Fn(Arguments) -> Result<T> + Send + Sync + 'static,
    {
        let target = TypeRef::of::<T>();
        check_parameters(target, &parameters)?;

        let constructor: ConstructorFn =
            Arc::new(move |args| constructor(args).map(|instance| Arc::new(instance) as Instance));

        Ok(Self {
            target,
            scope,
            parameters,
            constructor,
        })
    }

    /// Metadata for a value that already exists.
    pub(crate) fn for_instance(target: TypeRef, instance: Instance) -> Self {
        Self {
            target,
            scope: Scope::Singleton,
            parameters: Vec::new(),
            constructor: Arc::new(move |_| Ok(Arc::clone(&instance))),
        }
    }

    pub fn target(&self) -> TypeRef {
        self.target
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn parameters(&self) -> &[Dependency] {
        &self.parameters
    }

    pub(crate) fn construct(&self, args: Arguments) -> Result<Instance> {
        (self.constructor)(args)
    }
}

impl fmt::Debug for ClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMetadata")
            .field("target", &self.target)
            .field("scope", &self.scope)
            .field("parameters", &self.parameters)
            .finish()
    }
}

fn check_parameters(target: TypeRef, parameters: &[Dependency]) -> Result<()> {
    for param in parameters {
        if matches!(param.declared_type(), DeclaredType::Untyped) && !param.has_default() {
            return Err(InjectError::MissingTypeHint {
                type_name: target.name().to_string(),
                parameter: param.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Resolved constructor arguments, looked up by parameter name.
pub struct Arguments {
    owner: TypeRef,
    values: Vec<(&'static str, Instance)>,
}

impl Arguments {
    pub(crate) fn new(owner: TypeRef, capacity: usize) -> Self {
        Self {
            owner,
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: Instance) {
        self.values.push((name, value));
    }

    /// Shared handle to the argument named `name`.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.raw(name)?
            .clone()
            .downcast::<T>()
            .map_err(|_| InjectError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    /// Owned copy of a value argument.
    pub fn value<T: Clone + Send + Sync + 'static>(&self, name: &str) -> Result<T> {
        self.get::<T>(name).map(|value| T::clone(&value))
    }

    pub fn raw(&self, name: &str) -> Result<&Instance> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
            .ok_or_else(|| InjectError::UnknownParameter {
                type_name: self.owner.name().to_string(),
                parameter: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
