use crate::config::ContainerConfig;
use crate::di::cache::SingletonCache;
use crate::di::context::{Context, ContextMatcher};
use crate::di::descriptor::{DeclaredType, Dependency, Deriver, Instance, TypeRef};
use crate::di::injectable::Injectable;
use crate::di::metadata::{Arguments, ClassMetadata};
use crate::di::registry::Registry;
use crate::di::scope::{Scope, validate_edge};
use crate::di::stack::ResolutionStack;
use crate::error::{InjectError, Result};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Thread-safe dependency injection container.
///
/// Owns a registry of class metadata and a singleton cache. Register types once
/// at startup (`&mut self`), then share the container behind an `Arc` and
/// resolve from any number of threads.
pub struct Container {
    id: Uuid,
    registry: Registry,
    singletons: SingletonCache,
    matcher: Arc<dyn ContextMatcher>,
    auto_resolve: bool,
}

/// A resolved instance together with the scope it was produced under.
struct Resolved {
    instance: Instance,
    scope: Scope,
}

/// Who asked for a type, for error messages.
#[derive(Clone, Copy)]
enum Requester {
    Caller,
    Parameter { owner: TypeRef, name: &'static str },
}

impl fmt::Display for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requester::Caller => f.write_str("the caller"),
            Requester::Parameter { owner, name } => write!(f, "parameter '{}' of {}", name, owner),
        }
    }
}

impl Container {
    pub fn new() -> Self {
        Self::with_config(&ContainerConfig::default())
    }

    pub fn with_config(config: &ContainerConfig) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(
            "Created container {} (context matching: {}, auto-resolve: {})",
            id,
            config.context_matching,
            config.auto_resolve
        );
        Self {
            id,
            registry: Registry::new(),
            singletons: SingletonCache::new(),
            matcher: config.context_matching.matcher(),
            auto_resolve: config.auto_resolve,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Replace the policy used to match context values to parameters.
    pub fn set_context_matcher<M: ContextMatcher + 'static>(&mut self, matcher: M) -> &mut Self {
        self.matcher = Arc::new(matcher);
        self
    }

    /// Register `T` with an explicit scope.
    ///
    /// # Errors
    /// Returns [`InjectError::MissingTypeHint`] if a constructor parameter has
    /// neither a type nor a default.
    pub fn register<T: Injectable>(&mut self, scope: Scope) -> Result<&mut Self> {
        let metadata = ClassMetadata::of::<T>(scope)?;
        Ok(self.insert_metadata(metadata))
    }

    /// Register `T` with the scope it declares for itself.
    pub fn register_declared<T: Injectable>(&mut self) -> Result<&mut Self> {
        self.register::<T>(T::SCOPE)
    }

    /// Register a constructor closure for a type that is not `Injectable`.
    pub fn register_factory<T, F>(
        &mut self,
        scope: Scope,
        dependencies: Vec<Dependency>,
        factory: F,
    ) -> Result<&mut Self>
    where
        T: Send + Sync + 'static,
        F: Fn(Arguments) -> Result<T> + Send + Sync + 'static,
    {
        let metadata = ClassMetadata::from_fn::<T, F>(scope, dependencies, factory)?;
        Ok(self.insert_metadata(metadata))
    }

    /// Register an already-built value as a singleton.
    pub fn register_instance<T: Send + Sync + 'static>(&mut self, instance: T) -> &mut Self {
        let ty = TypeRef::of::<T>();
        let instance: Instance = Arc::new(instance);
        self.insert_metadata(ClassMetadata::for_instance(ty, Arc::clone(&instance)));
        self.singletons.insert(ty, instance);
        self
    }

    fn insert_metadata(&mut self, metadata: ClassMetadata) -> &mut Self {
        let ty = metadata.target();
        if self.registry.insert(metadata).is_some() {
            self.singletons.remove(ty);
        }
        self
    }

    pub fn metadata<T: 'static>(&self) -> Option<Arc<ClassMetadata>> {
        self.registry.get(TypeRef::of::<T>())
    }

    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
        self.resolve_with::<T>(&Context::default())
    }

    /// Resolve `T`, letting `context` supply values for matching parameters.
    ///
    /// Unregistered types are built as transient plain objects.
    pub fn resolve_with<T: Injectable>(&self, context: &Context) -> Result<Arc<T>> {
        let derive: Deriver = ClassMetadata::plain::<T>;
        let instance = self.resolve_root(TypeRef::of::<T>(), Some(derive), context)?;
        downcast::<T>(instance)
    }

    /// Resolve a registered type without falling back to auto-resolution.
    pub fn resolve_registered<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.resolve_registered_with::<T>(&Context::default())
    }

    pub fn resolve_registered_with<T: Send + Sync + 'static>(
        &self,
        context: &Context,
    ) -> Result<Arc<T>> {
        let instance = self.resolve_root(TypeRef::of::<T>(), None, context)?;
        downcast::<T>(instance)
    }

    fn resolve_root(
        &self,
        ty: TypeRef,
        derive: Option<Deriver>,
        context: &Context,
    ) -> Result<Instance> {
        tracing::trace!("Container {}: resolving {}", self.id, ty);
        let mut stack = ResolutionStack::new();
        self.resolve_node(ty, derive, context, &mut stack, Requester::Caller)
            .map(|resolved| resolved.instance)
            .inspect_err(|e| tracing::debug!("Container {}: failed to resolve {}: {}", self.id, ty, e))
    }

    fn resolve_node(
        &self,
        ty: TypeRef,
        derive: Option<Deriver>,
        context: &Context,
        stack: &mut ResolutionStack,
        requester: Requester,
    ) -> Result<Resolved> {
        stack.enter(ty)?;
        let result = self.resolve_entered(ty, derive, context, stack, requester);
        stack.leave();
        result
    }

    fn resolve_entered(
        &self,
        ty: TypeRef,
        derive: Option<Deriver>,
        context: &Context,
        stack: &mut ResolutionStack,
        requester: Requester,
    ) -> Result<Resolved> {
        if let Some(instance) = self.singletons.get(ty) {
            return Ok(Resolved {
                instance,
                scope: Scope::Singleton,
            });
        }

        let metadata = self.metadata_for(ty, derive, requester)?;

        match metadata.scope() {
            Scope::Singleton => {
                let _guard = self.singletons.lock();
                // Another thread may have finished building it while we waited.
                if let Some(instance) = self.singletons.get(ty) {
                    return Ok(Resolved {
                        instance,
                        scope: Scope::Singleton,
                    });
                }

                let instance = self.construct(&metadata, context, stack)?;
                self.singletons.insert(ty, Arc::clone(&instance));
                tracing::debug!("Container {}: constructed singleton {}", self.id, ty);
                Ok(Resolved {
                    instance,
                    scope: Scope::Singleton,
                })
            }
            Scope::Transient => Ok(Resolved {
                instance: self.construct(&metadata, context, stack)?,
                scope: Scope::Transient,
            }),
        }
    }

    fn metadata_for(
        &self,
        ty: TypeRef,
        derive: Option<Deriver>,
        requester: Requester,
    ) -> Result<Arc<ClassMetadata>> {
        if let Some(metadata) = self.registry.get(ty) {
            return Ok(metadata);
        }

        match derive {
            Some(derive) if self.auto_resolve => self.registry.metadata_or_derive(ty, derive),
            _ => Err(InjectError::UnresolvableDependency {
                type_name: ty.name().to_string(),
                required_by: requester.to_string(),
            }),
        }
    }

    fn construct(
        &self,
        metadata: &ClassMetadata,
        context: &Context,
        stack: &mut ResolutionStack,
    ) -> Result<Instance> {
        let mut args = Arguments::new(metadata.target(), metadata.parameters().len());
        for dependency in metadata.parameters() {
            let value = self.resolve_dependency(metadata, dependency, context, stack)?;
            args.push(dependency.name(), value);
        }
        metadata.construct(args)
    }

    fn resolve_dependency(
        &self,
        owner: &ClassMetadata,
        dependency: &Dependency,
        context: &Context,
        stack: &mut ResolutionStack,
    ) -> Result<Instance> {
        // Context values are request-scoped, so they count as transient.
        if let Some(value) = self.matcher.lookup(context, dependency) {
            validate_edge(
                owner.target(),
                owner.scope(),
                dependency.label(),
                Scope::Transient,
            )?;
            return Ok(value);
        }

        let declared = dependency.declared_type();
        let registered = declared
            .type_ref()
            .is_some_and(|ty| self.registry.contains(ty));
        if let Some(default) = dependency.default_value() {
            if !registered {
                return Ok(Arc::clone(default));
            }
        }

        // A singleton's edge fails on the child's scope alone, even if the child
        // could never be built.
        if owner.scope() == Scope::Singleton {
            if let Some(scope) = self.known_scope(declared) {
                validate_edge(owner.target(), owner.scope(), dependency.label(), scope)?;
            }
        }

        let requester = Requester::Parameter {
            owner: owner.target(),
            name: dependency.name(),
        };
        let resolved = match declared {
            DeclaredType::Class { ty, derive } => {
                self.resolve_node(*ty, Some(*derive), context, stack, requester)?
            }
            DeclaredType::Primitive(ty) => self.resolve_node(*ty, None, context, stack, requester)?,
            DeclaredType::Untyped => {
                return Err(InjectError::MissingTypeHint {
                    type_name: owner.target().name().to_string(),
                    parameter: dependency.name().to_string(),
                });
            }
        };

        validate_edge(
            owner.target(),
            owner.scope(),
            dependency.label(),
            resolved.scope,
        )?;
        Ok(resolved.instance)
    }

    /// Scope a dependency will resolve under, when that is known without resolving it.
    fn known_scope(&self, declared: &DeclaredType) -> Option<Scope> {
        let ty = declared.type_ref()?;
        if let Some(metadata) = self.registry.get(ty) {
            return Some(metadata.scope());
        }
        match declared {
            DeclaredType::Class { .. } if self.auto_resolve => Some(Scope::Transient),
            _ => None,
        }
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.registry.contains(TypeRef::of::<T>())
    }

    /// Number of registered (or auto-resolved) types.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    pub fn singleton_count(&self) -> usize {
        self.singletons.len()
    }

    /// Drop every registration and cached singleton.
    ///
    /// Meant for test isolation; must not race with in-flight resolutions.
    pub fn clear(&self) {
        tracing::debug!("Container {}: cleared", self.id);
        self.registry.clear();
        self.singletons.clear();
    }
}

fn downcast<T: Send + Sync + 'static>(instance: Instance) -> Result<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| InjectError::DowncastFailed {
            type_name: std::any::type_name::<T>().to_string(),
        })
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("registered", &self.registry.len())
            .field("singletons", &self.singletons.len())
            .field("auto_resolve", &self.auto_resolve)
            .finish()
    }
}
