use crate::di::injectable::Injectable;
use crate::di::metadata::ClassMetadata;
use crate::error::Result;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A type-erased, shared instance as held by the container.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Builds plain-object metadata for a class-typed parameter.
pub type Deriver = fn() -> Result<ClassMetadata>;

/// Identity of a type plus its readable name.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
}

impl TypeRef {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// What a constructor parameter declares about its type.
#[derive(Clone)]
pub enum DeclaredType {
    /// A type the container can introspect and build on its own.
    Class { ty: TypeRef, derive: Deriver },
    /// A value type: satisfied by a default, a registration, or the context.
    Primitive(TypeRef),
    /// No type information at all; only valid with a default.
    Untyped,
}

impl DeclaredType {
    pub fn type_ref(&self) -> Option<TypeRef> {
        match self {
            DeclaredType::Class { ty, .. } | DeclaredType::Primitive(ty) => Some(*ty),
            DeclaredType::Untyped => None,
        }
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Class { ty, .. } => f.debug_tuple("Class").field(ty).finish(),
            DeclaredType::Primitive(ty) => f.debug_tuple("Primitive").field(ty).finish(),
            DeclaredType::Untyped => f.write_str("Untyped"),
        }
    }
}

/// One constructor parameter of an injectable type.
///
/// ```
/// use injectra::Dependency;
///
/// let port = Dependency::value::<u16>("port").with_default(8080u16);
/// assert!(port.has_default());
/// ```
#[derive(Clone)]
pub struct Dependency {
    name: &'static str,
    declared: DeclaredType,
    default: Option<Instance>,
}

impl Dependency {
    /// A parameter of an introspectable type, resolved recursively.
    pub fn inject<T: Injectable>(name: &'static str) -> Self {
        Self {
            name,
            declared: DeclaredType::Class {
                ty: TypeRef::of::<T>(),
                derive: ClassMetadata::plain::<T>,
            },
            default: None,
        }
    }

    /// A parameter of a plain value type.
    pub fn value<T: Send + Sync + 'static>(name: &'static str) -> Self {
        Self {
            name,
            declared: DeclaredType::Primitive(TypeRef::of::<T>()),
            default: None,
        }
    }

    /// A parameter with no declared type.
    pub fn untyped(name: &'static str) -> Self {
        Self {
            name,
            declared: DeclaredType::Untyped,
            default: None,
        }
    }

    pub fn with_default<V: Send + Sync + 'static>(mut self, value: V) -> Self {
        self.default = Some(Arc::new(value));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&Instance> {
        self.default.as_ref()
    }

    /// How this parameter is named in errors: its type when known, else its name.
    pub fn label(&self) -> &'static str {
        self.declared
            .type_ref()
            .map(|ty| ty.name())
            .unwrap_or(self.name)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("has_default", &self.has_default())
            .finish()
    }
}
