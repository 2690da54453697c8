use crate::di::descriptor::{Dependency, Instance, TypeRef};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Per-call special values threaded into a resolution by the caller.
///
/// The request layer uses this to hand request-scoped values (the current
/// request's headers, an authenticated principal, ...) to constructors without
/// registering them.
#[derive(Clone, Default)]
pub struct Context {
    values: HashMap<String, Instance>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: Send + Sync + 'static>(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<V: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: V) {
        self.values.insert(key.into(), Arc::new(value));
    }

    pub fn insert_shared(&mut self, key: impl Into<String>, value: Instance) {
        self.values.insert(key.into(), value);
    }

    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.values
            .get(key)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    pub fn raw(&self, key: &str) -> Option<&Instance> {
        self.values.get(key)
    }

    /// Copy every entry of `other` into this context, overwriting on key clashes.
    pub fn merge(&mut self, other: &Context) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), Arc::clone(value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Decides which context value, if any, satisfies a constructor parameter.
pub trait ContextMatcher: Send + Sync {
    fn lookup(&self, context: &Context, dependency: &Dependency) -> Option<Instance>;
}

fn is_instance_of(value: &Instance, ty: TypeRef) -> bool {
    let value: &dyn Any = &**value;
    value.type_id() == ty.id()
}

/// Matches a context key against the parameter name.
///
/// When the parameter declares a type, the value must have exactly that type;
/// a same-named value of another type is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByName;

impl ContextMatcher for ByName {
    fn lookup(&self, context: &Context, dependency: &Dependency) -> Option<Instance> {
        let value = context.raw(dependency.name())?;
        match dependency.declared_type().type_ref() {
            Some(ty) if !is_instance_of(value, ty) => None,
            _ => Some(Arc::clone(value)),
        }
    }
}

/// Matches a context value whose concrete type is the declared parameter type.
///
/// Exactly one value of that type must be present. With several candidates the
/// match is ambiguous and nothing is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByType;

impl ContextMatcher for ByType {
    fn lookup(&self, context: &Context, dependency: &Dependency) -> Option<Instance> {
        let ty = dependency.declared_type().type_ref()?;
        let mut candidates = context.iter().filter(|(_, value)| is_instance_of(value, ty));
        let (key, value) = candidates.next()?;
        if candidates.next().is_some() {
            tracing::debug!(
                "Ambiguous context for parameter '{}': several values of type {}",
                dependency.name(),
                ty
            );
            return None;
        }
        tracing::trace!("Context key '{}' matched parameter '{}' by type", key, dependency.name());
        Some(Arc::clone(value))
    }
}

/// Name first, then type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByNameOrType;

impl ContextMatcher for ByNameOrType {
    fn lookup(&self, context: &Context, dependency: &Dependency) -> Option<Instance> {
        ByName
            .lookup(context, dependency)
            .or_else(|| ByType.lookup(context, dependency))
    }
}

/// Built-in matching policies, selectable from configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ContextMatching {
    #[default]
    Name,
    Type,
    NameOrType,
}

impl ContextMatching {
    pub fn matcher(self) -> Arc<dyn ContextMatcher> {
        match self {
            ContextMatching::Name => Arc::new(ByName),
            ContextMatching::Type => Arc::new(ByType),
            ContextMatching::NameOrType => Arc::new(ByNameOrType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[derive(Debug, PartialEq)]
    struct RequestId(u64);

    #[test]
    fn test_by_name() {
        let context = Context::new().with("request_id", RequestId(7));
        let hit = ByName.lookup(&context, &Dependency::value::<RequestId>("request_id"));
        let miss = ByName.lookup(&context, &Dependency::value::<RequestId>("other"));

        assert_eq!(*hit.unwrap().downcast::<RequestId>().unwrap(), RequestId(7));
        assert!(miss.is_none());
    }

    #[test]
    fn test_by_type_ignores_names() {
        let context = Context::new().with("anything", RequestId(9));
        let dep = Dependency::value::<RequestId>("request_id");

        assert!(ByName.lookup(&context, &dep).is_none());
        let hit = ByType.lookup(&context, &dep).unwrap();
        assert_eq!(*hit.downcast::<RequestId>().unwrap(), RequestId(9));
        assert!(ByType.lookup(&context, &Dependency::untyped("x")).is_none());
    }

    #[test]
    fn test_by_name_requires_declared_type() {
        let context = Context::new().with("uri", 5u32).with("label", 5u32);

        assert!(ByName
            .lookup(&context, &Dependency::value::<String>("uri"))
            .is_none());
        assert!(ByName
            .lookup(&context, &Dependency::untyped("label").with_default(0u32))
            .is_some());
    }

    #[test]
    fn test_by_type_rejects_ambiguous_values() {
        let dep = Dependency::value::<u64>("limit");
        let context = Context::new().with("x", 1u64).with("y", 2u64).with("z", 3u64);
        for _ in 0..20 {
            assert!(ByType.lookup(&context, &dep).is_none());
        }

        let context = Context::new().with("x", 1u64).with("name", String::from("n"));
        let hit = ByType.lookup(&context, &dep).unwrap();
        assert_eq!(*hit.downcast::<u64>().unwrap(), 1);
    }

    #[test]
    fn test_name_or_type_prefers_name() {
        let context = Context::new()
            .with("request_id", RequestId(1))
            .with("fallback", RequestId(2));
        let by_name = ByNameOrType
            .lookup(&context, &Dependency::value::<RequestId>("request_id"))
            .unwrap();
        assert_eq!(*by_name.downcast::<RequestId>().unwrap(), RequestId(1));
    }

    #[test]
    fn test_merge_overwrites() {
        let mut base = Context::new().with("a", 1u32).with("b", 2u32);
        base.merge(&Context::new().with("b", 3u32));

        assert_eq!(*base.get::<u32>("a").unwrap(), 1);
        assert_eq!(*base.get::<u32>("b").unwrap(), 3);
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_matching_from_str() {
        assert_eq!(
            ContextMatching::from_str("name_or_type").unwrap(),
            ContextMatching::NameOrType
        );
        assert!(ContextMatching::from_str("fuzzy").is_err());
    }
}
