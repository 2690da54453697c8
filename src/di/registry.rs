use crate::di::descriptor::{Deriver, TypeRef};
use crate::di::metadata::ClassMetadata;
use crate::error::Result;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;

/// Class metadata keyed by type, shared by every resolution on a container.
#[derive(Default)]
pub(crate) struct Registry {
    entries: DashMap<TypeId, Arc<ClassMetadata>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert metadata, returning the entry it replaced.
    pub fn insert(&self, metadata: ClassMetadata) -> Option<Arc<ClassMetadata>> {
        let target = metadata.target();
        let replaced = self.entries.insert(target.id(), Arc::new(metadata));
        if replaced.is_some() {
            tracing::warn!("Re-registered {}, previous metadata replaced", target);
        } else {
            tracing::debug!("Registered {}", target);
        }
        replaced
    }

    pub fn get(&self, ty: TypeRef) -> Option<Arc<ClassMetadata>> {
        self.entries.get(&ty.id()).map(|entry| Arc::clone(entry.value()))
    }

    /// Registered metadata for `ty`, deriving and caching plain-object metadata on a miss.
    ///
    /// Derived metadata is stored exactly like a registration, so a plain type is
    /// inspected once per container.
    pub fn metadata_or_derive(&self, ty: TypeRef, derive: Deriver) -> Result<Arc<ClassMetadata>> {
        if let Some(metadata) = self.get(ty) {
            return Ok(metadata);
        }

        let entry = self
            .entries
            .entry(ty.id())
            .or_try_insert_with(|| {
                tracing::debug!("Auto-resolving plain type {} as transient", ty);
                derive().map(Arc::new)
            })?;
        Ok(Arc::clone(entry.value()))
    }

    pub fn contains(&self, ty: TypeRef) -> bool {
        self.entries.contains_key(&ty.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::descriptor::Dependency;
    use crate::di::scope::Scope;
    use crate::error::InjectError;

    struct Plain;
    struct Broken;

    fn plain_metadata() -> Result<ClassMetadata> {
        ClassMetadata::from_fn::<Plain, _>(Scope::Transient, Vec::new(), |_| Ok(Plain))
    }

    fn broken_metadata() -> Result<ClassMetadata> {
        ClassMetadata::from_fn::<Broken, _>(
            Scope::Transient,
            vec![Dependency::untyped("missing")],
            |_| Ok(Broken),
        )
    }

    #[test]
    fn test_insert_replaces_existing_entry() {
        let registry = Registry::new();
        assert!(registry.insert(plain_metadata().unwrap()).is_none());

        let singleton =
            ClassMetadata::from_fn::<Plain, _>(Scope::Singleton, Vec::new(), |_| Ok(Plain))
                .unwrap();
        assert!(registry.insert(singleton).is_some());

        let stored = registry.get(TypeRef::of::<Plain>()).unwrap();
        assert_eq!(stored.scope(), Scope::Singleton);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_derived_metadata_is_cached() {
        let registry = Registry::new();
        let ty = TypeRef::of::<Plain>();

        let first = registry.metadata_or_derive(ty, plain_metadata).unwrap();
        let second = registry.metadata_or_derive(ty, plain_metadata).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.contains(ty));
    }

    #[test]
    fn test_failed_derive_leaves_registry_untouched() {
        let registry = Registry::new();
        let ty = TypeRef::of::<Broken>();

        let err = registry.metadata_or_derive(ty, broken_metadata).unwrap_err();
        assert!(matches!(err, InjectError::MissingTypeHint { .. }));
        assert!(!registry.contains(ty));
    }
}
