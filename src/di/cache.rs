use crate::di::descriptor::{Instance, TypeRef};
use dashmap::DashMap;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::any::TypeId;
use std::sync::Arc;

/// Singleton instances owned by one container.
///
/// Construction of singletons is serialized through a re-entrant lock, so a
/// singleton built on one thread may resolve its own singleton dependencies while
/// other threads wait on the cache-miss path.
#[derive(Default)]
pub(crate) struct SingletonCache {
    instances: DashMap<TypeId, Instance>,
    construction: ReentrantMutex<()>,
}

impl SingletonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ty: TypeRef) -> Option<Instance> {
        self.instances
            .get(&ty.id())
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn insert(&self, ty: TypeRef, instance: Instance) {
        self.instances.insert(ty.id(), instance);
    }

    pub fn remove(&self, ty: TypeRef) -> Option<Instance> {
        self.instances.remove(&ty.id()).map(|(_, instance)| instance)
    }

    /// Hold while checking and filling the cache for a singleton.
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.construction.lock()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn clear(&self) {
        self.instances.clear();
    }
}
