//! Instance caches and scope identity

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::binding::SharedInstance;
use crate::key::DependencyKey;

/// Identity of one `run_in_scope` invocation.
///
/// Fresh for every invocation; scoped instances are cached per `ScopeId` and
/// discarded when the invocation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(Uuid);

impl ScopeId {
	pub(crate) fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl fmt::Display for ScopeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "scope-{}", self.0)
	}
}

/// Cache for `Singleton` instances, keyed by dependency key.
///
/// Cleared in bulk on [`Container::unload`](crate::Container::unload); the
/// container cannot attribute a cached singleton to a single owning module
/// once cross-module overriding is possible, so invalidation is global.
#[derive(Default)]
pub(crate) struct SingletonCache {
	cache: RwLock<HashMap<DependencyKey, SharedInstance>>,
}

impl SingletonCache {
	pub(crate) fn get(&self, key: &DependencyKey) -> Option<SharedInstance> {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache.get(key).cloned()
	}

	pub(crate) fn insert(&self, key: DependencyKey, instance: SharedInstance) {
		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		cache.insert(key, instance);
	}

	pub(crate) fn clear(&self) {
		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		cache.clear();
	}
}

/// Cache for `Scoped` instances, keyed by scope identity then dependency key.
#[derive(Default)]
pub(crate) struct ScopedCache {
	cache: RwLock<HashMap<ScopeId, HashMap<DependencyKey, SharedInstance>>>,
}

impl ScopedCache {
	pub(crate) fn get(&self, scope: ScopeId, key: &DependencyKey) -> Option<SharedInstance> {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache.get(&scope).and_then(|scoped| scoped.get(key)).cloned()
	}

	pub(crate) fn insert(&self, scope: ScopeId, key: DependencyKey, instance: SharedInstance) {
		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		cache.entry(scope).or_default().insert(key, instance);
	}

	/// Drops every instance cached for `scope`. Called when the scope
	/// invocation ends, on every exit path.
	pub(crate) fn drop_scope(&self, scope: ScopeId) {
		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		cache.remove(&scope);
	}
}
