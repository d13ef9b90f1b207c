//! The resolution engine

use std::any::{self, Any};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::binding::{Binding, Lifetime, SharedInstance};
use crate::error::{DiError, DiResult};
use crate::key::{DependencyKey, ModuleKey};
use crate::module::Module;
use crate::scope::{ScopeId, ScopedCache, SingletonCache};

/// Layered dependency-injection container.
///
/// A container owns an ordered list of [`Module`]s — an implicit default
/// module for directly-bound keys plus any explicitly loaded ones — along
/// with the instance caches for each [`Lifetime`] and the resolution stack
/// used for cycle detection.
///
/// Lookup is lazy and last-registered-wins: on every [`get`](Container::get)
/// the modules are searched most-recently-loaded first, so a later-loaded
/// module can override a key and [`unload`](Container::unload)ing it reveals
/// the earlier binding again.
///
/// The container is re-entrant (factories resolve their own dependencies
/// through the same engine) but assumes a single logical thread of control:
/// the current-scope slot and the resolution stack are container-global, so
/// concurrent interleaved `get`/`run_in_scope` calls on one container are not
/// supported.
///
/// # Examples
///
/// ```
/// use loadout::{Container, to_factory, to_value};
///
/// let container = Container::new();
/// container
/// 	.bind("base_url", to_value("https://example.org".to_string()))
/// 	.bind(
/// 		"endpoint",
/// 		to_factory(|resolve| {
/// 			let base = resolve.resolve::<String>("base_url")?;
/// 			Ok(format!("{base}/health"))
/// 		}),
/// 	);
///
/// let endpoint = container.get::<String>("endpoint").unwrap();
/// assert_eq!(*endpoint, "https://example.org/health");
/// ```
pub struct Container {
	/// Default module at index 0 (keyed by an unforgeable token), loaded
	/// modules appended after it in load order.
	modules: RwLock<Vec<(ModuleKey, Module)>>,
	singletons: SingletonCache,
	scoped: ScopedCache,
	resolution: Mutex<Vec<DependencyKey>>,
	current_scope: Mutex<Option<ScopeId>>,
}

impl Container {
	/// Creates an empty container with its implicit default module.
	pub fn new() -> Self {
		Self {
			modules: RwLock::new(vec![(ModuleKey::token("DEFAULT"), Module::new())]),
			singletons: SingletonCache::default(),
			scoped: ScopedCache::default(),
			resolution: Mutex::new(Vec::new()),
			current_scope: Mutex::new(None),
		}
	}

	/// Binds `key` in the default module, overwriting any earlier direct
	/// binding for the same key. Fluent; always succeeds.
	pub fn bind(&self, key: impl Into<DependencyKey>, binding: Binding) -> &Self {
		let mut modules = self.modules.write().unwrap_or_else(PoisonError::into_inner);
		modules[0].1.bind(key, binding);
		self
	}

	/// Attaches `module` under `module_key`, after all previously loaded
	/// modules.
	///
	/// Re-loading an already-attached key replaces the module in place,
	/// keeping its position in the search order. Cached singleton instances
	/// are not evicted by a replacement; [`unload`](Container::unload) is the
	/// invalidation point.
	pub fn load(&self, module_key: impl Into<ModuleKey>, module: Module) -> &Self {
		let module_key = module_key.into();
		debug!(module = %module_key, bindings = module.len(), "module loaded");
		let mut modules = self.modules.write().unwrap_or_else(PoisonError::into_inner);
		if let Some(slot) = modules.iter_mut().find(|(key, _)| *key == module_key) {
			slot.1 = module;
		} else {
			modules.push((module_key, module));
		}
		self
	}

	/// Detaches the module loaded under `module_key` and clears the entire
	/// singleton cache.
	///
	/// The clear is deliberately global: once cross-module overriding is
	/// possible, a cached singleton cannot be safely attributed to a single
	/// owning module. Scoped caches are unaffected.
	pub fn unload(&self, module_key: impl Into<ModuleKey>) -> &Self {
		let module_key = module_key.into();
		self.singletons.clear();
		let mut modules = self.modules.write().unwrap_or_else(PoisonError::into_inner);
		modules.retain(|(key, _)| *key != module_key);
		debug!(module = %module_key, "module unloaded");
		self
	}

	/// Resolves `key` and downcasts the instance to `T`.
	///
	/// Fails with [`DiError::BindingNotFound`] when no module contains the
	/// key, [`DiError::CircularDependency`] when resolution re-enters a key
	/// already mid-resolution, [`DiError::NoActiveScope`] for scoped keys
	/// outside [`run_in_scope`](Container::run_in_scope), and
	/// [`DiError::TypeMismatch`] when the instance is not a `T`.
	pub fn get<T>(&self, key: impl Into<DependencyKey>) -> DiResult<Arc<T>>
	where
		T: Any + Send + Sync,
	{
		let key = key.into();
		let instance = self.resolve_key(&key)?;
		instance.downcast::<T>().map_err(|_| DiError::TypeMismatch {
			key,
			expected: any::type_name::<T>(),
		})
	}

	/// Resolves `key` to the type-erased shared instance.
	pub fn get_raw(&self, key: impl Into<DependencyKey>) -> DiResult<SharedInstance> {
		self.resolve_key(&key.into())
	}

	/// Runs `body` inside a fresh scope.
	///
	/// Scoped bindings resolved while `body` runs are cached per invocation
	/// and dropped when it ends — on normal return, on `Err`, and on panic
	/// unwind alike. Scopes nest: the enclosing scope is restored on exit.
	/// Returns `body`'s value; failures propagate untouched.
	pub fn run_in_scope<R>(&self, body: impl FnOnce() -> R) -> R {
		let scope = ScopeId::new();
		let previous = {
			let mut current = self
				.current_scope
				.lock()
				.unwrap_or_else(PoisonError::into_inner);
			current.replace(scope)
		};
		trace!(%scope, "scope entered");
		let _guard = ScopeGuard {
			container: self,
			scope,
			previous,
		};
		body()
	}

	/// Full resolution algorithm; re-entered by [`Resolver`] for nested
	/// lookups so that cross-factory cycles share one stack.
	fn resolve_key(&self, key: &DependencyKey) -> DiResult<SharedInstance> {
		self.enter_resolution(key)?;
		let _frame = StackFrame { container: self };
		self.dispatch(key)
	}

	/// Pushes `key` onto the resolution stack, failing if it is already
	/// mid-resolution.
	fn enter_resolution(&self, key: &DependencyKey) -> DiResult<()> {
		let mut stack = self
			.resolution
			.lock()
			.unwrap_or_else(PoisonError::into_inner);
		if stack.contains(key) {
			let path = stack
				.iter()
				.map(ToString::to_string)
				.chain(std::iter::once(key.to_string()))
				.collect::<Vec<_>>()
				.join(" -> ");
			return Err(DiError::CircularDependency { path });
		}
		stack.push(key.clone());
		Ok(())
	}

	fn dispatch(&self, key: &DependencyKey) -> DiResult<SharedInstance> {
		let binding = self
			.find_binding(key)
			.ok_or_else(|| DiError::BindingNotFound { key: key.clone() })?;
		trace!(%key, lifetime = ?binding.lifetime(), "resolving binding");

		// No lock is held across a factory invocation: factories re-enter
		// the container through the resolver.
		match binding.lifetime() {
			Lifetime::Singleton => {
				if let Some(instance) = self.singletons.get(key) {
					return Ok(instance);
				}
				let instance = binding.instantiate(&Resolver { container: self })?;
				self.singletons.insert(key.clone(), instance.clone());
				Ok(instance)
			}
			Lifetime::Transient => binding.instantiate(&Resolver { container: self }),
			Lifetime::Scoped => {
				let scope = self
					.active_scope()
					.ok_or_else(|| DiError::NoActiveScope { key: key.clone() })?;
				if let Some(instance) = self.scoped.get(scope, key) {
					return Ok(instance);
				}
				let instance = binding.instantiate(&Resolver { container: self })?;
				self.scoped.insert(scope, key.clone(), instance.clone());
				Ok(instance)
			}
		}
	}

	/// Searches loaded modules most-recently-loaded first; the default
	/// module sits at position 0 and therefore has the lowest priority.
	fn find_binding(&self, key: &DependencyKey) -> Option<Binding> {
		let modules = self.modules.read().unwrap_or_else(PoisonError::into_inner);
		modules
			.iter()
			.rev()
			.find_map(|(_, module)| module.get(key).cloned())
	}

	fn active_scope(&self) -> Option<ScopeId> {
		*self
			.current_scope
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
	}
}

impl Default for Container {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Container {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let modules = self.modules.read().unwrap_or_else(PoisonError::into_inner);
		f.debug_struct("Container")
			.field("modules", &modules.len())
			.finish_non_exhaustive()
	}
}

/// The recursion seam handed to every factory.
///
/// A resolver borrows its container and re-enters the same resolution
/// algorithm, sharing the one resolution stack so that cycles spanning
/// multiple factories are still detected.
pub struct Resolver<'a> {
	pub(crate) container: &'a Container,
}

impl Resolver<'_> {
	/// Resolves a dependency of the factory being invoked.
	pub fn resolve<T>(&self, key: impl Into<DependencyKey>) -> DiResult<Arc<T>>
	where
		T: Any + Send + Sync,
	{
		self.container.get(key)
	}

	/// Resolves a dependency without downcasting.
	pub fn resolve_raw(&self, key: impl Into<DependencyKey>) -> DiResult<SharedInstance> {
		self.container.get_raw(key)
	}
}

/// Pops the resolution stack when a resolution frame ends, on success and
/// failure alike.
struct StackFrame<'a> {
	container: &'a Container,
}

impl Drop for StackFrame<'_> {
	fn drop(&mut self) {
		let mut stack = self
			.container
			.resolution
			.lock()
			.unwrap_or_else(PoisonError::into_inner);
		stack.pop();
	}
}

/// Discards a scope's cached instances and restores the enclosing scope when
/// a `run_in_scope` invocation ends, however it ends.
struct ScopeGuard<'a> {
	container: &'a Container,
	scope: ScopeId,
	previous: Option<ScopeId>,
}

impl Drop for ScopeGuard<'_> {
	fn drop(&mut self) {
		self.container.scoped.drop_scope(self.scope);
		let mut current = self
			.container
			.current_scope
			.lock()
			.unwrap_or_else(PoisonError::into_inner);
		*current = self.previous;
		trace!(scope = %self.scope, "scope exited");
	}
}
