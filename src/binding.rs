//! Binding records and lifetimes

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::container::Resolver;
use crate::error::DiResult;

/// A resolved instance, shared between the caches and every caller.
pub type SharedInstance = Arc<dyn Any + Send + Sync>;

/// Factory invoked by the container to produce an instance.
///
/// The [`Resolver`] argument re-enters the owning container, so a factory can
/// request its own dependencies by key.
pub type FactoryFn = Arc<dyn Fn(&Resolver<'_>) -> DiResult<SharedInstance> + Send + Sync>;

/// Instance caching policy attached to every binding.
///
/// # Examples
///
/// ```
/// use loadout::{Container, Lifetime, to_factory_in};
///
/// let container = Container::new();
/// container.bind("ticket", to_factory_in(|_| Ok(0u32), Lifetime::Transient));
///
/// // Transient bindings produce a fresh instance per resolution
/// let a = container.get::<u32>("ticket").unwrap();
/// let b = container.get::<u32>("ticket").unwrap();
/// assert!(!std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
	/// One instance for the lifetime of the container, cached on first
	/// resolution and reused until a bulk cache clear (see
	/// [`Container::unload`](crate::Container::unload)).
	Singleton,
	/// A fresh instance on every resolution; never cached.
	Transient,
	/// One instance per [`run_in_scope`](crate::Container::run_in_scope)
	/// invocation, discarded when the scope ends.
	Scoped,
}

/// A factory paired with its [`Lifetime`]. Immutable once created.
///
/// Bindings are normally built through the helpers in [`crate::providers`]
/// ([`to_value`](crate::to_value), [`to_factory`](crate::to_factory),
/// [`to_function`](crate::to_function)) rather than constructed directly.
#[derive(Clone)]
pub struct Binding {
	factory: FactoryFn,
	lifetime: Lifetime,
}

impl Binding {
	/// Creates a binding from a type-erased factory.
	pub fn new(factory: FactoryFn, lifetime: Lifetime) -> Self {
		Self { factory, lifetime }
	}

	/// Creates a binding from a typed factory closure.
	pub fn from_factory<T, F>(factory: F, lifetime: Lifetime) -> Self
	where
		T: Any + Send + Sync,
		F: Fn(&Resolver<'_>) -> DiResult<T> + Send + Sync + 'static,
	{
		Self::new(
			Arc::new(move |resolver: &Resolver<'_>| {
				let value = factory(resolver)?;
				Ok(Arc::new(value) as SharedInstance)
			}),
			lifetime,
		)
	}

	/// The caching policy of this binding.
	pub fn lifetime(&self) -> Lifetime {
		self.lifetime
	}

	/// Invokes the factory with the given resolver.
	pub(crate) fn instantiate(&self, resolver: &Resolver<'_>) -> DiResult<SharedInstance> {
		(self.factory)(resolver)
	}
}

impl fmt::Debug for Binding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("lifetime", &self.lifetime)
			.finish_non_exhaustive()
	}
}
