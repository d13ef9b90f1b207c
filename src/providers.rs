//! Binding declaration helpers
//!
//! Adapters that wrap a plain value, a factory closure, or a function of
//! declared dependencies into a uniform [`Binding`] record. They carry no
//! resolution logic of their own; everything at runtime goes through the
//! [`Container`](crate::Container).

use std::any::{self, Any};
use std::collections::HashSet;
use std::sync::Arc;

use crate::binding::{Binding, Lifetime, SharedInstance};
use crate::container::Resolver;
use crate::error::{DiError, DiResult};
use crate::key::DependencyKey;

/// Wraps an existing value. Singleton by construction: every resolution
/// returns the same shared instance.
///
/// # Examples
///
/// ```
/// use loadout::{Container, to_value};
///
/// let container = Container::new();
/// container.bind("answer", to_value(42u32));
/// assert_eq!(*container.get::<u32>("answer").unwrap(), 42);
/// ```
pub fn to_value<T: Any + Send + Sync>(value: T) -> Binding {
	let shared: SharedInstance = Arc::new(value);
	Binding::new(
		Arc::new(move |_: &Resolver<'_>| Ok(shared.clone())),
		Lifetime::Singleton,
	)
}

/// Wraps a factory closure with the default `Singleton` lifetime.
///
/// The closure receives a [`Resolver`] and may request its own dependencies
/// through it.
pub fn to_factory<T, F>(factory: F) -> Binding
where
	T: Any + Send + Sync,
	F: Fn(&Resolver<'_>) -> DiResult<T> + Send + Sync + 'static,
{
	to_factory_in(factory, Lifetime::Singleton)
}

/// Wraps a factory closure with an explicit lifetime.
pub fn to_factory_in<T, F>(factory: F, lifetime: Lifetime) -> Binding
where
	T: Any + Send + Sync,
	F: Fn(&Resolver<'_>) -> DiResult<T> + Send + Sync + 'static,
{
	Binding::from_factory(factory, lifetime)
}

/// Adapts a function of resolved dependencies into a binding.
///
/// `dependencies` declares, by key, what the function needs; the container
/// resolves them on every instantiation and hands them over as
/// [`ResolvedDeps`]. The specification is validated at declaration time and
/// a malformed one fails with [`DiError::InvalidDependencySpecification`].
///
/// Constructors need no separate adapter: an associated function like
/// `Service::new` is adapted exactly the same way.
///
/// # Examples
///
/// ```
/// use loadout::{Container, DependencySpec, Lifetime, to_function, to_value};
///
/// let container = Container::new();
/// container.bind("host", to_value("localhost".to_string()));
/// container.bind("port", to_value(5432u16));
///
/// let binding = to_function(
/// 	|deps| {
/// 		let host = deps.get::<String>(0)?;
/// 		let port = deps.get::<u16>(1)?;
/// 		Ok(format!("{host}:{port}"))
/// 	},
/// 	DependencySpec::list(["host", "port"]),
/// 	Lifetime::Singleton,
/// )
/// .unwrap();
/// container.bind("address", binding);
///
/// assert_eq!(*container.get::<String>("address").unwrap(), "localhost:5432");
/// ```
pub fn to_function<T, F>(
	func: F,
	dependencies: DependencySpec,
	lifetime: Lifetime,
) -> DiResult<Binding>
where
	T: Any + Send + Sync,
	F: Fn(&ResolvedDeps) -> DiResult<T> + Send + Sync + 'static,
{
	dependencies.validate()?;
	Ok(Binding::from_factory(
		move |resolver: &Resolver<'_>| {
			let deps = dependencies.resolve(resolver)?;
			func(&deps)
		},
		lifetime,
	))
}

/// Declared dependencies of a [`to_function`] binding: either a positional
/// sequence of keys or a name → key mapping.
#[derive(Debug, Clone)]
pub enum DependencySpec {
	/// Positional dependencies, accessed by index
	List(Vec<DependencyKey>),
	/// Named dependencies, accessed by name
	Named(Vec<(String, DependencyKey)>),
}

impl DependencySpec {
	/// Builds a positional specification.
	pub fn list<K>(keys: impl IntoIterator<Item = K>) -> Self
	where
		K: Into<DependencyKey>,
	{
		Self::List(keys.into_iter().map(Into::into).collect())
	}

	/// Builds a named specification.
	pub fn named<N, K>(entries: impl IntoIterator<Item = (N, K)>) -> Self
	where
		N: Into<String>,
		K: Into<DependencyKey>,
	{
		Self::Named(
			entries
				.into_iter()
				.map(|(name, key)| (name.into(), key.into()))
				.collect(),
		)
	}

	/// Declaration-time validation: names must be non-empty and unique.
	fn validate(&self) -> DiResult<()> {
		let Self::Named(entries) = self else {
			return Ok(());
		};
		let mut seen = HashSet::new();
		for (name, _) in entries {
			if name.is_empty() {
				return Err(DiError::InvalidDependencySpecification {
					reason: "dependency name must not be empty".to_string(),
				});
			}
			if !seen.insert(name.as_str()) {
				return Err(DiError::InvalidDependencySpecification {
					reason: format!("duplicate dependency name: {name}"),
				});
			}
		}
		Ok(())
	}

	/// Resolves every declared key through `resolver`, in declaration order.
	fn resolve(&self, resolver: &Resolver<'_>) -> DiResult<ResolvedDeps> {
		let entries = match self {
			Self::List(keys) => keys
				.iter()
				.map(|key| Ok((None, key.clone(), resolver.resolve_raw(key)?)))
				.collect::<DiResult<Vec<_>>>()?,
			Self::Named(named) => named
				.iter()
				.map(|(name, key)| {
					Ok((Some(name.clone()), key.clone(), resolver.resolve_raw(key)?))
				})
				.collect::<DiResult<Vec<_>>>()?,
		};
		Ok(ResolvedDeps { entries })
	}
}

/// Dependencies resolved for one [`to_function`] invocation, accessed by
/// position or by name.
pub struct ResolvedDeps {
	entries: Vec<(Option<String>, DependencyKey, SharedInstance)>,
}

impl ResolvedDeps {
	/// Number of resolved dependencies.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the specification declared no dependencies.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The dependency at `index`, downcast to `T`.
	pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
		let (_, key, instance) = self.entries.get(index).ok_or_else(|| {
			DiError::InvalidDependencySpecification {
				reason: format!(
					"dependency index {index} out of range ({} declared)",
					self.entries.len()
				),
			}
		})?;
		downcast(key, instance.clone())
	}

	/// The dependency declared under `name`, downcast to `T`.
	pub fn get_named<T: Any + Send + Sync>(&self, name: &str) -> DiResult<Arc<T>> {
		let (_, key, instance) = self
			.entries
			.iter()
			.find(|(entry_name, _, _)| entry_name.as_deref() == Some(name))
			.ok_or_else(|| DiError::InvalidDependencySpecification {
				reason: format!("no dependency named {name}"),
			})?;
		downcast(key, instance.clone())
	}
}

fn downcast<T: Any + Send + Sync>(
	key: &DependencyKey,
	instance: SharedInstance,
) -> DiResult<Arc<T>> {
	instance.downcast::<T>().map_err(|_| DiError::TypeMismatch {
		key: key.clone(),
		expected: any::type_name::<T>(),
	})
}
