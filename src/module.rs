//! Loadable binding modules

use std::collections::HashMap;

use crate::binding::Binding;
use crate::key::DependencyKey;

/// An ordered set of bindings, loadable into a container as a unit.
///
/// A module holds at most one binding per key; a later [`bind`](Module::bind)
/// for the same key silently replaces the earlier one. Modules have no
/// lifecycle awareness of their own — caching and cycle detection live in the
/// [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use loadout::{Container, Module, ModuleKey, to_value};
///
/// let mut module = Module::new();
/// module
/// 	.bind("GREETING", to_value("hello".to_string()))
/// 	.bind("ANSWER", to_value(42u32));
///
/// let container = Container::new();
/// container.load(ModuleKey::named("greetings"), module);
/// assert_eq!(*container.get::<u32>("ANSWER").unwrap(), 42);
/// ```
#[derive(Debug, Default)]
pub struct Module {
	bindings: HashMap<DependencyKey, Binding>,
}

impl Module {
	/// Creates an empty module.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `binding` under `key`, overwriting any earlier binding for the
	/// same key. Fluent; never fails.
	pub fn bind(&mut self, key: impl Into<DependencyKey>, binding: Binding) -> &mut Self {
		self.bindings.insert(key.into(), binding);
		self
	}

	/// Looks up the binding for `key`, if present.
	pub fn get(&self, key: &DependencyKey) -> Option<&Binding> {
		self.bindings.get(key)
	}

	/// Number of bindings held by this module.
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	/// Whether this module holds no bindings.
	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}
