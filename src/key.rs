//! Dependency and module keys

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Identifier under which a binding is stored and resolved.
///
/// Two modes are supported, chosen per key by the caller:
///
/// - **Named** ([`DependencyKey::named`]): equality is by the text itself.
///   Named keys are cheap and deliberately collidable — binding the same
///   name in a later-loaded module overrides the earlier binding.
/// - **Token** ([`DependencyKey::token`]): carries a process-unique id.
///   Two tokens created with the same label are never equal, so token keys
///   cannot collide across modules.
///
/// `&str` converts into a named key, so string literals can be passed
/// directly wherever a key is expected.
///
/// # Examples
///
/// ```
/// use loadout::DependencyKey;
///
/// let a = DependencyKey::named("DATABASE");
/// let b = DependencyKey::named("DATABASE");
/// assert_eq!(a, b);
///
/// let t1 = DependencyKey::token("DATABASE");
/// let t2 = DependencyKey::token("DATABASE");
/// assert_ne!(t1, t2);
/// assert_eq!(t1, t1.clone());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyKey {
	/// Textual key, compared by content
	Named(Arc<str>),
	/// Unique token; the label is carried for diagnostics only
	Token {
		/// Process-unique identity of this token
		id: Uuid,
		/// Human-readable label shown in error messages
		label: Arc<str>,
	},
}

impl DependencyKey {
	/// Creates a textual key compared by content.
	pub fn named(name: impl AsRef<str>) -> Self {
		Self::Named(Arc::from(name.as_ref()))
	}

	/// Creates a collision-free unique token carrying `label` for display.
	pub fn token(label: impl AsRef<str>) -> Self {
		Self::Token {
			id: Uuid::new_v4(),
			label: Arc::from(label.as_ref()),
		}
	}

	/// The human-readable form of the key, used in error messages.
	pub fn label(&self) -> &str {
		match self {
			Self::Named(name) => name,
			Self::Token { label, .. } => label,
		}
	}
}

impl fmt::Display for DependencyKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

impl From<&str> for DependencyKey {
	fn from(name: &str) -> Self {
		Self::named(name)
	}
}

impl From<String> for DependencyKey {
	fn from(name: String) -> Self {
		Self::Named(Arc::from(name.as_str()))
	}
}

impl From<&DependencyKey> for DependencyKey {
	fn from(key: &DependencyKey) -> Self {
		key.clone()
	}
}

/// Identifier under which a module is attached to a container.
///
/// Same dual design as [`DependencyKey`]: named keys compare by text, token
/// keys are process-unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleKey {
	/// Textual key, compared by content
	Named(Arc<str>),
	/// Unique token; the label is carried for diagnostics only
	Token {
		/// Process-unique identity of this token
		id: Uuid,
		/// Human-readable label shown in log output
		label: Arc<str>,
	},
}

impl ModuleKey {
	/// Creates a textual module key compared by content.
	pub fn named(name: impl AsRef<str>) -> Self {
		Self::Named(Arc::from(name.as_ref()))
	}

	/// Creates a collision-free unique module token.
	pub fn token(label: impl AsRef<str>) -> Self {
		Self::Token {
			id: Uuid::new_v4(),
			label: Arc::from(label.as_ref()),
		}
	}

	/// The human-readable form of the key.
	pub fn label(&self) -> &str {
		match self {
			Self::Named(name) => name,
			Self::Token { label, .. } => label,
		}
	}
}

impl fmt::Display for ModuleKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

impl From<&str> for ModuleKey {
	fn from(name: &str) -> Self {
		Self::named(name)
	}
}

impl From<String> for ModuleKey {
	fn from(name: String) -> Self {
		Self::Named(Arc::from(name.as_str()))
	}
}

impl From<&ModuleKey> for ModuleKey {
	fn from(key: &ModuleKey) -> Self {
		key.clone()
	}
}
