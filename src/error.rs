//! Error types for dependency resolution

use crate::key::DependencyKey;

/// Result alias used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;

/// Errors surfaced by the container and the binding helpers.
///
/// None of these are recovered internally: every failure propagates to the
/// caller of [`Container::get`](crate::Container::get) or
/// [`Container::run_in_scope`](crate::Container::run_in_scope) with the
/// container's bookkeeping (resolution stack, scoped caches) already restored.
#[derive(Debug, thiserror::Error)]
pub enum DiError {
	/// No loaded module (searched most-recently-loaded first) contains a
	/// binding for the requested key.
	#[error("no binding found for key: {key}")]
	BindingNotFound {
		/// The key that could not be resolved
		key: DependencyKey,
	},

	/// The key being resolved is already mid-resolution on the stack.
	#[error("circular dependency detected: {path}")]
	CircularDependency {
		/// Full ordered chain, e.g. `A -> B -> A`
		path: String,
	},

	/// A `Scoped` binding was resolved outside of any
	/// [`run_in_scope`](crate::Container::run_in_scope) invocation.
	#[error("cannot resolve scoped binding outside of a scope: {key}")]
	NoActiveScope {
		/// The scoped key that was requested
		key: DependencyKey,
	},

	/// A dependency list handed to a binding helper was malformed.
	#[error("invalid dependency specification: {reason}")]
	InvalidDependencySpecification {
		/// What was wrong with the specification
		reason: String,
	},

	/// A resolved instance could not be downcast to the requested type.
	#[error("binding for key {key} is not of type {expected}")]
	TypeMismatch {
		/// The key whose instance had an unexpected type
		key: DependencyKey,
		/// The type the caller asked for
		expected: &'static str,
	},
}
