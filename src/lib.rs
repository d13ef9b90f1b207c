//! # Loadout
//!
//! Layered runtime dependency-injection container.
//!
//! ## Features
//!
//! - **Keyed bindings**: dependencies are declared and resolved by an opaque
//!   key — cheap textual keys or collision-free unique tokens, per call site
//! - **Lifetimes**: `Singleton`, `Transient` and `Scoped` caching policies as
//!   a closed enum
//! - **Modules**: bindings are grouped into modules that load and unload as a
//!   unit, with lazy last-registered-wins overriding across modules
//! - **Cycle detection**: re-entrant resolution shares one stack, so cyclic
//!   dependency graphs fail with the full offending path
//! - **Scopes**: `run_in_scope` gives scoped bindings one instance per
//!   invocation, cleaned up on every exit path
//!
//! ## Example
//!
//! ```
//! use loadout::{Container, Module, ModuleKey, to_factory, to_value};
//!
//! let container = Container::new();
//! container.bind("greeting", to_value("hello".to_string()));
//!
//! // A later-loaded module overrides the direct binding...
//! let mut overrides = Module::new();
//! overrides.bind("greeting", to_value("hi".to_string()));
//! let module_key = ModuleKey::named("overrides");
//! container.load(&module_key, overrides);
//! assert_eq!(*container.get::<String>("greeting").unwrap(), "hi");
//!
//! // ...and unloading it reveals the original binding again.
//! container.unload(&module_key);
//! assert_eq!(*container.get::<String>("greeting").unwrap(), "hello");
//! ```
//!
//! The container assumes one logical thread of control: resolution is a plain
//! call stack, re-entrant but not concurrent. See [`Container`] for details.

mod binding;
mod container;
mod error;
mod key;
mod module;
mod providers;
mod scope;

pub use binding::{Binding, FactoryFn, Lifetime, SharedInstance};
pub use container::{Container, Resolver};
pub use error::{DiError, DiResult};
pub use key::{DependencyKey, ModuleKey};
pub use module::Module;
pub use providers::{DependencySpec, ResolvedDeps, to_factory, to_factory_in, to_function, to_value};
