//! Scoped lifetime and `run_in_scope` behavior
//!
//! One instance per scope invocation, isolation across invocations, nesting,
//! and cleanup on every exit path (return, `Err`, panic unwind).

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use loadout::{Container, DiError, Lifetime, to_factory_in};

#[derive(Debug)]
struct Session {
	id: usize,
}

fn bind_session(container: &Container) -> Arc<AtomicUsize> {
	let counter = Arc::new(AtomicUsize::new(0));
	let factory_counter = counter.clone();
	container.bind(
		"session",
		to_factory_in(
			move |_| {
				Ok(Session {
					id: factory_counter.fetch_add(1, Ordering::SeqCst),
				})
			},
			Lifetime::Scoped,
		),
	);
	counter
}

// ============================================================================
// Basic scoped behavior
// ============================================================================

#[test]
fn scoped_resolution_outside_a_scope_fails() {
	let container = Container::new();
	bind_session(&container);

	let err = container.get::<Session>("session").unwrap_err();
	match err {
		DiError::NoActiveScope { ref key } => assert_eq!(key.label(), "session"),
		other => panic!("expected NoActiveScope, got {other:?}"),
	}
}

#[test]
fn scoped_instance_is_reused_within_one_scope() {
	let container = Container::new();
	let counter = bind_session(&container);

	container.run_in_scope(|| {
		let first = container.get::<Session>("session").unwrap();
		let second = container.get::<Session>("session").unwrap();
		assert!(Arc::ptr_eq(&first, &second));
	});
	assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn separate_scope_invocations_get_separate_instances() {
	let container = Container::new();
	let counter = bind_session(&container);

	let first_id = container.run_in_scope(|| container.get::<Session>("session").unwrap().id);
	let second_id = container.run_in_scope(|| container.get::<Session>("session").unwrap().id);

	assert_ne!(first_id, second_id);
	assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn run_in_scope_returns_the_body_result() {
	let container = Container::new();
	let value = container.run_in_scope(|| 41 + 1);
	assert_eq!(value, 42);
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn nested_scopes_are_isolated_and_the_outer_scope_is_restored() {
	let container = Container::new();
	bind_session(&container);

	container.run_in_scope(|| {
		let outer = container.get::<Session>("session").unwrap();

		let inner = container.run_in_scope(|| container.get::<Session>("session").unwrap());
		assert!(!Arc::ptr_eq(&outer, &inner));

		// After the inner scope ends, the outer scope's instance is current
		// again.
		let outer_again = container.get::<Session>("session").unwrap();
		assert!(Arc::ptr_eq(&outer, &outer_again));
	});
}

// ============================================================================
// Cleanup on exit paths
// ============================================================================

#[test]
fn scoped_cache_entry_is_dropped_when_the_scope_ends() {
	let container = Container::new();
	bind_session(&container);

	let weak = container.run_in_scope(|| {
		let session = container.get::<Session>("session").unwrap();
		Arc::downgrade(&session)
	});

	// The scoped cache held the last strong reference
	assert!(weak.upgrade().is_none());
}

#[test]
fn scope_is_cleaned_up_when_the_body_returns_an_error() {
	let container = Container::new();
	bind_session(&container);

	let result: Result<(), String> = container.run_in_scope(|| {
		let _session = container.get::<Session>("session").unwrap();
		Err("body failed".to_string())
	});
	assert!(result.is_err());

	// The failure propagated, the scope slot was restored
	assert!(matches!(
		container.get::<Session>("session"),
		Err(DiError::NoActiveScope { .. })
	));
}

#[test]
fn scope_is_cleaned_up_on_panic_unwind() {
	let container = Container::new();
	let counter = bind_session(&container);

	let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
		container.run_in_scope(|| {
			let _session = container.get::<Session>("session").unwrap();
			panic!("boom");
		})
	}));
	assert!(outcome.is_err());

	// Current scope restored to "none"...
	assert!(matches!(
		container.get::<Session>("session"),
		Err(DiError::NoActiveScope { .. })
	));

	// ...and the container still works: a later scope gets a fresh instance.
	let id = container.run_in_scope(|| container.get::<Session>("session").unwrap().id);
	assert_eq!(id, 1);
	assert_eq!(counter.load(Ordering::SeqCst), 2);
}
