//! Binding helper behavior
//!
//! `to_value`, `to_factory` and `to_function` adapters, dependency
//! specification validation, and typed downcast failures.

use loadout::{
	Container, DependencySpec, DiError, DiResult, Lifetime, ResolvedDeps, to_factory, to_function,
	to_value,
};

#[derive(Debug)]
struct Endpoint {
	url: String,
}

fn build_endpoint(deps: &ResolvedDeps) -> DiResult<Endpoint> {
	let host = deps.get::<String>(0)?;
	let port = deps.get::<u16>(1)?;
	Ok(Endpoint {
		url: format!("http://{host}:{port}"),
	})
}

// ============================================================================
// to_value / to_factory
// ============================================================================

#[test]
fn to_value_supports_arbitrary_types() {
	let container = Container::new();
	container
		.bind("string", to_value("str".to_string()))
		.bind("number", to_value(42u32))
		.bind("flag", to_value(true))
		.bind("list", to_value(vec![1, 2, 3]));

	assert_eq!(*container.get::<String>("string").unwrap(), "str");
	assert_eq!(*container.get::<u32>("number").unwrap(), 42);
	assert!(*container.get::<bool>("flag").unwrap());
	assert_eq!(*container.get::<Vec<i32>>("list").unwrap(), vec![1, 2, 3]);
}

#[test]
fn to_factory_can_resolve_other_keys() {
	let container = Container::new();
	container.bind("base", to_value(40u32));
	container.bind(
		"derived",
		to_factory(|resolve| {
			let base = resolve.resolve::<u32>("base")?;
			Ok(*base + 2)
		}),
	);

	assert_eq!(*container.get::<u32>("derived").unwrap(), 42);
}

#[test]
fn factory_errors_propagate_to_the_caller() {
	let container = Container::new();
	container.bind(
		"failing",
		to_factory::<u32, _>(|_| {
			Err(DiError::InvalidDependencySpecification {
				reason: "factory rejected its input".to_string(),
			})
		}),
	);

	assert!(container.get::<u32>("failing").is_err());
}

// ============================================================================
// to_function with positional dependencies
// ============================================================================

#[test]
fn to_function_resolves_positional_dependencies_in_order() {
	let container = Container::new();
	container.bind("host", to_value("localhost".to_string()));
	container.bind("port", to_value(8080u16));
	container.bind(
		"endpoint",
		to_function(
			build_endpoint,
			DependencySpec::list(["host", "port"]),
			Lifetime::Singleton,
		)
		.unwrap(),
	);

	let endpoint = container.get::<Endpoint>("endpoint").unwrap();
	assert_eq!(endpoint.url, "http://localhost:8080");
}

#[test]
fn to_function_without_dependencies() {
	let container = Container::new();
	container.bind(
		"constant",
		to_function(
			|deps| {
				assert!(deps.is_empty());
				Ok(7u32)
			},
			DependencySpec::list(Vec::<&str>::new()),
			Lifetime::Singleton,
		)
		.unwrap(),
	);

	assert_eq!(*container.get::<u32>("constant").unwrap(), 7);
}

#[test]
fn missing_positional_dependency_surfaces_binding_not_found() {
	let container = Container::new();
	container.bind(
		"endpoint",
		to_function(
			build_endpoint,
			DependencySpec::list(["host", "port"]),
			Lifetime::Singleton,
		)
		.unwrap(),
	);

	match container.get::<Endpoint>("endpoint").unwrap_err() {
		DiError::BindingNotFound { key } => assert_eq!(key.label(), "host"),
		other => panic!("expected BindingNotFound, got {other:?}"),
	}
}

#[test]
fn out_of_range_index_is_an_invalid_specification() {
	let container = Container::new();
	container.bind("host", to_value("localhost".to_string()));
	container.bind(
		"service",
		to_function(
			|deps| deps.get::<String>(5).map(|host| (*host).clone()),
			DependencySpec::list(["host"]),
			Lifetime::Singleton,
		)
		.unwrap(),
	);

	assert!(matches!(
		container.get::<String>("service"),
		Err(DiError::InvalidDependencySpecification { .. })
	));
}

// ============================================================================
// to_function with named dependencies
// ============================================================================

#[test]
fn to_function_resolves_named_dependencies() {
	let container = Container::new();
	container.bind("DB_HOST", to_value("db.internal".to_string()));
	container.bind("DB_PORT", to_value(5432u16));
	container.bind(
		"endpoint",
		to_function(
			|deps| {
				let host = deps.get_named::<String>("host")?;
				let port = deps.get_named::<u16>("port")?;
				Ok(Endpoint {
					url: format!("http://{host}:{port}"),
				})
			},
			DependencySpec::named([("host", "DB_HOST"), ("port", "DB_PORT")]),
			Lifetime::Singleton,
		)
		.unwrap(),
	);

	let endpoint = container.get::<Endpoint>("endpoint").unwrap();
	assert_eq!(endpoint.url, "http://db.internal:5432");
}

#[test]
fn duplicate_names_fail_at_declaration_time() {
	let result = to_function(
		|_| Ok(0u32),
		DependencySpec::named([("db", "DB"), ("db", "DB_REPLICA")]),
		Lifetime::Singleton,
	);

	match result.unwrap_err() {
		DiError::InvalidDependencySpecification { reason } => {
			assert!(reason.contains("duplicate dependency name"));
		}
		other => panic!("expected InvalidDependencySpecification, got {other:?}"),
	}
}

#[test]
fn empty_names_fail_at_declaration_time() {
	let result = to_function(
		|_| Ok(0u32),
		DependencySpec::named([("", "DB")]),
		Lifetime::Singleton,
	);

	assert!(matches!(
		result,
		Err(DiError::InvalidDependencySpecification { .. })
	));
}

#[test]
fn unknown_name_lookup_is_an_invalid_specification() {
	let container = Container::new();
	container.bind("DB_HOST", to_value("db.internal".to_string()));
	container.bind(
		"service",
		to_function(
			|deps| deps.get_named::<String>("nope").map(|v| (*v).clone()),
			DependencySpec::named([("host", "DB_HOST")]),
			Lifetime::Singleton,
		)
		.unwrap(),
	);

	assert!(matches!(
		container.get::<String>("service"),
		Err(DiError::InvalidDependencySpecification { .. })
	));
}

// ============================================================================
// Typed downcast failures
// ============================================================================

#[test]
fn requesting_the_wrong_type_fails_with_type_mismatch() {
	let container = Container::new();
	container.bind("answer", to_value(42u32));

	match container.get::<String>("answer").unwrap_err() {
		DiError::TypeMismatch { key, expected } => {
			assert_eq!(key.label(), "answer");
			assert!(expected.contains("String"));
		}
		other => panic!("expected TypeMismatch, got {other:?}"),
	}
}

#[test]
fn dependency_downcast_to_the_wrong_type_fails_with_type_mismatch() {
	let container = Container::new();
	container.bind("port", to_value(5432u16));
	container.bind(
		"service",
		to_function(
			|deps| deps.get::<String>(0).map(|v| (*v).clone()),
			DependencySpec::list(["port"]),
			Lifetime::Singleton,
		)
		.unwrap(),
	);

	match container.get::<String>("service").unwrap_err() {
		DiError::TypeMismatch { key, .. } => assert_eq!(key.label(), "port"),
		other => panic!("expected TypeMismatch, got {other:?}"),
	}
}
