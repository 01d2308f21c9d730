//! Integration tests for descriptor loading and stage-scoped resolution.

use stackwire_common::error::{ConfigError, ResolutionError, StackwireError};
use stackwire_common::types::Stage;
use stackwire_descriptor::executor::{Executor, PlanExecutor, ProvisionState};
use stackwire_descriptor::{Descriptor, Secrets, load_descriptor, resolve};

const PIXEL_COLLECTOR: &str = include_str!("fixtures/pixel_collector.stk");

fn pixel_collector() -> Descriptor {
    load_descriptor(PIXEL_COLLECTOR).expect("fixture should load")
}

fn stage(name: &str) -> Stage {
    Stage::new(name).expect("valid stage")
}

fn secrets() -> Secrets {
    [
        ("LOG_LEVEL", "info"),
        ("DATABASE_URL", "postgres://db.internal/pixels"),
        ("GOOGLE_CLIENT_ID", "client-id"),
        ("GOOGLE_CLIENT_SECRET", "client-secret"),
        ("JWT_SECRET", "jwt"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn fixture_resolves_in_dependency_order() {
    let resolution = resolve(&pixel_collector(), &stage("production"), &secrets())
        .expect("should resolve");
    assert_eq!(
        resolution.order(),
        vec!["assets", "auth_table", "api", "router"]
    );
}

#[test]
fn manifest_keys_match_declared_outputs() {
    let descriptor = pixel_collector();
    let resolution =
        resolve(&descriptor, &stage("production"), &secrets()).expect("should resolve");

    let mut declared: Vec<&str> = descriptor.outputs.iter().map(|o| o.name.as_str()).collect();
    declared.sort_unstable();
    assert_eq!(resolution.outputs.keys().collect::<Vec<_>>(), declared);
    assert!(resolution.outputs.iter().all(|(_, value)| !value.is_empty()));
    assert_eq!(
        resolution.outputs.get("url"),
        Some("https://api.pixel-collector.judethings.com")
    );
}

#[test]
fn function_environment_is_fully_assembled() {
    let resolution = resolve(&pixel_collector(), &stage("production"), &secrets())
        .expect("should resolve");
    let bucket = resolution.resource("assets").expect("bucket");
    let api = resolution.resource("api").expect("api");

    let env = |key: &str| api.environment.get(key).map(String::as_str);
    assert_eq!(env("BUCKET_NAME"), Some(bucket.identity.as_str()));
    assert_eq!(
        env("AUTH_TABLE_NAME"),
        Some("pixel-collector-api-production-auth-table")
    );
    assert_eq!(env("STAGE"), Some("production"));
    assert_eq!(env("LOG_LEVEL"), Some("info"));
    assert_eq!(env("JWT_SECRET"), Some("jwt"));
    assert_eq!(api.environment.len(), 8);
    assert_eq!(api.links, vec!["assets", "auth_table"]);
}

#[test]
fn missing_secrets_propagate_as_empty_values() {
    let resolution =
        resolve(&pixel_collector(), &stage("dev"), &Secrets::new()).expect("should resolve");
    let api = resolution.resource("api").expect("api");
    assert_eq!(api.environment.len(), 8);
    assert_eq!(api.environment.get("JWT_SECRET").map(String::as_str), Some(""));
    assert_eq!(api.environment.get("LOG_LEVEL").map(String::as_str), Some(""));
}

#[test]
fn resolution_is_deterministic() {
    let descriptor = pixel_collector();
    let first = resolve(&descriptor, &stage("dev"), &secrets()).expect("first");
    let second = resolve(&descriptor, &stage("dev"), &secrets()).expect("second");
    assert_eq!(first, second);
}

#[test]
fn stages_change_identities_but_not_manifest_shape() {
    let descriptor = pixel_collector();
    let dev = resolve(&descriptor, &stage("dev"), &secrets()).expect("dev");
    let prod = resolve(&descriptor, &stage("prod"), &secrets()).expect("prod");

    for (a, b) in dev.resources.iter().zip(&prod.resources) {
        assert_eq!(a.name, b.name);
        assert_ne!(a.identity, b.identity, "{} should be stage-scoped", a.name);
    }
    assert_eq!(
        dev.outputs.keys().collect::<Vec<_>>(),
        prod.outputs.keys().collect::<Vec<_>>()
    );
    assert_ne!(dev.outputs.get("bucket"), prod.outputs.get("bucket"));
}

#[test]
fn minimal_example_binds_bucket_name() {
    let descriptor = load_descriptor(
        r#"APP demo {}
RESOURCE bucket BUCKET {}
RESOURCE table TABLE { fields = { pk = "string" } hash_key = "pk" }
RESOURCE api FUNCTION { handler = "bootstrap" env = { BUCKET_NAME = bucket.name } }
OUTPUT bucket = bucket.name
OUTPUT api = api.name
"#,
    )
    .expect("should load");
    let resolution = resolve(&descriptor, &stage("dev"), &Secrets::new()).expect("should resolve");

    let bucket = resolution.resource("bucket").expect("bucket");
    let api = resolution.resource("api").expect("api");
    assert_eq!(api.environment.get("BUCKET_NAME"), Some(&bucket.identity));
    assert!(!resolution.outputs.get("bucket").unwrap_or_default().is_empty());
    assert!(!resolution.outputs.get("api").unwrap_or_default().is_empty());
}

#[test]
fn cyclic_descriptor_fails_without_partial_output() {
    let descriptor = load_descriptor(
        r#"APP demo {}
RESOURCE a FUNCTION { handler = "x" url = true env = { NEXT = b.url } }
RESOURCE b FUNCTION { handler = "x" url = true env = { NEXT = c.url } }
RESOURCE c FUNCTION { handler = "x" url = true env = { NEXT = a.url } }
RESOURCE d BUCKET {}
OUTPUT d = d.name
"#,
    )
    .expect("should load");
    let err = resolve(&descriptor, &stage("dev"), &Secrets::new()).unwrap_err();
    assert!(matches!(
        err,
        StackwireError::Resolution(ResolutionError::Cycle { ref resources })
            if resources == &["a", "b", "c"]
    ));
}

#[test]
fn dangling_reference_never_reaches_manifest() {
    let descriptor = load_descriptor(
        r#"APP demo {}
RESOURCE api FUNCTION { handler = "x" env = { QUEUE_URL = jobs.url } }
OUTPUT api = api.name
"#,
    )
    .expect("should load");
    let err = resolve(&descriptor, &stage("dev"), &Secrets::new()).unwrap_err();
    assert!(matches!(
        err,
        StackwireError::Resolution(ResolutionError::DanglingReference { .. })
    ));
}

#[test]
fn duplicate_names_are_malformed() {
    let err = load_descriptor("APP demo {}\nRESOURCE a BUCKET {}\nRESOURCE a BUCKET {}\n")
        .unwrap_err();
    assert!(matches!(
        err,
        StackwireError::Config(ConfigError::Malformed { .. })
    ));
}

#[test]
fn plan_executor_consumes_resolution() {
    let resolution = resolve(&pixel_collector(), &stage("dev"), &secrets()).expect("resolve");
    let statuses = PlanExecutor.provision(&resolution).expect("plan");
    assert_eq!(statuses.len(), 4);
    assert!(statuses.iter().all(|s| s.state == ProvisionState::Planned));
    // removal = "remove" keeps nothing.
    assert!(statuses.iter().all(|s| !s.retained_on_removal));
}

#[test]
fn secret_names_cover_shared_and_function_env() {
    let names: Vec<String> = pixel_collector().secret_names().into_iter().collect();
    assert_eq!(
        names,
        vec![
            "DATABASE_URL",
            "GOOGLE_CLIENT_ID",
            "GOOGLE_CLIENT_SECRET",
            "JWT_SECRET",
            "LOG_LEVEL",
        ]
    );
}

#[test]
fn resolution_serializes_to_json() {
    let resolution = resolve(&pixel_collector(), &stage("dev"), &secrets()).expect("resolve");
    let json = serde_json::to_value(&resolution).expect("serialize");
    assert_eq!(json["stage"], "dev");
    assert_eq!(json["resources"][0]["kind"], "BUCKET");
    assert_eq!(json["outputs"]["url"], "https://api.pixel-collector.judethings.com");
}
