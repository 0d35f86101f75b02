//! Capability merge tests.

use serde_json::{Value, json};
use sqlkit_protocol::ClientCapabilities;
use sqlkit_protocol::capabilities::ensure;

#[test]
fn ensure_creates_missing_namespace() {
    let mut caps = ClientCapabilities::default();
    ensure(caps.ensure("credentials"), "credentials")
        .insert("dynamicRegistration".to_owned(), Value::Bool(true));

    let value = serde_json::to_value(&caps).unwrap();
    assert_eq!(value["credentials"]["credentials"]["dynamicRegistration"], true);
}

#[test]
fn ensure_preserves_sibling_flags() {
    let mut caps = ClientCapabilities::default();
    caps.ensure("firewall")
        .insert("existingFlag".to_owned(), Value::Bool(true));

    // A second feature claiming the same namespace must merge, not clear.
    ensure(caps.ensure("firewall"), "firewall")
        .insert("dynamicRegistration".to_owned(), Value::Bool(true));

    let value = serde_json::to_value(&caps).unwrap();
    assert_eq!(value["firewall"]["existingFlag"], true);
    assert_eq!(value["firewall"]["firewall"]["dynamicRegistration"], true);
}

#[test]
fn ensure_is_idempotent() {
    let mut caps = ClientCapabilities::default();
    ensure(caps.ensure("credentials"), "credentials")
        .insert("dynamicRegistration".to_owned(), Value::Bool(true));
    ensure(caps.ensure("credentials"), "credentials");

    let value = serde_json::to_value(&caps).unwrap();
    assert_eq!(value["credentials"]["credentials"]["dynamicRegistration"], true);
}

#[test]
fn ensure_replaces_non_object_values() {
    let mut caps = ClientCapabilities(
        json!({ "credentials": "bogus" })
            .as_object()
            .unwrap()
            .clone(),
    );
    caps.ensure("credentials")
        .insert("dynamicRegistration".to_owned(), Value::Bool(true));

    let value = serde_json::to_value(&caps).unwrap();
    assert_eq!(value["credentials"]["dynamicRegistration"], true);
}

#[test]
fn capabilities_serialize_transparently() {
    let mut caps = ClientCapabilities::default();
    caps.ensure("credentials");
    let value = serde_json::to_value(&caps).unwrap();
    assert_eq!(value, json!({ "credentials": {} }));
}
