// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for end-to-end configuration processing.
//!
//! These tests run the full pipeline (normalize, merge, validate, default)
//! against a framework-bundle-style schema covering sessions, locks, message
//! buses, mailer transports, and scoped HTTP clients.

mod common;

use cfgtree::prelude::*;
use common::{bundle, bundle_with_capabilities};
use pretty_assertions::assert_eq;

fn session(doc: &RawValue) -> &RawValue {
    doc.get("session").expect("session is always present")
}

#[test]
fn test_no_layers_yields_fully_defaulted_document() {
    let doc = bundle().process(&[]).unwrap();

    let session = session(&doc);
    assert_eq!(session.get("enabled"), Some(&RawValue::from(true)));
    assert_eq!(session.get("name"), Some(&RawValue::from("SESSIONID")));
    assert_eq!(session.get("handler_id"), Some(&RawValue::null()));
    assert_eq!(session.get("cookie_samesite"), Some(&RawValue::from("lax")));
    assert_eq!(
        session.get("metadata_update_threshold"),
        Some(&RawValue::from(0_i64))
    );

    // Disabled-by-default sections materialize as just the flag.
    assert_eq!(
        doc.get("lock"),
        Some(&RawValue::map([("enabled", RawValue::from(false))]))
    );

    let messenger = doc.get("messenger").unwrap();
    assert_eq!(messenger.get("default_bus"), Some(&RawValue::null()));
    assert_eq!(messenger.get("buses"), Some(&RawValue::empty_map()));
}

#[test]
fn test_lock_scalar_shorthand_expands_and_enables() {
    let layer = RawValue::map([("lock", RawValue::from("flock"))]);
    let doc = bundle().process(&[layer]).unwrap();

    let lock = doc.get("lock").unwrap();
    assert_eq!(lock.get("enabled"), Some(&RawValue::from(true)));
    assert_eq!(
        lock.get("resources"),
        Some(&RawValue::map([(
            "default",
            RawValue::list([RawValue::from("flock")])
        )]))
    );
}

#[test]
fn test_lock_list_shorthand_becomes_default_resource_list() {
    let layer = RawValue::map([(
        "lock",
        RawValue::list([RawValue::from("flock"), RawValue::from("semaphore")]),
    )]);
    let doc = bundle().process(&[layer]).unwrap();

    assert_eq!(
        doc.get("lock").unwrap().get("resources"),
        Some(&RawValue::map([(
            "default",
            RawValue::list([RawValue::from("flock"), RawValue::from("semaphore")])
        )]))
    );
}

#[test]
fn test_repeated_named_resources_accumulate() {
    let layer = RawValue::map([(
        "lock",
        RawValue::list([
            RawValue::map([
                ("name", RawValue::from("foo")),
                ("value", RawValue::from("flock")),
            ]),
            RawValue::map([
                ("name", RawValue::from("foo")),
                ("value", RawValue::from("semaphore")),
            ]),
        ]),
    )]);
    let doc = bundle().process(&[layer]).unwrap();

    assert_eq!(
        doc.get("lock").unwrap().get("resources"),
        Some(&RawValue::map([(
            "foo",
            RawValue::list([RawValue::from("flock"), RawValue::from("semaphore")])
        )]))
    );
}

#[test]
fn test_inline_enabled_flag_disables_section() {
    let layer = RawValue::map([(
        "lock",
        RawValue::list([
            RawValue::map([("enabled", RawValue::from(false))]),
            RawValue::from("flock"),
        ]),
    )]);
    let doc = bundle().process(&[layer]).unwrap();

    let lock = doc.get("lock").unwrap();
    assert_eq!(lock.get("enabled"), Some(&RawValue::from(false)));
    // The user-supplied resources survive even though the section is off.
    assert_eq!(
        lock.get("resources"),
        Some(&RawValue::map([(
            "default",
            RawValue::list([RawValue::from("flock")])
        )]))
    );
}

#[test]
fn test_capability_gated_lock_default() {
    let layer = RawValue::map([("lock", RawValue::from(true))]);

    let with_flock = bundle_with_capabilities(CapabilitySet::new().with("lock.flock"))
        .process(&[layer.clone()])
        .unwrap();
    assert_eq!(
        with_flock.get("lock").unwrap().get("resources"),
        Some(&RawValue::map([(
            "default",
            RawValue::list([RawValue::from("flock")])
        )]))
    );

    let without = bundle().process(&[layer]).unwrap();
    assert_eq!(
        without.get("lock").unwrap().get("resources"),
        Some(&RawValue::empty_map())
    );
}

#[test]
fn test_mailer_dsn_and_transports_are_exclusive() {
    let layer = RawValue::map([(
        "mailer",
        RawValue::map([
            ("dsn", RawValue::from("smtp://localhost")),
            (
                "transports",
                RawValue::map([("main", RawValue::from("smtp://remote"))]),
            ),
        ]),
    )]);
    let err = bundle().process(&[layer]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("'dsn'"), "{}", msg);
    assert!(msg.contains("'transports'"), "{}", msg);
    assert!(msg.contains("'mailer'"), "{}", msg);
}

#[test]
fn test_scoped_client_exclusion_reports_nested_scope() {
    let layer = RawValue::map([(
        "http_client",
        RawValue::map([(
            "scoped_clients",
            RawValue::map([(
                "github",
                RawValue::map([
                    ("auth_basic", RawValue::from("user:pass")),
                    ("auth_bearer", RawValue::from("token")),
                ]),
            )]),
        )]),
    )]);
    let err = bundle().process(&[layer]).unwrap_err();
    assert!(
        err.to_string().contains("'http_client.scoped_clients.github'"),
        "{}",
        err
    );
}

#[test]
fn test_two_buses_require_a_default_bus() {
    let layer = RawValue::map([(
        "messenger",
        RawValue::map([(
            "buses",
            RawValue::map([
                ("commands", RawValue::empty_map()),
                ("events", RawValue::empty_map()),
            ]),
        )]),
    )]);
    let err = bundle().process(&[layer]).unwrap_err();
    assert!(matches!(err, ValidationError::MissingSelector { .. }));
}

#[test]
fn test_single_bus_defaults_the_selector() {
    let layer = RawValue::map([(
        "messenger",
        RawValue::map([(
            "buses",
            RawValue::map([("commands", RawValue::empty_map())]),
        )]),
    )]);
    let doc = bundle().process(&[layer]).unwrap();

    let messenger = doc.get("messenger").unwrap();
    assert_eq!(messenger.get("default_bus"), Some(&RawValue::from("commands")));
    // Bus entries are fully defaulted through their prototype.
    let commands = messenger.get("buses").unwrap().get("commands").unwrap();
    assert_eq!(commands.get("allow_no_handlers"), Some(&RawValue::from(false)));
    assert_eq!(commands.get("middleware"), Some(&RawValue::list([])));
}

#[test]
fn test_unresolved_default_bus_lists_available_sorted() {
    let layer = RawValue::map([(
        "messenger",
        RawValue::map([
            ("default_bus", RawValue::from("foo")),
            (
                "buses",
                RawValue::map([
                    ("baz", RawValue::empty_map()),
                    ("bar", RawValue::empty_map()),
                ]),
            ),
        ]),
    )]);
    let err = bundle().process(&[layer]).unwrap_err();
    assert!(err.to_string().contains("\"bar\", \"baz\""), "{}", err);
}

#[test]
fn test_session_name_rejects_cookie_unsafe_characters() {
    for bad in ["a.b", "a[b", "a]b", "a=b", "a+b"] {
        let layer = RawValue::map([(
            "session",
            RawValue::map([("name", RawValue::from(bad))]),
        )]);
        let err = bundle().process(&[layer]).unwrap_err();
        match err {
            ValidationError::Pattern { field, value } => {
                assert_eq!(field.as_str(), "session.name");
                assert_eq!(value, bad);
            }
            other => panic!("expected Pattern error for {:?}, got {}", bad, other),
        }
    }
}

#[test]
fn test_session_name_accepts_safe_characters() {
    let layer = RawValue::map([(
        "session",
        RawValue::map([("name", RawValue::from("my_session-1"))]),
    )]);
    let doc = bundle().process(&[layer]).unwrap();
    assert_eq!(session(&doc).get("name"), Some(&RawValue::from("my_session-1")));
}

#[test]
fn test_cookie_samesite_restricted_to_allowed_values() {
    let layer = RawValue::map([(
        "session",
        RawValue::map([("cookie_samesite", RawValue::from("sideways"))]),
    )]);
    let err = bundle().process(&[layer]).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
    assert!(err.to_string().contains("\"lax\", \"none\", \"strict\""));
}

#[test]
fn test_unknown_keys_are_rejected_with_full_path() {
    let layer = RawValue::map([(
        "session",
        RawValue::map([("cokie_name", RawValue::from("oops"))]),
    )]);
    let err = bundle().process(&[layer]).unwrap_err();
    assert_eq!(err.to_string(), "unrecognized key 'session.cokie_name'");
}

#[test]
fn test_wrong_shape_is_rejected_with_path() {
    let layer = RawValue::map([(
        "session",
        RawValue::map([("name", RawValue::list([RawValue::from("x")]))]),
    )]);
    let err = bundle().process(&[layer]).unwrap_err();
    match err {
        ValidationError::Shape { path, .. } => assert_eq!(path.as_str(), "session.name"),
        other => panic!("expected Shape error, got {}", other),
    }
}

#[test]
fn test_later_layer_overrides_earlier_scalar() {
    let base = RawValue::map([(
        "session",
        RawValue::map([
            ("name", RawValue::from("BASE")),
            ("handler_id", RawValue::from("files")),
        ]),
    )]);
    let overlay = RawValue::map([(
        "session",
        RawValue::map([("name", RawValue::from("OVERLAY"))]),
    )]);
    let doc = bundle().process(&[base, overlay]).unwrap();

    assert_eq!(session(&doc).get("name"), Some(&RawValue::from("OVERLAY")));
    // Keys absent from the later layer keep the earlier value.
    assert_eq!(session(&doc).get("handler_id"), Some(&RawValue::from("files")));
}

#[test]
fn test_processing_is_idempotent() {
    let layers = vec![
        RawValue::map([
            ("lock", RawValue::from("flock")),
            (
                "session",
                RawValue::map([("name", RawValue::from("APPSESS"))]),
            ),
        ]),
        RawValue::map([(
            "messenger",
            RawValue::map([(
                "buses",
                RawValue::map([("commands", RawValue::empty_map())]),
            )]),
        )]),
    ];
    let processor = bundle();
    let once = processor.process(&layers).unwrap();
    let twice = processor.process(&[once.clone()]).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_idempotent_with_dsn_set() {
    let layers = vec![RawValue::map([(
        "mailer",
        RawValue::map([("dsn", RawValue::from("smtp://localhost"))]),
    )])];
    let processor = bundle();
    let once = processor.process(&layers).unwrap();
    let twice = processor.process(&[once.clone()]).unwrap();
    assert_eq!(once, twice);
}

#[test]
#[cfg(feature = "yaml")]
fn test_yaml_layers_end_to_end() {
    let parser = YamlLayerParser::new();
    let base = parser
        .parse("session:\n  name: BASE\nlock: [flock, semaphore]\n")
        .unwrap();
    let overlay = parser.parse("session:\n  name: OVERLAY\n").unwrap();

    let doc = bundle().process(&[base, overlay]).unwrap();
    assert_eq!(session(&doc).get("name"), Some(&RawValue::from("OVERLAY")));
    assert_eq!(
        doc.get("lock").unwrap().get("resources"),
        Some(&RawValue::map([(
            "default",
            RawValue::list([RawValue::from("flock"), RawValue::from("semaphore")])
        )]))
    );
}
