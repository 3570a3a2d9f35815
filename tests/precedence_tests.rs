// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for layer precedence and merge policies.

mod common;

use cfgtree::prelude::*;
use pretty_assertions::assert_eq;

fn simple_processor() -> Processor {
    Processor::builder()
        .with_node(
            SchemaNode::group("app")
                .child(SchemaNode::string("name"))
                .child(SchemaNode::list("tags"))
                .child(
                    SchemaNode::map("options").merge_with(MergePolicy::MergeMap).entry(
                        SchemaNode::group("option")
                            .child(SchemaNode::string("value"))
                            .child(SchemaNode::integer("weight")),
                    ),
                ),
        )
        .build()
        .expect("schema is valid")
}

#[test]
fn test_later_layer_replaces_scalar() {
    let base = RawValue::map([("app", RawValue::map([("name", RawValue::from("base"))]))]);
    let overlay = RawValue::map([("app", RawValue::map([("name", RawValue::from("overlay"))]))]);

    let doc = simple_processor().process(&[base, overlay]).unwrap();
    assert_eq!(
        doc.get("app").unwrap().get("name"),
        Some(&RawValue::from("overlay"))
    );
}

#[test]
fn test_layer_order_matters() {
    let a = RawValue::map([("app", RawValue::map([("name", RawValue::from("a"))]))]);
    let b = RawValue::map([("app", RawValue::map([("name", RawValue::from("b"))]))]);

    let processor = simple_processor();
    let ab = processor.process(&[a.clone(), b.clone()]).unwrap();
    let ba = processor.process(&[b, a]).unwrap();

    assert_eq!(ab.get("app").unwrap().get("name"), Some(&RawValue::from("b")));
    assert_eq!(ba.get("app").unwrap().get("name"), Some(&RawValue::from("a")));
}

#[test]
fn test_null_overlay_keeps_base_value() {
    let base = RawValue::map([("app", RawValue::map([("name", RawValue::from("base"))]))]);
    let overlay = RawValue::map([("app", RawValue::map([("name", RawValue::null())]))]);

    let doc = simple_processor().process(&[base, overlay]).unwrap();
    assert_eq!(
        doc.get("app").unwrap().get("name"),
        Some(&RawValue::from("base"))
    );
}

#[test]
fn test_empty_layer_changes_nothing() {
    let base = RawValue::map([("app", RawValue::map([("name", RawValue::from("base"))]))]);

    let processor = simple_processor();
    let alone = processor.process(&[base.clone()]).unwrap();
    let with_empty = processor.process(&[base, RawValue::empty_map()]).unwrap();
    assert_eq!(alone, with_empty);
}

#[test]
fn test_lists_replace_wholesale() {
    let base = RawValue::map([(
        "app",
        RawValue::map([("tags", RawValue::list([RawValue::from("a"), RawValue::from("b")]))]),
    )]);
    let overlay = RawValue::map([(
        "app",
        RawValue::map([("tags", RawValue::list([RawValue::from("c")]))]),
    )]);

    let doc = simple_processor().process(&[base, overlay]).unwrap();
    assert_eq!(
        doc.get("app").unwrap().get("tags"),
        Some(&RawValue::list([RawValue::from("c")]))
    );
}

#[test]
fn test_merge_map_policy_merges_entries_deeply() {
    let base = RawValue::map([(
        "app",
        RawValue::map([(
            "options",
            RawValue::map([
                (
                    "alpha",
                    RawValue::map([
                        ("value", RawValue::from("one")),
                        ("weight", RawValue::from(1_i64)),
                    ]),
                ),
                ("beta", RawValue::map([("value", RawValue::from("two"))])),
            ]),
        )]),
    )]);
    let overlay = RawValue::map([(
        "app",
        RawValue::map([(
            "options",
            RawValue::map([(
                "alpha",
                RawValue::map([("value", RawValue::from("uno"))]),
            )]),
        )]),
    )]);

    let doc = simple_processor().process(&[base, overlay]).unwrap();
    let options = doc.get("app").unwrap().get("options").unwrap();

    // Overlapping entries merge field by field.
    let alpha = options.get("alpha").unwrap();
    assert_eq!(alpha.get("value"), Some(&RawValue::from("uno")));
    assert_eq!(alpha.get("weight"), Some(&RawValue::from(1_i64)));
    // Entries absent from the overlay survive.
    assert!(options.get("beta").is_some());
}

#[test]
fn test_append_unique_later_layer_wins_per_key() {
    let processor = Processor::builder()
        .with_node(
            SchemaNode::group("lock")
                .child(SchemaNode::map("resources").default_entry("default").collect()),
        )
        .build()
        .expect("schema is valid");

    let base = RawValue::map([(
        "lock",
        RawValue::map([(
            "resources",
            RawValue::map([
                ("db", RawValue::list([RawValue::from("flock")])),
                ("cache", RawValue::list([RawValue::from("semaphore")])),
            ]),
        )]),
    )]);
    let overlay = RawValue::map([(
        "lock",
        RawValue::map([(
            "resources",
            RawValue::map([("db", RawValue::list([RawValue::from("redis")]))]),
        )]),
    )]);

    let doc = processor.process(&[base, overlay]).unwrap();
    let resources = doc.get("lock").unwrap().get("resources").unwrap();

    // The later layer replaces the overlapping key outright.
    assert_eq!(
        resources.get("db"),
        Some(&RawValue::list([RawValue::from("redis")]))
    );
    // Keys only the earlier layer set are kept.
    assert_eq!(
        resources.get("cache"),
        Some(&RawValue::list([RawValue::from("semaphore")]))
    );
}

#[test]
fn test_shorthand_layers_merge_like_expanded_ones() {
    // A scalar shorthand and an expanded map for the same section must
    // merge identically to two expanded layers.
    let shorthand = RawValue::map([("lock", RawValue::from("flock"))]);
    let expanded = RawValue::map([(
        "lock",
        RawValue::map([(
            "resources",
            RawValue::map([("default", RawValue::list([RawValue::from("flock")]))]),
        )]),
    )]);
    let overlay = RawValue::map([(
        "lock",
        RawValue::map([(
            "resources",
            RawValue::map([("other", RawValue::list([RawValue::from("semaphore")]))]),
        )]),
    )]);

    let processor = common::bundle();
    let from_shorthand = processor.process(&[shorthand, overlay.clone()]).unwrap();
    let from_expanded = processor.process(&[expanded, overlay]).unwrap();
    assert_eq!(
        from_shorthand.get("lock").unwrap().get("resources"),
        from_expanded.get("lock").unwrap().get("resources")
    );
}
