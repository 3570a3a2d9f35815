// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures: a framework-bundle-style schema covering sessions,
//! locks, message buses, mailer transports, and scoped HTTP clients.

use cfgtree::prelude::*;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a tracing subscriber writing to the test output capture, so
/// processor phase logs show up in failing test output.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn s(value: &str) -> Scalar {
    Scalar::Str(value.to_string())
}

/// The messenger subsystem as a schema fragment, with its selector
/// invariants attached.
pub struct MessengerFragment;

impl SchemaFragment for MessengerFragment {
    fn key(&self) -> &str {
        "messenger"
    }

    fn schema(&self, _capabilities: &CapabilitySet) -> SchemaNode {
        SchemaNode::group("messenger")
            .child(SchemaNode::string("default_bus").default_to_sole_entry("buses"))
            .child(
                SchemaNode::map("buses").entry(
                    SchemaNode::group("bus")
                        .child(SchemaNode::list("middleware"))
                        .child(
                            SchemaNode::boolean("allow_no_handlers")
                                .default_value(RawValue::from(false)),
                        ),
                ),
            )
    }

    fn invariants(&self) -> Vec<Box<dyn InvariantCheck>> {
        vec![
            Box::new(RequiredSelector::new("messenger", "buses", "default_bus")),
            Box::new(ResolvedReference::new("messenger", "default_bus", "buses")),
        ]
    }
}

fn session_schema() -> SchemaNode {
    SchemaNode::group("session")
        .gated(true)
        .child(
            SchemaNode::string("name")
                .default_value(RawValue::from("SESSIONID"))
                .pattern(r"^[^.\[\]=+]*$"),
        )
        .child(SchemaNode::string("handler_id"))
        .child(
            SchemaNode::string("cookie_samesite")
                .default_value(RawValue::from("lax"))
                .allowed_values([s("lax"), s("strict"), s("none")]),
        )
        .child(SchemaNode::integer("metadata_update_threshold").default_value(RawValue::from(0)))
}

fn lock_schema() -> SchemaNode {
    SchemaNode::group("lock")
        .gated(false)
        .shorthand_to("resources")
        .child(
            SchemaNode::map("resources")
                .default_entry("default")
                .collect()
                .default_by_capability(
                    "lock.flock",
                    RawValue::map([("default", RawValue::list([RawValue::from("flock")]))]),
                    RawValue::empty_map(),
                ),
        )
}

fn mailer_schema() -> SchemaNode {
    SchemaNode::group("mailer")
        .child(SchemaNode::string("dsn"))
        .child(SchemaNode::map("transports"))
}

fn http_client_schema() -> SchemaNode {
    SchemaNode::group("http_client").child(
        SchemaNode::map("scoped_clients").entry(
            SchemaNode::group("client")
                .child(SchemaNode::string("base_uri"))
                .child(SchemaNode::string("auth_basic"))
                .child(SchemaNode::string("auth_bearer")),
        ),
    )
}

/// Builds the full bundle processor with the given capability set.
pub fn bundle_with_capabilities(capabilities: CapabilitySet) -> Processor {
    init_tracing();
    Processor::builder()
        .with_capabilities(capabilities)
        .with_node(session_schema())
        .with_node(lock_schema())
        .with_node(mailer_schema())
        .with_node(http_client_schema())
        .with_fragment(Box::new(MessengerFragment))
        .with_invariant(Box::new(MutualExclusion::new("mailer", "dsn", "transports")))
        .with_invariant(Box::new(MutualExclusion::new(
            "http_client.scoped_clients.*",
            "auth_basic",
            "auth_bearer",
        )))
        .build()
        .expect("bundle schema is valid")
}

/// Builds the full bundle processor with no capabilities.
pub fn bundle() -> Processor {
    bundle_with_capabilities(CapabilitySet::new())
}
