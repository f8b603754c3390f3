// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! End-to-end scenarios driven entirely through the public dispatcher/RPC
//! API, one per literal scenario in the testable-properties list: subtree
//! filtering into a `get-config` reply, a rejected `create` over existing
//! data, lock-denied under a dirty candidate, and trim with-defaults
//! omitting a default-valued leaf.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use netconf_core::{
    cfg::{
        config::{LogOutput, RuntimeConfig},
        CapabilityConfig, LoggingConfig, ServerConfig, WithDefaultsBasicMode,
    },
    datastore::{Backend, BackendError, BackendErrorCode, DatastoreSelector, FetchedItem, ItemStream, SessionOptions},
    dispatch::{rpcs, Dispatcher, StateProviders},
    error::ErrorTag,
    schema::{NodeKind, NodeSchema, SchemaContext, StaticSchema},
    state_providers::{NcNotificationsProvider, YangLibraryProvider},
    value::{LeafBaseType, TaggedValue},
    xml::{Element, QName},
};

#[derive(Default)]
struct MemoryBackend {
    running: Mutex<HashMap<String, (TaggedValue, bool)>>,
    candidate: Mutex<HashMap<String, (TaggedValue, bool)>>,
    startup: Mutex<HashMap<String, (TaggedValue, bool)>>,
}

impl MemoryBackend {
    fn seed(&self, path: &str, value: TaggedValue) {
        self.running.lock().expect("poisoned").insert(path.to_string(), (value, false));
    }

    fn store(&self, selector: DatastoreSelector) -> &Mutex<HashMap<String, (TaggedValue, bool)>> {
        match selector {
            DatastoreSelector::Running => &self.running,
            DatastoreSelector::Candidate => &self.candidate,
            DatastoreSelector::Startup => &self.startup,
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn connect(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_start(&self, _session_id: u32) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_stop(&self, _session_id: u32) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_switch_ds(&self, _session_id: u32, _target: DatastoreSelector) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_set_options(&self, _session_id: u32, _options: SessionOptions) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_refresh(&self, _session_id: u32) -> Result<(), BackendError> {
        Ok(())
    }

    async fn fetch_items(
        &self,
        _session_id: u32,
        selector: DatastoreSelector,
        paths: &[String],
    ) -> Result<ItemStream, BackendError> {
        let store = self.store(selector).lock().expect("poisoned");
        Ok(paths
            .iter()
            .flat_map(|requested| {
                store.iter().filter_map(move |(path, (value, is_default))| {
                    (path == requested || path.starts_with(requested.as_str())).then(|| FetchedItem {
                        path: path.clone(),
                        value: value.clone(),
                        is_default: *is_default,
                    })
                })
            })
            .collect())
    }

    async fn set_item(
        &self,
        _session_id: u32,
        selector: DatastoreSelector,
        path: &str,
        value: &TaggedValue,
    ) -> Result<(), BackendError> {
        self.store(selector).lock().expect("poisoned").insert(path.to_string(), (value.clone(), false));
        Ok(())
    }

    async fn delete_item(&self, _session_id: u32, selector: DatastoreSelector, path: &str) -> Result<(), BackendError> {
        let mut store = self.store(selector).lock().expect("poisoned");
        if path == "/" {
            store.clear();
        } else {
            // `delete_item(P)` removes P itself and everything under it, not
            // just an exact key match (§4.4 "replace — delete P first").
            store.retain(|p, _| p != path && !p.starts_with(path));
        }
        Ok(())
    }

    async fn validate(&self, _session_id: u32, _selector: DatastoreSelector) -> Result<(), BackendError> {
        Ok(())
    }

    async fn commit(&self, _session_id: u32) -> Result<(), BackendError> {
        let candidate = self.candidate.lock().expect("poisoned").clone();
        *self.running.lock().expect("poisoned") = candidate;
        Ok(())
    }

    async fn discard_changes(&self, _session_id: u32) -> Result<(), BackendError> {
        self.candidate.lock().expect("poisoned").clear();
        Ok(())
    }

    async fn check_exec_permission(&self, _session_id: u32, _operation: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

/// A [`SchemaContext`] wrapper that also rejects one named root on
/// `validate_data_tree`, for S5 ("schema engine returns a validation
/// error").
struct RejectingSchema {
    inner: StaticSchema,
    reject_root: &'static str,
}

impl SchemaContext for RejectingSchema {
    fn module_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.inner.module_for_namespace(namespace)
    }

    fn prefix_for_module(&self, module: &str) -> Option<&str> {
        self.inner.prefix_for_module(module)
    }

    fn namespace_for_module(&self, module: &str) -> Option<&str> {
        self.inner.namespace_for_module(module)
    }

    fn top_level_modules_for_name(&self, local_name: &str) -> Vec<&str> {
        self.inner.top_level_modules_for_name(local_name)
    }

    fn node(&self, path: &str) -> Option<&NodeSchema> {
        self.inner.node(path)
    }

    fn validate_data_tree(&self, root_path: &str) -> Result<(), String> {
        if root_path == self.reject_root {
            Err("mandatory leaf 'name' is missing".to_string())
        } else {
            Ok(())
        }
    }
}

fn interfaces_schema() -> StaticSchema {
    StaticSchema::new()
        .with_namespace("urn:ietf:params:xml:ns:yang:ietf-interfaces", "ietf-interfaces")
        .with_node(
            "/ietf-interfaces:interfaces",
            NodeSchema {
                module: "ietf-interfaces".into(),
                prefix: "ietf-interfaces".into(),
                is_config: true,
                kind: NodeKind::Container { presence: false },
            },
        )
        .with_node(
            "/ietf-interfaces:interfaces/interface",
            NodeSchema {
                module: "ietf-interfaces".into(),
                prefix: "ietf-interfaces".into(),
                is_config: true,
                kind: NodeKind::List { keys: vec!["name".into()] },
            },
        )
        .with_node(
            "/ietf-interfaces:interfaces/interface/name",
            NodeSchema {
                module: "ietf-interfaces".into(),
                prefix: "ietf-interfaces".into(),
                is_config: true,
                kind: NodeKind::Leaf { base_type: LeafBaseType::String, default: None },
            },
        )
        .with_node(
            "/ietf-interfaces:interfaces/interface/mtu",
            NodeSchema {
                module: "ietf-interfaces".into(),
                prefix: "ietf-interfaces".into(),
                is_config: true,
                kind: NodeKind::Leaf {
                    base_type: LeafBaseType::Uint32,
                    default: Some("1500".into()),
                },
            },
        )
}

fn test_config() -> ServerConfig {
    ServerConfig {
        capabilities: CapabilityConfig {
            candidate: true,
            startup: true,
            xpath: true,
            url: false,
            url_schemes: vec![],
            with_defaults: true,
            with_defaults_basic_mode: WithDefaultsBasicMode::ReportAll,
        },
        logging: LoggingConfig {
            level: "info".into(),
            output: LogOutput::Stdout,
            is_show_line: false,
            is_show_module_path: false,
            is_show_target: true,
            file: None,
        },
        runtime: RuntimeConfig {
            max_sessions: 16,
            backend_io_timeout: Duration::from_secs(5),
        },
    }
}

fn dispatcher(schema: impl SchemaContext + 'static, backend: MemoryBackend) -> Dispatcher {
    let state = StateProviders {
        yang_library: YangLibraryProvider::new("1", vec![]),
        notifications: NcNotificationsProvider::default(),
    };
    Dispatcher::new(Arc::new(backend), Arc::new(schema), test_config(), state)
}

fn source_elem(name: &str) -> Element {
    Element::new(QName::unqualified("source")).with_child(Element::new(QName::unqualified(name)))
}

fn target_elem(name: &str) -> Element {
    Element::new(QName::unqualified("target")).with_child(Element::new(QName::unqualified(name)))
}

/// S1: `get-config` with a subtree filter over `ietf-interfaces:interfaces`
/// returns every interface leaf the back end has under that root.
#[tokio::test]
async fn s1_get_config_with_subtree_filter_returns_matched_interfaces() {
    let backend = MemoryBackend::default();
    backend.seed("/ietf-interfaces:interfaces/interface[ietf-interfaces:name='eth0']/mtu", TaggedValue::Uint32(9000));
    let dispatcher = dispatcher(interfaces_schema(), backend);
    let session = dispatcher.start_session().await.expect("session starts");

    let filter = Element::new(QName::unqualified("filter")).with_attr(QName::unqualified("type"), "subtree").with_child(
        Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "interfaces")),
    );
    let source = source_elem("running");

    let reply = rpcs::get_config(&dispatcher, &session, &source, Some(&filter), None)
        .await
        .expect("get-config succeeds");

    assert_eq!(reply.len(), 1);
    assert_eq!(reply[0].name.local, "interfaces");
}

/// S2: `copy-config` with an inline `<config>` source into `running` applies
/// the config as a replace edit, writing the list entry's key leaf before
/// its other children.
#[tokio::test]
async fn s2_copy_config_inline_source_replaces_running() {
    let backend = MemoryBackend::default();
    backend.seed(
        "/ietf-interfaces:interfaces/interface[ietf-interfaces:name='stale0']/mtu",
        TaggedValue::Uint32(1280),
    );
    let dispatcher = dispatcher(interfaces_schema(), backend);
    let session = dispatcher.start_session().await.expect("session starts");

    let target = target_elem("running");
    let source = Element::new(QName::unqualified("source")).with_child(
        Element::new(QName::unqualified("config")).with_child(
            Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "interfaces")).with_child(
                Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "interface"))
                    .with_child(
                        Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "name"))
                            .with_text("iface1/1"),
                    )
                    .with_child(
                        Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "mtu"))
                            .with_text("9000"),
                    ),
            ),
        ),
    );

    rpcs::copy_config(&dispatcher, &session, &target, &source).await.expect("copy-config succeeds");

    let backend = dispatcher.backend();
    let running = backend
        .fetch_items(
            session.id,
            DatastoreSelector::Running,
            &["/ietf-interfaces:interfaces".to_string()],
        )
        .await
        .expect("fetch succeeds");
    assert!(
        running
            .iter()
            .any(|item| item.path.ends_with("/mtu") && item.value == TaggedValue::Uint32(9000)),
        "the mtu leaf must have been written, got: {running:?}"
    );
    assert!(
        !running.iter().any(|item| item.path.contains("stale0")),
        "replace must delete the stale pre-existing interface, got: {running:?}"
    );
    assert!(
        running.iter().any(|item| {
            item.path == "/ietf-interfaces:interfaces/interface[ietf-interfaces:name='iface1/1']"
                && item.value == TaggedValue::ListEntry
        }),
        "a set_item marker must have been recorded for the list entry itself, got: {running:?}"
    );
}

/// S3: `edit-config create` over an already-existing item is rejected with
/// `data-exists` and never reaches a `set_item` call.
#[tokio::test]
async fn s3_edit_config_create_on_existing_item_is_rejected() {
    let backend = MemoryBackend::default();
    backend.seed("/ietf-interfaces:interfaces/interface[ietf-interfaces:name='eth0']/name", TaggedValue::String("eth0".into()));
    let dispatcher = dispatcher(interfaces_schema(), backend);
    let session = dispatcher.start_session().await.expect("session starts");

    let target = target_elem("running");
    let config = Element::new(QName::unqualified("config")).with_child(
        Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "interfaces")).with_child(
            Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "interface"))
                .with_child(
                    Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "name"))
                        .with_attr(
                            QName::new(Some("urn:ietf:params:xml:ns:netconf:base:1.0"), "operation"),
                            "create",
                        )
                        .with_text("eth0"),
                ),
        ),
    );

    let err = rpcs::edit_config(&dispatcher, &session, &target, &config, None, None, None)
        .await
        .expect_err("create over existing data is rejected");
    assert_eq!(err.tag, ErrorTag::DataExists);
}

/// S4: a second session cannot `<lock><candidate/></lock>` while another
/// session has a pending, uncommitted candidate edit.
#[tokio::test]
async fn s4_lock_candidate_fails_while_another_session_is_dirty() {
    let dispatcher = dispatcher(interfaces_schema(), MemoryBackend::default());
    let session_a = dispatcher.start_session().await.expect("session a starts");
    let session_b = dispatcher.start_session().await.expect("session b starts");

    let target = target_elem("candidate");
    let config = Element::new(QName::unqualified("config")).with_child(
        Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "interfaces")).with_child(
            Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "interface")).with_child(
                Element::new(QName::new(Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"), "name")).with_text("eth1"),
            ),
        ),
    );
    rpcs::edit_config(&dispatcher, &session_a, &target, &config, None, None, None)
        .await
        .expect("session a's candidate edit succeeds");

    let err = rpcs::lock(&dispatcher, &session_b, &target).await.expect_err("candidate differs from running");
    assert_eq!(err.tag, ErrorTag::LockDenied);
}

/// S5: validating an inline `<config>` against a schema that rejects it
/// surfaces `operation-failed` carrying the schema's own message.
#[tokio::test]
async fn s5_validate_inline_config_surfaces_schema_rejection() {
    let schema = RejectingSchema {
        inner: interfaces_schema(),
        reject_root: "/ietf-interfaces:interfaces",
    };
    let dispatcher = dispatcher(schema, MemoryBackend::default());
    let session = dispatcher.start_session().await.expect("session starts");

    let source = Element::new(QName::unqualified("source")).with_child(
        Element::new(QName::unqualified("config")).with_child(Element::new(QName::new(
            Some("urn:ietf:params:xml:ns:yang:ietf-interfaces"),
            "interfaces",
        ))),
    );

    let err = rpcs::validate(&dispatcher, &session, &source).await.expect_err("schema rejects this config");
    assert_eq!(err.tag, ErrorTag::OperationFailed);
    assert!(err.message.contains("mandatory leaf"));
}

/// S6: `with-defaults=trim` omits a leaf whose value equals its schema
/// default.
#[tokio::test]
async fn s6_get_with_trim_omits_default_valued_leaf() {
    let backend = MemoryBackend::default();
    backend.seed(
        "/ietf-interfaces:interfaces/interface[ietf-interfaces:name='eth0']/mtu",
        TaggedValue::Uint32(1500),
    );
    let dispatcher = dispatcher(interfaces_schema(), backend);
    let session = dispatcher.start_session().await.expect("session starts");

    let with_defaults = Element::new(QName::unqualified("with-defaults")).with_text("trim");
    let reply = rpcs::get(&dispatcher, &session, None, Some(&with_defaults)).await.expect("get succeeds");

    let xml = netconf_core::xml::write(&reply[0]);
    assert!(!xml.contains("<mtu>"), "trim must omit the default-valued mtu leaf, got: {xml}");
}
