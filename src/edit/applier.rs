// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<edit-config>` application against the backend (§4.4).
//!
//! Walks the parsed `<config>` subtree parent-before-children, and within a
//! list entry, key leaves before its other children (§9 ordering note), so
//! a backend that creates structure lazily on `set_item` never sees a child
//! path before its parent or a list entry before its keys.

use crate::{
    datastore::{Backend, BackendError, BackendErrorCode, DatastoreSelector},
    error::NetconfError,
    schema::{NodeKind, SchemaContext},
    value::{leaf_to_tagged, LeafBaseType, TaggedValue},
    xml::{Element, NodeClass},
};

const NETCONF_BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultOperation {
    Merge,
    Replace,
    None,
}

impl From<DefaultOperation> for Option<EditOperation> {
    fn from(d: DefaultOperation) -> Self {
        match d {
            DefaultOperation::Merge => Some(EditOperation::Merge),
            DefaultOperation::Replace => Some(EditOperation::Replace),
            DefaultOperation::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOption {
    TestThenSet,
    Set,
    TestOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOption {
    StopOnError,
    ContinueOnError,
    RollbackOnError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOperation {
    Merge,
    Replace,
    Create,
    Delete,
    Remove,
}

impl EditOperation {
    fn from_attr(value: &str) -> Option<Self> {
        match value {
            "merge" => Some(Self::Merge),
            "replace" => Some(Self::Replace),
            "create" => Some(Self::Create),
            "delete" => Some(Self::Delete),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

fn operation_of(elem: &Element) -> Option<EditOperation> {
    elem.attrs.iter().find_map(|(name, value)| {
        (name.local == "operation" && name.ns.as_deref() == Some(NETCONF_BASE_NS))
            .then(|| EditOperation::from_attr(value))
            .flatten()
    })
}

/// A schema-path segment is only prefixed with its module when that module
/// differs from the nearest ancestor's (the usual YANG instance-identifier
/// convention of prefixing only on a module change, §4.2). Returns the
/// segment and the module now in scope for this node's own children.
fn qualified_segment(elem: &Element, schema: &dyn SchemaContext, parent_module: Option<&str>) -> (String, Option<String>) {
    let module = elem.name.ns.as_deref().and_then(|ns| schema.module_for_namespace(ns));
    let segment = match module {
        Some(m) if Some(m) != parent_module => format!("{m}:{}", elem.name.local),
        _ => elem.name.local.clone(),
    };
    (segment, module.map(str::to_string))
}

struct PendingNode<'a> {
    elem: &'a Element,
    parent_path: String,
    parent_schema_path: String,
    parent_module: Option<String>,
    inherited_op: Option<EditOperation>,
}

/// Applies a parsed `<config>` subtree to `selector` through `backend`
/// (§4.4). `default_operation`/`test_option`/`error_option` mirror the
/// `<edit-config>` input parameters of the same names.
///
/// Returns the (possibly empty) list of errors accumulated under
/// `continue-on-error`, so a caller can build a reply carrying zero, one,
/// or many `<rpc-error>` elements instead of collapsing to the first one.
/// Under `stop-on-error`/`rollback-on-error` the first failure still
/// returns immediately as `Err`.
pub async fn apply_edit(
    backend: &dyn Backend,
    session_id: u32,
    selector: DatastoreSelector,
    config: &Element,
    default_operation: DefaultOperation,
    test_option: TestOption,
    error_option: ErrorOption,
    schema: &dyn SchemaContext,
) -> Result<Vec<NetconfError>, NetconfError> {
    let default_op: Option<EditOperation> = default_operation.into();
    let mut errors: Vec<NetconfError> = Vec::new();

    let mut stack: Vec<PendingNode> = config
        .child_elements()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|elem| PendingNode {
            elem,
            parent_path: String::new(),
            parent_schema_path: String::new(),
            parent_module: None,
            inherited_op: default_op,
        })
        .collect();

    while let Some(node) = stack.pop() {
        let op = operation_of(node.elem).or(node.inherited_op).unwrap_or(EditOperation::Merge);
        let (segment, module) = qualified_segment(node.elem, schema, node.parent_module.as_deref());
        let schema_path = format!("{}/{segment}", node.parent_schema_path);
        let keys = schema.is_list_with_keys(&schema_path).map(|k| k.to_vec());
        let path = format!(
            "{}/{segment}{}",
            node.parent_path,
            key_predicate(node.elem, module.as_deref().unwrap_or(""), keys.as_deref())
        );

        let result = run_op(backend, session_id, selector, node.elem, &path, &schema_path, op, test_option, schema).await;
        if let Err(e) = result {
            match error_option {
                ErrorOption::ContinueOnError => {
                    errors.push(e);
                    continue;
                },
                ErrorOption::StopOnError => return Err(e),
                ErrorOption::RollbackOnError => {
                    if selector == DatastoreSelector::Candidate {
                        let _ = backend.discard_changes(session_id).await;
                    }
                    return Err(e);
                },
            }
        }

        if matches!(op, EditOperation::Delete | EditOperation::Remove) {
            continue;
        }

        let mut children: Vec<&Element> = node.elem.child_elements().collect();
        if let Some(keys) = &keys {
            children.sort_by_key(|c| !keys.iter().any(|k| k == &c.name.local));
        }
        for child in children.into_iter().rev() {
            stack.push(PendingNode {
                elem: child,
                parent_path: path.clone(),
                parent_schema_path: schema_path.clone(),
                parent_module: module.clone(),
                inherited_op: default_op,
            });
        }
    }

    Ok(errors)
}

fn key_predicate(elem: &Element, module: &str, keys: Option<&[String]>) -> String {
    let Some(keys) = keys else { return String::new() };
    let mut predicate = String::new();
    for key in keys {
        if let Some(value) = elem
            .child_elements()
            .find(|c| c.name.local == *key)
            .and_then(|c| c.text_content())
        {
            predicate.push_str(&format!("[{module}:{key}='{value}']"));
        }
    }
    predicate
}

async fn run_op(
    backend: &dyn Backend,
    session_id: u32,
    selector: DatastoreSelector,
    elem: &Element,
    path: &str,
    schema_path: &str,
    op: EditOperation,
    test_option: TestOption,
    schema: &dyn SchemaContext,
) -> Result<(), NetconfError> {
    match op {
        EditOperation::Delete => {
            if test_option == TestOption::TestOnly {
                return exists(backend, session_id, selector, path).await.map(|_| ());
            }
            backend
                .delete_item(session_id, selector, path)
                .await
                .map_err(NetconfError::from)
        },
        EditOperation::Remove => {
            if test_option == TestOption::TestOnly {
                return Ok(());
            }
            match backend.delete_item(session_id, selector, path).await {
                Ok(()) => Ok(()),
                Err(BackendError {
                    code: BackendErrorCode::NotFound | BackendErrorCode::DataMissing,
                    ..
                }) => Ok(()),
                Err(e) => Err(NetconfError::from(e)),
            }
        },
        EditOperation::Create => {
            if test_option != TestOption::Set && exists(backend, session_id, selector, path).await? {
                return Err(NetconfError::data_exists(path));
            }
            if test_option == TestOption::TestOnly {
                return Ok(());
            }
            set_value(backend, session_id, selector, elem, path, schema_path, schema).await
        },
        EditOperation::Merge | EditOperation::Replace => {
            if test_option == TestOption::TestOnly {
                return validate_only(backend, session_id, selector, elem, schema_path, schema).await;
            }
            if op == EditOperation::Replace {
                // "replace — delete P first (delete_item(P) ignoring 'not
                // found'), then as for merge" (§4.4).
                match backend.delete_item(session_id, selector, path).await {
                    Ok(()) => {},
                    Err(BackendError {
                        code: BackendErrorCode::NotFound | BackendErrorCode::DataMissing,
                        ..
                    }) => {},
                    Err(e) => return Err(NetconfError::from(e)),
                }
            }
            set_value(backend, session_id, selector, elem, path, schema_path, schema).await
        },
    }
}

/// `test-only` validates without committing (§4.4): re-marshal the lexical
/// value against the schema (catches malformed leaves) and ask the backend
/// to validate the session's pending state, without ever calling
/// `set_item`/`delete_item`.
async fn validate_only(
    backend: &dyn Backend,
    session_id: u32,
    selector: DatastoreSelector,
    elem: &Element,
    schema_path: &str,
    schema: &dyn SchemaContext,
) -> Result<(), NetconfError> {
    if elem.classify() != NodeClass::Containment {
        if let Some(base) = schema.leaf_base_type(schema_path) {
            let lexical = elem.text_content().unwrap_or_default();
            leaf_to_tagged(base, &lexical)?;
        }
    }
    backend.validate(session_id, selector).await.map_err(NetconfError::from)
}

async fn exists(
    backend: &dyn Backend,
    session_id: u32,
    selector: DatastoreSelector,
    path: &str,
) -> Result<bool, NetconfError> {
    let items = backend
        .fetch_items(session_id, selector, std::slice::from_ref(&path.to_string()))
        .await
        .map_err(NetconfError::from)?;
    Ok(!items.is_empty())
}

/// Writes `elem`'s own value: a leaf's lexical text, a container/list-entry
/// marker for containers and list entries (§4.4 "`set_item(P, —)` for
/// containers/lists"), or an `empty` marker as a last resort for a
/// schema-unknown childless element.
async fn set_value(
    backend: &dyn Backend,
    session_id: u32,
    selector: DatastoreSelector,
    elem: &Element,
    path: &str,
    schema_path: &str,
    schema: &dyn SchemaContext,
) -> Result<(), NetconfError> {
    match schema.node(schema_path).map(|n| &n.kind) {
        Some(NodeKind::Container { presence }) => {
            return backend
                .set_item(session_id, selector, path, &TaggedValue::Container { presence: *presence })
                .await
                .map_err(NetconfError::from);
        },
        Some(NodeKind::List { .. }) => {
            return backend
                .set_item(session_id, selector, path, &TaggedValue::ListEntry)
                .await
                .map_err(NetconfError::from);
        },
        _ => {},
    }
    if elem.classify() == NodeClass::Containment {
        return Ok(());
    }
    let value = match schema.leaf_base_type(schema_path) {
        Some(base) => {
            let lexical = elem.text_content().unwrap_or_default();
            leaf_to_tagged(base, &lexical)?
        },
        None if elem.text_content().is_none() => TaggedValue::Empty,
        None => return Ok(()),
    };
    backend
        .set_item(session_id, selector, path, &value)
        .await
        .map_err(NetconfError::from)
}
