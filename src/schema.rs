// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The schema-engine boundary (§6). This core never parses YANG; it asks a
//! [`SchemaContext`] implementation the handful of questions the filter
//! compiler, tree assembler and edit applier need answered, and ships a
//! tiny in-memory [`StaticSchema`] so those components have something real
//! to run against in tests.

use std::collections::BTreeMap;

use crate::value::LeafBaseType;

/// What the dispatcher/assembler need to know about one schema node,
/// addressed by its unkeyed schema path (`/prefix:container/list/leaf`).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSchema {
    pub module: String,
    pub prefix: String,
    pub is_config: bool,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container { presence: bool },
    List { keys: Vec<String> },
    Leaf {
        base_type: LeafBaseType,
        default: Option<String>,
    },
    LeafList {
        base_type: LeafBaseType,
    },
}

/// The minimal schema questions the core asks (§6 "Schema interface").
/// `path` arguments use the unkeyed schema-node path
/// (`/prefix:container/list/leaf`), not the instance path with predicates.
pub trait SchemaContext: Send + Sync {
    /// Resolves the YANG module owning a namespace URI (filter compiler
    /// §4.2 step 1: "resolve its namespace to a YANG module").
    fn module_for_namespace(&self, namespace: &str) -> Option<&str>;

    /// The conventional XML prefix to use when serializing this module's
    /// elements (purely a presentation detail, §4.2).
    fn prefix_for_module(&self, module: &str) -> Option<&str>;

    /// The inverse of [`module_for_namespace`](Self::module_for_namespace),
    /// needed when the tree assembler renders an assembled tree back to XML
    /// (reply construction, §4.3/§4.6) and has only the module name on
    /// hand.
    fn namespace_for_module(&self, module: &str) -> Option<&str>;

    /// Modules that define a *top-level* data node named `local_name`, for
    /// the unqualified-element case in filter compilation ("elements
    /// without namespace match every module defining a top-level data node
    /// of that name", §4.2 step 1).
    fn top_level_modules_for_name(&self, local_name: &str) -> Vec<&str>;

    fn node(&self, path: &str) -> Option<&NodeSchema>;

    fn leaf_base_type(&self, path: &str) -> Option<LeafBaseType> {
        match &self.node(path)?.kind {
            NodeKind::Leaf { base_type, .. } => Some(*base_type),
            NodeKind::LeafList { base_type } => Some(*base_type),
            _ => None,
        }
    }

    fn is_presence_container(&self, path: &str) -> bool {
        matches!(
            self.node(path),
            Some(NodeSchema {
                kind: NodeKind::Container { presence: true },
                ..
            })
        )
    }

    fn is_list_with_keys(&self, path: &str) -> Option<&[String]> {
        match self.node(path)?.kind {
            NodeKind::List { ref keys } => Some(keys.as_slice()),
            _ => None,
        }
    }

    fn default_value(&self, path: &str) -> Option<&str> {
        match &self.node(path)?.kind {
            NodeKind::Leaf { default, .. } => default.as_deref(),
            _ => None,
        }
    }

    fn is_config(&self, path: &str) -> bool {
        self.node(path).map(|n| n.is_config).unwrap_or(true)
    }

    /// Full-tree structural validation (`<validate>`/implicit commit
    /// validation, §4.5). Returns the first violation found, if any.
    /// Added beyond the literal §6 list because the commit/validate
    /// scenarios (§8 S5) require the schema engine to be able to reject an
    /// inline config, and nothing else in the external interface exposes
    /// that check.
    fn validate_data_tree(&self, _root_path: &str) -> Result<(), String> {
        Ok(())
    }
}

/// A small in-memory [`SchemaContext`] keyed by schema-node path, enough to
/// drive the filter compiler/marshaller/edit-applier tests without a real
/// YANG engine.
#[derive(Debug, Default)]
pub struct StaticSchema {
    nodes: BTreeMap<String, NodeSchema>,
    prefixes: BTreeMap<String, String>,
    namespaces: BTreeMap<String, String>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the namespace URI a module's elements live in.
    pub fn with_namespace(mut self, namespace: impl Into<String>, module: impl Into<String>) -> Self {
        self.namespaces.insert(namespace.into(), module.into());
        self
    }

    pub fn with_node(mut self, path: impl Into<String>, schema: NodeSchema) -> Self {
        let path = path.into();
        self.prefixes
            .entry(schema.module.clone())
            .or_insert_with(|| schema.prefix.clone());
        self.nodes.insert(path, schema);
        self
    }
}

impl SchemaContext for StaticSchema {
    fn module_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.namespaces.get(namespace).map(String::as_str)
    }

    fn prefix_for_module(&self, module: &str) -> Option<&str> {
        self.prefixes.get(module).map(String::as_str)
    }

    fn namespace_for_module(&self, module: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(_, m)| m.as_str() == module)
            .map(|(ns, _)| ns.as_str())
    }

    fn top_level_modules_for_name(&self, local_name: &str) -> Vec<&str> {
        let mut modules: Vec<&str> = self
            .nodes
            .iter()
            .filter_map(|(path, schema)| {
                let rest = path.strip_prefix('/')?;
                if rest.contains('/') {
                    return None;
                }
                let (_, name) = rest.split_once(':')?;
                (name == local_name).then_some(schema.module.as_str())
            })
            .collect();
        modules.dedup();
        modules
    }

    fn node(&self, path: &str) -> Option<&NodeSchema> {
        self.nodes.get(path)
    }
}
