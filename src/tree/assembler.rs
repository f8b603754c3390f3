// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Tree assembly from a flat `(path, value)` stream, with default-flag
//! propagation (§4.3 "Tagged value → leaf on a data tree").

use crate::{
    schema::SchemaContext,
    value::TaggedValue,
    xml::{Element, QName},
};

/// One node of an assembled data tree. Intermediate containers are created
/// implicitly as ancestors of inserted leaves; `leaf_value` is `Some` only
/// on the leaves the backend actually returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The instance-path segment for this node, e.g. `ietf-interfaces:interfaces`
    /// or `interface[name='eth0']` — prefix/predicates inline, same shape
    /// `datastore::FetchedItem::path` segments use.
    pub segment: String,
    pub is_default: bool,
    /// Set by the with-defaults filter under `report-all-tagged` (§4.6);
    /// rendered as a `wd:default="true"` attribute.
    pub annotate_default: bool,
    pub children: Vec<Node>,
    pub leaf_value: Option<TaggedValue>,
}

impl Node {
    fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            is_default: false,
            annotate_default: false,
            children: Vec::new(),
            leaf_value: None,
        }
    }
}

/// A schema-conformant data tree assembled from `(path, value)` pairs
/// (§4.3, §C3 "Tree Assembler").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTree {
    pub roots: Vec<Node>,
}

fn split_segments(path: &str) -> Vec<&str> {
    path.trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn strip_predicate(segment: &str) -> &str {
    match segment.find('[') {
        Some(idx) => &segment[..idx],
        None => segment,
    }
}

impl DataTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `(path, value)`, creating intermediate ancestors as needed,
    /// and propagates the default flag per §4.3. Idempotent: inserting the
    /// same path twice with the same arguments leaves the tree unchanged.
    pub fn insert(
        &mut self,
        path: &str,
        value: TaggedValue,
        is_default: bool,
        schema: &dyn SchemaContext,
    ) {
        let segments = split_segments(path);
        if segments.is_empty() {
            return;
        }

        let mut children = &mut self.roots;
        for (i, seg) in segments.iter().enumerate() {
            let idx = match children.iter().position(|n| n.segment == *seg) {
                Some(idx) => idx,
                None => {
                    children.push(Node::new(*seg));
                    children.len() - 1
                },
            };
            if i == segments.len() - 1 {
                children[idx].leaf_value = Some(value.clone());
            }
            children = &mut children[idx].children;
        }

        self.propagate_default(&segments, is_default, schema);
    }

    fn idx_path_for(&self, segments: &[&str]) -> Vec<usize> {
        let mut idxs = Vec::with_capacity(segments.len());
        let mut children = &self.roots;
        for seg in segments {
            let idx = children
                .iter()
                .position(|n| n.segment == *seg)
                .expect("segment exists after insert");
            idxs.push(idx);
            children = &children[idx].children;
        }
        idxs
    }

    fn node_mut_at(&mut self, idx_path: &[usize]) -> &mut Node {
        let mut node = &mut self.roots[idx_path[0]];
        for &idx in &idx_path[1..] {
            node = &mut node.children[idx];
        }
        node
    }

    fn propagate_default(&mut self, segments: &[&str], is_default: bool, schema: &dyn SchemaContext) {
        let mut schema_path = String::new();
        let schema_paths: Vec<String> = segments
            .iter()
            .map(|seg| {
                schema_path.push('/');
                schema_path.push_str(strip_predicate(seg));
                schema_path.clone()
            })
            .collect();

        let idx_path = self.idx_path_for(segments);
        let leaf_depth = idx_path.len() - 1;

        if is_default {
            for depth in (0..=leaf_depth).rev() {
                if depth != leaf_depth
                    && (schema.is_presence_container(&schema_paths[depth])
                        || schema.is_list_with_keys(&schema_paths[depth]).is_some())
                {
                    break;
                }
                self.node_mut_at(&idx_path[..=depth]).is_default = true;
            }
        } else {
            for depth in 0..=leaf_depth {
                self.node_mut_at(&idx_path[..=depth]).is_default = false;
            }
        }
    }

    /// Renders the tree back into XML elements, one per root. Namespaces
    /// are resolved from the module encoded in each segment's prefix via
    /// `schema::namespace_for_module`.
    pub fn to_xml(&self, schema: &dyn SchemaContext) -> Vec<Element> {
        self.roots.iter().map(|n| node_to_xml(n, schema)).collect()
    }
}

const WD_NAMESPACE: &str = "urn:ietf:params:xml:ns:netconf:default:1.0";

fn node_to_xml(node: &Node, schema: &dyn SchemaContext) -> Element {
    let local = strip_predicate(&node.segment);
    let (prefix, local_name) = local.split_once(':').unwrap_or(("", local));
    let ns = schema.namespace_for_module(prefix);
    let mut elem = Element::new(QName::new(ns, local_name));

    if node.annotate_default {
        elem = elem.with_attr(QName::new(Some(WD_NAMESPACE), "default"), "true");
    }
    if let Some(value) = &node.leaf_value {
        if !matches!(value, TaggedValue::Container { .. } | TaggedValue::ListEntry) {
            elem = elem.with_text(crate::value::tagged_to_canonical(value));
        }
    }
    for child in &node.children {
        elem = elem.with_child(node_to_xml(child, schema));
    }
    elem
}
