// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! With-defaults reply filtering (§4.6, RFC 6243).

use super::assembler::{strip_predicate, DataTree, Node};
use crate::{schema::SchemaContext, value::tagged_to_canonical};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithDefaultsMode {
    ReportAll,
    ReportAllTagged,
    Trim,
    Explicit,
}

/// Applies `mode` to every scalar in `tree` (§4.6 table). `is_rpc_output`
/// distinguishes config-data replies from `<rpc-reply>` output values, the
/// one case where `explicit` never drops a default leaf.
pub fn apply_with_defaults(
    tree: &mut DataTree,
    mode: WithDefaultsMode,
    schema: &dyn SchemaContext,
    is_rpc_output: bool,
) {
    process_nodes(&mut tree.roots, mode, schema, "", is_rpc_output);
}

fn process_nodes(
    nodes: &mut Vec<Node>,
    mode: WithDefaultsMode,
    schema: &dyn SchemaContext,
    schema_path_prefix: &str,
    is_rpc_output: bool,
) {
    let mut i = 0;
    while i < nodes.len() {
        let schema_path = format!("{schema_path_prefix}/{}", strip_predicate(&nodes[i].segment));
        if nodes[i].leaf_value.is_some() {
            let keep = decide_leaf(&mut nodes[i], mode, schema, &schema_path, is_rpc_output);
            if !keep {
                nodes.remove(i);
                continue;
            }
        } else {
            process_nodes(&mut nodes[i].children, mode, schema, &schema_path, is_rpc_output);
        }
        i += 1;
    }
}

fn decide_leaf(
    node: &mut Node,
    mode: WithDefaultsMode,
    schema: &dyn SchemaContext,
    schema_path: &str,
    is_rpc_output: bool,
) -> bool {
    let value = node
        .leaf_value
        .as_ref()
        .expect("decide_leaf called only on leaves");
    let canonical = tagged_to_canonical(value);
    let matches_schema_default = schema
        .default_value(schema_path)
        .map(|d| d == canonical)
        .unwrap_or(false);

    match mode {
        WithDefaultsMode::ReportAll => true,
        WithDefaultsMode::ReportAllTagged => {
            if node.is_default || matches_schema_default {
                node.annotate_default = true;
            }
            true
        },
        WithDefaultsMode::Trim => !(node.is_default || matches_schema_default),
        WithDefaultsMode::Explicit => {
            !(node.is_default && schema.is_config(schema_path) && !is_rpc_output)
        },
    }
}
