// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Subtree/XPath filter compilation (§4.2).
//!
//! Turns a `<filter>` element into an ordered, owned vector of
//! instance-path expressions. The source grows multiple filter strings by
//! appending and branching, so we use a plain owning `String` builder with
//! an explicit clone at every branch point (§9 design notes) rather than
//! anything pointer-graph-shaped.

use crate::{
    error::NetconfError,
    schema::SchemaContext,
    xml::{Element, NodeClass},
};

/// The two mutually-exclusive filter shapes a `get`/`get-config` request
/// may carry (§4.2).
#[derive(Debug, Clone)]
pub enum Filter {
    /// `type="xpath"`, `select` holds the raw expression.
    Xpath(String),
    /// `type="subtree"` (the default): the `<filter>` element itself, whose
    /// children are the top-level data nodes being selected.
    Subtree(Element),
}

/// Where a compiled path should be served from (§4.2 "special-case
/// routing").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOrigin {
    Backend,
    YangLibrary,
    NetconfMonitoring,
    NcNotifications,
}

/// Classifies a compiled instance-path by which in-process provider (if
/// any) should serve it.
pub fn origin_of(path: &str) -> PathOrigin {
    if path.starts_with("/ietf-yang-library:") {
        PathOrigin::YangLibrary
    } else if path.starts_with("/ietf-netconf-monitoring:") {
        PathOrigin::NetconfMonitoring
    } else if path.starts_with("/nc-notifications:") {
        PathOrigin::NcNotifications
    } else {
        PathOrigin::Backend
    }
}

/// Compiles `filter` into an ordered list of instance-path expressions.
/// `config_only` drops state-only roots (§4.2: in config-only mode,
/// `ietf-yang-library`/`ietf-netconf-monitoring`/`nc-notifications` yield
/// empty results since they carry state data only).
pub fn compile_filter(
    filter: &Filter,
    schema: &dyn SchemaContext,
    config_only: bool,
) -> Result<Vec<String>, NetconfError> {
    let paths = match filter {
        Filter::Xpath(select) => {
            if select.trim().is_empty() {
                Vec::new()
            } else {
                vec![select.clone()]
            }
        },
        Filter::Subtree(root) => {
            let mut out = Vec::new();
            for child in root.child_elements() {
                out.extend(compile_node(child, "", None, schema)?);
            }
            out
        },
    };

    Ok(if config_only {
        paths
            .into_iter()
            .filter(|p| origin_of(p) == PathOrigin::Backend)
            .collect()
    } else {
        paths
    })
}

/// Resolves the (module, prefix) context(s) a node should compile under.
/// Its own `xmlns` wins; absent that, the inherited context from an
/// ancestor wins; absent that too (a genuinely unqualified top-level
/// element), every module defining a top-level node of that name branches
/// (§4.2 step 1).
fn resolve_contexts<'s>(
    elem: &Element,
    ctx: Option<(&'s str, &'s str)>,
    schema: &'s dyn SchemaContext,
) -> Result<Vec<(&'s str, &'s str)>, NetconfError> {
    if let Some(ns) = &elem.name.ns {
        let module = schema
            .module_for_namespace(ns)
            .ok_or_else(|| NetconfError::invalid_value(format!("unknown namespace {ns:?}")))?;
        let prefix = schema.prefix_for_module(module).ok_or_else(|| {
            NetconfError::invalid_value(format!("module {module:?} has no registered prefix"))
        })?;
        return Ok(vec![(module, prefix)]);
    }
    if let Some(c) = ctx {
        return Ok(vec![c]);
    }
    let modules = schema.top_level_modules_for_name(&elem.name.local);
    if modules.is_empty() {
        return Err(NetconfError::invalid_value(format!(
            "no module defines top-level element {:?}",
            elem.name.local
        )));
    }
    modules
        .into_iter()
        .map(|module| {
            let prefix = schema.prefix_for_module(module).ok_or_else(|| {
                NetconfError::invalid_value(format!(
                    "module {module:?} has no registered prefix"
                ))
            })?;
            Ok((module, prefix))
        })
        .collect()
}

fn resolve_single_context<'s>(
    elem: &Element,
    ctx: (&'s str, &'s str),
    schema: &'s dyn SchemaContext,
) -> Result<(&'s str, &'s str), NetconfError> {
    let mut ctxs = resolve_contexts(elem, Some(ctx), schema)?;
    Ok(ctxs.remove(0))
}

fn attr_predicates(elem: &Element, schema: &dyn SchemaContext) -> String {
    let mut out = String::new();
    for (qname, value) in &elem.attrs {
        let Some(ns) = &qname.ns else { continue };
        let Some(module) = schema.module_for_namespace(ns) else {
            continue;
        };
        let Some(prefix) = schema.prefix_for_module(module) else {
            continue;
        };
        out += &format!("[@{prefix}:{}='{value}']", qname.local);
    }
    out
}

fn compile_node(
    elem: &Element,
    path_so_far: &str,
    ctx: Option<(&str, &str)>,
    schema: &dyn SchemaContext,
) -> Result<Vec<String>, NetconfError> {
    let contexts = resolve_contexts(elem, ctx, schema)?;
    let mut results = Vec::new();

    for (module, prefix) in contexts {
        let mut node_path = format!("{path_so_far}/{prefix}:{}", elem.name.local);
        node_path += &attr_predicates(elem, schema);

        let mut content_matches: Vec<(String, String, String)> = Vec::new();
        let mut other_children: Vec<&Element> = Vec::new();
        for child in elem.child_elements() {
            if child.classify() == NodeClass::ContentMatch {
                let (_, cprefix) = resolve_single_context(child, (module, prefix), schema)?;
                let text = child
                    .text_content()
                    .expect("classify() guarantees non-whitespace text");
                content_matches.push((cprefix.to_string(), child.name.local.clone(), text));
            } else {
                other_children.push(child);
            }
        }

        for (cprefix, clocal, text) in &content_matches {
            node_path += &format!("[{cprefix}:{clocal}='{text}']");
        }
        let branch_paths: Vec<String> = content_matches
            .iter()
            .map(|(cprefix, clocal, _)| format!("{node_path}/{cprefix}:{clocal}"))
            .collect();

        if other_children.is_empty() {
            // Either a true selection leaf, or a containment node whose
            // only children were content-matches: either way the
            // accumulated path (predicates and all) is itself a valid
            // terminal selection alongside the content-match branches.
            results.push(node_path.clone());
            results.extend(branch_paths);
        } else {
            results.extend(branch_paths);
            for child in other_children {
                results.extend(compile_node(child, &node_path, Some((module, prefix)), schema)?);
            }
        }
    }

    Ok(results)
}
