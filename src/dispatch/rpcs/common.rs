// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Request-parsing helpers shared by more than one RPC handler.

use crate::{
    cfg::{ServerConfig, WithDefaultsBasicMode},
    datastore::DatastoreSelector,
    error::NetconfError,
    filter::Filter,
    tree::WithDefaultsMode,
    xml::{Element, QName},
};

/// What a `<source>` element named (§4.1: "running, startup, candidate, or
/// config for inline payload").
pub enum ConfigSource {
    Datastore(DatastoreSelector),
    Inline(Element),
}

pub fn parse_datastore_selector(elem: &Element) -> Result<DatastoreSelector, NetconfError> {
    let child = elem
        .child_elements()
        .next()
        .ok_or_else(|| NetconfError::invalid_value("missing datastore name"))?;
    match child.name.local.as_str() {
        "running" => Ok(DatastoreSelector::Running),
        "startup" => Ok(DatastoreSelector::Startup),
        "candidate" => Ok(DatastoreSelector::Candidate),
        "url" => Err(NetconfError::operation_not_supported("url target is not supported")),
        other => Err(NetconfError::invalid_value(format!("unsupported datastore {other:?}"))),
    }
}

pub fn parse_source(elem: &Element) -> Result<ConfigSource, NetconfError> {
    let child = elem
        .child_elements()
        .next()
        .ok_or_else(|| NetconfError::invalid_value("missing source"))?;
    match child.name.local.as_str() {
        "running" => Ok(ConfigSource::Datastore(DatastoreSelector::Running)),
        "startup" => Ok(ConfigSource::Datastore(DatastoreSelector::Startup)),
        "candidate" => Ok(ConfigSource::Datastore(DatastoreSelector::Candidate)),
        "config" => Ok(ConfigSource::Inline(child.clone())),
        "url" => Err(NetconfError::operation_not_supported("url source is not supported")),
        other => Err(NetconfError::invalid_value(format!("unsupported source {other:?}"))),
    }
}

/// Builds a [`Filter`] from an RPC's optional `<filter>` child; absent
/// filter means "select everything" (an empty subtree filter).
pub fn parse_filter(elem: Option<&Element>) -> Filter {
    match elem {
        None => Filter::Subtree(Element::new(QName::unqualified("filter"))),
        Some(f) if f.attr("type") == Some("xpath") => Filter::Xpath(f.attr("select").unwrap_or_default().to_string()),
        Some(f) => Filter::Subtree(f.clone()),
    }
}

/// Resolves the effective with-defaults mode: the request's own
/// `<with-defaults>` element if present, else the configured basic mode
/// (§4.6, RFC 6243 §4.4).
pub fn parse_with_defaults(elem: Option<&Element>, cfg: &ServerConfig) -> WithDefaultsMode {
    let requested = elem.and_then(|e| e.text_content());
    match requested.as_deref() {
        Some("report-all") => WithDefaultsMode::ReportAll,
        Some("report-all-tagged") => WithDefaultsMode::ReportAllTagged,
        Some("trim") => WithDefaultsMode::Trim,
        Some("explicit") => WithDefaultsMode::Explicit,
        _ => match cfg.capabilities.with_defaults_basic_mode {
            WithDefaultsBasicMode::ReportAll => WithDefaultsMode::ReportAll,
            WithDefaultsBasicMode::ReportAllTagged => WithDefaultsMode::ReportAllTagged,
            WithDefaultsBasicMode::Trim => WithDefaultsMode::Trim,
            WithDefaultsBasicMode::Explicit => WithDefaultsMode::Explicit,
        },
    }
}
