// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A minimal owned XML element tree.
//!
//! The transport layer (out of scope, §1) is the thing that actually reads
//! bytes off the wire, validates against schema, and hands this core a
//! parsed request tree. This module defines the shape of that tree and a
//! `quick-xml`-backed parser/writer pair so tests (and anything that wants
//! to build fixtures) don't need their own XML stack.

use std::fmt;

use quick_xml::{
    Reader, Writer,
    events::{BytesStart, Event},
};

use crate::error::NetconfError;

/// A namespace-qualified name. `ns` is the resolved namespace URI (already
/// accounting for `xmlns` inheritance), not a prefix — prefixes are only a
/// serialization detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub ns: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(ns: Option<impl Into<String>>, local: impl Into<String>) -> Self {
        Self {
            ns: ns.map(Into::into),
            local: local.into(),
        }
    }

    pub fn unqualified(local: impl Into<String>) -> Self {
        Self {
            ns: None,
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ns {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: QName,
    pub attrs: Vec<(QName, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_attr(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.local == name)
            .map(|(_, v)| v.as_str())
    }

    /// Non-whitespace concatenated text content, trimmed. `None` if the
    /// element has no text nodes or they are all whitespace.
    pub fn text_content(&self) -> Option<String> {
        let mut buf = String::new();
        for n in &self.children {
            if let Node::Text(t) = n {
                buf.push_str(t);
            }
        }
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Classifies this node per §4.2: containment (has element children),
    /// selection (no children, no text), or content-match (no element
    /// children, non-whitespace text).
    pub fn classify(&self) -> NodeClass {
        if self.child_elements().next().is_some() {
            NodeClass::Containment
        } else if self.text_content().is_some() {
            NodeClass::ContentMatch
        } else {
            NodeClass::Selection
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Containment,
    Selection,
    ContentMatch,
}

/// Parses a UTF-8 XML document into an owned [`Element`] tree, resolving
/// `xmlns` declarations (default and prefixed) into each element/attribute's
/// effective namespace URI as it goes. Returns the document's (sole) root
/// element.
pub fn parse(xml: &str) -> Result<Element, NetconfError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    // Stack of (default-ns, prefix->ns) active at each nesting depth.
    let mut scopes: Vec<NsScope> = vec![NsScope::default()];
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| NetconfError::invalid_value(format!("malformed XML: {e}")))?;
        match event {
            Event::Start(start) => {
                let elem = build_start(&start, &scopes)?;
                let scope = child_scope(&start, scopes.last().expect("scope stack non-empty"))?;
                scopes.push(scope);
                stack.push(elem);
            },
            Event::Empty(start) => {
                let elem = build_start(&start, &scopes)?;
                push_child(&mut stack, &mut root, elem)?;
            },
            Event::End(_) => {
                scopes.pop();
                let elem = stack
                    .pop()
                    .ok_or_else(|| NetconfError::invalid_value("unbalanced XML end tag"))?;
                push_child(&mut stack, &mut root, elem)?;
            },
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| NetconfError::invalid_value(format!("bad text: {e}")))?
                    .into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text));
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    root.ok_or_else(|| NetconfError::invalid_value("no root element"))
}

#[derive(Default, Clone)]
struct NsScope {
    default_ns: Option<String>,
    prefixes: Vec<(String, String)>,
}

impl NsScope {
    fn resolve_element(&self, prefix: Option<&str>) -> Option<String> {
        match prefix {
            None => self.default_ns.clone(),
            Some(p) => self
                .prefixes
                .iter()
                .find(|(pfx, _)| pfx == p)
                .map(|(_, ns)| ns.clone()),
        }
    }
}

fn split_qname(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

fn child_scope(start: &BytesStart, parent: &NsScope) -> Result<NsScope, NetconfError> {
    let mut scope = parent.clone();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| NetconfError::invalid_value(format!("bad attribute: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| NetconfError::invalid_value(format!("bad attribute value: {e}")))?
            .into_owned();
        if key == "xmlns" {
            scope.default_ns = Some(value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.prefixes.retain(|(p, _)| p != prefix);
            scope.prefixes.push((prefix.to_string(), value));
        }
    }
    Ok(scope)
}

fn build_start(start: &BytesStart, scopes: &[NsScope]) -> Result<Element, NetconfError> {
    let scope = child_scope(start, scopes.last().expect("scope stack non-empty"))?;
    let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let (prefix, local) = split_qname(&raw_name);
    let ns = scope.resolve_element(prefix);
    let mut elem = Element::new(QName::new(ns, local));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| NetconfError::invalid_value(format!("bad attribute: {e}")))?;
        let raw_key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if raw_key == "xmlns" || raw_key.starts_with("xmlns:") {
            continue;
        }
        let (aprefix, alocal) = split_qname(&raw_key);
        // Unprefixed attributes have no namespace per the XML namespaces spec.
        let ans = aprefix.and_then(|p| scope.resolve_element(Some(p)));
        let value = attr
            .unescape_value()
            .map_err(|e| NetconfError::invalid_value(format!("bad attribute value: {e}")))?
            .into_owned();
        elem.attrs.push((QName::new(ans, alocal), value));
    }

    Ok(elem)
}

fn push_child(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    elem: Element,
) -> Result<(), NetconfError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(elem)),
        None => *root = Some(elem),
    }
    Ok(())
}

/// Serializes an [`Element`] tree back into an XML fragment. Namespaces are
/// re-declared at the point of use (no attempt to hoist/dedupe `xmlns`
/// declarations), which is always correct even if occasionally verbose.
pub fn write(elem: &Element) -> String {
    let mut writer = Writer::new(Vec::new());
    write_elem(&mut writer, elem).expect("writing to an in-memory buffer cannot fail");
    String::from_utf8(writer.into_inner()).expect("quick-xml only emits valid UTF-8")
}

fn write_elem(
    writer: &mut Writer<Vec<u8>>,
    elem: &Element,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(elem.name.local.as_str());
    if let Some(ns) = &elem.name.ns {
        start.push_attribute(("xmlns", ns.as_str()));
    }
    for (name, value) in &elem.attrs {
        start.push_attribute((name.local.as_str(), value.as_str()));
    }

    if elem.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &elem.children {
        match child {
            Node::Element(e) => write_elem(writer, e)?,
            Node::Text(t) => {
                writer.write_event(Event::Text(quick_xml::events::BytesText::new(t)))?;
            },
        }
    }
    writer.write_event(Event::End(quick_xml::events::BytesEnd::new(
        elem.name.local.as_str(),
    )))?;
    Ok(())
}
