// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `ietf-yang-library` (RFC 8525) in-process root.

use super::{item, StateProvider};
use crate::{datastore::ItemStream, value::TaggedValue};

#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub name: String,
    pub revision: String,
    pub namespace: String,
}

/// Reports the fixed set of modules this deployment's schema context knows
/// about. `content_id` changes whenever that set changes; this core treats
/// the set as loaded once at startup, so it is constant for the process
/// lifetime.
pub struct YangLibraryProvider {
    content_id: String,
    modules: Vec<ModuleInfo>,
}

impl YangLibraryProvider {
    pub fn new(content_id: impl Into<String>, modules: Vec<ModuleInfo>) -> Self {
        Self {
            content_id: content_id.into(),
            modules,
        }
    }
}

impl StateProvider for YangLibraryProvider {
    fn fetch_items(&self, paths: &[String]) -> ItemStream {
        let wants = |suffix: &str| paths.iter().any(|p| p.starts_with("/ietf-yang-library:") || p.ends_with(suffix));
        let mut out = ItemStream::new();

        if wants("content-id") {
            out.push(item(
                "/ietf-yang-library:yang-library/content-id",
                TaggedValue::String(self.content_id.clone()),
            ));
        }
        for module in &self.modules {
            let base = format!(
                "/ietf-yang-library:yang-library/module-set/module[ietf-yang-library:name='{}']",
                module.name
            );
            out.push(item(format!("{base}/name"), TaggedValue::String(module.name.clone())));
            out.push(item(
                format!("{base}/revision"),
                TaggedValue::String(module.revision.clone()),
            ));
            out.push(item(
                format!("{base}/namespace"),
                TaggedValue::String(module.namespace.clone()),
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_content_id_and_registered_modules() {
        let provider = YangLibraryProvider::new(
            "1",
            vec![ModuleInfo {
                name: "ietf-interfaces".into(),
                revision: "2018-02-20".into(),
                namespace: "urn:ietf:params:xml:ns:yang:ietf-interfaces".into(),
            }],
        );
        let items = provider.fetch_items(&["/ietf-yang-library:yang-library".to_string()]);
        assert!(items
            .iter()
            .any(|i| i.path.ends_with("content-id") && i.value == TaggedValue::String("1".into())));
        assert!(items.iter().any(|i| i.path.contains("ietf-interfaces") && i.path.ends_with("/name")));
    }
}
