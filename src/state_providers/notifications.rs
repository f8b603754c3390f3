// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `nc-notifications` (RFC 6022 streams) in-process root.

use super::{item, StateProvider};
use crate::{datastore::ItemStream, value::TaggedValue};

/// Reports the fixed set of event streams this deployment exposes. Actual
/// notification delivery is a transport concern (§1, out of scope); this
/// only answers `<get>` queries against the stream list itself.
pub struct NcNotificationsProvider {
    streams: Vec<String>,
}

impl NcNotificationsProvider {
    pub fn new(streams: Vec<String>) -> Self {
        Self { streams }
    }
}

impl Default for NcNotificationsProvider {
    fn default() -> Self {
        Self::new(vec!["NETCONF".to_string()])
    }
}

impl StateProvider for NcNotificationsProvider {
    fn fetch_items(&self, _paths: &[String]) -> ItemStream {
        self.streams
            .iter()
            .map(|name| {
                item(
                    format!("/nc-notifications:netconf/streams/stream[nc-notifications:name='{name}']/name"),
                    TaggedValue::String(name.clone()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_advertises_the_netconf_stream() {
        let provider = NcNotificationsProvider::default();
        let items = provider.fetch_items(&[]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value, TaggedValue::String("NETCONF".into()));
    }
}
