// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `ietf-netconf-monitoring` (RFC 6022) in-process root.

use super::{item, StateProvider};
use crate::{datastore::ItemStream, session::SessionTable, value::TaggedValue};

/// Reports the live NETCONF session table as `/netconf-state/sessions`.
pub struct NetconfMonitoringProvider<'a> {
    sessions: &'a SessionTable,
}

impl<'a> NetconfMonitoringProvider<'a> {
    pub fn new(sessions: &'a SessionTable) -> Self {
        Self { sessions }
    }
}

impl StateProvider for NetconfMonitoringProvider<'_> {
    fn fetch_items(&self, _paths: &[String]) -> ItemStream {
        self.sessions
            .session_ids()
            .into_iter()
            .map(|id| {
                item(
                    format!(
                        "/ietf-netconf-monitoring:netconf-state/sessions/session[ietf-netconf-monitoring:session-id='{id}']/session-id"
                    ),
                    TaggedValue::Uint32(id),
                )
            })
            .collect()
    }
}
