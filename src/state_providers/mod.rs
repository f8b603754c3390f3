// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! In-process state roots (§6 "Schema roots served in-process"). These
//! answer `get` requests whose compiled paths [`crate::filter::origin_of`]
//! routes away from the backend, so `ietf-yang-library`,
//! `ietf-netconf-monitoring` and `nc-notifications` never need a round
//! trip through `Backend::fetch_items`.

mod monitoring;
mod notifications;
mod yang_library;

pub use monitoring::NetconfMonitoringProvider;
pub use notifications::NcNotificationsProvider;
pub use yang_library::YangLibraryProvider;

use crate::datastore::{FetchedItem, ItemStream};

/// One in-process data root. Unlike [`crate::datastore::Backend`] this is
/// synchronous: these roots are server-local bookkeeping, never an I/O call.
pub trait StateProvider: Send + Sync {
    /// Returns every item under `paths` this provider knows about. Paths
    /// not rooted in this provider's namespace are silently ignored —
    /// the dispatcher only ever calls the provider matching
    /// [`crate::filter::origin_of`].
    fn fetch_items(&self, paths: &[String]) -> ItemStream;
}

pub(crate) fn item(path: impl Into<String>, value: crate::value::TaggedValue) -> FetchedItem {
    FetchedItem {
        path: path.into(),
        value,
        is_default: false,
    }
}
