// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use async_trait::async_trait;
use thiserror::Error;

use crate::value::TaggedValue;

/// Which of the three datastores (§3 "Session record") an operation
/// targets. `Candidate` is only reachable when `:candidate` is advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatastoreSelector {
    Running,
    Startup,
    Candidate,
}

/// A single leaf or leaf-list entry fetched from the backend, already
/// marshalled into a [`TaggedValue`] (§4.3) and tagged with whether the
/// backend considers it a schema-default (feeds with-defaults assembly,
/// §4.6).
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedItem {
    /// Absolute instance-identifier path, `/`-separated, keys inlined as
    /// `[key='value']` predicates — the same shape the filter compiler
    /// produces (§4.2).
    pub path: String,
    pub value: TaggedValue,
    pub is_default: bool,
}

/// The result of a `get`/`get-config` fetch: the items the backend matched,
/// in backend-chosen order. The assembler (§4.2 "Tree assembly") is
/// responsible for turning this flat list into a tree; ordering between
/// distinct list entries does not matter, but a list entry's own key
/// leaves must precede its other children (§4.4 invariant — set_item
/// ordering applies symmetrically to reads used for merge comparisons).
pub type ItemStream = Vec<FetchedItem>;

/// Backend failure classes (§7 "Backend-originated errors"). Converts into
/// a [`crate::error::NetconfError`] at the dispatcher boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorCode {
    Ok,
    NotFound,
    UnknownModel,
    DataExists,
    DataMissing,
    ValidationFailed,
    Other,
}

#[derive(Debug, Clone, Error)]
#[error("backend error ({code:?}): {message}")]
pub struct BackendError {
    pub code: BackendErrorCode,
    pub message: String,
}

impl BackendError {
    pub fn new(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The generic datastore back end this core dispatches onto (§6). Modeled
/// as a dyn-compatible async trait — the dispatcher holds it behind
/// `Arc<dyn Backend>` and never needs to know the concrete engine, mirroring
/// how the teacher crate drives I/O through `ClientConnection` rather than a
/// generic connection parameter.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Establishes whatever connection/session the backend needs before any
    /// per-NETCONF-session calls are made. Called once at backend startup,
    /// not per NETCONF session.
    async fn connect(&self) -> Result<(), BackendError>;

    async fn disconnect(&self) -> Result<(), BackendError>;

    /// Registers a new NETCONF session with the backend so it can track
    /// per-session locks/candidate edits on its side if it chooses to.
    async fn session_start(&self, session_id: u32) -> Result<(), BackendError>;

    /// Tears down backend-side bookkeeping for a closed/killed session
    /// (supplemental §close-session/kill-session bookkeeping).
    async fn session_stop(&self, session_id: u32) -> Result<(), BackendError>;

    /// Informs the backend which datastore subsequent `fetch_items`/
    /// `set_item`/`delete_item` calls for this session apply to.
    async fn session_switch_ds(
        &self,
        session_id: u32,
        target: DatastoreSelector,
    ) -> Result<(), BackendError>;

    /// Per-session knobs the backend should honor for subsequent calls,
    /// e.g. a config-only fetch filter (§4.2 "config-only empty result
    /// rule").
    async fn session_set_options(
        &self,
        session_id: u32,
        options: SessionOptions,
    ) -> Result<(), BackendError>;

    /// Keeps a backend-side session lease alive; called on each RPC so a
    /// backend with its own idle timeout does not expire a live NETCONF
    /// session.
    async fn session_refresh(&self, session_id: u32) -> Result<(), BackendError>;

    /// Fetches every item addressed by `paths` (already-compiled
    /// instance-identifier expressions, §4.2) from `selector`.
    async fn fetch_items(
        &self,
        session_id: u32,
        selector: DatastoreSelector,
        paths: &[String],
    ) -> Result<ItemStream, BackendError>;

    /// Writes a single item. `path`'s parents are assumed to already exist
    /// or be creatable by the backend; the edit applier (§4.4) is
    /// responsible for ordering calls parent-before-child, keys first.
    async fn set_item(
        &self,
        session_id: u32,
        selector: DatastoreSelector,
        path: &str,
        value: &TaggedValue,
    ) -> Result<(), BackendError>;

    async fn delete_item(
        &self,
        session_id: u32,
        selector: DatastoreSelector,
        path: &str,
    ) -> Result<(), BackendError>;

    /// Validates the named datastore as a whole (`<validate>`, §4.5).
    async fn validate(
        &self,
        session_id: u32,
        selector: DatastoreSelector,
    ) -> Result<(), BackendError>;

    /// Commits `candidate` into `running` (§4.5). Only ever called with
    /// `DatastoreSelector::Candidate` as the source; the backend decides
    /// how atomicity is achieved.
    async fn commit(&self, session_id: u32) -> Result<(), BackendError>;

    /// Discards the session's outstanding candidate edits (§4.5).
    async fn discard_changes(&self, session_id: u32) -> Result<(), BackendError>;

    /// Authorization hook for `<action>`/RPC execution the dispatcher is
    /// about to perform on behalf of a session (§6 "check_exec_permission").
    async fn check_exec_permission(
        &self,
        session_id: u32,
        operation: &str,
    ) -> Result<(), BackendError>;
}

bitflags::bitflags! {
    /// Per-session fetch/behavior flags the dispatcher passes down to the
    /// backend (§4.2 config-only rule and friends).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SessionOptions: u8 {
        /// Only config=true nodes should be returned/considered.
        const CONFIG_ONLY = 0b0000_0001;
        /// This session's requests originate from a `:url` scheme target.
        const URL_SOURCE   = 0b0000_0010;
    }
}
