// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-NETCONF-session records (§3 "Session record", §C7).

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use dashmap::DashMap;

use crate::{
    datastore::{DatastoreSelector, SessionOptions},
    error::NetconfError,
};

/// One NETCONF session's record. `current_ds`/`options` are owned by that
/// session's worker (§5 "per-session state is owned by that session's
/// worker and is not shared") and are never mutated concurrently, so plain
/// atomics are enough — no interior mutex needed.
#[derive(Debug)]
pub struct SessionState {
    pub id: u32,
    current_ds: std::sync::Mutex<DatastoreSelector>,
    options: std::sync::Mutex<SessionOptions>,
}

impl SessionState {
    fn new(id: u32) -> Self {
        Self {
            id,
            current_ds: std::sync::Mutex::new(DatastoreSelector::Running),
            options: std::sync::Mutex::new(SessionOptions::empty()),
        }
    }

    /// The datastore this session last switched to (invariant 1).
    pub fn current_datastore(&self) -> DatastoreSelector {
        *self.current_ds.lock().expect("session datastore mutex poisoned")
    }

    pub fn set_current_datastore(&self, selector: DatastoreSelector) {
        *self.current_ds.lock().expect("session datastore mutex poisoned") = selector;
    }

    pub fn options(&self) -> SessionOptions {
        *self.options.lock().expect("session options mutex poisoned")
    }

    pub fn set_options(&self, options: SessionOptions) {
        *self.options.lock().expect("session options mutex poisoned") = options;
    }
}

/// The live-session registry, keyed by NETCONF session-id. Mirrors the
/// teacher's `Pool` (`DashMap<u16, Arc<Session>>` plus an atomic id
/// generator), generalized from one TSIH per TCP login to one entry per
/// NETCONF session.
pub struct SessionTable {
    sessions: DashMap<u32, Arc<SessionState>>,
    next_id: AtomicU32,
    max_sessions: u32,
}

impl SessionTable {
    pub fn new(max_sessions: u32) -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU32::new(1),
            max_sessions,
        }
    }

    /// Registers a new session, rejecting it with `resource-denied` once
    /// `max_sessions` live sessions are already tracked.
    pub fn start_session(&self) -> Result<Arc<SessionState>, NetconfError> {
        if self.sessions.len() as u32 >= self.max_sessions {
            return Err(NetconfError::resource_denied("too many concurrent sessions"));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Arc::new(SessionState::new(id));
        self.sessions.insert(id, session.clone());
        Ok(session)
    }

    pub fn get(&self, id: u32) -> Option<Arc<SessionState>> {
        self.sessions.get(&id).map(|entry| entry.clone())
    }

    /// `<close-session>`: removes the session's bookkeeping. The caller is
    /// responsible for releasing its locks/candidate-dirty flag via
    /// [`crate::session::LockManager`] and calling `Backend::session_stop`
    /// first.
    pub fn close_session(&self, id: u32) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// `<kill-session>`: same local bookkeeping as `close_session`; the
    /// distinction (permission check, in-flight RPC abandonment) is a
    /// dispatcher-level concern.
    pub fn kill_session(&self, id: u32) -> bool {
        self.close_session(id)
    }

    pub fn session_ids(&self) -> Vec<u32> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
