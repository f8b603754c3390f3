// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Global lock table and candidate-changed bookkeeping (§4.5, §C8).

use std::{
    collections::HashMap,
    sync::Mutex,
};

use dashmap::DashMap;

use crate::{datastore::DatastoreSelector, error::NetconfError};

/// One mutex guarding the whole table (§5: "the global lock table is
/// protected by a single mutex; acquisition is a short critical section"),
/// plus a `DashMap` of per-session candidate-changed flags so `lock
/// candidate` can cheaply check "any session has candidate-changed=true"
/// (invariant 7) without taking the lock-table mutex.
pub struct LockManager {
    locks: Mutex<HashMap<DatastoreSelector, u32>>,
    candidate_dirty: DashMap<u32, bool>,
}

impl Default for LockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LockManager {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            candidate_dirty: DashMap::new(),
        }
    }

    /// `<lock>`. Rejects with `lock-denied` if another session already
    /// holds `selector`, or — for candidate specifically — if any session
    /// has pending, uncommitted candidate edits (invariant 7).
    pub fn lock(&self, selector: DatastoreSelector, session_id: u32) -> Result<(), NetconfError> {
        if selector == DatastoreSelector::Candidate && self.any_candidate_dirty() {
            return Err(NetconfError::lock_denied(
                "candidate differs from running: a session has uncommitted edits",
            ));
        }
        let mut locks = self.locks.lock().expect("lock table mutex poisoned");
        match locks.get(&selector) {
            Some(holder) if *holder != session_id => {
                Err(NetconfError::lock_denied(format!("datastore is locked by session {holder}")))
            },
            _ => {
                locks.insert(selector, session_id);
                Ok(())
            },
        }
    }

    /// `<unlock>`. For candidate, the caller must have already issued
    /// `Backend::discard_changes` and [`Self::clear_candidate_dirty`] for
    /// the holder's pending edits (§4.5: "`unlock candidate` by a holder
    /// with pending edits discards those edits before releasing the
    /// lock") before calling this.
    pub fn unlock(&self, selector: DatastoreSelector, session_id: u32) -> Result<(), NetconfError> {
        let mut locks = self.locks.lock().expect("lock table mutex poisoned");
        match locks.get(&selector) {
            Some(holder) if *holder == session_id => {
                locks.remove(&selector);
                Ok(())
            },
            Some(_) => Err(NetconfError::lock_denied("lock is held by a different session")),
            None => Err(NetconfError::operation_failed("datastore is not locked")),
        }
    }

    pub fn holder(&self, selector: DatastoreSelector) -> Option<u32> {
        self.locks.lock().expect("lock table mutex poisoned").get(&selector).copied()
    }

    /// Drops every lock held by `session_id` — used by close-session/
    /// kill-session so an abruptly-ended session never leaves a dangling
    /// lock (§5 cancellation note).
    pub fn release_all(&self, session_id: u32) {
        let mut locks = self.locks.lock().expect("lock table mutex poisoned");
        locks.retain(|_, holder| *holder != session_id);
        self.candidate_dirty.remove(&session_id);
    }

    /// Marks that `session_id` has issued an edit against candidate not
    /// yet committed or discarded.
    pub fn mark_candidate_dirty(&self, session_id: u32) {
        self.candidate_dirty.insert(session_id, true);
    }

    pub fn is_candidate_dirty(&self, session_id: u32) -> bool {
        self.candidate_dirty.get(&session_id).map(|v| *v).unwrap_or(false)
    }

    fn any_candidate_dirty(&self) -> bool {
        self.candidate_dirty.iter().any(|entry| *entry.value())
    }

    /// `<commit>`: clears every session's candidate-changed flag (§4.5:
    /// "clear all candidate-changed flags").
    pub fn clear_all_candidate_dirty(&self) {
        self.candidate_dirty.clear();
    }

    /// `<discard-changes>`: clears only the invoking session's flag (§4.5:
    /// "clear flag for the invoking session").
    pub fn clear_candidate_dirty(&self, session_id: u32) {
        self.candidate_dirty.remove(&session_id);
    }
}
