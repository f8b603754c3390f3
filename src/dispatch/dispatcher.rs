// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The operation dispatcher (§4.1, §C6): the one place that owns the
//! backend handle, session table and lock manager, and knows the
//! datastore-selection/lazy-switch/refresh rules every RPC handler in
//! [`super::rpcs`] builds on.

use std::sync::Arc;

use crate::{
    cfg::ServerConfig,
    datastore::{Backend, DatastoreSelector, ItemStream, SessionOptions},
    error::NetconfError,
    filter::{origin_of, PathOrigin},
    schema::SchemaContext,
    session::{LockManager, SessionState, SessionTable},
    state_providers::{NcNotificationsProvider, NetconfMonitoringProvider, StateProvider, YangLibraryProvider},
};

/// The in-process roots a [`Dispatcher`] serves directly (§6 "Schema roots
/// served in-process"). Bundled so `Dispatcher::new` takes one argument
/// instead of growing a parameter per root.
pub struct StateProviders {
    pub yang_library: YangLibraryProvider,
    pub notifications: NcNotificationsProvider,
}

pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    sessions: SessionTable,
    locks: LockManager,
    schema: Arc<dyn SchemaContext>,
    config: ServerConfig,
    state: StateProviders,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, schema: Arc<dyn SchemaContext>, config: ServerConfig, state: StateProviders) -> Self {
        let sessions = SessionTable::new(config.runtime.max_sessions);
        Self {
            backend,
            sessions,
            locks: LockManager::new(),
            schema,
            config,
            state,
        }
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    pub fn locks(&self) -> &LockManager {
        &self.locks
    }

    pub fn schema(&self) -> &dyn SchemaContext {
        self.schema.as_ref()
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// `<hello>`-time session registration: tracks the session locally and
    /// tells the backend about it (§C7).
    pub async fn start_session(&self) -> Result<Arc<SessionState>, NetconfError> {
        let session = self.sessions.start_session()?;
        self.backend.session_start(session.id).await?;
        Ok(session)
    }

    /// `<close-session>`/`<kill-session>` shared bookkeeping: release any
    /// locks the session held, tear down backend state, drop the local
    /// record.
    pub async fn end_session(&self, session_id: u32) -> Result<(), NetconfError> {
        self.locks.release_all(session_id);
        self.backend.session_stop(session_id).await?;
        self.sessions.close_session(session_id);
        Ok(())
    }

    /// §4.1 "Lazy datastore switch": only calls `session_switch_ds` when the
    /// session isn't already pointed at `target`.
    pub async fn ensure_datastore(&self, session: &SessionState, target: DatastoreSelector) -> Result<(), NetconfError> {
        if session.current_datastore() != target {
            self.backend.session_switch_ds(session.id, target).await?;
            session.set_current_datastore(target);
        }
        Ok(())
    }

    /// §4.1 "Refresh policy": always refresh running/startup before a read;
    /// for candidate, only when the session has no pending local edits, so
    /// a refresh never silently drops uncommitted work.
    pub async fn maybe_refresh(&self, session: &SessionState, target: DatastoreSelector) -> Result<(), NetconfError> {
        let should_refresh = match target {
            DatastoreSelector::Candidate => !self.locks.is_candidate_dirty(session.id),
            DatastoreSelector::Running | DatastoreSelector::Startup => true,
        };
        if should_refresh {
            self.backend.session_refresh(session.id).await?;
        }
        Ok(())
    }

    /// Propagates the `config-only` session option down to the backend
    /// only when it actually changes (`get` clears it, `get-config` sets
    /// it, §4.2 "config-only empty result rule").
    pub async fn set_config_only(&self, session: &SessionState, config_only: bool) -> Result<(), NetconfError> {
        let mut options = session.options();
        let changed = options.contains(SessionOptions::CONFIG_ONLY) != config_only;
        options.set(SessionOptions::CONFIG_ONLY, config_only);
        if changed {
            self.backend.session_set_options(session.id, options).await?;
            session.set_options(options);
        }
        Ok(())
    }

    /// Routes compiled paths to whichever provider owns them (§4.2
    /// "special-case routing") and merges the results, so RPC handlers
    /// never have to special-case the three in-process roots themselves.
    pub async fn fetch_all(
        &self,
        session: &SessionState,
        selector: DatastoreSelector,
        paths: &[String],
    ) -> Result<ItemStream, NetconfError> {
        let mut backend_paths = Vec::new();
        let mut out = ItemStream::new();

        for path in paths {
            match origin_of(path) {
                PathOrigin::Backend => backend_paths.push(path.clone()),
                PathOrigin::YangLibrary => out.extend(self.state.yang_library.fetch_items(std::slice::from_ref(path))),
                PathOrigin::NetconfMonitoring => {
                    out.extend(NetconfMonitoringProvider::new(&self.sessions).fetch_items(std::slice::from_ref(path)))
                },
                PathOrigin::NcNotifications => out.extend(self.state.notifications.fetch_items(std::slice::from_ref(path))),
            }
        }

        if !backend_paths.is_empty() {
            let fetched = self.backend.fetch_items(session.id, selector, &backend_paths).await?;
            out.extend(fetched);
        }
        Ok(out)
    }
}
