// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Shared test fixtures for the RPC handlers in [`super::super::rpcs`]: a
//! fully in-memory [`Backend`] and a ready-to-use [`Dispatcher`] builder, so
//! each handler's tests only need to describe the schema/seed data that
//! matters to it.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    cfg::{
        config::{LogOutput, RuntimeConfig},
        CapabilityConfig, LoggingConfig, ServerConfig, WithDefaultsBasicMode,
    },
    datastore::{Backend, BackendError, BackendErrorCode, DatastoreSelector, FetchedItem, ItemStream, SessionOptions},
    dispatch::{Dispatcher, StateProviders},
    schema::SchemaContext,
    session::SessionState,
    state_providers::{NcNotificationsProvider, YangLibraryProvider},
    value::TaggedValue,
};

/// An in-memory stand-in for a real datastore engine: keeps one flat
/// `path -> (value, is_default)` map per [`DatastoreSelector`] and answers
/// every [`Backend`] call straight out of it, with no session/transaction
/// semantics beyond what individual tests set up via [`FakeBackend::seed`].
#[derive(Default)]
pub struct FakeBackend {
    running: Mutex<HashMap<String, (TaggedValue, bool)>>,
    candidate: Mutex<HashMap<String, (TaggedValue, bool)>>,
    startup: Mutex<HashMap<String, (TaggedValue, bool)>>,
    pub committed: Mutex<bool>,
    pub discarded: Mutex<bool>,
}

impl FakeBackend {
    pub fn seed(&self, path: impl Into<String>, value: TaggedValue, is_default: bool) {
        self.running.lock().expect("poisoned").insert(path.into(), (value, is_default));
    }

    fn store(&self, selector: DatastoreSelector) -> &Mutex<HashMap<String, (TaggedValue, bool)>> {
        match selector {
            DatastoreSelector::Running => &self.running,
            DatastoreSelector::Candidate => &self.candidate,
            DatastoreSelector::Startup => &self.startup,
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn connect(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_start(&self, _session_id: u32) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_stop(&self, _session_id: u32) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_switch_ds(&self, _session_id: u32, _target: DatastoreSelector) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_set_options(&self, _session_id: u32, _options: SessionOptions) -> Result<(), BackendError> {
        Ok(())
    }

    async fn session_refresh(&self, _session_id: u32) -> Result<(), BackendError> {
        Ok(())
    }

    async fn fetch_items(
        &self,
        _session_id: u32,
        selector: DatastoreSelector,
        paths: &[String],
    ) -> Result<ItemStream, BackendError> {
        let store = self.store(selector).lock().expect("poisoned");
        Ok(paths
            .iter()
            .filter_map(|p| {
                store.get(p).map(|(value, is_default)| FetchedItem {
                    path: p.clone(),
                    value: value.clone(),
                    is_default: *is_default,
                })
            })
            .collect())
    }

    async fn set_item(
        &self,
        _session_id: u32,
        selector: DatastoreSelector,
        path: &str,
        value: &TaggedValue,
    ) -> Result<(), BackendError> {
        self.store(selector)
            .lock()
            .expect("poisoned")
            .insert(path.to_string(), (value.clone(), false));
        Ok(())
    }

    async fn delete_item(&self, _session_id: u32, selector: DatastoreSelector, path: &str) -> Result<(), BackendError> {
        let mut store = self.store(selector).lock().expect("poisoned");
        if path == "/" {
            store.clear();
            return Ok(());
        }
        if store.remove(path).is_none() {
            return Err(BackendError::new(BackendErrorCode::DataMissing, format!("no such item: {path}")));
        }
        Ok(())
    }

    async fn validate(&self, _session_id: u32, _selector: DatastoreSelector) -> Result<(), BackendError> {
        Ok(())
    }

    async fn commit(&self, _session_id: u32) -> Result<(), BackendError> {
        let candidate = self.candidate.lock().expect("poisoned").clone();
        *self.running.lock().expect("poisoned") = candidate;
        *self.committed.lock().expect("poisoned") = true;
        Ok(())
    }

    async fn discard_changes(&self, _session_id: u32) -> Result<(), BackendError> {
        self.candidate.lock().expect("poisoned").clear();
        *self.discarded.lock().expect("poisoned") = true;
        Ok(())
    }

    async fn check_exec_permission(&self, _session_id: u32, _operation: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        capabilities: CapabilityConfig {
            candidate: true,
            startup: true,
            xpath: true,
            url: false,
            url_schemes: vec![],
            with_defaults: true,
            with_defaults_basic_mode: WithDefaultsBasicMode::ReportAll,
        },
        logging: LoggingConfig {
            level: "info".into(),
            output: LogOutput::Stdout,
            is_show_line: false,
            is_show_module_path: false,
            is_show_target: true,
            file: None,
        },
        runtime: RuntimeConfig {
            max_sessions: 16,
            backend_io_timeout: Duration::from_secs(5),
        },
    }
}

/// Builds a [`Dispatcher`] wired to `backend`/`schema` with a fresh started
/// session, ready for an RPC handler test to drive directly.
pub async fn test_dispatcher(
    schema: impl SchemaContext + 'static,
    backend: FakeBackend,
) -> (Dispatcher, Arc<SessionState>) {
    let state = StateProviders {
        yang_library: YangLibraryProvider::new("1", vec![]),
        notifications: NcNotificationsProvider::default(),
    };
    let dispatcher = Dispatcher::new(Arc::new(backend), Arc::new(schema), test_config(), state);
    let session = dispatcher.start_session().await.expect("session starts");
    (dispatcher, session)
}
