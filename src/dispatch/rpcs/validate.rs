// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<validate>` (§4.5): validates a named datastore via the backend, or an
//! inline `<config>` via the schema engine's structural check.

use super::common::{parse_source, ConfigSource};
use crate::{dispatch::Dispatcher, error::NetconfError, session::SessionState, xml::Element};

pub async fn validate(dispatcher: &Dispatcher, session: &SessionState, source: &Element) -> Result<(), NetconfError> {
    match parse_source(source)? {
        ConfigSource::Datastore(selector) => {
            dispatcher.backend().validate(session.id, selector).await?;
            Ok(())
        },
        ConfigSource::Inline(config) => {
            for child in config.child_elements() {
                let module = child
                    .name
                    .ns
                    .as_deref()
                    .and_then(|ns| dispatcher.schema().module_for_namespace(ns));
                let root_path = match module {
                    Some(module) => format!("/{module}:{}", child.name.local),
                    None => format!("/{}", child.name.local),
                };
                dispatcher
                    .schema()
                    .validate_data_tree(&root_path)
                    .map_err(NetconfError::operation_failed)?;
            }
            Ok(())
        },
    }
}
