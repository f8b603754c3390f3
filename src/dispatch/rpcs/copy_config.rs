// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<copy-config>` (§4.1, Open Question: the backend interface (§6) has no
//! "replace the whole datastore" primitive, so this core recognizes two
//! shapes it can express faithfully and reports anything else as
//! unsupported rather than guessing at a wire-level whole-datastore copy):
//!
//! - `target=candidate`, `source=running`: equivalent to dropping the
//!   session's pending candidate edits (`discard-changes` semantics), since
//!   the backend's view of running already *is* the copy source.
//! - `source` is an inline `<config>`: applied against `target` as a
//!   `replace` edit (§4.4), which is a faithful "copy this config in" for a
//!   back end that does not expose a separate import primitive.
//! - anything else (`url` source/target, `startup` as a copy source with no
//!   inline data, datastore-to-datastore copies other than the one above):
//!   `operation-not-supported`.

use super::common::{parse_datastore_selector, parse_source, ConfigSource};
use crate::{
    datastore::DatastoreSelector,
    dispatch::Dispatcher,
    edit::{apply_edit, DefaultOperation, ErrorOption, TestOption},
    error::NetconfError,
    session::SessionState,
    xml::Element,
};

pub async fn copy_config(
    dispatcher: &Dispatcher,
    session: &SessionState,
    target: &Element,
    source: &Element,
) -> Result<(), NetconfError> {
    let target_selector = parse_datastore_selector(target)?;
    let source = parse_source(source)?;

    dispatcher.ensure_datastore(session, target_selector).await?;

    match source {
        ConfigSource::Datastore(DatastoreSelector::Running) if target_selector == DatastoreSelector::Candidate => {
            dispatcher.backend().discard_changes(session.id).await?;
            dispatcher.locks().clear_candidate_dirty(session.id);
            Ok(())
        },
        ConfigSource::Inline(config) => {
            // `stop-on-error` is implied for copy-config (RFC 6241 has no
            // error-option input for it), so the accumulated list is always
            // empty here; apply_edit surfaces the first failure as `Err`.
            apply_edit(
                dispatcher.backend(),
                session.id,
                target_selector,
                &config,
                DefaultOperation::Replace,
                TestOption::Set,
                ErrorOption::StopOnError,
                dispatcher.schema(),
            )
            .await?;
            if target_selector == DatastoreSelector::Candidate {
                dispatcher.locks().mark_candidate_dirty(session.id);
            }
            Ok(())
        },
        _ => Err(NetconfError::operation_not_supported(
            "this copy-config source/target combination is not supported",
        )),
    }
}
