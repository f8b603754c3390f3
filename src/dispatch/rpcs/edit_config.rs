// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<edit-config>` (§4.1/§4.4): resolves target/options, applies the inline
//! `<config>` against the backend, and marks candidate dirty on success.

use super::common::parse_datastore_selector;
use crate::{
    datastore::DatastoreSelector,
    dispatch::Dispatcher,
    edit::{apply_edit, DefaultOperation, ErrorOption, TestOption},
    error::NetconfError,
    session::SessionState,
    xml::Element,
};

fn parse_default_operation(elem: Option<&Element>) -> DefaultOperation {
    match elem.and_then(|e| e.text_content()).as_deref() {
        Some("replace") => DefaultOperation::Replace,
        Some("none") => DefaultOperation::None,
        _ => DefaultOperation::Merge,
    }
}

fn parse_test_option(elem: Option<&Element>) -> TestOption {
    match elem.and_then(|e| e.text_content()).as_deref() {
        Some("set") => TestOption::Set,
        Some("test-only") => TestOption::TestOnly,
        _ => TestOption::TestThenSet,
    }
}

fn parse_error_option(elem: Option<&Element>) -> ErrorOption {
    match elem.and_then(|e| e.text_content()).as_deref() {
        Some("continue-on-error") => ErrorOption::ContinueOnError,
        Some("rollback-on-error") => ErrorOption::RollbackOnError,
        _ => ErrorOption::StopOnError,
    }
}

/// Returns the (possibly empty) list of errors accumulated under
/// `continue-on-error` (§4.4, supplemental feature 2), so the caller can
/// build a reply carrying zero, one, or many `<rpc-error>` elements.
/// `stop-on-error`/`rollback-on-error` still surface their first failure
/// as `Err` immediately.
pub async fn edit_config(
    dispatcher: &Dispatcher,
    session: &SessionState,
    target: &Element,
    config: &Element,
    default_operation: Option<&Element>,
    test_option: Option<&Element>,
    error_option: Option<&Element>,
) -> Result<Vec<NetconfError>, NetconfError> {
    let selector = parse_datastore_selector(target)?;
    if selector == DatastoreSelector::Startup && !dispatcher.config().capabilities.startup {
        return Err(NetconfError::operation_not_supported("startup is not an edit-config target in this deployment"));
    }

    dispatcher.ensure_datastore(session, selector).await?;
    dispatcher.maybe_refresh(session, selector).await?;

    let default_op = parse_default_operation(default_operation);
    let test_opt = parse_test_option(test_option);
    let error_opt = parse_error_option(error_option);

    let errors = apply_edit(
        dispatcher.backend(),
        session.id,
        selector,
        config,
        default_op,
        test_opt,
        error_opt,
        dispatcher.schema(),
    )
    .await?;

    if selector == DatastoreSelector::Candidate {
        dispatcher.locks().mark_candidate_dirty(session.id);
    }
    Ok(errors)
}
