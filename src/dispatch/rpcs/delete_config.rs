// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<delete-config>` (§4.1). RFC 6241 forbids `running` as a target; beyond
//! that this core has no "enumerate the whole datastore" primitive (§6), so
//! it uses the convention that `Backend::delete_item(.., "/")` means
//! "delete everything this backend holds for that datastore" (Open
//! Question, recorded here rather than invented silently at the call
//! site).

use super::common::parse_datastore_selector;
use crate::{datastore::DatastoreSelector, dispatch::Dispatcher, error::NetconfError, session::SessionState, xml::Element};

pub async fn delete_config(dispatcher: &Dispatcher, session: &SessionState, target: &Element) -> Result<(), NetconfError> {
    let selector = parse_datastore_selector(target)?;
    if selector == DatastoreSelector::Running {
        return Err(NetconfError::operation_not_supported("running cannot be the target of delete-config"));
    }

    dispatcher.ensure_datastore(session, selector).await?;
    dispatcher.backend().delete_item(session.id, selector, "/").await?;

    if selector == DatastoreSelector::Candidate {
        dispatcher.locks().mark_candidate_dirty(session.id);
    }
    Ok(())
}
