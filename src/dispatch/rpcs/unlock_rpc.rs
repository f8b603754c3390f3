// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<unlock>` (§4.5: "`unlock candidate` by a holder with pending edits
//! discards those edits before releasing the lock").

use super::common::parse_datastore_selector;
use crate::{datastore::DatastoreSelector, dispatch::Dispatcher, error::NetconfError, session::SessionState, xml::Element};

pub async fn unlock(dispatcher: &Dispatcher, session: &SessionState, target: &Element) -> Result<(), NetconfError> {
    let selector = parse_datastore_selector(target)?;

    if selector == DatastoreSelector::Candidate
        && dispatcher.locks().holder(selector) == Some(session.id)
        && dispatcher.locks().is_candidate_dirty(session.id)
    {
        dispatcher.backend().discard_changes(session.id).await?;
        dispatcher.locks().clear_candidate_dirty(session.id);
    }

    dispatcher.locks().unlock(selector, session.id)
}
