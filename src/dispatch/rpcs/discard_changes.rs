// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<discard-changes>` (§4.5: "drop pending candidate edits; clear flag for
//! the invoking session").

use crate::{dispatch::Dispatcher, error::NetconfError, session::SessionState};

pub async fn discard_changes(dispatcher: &Dispatcher, session: &SessionState) -> Result<(), NetconfError> {
    dispatcher.backend().discard_changes(session.id).await?;
    dispatcher.locks().clear_candidate_dirty(session.id);
    Ok(())
}
