// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<commit>` (§4.5: "copy candidate into running ... then clear all
//! candidate-changed flags").

use crate::{dispatch::Dispatcher, error::NetconfError, session::SessionState};

pub async fn commit(dispatcher: &Dispatcher, session: &SessionState) -> Result<(), NetconfError> {
    dispatcher.backend().commit(session.id).await?;
    dispatcher.locks().clear_all_candidate_dirty();
    Ok(())
}
