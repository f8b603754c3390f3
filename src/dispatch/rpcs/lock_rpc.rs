// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<lock>` (§4.5).

use super::common::parse_datastore_selector;
use crate::{dispatch::Dispatcher, error::NetconfError, session::SessionState, xml::Element};

pub async fn lock(dispatcher: &Dispatcher, session: &SessionState, target: &Element) -> Result<(), NetconfError> {
    let selector = parse_datastore_selector(target)?;
    dispatcher.locks().lock(selector, session.id)
}
