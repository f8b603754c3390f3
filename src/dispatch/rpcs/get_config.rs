// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<get-config>` (§4.1: target resolved from `<source>`, config-only).

use super::common::{parse_datastore_selector, parse_filter, parse_with_defaults};
use crate::{
    dispatch::Dispatcher,
    error::NetconfError,
    filter::compile_filter,
    session::SessionState,
    tree::{apply_with_defaults, DataTree},
    xml::Element,
};

pub async fn get_config(
    dispatcher: &Dispatcher,
    session: &SessionState,
    source: &Element,
    filter: Option<&Element>,
    with_defaults: Option<&Element>,
) -> Result<Vec<Element>, NetconfError> {
    let target = parse_datastore_selector(source)?;

    dispatcher.ensure_datastore(session, target).await?;
    dispatcher.maybe_refresh(session, target).await?;
    dispatcher.set_config_only(session, true).await?;

    let filter = parse_filter(filter);
    let paths = compile_filter(&filter, dispatcher.schema(), true)?;
    let items = dispatcher.fetch_all(session, target, &paths).await?;

    let mut tree = DataTree::new();
    for fetched in items {
        tree.insert(&fetched.path, fetched.value, fetched.is_default, dispatcher.schema());
    }

    let mode = parse_with_defaults(with_defaults, dispatcher.config());
    apply_with_defaults(&mut tree, mode, dispatcher.schema(), false);

    Ok(tree.to_xml(dispatcher.schema()))
}
