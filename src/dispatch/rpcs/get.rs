// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! `<get>` (§4.1: "`get` always targets running+state").

use super::common::{parse_filter, parse_with_defaults};
use crate::{
    datastore::DatastoreSelector,
    dispatch::Dispatcher,
    error::NetconfError,
    filter::compile_filter,
    session::SessionState,
    tree::{apply_with_defaults, DataTree},
    xml::Element,
};

pub async fn get(
    dispatcher: &Dispatcher,
    session: &SessionState,
    filter: Option<&Element>,
    with_defaults: Option<&Element>,
) -> Result<Vec<Element>, NetconfError> {
    dispatcher.ensure_datastore(session, DatastoreSelector::Running).await?;
    dispatcher.maybe_refresh(session, DatastoreSelector::Running).await?;
    dispatcher.set_config_only(session, false).await?;

    let filter = parse_filter(filter);
    let paths = compile_filter(&filter, dispatcher.schema(), false)?;
    let items = dispatcher.fetch_all(session, DatastoreSelector::Running, &paths).await?;

    let mut tree = DataTree::new();
    for fetched in items {
        tree.insert(&fetched.path, fetched.value, fetched.is_default, dispatcher.schema());
    }

    let mode = parse_with_defaults(with_defaults, dispatcher.config());
    apply_with_defaults(&mut tree, mode, dispatcher.schema(), false);

    Ok(tree.to_xml(dispatcher.schema()))
}
