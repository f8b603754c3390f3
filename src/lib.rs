// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Translation core for a NETCONF (RFC 6241) server: takes already-parsed
//! request XML from a transport layer (out of scope, §1) and drives it
//! against a generic external datastore back end (§6) through [`dispatch`].

pub mod capabilities;
pub mod cfg;
pub mod datastore;
pub mod dispatch;
pub mod edit;
pub mod error;
pub mod filter;
pub mod schema;
pub mod session;
pub mod state_providers;
pub mod tree;
pub mod value;
pub mod xml;
