// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The external datastore back end boundary (§6 "Backend interface").
//!
//! Everything in here is a trait or a plain data type describing what the
//! dispatcher expects from the (out-of-scope) datastore engine — persistence
//! itself lives on the other side of [`Backend`].

mod backend;

pub use backend::{
    Backend, BackendError, BackendErrorCode, DatastoreSelector, FetchedItem, ItemStream,
    SessionOptions,
};
