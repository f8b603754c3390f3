// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! One free function per RPC (§4.1): each receives the [`super::Dispatcher`]
//! and the calling session, does whatever datastore-selection/lazy-switch/
//! refresh dance §4.1 calls for, and returns a reply tree, an accumulated
//! error list (`edit_config`'s continue-on-error case), or `()`.

mod commit;
mod common;
mod copy_config;
mod delete_config;
mod discard_changes;
mod edit_config;
mod get;
mod get_config;
mod lock_rpc;
mod unlock_rpc;
mod validate;

pub use commit::commit;
pub use copy_config::copy_config;
pub use delete_config::delete_config;
pub use discard_changes::discard_changes;
pub use edit_config::edit_config;
pub use get::get;
pub use get_config::get_config;
pub use lock_rpc::lock;
pub use unlock_rpc::unlock;
pub use validate::validate;
