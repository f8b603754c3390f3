// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

mod applier;

pub use applier::{apply_edit, DefaultOperation, EditOperation, ErrorOption, TestOption};
