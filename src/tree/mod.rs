// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

mod assembler;
mod with_defaults;

pub use assembler::{DataTree, Node};
pub use with_defaults::{apply_with_defaults, WithDefaultsMode};
