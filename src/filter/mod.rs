// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

mod compiler;

pub use compiler::{compile_filter, origin_of, Filter, PathOrigin};
