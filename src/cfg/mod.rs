//! This module handles configuration and logging.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Resolving configuration file paths.
pub mod cli;
/// Configuration file parsing and management.
pub mod config;
/// Logger initialization.
pub mod logging;

pub use config::{CapabilityConfig, LoggingConfig, ServerConfig, WithDefaultsBasicMode};
pub use logging::init_logger;
