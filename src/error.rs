// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The single error type that crosses the dispatcher boundary (§7).
//!
//! Internal plumbing (filter compiler, tree assembler) is free to use
//! `anyhow` for its own bookkeeping; every path that can reach a NETCONF
//! client converts into a [`NetconfError`] so the NETCONF error-tag is
//! never re-derived from a loose string at the last moment.

use std::fmt;

use thiserror::Error;

use crate::datastore::{BackendError, BackendErrorCode};

/// NETCONF `rpc-error` application tags this core can raise (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTag {
    OperationFailed,
    OperationNotSupported,
    InvalidValue,
    DataExists,
    DataMissing,
    LockDenied,
    AccessDenied,
    ResourceDenied,
}

impl ErrorTag {
    /// The `error-tag` string as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorTag::OperationFailed => "operation-failed",
            ErrorTag::OperationNotSupported => "operation-not-supported",
            ErrorTag::InvalidValue => "invalid-value",
            ErrorTag::DataExists => "data-exists",
            ErrorTag::DataMissing => "data-missing",
            ErrorTag::LockDenied => "lock-denied",
            ErrorTag::AccessDenied => "access-denied",
            ErrorTag::ResourceDenied => "resource-denied",
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single NETCONF `rpc-error`, carrying enough structure that a
/// transport can render it without re-deriving the tag from text.
#[derive(Debug, Clone, Error)]
#[error("{tag}: {message}")]
pub struct NetconfError {
    pub tag: ErrorTag,
    /// Instance-identifier or other locator the error applies to, if any.
    pub path: Option<String>,
    pub message: String,
    /// Extra `<error-info>` key/value pairs.
    pub info: Vec<(String, String)>,
}

impl NetconfError {
    pub fn new(tag: ErrorTag, message: impl Into<String>) -> Self {
        Self {
            tag,
            path: None,
            message: message.into(),
            info: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.push((key.into(), value.into()));
        self
    }

    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorTag::OperationFailed, message)
    }

    pub fn operation_not_supported(message: impl Into<String>) -> Self {
        Self::new(ErrorTag::OperationNotSupported, message)
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorTag::InvalidValue, message)
    }

    pub fn data_exists(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(ErrorTag::DataExists, format!("data already exists: {path}")).with_path(path)
    }

    pub fn data_missing(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(ErrorTag::DataMissing, format!("data does not exist: {path}")).with_path(path)
    }

    pub fn lock_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorTag::LockDenied, message)
    }

    pub fn access_denied(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(ErrorTag::AccessDenied, format!("execution denied: {path}")).with_path(path)
    }

    pub fn resource_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorTag::ResourceDenied, message)
    }
}

impl From<BackendError> for NetconfError {
    fn from(e: BackendError) -> Self {
        match e.code {
            BackendErrorCode::DataExists => NetconfError::new(ErrorTag::DataExists, e.message),
            BackendErrorCode::DataMissing => NetconfError::new(ErrorTag::DataMissing, e.message),
            BackendErrorCode::ValidationFailed => {
                NetconfError::new(ErrorTag::OperationFailed, e.message)
            },
            BackendErrorCode::UnknownModel => {
                NetconfError::new(ErrorTag::InvalidValue, e.message)
            },
            BackendErrorCode::NotFound => NetconfError::new(ErrorTag::DataMissing, e.message),
            BackendErrorCode::Ok | BackendErrorCode::Other => {
                NetconfError::new(ErrorTag::OperationFailed, e.message)
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, NetconfError>;
