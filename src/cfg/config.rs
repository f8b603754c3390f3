// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    /// Which optional capabilities this deployment advertises.
    pub capabilities: CapabilityConfig,
    /// Logging sink configuration, consumed by [`crate::cfg::init_logger`].
    pub logging: LoggingConfig,
    /// Per-session worker tuning.
    pub runtime: RuntimeConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CapabilityConfig {
    #[serde(default = "default_true", rename = "Candidate")]
    pub candidate: bool,
    #[serde(default, rename = "Startup")]
    pub startup: bool,
    #[serde(default = "default_true", rename = "Xpath")]
    pub xpath: bool,
    #[serde(default, rename = "Url")]
    pub url: bool,
    #[serde(default, rename = "UrlSchemes")]
    pub url_schemes: Vec<String>,
    #[serde(default = "default_true", rename = "WithDefaults")]
    pub with_defaults: bool,
    #[serde(rename = "WithDefaultsBasicMode")]
    pub with_defaults_basic_mode: WithDefaultsBasicMode,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WithDefaultsBasicMode {
    ReportAll,
    ReportAllTagged,
    Trim,
    Explicit,
}

impl WithDefaultsBasicMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithDefaultsBasicMode::ReportAll => "report-all",
            WithDefaultsBasicMode::ReportAllTagged => "report-all-tagged",
            WithDefaultsBasicMode::Trim => "trim",
            WithDefaultsBasicMode::Explicit => "explicit",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub output: LogOutput,
    #[serde(default)]
    pub is_show_line: bool,
    #[serde(default)]
    pub is_show_module_path: bool,
    #[serde(default = "default_true")]
    pub is_show_target: bool,
    #[serde(default)]
    pub file: Option<LogFileConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    Stderr,
    File,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFileConfig {
    pub path: String,
    #[serde(default)]
    pub rotation_frequency: Option<RotationFreq>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RotationFreq {
    Minutely,
    Hourly,
    Daily,
    Never,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RuntimeConfig {
    /// External limit on the number of simultaneously tracked NETCONF
    /// sessions.
    #[serde(rename = "MaxSessions")]
    pub max_sessions: u32,
    /// Default timeout handed down to backend I/O calls (§5 "suspension
    /// points"); enforcement itself lives in the (out-of-scope) transport.
    #[serde(rename = "BackendIoTimeout", with = "serde_secs")]
    pub backend_io_timeout: Duration,
}

impl ServerConfig {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: ServerConfig =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        if self.capabilities.url {
            ensure!(
                !self.capabilities.url_schemes.is_empty(),
                "UrlSchemes must list at least one scheme when Url capability is enabled"
            );
        } else if !self.capabilities.url_schemes.is_empty() {
            // Scheme list is meaningless without the capability; drop it so
            // `capabilities::advertised` never has to special-case it.
            self.capabilities.url_schemes.clear();
        }

        ensure!(
            self.runtime.max_sessions >= 1,
            "MaxSessions must be >= 1"
        );

        Ok(())
    }
}

/// Serde helper for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
