// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Capability URN assembly (§6 "Capabilities advertised").
//!
//! The transport layer owns the `<hello>` exchange; this just gives it a
//! single ready-to-use list so the basic-mode/also-supported parameters of
//! `:with-defaults` (RFC 6243 §4.4) aren't re-derived at the call site.

use crate::cfg::ServerConfig;

const BASE_1_0: &str = "urn:ietf:params:netconf:base:1.0";
const BASE_1_1: &str = "urn:ietf:params:netconf:base:1.1";
const CANDIDATE: &str = "urn:ietf:params:netconf:capability:candidate:1.0";
const VALIDATE_1_1: &str = "urn:ietf:params:netconf:capability:validate:1.1";
const STARTUP: &str = "urn:ietf:params:netconf:capability:startup:1.0";
const XPATH: &str = "urn:ietf:params:netconf:capability:xpath:1.0";
const URL: &str = "urn:ietf:params:netconf:capability:url:1.0";
const WITH_DEFAULTS: &str = "urn:ietf:params:netconf:capability:with-defaults:1.0";

/// Builds the exact set of capability URNs to advertise for `cfg`.
pub fn advertised(cfg: &ServerConfig) -> Vec<String> {
    let mut caps = vec![BASE_1_0.to_string(), BASE_1_1.to_string()];

    if cfg.capabilities.candidate {
        caps.push(CANDIDATE.to_string());
        caps.push(VALIDATE_1_1.to_string());
    }
    if cfg.capabilities.startup {
        caps.push(STARTUP.to_string());
    }
    if cfg.capabilities.xpath {
        caps.push(XPATH.to_string());
    }
    if cfg.capabilities.with_defaults {
        let basic = cfg.capabilities.with_defaults_basic_mode.as_str();
        let also_supported = ["report-all", "report-all-tagged", "trim", "explicit"]
            .iter()
            .filter(|m| **m != basic)
            .copied()
            .collect::<Vec<_>>()
            .join(",");
        caps.push(format!(
            "{WITH_DEFAULTS}?basic-mode={basic}&also-supported={also_supported}"
        ));
    }
    if cfg.capabilities.url {
        let schemes = cfg.capabilities.url_schemes.join(",");
        caps.push(format!("{URL}?scheme={schemes}"));
    }

    caps
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cfg::{CapabilityConfig, LoggingConfig, WithDefaultsBasicMode};
    use crate::cfg::config::{LogOutput, RuntimeConfig};

    fn base_config() -> ServerConfig {
        ServerConfig {
            capabilities: CapabilityConfig {
                candidate: true,
                startup: true,
                xpath: true,
                url: true,
                url_schemes: vec!["file".into(), "http".into()],
                with_defaults: true,
                with_defaults_basic_mode: WithDefaultsBasicMode::Trim,
            },
            logging: LoggingConfig {
                level: "info".into(),
                output: LogOutput::Stdout,
                is_show_line: false,
                is_show_module_path: false,
                is_show_target: true,
                file: None,
            },
            runtime: RuntimeConfig {
                max_sessions: 16,
                backend_io_timeout: Duration::from_secs(5),
            },
        }
    }

    #[test]
    fn advertises_with_defaults_basic_mode_and_also_supported() {
        let cfg = base_config();
        let caps = advertised(&cfg);
        let wd = caps
            .iter()
            .find(|c| c.starts_with("urn:ietf:params:netconf:capability:with-defaults"))
            .expect("with-defaults capability present");
        assert!(wd.contains("basic-mode=trim"));
        assert!(wd.contains("report-all"));
        assert!(!wd.contains("basic-mode=report-all&"));
    }

    #[test]
    fn omits_optional_capabilities_when_disabled() {
        let mut cfg = base_config();
        cfg.capabilities.candidate = false;
        cfg.capabilities.startup = false;
        cfg.capabilities.xpath = false;
        cfg.capabilities.url = false;
        cfg.capabilities.with_defaults = false;

        let caps = advertised(&cfg);
        assert_eq!(caps, vec![BASE_1_0.to_string(), BASE_1_1.to_string()]);
    }
}
