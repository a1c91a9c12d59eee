//! Report view types
//!
//! These are built once from a parsed scan and rendered once. Field names
//! serialize in PascalCase so the XML and JSON documents share element names
//! (`Report/Hosts/Ports/Banner` ...). Each list entry becomes one repeated
//! element; empty lists emit nothing.

use serde::Serialize;
use std::collections::BTreeMap;

/// Full report: one entry per scanned host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename = "Report")]
pub struct Report {
    #[serde(rename = "Hosts")]
    pub hosts: Vec<ReportHost>,
}

impl Report {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_host(&mut self, host: ReportHost) {
        self.hosts.push(host);
    }

    #[inline]
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Total ports across every host.
    #[must_use]
    pub fn port_count(&self) -> usize {
        self.hosts.iter().map(|h| h.ports.len()).sum()
    }
}

/// Per-host view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportHost {
    /// `up` / `down`
    pub state: String,
    /// e.g. `arp-response`
    pub status_reason: String,
    /// `addrtype:vendor:addr`
    pub addresses: Vec<String>,
    /// `type:name`
    pub hostnames: Vec<String>,
    /// Best OS guess, `accuracy%: name`. At most one entry.
    pub os: Vec<String>,
    /// Distinct OS class types of the best guess ("general purpose", "phone").
    pub os_types: Vec<String>,
    pub ports: Vec<ReportPort>,
}

impl ReportHost {
    #[inline]
    #[must_use]
    pub fn new<S: Into<String>, R: Into<String>>(state: S, status_reason: R) -> Self {
        Self {
            state: state.into(),
            status_reason: status_reason.into(),
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.state == "up"
    }
}

/// Per-port view: formatted banner plus derived attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportPort {
    pub banner: String,
    /// `database@field:value`
    pub recon: Vec<String>,
}

impl ReportPort {
    #[inline]
    #[must_use]
    pub fn new<S: Into<String>>(banner: S) -> Self {
        Self {
            banner: banner.into(),
            recon: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_recon(mut self, recon: Vec<String>) -> Self {
        self.recon = recon;
        self
    }
}

/// First match of one fingerprint database against one banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconMatch {
    /// Database key, the fingerprint file name (`ssh_banners.xml`).
    pub database: String,
    /// Extracted values, sorted by field name.
    pub values: BTreeMap<String, String>,
}

impl ReconMatch {
    #[inline]
    #[must_use]
    pub fn new<S: Into<String>>(database: S, values: BTreeMap<String, String>) -> Self {
        Self {
            database: database.into(),
            values,
        }
    }
}
