//! Partial nmap XML schema.
//!
//! Only the elements the report consumes are modelled. Everything else in
//! the document (`scaninfo`, `hosthint`, `times`, `extraports`, ...) is
//! skipped by the deserializer. Missing optional pieces default to empty
//! values so a sparse host still produces a row.

use serde::Deserialize;

/// `<nmaprun>` root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NmapRun {
    #[serde(rename = "@scanner", default)]
    pub scanner: Option<String>,
    #[serde(rename = "@args", default)]
    pub args: Option<String>,
    #[serde(rename = "@version", default)]
    pub version: Option<String>,
    #[serde(rename = "host", default)]
    pub hosts: Vec<Host>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub status: Status,
    #[serde(rename = "address", default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub hostnames: Hostnames,
    #[serde(default)]
    pub ports: Ports,
    #[serde(default)]
    pub os: Os,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@reason", default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    #[serde(rename = "@addr", default)]
    pub addr: String,
    #[serde(rename = "@addrtype", default)]
    pub addr_type: String,
    #[serde(rename = "@vendor", default)]
    pub vendor: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hostnames {
    #[serde(rename = "hostname", default)]
    pub hostnames: Vec<Hostname>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hostname {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ports {
    #[serde(rename = "port", default)]
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Port {
    #[serde(rename = "@protocol", default)]
    pub protocol: String,
    #[serde(rename = "@portid", default)]
    pub port_id: u16,
    #[serde(default)]
    pub state: PortState,
    #[serde(default)]
    pub service: Service,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortState {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@reason", default)]
    pub reason: String,
}

/// `<service>`; `servicefp` carries the raw responses nmap could not
/// identify and is what the fingerprint databases are matched against.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Service {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@method", default)]
    pub method: String,
    #[serde(rename = "@extrainfo", default)]
    pub extra_info: String,
    #[serde(rename = "@servicefp", default)]
    pub service_fp: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Os {
    #[serde(rename = "osmatch", default)]
    pub os_matches: Vec<OsMatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsMatch {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@accuracy", default)]
    pub accuracy: String,
    #[serde(rename = "osclass", default)]
    pub os_classes: Vec<OsClass>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsClass {
    #[serde(rename = "@type", default)]
    pub kind: String,
}
