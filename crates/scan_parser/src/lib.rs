//! Scan Parser - nmap XML input
//!
//! Thin layer over `quick-xml`'s serde deserializer: the schema lives in
//! [`model`], this module only checks the document root and maps errors.

pub mod model;

pub use model::{
    Address, Host, Hostname, Hostnames, NmapRun, Os, OsClass, OsMatch, Port, PortState, Ports,
    Service, Status,
};

use nmapreport_common::{ReportError, ReportResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;
use tracing::{debug, info};

const ROOT_ELEMENT: &[u8] = b"nmaprun";

/// Parse raw scan bytes. Invalid UTF-8 is replaced rather than rejected,
/// nmap copies banner bytes into attributes verbatim.
pub fn parse(data: &[u8]) -> ReportResult<NmapRun> {
    let xml = String::from_utf8_lossy(data);
    parse_str(&xml)
}

/// Parse an nmap XML document.
pub fn parse_str(xml: &str) -> ReportResult<NmapRun> {
    check_root(xml)?;
    let run: NmapRun =
        quick_xml::de::from_str(xml).map_err(|e| ReportError::Parse(e.to_string()))?;
    debug!("Parsed {} host(s)", run.hosts.len());
    Ok(run)
}

/// Read and parse a scan file.
pub async fn parse_file(path: impl AsRef<Path>) -> ReportResult<NmapRun> {
    let path = path.as_ref();
    info!("Parsing nmap XML file: {}", path.display());

    let data = tokio::fs::read(path).await?;
    parse(&data)
}

/// The deserializer ignores the root element's name, so any well-formed
/// document would otherwise yield an empty scan.
fn check_root(xml: &str) -> ReportResult<()> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() == ROOT_ELEMENT {
                    return Ok(());
                }
                return Err(ReportError::Parse(format!(
                    "expected <nmaprun> root element, found <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Ok(Event::Eof) => {
                return Err(ReportError::Parse("document has no root element".to_string()));
            }
            Ok(Event::Text(t)) => {
                // trim_text drops whitespace, so anything left is stray content
                return Err(ReportError::Parse(format!(
                    "unexpected text before root element: {}",
                    String::from_utf8_lossy(&t)
                )));
            }
            Ok(_) => {}
            Err(e) => {
                return Err(ReportError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAN: &str = include_str!("../testdata/scan.xml");

    #[test]
    fn test_parse_hosts() {
        let run = parse_str(SCAN).unwrap();
        assert_eq!(run.scanner.as_deref(), Some("nmap"));
        assert_eq!(run.version.as_deref(), Some("7.94"));
        // hosthint is not a host; taskprogress between hosts must not split the list
        assert_eq!(run.hosts.len(), 2);

        let up = &run.hosts[0];
        assert_eq!(up.status.state, "up");
        assert_eq!(up.status.reason, "arp-response");
        assert_eq!(up.addresses.len(), 2);
        assert_eq!(up.addresses[0].addr, "192.168.1.1");
        assert_eq!(up.addresses[0].addr_type, "ipv4");
        assert_eq!(up.addresses[0].vendor, "");
        assert_eq!(up.addresses[1].vendor, "Ubiquiti Networks");

        let names: Vec<_> = up.hostnames.hostnames.iter().map(|h| (h.kind.as_str(), h.name.as_str())).collect();
        assert_eq!(names, vec![("PTR", "router.lan"), ("user", "gw")]);
    }

    #[test]
    fn test_parse_ports_and_services() {
        let run = parse_str(SCAN).unwrap();
        let ports = &run.hosts[0].ports.ports;
        assert_eq!(ports.len(), 2);

        assert_eq!(ports[0].protocol, "tcp");
        assert_eq!(ports[0].port_id, 22);
        assert_eq!(ports[0].state.state, "open");
        assert_eq!(ports[0].state.reason, "syn-ack");
        assert_eq!(ports[0].service.name, "ssh");
        assert_eq!(ports[0].service.method, "probed");
        assert!(ports[0].service.service_fp.contains("SSH-2\\.0-dropbear_2019\\.78"));
        assert!(ports[0].service.service_fp.contains("\"SSH"));

        assert_eq!(ports[1].service.extra_info, "Ubiquiti");
        assert!(ports[1].service.service_fp.is_empty());
    }

    #[test]
    fn test_parse_os_matches() {
        let run = parse_str(SCAN).unwrap();
        let os = &run.hosts[0].os;
        assert_eq!(os.os_matches.len(), 2);
        assert_eq!(os.os_matches[0].name, "Linux 3.2 - 4.9");
        assert_eq!(os.os_matches[0].accuracy, "98");
        let kinds: Vec<_> = os.os_matches[0].os_classes.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["general purpose", "general purpose", "WAP"]);
    }

    #[test]
    fn test_parse_sparse_host() {
        let run = parse_str(SCAN).unwrap();
        let down = &run.hosts[1];
        assert_eq!(down.status.state, "down");
        assert!(down.hostnames.hostnames.is_empty());
        assert!(down.ports.ports.is_empty());
        assert!(down.os.os_matches.is_empty());
    }

    #[test]
    fn test_parse_port_without_service() {
        let xml = r#"<nmaprun><host><status state="up" reason="echo-reply"/>
            <ports><port protocol="udp" portid="161"><state state="open|filtered" reason="no-response"/></port></ports>
            </host></nmaprun>"#;
        let run = parse_str(xml).unwrap();
        let port = &run.hosts[0].ports.ports[0];
        assert_eq!(port.port_id, 161);
        assert_eq!(port.state.state, "open|filtered");
        assert_eq!(port.service.name, "");
        assert_eq!(port.service.service_fp, "");
    }

    #[test]
    fn test_parse_missing_addr_and_portid() {
        let xml = r#"<nmaprun><host><status state="up" reason="user-set"/>
            <address addrtype="ipv4"/>
            <ports><port protocol="tcp"><state state="open" reason="syn-ack"/></port></ports>
            </host></nmaprun>"#;
        let run = parse_str(xml).unwrap();
        let host = &run.hosts[0];
        assert_eq!(host.addresses[0].addr, "");
        assert_eq!(host.addresses[0].addr_type, "ipv4");
        assert_eq!(host.ports.ports[0].port_id, 0);
        assert_eq!(host.ports.ports[0].state.state, "open");
    }

    #[test]
    fn test_parse_empty_run() {
        let run = parse_str("<nmaprun scanner=\"nmap\"></nmaprun>").unwrap();
        assert!(run.hosts.is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(parse_str("").is_err());
        assert!(parse_str("not xml at all").is_err());
        assert!(parse_str("<report><host/></report>").is_err());
        assert!(parse_str("<nmaprun><host><status state=\"up\"></host></nmaprun>").is_err());
    }

    #[test]
    fn test_parse_bytes_lossy() {
        let mut data = b"<nmaprun><host><status state=\"up\" reason=\"".to_vec();
        data.extend_from_slice(&[0xff, 0xfe]);
        data.extend_from_slice(b"\"/></host></nmaprun>");
        let run = parse(&data).unwrap();
        assert_eq!(run.hosts.len(), 1);
        assert_eq!(run.hosts[0].status.state, "up");
    }

    #[tokio::test]
    async fn test_parse_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/scan.xml");
        let run = parse_file(path).await.unwrap();
        assert_eq!(run.hosts.len(), 2);
    }

    #[tokio::test]
    async fn test_parse_missing_file() {
        let err = parse_file("/nonexistent/scan.xml").await.unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
