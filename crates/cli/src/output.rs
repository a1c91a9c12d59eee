//! Output formatting for reports
//!
//! XML element lines carry a two-space prefix ahead of the four-space
//! nesting indent, the layout of Go's `xml.MarshalIndent(v, "  ", "    ")`
//! that existing consumers of the report already parse.

use nmapreport_common::{Report, ReportError, ReportHost, ReportResult};
use serde::Serialize;
use tracing::warn;

const INDENT: &str = "    ";
const XML_PREFIX: &str = "  ";

/// Render the report in the specified format
pub fn render(report: &Report, format: &str) -> ReportResult<String> {
    // Normalize format string
    let format = format.trim().to_lowercase();
    match format.as_str() {
        "xml" | "x" | "" => render_xml(report),
        "text" | "t" => Ok(render_text(report)),
        "json" | "j" => render_json(report),
        _ => {
            warn!("Unknown format '{}', using default xml format", format);
            render_xml(report)
        }
    }
}

fn render_xml(report: &Report) -> ReportResult<String> {
    let mut buffer = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', INDENT.len());
    report
        .serialize(serializer)
        .map_err(|e| ReportError::Format(e.to_string()))?;

    // escaped text never starts with '<', so continuation lines of
    // multi-line values are left as they are
    let prefixed = buffer
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('<') {
                format!("{XML_PREFIX}{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(prefixed)
}

fn render_json(report: &Report) -> ReportResult<String> {
    serde_json::to_string_pretty(report).map_err(|e| ReportError::Format(e.to_string()))
}

/// Indented plain text, one block per host.
fn render_text(report: &Report) -> String {
    if report.hosts.is_empty() {
        return "No hosts in report.".to_string();
    }

    report
        .hosts
        .iter()
        .map(render_text_host)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_text_host(host: &ReportHost) -> String {
    let mut lines = vec![format!("Host {} ({})", host.state, host.status_reason)];

    lines.extend(host.addresses.iter().map(|a| format!("{INDENT}Address: {a}")));
    lines.extend(host.hostnames.iter().map(|h| format!("{INDENT}Hostname: {h}")));
    lines.extend(host.os.iter().map(|o| format!("{INDENT}OS: {o}")));
    lines.extend(host.os_types.iter().map(|t| format!("{INDENT}OS type: {t}")));

    for port in &host.ports {
        lines.push(format!("{INDENT}Port: {}", port.banner));
        lines.extend(port.recon.iter().map(|r| format!("{INDENT}{INDENT}Recon: {r}")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmapreport_common::ReportPort;

    fn sample_report() -> Report {
        let mut host = ReportHost::new("up", "arp-response");
        host.addresses.push("ipv4::10.0.0.5".to_string());
        host.hostnames.push("PTR:pi.lan".to_string());
        host.os.push("95%: Linux 4.15 - 5.8".to_string());
        host.os_types.push("general purpose".to_string());
        host.ports.push(
            ReportPort::new("tcp:22 open (syn-ack) -- ssh probed ()")
                .with_recon(vec!["ssh_banners.xml@service.product:Dropbear SSH".to_string()]),
        );
        host.ports.push(ReportPort::new("tcp:80 open (syn-ack) -- http probed (<b>&co)"));

        let mut down = ReportHost::new("down", "no-response");
        down.addresses.push("ipv4::10.0.0.6".to_string());

        Report { hosts: vec![host, down] }
    }

    #[test]
    fn test_render_xml() {
        let xml = render(&sample_report(), "xml").unwrap();
        assert!(xml.starts_with("  <Report>\n"));
        assert!(xml.trim_end().ends_with("</Report>"));
        assert_eq!(xml.matches("<Hosts>").count(), 2);
        assert!(xml.contains("<State>up</State>"));
        assert!(xml.contains("<StatusReason>arp-response</StatusReason>"));
        assert!(xml.contains("<Addresses>ipv4::10.0.0.5</Addresses>"));
        assert!(xml.contains("<Hostnames>PTR:pi.lan</Hostnames>"));
        assert!(xml.contains("<Os>95%: Linux 4.15 - 5.8</Os>"));
        assert!(xml.contains("<OsTypes>general purpose</OsTypes>"));
        assert!(xml.contains("<Banner>tcp:22 open (syn-ack) -- ssh probed ()</Banner>"));
        assert!(xml.contains("<Recon>ssh_banners.xml@service.product:Dropbear SSH</Recon>"));
        assert!(xml.contains("&lt;b"));
        assert!(xml.contains("&amp;co"));
        // prefix plus indented children
        assert!(xml.contains("\n      <Hosts>"));
        assert!(xml.contains("\n          <State>up</State>"));
        assert!(xml.ends_with("\n  </Report>"));
        assert!(xml.lines().all(|line| line.starts_with(XML_PREFIX)));
    }

    #[test]
    fn test_render_xml_multiline_value_not_prefixed() {
        let mut host = ReportHost::new("up", "syn-ack");
        host.ports.push(
            ReportPort::new("tcp:25 open (syn-ack) -- smtp probed ()")
                .with_recon(vec!["smtp.xml@service.banner:220 ready\n<b>hello".to_string()]),
        );
        let xml = render(&Report { hosts: vec![host] }, "xml").unwrap();
        assert!(xml.contains("\n&lt;b"));
        assert!(xml.contains("hello</Recon>"));
        assert!(xml.contains("\n              <Recon>smtp.xml@service.banner:220 ready\n"));
    }

    #[test]
    fn test_render_xml_omits_empty_lists() {
        let report = Report { hosts: vec![ReportHost::new("down", "no-response")] };
        let xml = render(&report, "x").unwrap();
        assert!(!xml.contains("<Ports>"));
        assert!(!xml.contains("<Recon>"));
        assert!(!xml.contains("<Addresses>"));
    }

    #[test]
    fn test_render_text() {
        let text = render(&sample_report(), "text").unwrap();
        let expected = "\
Host up (arp-response)
    Address: ipv4::10.0.0.5
    Hostname: PTR:pi.lan
    OS: 95%: Linux 4.15 - 5.8
    OS type: general purpose
    Port: tcp:22 open (syn-ack) -- ssh probed ()
        Recon: ssh_banners.xml@service.product:Dropbear SSH
    Port: tcp:80 open (syn-ack) -- http probed (<b>&co)

Host down (no-response)
    Address: ipv4::10.0.0.6";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_json() {
        let json = render(&sample_report(), " JSON ").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Hosts"].as_array().unwrap().len(), 2);
        assert_eq!(value["Hosts"][0]["Ports"][0]["Recon"][0], "ssh_banners.xml@service.product:Dropbear SSH");
        assert_eq!(value["Hosts"][1]["State"], "down");
    }

    #[test]
    fn test_unknown_format_falls_back_to_xml() {
        let report = sample_report();
        assert_eq!(render(&report, "yaml").unwrap(), render(&report, "xml").unwrap());
        assert_eq!(render(&report, "").unwrap(), render(&report, "xml").unwrap());
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new();
        assert_eq!(render(&report, "text").unwrap(), "No hosts in report.");
        assert!(render(&report, "xml").unwrap().contains("Report"));
        let value: serde_json::Value = serde_json::from_str(&render(&report, "json").unwrap()).unwrap();
        assert_eq!(value["Hosts"].as_array().unwrap().len(), 0);
    }
}
