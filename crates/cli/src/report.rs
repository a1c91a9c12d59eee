//! Report building: reshape a parsed scan into the report view.

use nmapreport_common::{Fingerprinter, Report, ReportHost, ReportPort};
use nmapreport_scan_parser::{Address, Host, NmapRun, Port};
use tracing::debug;

/// Match values that carry no information.
const EMPTY_VALUES: [&str; 2] = ["", "0.0"];

/// Build the report for every host in the scan.
pub fn build_report(scan: &NmapRun, fingerprints: &dyn Fingerprinter) -> Report {
    let mut report = Report::new();
    for host in &scan.hosts {
        report.push_host(build_host(host, fingerprints));
    }
    report
}

fn build_host(host: &Host, fingerprints: &dyn Fingerprinter) -> ReportHost {
    let mut rep_host = ReportHost::new(host.status.state.as_str(), host.status.reason.as_str());

    rep_host.addresses = host.addresses.iter().map(format_address).collect();
    rep_host.hostnames = host
        .hostnames
        .hostnames
        .iter()
        .map(|h| format!("{}:{}", h.kind, h.name))
        .collect();

    // only the best guess is reported
    if let Some(best) = host.os.os_matches.first() {
        rep_host.os.push(format!("{}%: {}", best.accuracy, best.name));
        for class in &best.os_classes {
            push_unique(&mut rep_host.os_types, &class.kind);
        }
    }

    rep_host.ports = host
        .ports
        .ports
        .iter()
        .map(|port| build_port(port, fingerprints))
        .collect();

    rep_host
}

fn build_port(port: &Port, fingerprints: &dyn Fingerprinter) -> ReportPort {
    let rep_port = ReportPort::new(format_banner(port));
    if port.service.service_fp.is_empty() {
        return rep_port;
    }

    let recon = recon_lines(fingerprints, &port.service.service_fp);
    debug!("{}/{}: {} recon value(s)", port.protocol, port.port_id, recon.len());
    rep_port.with_recon(recon)
}

/// `addrtype:vendor:addr`; vendor is empty for anything but MAC addresses.
fn format_address(address: &Address) -> String {
    format!("{}:{}:{}", address.addr_type, address.vendor, address.addr)
}

/// `proto:port state (reason) -- service method (extrainfo)`
fn format_banner(port: &Port) -> String {
    format!(
        "{}:{} {} ({}) -- {} {} ({})",
        port.protocol,
        port.port_id,
        port.state.state,
        port.state.reason,
        port.service.name,
        port.service.method,
        port.service.extra_info
    )
}

/// `database@field:value` for every informative value of every database match.
fn recon_lines(fingerprints: &dyn Fingerprinter, service_fp: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for recon in fingerprints.recon(service_fp) {
        for (key, value) in &recon.values {
            if EMPTY_VALUES.contains(&value.as_str()) {
                continue;
            }
            lines.push(format!("{}@{}:{}", recon.database, key, value));
        }
    }
    lines
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}
