// runner.rs
use anyhow::{Context, Result};
use nmapreport_common::Fingerprinter;
use nmapreport_fingerprint::FingerprintSet;
use std::path::Path;
use tracing::{debug, info};

use crate::output::render;
use crate::report::build_report;

/// Read, enrich and print the report for `filename`.
pub async fn run_report(filename: &Path, fingerprints: &Path, output_format: &str) -> Result<()> {
    let rendered = render_report(filename, fingerprints, output_format).await?;
    // rendering finished before anything reaches stdout
    println!("{}", rendered);
    Ok(())
}

/// Everything but the final write, so failures never leave partial output.
pub async fn render_report(filename: &Path, fingerprints: &Path, output_format: &str) -> Result<String> {
    info!("Input: {}", filename.display());
    info!("Fingerprints: {}", fingerprints.display());
    info!("Output format: {}", output_format);

    let scan = nmapreport_scan_parser::parse_file(filename)
        .await
        .with_context(|| format!("Failed to read scan {}", filename.display()))?;
    if let Some(scanner) = &scan.scanner {
        debug!("Scanner: {} {}", scanner, scan.version.as_deref().unwrap_or("unknown"));
    }
    if let Some(args) = &scan.args {
        debug!("Scan command: {}", args);
    }
    info!("Found {} host(s)", scan.hosts.len());

    let fingerprint_set = FingerprintSet::load_dir(fingerprints)
        .await
        .with_context(|| format!("Failed to load fingerprints from {}", fingerprints.display()))?;
    info!(
        "Fingerprint databases: {} ({} signature(s))",
        fingerprint_set.len(),
        fingerprint_set.signature_count()
    );

    let report = build_report(&scan, &fingerprint_set);
    let up = report.hosts.iter().filter(|h| h.is_up()).count();
    info!(
        "Report: {} host(s) ({} up), {} port(s)",
        report.host_count(),
        up,
        report.port_count()
    );

    render(&report, output_format).context("Failed to render report")
}
