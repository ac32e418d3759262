//! Ingestion command implementations

use crate::controller::{AppController, IngestReport, IngestRequest};
use crate::error::Result;
use crate::progress::spinner;
use std::path::PathBuf;
use tracing::info;

/// Ingest one or more PDF files, one collection per file.
pub async fn cmd_ingest_files(
    controller: &mut AppController,
    files: Vec<PathBuf>,
) -> Result<IngestReport> {
    info!("Ingesting {} file(s)", files.len());
    let bar = spinner("Ingesting files");
    let report = controller.add_source(IngestRequest::Files(files)).await;
    bar.finish_and_clear();
    report
}

/// Ingest pasted or piped text as a single collection.
pub async fn cmd_ingest_text(controller: &mut AppController, text: String) -> Result<IngestReport> {
    let bar = spinner("Ingesting text");
    let report = controller.add_source(IngestRequest::Text(text)).await;
    bar.finish_and_clear();
    report
}

/// Scrape and ingest website links, one collection per link.
pub async fn cmd_ingest_links(
    controller: &mut AppController,
    links: Vec<String>,
) -> Result<IngestReport> {
    info!("Ingesting {} link(s)", links.len());
    let bar = spinner("Scraping websites");
    let report = controller.add_source(IngestRequest::Links(links)).await;
    bar.finish_and_clear();
    report
}

/// Print an ingestion report to the console.
pub fn print_ingest_report(report: &IngestReport) {
    for source in &report.succeeded {
        println!("✓ {} ({})", source.name, source.kind.as_str());
    }
    for (item, error) in &report.failed {
        println!("✗ {}: {}", item, error);
    }
    println!(
        "\n{} source(s) ingested, {} failed, {} chunks written",
        report.succeeded.len(),
        report.failed.len(),
        report.chunks_written
    );
}
