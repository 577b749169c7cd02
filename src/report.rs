// src/report.rs
// =============================================================================
// Prints a finished crawl.
//
// Formats:
// - flattest: every crawled URL on its own line
// - flat:     every crawled URL, followed by its children indented beneath it
// - json:     the sitemap plus failures and per-page timings
//
// Entries are sorted by URL so two runs over the same site print the same
// thing. The writers take any io::Write, which keeps them testable.
// =============================================================================

use anyhow::Result;
use std::io::{self, Write};
use tracing::info;

use crate::cli::PrintMode;
use crate::crawl::{CrawlReport, Sitemap};

// Prints the report to stdout in the chosen format
pub fn print_report(report: &CrawlReport, mode: PrintMode) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match mode {
        PrintMode::Flattest => write_flattest(&mut out, &report.sitemap)?,
        PrintMode::Flat => write_flat(&mut out, &report.sitemap)?,
        PrintMode::Json => write_json(&mut out, report)?,
    }

    out.flush()?;
    Ok(())
}

pub fn write_flattest<W: Write>(out: &mut W, sitemap: &Sitemap) -> io::Result<()> {
    for parent in sitemap.sorted().keys() {
        writeln!(out, "{}", parent)?;
    }
    Ok(())
}

pub fn write_flat<W: Write>(out: &mut W, sitemap: &Sitemap) -> io::Result<()> {
    for (parent, children) in sitemap.sorted() {
        writeln!(out)?;
        writeln!(out, "{}", parent)?;
        for child in children {
            writeln!(out, "  --> {}", child)?;
        }
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, report: &CrawlReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

// Logs how long each page took, then the crawl as a whole
pub fn log_stats(report: &CrawlReport) {
    for (url, stats) in &report.stats {
        info!(
            url = %url,
            total_ms = stats.total_time.as_millis() as u64,
            fetch_ms = stats.fetch_time.as_millis() as u64,
            "page timing"
        );
    }
    info!(
        pages = report.pages_crawled,
        failures = report.failures.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "crawl timing"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sitemap() -> Sitemap {
        let sitemap = Sitemap::new();
        sitemap.record(
            "https://monzo.com",
            vec![
                "https://monzo.com/about".to_string(),
                "https://monzo.com/blog".to_string(),
            ],
        );
        sitemap.record("https://monzo.com/about", Vec::new());
        sitemap
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_flattest() {
        let output = render(|out| write_flattest(out, &sitemap()));
        assert_eq!(output, "https://monzo.com\nhttps://monzo.com/about\n");
    }

    #[test]
    fn test_flat() {
        let output = render(|out| write_flat(out, &sitemap()));
        assert_eq!(
            output,
            "\nhttps://monzo.com\n  --> https://monzo.com/about\n  --> https://monzo.com/blog\n\
             \nhttps://monzo.com/about\n"
        );
    }

    #[test]
    fn test_empty_sitemap_prints_nothing() {
        assert_eq!(render(|out| write_flattest(out, &Sitemap::new())), "");
        assert_eq!(render(|out| write_flat(out, &Sitemap::new())), "");
    }
}
