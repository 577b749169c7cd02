// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Validate the seed URL and build the crawl settings
// 4. Crawl the site until no page is left to visit
// 5. Print the sitemap
// 6. Exit with proper code (0 = crawl completed, 2 = error)
//
// A crawl that could not reach some pages still completes: those pages are
// logged and left out of the sitemap, they don't change the exit code.
// =============================================================================

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method

// Everything except argument dispatch lives in the library (src/lib.rs)
use site_mapper::cli::Cli;
use site_mapper::{crawl, logging, report};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Logging may not be set up yet, so this goes straight to stderr
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl completed and was printed
//   Err   = bad seed URL, HTTP client setup, or output failure
async fn run() -> Result<i32> {
    // An unknown --print-mode makes clap exit with status 2 right here
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.crawl_config()?;
    let report = crawl::crawl_site(config).await?;

    if cli.verbose {
        report::log_stats(&report);
    }

    report::print_report(&report, cli.print_mode)?;

    tracing::info!("crawler done");
    Ok(0)
}
