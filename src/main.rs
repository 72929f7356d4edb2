// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (to stderr, so stdout only carries results)
// 2. Parse command-line arguments / environment into a CrawlConfig
// 3. Run the crawl: the seed page plus one hop
// 4. Print the links (plain or JSON), optionally save them to a file
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - the crawl configuration value
mod crawl;    // src/crawl/ - the crawl engine
mod error;    // src/error.rs - CrawlError
mod extract;  // src/extract/ - HTML parsing and link extraction
mod fetch;    // src/fetch/ - HTTP fetching with retries
mod output;   // src/output.rs - rendering and saving results

// anyhow::Result lets run() bubble up any error type with ?
use anyhow::Result;
use clap::Parser;  // Parser trait enables Cli::parse()
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use crawl::Crawler;
use error::CrawlError;

#[tokio::main]
async fn main() {
    // Log level comes from RUST_LOG (e.g. RUST_LOG=debug), "info" otherwise
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Turn the outcome of run() into a process exit code
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole cause chain on one line
            eprintln!("Error: {:#}", e);
            if matches!(e.downcast_ref::<CrawlError>(), Some(err) if err.is_config()) {
                eprintln!("Hint: pass --url <site> or set the URL environment variable");
            }
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    // Handles --help and --version on its own and exits
    let cli = Cli::parse();

    // Grab the output options before into_config() consumes `cli`
    let json = cli.json;
    let save_to = cli.output.clone();

    let crawler = Crawler::new(cli.into_config())?;
    let report = crawler.run().await?;

    // stdout carries only results; logs went to stderr
    if json {
        println!("{}", output::render_json(&report)?);
    } else {
        println!("🔗 Got {} link(s)", report.links.len());
        print!("{}", output::render_plain(&report.links));

        if let Some(provenance) = &report.provenance {
            println!();
            print!("{}", output::render_provenance(provenance));
        }
    }

    // Same list, one link per line, for other tools to pick up
    if let Some(path) = save_to {
        output::write_links(&path, &report.links)?;
        tracing::info!(path = %path.display(), "links saved");
    }

    Ok(())
}
