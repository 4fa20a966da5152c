// Searches ADS for a year's articles naming OHP instruments, verifies each mention per article,
// and writes an HTML report. Requires an ADS API token.

// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ohp_biblio::config::{validate_token, validate_year};
use ohp_biblio::download::{PdfDownloader, PdfIndex};
use ohp_biblio::report::{self, Report};
use ohp_biblio::{AdsApi, DiagnosticLog, IntervalPacer, Pipeline, SearchPlan, Settings, Stage};

// CL arguments, override the config file
#[derive(Parser, Debug)]
#[command(author, version, about = "ADS census of OHP instrument publications", long_about = None)]
struct Args {
    /// Publication year to search for (e.g. 2024)
    year: u32,

    #[arg(long, env = "ADS_API_TOKEN", hide_env_values = true)]
    token: String,

    #[arg(short, long, env = "OHP_BIBLIO_CONFIG")]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    download_pdfs: bool,

    /// Gap between ADS requests in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    #[arg(long)]
    concurrency: Option<usize>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let year = validate_year(args.year)?;
    let token = validate_token(&args.token)?;

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(interval_ms) = args.interval_ms {
        settings.pacing.interval_ms = interval_ms;
    }
    if let Some(concurrency) = args.concurrency {
        settings.pacing.concurrency = concurrency;
    }
    settings.validate()?;

    info!("Year: {}", year);
    info!("Keywords: {}", settings.search.keywords.join(", "));
    match settings.search.venue_filter() {
        Some(venues) => info!("Venues: {}", venues.join(", ")),
        None => info!("Venues: collection:{}", settings.search.collection),
    }
    info!(
        "Pacing: {} ms between requests, {} article(s) at once",
        settings.pacing.interval_ms, settings.pacing.concurrency
    );

    let diagnostics = Arc::new(DiagnosticLog::new());
    let api = Arc::new(
        AdsApi::new(&settings.search.endpoint, token, settings.pacing.request_timeout())
            .context("failed to build ADS client")?,
    );
    let pacer = Arc::new(IntervalPacer::new(settings.pacing.interval()));

    let pipeline = Pipeline::new(api, pacer, diagnostics.clone(), &settings.search)
        .with_concurrency(settings.pacing.concurrency);
    let plan = SearchPlan::from_settings(year, &settings.search);
    let articles = pipeline.run(&plan).await;

    let pdfs = if args.download_pdfs {
        let downloader = PdfDownloader::new(
            &args.output_dir,
            year,
            settings.pacing.request_timeout(),
            Arc::new(IntervalPacer::new(settings.pacing.download_interval())),
            diagnostics.clone(),
        )
        .context("failed to build download client")?;
        downloader.download_all(&articles).await
    } else {
        PdfIndex::new()
    };

    let html = Report::new(year, &settings.facilities).render(&articles, &pdfs);
    let path = report::write_report(&args.output_dir, year, &html)
        .with_context(|| format!("failed to write report to {}", args.output_dir.display()))?;

    let classified = articles.iter().filter(|a| !a.instruments.is_empty()).count();

    println!("\n{}", "=".repeat(64));
    println!("Results");
    println!("{}", "=".repeat(64));
    println!("Total articles: {}", articles.len());
    println!("With confirmed instruments: {}", classified);
    println!("PDFs downloaded: {}", pdfs.len());
    println!(
        "Failed requests: {} (search {}, verify {}, download {})",
        diagnostics.len(),
        diagnostics.count(Stage::Search),
        diagnostics.count(Stage::Verify),
        diagnostics.count(Stage::Download)
    );
    println!("Output: {}\n", path.display());

    Ok(())
}
