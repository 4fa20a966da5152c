// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Optional PDF download next to the report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::article::{ArticleRecord, EnrichedArticle};
use crate::diagnostics::{Diagnostic, Diagnostics, Stage};
use crate::error::FetchError;
use crate::links::find_pdf_url;
use crate::pacing::Pacer;

// Publisher sites refuse obvious bots.
const USER_AGENTS: [&str; 8] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 12_5_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Fedora; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.3; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0 Safari/537.36",
];

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// `articles_<year>`, relative to the report directory.
pub fn pdf_directory_name(year: u16) -> String {
    format!("articles_{year}")
}

fn pdf_file_name(identifier: &str) -> String {
    format!("{}.pdf", identifier.replace(['/', '\\'], "_"))
}

/// Local PDF path per bibcode, relative to the report directory.
pub type PdfIndex = BTreeMap<String, String>;

pub struct PdfDownloader {
    client: Client,
    report_dir: PathBuf,
    year: u16,
    pacer: Arc<dyn Pacer>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl PdfDownloader {
    pub fn new(
        report_dir: &Path,
        year: u16,
        timeout: Duration,
        pacer: Arc<dyn Pacer>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, FetchError> {
        let user_agent = USER_AGENTS[fastrand::usize(..USER_AGENTS.len())];

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            report_dir: report_dir.to_path_buf(),
            year,
            pacer,
            diagnostics,
        })
    }

    /// Downloads every article that advertises a PDF, one at a time.
    pub async fn download_all(&self, articles: &[EnrichedArticle]) -> PdfIndex {
        let mut index = PdfIndex::new();
        for (i, article) in articles.iter().enumerate() {
            info!(
                "Processing article {}/{}: {} ({})",
                i + 1,
                articles.len(),
                article.record.display_title(),
                article.record.identifier
            );
            if let Some(path) = self.download(&article.record).await {
                index.insert(article.record.identifier.clone(), path);
            }
        }
        index
    }

    /// Relative path of the stored PDF, or `None` when the article has no
    /// usable link or the download failed.
    pub async fn download(&self, record: &ArticleRecord) -> Option<String> {
        let url = find_pdf_url(&record.links, |message| {
            self.record(Stage::Links, &record.identifier, message)
        });
        let Some(url) = url else {
            info!("No PDF URL found for {}", record.identifier);
            return None;
        };

        let relative = format!("{}/{}", pdf_directory_name(self.year), pdf_file_name(&record.identifier));
        let target = self.report_dir.join(&relative);

        let permit = self.pacer.acquire().await;
        info!("Attempting to download PDF for {} from {}", record.identifier, url);
        let outcome = self.fetch(&url, &target).await;
        drop(permit);
        match outcome {
            Ok(bytes) => {
                info!("PDF downloaded for {} ({} bytes)", record.identifier, bytes);
                Some(relative)
            }
            Err(err) => {
                self.record(Stage::Download, &record.identifier, err.to_string());
                None
            }
        }
    }

    async fn fetch(&self, url: &str, target: &Path) -> Result<u64, FetchError> {
        let response = self.client.get(url).header("Accept", ACCEPT).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: format!("final url {}", response.url()),
            });
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Only a complete body is renamed to the final `.pdf` name.
        let partial = target.with_extension("pdf.part");
        match write_body(response, &partial).await {
            Ok(written) => {
                fs::rename(&partial, target).await?;
                Ok(written)
            }
            Err(err) => {
                let _ = fs::remove_file(&partial).await;
                Err(err)
            }
        }
    }

    fn record(&self, stage: Stage, identifier: &str, message: String) {
        self.diagnostics.record(Diagnostic {
            stage,
            subject: identifier.to_string(),
            message,
        });
    }
}

async fn write_body(response: reqwest::Response, path: &Path) -> Result<u64, FetchError> {
    let mut file = File::create(path).await?;
    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
