// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! ADS search API access and the bulk candidate search.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::article::{ArticleRecord, Keyword};
use crate::diagnostics::{Diagnostic, Diagnostics, Stage};
use crate::error::FetchError;
use crate::query::{Query, SearchRequest};

pub const ADS_QUERY_ENDPOINT: &str = "https://api.adsabs.harvard.edu/v1/search/query";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchEnvelope {
    pub response: SearchResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "numFound")]
    pub num_found: Option<u64>,
    #[serde(default)]
    pub docs: Vec<ArticleRecord>,
}

/// One round trip to the search service.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn query(&self, request: &SearchRequest) -> Result<SearchEnvelope, FetchError>;
}

/// `SearchApi` over HTTP with a bearer token.
pub struct AdsApi {
    client: Client,
    endpoint: String,
    token: String,
}

impl AdsApi {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("ohp_biblio/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl SearchApi for AdsApi {
    async fn query(&self, request: &SearchRequest) -> Result<SearchEnvelope, FetchError> {
        debug!(q = %request.q, rows = request.rows, "ADS query");

        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .query(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Issues the single bulk query of a run.
pub struct SearchClient {
    api: Arc<dyn SearchApi>,
    diagnostics: Arc<dyn Diagnostics>,
    collection: String,
}

impl SearchClient {
    pub fn new(api: Arc<dyn SearchApi>, diagnostics: Arc<dyn Diagnostics>, collection: impl Into<String>) -> Self {
        Self {
            api,
            diagnostics,
            collection: collection.into(),
        }
    }

    /// Candidate articles for `year`. Any failure yields an empty list and a
    /// diagnostic, so callers cannot tell "no match" from "ADS was down".
    pub async fn fetch_candidates(
        &self,
        year: u16,
        keywords: &[Keyword],
        venues: Option<&[String]>,
    ) -> Vec<ArticleRecord> {
        let query = Query::bulk(year, keywords, venues, &self.collection);
        info!("Querying ADS: {}", query);

        match self.api.query(&SearchRequest::bulk(&query)).await {
            Ok(envelope) => {
                let docs = envelope.response.docs;
                info!("Found {} articles containing at least one instrument", docs.len());
                docs
            }
            Err(err) => {
                self.diagnostics.record(Diagnostic {
                    stage: Stage::Search,
                    subject: format!("year {year}"),
                    message: err.to_string(),
                });
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLog;
    use serde_json::json;
    use std::sync::Mutex;

    struct Canned {
        reply: fn() -> Result<SearchEnvelope, FetchError>,
        seen: Mutex<Vec<SearchRequest>>,
    }

    #[async_trait]
    impl SearchApi for Canned {
        async fn query(&self, request: &SearchRequest) -> Result<SearchEnvelope, FetchError> {
            self.seen.lock().unwrap().push(request.clone());
            (self.reply)()
        }
    }

    fn client(reply: fn() -> Result<SearchEnvelope, FetchError>) -> (SearchClient, Arc<Canned>, Arc<DiagnosticLog>) {
        let api = Arc::new(Canned { reply, seen: Mutex::new(Vec::new()) });
        let log = Arc::new(DiagnosticLog::new());
        (SearchClient::new(api.clone(), log.clone(), "astronomy"), api, log)
    }

    #[tokio::test]
    async fn returns_docs_from_envelope() {
        let (client, api, log) = client(|| {
            Ok(serde_json::from_value(json!({
                "response": {"numFound": 2, "docs": [{"bibcode": "A"}, {"bibcode": "B"}]}
            }))
            .unwrap())
        });
        let venues = vec!["A&A".to_string()];
        let docs = client.fetch_candidates(2022, &["SOPHIE".to_string()], Some(venues.as_slice())).await;

        assert_eq!(docs.iter().map(|d| d.identifier.as_str()).collect::<Vec<_>>(), ["A", "B"]);
        assert!(log.is_empty());
        let seen = api.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].q.ends_with("AND (bibstem:\"A&A\")"));
        assert_eq!(seen[0].rows, 2000);
    }

    #[tokio::test]
    async fn http_failure_degrades_to_empty() {
        let (client, _, log) = client(|| {
            Err(FetchError::Status {
                status: 500,
                body: "Internal Server Error".into(),
            })
        });
        let docs = client.fetch_candidates(2022, &["SOPHIE".to_string()], None).await;

        assert!(docs.is_empty());
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stage, Stage::Search);
        assert_eq!(entries[0].subject, "year 2022");
        assert!(entries[0].message.contains("500"));
    }

    #[test]
    fn envelope_without_response_is_malformed() {
        let parsed = serde_json::from_str::<SearchEnvelope>(r#"{"error": "unauthorized"}"#);
        assert!(parsed.is_err());
    }
}
