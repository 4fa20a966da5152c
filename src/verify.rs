// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Per-article keyword confirmation.
//!
//! The bulk search matches any keyword anywhere, so each keyword is checked
//! again with a query scoped to the article's bibcode. That is one request
//! per keyword per article, paced, and it dominates the run time.

use std::sync::Arc;

use tracing::{debug, info};

use crate::article::{ConfirmedKeywords, Keyword};
use crate::diagnostics::{Diagnostic, Diagnostics, Stage};
use crate::error::FetchError;
use crate::pacing::Pacer;
use crate::query::{Query, SearchRequest};
use crate::search::SearchApi;

pub struct KeywordVerifier {
    api: Arc<dyn SearchApi>,
    pacer: Arc<dyn Pacer>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl KeywordVerifier {
    pub fn new(api: Arc<dyn SearchApi>, pacer: Arc<dyn Pacer>, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            api,
            pacer,
            diagnostics,
        }
    }

    /// Keywords of `keywords` that ADS finds in the article, in input order.
    /// Failed checks count as not confirmed and are never retried.
    pub async fn verify(&self, article_id: &str, keywords: &[Keyword]) -> ConfirmedKeywords {
        info!("Verifying instruments for article {}", article_id);
        let mut confirmed = ConfirmedKeywords::new();

        for keyword in keywords {
            let permit = self.pacer.acquire().await;
            let outcome = self.confirm(article_id, keyword).await;
            drop(permit);
            match outcome {
                Ok(true) => {
                    confirmed.insert(keyword.as_str());
                }
                Ok(false) => debug!("Keyword '{}' not found for {}", keyword, article_id),
                Err(err) => self.diagnostics.record(Diagnostic {
                    stage: Stage::Verify,
                    subject: format!("{article_id}/{keyword}"),
                    message: err.to_string(),
                }),
            }
        }

        info!(
            "Instruments found for {}: {:?}",
            article_id,
            confirmed.iter().collect::<Vec<_>>()
        );
        confirmed
    }

    async fn confirm(&self, article_id: &str, keyword: &str) -> Result<bool, FetchError> {
        let request = SearchRequest::confirmation(&Query::confirmation(article_id, keyword));
        let envelope = self.api.query(&request).await?;
        envelope
            .response
            .num_found
            .map(|found| found > 0)
            .ok_or_else(|| FetchError::Malformed("response.numFound missing".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLog;
    use crate::pacing::{IntervalPacer, NoPacing};
    use crate::search::SearchEnvelope;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Answers confirmation queries from a fixed keyword list; `FAIL` and
    /// `BROKEN` simulate an HTTP error and a body without numFound.
    struct Mentions(&'static [&'static str]);

    #[async_trait]
    impl SearchApi for Mentions {
        async fn query(&self, request: &SearchRequest) -> Result<SearchEnvelope, FetchError> {
            if request.q.contains("title:\"FAIL\"") {
                return Err(FetchError::Status { status: 503, body: String::new() });
            }
            if request.q.contains("title:\"BROKEN\"") {
                return Ok(serde_json::from_value(json!({"response": {"docs": []}})).unwrap());
            }
            let found = self
                .0
                .iter()
                .any(|kw| request.q.contains(&format!("title:\"{kw}\"")));
            Ok(serde_json::from_value(json!({"response": {"numFound": u64::from(found)}})).unwrap())
        }
    }

    fn keywords(list: &[&str]) -> Vec<Keyword> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn confirms_subset_in_input_order() {
        let log = Arc::new(DiagnosticLog::new());
        let verifier = KeywordVerifier::new(Arc::new(Mentions(&["OHP", "SOPHIE"])), Arc::new(NoPacing), log.clone());

        let confirmed = verifier
            .verify("2022A&A...1X", &keywords(&["ELODIE", "SOPHIE", "OHP"]))
            .await;

        assert_eq!(confirmed.iter().collect::<Vec<_>>(), ["SOPHIE", "OHP"]);
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn failures_count_as_unconfirmed() {
        let log = Arc::new(DiagnosticLog::new());
        let verifier = KeywordVerifier::new(Arc::new(Mentions(&["SOPHIE"])), Arc::new(NoPacing), log.clone());

        let confirmed = verifier
            .verify("2022A&A...1X", &keywords(&["FAIL", "SOPHIE", "BROKEN"]))
            .await;

        assert_eq!(confirmed.iter().collect::<Vec<_>>(), ["SOPHIE"]);
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|d| d.stage == Stage::Verify));
        assert_eq!(entries[0].subject, "2022A&A...1X/FAIL");
        assert!(entries[1].message.contains("numFound"));
    }

    #[tokio::test]
    async fn repeated_verification_is_stable() {
        let verifier = KeywordVerifier::new(
            Arc::new(Mentions(&["ELODIE", "SOPHIE"])),
            Arc::new(NoPacing),
            Arc::new(DiagnosticLog::new()),
        );
        let list = keywords(&["SOPHIE", "ELODIE", "OHP"]);
        let first = verifier.verify("X", &list).await;
        let second = verifier.verify("X", &list).await;
        assert_eq!(first, second);
    }

    /// Takes `latency` to answer and records when each query ran.
    struct Sluggish {
        latency: Duration,
        spans: Mutex<Vec<(Instant, Instant)>>,
    }

    #[async_trait]
    impl SearchApi for Sluggish {
        async fn query(&self, _request: &SearchRequest) -> Result<SearchEnvelope, FetchError> {
            let start = Instant::now();
            tokio::time::sleep(self.latency).await;
            self.spans.lock().unwrap().push((start, Instant::now()));
            Ok(serde_json::from_value(json!({"response": {"numFound": 1}})).unwrap())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_answers_still_get_the_full_interval() {
        let api = Arc::new(Sluggish {
            latency: Duration::from_secs(1),
            spans: Mutex::new(Vec::new()),
        });
        let verifier = KeywordVerifier::new(
            api.clone(),
            Arc::new(IntervalPacer::new(Duration::from_secs(1))),
            Arc::new(DiagnosticLog::new()),
        );

        let confirmed = verifier.verify("X", &keywords(&["SOPHIE", "ELODIE", "OHP"])).await;

        assert_eq!(confirmed.len(), 3);
        let spans = api.spans.lock().unwrap();
        assert_eq!(spans.len(), 3);
        for pair in spans.windows(2) {
            let (_, previous_end) = pair[0];
            let (next_start, _) = pair[1];
            assert!(next_start - previous_end >= Duration::from_secs(1));
        }
    }
}
