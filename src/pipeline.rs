// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Search, verify, classify.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::article::{ArticleRecord, EnrichedArticle, InstrumentList, Keyword};
use crate::classify::InstrumentClassifier;
use crate::config::SearchSettings;
use crate::diagnostics::{Diagnostic, Diagnostics, Stage};
use crate::pacing::Pacer;
use crate::search::{SearchApi, SearchClient};
use crate::verify::KeywordVerifier;

/// What to look for in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub year: u16,
    pub keywords: Vec<Keyword>,
    pub venues: Option<Vec<String>>,
}

impl SearchPlan {
    pub fn new(year: u16, keywords: Vec<Keyword>) -> Self {
        Self {
            year,
            keywords,
            venues: None,
        }
    }

    pub fn with_venues(mut self, venues: Vec<String>) -> Self {
        self.venues = if venues.is_empty() { None } else { Some(venues) };
        self
    }

    pub fn from_settings(year: u16, search: &SearchSettings) -> Self {
        Self::new(year, search.keywords.clone()).with_venues(search.venues.clone())
    }
}

pub struct Pipeline {
    search: SearchClient,
    verifier: KeywordVerifier,
    classifier: InstrumentClassifier,
    diagnostics: Arc<dyn Diagnostics>,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(
        api: Arc<dyn SearchApi>,
        pacer: Arc<dyn Pacer>,
        diagnostics: Arc<dyn Diagnostics>,
        search: &SearchSettings,
    ) -> Self {
        Self {
            search: SearchClient::new(api.clone(), diagnostics.clone(), search.collection.clone()),
            verifier: KeywordVerifier::new(api, pacer, diagnostics.clone()),
            classifier: InstrumentClassifier::new(search.fallback_keyword.clone()),
            diagnostics,
            concurrency: 1,
        }
    }

    /// Articles verified at once. They all share one pacer, so ADS still sees
    /// a single request at a time.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Enriched articles in the order the bulk search returned them.
    pub async fn run(&self, plan: &SearchPlan) -> Vec<EnrichedArticle> {
        let candidates = self
            .search
            .fetch_candidates(plan.year, &plan.keywords, plan.venues.as_deref())
            .await;
        let total = candidates.len();
        let keywords = plan.keywords.as_slice();

        stream::iter(candidates.into_iter().enumerate())
            .map(move |(i, record)| self.enrich(i, total, record, keywords))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn enrich(&self, index: usize, total: usize, record: ArticleRecord, keywords: &[Keyword]) -> EnrichedArticle {
        if record.identifier.is_empty() {
            self.diagnostics.record(Diagnostic {
                stage: Stage::Verify,
                subject: format!("article #{}", index + 1),
                message: "no bibcode, skipping verification".to_string(),
            });
            return EnrichedArticle {
                record,
                instruments: InstrumentList::default(),
            };
        }

        info!("[{}/{}] {}", index + 1, total, record.identifier);
        let confirmed = self.verifier.verify(&record.identifier, keywords).await;
        let instruments = self.classifier.classify(&confirmed);
        EnrichedArticle { record, instruments }
    }
}
