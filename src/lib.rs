// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Observatoire de Haute-Provence publication census.
//!
//! Searches ADS for articles of a given year that mention OHP instruments,
//! re-checks every keyword per article, classifies each article by
//! instrument and facility, and renders `pubs-<year>.html`.
//!
//! Flow: [`search::SearchClient`] -> [`verify::KeywordVerifier`] ->
//! [`classify::InstrumentClassifier`] -> [`report::Report`], wired together
//! by [`pipeline::Pipeline`]. Request failures never abort a run; they are
//! recorded through [`diagnostics::Diagnostics`] and shrink the result.

pub mod article;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod download;
pub mod error;
pub mod facility;
pub mod links;
pub mod pacing;
pub mod pipeline;
pub mod query;
pub mod report;
pub mod search;
pub mod verify;

pub use article::{ArticleRecord, ConfirmedKeywords, EnrichedArticle, InstrumentList, Keyword};
pub use classify::InstrumentClassifier;
pub use config::Settings;
pub use diagnostics::{Diagnostic, DiagnosticLog, Diagnostics, Stage};
pub use error::{ConfigError, FetchError};
pub use facility::{FacilityMap, UNKNOWN_FACILITY};
pub use pacing::{IntervalPacer, NoPacing, Pacer, Permit};
pub use pipeline::{Pipeline, SearchPlan};
pub use search::{AdsApi, SearchApi, SearchClient};
pub use verify::KeywordVerifier;
