// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use serde::Deserialize;
use serde_json::Value;

/// Instrument name or the generic fallback marker. Case-sensitive.
pub type Keyword = String;

/// One document of the ADS `response.docs` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleRecord {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default, rename = "bibcode")]
    pub identifier: String,
    #[serde(default, rename = "author")]
    pub authors: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    // Kept verbatim, only the PDF downloader looks inside.
    #[serde(default, rename = "links_data")]
    pub links: Vec<Value>,
}

impl ArticleRecord {
    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            "No title".to_string()
        } else {
            self.title.join(" ")
        }
    }
}

/// Keywords confirmed for one article. Set semantics, insertion order kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmedKeywords(Vec<Keyword>);

impl ConfirmedKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the keyword was already present.
    pub fn insert(&mut self, keyword: impl Into<Keyword>) -> bool {
        let keyword = keyword.into();
        if self.contains(&keyword) {
            return false;
        }
        self.0.push(keyword);
        true
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.iter().any(|k| k == keyword)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.0.iter()
    }
}

impl<K: Into<Keyword>> FromIterator<K> for ConfirmedKeywords {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut confirmed = Self::new();
        for keyword in iter {
            confirmed.insert(keyword);
        }
        confirmed
    }
}

/// Final, duplicate-free instrument list of an article.
///
/// Only the classifier builds non-empty lists, so the fallback rule always
/// holds for whatever reaches the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentList(Vec<Keyword>);

impl InstrumentList {
    pub(crate) fn from_confirmed(keywords: Vec<Keyword>) -> Self {
        Self(keywords)
    }

    pub fn as_slice(&self) -> &[Keyword] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Candidate article after verification and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedArticle {
    pub record: ArticleRecord,
    pub instruments: InstrumentList,
}
