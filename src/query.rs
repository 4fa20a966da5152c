// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! ADS query strings.
//!
//! Queries are built as values and serialized once through `Display`, so
//! their shape can be checked without any HTTP involved.

use std::fmt;

use serde::Serialize;

/// Fixed page size of the bulk search. There is no pagination: anything past
/// this many hits is dropped.
pub const SEARCH_PAGE_SIZE: u32 = 2000;

const SEARCH_FIELDS: &str = "title,bibcode,url,author,abstract,links_data";
const CONFIRM_FIELDS: &str = "bibcode";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Constraint {
    Year(u16),
    Identifier(String),
}

/// Restriction appended after the keyword clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// `bibstem:"..."` disjunction over journal identifiers.
    Venues(Vec<String>),
    /// `collection:<name>` used when no venue is configured.
    Collection(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    constraint: Constraint,
    keywords: Vec<String>,
    scope: Option<Scope>,
}

impl Query {
    /// Bulk query: any keyword in title, abstract or full text for `year`.
    /// An empty venue list falls back to the collection scope.
    pub fn bulk(year: u16, keywords: &[String], venues: Option<&[String]>, collection: &str) -> Self {
        let scope = match venues {
            Some(venues) if !venues.is_empty() => Scope::Venues(venues.to_vec()),
            _ => Scope::Collection(collection.to_string()),
        };
        Self {
            constraint: Constraint::Year(year),
            keywords: keywords.to_vec(),
            scope: Some(scope),
        }
    }

    /// Existence check of one keyword inside one article.
    pub fn confirmation(identifier: &str, keyword: &str) -> Self {
        Self {
            constraint: Constraint::Identifier(identifier.to_string()),
            keywords: vec![keyword.to_string()],
            scope: None,
        }
    }

    #[cfg(test)]
    fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Constraint::Year(year) => write!(f, "year:{year}")?,
            Constraint::Identifier(id) => write!(f, "bibcode:\"{id}\"")?,
        }

        let clauses = self
            .keywords
            .iter()
            .map(|kw| format!("title:\"{kw}\" OR abstract:\"{kw}\" OR full:\"{kw}\""))
            .collect::<Vec<_>>()
            .join(" OR ");
        write!(f, " AND ({clauses})")?;

        match &self.scope {
            Some(Scope::Venues(venues)) => {
                let venues = venues
                    .iter()
                    .map(|v| format!("bibstem:\"{v}\""))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                write!(f, " AND ({venues})")
            }
            Some(Scope::Collection(name)) => write!(f, " AND collection:{name}"),
            None => Ok(()),
        }
    }
}

/// Query parameters of a `GET /v1/search/query` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub q: String,
    pub rows: u32,
    pub fl: String,
}

impl SearchRequest {
    pub fn bulk(query: &Query) -> Self {
        Self {
            q: query.to_string(),
            rows: SEARCH_PAGE_SIZE,
            fl: SEARCH_FIELDS.to_string(),
        }
    }

    pub fn confirmation(query: &Query) -> Self {
        Self {
            q: query.to_string(),
            rows: 1,
            fl: CONFIRM_FIELDS.to_string(),
        }
    }
}
