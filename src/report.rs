// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Static HTML report, `pubs-<year>.html`.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::article::{EnrichedArticle, InstrumentList};
use crate::download::PdfIndex;
use crate::facility::FacilityMap;

const ABSTRACT_URL: &str = "https://ui.adsabs.harvard.edu/abs";
const MAX_LISTED_AUTHORS: usize = 3;

pub fn report_filename(year: u16) -> String {
    format!("pubs-{year}.html")
}

/// First three authors then `et al.`, or all of them when there are at most three.
pub fn format_authors(authors: &[String]) -> String {
    if authors.len() > MAX_LISTED_AUTHORS {
        format!("{}, et al.", authors[..MAX_LISTED_AUTHORS].join(", "))
    } else {
        authors.join(", ")
    }
}

pub fn format_instruments(instruments: &InstrumentList, facilities: &FacilityMap) -> String {
    instruments
        .iter()
        .map(|kw| facilities.label(kw))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub struct Report<'a> {
    year: u16,
    facilities: &'a FacilityMap,
    generated_at: DateTime<Local>,
}

impl<'a> Report<'a> {
    pub fn new(year: u16, facilities: &'a FacilityMap) -> Self {
        Self {
            year,
            facilities,
            generated_at: Local::now(),
        }
    }

    pub fn with_timestamp(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = at;
        self
    }

    /// Articles keep pipeline order; `pdfs` maps bibcodes to local files.
    pub fn render(&self, articles: &[EnrichedArticle], pdfs: &PdfIndex) -> String {
        Rendered {
            report: self,
            articles,
            pdfs,
        }
        .to_string()
    }

    fn write_article(&self, f: &mut fmt::Formatter<'_>, article: &EnrichedArticle, pdfs: &PdfIndex) -> fmt::Result {
        let record = &article.record;
        let bibcode = escape(&record.identifier);

        writeln!(f, "<p class=\"article\">")?;
        writeln!(
            f,
            "<strong class=\"instruments\">{}</strong><br>",
            escape(&format_instruments(&article.instruments, self.facilities))
        )?;
        writeln!(f, "<span class=\"authors\">{}</span><br>", escape(&format_authors(&record.authors)))?;
        writeln!(f, "<strong class=\"title\">{}</strong><br>", escape(&record.display_title()))?;
        writeln!(
            f,
            "<a class=\"bibcode\" href=\"{ABSTRACT_URL}/{bibcode}/abstract\" target=\"_blank\">{bibcode}</a><br>"
        )?;
        match pdfs.get(&record.identifier) {
            Some(path) => writeln!(
                f,
                "<a class=\"pdf\" href=\"{}\" target=\"_blank\">Download PDF</a><br>",
                escape(path)
            )?,
            None => writeln!(f, "<em>No PDF available</em><br>")?,
        }
        writeln!(f, "</p>")
    }
}

struct Rendered<'r, 'a> {
    report: &'r Report<'a>,
    articles: &'r [EnrichedArticle],
    pdfs: &'r PdfIndex,
}

impl fmt::Display for Rendered<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.report.year;

        writeln!(f, "<html>")?;
        writeln!(f, "<head><meta charset=\"utf-8\"><title>Publications {year}</title></head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "<h1>Publications {year}</h1>")?;
        writeln!(f, "<p><strong>Total articles: {}</strong></p>", self.articles.len())?;

        for article in self.articles {
            self.report.write_article(f, article, self.pdfs)?;
        }

        writeln!(
            f,
            "<p><em>Generated {}</em></p>",
            self.report.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "</body>\n</html>")
    }
}

/// Writes `html` to `<dir>/pubs-<year>.html`, creating `dir` if needed.
pub fn write_report(dir: &Path, year: u16, html: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(report_filename(year));
    fs::write(&path, html)?;
    Ok(path)
}
