// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::article::{ConfirmedKeywords, InstrumentList, Keyword};

/// Turns confirmed keywords into the instrument list of an article.
///
/// The fallback keyword (a facility named without any instrument) only
/// survives when nothing more specific was confirmed.
#[derive(Debug, Clone)]
pub struct InstrumentClassifier {
    fallback: Keyword,
}

impl InstrumentClassifier {
    pub fn new(fallback: impl Into<Keyword>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    /// Order follows `confirmed`, i.e. the configured keyword order.
    pub fn classify(&self, confirmed: &ConfirmedKeywords) -> InstrumentList {
        let only_fallback = confirmed.len() == 1 && confirmed.contains(&self.fallback);
        let instruments = confirmed
            .iter()
            .filter(|kw| only_fallback || **kw != self.fallback)
            .cloned()
            .collect();
        InstrumentList::from_confirmed(instruments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(confirmed: &[&str]) -> Vec<String> {
        let confirmed: ConfirmedKeywords = confirmed.iter().copied().collect();
        InstrumentClassifier::new("OHP")
            .classify(&confirmed)
            .as_slice()
            .to_vec()
    }

    #[test]
    fn empty_stays_empty() {
        assert!(classify(&[]).is_empty());
    }

    #[test]
    fn lone_fallback_is_kept() {
        assert_eq!(classify(&["OHP"]), ["OHP"]);
    }

    #[test]
    fn fallback_dropped_next_to_instrument() {
        assert_eq!(classify(&["OHP", "SOPHIE"]), ["SOPHIE"]);
        assert_eq!(classify(&["SOPHIE", "OHP", "ELODIE"]), ["SOPHIE", "ELODIE"]);
    }

    #[test]
    fn several_instruments_deterministic() {
        let first = classify(&["SOPHIE", "ELODIE"]);
        assert_eq!(first, ["SOPHIE", "ELODIE"]);
        for _ in 0..5 {
            assert_eq!(classify(&["SOPHIE", "ELODIE"]), first);
        }
    }

    #[test]
    fn never_duplicates_or_invents() {
        let input = ["CORAVEL", "SOPHIE", "CORAVEL", "OHP", "SOPHIE"];
        let result = classify(&input);
        assert_eq!(result, ["CORAVEL", "SOPHIE"]);
        assert!(result.iter().all(|kw| input.contains(&kw.as_str())));
    }

    #[test]
    fn custom_fallback() {
        let confirmed: ConfirmedKeywords = ["T193", "OHP"].into_iter().collect();
        let list = InstrumentClassifier::new("T193").classify(&confirmed);
        assert_eq!(list.as_slice(), ["OHP"]);
    }
}
