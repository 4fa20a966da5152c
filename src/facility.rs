// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Facility shown for keywords missing from the table.
pub const UNKNOWN_FACILITY: &str = "Unknown";

const OHP_FACILITIES: [(&str, &str); 8] = [
    ("ELODIE", "T193"),
    ("GHASP", "T193"),
    ("MISTRAL", "T193"),
    ("SOPHIE", "T193"),
    ("CARELEC", "T193"),
    ("AURELIE", "T152"),
    ("CORAVEL", "T100 Suisse"),
    ("OHP", "Autre telescope"),
];

/// Instrument keyword -> hosting telescope. Built once at startup.
///
/// Deserialized entries are laid over the default table, so a config file
/// only lists the instruments it adds or changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityMap(BTreeMap<String, String>);

impl Default for FacilityMap {
    fn default() -> Self {
        OHP_FACILITIES.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for FacilityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut map = Self::default();
        map.0.extend(overrides);
        Ok(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FacilityMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl FacilityMap {
    pub fn facility_of(&self, keyword: &str) -> &str {
        self.0.get(keyword).map_or(UNKNOWN_FACILITY, String::as_str)
    }

    /// `"T193 / SOPHIE"`
    pub fn label(&self, keyword: &str) -> String {
        format!("{} / {}", self.facility_of(keyword), keyword)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
