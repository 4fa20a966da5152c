// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Run configuration.
//!
//! Everything has a default, so the tool runs with no config file at all.
//! A TOML file may override any section:
//!
//! ```toml
//! [search]
//! keywords = ["SOPHIE", "ELODIE", "OHP"]
//! venues = []            # empty: scope to the astronomy collection
//!
//! [pacing]
//! interval_ms = 1000
//!
//! [facilities]         # merged over the built-in table
//! HARPS-N = "TNG"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::article::Keyword;
use crate::error::ConfigError;
use crate::facility::FacilityMap;
use crate::search::ADS_QUERY_ENDPOINT;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub pacing: PacingSettings,
    pub facilities: FacilityMap,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub endpoint: String,
    pub keywords: Vec<Keyword>,
    /// Journal bibstems. Empty means no venue filter.
    pub venues: Vec<String>,
    pub fallback_keyword: Keyword,
    /// Collection used when `venues` is empty.
    pub collection: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: ADS_QUERY_ENDPOINT.to_string(),
            keywords: ["AURELIE", "CORAVEL", "ELODIE", "GHASP", "MISTRAL", "SOPHIE", "OHP"]
                .map(String::from)
                .to_vec(),
            venues: ["A&A", "ApJ", "AJ", "MNRAS"].map(String::from).to_vec(),
            fallback_keyword: "OHP".to_string(),
            collection: "astronomy".to_string(),
        }
    }
}

impl SearchSettings {
    pub fn venue_filter(&self) -> Option<&[String]> {
        if self.venues.is_empty() {
            None
        } else {
            Some(self.venues.as_slice())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    /// Minimum gap between two ADS requests.
    pub interval_ms: u64,
    /// Minimum gap between two PDF downloads.
    pub download_interval_ms: u64,
    pub request_timeout_secs: u64,
    /// Articles verified at once. All of them share one pacer.
    pub concurrency: usize,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            download_interval_ms: 1000,
            request_timeout_secs: 30,
            concurrency: 1,
        }
    }
}

impl PacingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn download_interval(&self) -> Duration {
        Duration::from_millis(self.download_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Settings {
    /// Defaults when `path` is `None`, otherwise the parsed file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let settings = Self::from_toml(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        info!(
            path = %path.display(),
            keywords = settings.search.keywords.len(),
            venues = settings.search.venues.len(),
            "Loaded configuration"
        );
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.search.keywords.is_empty() {
            return Err(ConfigError::NoKeywords);
        }
        if let Some(i) = self.search.keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(ConfigError::BlankKeyword(i + 1));
        }
        if self.pacing.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}

pub fn validate_year(year: u32) -> Result<u16, ConfigError> {
    match year {
        1000..=9999 => Ok(year as u16),
        _ => Err(ConfigError::InvalidYear(year)),
    }
}

pub fn validate_token(token: &str) -> Result<&str, ConfigError> {
    let token = token.trim();
    if token.is_empty() {
        Err(ConfigError::MissingToken)
    } else {
        Ok(token)
    }
}
