// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Request pacing.
//!
//! ADS throttles clients that fire confirmation queries back to back, so
//! every request runs under a [`Permit`] taken from a [`Pacer`]. The
//! interval counts from the moment the previous permit was released, i.e.
//! from the end of the previous request. One pacer is shared by all
//! verification streams, so at most one paced request is outstanding.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep, Instant};

#[async_trait]
pub trait Pacer: Send + Sync {
    /// Resolves once the next request may be sent. Keep the permit alive
    /// until the request has completed.
    async fn acquire<'a>(&'a self) -> Permit<'a>;
}

/// Held for the duration of one request. Dropping it restarts the interval.
#[must_use = "the interval restarts when the permit is dropped"]
pub struct Permit<'a> {
    last_release: Option<MutexGuard<'a, Option<Instant>>>,
}

impl Permit<'_> {
    /// A permit that paces nothing.
    pub fn unpaced() -> Self {
        Self { last_release: None }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if let Some(last) = self.last_release.as_mut() {
            **last = Some(Instant::now());
        }
    }
}

/// Enforces a minimum idle interval between the end of one request and the
/// start of the next. The first request goes out immediately.
#[derive(Debug)]
pub struct IntervalPacer {
    interval: Duration,
    last_release: Mutex<Option<Instant>>,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_release: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn acquire<'a>(&'a self) -> Permit<'a> {
        // The lock stays held inside the permit, so callers queue up.
        let last = self.last_release.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        Permit {
            last_release: Some(last),
        }
    }
}

/// Zero-delay pacer for tests and offline runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn acquire<'a>(&'a self) -> Permit<'a> {
        Permit::unpaced()
    }
}
