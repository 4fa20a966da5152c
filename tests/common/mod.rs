// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ohp_biblio::query::SearchRequest;
use ohp_biblio::search::{SearchApi, SearchEnvelope};
use ohp_biblio::FetchError;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::Instant;

/// In-memory ADS: bulk queries return `docs`, confirmation queries answer
/// from the per-bibcode mention lists.
#[derive(Default)]
pub struct Corpus {
    docs: Vec<Value>,
    mentions: HashMap<String, Vec<String>>,
    delays: HashMap<String, Duration>,
    search_status: Option<u16>,
    requests: Mutex<Vec<SearchRequest>>,
    spans: Mutex<Vec<(Instant, Instant)>>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(status: u16) -> Self {
        Self {
            search_status: Some(status),
            ..Self::default()
        }
    }

    pub fn article(mut self, doc: Value, mentions: &[&str]) -> Self {
        let bibcode = doc["bibcode"].as_str().unwrap_or_default().to_string();
        self.mentions
            .insert(bibcode, mentions.iter().map(|s| s.to_string()).collect());
        self.docs.push(doc);
        self
    }

    /// Confirmation queries for `bibcode` take `delay` to answer.
    pub fn slow(mut self, bibcode: &str, delay: Duration) -> Self {
        self.delays.insert(bibcode.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Start and end of every confirmation query, in completion order.
    pub fn confirmation_spans(&self) -> Vec<(Instant, Instant)> {
        self.spans.lock().unwrap().clone()
    }

    fn confirmation(&self, q: &str) -> SearchEnvelope {
        let found = self.mentions.iter().any(|(bibcode, keywords)| {
            q.starts_with(&format!("bibcode:\"{bibcode}\""))
                && keywords.iter().any(|kw| q.contains(&format!("title:\"{kw}\"")))
        });
        envelope(json!({"response": {"numFound": u64::from(found), "docs": []}}))
    }

    fn delay_for(&self, q: &str) -> Option<Duration> {
        self.delays
            .iter()
            .find(|(bibcode, _)| q.starts_with(&format!("bibcode:\"{bibcode}\"")))
            .map(|(_, delay)| *delay)
    }
}

#[async_trait]
impl SearchApi for Corpus {
    async fn query(&self, request: &SearchRequest) -> Result<SearchEnvelope, FetchError> {
        self.requests.lock().unwrap().push(request.clone());

        if request.q.starts_with("bibcode:") {
            let start = Instant::now();
            if let Some(delay) = self.delay_for(&request.q) {
                tokio::time::sleep(delay).await;
            }
            self.spans.lock().unwrap().push((start, Instant::now()));
            return Ok(self.confirmation(&request.q));
        }

        if let Some(status) = self.search_status {
            return Err(FetchError::Status {
                status,
                body: "Internal Server Error".to_string(),
            });
        }
        Ok(envelope(json!({
            "response": {"numFound": self.docs.len(), "docs": self.docs}
        })))
    }
}

pub fn envelope(value: Value) -> SearchEnvelope {
    serde_json::from_value(value).unwrap()
}

pub fn doc(bibcode: &str, authors: &[&str], abstract_text: &str) -> Value {
    json!({
        "bibcode": bibcode,
        "title": [format!("Observations of {bibcode}")],
        "author": authors,
        "abstract": abstract_text,
        "links_data": []
    })
}

/// Minimal HTTP/1.1 server answering every request with the same response.
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn respond(status_line: &'static str, content_type: &'static str, body: Vec<u8>) -> Self {
        let advertised = body.len();
        Self::serve(status_line, content_type, body, advertised).await
    }

    /// Announces `advertised` bytes, sends `body`, then hangs up.
    pub async fn truncated(body: Vec<u8>, advertised: usize) -> Self {
        Self::serve("200 OK", "application/pdf", body, advertised).await
    }

    async fn serve(status_line: &'static str, content_type: &'static str, body: Vec<u8>, advertised: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let head = read_head(&mut socket).await;
                seen.lock().unwrap().push(head);

                let reply = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {advertised}\r\nConnection: close\r\n\r\n"
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { url, requests }
    }

    /// Accepts connections and never answers.
    pub async fn silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        Self { url, requests }
    }

    /// Raw request heads (request line and headers) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
