//! HTTP adapter: Implementation of HistorySink.
//!
//! Posts scan summaries as JSON to `<base>/history`. There is no
//! authentication, no idempotency key and no retry; the response body is
//! ignored and only the status line is checked.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::HistoryEntry;
use crate::ports::HistorySink;

/// Error type for history delivery.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("History endpoint answered with status {0}")]
    Status(u16),
}

/// History sink backed by a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpHistorySink {
    client: Client,
    endpoint: String,
}

impl HttpHistorySink {
    /// Create a sink for the given base URL (e.g. `http://localhost:8000`).
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HistoryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/history", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL entries are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl HistorySink for HttpHistorySink {
    type Error = HistoryError;

    fn record(&self, entry: &HistoryEntry) -> Result<(), Self::Error> {
        let response = self.client.post(&self.endpoint).json(entry).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(HistoryError::Status(status.as_u16()));
        }

        tracing::debug!("History entry delivered ({})", status.as_u16());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScanRisk;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn entry() -> HistoryEntry {
        HistoryEntry {
            id: "scan-1".into(),
            date: "1/2/2026, 3:04:05 PM".into(),
            patient_name: "Jane Doe".into(),
            patient_id: "P-001".into(),
            age: 68,
            stage: "Osteoporosis".into(),
            risk: ScanRisk::High,
        }
    }

    /// Accept one connection, capture the request and answer with `status_line`.
    fn one_shot_server(status_line: &'static str) -> (String, thread::JoinHandle<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
        let base = format!("http://{}", listener.local_addr().expect("Should have addr"));

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("Should accept");
            let mut reader = BufReader::new(stream.try_clone().expect("Should clone"));

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("Should read");

            let mut content_length = 0usize;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("Should read header");
                if header == "\r\n" || header.is_empty() {
                    break;
                }
                let lower = header.to_ascii_lowercase();
                if let Some(v) = lower.strip_prefix("content-length:") {
                    content_length = v.trim().parse().expect("Should parse length");
                }
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).expect("Should read body");

            let mut stream = stream;
            write!(stream, "{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .expect("Should respond");

            (request_line, String::from_utf8(body).expect("Should be utf-8"))
        });

        (base, handle)
    }

    #[test]
    fn test_posts_json_to_history_endpoint() {
        let (base, server) = one_shot_server("HTTP/1.1 200 OK");
        let sink = HttpHistorySink::new(&format!("{base}/"), Duration::from_secs(5))
            .expect("Should build client");
        assert_eq!(sink.endpoint(), format!("{base}/history"));

        sink.record(&entry()).expect("Should deliver");

        let (request_line, body) = server.join().expect("Server thread");
        assert!(request_line.starts_with("POST /history "));

        let json: serde_json::Value = serde_json::from_str(&body).expect("Should be JSON");
        assert_eq!(json["patientName"], "Jane Doe");
        assert_eq!(json["patientId"], "P-001");
        assert_eq!(json["stage"], "Osteoporosis");
        assert_eq!(json["risk"], "High");
    }

    #[test]
    fn test_error_status_is_reported() {
        let (base, server) = one_shot_server("HTTP/1.1 400 Bad Request");
        let sink = HttpHistorySink::new(&base, Duration::from_secs(5)).expect("Should build client");

        let err = sink.record(&entry()).expect_err("Should fail");
        assert!(matches!(err, HistoryError::Status(400)));
        server.join().expect("Server thread");
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
            listener.local_addr().expect("Should have addr").port()
        };
        let sink = HttpHistorySink::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2))
            .expect("Should build client");

        assert!(matches!(sink.record(&entry()), Err(HistoryError::Request(_))));
    }
}
