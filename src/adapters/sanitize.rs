//! Log sanitization utilities for patient data filtering.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`], which redacts:
//! - Scan identifiers (UUIDs)
//! - Patient names and identifiers inside JSON payloads
//! - Inline base64 image data (X-ray previews)
//! - Emails and phone numbers
//!
//! Prefer not logging patient data at all; this is the fallback for anything
//! that slips into a formatted message.
//!
//! Sanitizing caps its input (16 KiB unless the writer is built with
//! [`SanitizingMakeWriter::with_limit`]) so a huge payload in a log line
//! cannot stall the logging thread.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Default cap on bytes sanitized per call (16 KiB).
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        // Order matters: data URLs go first so their base64 body is not
        // partially matched by later rules.
        let rules: Vec<(&'static str, &'static str)> = vec![
            (
                r"data:[a-zA-Z0-9./+-]+;base64,[A-Za-z0-9+/=]+",
                "[REDACTED-IMAGE]",
            ),
            (
                r#""(patientName|name)"\s*:\s*"[^"]*""#,
                r#""$1":"[REDACTED-NAME]""#,
            ),
            (
                r#""(patientId|patient_id)"\s*:\s*"[^"]*""#,
                r#""$1":"[REDACTED-ID]""#,
            ),
            (
                r#"\b(patient_id|patient_name|name)\s*[:=]\s*"[^"]*""#,
                r#"$1="[REDACTED]""#,
            ),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (
                r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b",
                "[REDACTED-PHONE]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        Patterns { set, rules }
    })
}

/// Sanitize a string by replacing patient data patterns.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, DEFAULT_SANITIZE_MAX_BYTES)
}

/// Sanitize at most `max_bytes` of `input`, marking the output if it was cut.
#[must_use]
pub fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).to_string();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check if a string contains potential patient data.
#[must_use]
pub fn contains_pii(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, DEFAULT_SANITIZE_MAX_BYTES);
    patterns().set.is_match(prefix)
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// before it is written to the underlying sink.
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self::with_limit(inner, DEFAULT_SANITIZE_MAX_BYTES)
    }

    /// Wrap `inner`, sanitizing at most `max_bytes` per line.
    #[must_use]
    pub fn with_limit(inner: M, max_bytes: usize) -> Self {
        Self {
            inner,
            max_bytes: max_bytes.max(1),
        }
    }
}

impl<M> Clone for SanitizingMakeWriter<M>
where
    M: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            max_bytes: self.max_bytes,
        }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W, max_bytes: usize) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            max_bytes,
        }
    }

    fn sanitize(&self, bytes: &[u8]) -> String {
        sanitize_with_limit(&String::from_utf8_lossy(bytes), self.max_bytes)
    }
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let mut sanitized = self.sanitize(&line);
            // Truncation cuts the line terminator off.
            if !sanitized.ends_with('\n') {
                sanitized.push('\n');
            }
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single line with no newline must not grow the buffer without bound.
        let hard_cap = self.max_bytes.saturating_mul(2);
        if hard_cap > 0 && self.buffer.len() > hard_cap {
            let sanitized = self.sanitize(&self.buffer);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = self.sanitize(&self.buffer);
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer(), self.max_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_uuid() {
        let input = "Scan 550e8400-e29b-41d4-a716-446655440000 stored";
        let sanitized = sanitize(input);
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(!sanitized.contains("550e8400"));
    }

    #[test]
    fn test_sanitize_json_patient_fields() {
        let input = r#"{"id":"1","patientName":"Jane Doe","patientId":"P-001","age":68}"#;
        let sanitized = sanitize(input);
        assert!(!sanitized.contains("Jane Doe"));
        assert!(!sanitized.contains("P-001"));
        assert!(sanitized.contains(r#""patientName":"[REDACTED-NAME]""#));
        assert!(sanitized.contains(r#""age":68"#));
    }

    #[test]
    fn test_sanitize_debug_fields() {
        let input = r#"PatientData { patient_id: "P-001", name: "Jane Doe", age: 68 }"#;
        let sanitized = sanitize(input);
        assert!(!sanitized.contains("P-001"));
        assert!(!sanitized.contains("Jane Doe"));
        assert!(sanitized.contains("age: 68"));
    }

    #[test]
    fn test_sanitize_image_data() {
        let input = "preview=data:image/png;base64,iVBORw0KGgoAAAANSUhEUg== done";
        let sanitized = sanitize(input);
        assert_eq!(sanitized, "preview=[REDACTED-IMAGE] done");
    }

    #[test]
    fn test_sanitize_email_and_phone() {
        let sanitized = sanitize("Contact: patient@clinic.org or 555-123-4567");
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
        assert!(sanitized.contains("[REDACTED-PHONE]"));
    }

    #[test]
    fn test_contains_pii() {
        assert!(contains_pii("ID: 550e8400-e29b-41d4-a716-446655440000"));
        assert!(contains_pii(r#"{"patientName":"Jane"}"#));
        assert!(!contains_pii("Assessment complete: score=42, level=Moderate"));
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("score=42 level=Moderate and more", 8);
        assert_eq!(sanitized, "score=42 [TRUNCATED]");
    }

    #[test]
    fn test_writer_sanitizes_per_line() {
        let mut writer = SanitizingWriter::new(Vec::new(), DEFAULT_SANITIZE_MAX_BYTES);
        writer
            .write_all(b"first patient@clinic.org\nsecond ")
            .expect("Should write");
        writer.write_all(b"line\n").expect("Should write");
        writer.flush().expect("Should flush");

        let out = String::from_utf8(writer.inner).expect("Should be utf-8");
        assert_eq!(out, "first [REDACTED-EMAIL]\nsecond line\n");
    }

    #[test]
    fn test_writer_applies_configured_limit() {
        let mut writer = SanitizingWriter::new(Vec::new(), 8);
        writer
            .write_all(b"score=42 level=Moderate\n")
            .expect("Should write");
        writer.flush().expect("Should flush");

        let out = String::from_utf8(writer.inner).expect("Should be utf-8");
        assert_eq!(out, "score=42 [TRUNCATED]\n");
    }

    #[test]
    fn test_make_writer_limits() {
        let default = SanitizingMakeWriter::new(std::io::sink);
        assert_eq!(default.max_bytes, DEFAULT_SANITIZE_MAX_BYTES);

        let zero = SanitizingMakeWriter::with_limit(std::io::sink, 0);
        assert_eq!(zero.make_writer().max_bytes, 1);
    }
}
