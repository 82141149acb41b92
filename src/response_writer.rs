use tracing::warn;

use crate::status;

/// Buffers one response until it is serialized with [`ResponseWriter::write`].
///
/// Status and headers are frozen by the first body write: later changes are
/// dropped with a warning, mirroring a transport that has already flushed
/// the head of the response.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status_code: Option<u16>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    wrote_body: bool,
}

impl ResponseWriter {
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn get_status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn set_status_code(&mut self, status_code: u16) {
        if self.wrote_body {
            warn!(status_code, "status set after body write");
            return;
        }
        self.status_code = Some(status_code);
    }

    pub fn get_header(&self, k: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|entry| entry.0.eq_ignore_ascii_case(k))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_header(&mut self, k: &str, v: &str) {
        if self.wrote_body {
            warn!(header = k, "header set after body write");
            return;
        }
        if let Some(entry) = self
            .headers
            .iter_mut()
            .find(|entry| entry.0.eq_ignore_ascii_case(k))
        {
            entry.1 = v.to_owned();
        } else {
            self.headers.push((k.to_owned(), v.to_owned()));
        }
    }

    pub fn get_body(&self) -> &[u8] {
        &self.body
    }

    pub fn write_body(&mut self, data: &[u8]) {
        if self.status_code.is_none() {
            self.status_code = Some(status::OK);
        }
        self.wrote_body = true;
        self.body.extend_from_slice(data);
    }

    pub fn write(self) -> Vec<u8> {
        let status_code = self.status_code.unwrap_or(status::OK);
        let mut head = format!("HTTP/1.1 {}", status_code);
        if let Some(reason_phrase) = status::reason_phrase(status_code) {
            head = format!("{} {}", head, reason_phrase);
        }
        head.push_str("\r\n");

        for (k, v) in &self.headers {
            if !k.eq_ignore_ascii_case("content-length") {
                head.push_str(&format!("{}: {}\r\n", k, v));
            }
        }
        head.push_str(&format!("Content-Length: {}\r\n\r\n", self.body.len()));

        let mut resp = head.into_bytes();
        resp.extend(self.body);
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseWriter;

    #[test]
    fn test_write() {
        let mut w = ResponseWriter::new_empty();
        w.set_header("Content-Type", "text/plain");
        w.set_status_code(201);
        w.write_body(b"created");

        let got = String::from_utf8(w.write()).unwrap();
        assert_eq!(
            got,
            "HTTP/1.1 201 Created\r\nContent-Type: text/plain\r\nContent-Length: 7\r\n\r\ncreated"
        );
    }

    #[test]
    fn test_write_default_status() {
        let w = ResponseWriter::new_empty();
        let got = String::from_utf8(w.write()).unwrap();
        assert_eq!(got, "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_body_write_implies_ok() {
        let mut w = ResponseWriter::new_empty();
        w.write_body(b"x");
        assert_eq!(w.get_status_code(), Some(200));
    }

    #[test]
    fn test_head_frozen_after_body() {
        let mut w = ResponseWriter::new_empty();
        w.set_header("content-type", "text/html");
        w.set_status_code(200);
        w.write_body(b"<h1>hi</h1>");

        w.set_status_code(500);
        w.set_header("Content-Type", "text/plain");
        w.set_header("X-Late", "1");

        assert_eq!(w.get_status_code(), Some(200));
        assert_eq!(w.get_header("Content-Type"), Some("text/html"));
        assert_eq!(w.get_header("X-Late"), None);
    }

    #[test]
    fn test_set_header_replaces() {
        let mut w = ResponseWriter::new_empty();
        w.set_header("X-Id", "1");
        w.set_header("x-id", "2");
        assert_eq!(w.get_header("X-Id"), Some("2"));
    }
}
