use std::io::{BufRead, BufReader, ErrorKind, Read, Take};

use percent_encoding::percent_decode_str;
use thiserror::Error;
use tracing::info;
use url::form_urlencoded;

use crate::{headers::Headers, multi_map::MultiMap};

const REQUEST_LINE_LIMIT: u64 = 1024;
const HEADERS_LIMIT: u64 = 8 * 1024;
const BODY_LIMIT: usize = 64 * 1024;

#[derive(Debug)]
pub struct Request {
    method: String,
    target: String,
    path: String,
    version: String,
    headers: Headers,
    body: Option<Vec<u8>>,
    query: MultiMap<String, String>,
    form: MultiMap<String, String>,
}

impl Request {
    pub fn new(
        request_line: &str,
        headers: Headers,
        body: Option<Vec<u8>>,
    ) -> Result<Self, InvalidRequest> {
        let mut it = request_line.split(' ');
        let (Some(method), Some(target), Some(version), None) =
            (it.next(), it.next(), it.next(), it.next())
        else {
            return Err(InvalidRequest);
        };
        if method.is_empty() || !target.starts_with('/') {
            return Err(InvalidRequest);
        }

        let (raw_path, query) = match target.split_once('?') {
            Some((raw_path, raw_query)) => (raw_path, parse_urlencoded(raw_query.as_bytes())),
            None => (target, MultiMap::new_empty()),
        };
        let path = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| InvalidRequest)?
            .into_owned();
        let form = match (&body, headers.get_content_type()) {
            (Some(body), Some("application/x-www-form-urlencoded")) => parse_urlencoded(body),
            _ => MultiMap::new_empty(),
        };

        Ok(Self {
            method: method.to_owned(),
            target: target.to_owned(),
            path,
            version: version.to_owned(),
            headers,
            body,
            query,
            form,
        })
    }

    pub fn get_http_method(&self) -> &str {
        &self.method
    }

    pub fn get_request_target(&self) -> &str {
        &self.target
    }

    /// The percent-decoded request target, without its query string.
    pub fn get_path(&self) -> &str {
        &self.path
    }

    pub fn get_http_version(&self) -> &str {
        &self.version
    }

    pub fn get_headers(&self) -> &Headers {
        &self.headers
    }

    pub fn get_body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.get_first(key).map(|v| v.as_str())
    }

    /// Looks `key` up in the url-encoded form body, then in the query string.
    pub fn get_form_value(&self, key: &str) -> Option<&str> {
        self.form
            .get_first(key)
            .or_else(|| self.query.get_first(key))
            .map(|v| v.as_str())
    }
}

fn parse_urlencoded(input: &[u8]) -> MultiMap<String, String> {
    form_urlencoded::parse(input).into_owned().collect()
}

#[derive(Error, Debug)]
#[error("end of file")]
pub struct EndOfFile;

#[derive(Error, Debug)]
#[error("invalid request")]
pub struct InvalidRequest;

pub struct RequestReader<R> {
    buf_reader: Take<BufReader<R>>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(r: R) -> Self {
        Self {
            buf_reader: BufReader::new(r).take(u64::MAX),
        }
    }

    pub fn read(&mut self) -> anyhow::Result<Request> {
        let mut request_line = String::new();
        self.buf_reader.set_limit(REQUEST_LINE_LIMIT);
        let n = self.buf_reader.read_line(&mut request_line)?;
        if n == 0 {
            Err(EndOfFile)?
        }
        let request_line = request_line.strip_suffix("\r\n").ok_or(InvalidRequest)?;
        info!(?request_line);

        let mut headers = MultiMap::new_empty();
        self.buf_reader.set_limit(HEADERS_LIMIT);
        loop {
            let mut line = String::new();
            self.buf_reader.read_line(&mut line)?;
            let line = line.strip_suffix("\r\n").ok_or(InvalidRequest)?;

            if line.is_empty() {
                break;
            }
            let (k, v) = line.split_once(':').ok_or(InvalidRequest)?;
            headers.insert(k.trim().to_lowercase(), v.trim().to_owned());
        }
        let headers = Headers::new(headers);

        let body = match headers.get_content_length().map_err(|_| InvalidRequest)? {
            Some(length) if length > BODY_LIMIT => Err(InvalidRequest)?,
            Some(length) => {
                self.buf_reader.set_limit(length as u64);
                let mut buf = vec![0; length];
                if let Err(err) = self.buf_reader.read_exact(&mut buf) {
                    if err.kind() == ErrorKind::UnexpectedEof {
                        Err(InvalidRequest)?
                    } else {
                        Err(err)?
                    }
                }
                Some(buf)
            }
            None => None,
        };

        Ok(Request::new(request_line, headers, body)?)
    }
}
