use std::{collections::HashMap, fmt::Display};

use serde::Serialize;
use tracing::error;

use crate::{request::Request, response_writer::ResponseWriter, status};

/// Everything a handler sees of one request, and the response it builds.
///
/// Created per request by the server and dropped once the response has been
/// written. The body writers (`string`, `json`, `data`, `html`) always set
/// the content type, then the status, then the body.
#[derive(Debug)]
pub struct Context {
    request: Request,
    w: ResponseWriter,
    params: HashMap<String, String>,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            w: ResponseWriter::new_empty(),
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &str {
        self.request.get_http_method()
    }

    pub fn path(&self) -> &str {
        self.request.get_path()
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    /// A path parameter bound by `:name` or `*name` in the matched pattern.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|v| v.as_str())
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.request.get_query(key)
    }

    pub fn post_form(&self, key: &str) -> Option<&str> {
        self.request.get_form_value(key)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.request.get_headers().get(key)
    }

    pub fn status_code(&self) -> Option<u16> {
        self.w.get_status_code()
    }

    pub fn status(&mut self, code: u16) {
        self.w.set_status_code(code);
    }

    pub fn set_header(&mut self, key: &str, value: &str) {
        self.w.set_header(key, value);
    }

    pub fn string(&mut self, code: u16, body: impl Display) {
        self.set_header("Content-Type", "text/plain");
        self.status(code);
        self.w.write_body(body.to_string().as_bytes());
    }

    /// Writes `obj` as JSON. A value that cannot be encoded turns the
    /// response into a 500 carrying the encoder's message.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: u16, obj: &T) {
        match serde_json::to_vec(obj) {
            Ok(body) => {
                self.set_header("Content-Type", "application/json");
                self.status(code);
                self.w.write_body(&body);
            }
            Err(err) => {
                error!(?err, "json encoding");
                self.string(status::INTERNAL_SERVER_ERROR, err);
            }
        }
    }

    pub fn data(&mut self, code: u16, data: &[u8]) {
        self.status(code);
        self.w.write_body(data);
    }

    pub fn html(&mut self, code: u16, html: &str) {
        self.set_header("Content-Type", "text/html");
        self.status(code);
        self.w.write_body(html.as_bytes());
    }

    pub fn writer(&self) -> &ResponseWriter {
        &self.w
    }

    pub fn into_writer(self) -> ResponseWriter {
        self.w
    }
}
