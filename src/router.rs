use std::collections::HashMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    context::Context,
    segment::parse_pattern,
    server::{Handler, HttpMethod},
    status,
    trie::Node,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatternError {
    #[error("wildcard must be the last segment: {0}")]
    MisplacedWildcard(String),
    #[error("parameter without a name: {0}")]
    EmptyName(String),
}

/// A resolved route: the registered pattern and the values it bound.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub pattern: &'a str,
    pub params: HashMap<String, String>,
}

/// Routes requests to handlers through one trie per HTTP method.
///
/// Routes are registered through `&mut self` before the router is handed to
/// [`crate::server::Server::run`], which only ever reads it.
pub struct Router {
    roots: HashMap<HttpMethod, Node>,
    handlers: HashMap<(HttpMethod, String), Box<dyn Handler + Send + Sync>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            handlers: HashMap::new(),
        }
    }

    pub fn add_route(
        &mut self,
        http_method: HttpMethod,
        pattern: &str,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), PatternError> {
        validate_pattern(pattern)?;
        let parts = parse_pattern(pattern);

        let root = self.roots.entry(http_method).or_default();
        if let Some(replaced) = root.insert(pattern, &parts, 0) {
            warn!(%http_method, pattern, %replaced, "route replaced");
            self.handlers.remove(&(http_method, replaced));
        }
        self.handlers
            .insert((http_method, pattern.to_owned()), Box::new(handler));
        Ok(())
    }

    pub fn get(
        &mut self,
        pattern: &str,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), PatternError> {
        self.add_route(HttpMethod::Get, pattern, handler)
    }

    pub fn post(
        &mut self,
        pattern: &str,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), PatternError> {
        self.add_route(HttpMethod::Post, pattern, handler)
    }

    pub fn put(
        &mut self,
        pattern: &str,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), PatternError> {
        self.add_route(HttpMethod::Put, pattern, handler)
    }

    pub fn delete(
        &mut self,
        pattern: &str,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), PatternError> {
        self.add_route(HttpMethod::Delete, pattern, handler)
    }

    pub fn patch(
        &mut self,
        pattern: &str,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), PatternError> {
        self.add_route(HttpMethod::Patch, pattern, handler)
    }

    /// Finds the pattern matching `path` and binds its parameters.
    ///
    /// Parameters are read off the matched pattern, not the path: `:name`
    /// takes the path part at the same index, `*name` takes every remaining
    /// part joined by `/`.
    pub fn route(&self, http_method: HttpMethod, path: &str) -> Option<RouteMatch<'_>> {
        let search_parts = parse_pattern(path);
        let root = self.roots.get(&http_method)?;
        let n = root.search(&search_parts, 0)?;

        let mut params = HashMap::new();
        for (idx, part) in parse_pattern(n.pattern()).into_iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if let Some(value) = search_parts.get(idx) {
                    params.insert(name.to_owned(), (*value).to_owned());
                }
            }
            if let Some(name) = part.strip_prefix('*') {
                let rest = search_parts.get(idx..).unwrap_or_default();
                params.insert(name.to_owned(), rest.join("/"));
                break;
            }
        }

        Some(RouteMatch {
            pattern: n.pattern(),
            params,
        })
    }

    /// Every pattern registered for `http_method`.
    pub fn routes(&self, http_method: HttpMethod) -> Vec<&str> {
        let Some(root) = self.roots.get(&http_method) else {
            return vec![];
        };
        let mut list = vec![];
        root.travel(&mut list);
        list.into_iter().map(|n| n.pattern()).collect()
    }

    pub fn handle(&self, c: &mut Context) {
        let Ok(http_method) = c.method().parse::<HttpMethod>() else {
            not_found(c);
            return;
        };

        let Some(m) = self.route(http_method, c.path()) else {
            not_found(c);
            return;
        };
        info!("match: {}", m.pattern);

        let Some(handler) = self.handlers.get(&(http_method, m.pattern.to_owned())) else {
            not_found(c);
            return;
        };
        c.set_params(m.params);
        handler.handle(c);
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for Router {
    fn handle(&self, c: &mut Context) {
        self.handle(c);
    }
}

fn not_found(c: &mut Context) {
    let path = c.path().to_owned();
    c.string(status::NOT_FOUND, format_args!("404 NOT FOUND: {}", path));
}

fn validate_pattern(pattern: &str) -> Result<(), PatternError> {
    let parts: Vec<_> = pattern.split('/').filter(|part| !part.is_empty()).collect();
    for (idx, part) in parts.iter().enumerate() {
        if *part == ":" || *part == "*" {
            return Err(PatternError::EmptyName(pattern.to_owned()));
        }
        if part.starts_with('*') && idx != parts.len() - 1 {
            return Err(PatternError::MisplacedWildcard(pattern.to_owned()));
        }
    }
    Ok(())
}
