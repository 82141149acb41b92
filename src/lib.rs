use std::{path::PathBuf, time::Duration};

use clap::Parser;
use serde_json::json;
use tracing::{info, Level};

pub use context::Context;
pub use router::{PatternError, RouteMatch, Router};
pub use server::{Handler, HttpMethod, Server};

pub mod context;
pub mod file_server;
pub mod headers;
pub mod multi_map;
pub mod request;
pub mod response_writer;
pub mod router;
pub mod segment;
pub mod server;
pub mod status;
pub mod trie;

#[cfg(test)]
mod test_utils;

#[derive(Parser, Debug)]
#[command(version, about = "Trie-routed HTTP server")]
pub struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:9999")]
    pub addr: String,

    /// Serve files from this directory under `/assets/*filepath`.
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Seconds to wait for the next request on an idle connection.
    #[arg(long, default_value_t = 10)]
    pub read_timeout: u64,

    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

fn index(c: &mut Context) {
    c.html(status::OK, "<h1>Hello Gee</h1>");
}

fn hello(c: &mut Context) {
    let name = c.query("name").unwrap_or_default().to_owned();
    let path = c.path().to_owned();
    c.string(status::OK, format_args!("hello {}, you're at {}\n", name, path));
}

fn hello_name(c: &mut Context) {
    let name = c.param("name").unwrap_or_default().to_owned();
    let path = c.path().to_owned();
    c.string(status::OK, format_args!("hello {}, you're at {}\n", name, path));
}

fn assets(c: &mut Context) {
    let filepath = c.param("filepath").unwrap_or_default().to_owned();
    c.json(status::OK, &json!({ "filepath": filepath }));
}

fn login(c: &mut Context) {
    let username = c.post_form("username").unwrap_or_default().to_owned();
    let password = c.post_form("password").unwrap_or_default().to_owned();
    c.json(
        status::OK,
        &json!({ "username": username, "password": password }),
    );
}

pub fn new_router(directory: Option<PathBuf>) -> Result<Router, PatternError> {
    let mut router = Router::new();
    router.get("/", index)?;
    router.get("/hello", hello)?;
    router.get("/hello/:name", hello_name)?;
    match directory {
        Some(directory) => router.get(
            "/assets/*filepath",
            file_server::new_file_retriever(directory),
        )?,
        None => router.get("/assets/*filepath", assets)?,
    }
    router.post("/login", login)?;
    Ok(router)
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let router = new_router(args.directory)?;
    for http_method in [HttpMethod::Get, HttpMethod::Post] {
        for pattern in router.routes(http_method) {
            info!(%http_method, pattern, "route");
        }
    }

    let server = Server::new(&args.addr)?
        .with_read_timeout(Some(Duration::from_secs(args.read_timeout)));
    info!(addr = args.addr.as_str(), "listening");
    server.run(router);
    Ok(())
}
