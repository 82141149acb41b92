use std::{
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::{context::Context, server::Handler, status};

/// Serves files below `base_path`, addressed by the `filepath` parameter.
///
/// Meant to be mounted on a catch-all pattern such as `/assets/*filepath`.
pub fn new_file_retriever(base_path: impl Into<PathBuf>) -> impl Handler + Send + Sync {
    let base_path = base_path.into();
    move |c: &mut Context| {
        let Some(suffix) = c.param("filepath") else {
            c.status(status::BAD_REQUEST);
            return;
        };

        let Ok(path) = build_path(&base_path, suffix) else {
            c.status(status::BAD_REQUEST);
            return;
        };
        info!("file path: {:?}", path);

        match fs::read(path) {
            Ok(contents) => {
                c.set_header("Content-Type", "application/octet-stream");
                c.data(status::OK, &contents);
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let path = c.path().to_owned();
                c.string(status::NOT_FOUND, format_args!("404 NOT FOUND: {}", path));
            }
            Err(err) => {
                error!("{:?}", err);
                c.status(status::INTERNAL_SERVER_ERROR);
            }
        }
    }
}

#[derive(Error, Debug)]
#[error("invalid path")]
struct InvalidPath;

fn build_path(
    base_path: impl AsRef<Path>,
    suffix: impl AsRef<Path>,
) -> Result<PathBuf, InvalidPath> {
    let base = path_clean::clean(base_path.as_ref());
    let path = path_clean::clean(base.join(suffix));

    // A cleaned "." base disappears from the joined path.
    let inside = if base == Path::new(".") {
        path.is_relative() && path.components().next() != Some(Component::ParentDir)
    } else {
        path.starts_with(&base)
    };
    if !inside {
        warn!(?path, "path escapes the base directory");
        return Err(InvalidPath);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write, thread};

    use tempdir::TempDir;

    use crate::{router::Router, server::Server};

    use super::{build_path, new_file_retriever};

    #[test]
    fn test_build_path_ok() {
        let tests = [
            ("assets", "css/geektutu.css", "assets/css/geektutu.css"),
            ("assets", "./css/geektutu.css", "assets/css/geektutu.css"),
            ("./assets", "fav.ico", "assets/fav.ico"),
            ("/assets", "js/../fav.ico", "/assets/fav.ico"),
            ("/", "fav.ico", "/fav.ico"),
            (".", "a.txt", "a.txt"),
            ("./", "css/../a.txt", "a.txt"),
            ("assets/", "fav.ico", "assets/fav.ico"),
        ];

        for (base, suffix, want) in tests {
            assert_eq!(build_path(base, suffix).unwrap().as_os_str(), want);
        }
    }

    #[test]
    fn test_build_path_err() {
        let tests = [
            ("assets", "../secrets"),
            ("./assets", "css/../../secrets"),
            ("/assets", "/secrets"),
            (".", "../secrets"),
            (".", "/etc/passwd"),
        ];

        for (base, suffix) in tests {
            assert!(build_path(base, suffix).is_err());
        }
    }

    #[test]
    fn test_file_retriever() {
        let tmp_dir = TempDir::new("assets").unwrap();
        std::fs::create_dir(tmp_dir.path().join("css")).unwrap();
        let mut file = File::create(tmp_dir.path().join("css").join("geektutu.css")).unwrap();
        write!(file, "body {{ margin: 0 }}").unwrap();
        let mut file = File::create(tmp_dir.path().join("my notes.txt")).unwrap();
        write!(file, "notes").unwrap();

        let server = Server::new("localhost:0").unwrap();
        let addr = server.local_addr();
        let base_path = tmp_dir.path().to_path_buf();
        thread::spawn(move || {
            let mut router = Router::new();
            router
                .get("/assets/*filepath", new_file_retriever(base_path))
                .unwrap();
            server.run(router);
        });

        let url = format!("http://{}/assets/css/geektutu.css", addr);
        let resp = reqwest::blocking::get(url).unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/octet-stream"
        );
        assert_eq!(resp.text().unwrap(), "body { margin: 0 }");

        let url = format!("http://{}/assets/my%20notes.txt", addr);
        let resp = reqwest::blocking::get(url).unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().unwrap(), "notes");

        let url = format!("http://{}/assets/missing.css", addr);
        let resp = reqwest::blocking::get(url).unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.text().unwrap(), "404 NOT FOUND: /assets/missing.css");
    }
}
