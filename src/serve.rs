//! Preview server.
//!
//! Serves collected content straight from memory on `tiny_http`: every
//! request path goes through the same route table as the static build, so
//! what the server shows is what `generate` writes. Files from the assets
//! directory are served as they are on disk.
//!
//! Requests are handled one at a time on the calling thread.

use crate::pages::{self, Route};
use crate::types::Content;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{info, warn};

/// Try the next port when the requested one is busy, this many times.
const MAX_PORT_RETRIES: u16 = 10;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to bind after {attempts} attempts (ports {first}-{last}): {message}")]
    Bind {
        attempts: u16,
        first: u16,
        last: u16,
        message: String,
    },
}

/// What a request resolved to.
#[derive(Debug, PartialEq)]
pub enum Served {
    Page(pages::Response),
    File {
        path: PathBuf,
        content_type: &'static str,
    },
}

/// Bind and serve until the process is stopped.
pub fn serve(
    content: &Content,
    source_dir: &Path,
    interface: IpAddr,
    port: u16,
) -> Result<(), ServeError> {
    let (server, addr) = try_bind_port(interface, port, MAX_PORT_RETRIES)?;
    let assets_dir = source_dir.join(&content.config.content.assets_dir);
    info!("serving on http://{addr}");
    println!("Serving on http://{addr} (Ctrl+C to stop)");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, content, &assets_dir) {
            warn!("request error: {e}");
        }
    }
    Ok(())
}

fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr), ServeError> {
    let mut last_error = String::new();
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);
        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    info!("port {base_port} in use, using {port} instead");
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(ServeError::Bind {
        attempts: max_retries,
        first: base_port,
        last: base_port.saturating_add(max_retries.saturating_sub(1)),
        message: last_error,
    })
}

fn handle_request(request: Request, content: &Content, assets_dir: &Path) -> Result<(), ServeError> {
    let served = resolve(content, assets_dir, request.url());
    let (status, response) = match served {
        Served::Page(page) => {
            let mut headers = vec![("Content-Type".to_string(), page.content_type.to_string())];
            headers.extend(page.headers);
            let mut response =
                Response::from_string(page.body).with_status_code(StatusCode(page.status));
            for (name, value) in &headers {
                if let Ok(header) = Header::from_bytes(name.as_str(), value.as_str()) {
                    response = response.with_header(header);
                }
            }
            (page.status, response)
        }
        Served::File { path, content_type } => {
            let mut response = Response::from_data(fs::read(&path)?);
            if let Ok(header) = Header::from_bytes("Content-Type", content_type) {
                response = response.with_header(header);
            }
            (200, response)
        }
    };
    info!(method = %request.method(), url = %request.url(), status, "request");
    request.respond(response)?;
    Ok(())
}

/// Resolve a raw request URL: split off the query, decode the path, then try
/// assets before the route table.
///
/// `?page=N` on a home page redirects to the static `/page/N` form.
pub fn resolve(content: &Content, assets_dir: &Path, raw_url: &str) -> Served {
    let (raw_path, query) = match raw_url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (raw_url, ""),
    };
    let raw_path = raw_path.split('#').next().unwrap_or_default();
    let path = urlencoding::decode(raw_path)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| raw_path.to_string());

    if let Some(file) = asset_file(assets_dir, &path) {
        return Served::File {
            content_type: guess_content_type(&file),
            path: file,
        };
    }
    let i18n = &content.config.i18n;
    let mut route = Route::parse(&path, i18n);
    if let Route::Home { locale, page: 1 } = &route
        && let Some(page) = query_page(query)
    {
        let target = Route::Home {
            locale: locale.clone(),
            page,
        };
        route = Route::Redirect {
            location: target.path(i18n),
        };
    }
    Served::Page(pages::respond(content, &route))
}

/// The `page` parameter of a query string, when it is a positive number.
fn query_page(query: &str) -> Option<usize> {
    query
        .split('#')
        .next()
        .unwrap_or_default()
        .split('&')
        .find_map(|pair| pair.strip_prefix("page="))
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| *n >= 1)
}

/// An existing file under `assets_dir` for `path`, refusing anything that
/// would step outside it.
fn asset_file(assets_dir: &Path, path: &str) -> Option<PathBuf> {
    let rel = Path::new(path.trim_start_matches('/'));
    if rel.as_os_str().is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    let candidate = assets_dir.join(rel);
    candidate.is_file().then_some(candidate)
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json" | "webmanifest") => "application/json; charset=utf-8",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect;
    use crate::test_helpers::*;

    fn page(served: Served) -> pages::Response {
        match served {
            Served::Page(page) => page,
            other => panic!("expected a page, got {other:?}"),
        }
    }

    #[test]
    fn resolves_pages_through_route_table() {
        let tmp = setup_fixtures();
        let content = collect(tmp.path()).unwrap();
        let assets = tmp.path().join("assets");

        let home = page(resolve(&content, &assets, "/"));
        assert_eq!(home.status, 200);
        assert_eq!(home.content_type, pages::HTML);

        let post = find_post(&content, "building-with-a-soul");
        let text = page(resolve(
            &content,
            &assets,
            &format!("/blog/{}.md", post.slug_as_params),
        ));
        assert_eq!(text.body, post.markdown);
    }

    #[test]
    fn decodes_percent_escapes() {
        let tmp = setup_fixtures();
        let content = collect(tmp.path()).unwrap();
        let assets = tmp.path().join("assets");
        let served = page(resolve(&content, &assets, "/llms%2Etxt"));
        assert_eq!(served.status, 200);
        assert_eq!(served.content_type, pages::TEXT);
    }

    #[test]
    fn query_is_split_before_decoding() {
        let tmp = setup_fixtures();
        let content = collect(tmp.path()).unwrap();
        let assets = tmp.path().join("assets");
        assert_eq!(page(resolve(&content, &assets, "/llms.txt?ref=x")).status, 200);
        assert_eq!(page(resolve(&content, &assets, "/llms.txt%3Fref=x")).status, 404);
    }

    #[test]
    fn page_query_redirects_to_static_page_path() {
        let tmp = setup_fixtures();
        let content = collect(tmp.path()).unwrap();
        let assets = tmp.path().join("assets");

        let served = page(resolve(&content, &assets, "/?page=2"));
        assert_eq!(served.status, 308);
        assert_eq!(
            served.headers,
            vec![("Location".to_string(), "/page/2".to_string())]
        );

        let served = page(resolve(&content, &assets, "/es?utm=x&page=3"));
        assert_eq!(
            served.headers,
            vec![("Location".to_string(), "/es/page/3".to_string())]
        );

        let served = page(resolve(&content, &assets, "/?page=first"));
        assert_eq!(served.status, 200);
    }

    #[test]
    fn query_page_parsing() {
        assert_eq!(query_page("page=4"), Some(4));
        assert_eq!(query_page("a=1&page=2#top"), Some(2));
        assert_eq!(query_page("page=0"), None);
        assert_eq!(query_page(""), None);
    }

    #[test]
    fn unknown_path_is_404_page() {
        let tmp = setup_fixtures();
        let content = collect(tmp.path()).unwrap();
        let served = page(resolve(&content, &tmp.path().join("assets"), "/nope/nothing"));
        assert_eq!(served.status, 404);
        assert!(served.body.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn default_locale_prefix_redirects() {
        let tmp = setup_fixtures();
        let content = collect(tmp.path()).unwrap();
        let served = page(resolve(&content, &tmp.path().join("assets"), "/en/llms.txt"));
        assert_eq!(served.status, 308);
        assert_eq!(
            served.headers,
            vec![("Location".to_string(), "/llms.txt".to_string())]
        );
    }

    #[test]
    fn serves_asset_files() {
        let tmp = setup_fixtures();
        let content = collect(tmp.path()).unwrap();
        let assets = tmp.path().join("assets");
        let served = resolve(&content, &assets, "/favicon.svg");
        assert_eq!(
            served,
            Served::File {
                path: assets.join("favicon.svg"),
                content_type: "image/svg+xml",
            }
        );
    }

    #[test]
    fn asset_lookup_rejects_traversal() {
        let tmp = setup_fixtures();
        let assets = tmp.path().join("assets");
        assert_eq!(asset_file(&assets, "/../config.toml"), None);
        assert_eq!(asset_file(&assets, "/"), None);
        assert!(asset_file(&assets, "/favicon.svg").is_some());
    }

    #[test]
    fn content_types() {
        assert_eq!(guess_content_type(Path::new("a.css")), "text/css; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("a.woff2")), "font/woff2");
        assert_eq!(
            guess_content_type(Path::new("a.bin")),
            "application/octet-stream"
        );
    }
}
