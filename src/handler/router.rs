//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the file pipeline, common headers and access logging.

use crate::config::AppState;
use crate::handler::files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Path and query exactly as sent
    pub target: &'a str,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // the body is never read, only GET and HEAD are served
    let (parts, body) = req.into_parts();
    drop(body);
    let method = &parts.method;
    let uri = &parts.uri;
    let target = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());

    let mut response = match *method {
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                target,
                path: uri.path(),
                query: uri.query(),
                is_head: *method == Method::HEAD,
                if_modified_since: parts
                    .headers
                    .get(IF_MODIFIED_SINCE)
                    .and_then(|v| v.to_str().ok()),
                has_if_none_match: parts.headers.contains_key(IF_NONE_MATCH),
            };
            files::serve(&ctx, &state).await
        }
        _ => {
            logger::log_warning(&format!("Unsupported method ({method}) for {target}"));
            http::build_501_response()
        }
    };

    *response.version_mut() = state.config.server.protocol_version.http_version();
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let header = |name: HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            target.to_string(),
        );
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().lower()).unwrap_or(usize::MAX);
        entry.referer = header(REFERER);
        entry.user_agent = header(USER_AGENT);
        entry.elapsed = started.elapsed();
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
