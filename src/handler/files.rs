//! Static file pipeline
//!
//! Resolves the request, then serves an index file, a directory listing or
//! the file itself.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, date, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

const FILE_NOT_FOUND: &str = "File not found";
const LIST_NOT_FOUND: &str = "No permission to list directory";

/// Serve a GET or HEAD request from the configured root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let resolved = state.resolver.resolve(ctx.target);
    logger::log_debug(&format!(
        "Resolved {} -> {}",
        ctx.target,
        resolved.as_path().display()
    ));

    if is_directory(resolved.as_path()).await {
        if !ctx.path.ends_with('/') {
            return http::build_redirect_response(&slash_location(ctx));
        }
        if let Some(index) = find_index(resolved.as_path(), &state.config.http.index_files).await {
            return serve_file(ctx, &index).await;
        }
        return serve_listing(ctx, state, resolved.into_path_buf()).await;
    }

    // a file never answers for `name/`
    if resolved.has_trailing_slash() {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    }

    serve_file(ctx, resolved.as_path()).await
}

/// Location for a directory requested without its trailing slash.
///
/// Leading slashes collapse to one: `//host` would read as a
/// protocol-relative URL pointing at another server.
fn slash_location(ctx: &RequestContext<'_>) -> String {
    let path = ctx.path.trim_start_matches('/');
    match ctx.query {
        Some(query) => format!("/{path}/?{query}"),
        None => format!("/{path}/"),
    }
}

async fn is_directory(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// First configured index file present in `dir`
async fn find_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for name in index_files {
        let candidate = dir.join(name);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

async fn serve_listing(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: PathBuf,
) -> Response<Full<Bytes>> {
    let lister = Arc::clone(&state.lister);
    let request_path = ctx.target.to_string();

    match tokio::task::spawn_blocking(move || lister.list(&dir, &request_path)).await {
        Ok(Some(listing)) => http::build_listing_response(listing, ctx.is_head),
        Ok(None) => http::build_404_response(LIST_NOT_FOUND, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("Directory listing task failed for {}: {e}", ctx.target));
            http::build_404_response(LIST_NOT_FOUND, ctx.is_head)
        }
    }
}

async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(path).await {
        Ok(m) if m.is_file() => m,
        // File not found is common (404), no need to log at warning level
        _ => return http::build_404_response(FILE_NOT_FOUND, ctx.is_head),
    };

    let modified = metadata.modified().ok();
    let last_modified = modified.map(date::format_http_date);

    if let (Some(mtime), Some(stamp)) = (modified, last_modified.as_deref()) {
        if date::is_not_modified(mtime, ctx.if_modified_since, ctx.has_if_none_match) {
            return http::build_304_response(stamp);
        }
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_warning(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
        }
    };

    http::build_file_response(
        content,
        mime::guess_type(path),
        last_modified.as_deref(),
        ctx.is_head,
    )
}
