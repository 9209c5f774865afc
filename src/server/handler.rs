//! Request handling module
//!
//! Entry point for HTTP request processing: method validation, conditional
//! and range header extraction, engine dispatch, and the 404 fallthrough
//! when the engine reports a request as not handled.

use crate::config::AppState;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    // Only GET and HEAD are servable; everything else is rejected here
    // rather than silently served.
    if method != Method::GET && method != Method::HEAD {
        logger::log_warning(&format!("Method not allowed: {method}"));
        let response = http::build_405_response();
        log_access(&state, &peer_addr, method.as_str(), &path, &response);
        return Ok(response);
    }

    let if_modified_since = header_value(&req, "if-modified-since");
    let range_header = header_value(&req, "range");

    let response = match state.engine.try_serve(
        &method,
        &path,
        if_modified_since.as_deref(),
        range_header.as_deref(),
    ) {
        Some(descriptor) => http::materialize(descriptor, is_head).await,
        // This binary has no downstream application to fall through to,
        // so NotHandled becomes the final 404.
        None => http::build_404_response(),
    };

    log_access(&state, &peer_addr, method.as_str(), &path, &response);
    Ok(response)
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn log_access(
    state: &Arc<AppState>,
    peer_addr: &SocketAddr,
    method: &str,
    path: &str,
    response: &Response<Full<Bytes>>,
) {
    if state.config.logging.access_log {
        let bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        logger::log_access(peer_addr, method, path, response.status().as_u16(), bytes);
    }
}
