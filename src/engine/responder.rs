//! File response construction module
//!
//! Turns a resolved asset plus request conditions into a complete response
//! descriptor: status code, final header set, and a body reference the host
//! can stream. No file contents are read here.

use crate::engine::range::{ByteRange, RangeParseResult};
use crate::engine::resolver::ResolvedAsset;
use crate::engine::rules::HeaderSet;
use crate::http::mime;
use httpdate::{fmt_http_date, parse_http_date};
use hyper::{Method, StatusCode};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Body reference carried by a response descriptor
///
/// Actual byte streaming is the host's job; the descriptor carries
/// everything needed to do it (path, offset, length).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySpec {
    /// No body bytes (304, 416, 405)
    Empty,
    /// The whole file
    File(PathBuf),
    /// A byte slice of the file
    FileSlice {
        path: PathBuf,
        offset: u64,
        length: u64,
    },
}

/// Complete response produced by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub headers: HeaderSet,
    pub body: BodySpec,
}

impl ResponseDescriptor {
    fn new(status: StatusCode, headers: HeaderSet, body: BodySpec) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

/// Build the response descriptor for a resolved asset
///
/// Decision order: method check, conditional check, range check, full body.
/// Rule-injected `extra_headers` override the defaults (`Last-Modified`,
/// `Content-Type`), but status-mandatory headers (`Content-Length`,
/// `Content-Range`) are applied after the merge and cannot be displaced.
/// HEAD requests get the same headers with the body bytes omitted by the
/// host.
#[must_use]
pub fn respond(
    asset: &ResolvedAsset,
    method: &Method,
    if_modified_since: Option<&str>,
    range: &RangeParseResult,
    extra_headers: &HeaderSet,
) -> ResponseDescriptor {
    // The outer dispatcher filters methods already, but stay safe when
    // invoked directly with something else.
    if *method != Method::GET && *method != Method::HEAD {
        let mut headers = HeaderSet::new();
        headers.insert("allow".to_string(), "GET, HEAD".to_string());
        return ResponseDescriptor::new(StatusCode::METHOD_NOT_ALLOWED, headers, BodySpec::Empty);
    }

    let mut headers = HeaderSet::new();
    headers.insert("last-modified".to_string(), fmt_http_date(asset.modified));
    headers.insert(
        "content-type".to_string(),
        mime::get_content_type(asset.path.extension().and_then(|e| e.to_str())).to_string(),
    );
    // Field names are kept lowercase so overwrite semantics hold no
    // matter how a caller cased its extra headers.
    for (field, content) in extra_headers {
        headers.insert(field.to_ascii_lowercase(), content.clone());
    }

    if unmodified_since(if_modified_since, asset.modified) {
        // 304 must not describe a body
        headers.remove("content-type");
        headers.remove("content-length");
        headers.remove("content-range");
        return ResponseDescriptor::new(StatusCode::NOT_MODIFIED, headers, BodySpec::Empty);
    }

    match range {
        RangeParseResult::NotSatisfiable => {
            // Bodyless, like 304
            headers.remove("content-type");
            headers.remove("content-length");
            headers.insert(
                "content-range".to_string(),
                format!("bytes */{}", asset.size),
            );
            ResponseDescriptor::new(
                StatusCode::RANGE_NOT_SATISFIABLE,
                headers,
                BodySpec::Empty,
            )
        }
        RangeParseResult::Valid(byte_range) => {
            partial_descriptor(asset, *byte_range, headers)
        }
        RangeParseResult::None => {
            headers.insert("accept-ranges".to_string(), "bytes".to_string());
            headers.insert("content-length".to_string(), asset.size.to_string());
            ResponseDescriptor::new(
                StatusCode::OK,
                headers,
                BodySpec::File(asset.path.clone()),
            )
        }
    }
}

fn partial_descriptor(
    asset: &ResolvedAsset,
    byte_range: ByteRange,
    mut headers: HeaderSet,
) -> ResponseDescriptor {
    headers.insert("accept-ranges".to_string(), "bytes".to_string());
    headers.insert(
        "content-range".to_string(),
        format!("bytes {}-{}/{}", byte_range.start, byte_range.end, asset.size),
    );
    headers.insert(
        "content-length".to_string(),
        byte_range.length().to_string(),
    );
    ResponseDescriptor::new(
        StatusCode::PARTIAL_CONTENT,
        headers,
        BodySpec::FileSlice {
            path: asset.path.clone(),
            offset: byte_range.start,
            length: byte_range.length(),
        },
    )
}

/// Check If-Modified-Since against the asset's mtime
///
/// HTTP dates carry no sub-second precision, so the comparison is done at
/// second granularity; a header equal to the formatted mtime counts as
/// unmodified.
fn unmodified_since(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(value) = if_modified_since else {
        return false;
    };
    let Ok(since) = parse_http_date(value.trim()) else {
        return false; // Malformed date, serve normally
    };
    whole_seconds(since) >= whole_seconds(modified)
}

fn whole_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
