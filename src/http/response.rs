//! HTTP response building module
//!
//! Materializes engine response descriptors into hyper responses, and
//! provides builders for the fallback status responses.

use crate::engine::{BodySpec, ResponseDescriptor};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::SeekFrom;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Turn a response descriptor into a wire response
///
/// Body bytes are read here, after the engine has decided status and
/// headers. A file that vanished between resolution and read degrades to
/// 404. HEAD responses keep the descriptor's headers with no body bytes.
pub async fn materialize(descriptor: ResponseDescriptor, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        match load_body(&descriptor.body).await {
            Some(bytes) => bytes,
            None => return build_404_response(),
        }
    };

    let mut builder = Response::builder().status(descriptor.status);
    for (field, content) in &descriptor.headers {
        builder = builder.header(field.as_str(), content.as_str());
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(descriptor.status.as_u16(), &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Read the bytes a body spec refers to
async fn load_body(spec: &BodySpec) -> Option<Bytes> {
    match spec {
        BodySpec::Empty => Some(Bytes::new()),
        BodySpec::File(path) => tokio::fs::read(path).await.ok().map(Bytes::from),
        BodySpec::FileSlice {
            path,
            offset,
            length,
        } => {
            let mut file = tokio::fs::File::open(path).await.ok()?;
            file.seek(SeekFrom::Start(*offset)).await.ok()?;
            let mut buffer = Vec::with_capacity(usize::try_from(*length).ok()?);
            file.take(*length).read_to_end(&mut buffer).await.ok()?;
            Some(Bytes::from(buffer))
        }
    }
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error(404, &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error(405, &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Log response build error
fn log_build_error(status: u16, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}
