//! Static file engine module
//!
//! Composition root of the file-serving core: resolves the request path,
//! computes rule-injected headers, parses the Range header, and builds the
//! response descriptor. Holds only read-only state, so concurrent requests
//! need no locking.

pub mod range;
pub mod resolver;
pub mod responder;
pub mod rules;

// Re-export the engine surface
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use resolver::{PathResolver, ResolvedAsset};
pub use responder::{respond, BodySpec, ResponseDescriptor};
pub use rules::{compute_headers, HeaderRule, HeaderSet, RuleKind};

use hyper::Method;
use thiserror::Error;

/// Configuration errors surfaced at engine construction
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document root '{root}' is unusable: {source}")]
    DocumentRoot {
        root: String,
        source: std::io::Error,
    },
    #[error("invalid header rule pattern '{pattern}': {source}")]
    RulePattern {
        pattern: String,
        source: regex::Error,
    },
}

/// The file-serving engine
///
/// Constructed once with a document root, an ordered header rule list, and
/// the opaque page-cache extension; immutable afterwards.
#[derive(Debug, Clone)]
pub struct StaticEngine {
    resolver: PathResolver,
    rules: Vec<HeaderRule>,
}

impl StaticEngine {
    /// Build an engine, failing fast on a missing document root
    pub fn new(
        root: &str,
        rules: Vec<HeaderRule>,
        page_cache_ext: &str,
    ) -> Result<Self, EngineError> {
        let resolver =
            PathResolver::new(root, page_cache_ext).map_err(|source| EngineError::DocumentRoot {
                root: root.to_string(),
                source,
            })?;
        Ok(Self { resolver, rules })
    }

    /// The canonical document root the engine serves from
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        self.resolver.root()
    }

    /// Serve one request, or report that it is not handled here
    ///
    /// `None` means no matching file (or a non-GET/HEAD method) and the
    /// host must fall through to its own handling. Repeated calls with
    /// identical inputs and an unchanged filesystem produce identical
    /// descriptors.
    #[must_use]
    pub fn try_serve(
        &self,
        method: &Method,
        path: &str,
        if_modified_since: Option<&str>,
        range_header: Option<&str>,
    ) -> Option<ResponseDescriptor> {
        if *method != Method::GET && *method != Method::HEAD {
            return None;
        }

        // At most one trailing slash is dropped; "/a//" stays "/a/"
        let path = path.strip_suffix('/').unwrap_or(path);
        let asset = self.resolver.resolve(path)?;
        let extra_headers = rules::compute_headers(&asset.url_path, &self.rules);
        let range = range::parse_range_header(range_header, asset.size);
        Some(responder::respond(
            &asset,
            method,
            if_modified_since,
            &range,
            &extra_headers,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;
    use std::fs;
    use std::path::PathBuf;

    fn setup(name: &str) -> PathBuf {
        let base = std::env::temp_dir().join(format!("servus-engine-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&base);
        let root = base.join("public");
        fs::create_dir_all(root.join("fonts")).unwrap();
        fs::write(base.join("secret.txt"), "top secret").unwrap();
        fs::write(root.join("index.html"), "<html>Index</html>").unwrap();
        fs::write(root.join("fonts").join("a.woff"), "woffwoff").unwrap();
        root
    }

    fn engine(root: &std::path::Path, rules: Vec<HeaderRule>) -> StaticEngine {
        StaticEngine::new(root.to_str().unwrap(), rules, "").unwrap()
    }

    fn cache_rule(kind: RuleKind, value: &str) -> HeaderRule {
        let mut headers = HeaderSet::new();
        headers.insert("cache-control".to_string(), value.to_string());
        HeaderRule::new(kind, headers)
    }

    #[test]
    fn test_serves_existing_file() {
        let root = setup("serves");
        let e = engine(&root, vec![]);

        let desc = e
            .try_serve(&Method::GET, "/index.html", None, None)
            .unwrap();
        assert_eq!(desc.status, StatusCode::OK);
        assert_eq!(desc.headers.get("content-length").unwrap(), "18");
        assert_eq!(desc.body, BodySpec::File(root.canonicalize().unwrap().join("index.html")));
    }

    #[test]
    fn test_missing_file_not_handled() {
        let root = setup("not-handled");
        let e = engine(&root, vec![]);

        assert!(e.try_serve(&Method::GET, "/unknown.html", None, None).is_none());
    }

    #[test]
    fn test_non_get_head_passes_through() {
        let root = setup("methods");
        let e = engine(&root, vec![]);

        assert!(e.try_serve(&Method::POST, "/index.html", None, None).is_none());
        assert!(e.try_serve(&Method::DELETE, "/index.html", None, None).is_none());
    }

    #[test]
    fn test_trailing_slash_is_chomped() {
        let root = setup("trailing");
        let e = StaticEngine::new(root.to_str().unwrap(), vec![], ".html").unwrap();

        let desc = e.try_serve(&Method::GET, "/fonts/", None, None);
        // "/fonts" resolves via the /index.html variant only if it exists
        assert!(desc.is_none());

        let desc = e.try_serve(&Method::GET, "/index/", None, None).unwrap();
        assert_eq!(desc.status, StatusCode::OK);

        // Only a single trailing slash is chomped
        assert!(e.try_serve(&Method::GET, "/index//", None, None).is_none());
    }

    #[test]
    fn test_traversal_is_not_handled() {
        let root = setup("traversal");
        let e = engine(&root, vec![]);

        assert!(e.try_serve(&Method::GET, "/../secret.txt", None, None).is_none());
        assert!(e.try_serve(&Method::GET, "../secret.txt", None, None).is_none());
    }

    #[test]
    fn test_rule_precedence_end_to_end() {
        let root = setup("rules");
        let e = engine(
            &root,
            vec![
                cache_rule(RuleKind::Global, "public"),
                cache_rule(RuleKind::Prefix("/fonts".to_string()), "public, max-age=1"),
            ],
        );

        let desc = e
            .try_serve(&Method::GET, "/fonts/a.woff", None, None)
            .unwrap();
        assert_eq!(
            desc.headers.get("cache-control").unwrap(),
            "public, max-age=1"
        );

        let desc = e.try_serve(&Method::GET, "/index.html", None, None).unwrap();
        assert_eq!(desc.headers.get("cache-control").unwrap(), "public");
    }

    #[test]
    fn test_range_end_to_end() {
        let root = setup("range");
        let e = engine(&root, vec![]);

        let desc = e
            .try_serve(&Method::GET, "/index.html", None, Some("bytes=2-12"))
            .unwrap();
        assert_eq!(desc.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(desc.headers.get("content-range").unwrap(), "bytes 2-12/18");
        match desc.body {
            BodySpec::FileSlice { offset, length, .. } => {
                assert_eq!(offset, 2);
                assert_eq!(length, 11);
            }
            other => panic!("expected slice body, got {other:?}"),
        }

        let desc = e
            .try_serve(&Method::GET, "/index.html", None, Some("bytes=1234-5678"))
            .unwrap();
        assert_eq!(desc.status, StatusCode::RANGE_NOT_SATISFIABLE);
    }

    #[test]
    fn test_idempotent_for_unchanged_filesystem() {
        let root = setup("idempotent");
        let e = engine(&root, vec![cache_rule(RuleKind::Global, "public")]);

        let first = e.try_serve(&Method::GET, "/index.html", None, Some("bytes=0-5"));
        let second = e.try_serve(&Method::GET, "/index.html", None, Some("bytes=0-5"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_construction_fails_for_missing_root() {
        let err = StaticEngine::new("/definitely/not/a/real/dir", vec![], "").unwrap_err();
        assert!(matches!(err, EngineError::DocumentRoot { .. }));
    }
}
