//! Request path resolution module
//!
//! Maps a URL path onto a regular file inside the document root, or reports
//! no match. Candidate paths are canonicalized through the OS path
//! resolution, so `..` segments are allowed exactly when the resolved result
//! stays inside the root. Directories never resolve.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Bytes escaped when rebuilding the root-relative URL path
const URL_PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'#')
    .add(b'%');

/// A concrete file selected to satisfy a request path
///
/// Created fresh per request; metadata is read at resolution time and not
/// cached, since directory contents may change between requests.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    /// Canonical absolute filesystem path
    pub path: PathBuf,
    /// Root-relative URL path, re-escaped, with leading slash
    pub url_path: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

/// Resolves URL paths against a fixed document root
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Canonical document root, established at construction
    root: PathBuf,
    /// Opaque page-cache extension, possibly empty (e.g., ".html")
    page_cache_ext: String,
}

impl PathResolver {
    /// Create a resolver rooted at `root`
    ///
    /// Fails when the root does not exist or is not a directory, so a
    /// misconfigured document root is caught at startup rather than
    /// per request.
    pub fn new(root: &str, page_cache_ext: &str) -> std::io::Result<Self> {
        let root = std::fs::canonicalize(root)?;
        if !root.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("document root '{}' is not a directory", root.display()),
            ));
        }
        Ok(Self {
            root,
            page_cache_ext: page_cache_ext.to_string(),
        })
    }

    /// The canonical document root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a URL path to an existing regular file inside the root
    ///
    /// Tries the literal path, the path with the page-cache extension
    /// appended, and the path as a directory with an `index` file, in that
    /// order. Returns `None` when nothing matches, the match is not a
    /// regular file, or the canonical result escapes the root.
    #[must_use]
    pub fn resolve(&self, request_path: &str) -> Option<ResolvedAsset> {
        let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
        let relative = decoded.trim_start_matches('/');

        let base = if relative.is_empty() {
            self.root.to_str()?.to_string()
        } else {
            format!("{}/{}", self.root.to_str()?, relative)
        };

        let ext = &self.page_cache_ext;
        let candidates = [
            base.clone(),
            format!("{base}{ext}"),
            format!("{base}/index{ext}"),
        ];

        for candidate in &candidates {
            if let Some(asset) = self.try_candidate(candidate) {
                return Some(asset);
            }
        }
        None
    }

    fn try_candidate(&self, candidate: &str) -> Option<ResolvedAsset> {
        // Canonicalization resolves ".." against the real filesystem and
        // fails for paths that do not exist.
        let canonical = std::fs::canonicalize(candidate).ok()?;

        // Component-wise prefix check: "/root-evil" does not pass for
        // a root of "/root".
        if !canonical.starts_with(&self.root) {
            return None;
        }

        let metadata = std::fs::metadata(&canonical).ok()?;
        if !metadata.is_file() {
            return None;
        }

        let url_path = self.escape_url_path(&canonical)?;
        Some(ResolvedAsset {
            path: canonical,
            url_path,
            size: metadata.len(),
            modified: metadata.modified().ok()?,
        })
    }

    /// Strip the root prefix and rebuild a URL path, escaping each segment
    fn escape_url_path(&self, canonical: &Path) -> Option<String> {
        let relative = canonical.strip_prefix(&self.root).ok()?;
        let mut url_path = String::new();
        for component in relative.components() {
            if let Component::Normal(segment) = component {
                url_path.push('/');
                url_path.push_str(&utf8_percent_encode(segment.to_str()?, URL_PATH_ESCAPE).to_string());
            }
        }
        Some(url_path)
    }
}
