//! Header rule matching module
//!
//! Evaluates an ordered list of header rules against a served URL path and
//! accumulates the HTTP headers the response should carry. Rules are applied
//! in listed order with overwrite-on-collision, so later rules override
//! earlier ones for the same header field.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::BTreeMap;

/// Accumulated header fields, keys unique
pub type HeaderSet = BTreeMap<String, String>;

/// Webfont extensions covered by the fonts shortcut rule
const FONT_EXTENSIONS: [&str; 5] = [".ttf", ".otf", ".eot", ".woff", ".svg"];

/// Match condition of a header rule
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Matches every file
    Global,
    /// Matches common webfont extensions
    Fonts,
    /// Matches files ending in `.` + one of the listed extensions
    Extensions(Vec<String>),
    /// Matches paths starting with the given folder prefix
    Prefix(String),
    /// Matches paths the regular expression matches anywhere
    Pattern(Regex),
}

/// A match condition plus the headers to apply when it matches
#[derive(Debug, Clone)]
pub struct HeaderRule {
    pub kind: RuleKind,
    pub headers: HeaderSet,
}

impl HeaderRule {
    #[must_use]
    pub const fn new(kind: RuleKind, headers: HeaderSet) -> Self {
        Self { kind, headers }
    }
}

/// Compute the final header set for a served path
///
/// `path` is the root-relative URL path of the resolved asset (leading
/// slash, percent-escaped). Field names are normalized to lowercase so
/// collision overwrites work regardless of configured casing. Returns an
/// empty set when no rule matches.
#[must_use]
pub fn compute_headers(path: &str, rules: &[HeaderRule]) -> HeaderSet {
    let mut accumulated = HeaderSet::new();
    for rule in rules {
        if rule_matches(&rule.kind, path) {
            for (field, content) in &rule.headers {
                accumulated.insert(field.to_ascii_lowercase(), content.clone());
            }
        }
    }
    accumulated
}

fn rule_matches(kind: &RuleKind, path: &str) -> bool {
    match kind {
        RuleKind::Global => true,
        RuleKind::Fonts => FONT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)),
        RuleKind::Extensions(extensions) => extensions
            .iter()
            .any(|ext| path.ends_with(&format!(".{ext}"))),
        RuleKind::Prefix(prefix) => prefix_matches(prefix, path),
        RuleKind::Pattern(re) => re.is_match(path),
    }
}

/// Folder prefix matching
///
/// The path is compared in decoded form, and the configured prefix matches
/// with or without its leading slash.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    if decoded.starts_with(prefix) {
        return true;
    }
    let slashed = format!("/{}", prefix.trim_start_matches('/'));
    decoded.starts_with(&slashed)
}
