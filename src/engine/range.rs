//! HTTP Range request parsing module
//!
//! Range header parsing for byte-range requests, compliant with RFC 7233.
//! Only the `bytes` unit and single ranges are supported; multi-range
//! requests fall back to serving the full body.

/// A satisfiable byte range, absolute and inclusive on both ends.
///
/// `start` and `end` are already validated and clamped against the
/// resource length at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position
    pub start: u64,
    /// Last byte position (inclusive)
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by this range
    #[must_use]
    pub const fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Range header parse result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Valid single range within the resource
    Valid(ByteRange),
    /// Range has no overlap with the resource - should return 416
    NotSatisfiable,
    /// No Range header, malformed header, or multi-range (ignore, return full content)
    None,
}

/// Parse an HTTP Range header against a known resource length
///
/// Supported formats:
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end of resource
/// - `bytes=-suffix` - Last suffix bytes
///
/// Multi-range requests (`bytes=0-1,5-9`) are treated as if no Range
/// header was sent. Any range against a zero-length resource is
/// unsatisfiable.
///
/// # Examples
/// ```
/// use servus::engine::range::{parse_range_header, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=0-99"), 1000);
/// assert!(matches!(result, RangeParseResult::Valid(_)));
///
/// let result = parse_range_header(None, 1000);
/// assert!(matches!(result, RangeParseResult::None));
/// ```
#[must_use]
pub fn parse_range_header(range_header: Option<&str>, resource_len: u64) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    let Some(header) = header.strip_prefix("bytes=") else {
        return RangeParseResult::None; // Not bytes unit, ignore
    };

    // Only support single range (not multi-range)
    if header.contains(',') {
        return RangeParseResult::None;
    }

    let parts: Vec<&str> = header.split('-').collect();
    if parts.len() != 2 {
        return RangeParseResult::None;
    }

    let (start_str, end_str) = (parts[0].trim(), parts[1].trim());

    // Suffix range: "-500" means last 500 bytes
    if start_str.is_empty() {
        return parse_suffix_range(end_str, resource_len);
    }

    // Standard range: "start-" or "start-end"
    parse_standard_range(start_str, end_str, resource_len)
}

/// Parse suffix range (e.g., "-500")
fn parse_suffix_range(suffix_str: &str, resource_len: u64) -> RangeParseResult {
    let Ok(suffix) = suffix_str.parse::<u64>() else {
        return RangeParseResult::None;
    };

    if suffix == 0 || resource_len == 0 {
        return RangeParseResult::NotSatisfiable;
    }

    // Suffix larger than the resource is valid, it covers the whole resource
    let start = resource_len.saturating_sub(suffix);
    RangeParseResult::Valid(ByteRange {
        start,
        end: resource_len - 1,
    })
}

/// Parse standard range (e.g., "0-99" or "100-")
fn parse_standard_range(start_str: &str, end_str: &str, resource_len: u64) -> RangeParseResult {
    let Ok(start) = start_str.parse::<u64>() else {
        return RangeParseResult::None;
    };

    // Start beyond the resource has no overlap (covers zero-length resources)
    if start >= resource_len {
        return RangeParseResult::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        resource_len - 1 // Open-ended range
    } else {
        let Ok(e) = end_str.parse::<u64>() else {
            return RangeParseResult::None;
        };
        // Clamp end to the last byte of the resource
        e.min(resource_len - 1)
    };

    if start > end {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_range() {
        assert!(matches!(
            parse_range_header(None, 100),
            RangeParseResult::None
        ));
    }

    #[test]
    fn test_standard_range() {
        match parse_range_header(Some("bytes=0-9"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, 9);
                assert_eq!(r.length(), 10);
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn test_spec_example_range() {
        // bytes=2-12 on an 18-byte resource
        match parse_range_header(Some("bytes=2-12"), 18) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 2);
                assert_eq!(r.end, 12);
                assert_eq!(r.length(), 11);
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn test_open_range() {
        match parse_range_header(Some("bytes=50-"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 50);
                assert_eq!(r.end, 99);
                assert_eq!(r.length(), 50);
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn test_suffix_range() {
        match parse_range_header(Some("bytes=-20"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 80);
                assert_eq!(r.end, 99);
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn test_suffix_larger_than_resource() {
        match parse_range_header(Some("bytes=-500"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, 99);
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn test_end_clamped_to_resource() {
        match parse_range_header(Some("bytes=10-5000"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 10);
                assert_eq!(r.end, 99);
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn test_not_satisfiable() {
        assert!(matches!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeParseResult::NotSatisfiable
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=1234-5678"), 18),
            RangeParseResult::NotSatisfiable
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeParseResult::NotSatisfiable
        ));
    }

    #[test]
    fn test_zero_length_resource() {
        assert!(matches!(
            parse_range_header(Some("bytes=0-9"), 0),
            RangeParseResult::NotSatisfiable
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=-5"), 0),
            RangeParseResult::NotSatisfiable
        ));
        // No header on an empty resource is still a full (empty) body
        assert!(matches!(parse_range_header(None, 0), RangeParseResult::None));
    }

    #[test]
    fn test_invalid_format() {
        assert!(matches!(
            parse_range_header(Some("bytes=a-b"), 100),
            RangeParseResult::None
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeParseResult::None
        ));
        assert!(matches!(
            parse_range_header(Some("chunks=0-9"), 100),
            RangeParseResult::None
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=0-9-20"), 100),
            RangeParseResult::None
        ));
    }
}
