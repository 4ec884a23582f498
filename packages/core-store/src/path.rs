//! Field paths into a document.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors related to field path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A dotted segment is not a valid identifier or array index.
    #[error("invalid path segment '{segment}' at position {position}: {message}")]
    InvalidSegment {
        segment: String,
        position: usize,
        message: String,
    },
    /// The path as a whole is unusable.
    #[error("invalid field path: {message}")]
    InvalidPath { message: String },
}

/// A locator for one field inside a document.
///
/// Two spellings are accepted:
///
/// - dotted, e.g. `alerts.window`, where every segment must be a Unicode
///   identifier (UAX#31) or a numeric array index;
/// - structured, built from explicit segments, where any non-empty string
///   is allowed. Use this for keys such as e-mail addresses that contain
///   dots.
///
/// A field path always has at least one segment.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted field path.
    ///
    /// ```rust
    /// use docbind_core_store::FieldPath;
    ///
    /// let path = FieldPath::parse("alerts.window").unwrap();
    /// assert_eq!(path.len(), 2);
    /// assert!(FieldPath::parse("").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::InvalidPath {
                message: "field path must not be empty".to_string(),
            });
        }

        let segments: Vec<String> = s.split('.').map(str::to_string).collect();
        for (i, segment) in segments.iter().enumerate() {
            Self::validate_dotted_segment(segment, i)?;
        }

        Ok(FieldPath { segments })
    }

    /// Build a structured path from raw segments.
    ///
    /// Segments are taken verbatim; only emptiness is rejected.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::InvalidPath {
                message: "field path needs at least one segment".to_string(),
            });
        }
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(PathError::InvalidSegment {
                segment: String::new(),
                position,
                message: "empty segment".to_string(),
            });
        }
        Ok(FieldPath { segments })
    }

    fn validate_dotted_segment(segment: &str, position: usize) -> Result<(), PathError> {
        let invalid = |message: String| PathError::InvalidSegment {
            segment: segment.to_string(),
            position,
            message,
        };

        let mut chars = segment.chars();
        let Some(first) = chars.next() else {
            return Err(invalid("empty segment".to_string()));
        };

        // Array indices
        if segment.chars().all(|c| c.is_ascii_digit()) {
            return Ok(());
        }

        let valid_start = unicode_ident::is_xid_start(first)
            || (first == '_'
                && chars
                    .clone()
                    .next()
                    .is_some_and(unicode_ident::is_xid_continue));
        if !valid_start {
            return Err(invalid(
                "must start with a letter or underscore followed by letter/digit".to_string(),
            ));
        }

        if let Some(bad) = chars.find(|c| !unicode_ident::is_xid_continue(*c)) {
            return Err(invalid(format!("invalid character '{}' in identifier", bad)));
        }

        Ok(())
    }

    /// Number of segments; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.segments.iter()
    }

    /// The last segment, i.e. the field name within its parent.
    pub fn leaf(&self) -> &str {
        // Construction guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Path of the enclosing map, `None` for top-level fields.
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(FieldPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append one raw segment.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        FieldPath { segments }
    }

    pub fn has_prefix(&self, prefix: &FieldPath) -> bool {
        prefix.segments.len() <= self.segments.len()
            && prefix.segments == self.segments[..prefix.segments.len()]
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl std::str::FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FieldPath::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a dotted field path literal, panicking if it is malformed.
///
/// ```rust
/// use docbind_core_store::field;
///
/// let p = field!("alerts.enabled");
/// assert_eq!(p.leaf(), "enabled");
/// ```
#[macro_export]
macro_rules! field {
    ($s:expr) => {
        $crate::FieldPath::parse($s).expect("invalid field path literal")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dotted_paths() {
        assert_eq!(FieldPath::parse("enabled").unwrap().len(), 1);
        assert_eq!(FieldPath::parse("alerts.window").unwrap().len(), 2);
        assert_eq!(FieldPath::parse("items.0.name").unwrap().len(), 3);
    }

    #[test]
    fn empty_paths_rejected() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse("a.").is_err());
        assert!(FieldPath::from_segments(Vec::<String>::new()).is_err());
    }

    #[test]
    fn invalid_dotted_segments_rejected() {
        assert!(FieldPath::parse("foo.bar baz").is_err());
        assert!(FieldPath::parse("foo.bar-baz").is_err());
        assert!(FieldPath::parse("foo.123abc").is_err());
        assert!(FieldPath::parse("_").is_err());
        assert!(FieldPath::parse("_private").is_ok());
    }

    #[test]
    fn structured_segments_are_verbatim() {
        let p = FieldPath::from_segments(["clients", "alice@example.com"]).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.leaf(), "alice@example.com");

        let err = FieldPath::from_segments(["ok", ""]).unwrap_err();
        assert!(err.to_string().contains("empty segment"));
    }

    #[test]
    fn parent_and_child() {
        let p = field!("alerts.window");
        assert_eq!(p.parent(), Some(field!("alerts")));
        assert_eq!(field!("alerts").parent(), None);
        assert_eq!(field!("alerts").child("window"), p);
        assert!(p.has_prefix(&field!("alerts")));
        assert!(!p.has_prefix(&field!("window")));
    }

    #[test]
    fn display_uses_dots() {
        assert_eq!(field!("a.b.c").to_string(), "a.b.c");
    }

    #[test]
    fn invalid_character_reported() {
        let err = FieldPath::parse("foo$bar").unwrap_err();
        assert!(err.to_string().contains("invalid character"));
    }

    #[test]
    fn serde_as_string() {
        let p: FieldPath = serde_json::from_str("\"alerts.enabled\"").unwrap();
        assert_eq!(p, field!("alerts.enabled"));
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"alerts.enabled\"");
        assert!(serde_json::from_str::<FieldPath>("\"bad path\"").is_err());
    }
}
