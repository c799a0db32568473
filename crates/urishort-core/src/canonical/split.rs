//! Generic five-component URI splitting and joining.
//!
//! `split` and `join` are inverses for every string `join` produces, which is
//! what keeps the canonical string (and therefore its digest) stable.

use std::fmt;

use crate::error::{Result, ShortenError};

/// A URI split into scheme, authority, path, query and fragment.
///
/// Empty components are stored as `None`. Values are immutable once built;
/// use [`CanonicalUri::from_parts`] to derive a new one from edited fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalUri {
    pub(crate) scheme: Option<String>,
    pub(crate) authority: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
}

impl CanonicalUri {
    /// Split `input` using generic URI rules. Accepts strings without any
    /// scheme delimiter (bare host or path).
    pub fn split(input: &str) -> Result<Self> {
        let mut rest = input;

        let mut scheme = None;
        if let Some(colon) = rest.find(':') {
            let candidate = &rest[..colon];
            if is_scheme(candidate) {
                scheme = Some(candidate.to_ascii_lowercase());
                rest = &rest[colon + 1..];
            }
        }

        let mut authority = None;
        if let Some(after) = rest.strip_prefix("//") {
            let end = after
                .find(|c| matches!(c, '/' | '?' | '#'))
                .unwrap_or(after.len());
            authority = non_empty(&after[..end]);
            rest = &after[end..];
        }

        let (rest, fragment) = match rest.split_once('#') {
            Some((head, frag)) => (head, non_empty(frag)),
            None => (rest, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((head, query)) => (non_empty(head), non_empty(query)),
            None => (non_empty(rest), None),
        };

        if let Some(auth) = &authority {
            if auth.contains('[') != auth.contains(']') {
                return Err(ShortenError::InvalidInput(format!(
                    "unbalanced brackets in authority: {auth}"
                )));
            }
        }

        Ok(Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        })
    }

    /// Build from components by joining and re-splitting, so the result is
    /// always in the shape `split` would produce.
    pub fn from_parts(
        scheme: Option<String>,
        authority: Option<String>,
        path: Option<String>,
        query: Option<String>,
        fragment: Option<String>,
    ) -> Result<Self> {
        let joined = Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
        .join();
        Self::split(&joined)
    }

    /// Serialize the components back into one string.
    pub fn join(&self) -> String {
        let path = self.path.as_deref().unwrap_or("");
        let mut out = String::with_capacity(path.len() + 16);

        if let Some(scheme) = &self.scheme {
            out.push_str(scheme);
            out.push(':');
        }
        match &self.authority {
            Some(authority) => {
                out.push_str("//");
                out.push_str(authority);
                if !path.is_empty() && !path.starts_with('/') {
                    out.push('/');
                }
            }
            // Empty authority must survive, otherwise the path is read back as one.
            None if path.starts_with("//") => out.push_str("//"),
            None if self.uses_authority() && (path.is_empty() || path.starts_with('/')) => {
                out.push_str("//")
            }
            None => {}
        }
        out.push_str(path);
        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }

    fn uses_authority(&self) -> bool {
        self.scheme
            .as_deref()
            .is_some_and(|s| AUTHORITY_SCHEMES.contains(&s))
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl fmt::Display for CanonicalUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}

/// Schemes whose joined form always carries the `//` authority marker, even
/// when the authority is empty (`https:///path`, `file:///etc/hosts`).
const AUTHORITY_SCHEMES: &[&str] = &[
    "ftp", "http", "gopher", "nntp", "telnet", "imap", "wais", "file", "mms", "https", "shttp",
    "snews", "prospero", "rtsp", "rtspu", "rsync", "svn", "svn+ssh", "sftp", "nfs", "git",
    "git+ssh", "ws", "wss",
];

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub(crate) fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(uri: &CanonicalUri) -> [Option<&str>; 5] {
        [
            uri.scheme(),
            uri.authority(),
            uri.path(),
            uri.query(),
            uri.fragment(),
        ]
    }

    #[test]
    fn splits_full_uri() {
        let uri = CanonicalUri::split("HTTPS://example.com/example?ex=exp&aa=a#123").unwrap();
        assert_eq!(
            parts(&uri),
            [
                Some("https"),
                Some("example.com"),
                Some("/example"),
                Some("ex=exp&aa=a"),
                Some("123")
            ]
        );
    }

    #[test]
    fn bare_host_is_a_path() {
        let uri = CanonicalUri::split("example.com/x").unwrap();
        assert_eq!(parts(&uri), [None, None, Some("example.com/x"), None, None]);
    }

    #[test]
    fn network_path_reference_has_authority() {
        let uri = CanonicalUri::split("//example.com?ex=exp").unwrap();
        assert_eq!(
            parts(&uri),
            [None, Some("example.com"), None, Some("ex=exp"), None]
        );
    }

    #[test]
    fn invalid_scheme_chars_are_not_a_scheme() {
        let uri = CanonicalUri::split("<a>://b").unwrap();
        assert_eq!(uri.scheme(), None);
        assert_eq!(uri.path(), Some("<a>://b"));
        assert!(CanonicalUri::split("1abc:x").unwrap().scheme().is_none());
    }

    #[test]
    fn opaque_scheme_keeps_path() {
        let uri = CanonicalUri::split("ethereum:0xABC?msg=hi#1").unwrap();
        assert_eq!(
            parts(&uri),
            [Some("ethereum"), None, Some("0xABC"), Some("msg=hi"), Some("1")]
        );
    }

    #[test]
    fn fragment_may_contain_question_mark() {
        let uri = CanonicalUri::split("https://a/p#x?y").unwrap();
        assert_eq!(uri.query(), None);
        assert_eq!(uri.fragment(), Some("x?y"));
    }

    #[test]
    fn empty_query_and_fragment_are_dropped() {
        let uri = CanonicalUri::split("https://example.com?#").unwrap();
        assert_eq!(uri.join(), "https://example.com");
    }

    #[test]
    fn unbalanced_brackets_rejected() {
        assert!(matches!(
            CanonicalUri::split("ssh://[::1:22"),
            Err(ShortenError::InvalidInput(_))
        ));
        assert!(CanonicalUri::split("ssh://::1]:22").is_err());
        assert!(CanonicalUri::split("ssh://test@[::1]:22").is_ok());
    }

    #[test]
    fn join_inserts_slash_between_authority_and_relative_path() {
        let uri = CanonicalUri::from_parts(
            Some("https".into()),
            Some("example.com".into()),
            Some("x".into()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(uri.join(), "https://example.com/x");
        assert_eq!(uri.path(), Some("/x"));
    }

    #[test]
    fn from_parts_resplits_patched_authority() {
        let uri = CanonicalUri::from_parts(
            None,
            Some("example.com/path".into()),
            None,
            Some("q=1".into()),
            None,
        )
        .unwrap();
        assert_eq!(uri.authority(), Some("example.com"));
        assert_eq!(uri.path(), Some("/path"));
        assert_eq!(uri.query(), Some("q=1"));
    }

    #[test]
    fn join_split_is_stable() {
        let inputs = [
            "https://example.com",
            "https://example.com/",
            "https:////double",
            "https:///single",
            "https://",
            "https://?q=1",
            "file:///etc/hosts",
            "ethereum:0x5d67690768F0Fc4780c578393Ca567e5bCb38378?msg=asdf#123",
            "mailto:John Doe<john_doe@example.com>?subject=Test123%20!@",
            "ssh://test@[::1]:22",
            "https://<script>alert(1)</script>://<script>alert(1)</script>",
        ];
        for input in inputs {
            let once = CanonicalUri::split(input).unwrap();
            let joined = once.join();
            assert_eq!(joined, input, "join changed {input}");
            assert_eq!(CanonicalUri::split(&joined).unwrap(), once);
        }
    }

    #[test]
    fn authority_marker_kept_for_network_schemes() {
        let uri = CanonicalUri::split("https:/single").unwrap();
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.join(), "https:///single");
        assert_eq!(CanonicalUri::split("https:").unwrap().join(), "https://");
        assert_eq!(CanonicalUri::split("https:#f").unwrap().join(), "https://#f");
        // Relative paths and opaque schemes get no marker.
        assert_eq!(CanonicalUri::split("https:rel").unwrap().join(), "https:rel");
        assert_eq!(CanonicalUri::split("mailto:/x").unwrap().join(), "mailto:/x");
    }
}
