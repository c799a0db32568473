//! Redirect-safe encoding: IDNA for the host, percent-encoding elsewhere.
//!
//! The safe sets keep `%` so already-encoded octets are not encoded twice,
//! and keep `+` literal in every component.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::split::CanonicalUri;
use crate::error::{Result, ShortenError};

/// Unreserved marks shared by every component.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const PATH_SAFE: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'%')
    .remove(b'=')
    .remove(b'|')
    .remove(b'\\')
    .remove(b'?')
    .remove(b'&')
    .remove(b'#');

const QUERY_SAFE: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'%')
    .remove(b'=')
    .remove(b'&')
    .remove(b'#')
    .remove(b'^')
    .remove(b'|')
    .remove(b'`')
    .remove(b'\\')
    .remove(b'{')
    .remove(b'}');

/// Same as the query set, but the apostrophe stays and the backtick does not.
const FRAGMENT_SAFE: &AsciiSet = &QUERY_SAFE.add(b'`').remove(b'\'');

const USERINFO_SAFE: &AsciiSet = &UNRESERVED
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'%');

/// Render `uri` in a form that can be placed verbatim in a redirect target.
///
/// Never markup-sanitized: this value is not rendered as HTML.
pub fn render_redirect_safe(uri: &CanonicalUri) -> Result<String> {
    let encoded = CanonicalUri {
        scheme: uri.scheme.clone(),
        authority: uri.authority.as_deref().map(encode_authority).transpose()?,
        path: uri.path.as_deref().map(|p| encode(p, PATH_SAFE)),
        query: uri.query.as_deref().map(|q| encode(q, QUERY_SAFE)),
        fragment: uri.fragment.as_deref().map(|f| encode(f, FRAGMENT_SAFE)),
    };
    Ok(encoded.join())
}

fn encode(s: &str, set: &'static AsciiSet) -> String {
    utf8_percent_encode(s, set).to_string()
}

/// `[userinfo@]host[:port]`; only the host goes through IDNA.
pub(crate) fn encode_authority(authority: &str) -> Result<String> {
    let (userinfo, host_port) = match authority.rfind('@') {
        Some(at) => (Some(&authority[..at]), &authority[at + 1..]),
        None => (None, authority),
    };
    let (host, port) = split_port(host_port);

    let mut out = String::with_capacity(authority.len());
    if let Some(userinfo) = userinfo {
        out.push_str(&encode(userinfo, USERINFO_SAFE));
        out.push('@');
    }
    out.push_str(&encode_host(host)?);
    if let Some(port) = port {
        out.push(':');
        out.push_str(port);
    }
    Ok(out)
}

fn split_port(host_port: &str) -> (&str, Option<&str>) {
    if host_port.starts_with('[') {
        if let Some(close) = host_port.find(']') {
            let (host, rest) = host_port.split_at(close + 1);
            if rest.is_empty() {
                return (host, None);
            }
            if let Some(port) = rest.strip_prefix(':') {
                return (host, Some(port));
            }
        }
        return (host_port, None);
    }
    match host_port.rfind(':') {
        Some(colon) if host_port[colon + 1..].bytes().all(|b| b.is_ascii_digit()) => {
            (&host_port[..colon], Some(&host_port[colon + 1..]))
        }
        _ => (host_port, None),
    }
}

/// Longest DNS label, in bytes of its ASCII form.
const MAX_LABEL_LEN: usize = 63;

/// ASCII labels are copied as-is; each non-ASCII label becomes its `xn--` form.
/// Every label but a trailing root label must be 1..=63 bytes once encoded.
fn encode_host(host: &str) -> Result<String> {
    let labels: Vec<&str> = host.split('.').collect();
    let last = labels.len() - 1;
    let mut out = Vec::with_capacity(labels.len());
    for (i, label) in labels.into_iter().enumerate() {
        let ascii = if label.is_ascii() {
            label.to_string()
        } else {
            idna::domain_to_ascii(label)
                .map_err(|e| ShortenError::Encoding(format!("{label}: {e:?}")))?
        };
        if ascii.len() > MAX_LABEL_LEN || (ascii.is_empty() && (i != last || !label.is_empty())) {
            return Err(ShortenError::Encoding(format!(
                "label empty or too long in host {host:?}"
            )));
        }
        out.push(ascii);
    }
    Ok(out.join("."))
}
