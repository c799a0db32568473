//! Display-only HTML rendering of a URI.

/// Render `uri` as text that can be embedded in an HTML text node.
///
/// Angle brackets are escaped before the sanitizer runs; a sanitizer that sees
/// `<dontremoveme` treats it as a broken tag and drops it. The result is for
/// display only and must never be used as a redirect target.
pub fn render_html_safe(uri: &str) -> String {
    let escaped = pre_escape(uri);
    ammonia::Builder::empty().clean(&escaped).to_string()
}

/// Escape `<`, `>` and any `&` that does not start a character reference.
fn pre_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 4);
    for (i, c) in s.char_indices() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' if !starts_char_ref(&s[i..]) => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    out
}

/// `&name;`, `&#123;` or `&#x1F;` at the start of `s`.
fn starts_char_ref(s: &str) -> bool {
    let body = &s.as_bytes()[1..];
    let (digits, is_valid): (&[u8], fn(&u8) -> bool) = match body {
        [b'#', b'x' | b'X', rest @ ..] => (rest, u8::is_ascii_hexdigit),
        [b'#', rest @ ..] => (rest, u8::is_ascii_digit),
        [first, ..] if first.is_ascii_alphabetic() => (body, u8::is_ascii_alphanumeric),
        _ => return false,
    };
    let len = digits.iter().take_while(|b| is_valid(b)).count();
    len > 0 && digits.get(len) == Some(&b';')
}
