//! HTTP headers consumed and produced by cookie specifications.
use std::fmt;

/// The name of the header carrying RFC 2109 cookies.
pub const SET_COOKIE: &str = "Set-Cookie";
/// The name of the header carrying RFC 2965 cookies.
pub const SET_COOKIE2: &str = "Set-Cookie2";
/// The name of the request header carrying cookies.
pub const COOKIE: &str = "Cookie";
/// The name of the request header announcing RFC 2965 support.
pub const COOKIE2: &str = "Cookie2";

/// An HTTP header: a name and a raw value.
///
/// ```rust
/// use amaretti::header::Header;
///
/// let header = Header::new("Set-Cookie2", "id=123; Version=1, lang=en; Version=1");
/// let elements = header.elements();
/// assert_eq!(elements.len(), 2);
/// assert_eq!(elements[0].name(), "id");
/// assert_eq!(elements[1].value(), Some("en"));
/// assert_eq!(header.to_string(), "Set-Cookie2: id=123; Version=1, lang=en; Version=1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn new<N, V>(name: N, value: V) -> Header
    where
        N: Into<String>,
        V: Into<String>,
    {
        Header {
            name: name.into(),
            value: value.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Splits the header value into its elements.
    ///
    /// Elements are separated by `,`, parameters within an element by `;`.
    /// Separators inside quoted strings are ignored, as is the comma following
    /// the weekday of an `expires` date. Empty elements and parameters are skipped.
    pub fn elements(&self) -> Vec<HeaderElement> {
        split_unquoted(&self.value, b',', is_expires_weekday)
            .into_iter()
            .filter_map(HeaderElement::parse)
            .collect()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// A `name[=value]` pair found in a header value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameValuePair {
    name: String,
    value: Option<String>,
}

impl NameValuePair {
    pub fn new<N: Into<String>>(name: N, value: Option<String>) -> NameValuePair {
        NameValuePair {
            name: name.into(),
            value,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the pair, with surrounding quotes removed.
    /// `None` if the pair had no `=` sign.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn parse(raw: &str) -> Option<NameValuePair> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let pair = match raw.split_once('=') {
            Some((name, value)) => NameValuePair::new(name.trim(), Some(unquote(value.trim()))),
            None => NameValuePair::new(raw, None),
        };
        Some(pair)
    }
}

/// One element of a header value: a leading name/value pair followed by
/// zero or more parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderElement {
    pair: NameValuePair,
    parameters: Vec<NameValuePair>,
}

impl HeaderElement {
    pub fn new(pair: NameValuePair, parameters: Vec<NameValuePair>) -> HeaderElement {
        HeaderElement { pair, parameters }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.pair.name()
    }

    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.pair.value()
    }

    /// The parameters of the element, in header order.
    #[inline]
    pub fn parameters(&self) -> &[NameValuePair] {
        &self.parameters
    }

    fn parse(raw: &str) -> Option<HeaderElement> {
        let mut pairs = split_unquoted(raw, b';', |_| false)
            .into_iter()
            .filter_map(NameValuePair::parse);
        let pair = pairs.next()?;
        Some(HeaderElement::new(pair, pairs.collect()))
    }
}

/// Splits `value` on `delimiter`, ignoring delimiters inside quoted strings
/// and those for which `keep` returns `true` when given the text preceding them.
fn split_unquoted<F>(value: &str, delimiter: u8, keep: F) -> Vec<&str>
where
    F: Fn(&str) -> bool,
{
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, byte) in value.bytes().enumerate() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_quotes = false;
            }
            continue;
        }
        if byte == b'"' {
            in_quotes = true;
        } else if byte == delimiter && !keep(&value[start..i]) {
            parts.push(&value[start..i]);
            start = i + 1;
        }
    }
    parts.push(&value[start..]);
    parts
}

/// `true` if `element` ends with an `expires` attribute holding only a weekday,
/// i.e. the next comma belongs to the date.
fn is_expires_weekday(element: &str) -> bool {
    let last = element.rsplit(';').next().unwrap_or_default();
    match last.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            name.trim().eq_ignore_ascii_case("expires")
                && !value.is_empty()
                && value.bytes().all(|b| b.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// Removes a surrounding pair of double quotes, resolving backslash escapes.
fn unquote(value: &str) -> String {
    let inner = match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) if value.len() >= 2 => inner,
        _ => return value.to_string(),
    };
    let mut unquoted = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                unquoted.push(escaped);
                continue;
            }
        }
        unquoted.push(c);
    }
    unquoted
}
