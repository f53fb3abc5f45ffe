use crate::errors::{CookieError, InvalidArgumentError, MalformedCookieError};
use crate::header::{Header, SET_COOKIE, SET_COOKIE2};
use crate::{ClientCookie, CookieOrigin, CookieVariant};

/// A set of rules to parse, validate, match and format cookies.
///
/// Implemented by [`Rfc2109Spec`] and [`Rfc2965Spec`]. A cookie jar would
/// typically hold a `Box<dyn CookieSpec>` and:
///
/// 1. [`parse`](CookieSpec::parse) every `Set-Cookie`/`Set-Cookie2` header of a response;
/// 2. [`validate`](CookieSpec::validate) each resulting cookie against the request origin,
///    storing those that pass;
/// 3. before sending a request, pick the stored cookies that [`matches`](CookieSpec::matches)
///    its origin and [`format_cookies`](CookieSpec::format_cookies) them into `Cookie` headers.
///
/// [`Rfc2109Spec`]: crate::Rfc2109Spec
/// [`Rfc2965Spec`]: crate::Rfc2965Spec
pub trait CookieSpec {
    /// The highest cookie version supported by this specification.
    fn version(&self) -> i32;

    /// Parses a `Set-Cookie` or `Set-Cookie2` header received from `origin`
    /// into cookies, in header order.
    fn parse(&self, header: &Header, origin: &CookieOrigin)
        -> Result<Vec<ClientCookie>, CookieError>;

    /// Checks that `cookie` may be accepted from `origin`.
    ///
    /// It fails with the first rule the cookie violates.
    fn validate(&self, cookie: &ClientCookie, origin: &CookieOrigin)
        -> Result<(), MalformedCookieError>;

    /// `true` if `cookie` may be sent along with a request to `origin`.
    fn matches(&self, cookie: &ClientCookie, origin: &CookieOrigin) -> bool;

    /// Formats `cookies` into `Cookie` request headers.
    ///
    /// It fails if `cookies` is empty.
    fn format_cookies(&self, cookies: &[ClientCookie]) -> Result<Vec<Header>, CookieError>;

    /// A header announcing the highest cookie version understood by the client,
    /// if the specification requires one.
    fn version_header(&self) -> Option<Header>;
}

/// Maps a cookie header name (case-insensitive) to the variant of the cookies it carries.
pub(crate) fn header_variant(header: &Header) -> Result<CookieVariant, InvalidArgumentError> {
    let name = header.name().trim();
    if name.eq_ignore_ascii_case(SET_COOKIE2) {
        Ok(CookieVariant::Cookie2)
    } else if name.eq_ignore_ascii_case(SET_COOKIE) {
        Ok(CookieVariant::Cookie)
    } else {
        Err(InvalidArgumentError::new(format!(
            "Unrecognized cookie header \"{name}\""
        )))
    }
}

/// The origin path up to, but excluding, its last `/`. `/` if that would be empty.
pub(crate) fn default_path(origin: &CookieOrigin) -> String {
    let path = origin.path();
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(i) => path[..i].to_string(),
        None => path.to_string(),
    }
}

/// Appends `name=value`.
///
/// Values of versioned cookies are always quoted. Values of version 0 cookies
/// are quoted only if they would otherwise be split by a header tokenizer.
/// Quoted values escape `"` and `\` with a backslash.
pub(crate) fn format_param(buffer: &mut String, name: &str, value: &str, version: i32) {
    buffer.push_str(name);
    buffer.push('=');
    if version > 0 || needs_quoting(value) {
        buffer.push('"');
        for c in value.chars() {
            if c == '"' || c == '\\' {
                buffer.push('\\');
            }
            buffer.push(c);
        }
        buffer.push('"');
    } else {
        buffer.push_str(value);
    }
}

fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|c| matches!(c, ';' | ',' | '"' | '\\') || c.is_whitespace())
}
