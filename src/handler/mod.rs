//! Per-attribute parsing, validation and matching rules.
//!
//! Each [`Handler`] deals with exactly one cookie attribute. Specifications
//! pick the handlers they need and store them in a [`HandlerRegistry`].
mod basic;
mod registry;
mod rfc2109;
mod rfc2965;

pub(crate) use registry::HandlerRegistry;

use crate::errors::MalformedCookieError;
use crate::{ClientCookie, CookieOrigin, DatePattern};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Handler {
    Path,
    Secure,
    Comment,
    MaxAge,
    Expires { patterns: Vec<DatePattern> },
    Rfc2109Domain,
    Rfc2109Version,
    Rfc2965Domain,
    Rfc2965Port,
    Rfc2965CommentUrl,
    Rfc2965Discard,
    Rfc2965Version,
}

impl Handler {
    /// Interprets the raw attribute value and updates `cookie` accordingly.
    ///
    /// `value` is `None` when the attribute was sent without an `=` sign.
    pub(crate) fn parse(
        &self,
        cookie: &mut ClientCookie,
        value: Option<&str>,
    ) -> Result<(), MalformedCookieError> {
        match self {
            Handler::Path => {
                basic::parse_path(cookie, value);
                Ok(())
            }
            Handler::Secure => {
                cookie.secure = true;
                Ok(())
            }
            Handler::Comment => {
                cookie.comment = value.map(str::to_owned);
                Ok(())
            }
            Handler::MaxAge => basic::parse_max_age(cookie, value),
            Handler::Expires { patterns } => basic::parse_expires(cookie, value, patterns),
            Handler::Rfc2109Domain => rfc2109::parse_domain(cookie, value),
            Handler::Rfc2109Version => rfc2109::parse_version(cookie, value),
            Handler::Rfc2965Domain => rfc2965::parse_domain(cookie, value),
            Handler::Rfc2965Port => rfc2965::parse_port(cookie, value),
            Handler::Rfc2965CommentUrl => {
                rfc2965::parse_comment_url(cookie, value);
                Ok(())
            }
            Handler::Rfc2965Discard => {
                cookie.discard = true;
                Ok(())
            }
            Handler::Rfc2965Version => rfc2965::parse_version(cookie, value),
        }
    }

    /// Checks that `cookie` is acceptable when received from `origin`.
    pub(crate) fn validate(
        &self,
        cookie: &ClientCookie,
        origin: &CookieOrigin,
    ) -> Result<(), MalformedCookieError> {
        match self {
            Handler::Path => basic::validate_path(cookie, origin),
            Handler::Rfc2109Domain => rfc2109::validate_domain(cookie, origin),
            Handler::Rfc2109Version => rfc2109::validate_version(cookie),
            Handler::Rfc2965Domain => rfc2965::validate_domain(cookie, origin),
            Handler::Rfc2965Port => rfc2965::validate_port(cookie, origin),
            Handler::Rfc2965Version => rfc2965::validate_version(cookie),
            Handler::Secure
            | Handler::Comment
            | Handler::MaxAge
            | Handler::Expires { .. }
            | Handler::Rfc2965CommentUrl
            | Handler::Rfc2965Discard => Ok(()),
        }
    }

    /// `true` if `cookie` may be sent to `origin`, as far as this attribute is concerned.
    pub(crate) fn matches(&self, cookie: &ClientCookie, origin: &CookieOrigin) -> bool {
        match self {
            Handler::Path => basic::match_path(cookie, origin),
            Handler::Secure => !cookie.secure || origin.secure(),
            Handler::Expires { .. } => basic::match_expiry(cookie),
            Handler::Rfc2109Domain => rfc2109::match_domain(cookie, origin),
            Handler::Rfc2965Domain => rfc2965::match_domain(cookie, origin),
            Handler::Rfc2965Port => rfc2965::match_port(cookie, origin),
            Handler::Comment
            | Handler::MaxAge
            | Handler::Rfc2109Version
            | Handler::Rfc2965CommentUrl
            | Handler::Rfc2965Discard
            | Handler::Rfc2965Version => true,
        }
    }
}
