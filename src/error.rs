#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned when parsing cookie headers or formatting `Cookie` headers.
pub enum CookieError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),
    #[error(transparent)]
    Malformed(#[from] MalformedCookieError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
/// The caller passed an input that cannot be processed, e.g. a header that is
/// neither `Set-Cookie` nor `Set-Cookie2`.
pub struct InvalidArgumentError {
    reason: String,
}

impl InvalidArgumentError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        InvalidArgumentError {
            reason: reason.into(),
        }
    }

    /// Why the input was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
/// A cookie violates the rules of the cookie specification in use.
///
/// It is returned by [`CookieSpec::parse`] and [`CookieSpec::validate`].
///
/// [`CookieSpec::parse`]: crate::CookieSpec::parse
/// [`CookieSpec::validate`]: crate::CookieSpec::validate
pub struct MalformedCookieError {
    reason: String,
}

impl MalformedCookieError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        MalformedCookieError {
            reason: reason.into(),
        }
    }

    /// The first rule the cookie was found to violate.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
