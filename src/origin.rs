use crate::errors::InvalidArgumentError;
use std::borrow::Cow;

/// The suffix appended to dotless host names to obtain their effective host name.
pub const LOCAL_DOMAIN_SUFFIX: &str = ".local";

/// Where a cookie was received from, or where it is about to be sent.
///
/// ```rust
/// use amaretti::CookieOrigin;
///
/// let origin = CookieOrigin::new("WWW.Example.com", 80, "/a/b", false).unwrap();
/// assert_eq!(origin.host(), "www.example.com");
/// assert_eq!(origin.port(), 80);
/// assert_eq!(origin.path(), "/a/b");
/// assert!(!origin.secure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CookieOrigin {
    host: String,
    port: u16,
    path: String,
    secure: bool,
}

impl CookieOrigin {
    /// Creates a new [`CookieOrigin`].
    ///
    /// The host is lower-cased and an empty path is replaced by `/`.
    /// It fails if `host` is blank.
    pub fn new<H, P>(host: H, port: u16, path: P, secure: bool) -> Result<Self, InvalidArgumentError>
    where
        H: AsRef<str>,
        P: Into<String>,
    {
        let host = host.as_ref().trim();
        if host.is_empty() {
            return Err(InvalidArgumentError::new("Host of origin may not be blank"));
        }
        let mut path = path.into();
        if path.trim().is_empty() {
            path = "/".to_string();
        }
        Ok(CookieOrigin {
            host: host.to_ascii_lowercase(),
            port,
            path,
            secure,
        })
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Returns the origin with its "effective host name", as defined by RFC 2965.
    ///
    /// If the host contains no dots, the effective host is the host with
    /// [`LOCAL_DOMAIN_SUFFIX`] appended to it. Otherwise it is the host itself,
    /// and `self` is returned as is.
    ///
    /// ```rust
    /// use amaretti::CookieOrigin;
    ///
    /// let origin = CookieOrigin::new("intranet", 8080, "/", false).unwrap();
    /// let effective = origin.effective_host();
    /// assert_eq!(effective.host(), "intranet.local");
    /// assert_eq!(effective.port(), 8080);
    ///
    /// // The caller's origin is left untouched.
    /// assert_eq!(origin.host(), "intranet");
    /// ```
    pub fn effective_host(&self) -> Cow<'_, CookieOrigin> {
        if self.host.contains('.') {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(CookieOrigin {
                host: format!("{}{}", self.host, LOCAL_DOMAIN_SUFFIX),
                port: self.port,
                path: self.path.clone(),
                secure: self.secure,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::CookieOrigin;
    use googletest::prelude::*;
    use std::borrow::Cow;

    #[test]
    fn blank_host_is_rejected() {
        let err = CookieOrigin::new("  ", 80, "/", false).unwrap_err();
        assert_that!(err, displays_as(eq("Host of origin may not be blank")));
    }

    #[test]
    fn empty_path_defaults_to_root() {
        let origin = CookieOrigin::new("example.com", 80, "", false).unwrap();
        assert_eq!(origin.path(), "/");
    }

    #[test]
    fn dotless_host_gets_local_suffix_once() {
        let origin = CookieOrigin::new("localhost", 80, "/app", true).unwrap();
        let effective = origin.effective_host().into_owned();
        assert_eq!(effective.host(), "localhost.local");
        assert_eq!(effective.path(), "/app");
        assert!(effective.secure());

        // Normalizing twice is a no-op.
        let again = effective.effective_host();
        assert!(matches!(again, Cow::Borrowed(_)));
        assert_eq!(&*again, &effective);
    }

    #[test]
    fn dotted_host_passes_through() {
        let origin = CookieOrigin::new("www.example.com", 443, "/", true).unwrap();
        assert!(matches!(origin.effective_host(), Cow::Borrowed(_)));
    }
}
