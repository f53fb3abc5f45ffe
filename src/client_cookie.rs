use crate::Attribute;
use std::fmt;
use time::OffsetDateTime;

/// The header a [`ClientCookie`] was received with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CookieVariant {
    /// A cookie set using the `Set-Cookie` header (RFC 2109).
    #[default]
    Cookie,
    /// A cookie set using the `Set-Cookie2` header (RFC 2965).
    ///
    /// These cookies are bound to the port they were received on, by default,
    /// and support the `Port` and `CommentURL` attributes.
    Cookie2,
}

/// The state of the `Port` attribute of a [`ClientCookie`], as set by the origin server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortAttribute<'a> {
    /// No `Port` attribute: the cookie can be sent to any port.
    Absent,
    /// A `Port` attribute without a value: the cookie can only be sent to
    /// the port it was received on.
    Blank,
    /// An explicit list of ports the cookie can be sent to.
    List(&'a [u16]),
}

/// A cookie received by a client via the `Set-Cookie` or `Set-Cookie2` header.
///
/// Cookies are usually obtained by parsing a header with a [`CookieSpec`].
/// You can also build one by hand:
///
/// ```rust
/// use amaretti::ClientCookie;
///
/// let cookie = ClientCookie::new("id", "123")
///     .set_domain(".example.com")
///     .set_path("/")
///     .set_version(1);
/// assert_eq!(cookie.name_value(), ("id", "123"));
/// assert_eq!(cookie.domain(), Some(".example.com"));
/// assert_eq!(cookie.to_string(), "id=123");
/// ```
///
/// [`CookieSpec`]: crate::CookieSpec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCookie {
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) domain: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) ports: Option<Vec<u16>>,
    pub(crate) version: i32,
    pub(crate) discard: bool,
    pub(crate) secure: bool,
    pub(crate) comment: Option<String>,
    pub(crate) comment_url: Option<String>,
    pub(crate) expiry: Option<OffsetDateTime>,
    pub(crate) variant: CookieVariant,
    /// Attributes as received, keyed by lower-cased name, in header order.
    /// Invariant: names are unique.
    pub(crate) attributes: Vec<(String, Option<String>)>,
}

impl ClientCookie {
    /// Creates a new [`ClientCookie`] with the given name and value.
    pub fn new<N, V>(name: N, value: V) -> ClientCookie
    where
        N: Into<String>,
        V: Into<String>,
    {
        ClientCookie {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            ports: None,
            version: 0,
            discard: false,
            secure: false,
            comment: None,
            comment_url: None,
            expiry: None,
            variant: CookieVariant::Cookie,
            attributes: Vec::new(),
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

    /// Returns the name and value of `self` as a tuple of `(name, value)`.
    #[inline]
    pub fn name_value(&self) -> (&str, &str) {
        (self.name(), self.value())
    }

    /// Returns the domain of the cookie, if any.
    ///
    /// Unlike in response cookies, a leading `.` is significant here and is kept.
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The ports the cookie is restricted to, if any.
    #[inline]
    pub fn ports(&self) -> Option<&[u16]> {
        self.ports.as_deref()
    }

    #[inline]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Whether the cookie must be discarded at the end of the session.
    #[inline]
    pub fn discard(&self) -> bool {
        self.discard
    }

    /// Whether the cookie can only be sent over secure channels.
    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    #[inline]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    #[inline]
    pub fn comment_url(&self) -> Option<&str> {
        self.comment_url.as_deref()
    }

    /// When the cookie expires. `None` for session cookies.
    #[inline]
    pub fn expiry(&self) -> Option<OffsetDateTime> {
        self.expiry
    }

    #[inline]
    pub fn variant(&self) -> CookieVariant {
        self.variant
    }

    /// `true` if the cookie has an expiry date and is not marked `Discard`.
    pub fn is_persistent(&self) -> bool {
        self.expiry.is_some() && !self.discard
    }

    /// `true` if the cookie expiry date is at or before `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expiry.map_or(false, |expiry| expiry <= now)
    }

    /// Returns the raw value of the attribute named `name` (case-insensitive),
    /// as sent by the origin server.
    ///
    /// It returns `None` both when the attribute is missing and when it was
    /// sent without a value: use [`ClientCookie::contains_attribute()`] to tell
    /// them apart.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_deref())
    }

    /// `true` if the origin server sent the attribute named `name` (case-insensitive).
    pub fn contains_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Iterates over the attributes sent by the origin server, in header order.
    /// Names are lower-cased.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// The state of the `Port` attribute, as sent by the origin server.
    ///
    /// ```rust
    /// use amaretti::{ClientCookie, PortAttribute};
    ///
    /// let cookie = ClientCookie::new("a", "b");
    /// assert_eq!(cookie.port_attribute(), PortAttribute::Absent);
    /// ```
    pub fn port_attribute(&self) -> PortAttribute<'_> {
        if !self.contains_attribute(Attribute::Port.as_str()) {
            return PortAttribute::Absent;
        }
        match self.attribute(Attribute::Port.as_str()) {
            Some(raw) if !raw.trim().is_empty() => {
                PortAttribute::List(self.ports.as_deref().unwrap_or_default())
            }
            _ => PortAttribute::Blank,
        }
    }

    pub fn set_name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_value<V: Into<String>>(mut self, value: V) -> Self {
        self.value = value.into();
        self
    }

    pub fn set_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn set_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the ports the cookie can be sent to.
    ///
    /// `None` leaves the cookie unbound. The list only restricts matching
    /// when the cookie also carries a `Port` attribute, see [`ClientCookie::port_attribute`].
    ///
    /// ```rust
    /// use amaretti::ClientCookie;
    ///
    /// let cookie = ClientCookie::new("a", "b").set_ports(vec![80, 443]);
    /// assert_eq!(cookie.ports(), Some(&[80, 443][..]));
    ///
    /// let cookie = cookie.set_ports(None);
    /// assert_eq!(cookie.ports(), None);
    /// ```
    pub fn set_ports<P: Into<Option<Vec<u16>>>>(mut self, ports: P) -> Self {
        self.ports = ports.into();
        self
    }

    /// Sets the version of the cookie. Versioned cookies get their values quoted when formatted.
    pub fn set_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// If `true`, the cookie is dropped at the end of the session even if it has an expiry.
    pub fn set_discard(mut self, discard: bool) -> Self {
        self.discard = discard;
        self
    }

    pub fn set_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn set_comment<T: Into<Option<String>>>(mut self, comment: T) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn set_comment_url<T: Into<Option<String>>>(mut self, comment_url: T) -> Self {
        self.comment_url = comment_url.into();
        self
    }

    /// Sets the instant after which the cookie must be discarded.
    ///
    /// Parsing derives it from either `Max-Age` or `Expires`.
    /// A cookie without an expiry only lives until the end of the session.
    ///
    /// ```rust
    /// use amaretti::ClientCookie;
    /// use amaretti::time::macros::datetime;
    ///
    /// let cookie = ClientCookie::new("a", "b").set_expiry(datetime!(2015-10-21 7:28 UTC));
    /// assert!(cookie.is_persistent());
    /// assert!(cookie.is_expired(datetime!(2020-01-01 0:00 UTC)));
    ///
    /// let cookie = cookie.set_expiry(None);
    /// assert!(!cookie.is_persistent());
    /// ```
    pub fn set_expiry<T: Into<Option<OffsetDateTime>>>(mut self, expiry: T) -> Self {
        self.expiry = expiry.into();
        self
    }

    /// Sets the header the cookie is considered to have been received with.
    ///
    /// It decides which RFC 2965 rules apply: a `Set-Cookie2` cookie must
    /// carry a `Version` attribute and honours `Port` and `CommentURL`.
    pub fn set_variant(mut self, variant: CookieVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Records a raw attribute. The first value recorded for a name wins.
    ///
    /// Returns `false` if an attribute with the same name was already recorded.
    pub(crate) fn record_attribute(&mut self, name: &str, value: Option<&str>) -> bool {
        if self.contains_attribute(name) {
            return false;
        }
        self.push_attribute(name, value);
        true
    }

    /// Records a raw attribute the caller knows to be new.
    pub(crate) fn push_attribute(&mut self, name: &str, value: Option<&str>) {
        self.attributes
            .push((name.to_ascii_lowercase(), value.map(str::to_owned)));
    }
}

impl fmt::Display for ClientCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ClientCookie, PortAttribute};
    use time::macros::datetime;

    #[test]
    fn first_recorded_attribute_wins() {
        let mut cookie = ClientCookie::new("a", "b");
        assert!(cookie.record_attribute("Domain", Some("a.com")));
        assert!(!cookie.record_attribute("domain", Some("b.com")));
        assert_eq!(cookie.attribute("DOMAIN"), Some("a.com"));
        assert_eq!(
            cookie.attributes().collect::<Vec<_>>(),
            vec![("domain", Some("a.com"))]
        );
    }

    #[test]
    fn valueless_attributes_are_contained() {
        let mut cookie = ClientCookie::new("a", "b");
        cookie.record_attribute("discard", None);
        assert!(cookie.contains_attribute("Discard"));
        assert_eq!(cookie.attribute("discard"), None);
        assert!(!cookie.contains_attribute("secure"));
    }

    #[test]
    fn port_attribute_is_tri_state() {
        let mut cookie = ClientCookie::new("a", "b").set_ports(vec![80]);
        assert_eq!(cookie.port_attribute(), PortAttribute::Absent);

        let mut blank = cookie.clone();
        blank.record_attribute("port", Some("  "));
        assert_eq!(blank.port_attribute(), PortAttribute::Blank);

        let mut valueless = cookie.clone();
        valueless.record_attribute("port", None);
        assert_eq!(valueless.port_attribute(), PortAttribute::Blank);

        cookie.record_attribute("port", Some("80"));
        assert_eq!(cookie.port_attribute(), PortAttribute::List(&[80]));
    }

    #[test]
    fn persistence_and_expiry() {
        let now = datetime!(2020-01-01 00:00:00 UTC);
        let cookie = ClientCookie::new("a", "b");
        assert!(!cookie.is_persistent());
        assert!(!cookie.is_expired(now));

        let cookie = cookie.set_expiry(datetime!(2019-12-31 23:59:59 UTC));
        assert!(cookie.is_persistent());
        assert!(cookie.is_expired(now));

        let cookie = cookie.set_discard(true);
        assert!(!cookie.is_persistent());
    }
}
