use crate::config::SpecConfig;
use crate::errors::{CookieError, MalformedCookieError};
use crate::handler::Handler;
use crate::header::{Header, HeaderElement, COOKIE2};
use crate::spec::header_variant;
use crate::{
    Attribute, ClientCookie, CookieOrigin, CookieSpec, CookieVariant, PortAttribute, Rfc2109Spec,
};

/// The cookie specification defined by [RFC 2965].
///
/// It builds on top of [`Rfc2109Spec`], adding support for the `Port`,
/// `CommentURL` and `Discard` attributes, tightening the rules on the `Domain`
/// and `Version` attributes, and matching cookies against the *effective host
/// name* of an origin (see [`CookieOrigin::effective_host`]).
///
/// ```rust
/// use amaretti::{CookieOrigin, CookieSpec, Rfc2965Spec};
/// use amaretti::header::Header;
///
/// let spec = Rfc2965Spec::new();
/// let origin = CookieOrigin::new("x.example.com", 80, "/a", false).unwrap();
/// let header = Header::new(
///     "Set-Cookie2",
///     r#"id=123; Version=1; Path="/"; Domain=".example.com""#,
/// );
///
/// let cookies = spec.parse(&header, &origin).unwrap();
/// let cookie = &cookies[0];
/// assert_eq!(cookie.name_value(), ("id", "123"));
/// assert_eq!(cookie.domain(), Some(".example.com"));
/// assert_eq!(cookie.path(), Some("/"));
/// assert!(spec.validate(cookie, &origin).is_ok());
///
/// let next = CookieOrigin::new("y.example.com", 80, "/a/b", false).unwrap();
/// assert!(spec.matches(cookie, &next));
/// let elsewhere = CookieOrigin::new("other.com", 80, "/a/b", false).unwrap();
/// assert!(!spec.matches(cookie, &elsewhere));
///
/// assert_eq!(spec.version_header().unwrap().to_string(), "Cookie2: $Version=1");
/// ```
///
/// [RFC 2965]: https://www.rfc-editor.org/rfc/rfc2965
#[derive(Debug, Clone)]
pub struct Rfc2965Spec {
    base: Rfc2109Spec,
}

impl From<SpecConfig> for Rfc2965Spec {
    fn from(value: SpecConfig) -> Self {
        let mut base = Rfc2109Spec::from(value);
        let registry = base.registry_mut();
        registry.register(Attribute::Domain, Handler::Rfc2965Domain);
        registry.register(Attribute::Port, Handler::Rfc2965Port);
        registry.register(Attribute::CommentUrl, Handler::Rfc2965CommentUrl);
        registry.register(Attribute::Discard, Handler::Rfc2965Discard);
        registry.register(Attribute::Version, Handler::Rfc2965Version);
        Rfc2965Spec { base }
    }
}

impl Default for Rfc2965Spec {
    fn default() -> Self {
        SpecConfig::default().into()
    }
}

impl Rfc2965Spec {
    /// Creates a new [`Rfc2965Spec`] with the default [`SpecConfig`].
    pub fn new() -> Self {
        Default::default()
    }

    /// The attributes this specification understands, in the order their rules are applied.
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.base.attributes()
    }

    /// Parses header elements that were already split by the caller's own
    /// header tokenizer, as if they had been received in a header carrying
    /// cookies of the given `variant`.
    pub fn parse_elements(
        &self,
        variant: CookieVariant,
        elements: &[HeaderElement],
        origin: &CookieOrigin,
    ) -> Result<Vec<ClientCookie>, MalformedCookieError> {
        let origin = origin.effective_host();
        self.base.parse_variant(elements, variant, &origin)
    }
}

/// Appends the `$Port` parameter if the origin server sent a `Port` attribute.
fn format_port(buffer: &mut String, cookie: &ClientCookie) {
    let ports = match cookie.port_attribute() {
        PortAttribute::Absent => return,
        PortAttribute::Blank => &[][..],
        PortAttribute::List(ports) => ports,
    };
    buffer.push_str("; $Port=\"");
    for (i, port) in ports.iter().enumerate() {
        if i > 0 {
            buffer.push(',');
        }
        buffer.push_str(&port.to_string());
    }
    buffer.push('"');
}

impl CookieSpec for Rfc2965Spec {
    fn version(&self) -> i32 {
        1
    }

    fn parse(
        &self,
        header: &Header,
        origin: &CookieOrigin,
    ) -> Result<Vec<ClientCookie>, CookieError> {
        let variant = header_variant(header)?;
        Ok(self.parse_elements(variant, &header.elements(), origin)?)
    }

    fn validate(
        &self,
        cookie: &ClientCookie,
        origin: &CookieOrigin,
    ) -> Result<(), MalformedCookieError> {
        self.base.validate(cookie, &origin.effective_host())
    }

    fn matches(&self, cookie: &ClientCookie, origin: &CookieOrigin) -> bool {
        self.base.matches(cookie, &origin.effective_host())
    }

    fn format_cookies(&self, cookies: &[ClientCookie]) -> Result<Vec<Header>, CookieError> {
        self.base
            .format_cookies_with(cookies, |buffer, cookie, version| {
                self.base.format_cookie(buffer, cookie, version);
                format_port(buffer, cookie);
            })
    }

    fn version_header(&self) -> Option<Header> {
        Some(Header::new(COOKIE2, format!("$Version={}", self.version())))
    }
}
