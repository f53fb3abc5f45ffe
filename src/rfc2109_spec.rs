use crate::config::SpecConfig;
use crate::errors::{CookieError, InvalidArgumentError, MalformedCookieError};
use crate::handler::{Handler, HandlerRegistry};
use crate::header::{Header, HeaderElement, COOKIE};
use crate::spec::{default_path, format_param, header_variant};
use crate::{Attribute, ClientCookie, CookieOrigin, CookieSpec, CookieVariant};
use std::cmp::Reverse;
use std::collections::HashSet;

/// The cookie specification defined by [RFC 2109].
///
/// # Creating a `Rfc2109Spec`
///
/// A specification is created from a [`SpecConfig`] using the [`From`] trait,
/// or with [`Rfc2109Spec::new`] for the default configuration.
///
/// ```rust
/// use amaretti::{CookieOrigin, CookieSpec, Rfc2109Spec};
/// use amaretti::header::Header;
///
/// let spec = Rfc2109Spec::new();
/// let origin = CookieOrigin::new("www.example.com", 80, "/shop/cart", false).unwrap();
/// let header = Header::new("Set-Cookie", "session=abc; Version=1; Domain=.example.com");
///
/// let cookies = spec.parse(&header, &origin).unwrap();
/// assert_eq!(cookies[0].domain(), Some(".example.com"));
/// // The path defaults to the directory of the request path.
/// assert_eq!(cookies[0].path(), Some("/shop"));
/// assert!(spec.validate(&cookies[0], &origin).is_ok());
///
/// let headers = spec.format_cookies(&cookies).unwrap();
/// assert_eq!(
///     headers[0].to_string(),
///     "Cookie: $Version=1; session=\"abc\"; $Domain=\".example.com\""
/// );
/// ```
///
/// [RFC 2109]: https://www.rfc-editor.org/rfc/rfc2109
#[derive(Debug, Clone)]
pub struct Rfc2109Spec {
    registry: HandlerRegistry,
    one_header: bool,
}

impl From<SpecConfig> for Rfc2109Spec {
    fn from(value: SpecConfig) -> Self {
        let mut registry = HandlerRegistry::new();
        registry.register(Attribute::Version, Handler::Rfc2109Version);
        registry.register(Attribute::Path, Handler::Path);
        registry.register(Attribute::Domain, Handler::Rfc2109Domain);
        registry.register(Attribute::MaxAge, Handler::MaxAge);
        registry.register(Attribute::Secure, Handler::Secure);
        registry.register(Attribute::Comment, Handler::Comment);
        registry.register(
            Attribute::Expires,
            Handler::Expires {
                patterns: value.date_patterns,
            },
        );
        Rfc2109Spec {
            registry,
            one_header: value.one_header,
        }
    }
}

impl Default for Rfc2109Spec {
    fn default() -> Self {
        SpecConfig::default().into()
    }
}

impl Rfc2109Spec {
    /// Creates a new [`Rfc2109Spec`] with the default [`SpecConfig`].
    pub fn new() -> Self {
        Default::default()
    }

    /// The attributes this specification understands, in the order their rules are applied.
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.registry.attributes()
    }

    /// Parses header elements that were already split by the caller's own
    /// header tokenizer, as if they had been received in a `Set-Cookie` header.
    pub fn parse_elements(
        &self,
        elements: &[HeaderElement],
        origin: &CookieOrigin,
    ) -> Result<Vec<ClientCookie>, MalformedCookieError> {
        self.parse_variant(elements, CookieVariant::Cookie, origin)
    }

    pub(crate) fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Turns each element into a cookie record of the given variant.
    pub(crate) fn parse_variant(
        &self,
        elements: &[HeaderElement],
        variant: CookieVariant,
        origin: &CookieOrigin,
    ) -> Result<Vec<ClientCookie>, MalformedCookieError> {
        let mut cookies = Vec::with_capacity(elements.len());
        for element in elements {
            let name = element.name();
            if name.is_empty() {
                let e = MalformedCookieError::new("Cookie name may not be empty");
                tracing::debug!(host = origin.host(), error = %e, "Failed to parse cookie");
                return Err(e);
            }

            let mut cookie = ClientCookie::new(name, element.value().unwrap_or_default())
                .set_variant(variant)
                .set_path(default_path(origin))
                .set_domain(origin.host());
            if variant == CookieVariant::Cookie2 {
                cookie = cookie.set_ports(vec![origin.port()]);
            }

            // The first occurrence of an attribute takes precedence (RFC 2965, 3.2).
            let mut seen = HashSet::with_capacity(element.parameters().len());
            for parameter in element.parameters() {
                let attribute = parameter.name().to_ascii_lowercase();
                if !seen.insert(attribute.clone()) {
                    tracing::trace!(cookie = name, %attribute, "Ignoring duplicate cookie attribute");
                    continue;
                }
                cookie.push_attribute(&attribute, parameter.value());
                match self.registry.find(&attribute) {
                    Some(handler) => handler.parse(&mut cookie, parameter.value()).map_err(|e| {
                        tracing::debug!(cookie = name, %attribute, error = %e, "Failed to parse cookie");
                        e
                    })?,
                    None => {
                        tracing::trace!(cookie = name, %attribute, "Ignoring unknown cookie attribute")
                    }
                }
            }
            cookies.push(cookie);
        }
        Ok(cookies)
    }

    /// Formats a single cookie, without any `$Version` prefix.
    pub(crate) fn format_cookie(&self, buffer: &mut String, cookie: &ClientCookie, version: i32) {
        format_param(buffer, cookie.name(), cookie.value(), version);
        if let (Some(path), true) = (
            cookie.path(),
            cookie.contains_attribute(Attribute::Path.as_str()),
        ) {
            buffer.push_str("; ");
            format_param(buffer, "$Path", path, version);
        }
        if let (Some(domain), true) = (
            cookie.domain(),
            cookie.contains_attribute(Attribute::Domain.as_str()),
        ) {
            buffer.push_str("; ");
            format_param(buffer, "$Domain", domain, version);
        }
    }

    /// Lays out `cookies` into `Cookie` headers, delegating the formatting of
    /// each cookie to `format_cookie`.
    pub(crate) fn format_cookies_with<F>(
        &self,
        cookies: &[ClientCookie],
        format_cookie: F,
    ) -> Result<Vec<Header>, CookieError>
    where
        F: Fn(&mut String, &ClientCookie, i32),
    {
        if cookies.is_empty() {
            return Err(InvalidArgumentError::new("List of cookies may not be empty").into());
        }
        let mut cookies: Vec<&ClientCookie> = cookies.iter().collect();
        // Cookies with more specific paths are sent first.
        cookies.sort_by_key(|cookie| Reverse(normalized_path_len(cookie)));

        if self.one_header {
            let version = cookies.iter().map(|c| c.version()).min().unwrap_or_default();
            let mut buffer = format!("$Version={version}");
            for cookie in cookies {
                buffer.push_str("; ");
                format_cookie(&mut buffer, cookie, version);
            }
            Ok(vec![Header::new(COOKIE, buffer)])
        } else {
            let headers = cookies
                .into_iter()
                .map(|cookie| {
                    let version = cookie.version();
                    let mut buffer = format!("$Version={version}; ");
                    format_cookie(&mut buffer, cookie, version);
                    Header::new(COOKIE, buffer)
                })
                .collect();
            Ok(headers)
        }
    }
}

/// The length of the cookie path, counting a trailing `/`.
fn normalized_path_len(cookie: &ClientCookie) -> usize {
    let path = cookie.path().unwrap_or("/");
    if path.ends_with('/') {
        path.len()
    } else {
        path.len() + 1
    }
}

impl CookieSpec for Rfc2109Spec {
    fn version(&self) -> i32 {
        1
    }

    fn parse(
        &self,
        header: &Header,
        origin: &CookieOrigin,
    ) -> Result<Vec<ClientCookie>, CookieError> {
        header_variant(header)?;
        Ok(self.parse_elements(&header.elements(), origin)?)
    }

    fn validate(
        &self,
        cookie: &ClientCookie,
        origin: &CookieOrigin,
    ) -> Result<(), MalformedCookieError> {
        let outcome = validate_name(cookie).and_then(|_| {
            self.registry
                .handlers()
                .try_for_each(|handler| handler.validate(cookie, origin))
        });
        if let Err(e) = &outcome {
            tracing::debug!(
                cookie = cookie.name(),
                host = origin.host(),
                error = %e,
                "Rejected cookie"
            );
        }
        outcome
    }

    fn matches(&self, cookie: &ClientCookie, origin: &CookieOrigin) -> bool {
        self.registry
            .handlers()
            .all(|handler| handler.matches(cookie, origin))
    }

    fn format_cookies(&self, cookies: &[ClientCookie]) -> Result<Vec<Header>, CookieError> {
        self.format_cookies_with(cookies, |buffer, cookie, version| {
            self.format_cookie(buffer, cookie, version)
        })
    }

    fn version_header(&self) -> Option<Header> {
        None
    }
}

fn validate_name(cookie: &ClientCookie) -> Result<(), MalformedCookieError> {
    if cookie.name().contains(' ') {
        return Err(MalformedCookieError::new(
            "Cookie name may not contain blanks",
        ));
    }
    if cookie.name().starts_with('$') {
        return Err(MalformedCookieError::new("Cookie name may not start with $"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::SpecConfig;
    use crate::errors::CookieError;
    use crate::header::{Header, HeaderElement, NameValuePair};
    use crate::{ClientCookie, CookieOrigin, CookieSpec, CookieVariant, Rfc2109Spec};
    use googletest::prelude::*;

    fn origin(host: &str, path: &str) -> CookieOrigin {
        CookieOrigin::new(host, 80, path, false).unwrap()
    }

    fn parse_one(spec: &Rfc2109Spec, value: &str, origin: &CookieOrigin) -> ClientCookie {
        let mut cookies = spec
            .parse(&Header::new("Set-Cookie", value), origin)
            .expect("Failed to parse the header");
        assert_eq!(cookies.len(), 1);
        cookies.remove(0)
    }

    #[test]
    fn parse_applies_defaults_and_attributes() {
        let spec = Rfc2109Spec::new();
        let origin = origin("www.example.com", "/a/b");

        let cookie = parse_one(&spec, "name=value", &origin);
        assert_eq!(cookie.name_value(), ("name", "value"));
        assert_eq!(cookie.domain(), Some("www.example.com"));
        assert_eq!(cookie.path(), Some("/a"));
        assert_eq!(cookie.version(), 0);
        assert_eq!(cookie.variant(), CookieVariant::Cookie);
        assert_eq!(cookie.ports(), None);

        let cookie = parse_one(
            &spec,
            "name=value; Version=1; Path=/; Domain=.example.com; Secure; Comment=hi; Max-Age=60",
            &origin,
        );
        assert_eq!(cookie.version(), 1);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some(".example.com"));
        assert!(cookie.secure());
        assert_eq!(cookie.comment(), Some("hi"));
        assert!(cookie.expiry().is_some());
    }

    #[test]
    fn elements_become_cookies_in_order() {
        let spec = Rfc2109Spec::new();
        let cookies = spec
            .parse(
                &Header::new("Set-Cookie", "a=1; Version=1, b=2; Version=1, c=3"),
                &origin("example.com", "/"),
            )
            .unwrap();
        let names: Vec<_> = cookies.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn first_duplicate_attribute_wins() {
        let spec = Rfc2109Spec::new();
        let cookie = parse_one(
            &spec,
            "a=b; Domain=a.com; Domain=b.com",
            &origin("www.a.com", "/"),
        );
        assert_eq!(cookie.domain(), Some("a.com"));
        assert_eq!(cookie.attribute("domain"), Some("a.com"));
    }

    #[test]
    fn repeated_attributes_are_recorded_once() {
        let spec = Rfc2109Spec::new();
        let mut value = String::from("a=b");
        for i in 0..100 {
            value.push_str(&format!("; Path=/{i}; Comment=c{i}; X-Custom=x{i}"));
        }
        let cookie = parse_one(&spec, &value, &origin("www.example.com", "/0/1"));
        assert_eq!(
            cookie.attributes().collect::<Vec<_>>(),
            vec![
                ("path", Some("/0")),
                ("comment", Some("c0")),
                ("x-custom", Some("x0")),
            ]
        );
        assert_eq!(cookie.path(), Some("/0"));
        assert_eq!(cookie.comment(), Some("c0"));
    }

    #[test]
    fn unknown_attributes_are_kept_but_ignored() {
        let spec = Rfc2109Spec::new();
        let origin = origin("www.example.com", "/");
        let cookie = parse_one(&spec, "a=b; Foo=bar; HttpOnly", &origin);
        assert_eq!(cookie.attribute("foo"), Some("bar"));
        assert!(cookie.contains_attribute("httponly"));
        assert!(spec.validate(&cookie, &origin).is_ok());
        assert!(spec.matches(&cookie, &origin));
    }

    #[test]
    fn parse_failures() {
        let spec = Rfc2109Spec::new();
        let origin = origin("www.example.com", "/");
        let cases = [
            ("=value", "Cookie name may not be empty"),
            ("a=b; Version=x", "Invalid version: invalid digit found in string"),
            ("a=b; Domain=", "Blank value for domain attribute"),
            ("a=b; Expires=soon", "Unable to parse expires attribute: soon"),
        ];
        for (value, expected) in cases {
            let err = spec
                .parse(&Header::new("Set-Cookie", value), &origin)
                .unwrap_err();
            assert!(matches!(err, CookieError::Malformed(_)), "Failed for {value}");
            assert_that!(err, displays_as(eq(expected)));
        }

        let err = spec
            .parse(&Header::new("Location", "a=b"), &origin)
            .unwrap_err();
        assert!(matches!(err, CookieError::InvalidArgument(_)));
    }

    #[test]
    fn parse_elements_from_a_foreign_tokenizer() {
        let spec = Rfc2109Spec::new();
        let element = HeaderElement::new(
            NameValuePair::new("a", Some("b".to_string())),
            vec![NameValuePair::new("PATH", Some("/x".to_string()))],
        );
        let cookies = spec
            .parse_elements(&[element], &origin("example.com", "/x/y"))
            .unwrap();
        assert_eq!(cookies[0].path(), Some("/x"));
        assert_eq!(cookies[0].attribute("path"), Some("/x"));
    }

    #[test]
    fn names_are_validated() {
        let spec = Rfc2109Spec::new();
        let origin = origin("example.com", "/");
        let cases = [
            ("a b", "Cookie name may not contain blanks"),
            ("$a", "Cookie name may not start with $"),
        ];
        for (name, expected) in cases {
            let cookie = ClientCookie::new(name, "b")
                .set_domain("example.com")
                .set_path("/");
            let err = spec.validate(&cookie, &origin).unwrap_err();
            assert_that!(err, displays_as(eq(expected)));
        }
    }

    #[test]
    fn validation_checks_domain_and_path() {
        let spec = Rfc2109Spec::new();
        let origin = origin("www.example.com", "/a/b");

        let cookie = parse_one(&spec, "a=b; Domain=example.com", &origin);
        let err = spec.validate(&cookie, &origin).unwrap_err();
        assert_that!(
            err,
            displays_as(eq(
                "Domain attribute \"example.com\" violates RFC 2109: domain must start with a dot"
            ))
        );

        let cookie = parse_one(&spec, "a=b; Path=/c", &origin);
        let err = spec.validate(&cookie, &origin).unwrap_err();
        assert_that!(
            err,
            displays_as(eq("Illegal path attribute \"/c\". Path of origin: \"/a/b\""))
        );
    }

    #[test]
    fn matching() {
        let spec = Rfc2109Spec::new();
        let cookie = parse_one(
            &spec,
            "a=b; Domain=.example.com; Path=/a; Secure",
            &origin("www.example.com", "/a/b"),
        );
        let secure = |host: &str, path: &str| CookieOrigin::new(host, 443, path, true).unwrap();
        assert!(spec.matches(&cookie, &secure("x.example.com", "/a/c")));
        assert!(!spec.matches(&cookie, &origin("x.example.com", "/a/c")));
        assert!(!spec.matches(&cookie, &secure("x.example.org", "/a/c")));
        assert!(!spec.matches(&cookie, &secure("x.example.com", "/b")));

        let expired = parse_one(
            &spec,
            "a=b; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            &origin("www.example.com", "/"),
        );
        assert!(!spec.matches(&expired, &origin("www.example.com", "/")));
    }

    #[test]
    fn format_many_headers() {
        let spec = Rfc2109Spec::new();
        let origin = origin("www.example.com", "/a/b");
        let cookies = spec
            .parse(
                &Header::new(
                    "Set-Cookie",
                    "plain=1, versioned=2; Version=1; Path=/a; Domain=.example.com",
                ),
                &origin,
            )
            .unwrap();
        let headers: Vec<_> = spec
            .format_cookies(&cookies)
            .unwrap()
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(
            headers,
            vec![
                "Cookie: $Version=0; plain=1",
                "Cookie: $Version=1; versioned=\"2\"; $Path=\"/a\"; $Domain=\".example.com\"",
            ]
        );
    }

    #[test]
    fn format_one_header_uses_the_lowest_version() {
        let spec: Rfc2109Spec = SpecConfig {
            one_header: true,
            ..Default::default()
        }
        .into();
        let cookies = vec![
            ClientCookie::new("a", "1").set_path("/").set_version(1),
            ClientCookie::new("b", "2").set_path("/deep/er").set_version(0),
        ];
        let headers = spec.format_cookies(&cookies).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name(), "Cookie");
        assert_eq!(headers[0].value(), "$Version=0; b=2; a=1");
    }

    #[test]
    fn formatted_values_survive_the_round_trip() {
        let spec = Rfc2109Spec::new();
        let origin = origin("www.example.com", "/");
        let cases = [
            (r#"a="x; y, z""#, "x; y, z", r#"$Version=0; a="x; y, z""#),
            (
                r#"a="p\"; q"; Version=1"#,
                r#"p"; q"#,
                r#"$Version=1; a="p\"; q""#,
            ),
        ];
        for (received, value, formatted) in cases {
            let cookie = parse_one(&spec, received, &origin);
            assert_eq!(cookie.value(), value);

            let headers = spec.format_cookies(&[cookie]).unwrap();
            assert_eq!(headers[0].value(), formatted);

            let elements = headers[0].elements();
            assert_eq!(elements.len(), 1, "Failed for {received}");
            let parameters = elements[0].parameters();
            assert_eq!(parameters.len(), 1, "Failed for {received}");
            assert_eq!(parameters[0].name(), "a");
            assert_eq!(parameters[0].value(), Some(value));
        }
    }

    #[test]
    fn values_cannot_smuggle_parameters() {
        let cookie = ClientCookie::new("a", r#"x"; other=evil"#);
        let headers = Rfc2109Spec::new().format_cookies(&[cookie]).unwrap();
        assert_eq!(headers[0].value(), r#"$Version=0; a="x\"; other=evil""#);

        let elements = headers[0].elements();
        let parameters = elements[0].parameters();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].value(), Some(r#"x"; other=evil"#));
    }

    #[test]
    fn format_requires_cookies() {
        let err = Rfc2109Spec::new().format_cookies(&[]).unwrap_err();
        assert!(matches!(err, CookieError::InvalidArgument(_)));
        assert_that!(err, displays_as(eq("List of cookies may not be empty")));
    }

    #[test]
    fn no_version_header() {
        let spec = Rfc2109Spec::new();
        assert_eq!(spec.version(), 1);
        assert_eq!(spec.version_header(), None);
    }
}
