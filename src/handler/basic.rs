//! Rules shared by every cookie specification.
use crate::date::parse_date;
use crate::errors::MalformedCookieError;
use crate::{ClientCookie, CookieOrigin, DatePattern};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub(super) fn parse_path(cookie: &mut ClientCookie, value: Option<&str>) {
    let path = match value.map(str::trim) {
        Some(path) if !path.is_empty() => path,
        _ => "/",
    };
    cookie.path = Some(path.to_owned());
}

pub(super) fn validate_path(
    cookie: &ClientCookie,
    origin: &CookieOrigin,
) -> Result<(), MalformedCookieError> {
    if match_path(cookie, origin) {
        return Ok(());
    }
    Err(MalformedCookieError::new(format!(
        "Illegal path attribute \"{}\". Path of origin: \"{}\"",
        cookie.path().unwrap_or_default(),
        origin.path()
    )))
}

/// The cookie path must be a prefix of the request path, ending on a `/` boundary.
pub(super) fn match_path(cookie: &ClientCookie, origin: &CookieOrigin) -> bool {
    let target = origin.path();
    let mut path = cookie.path().unwrap_or("/");
    if path.len() > 1 && path.ends_with('/') {
        path = &path[..path.len() - 1];
    }
    if !target.starts_with(path) {
        return false;
    }
    target.len() == path.len() || path.ends_with('/') || target.as_bytes()[path.len()] == b'/'
}

pub(super) fn parse_max_age(
    cookie: &mut ClientCookie,
    value: Option<&str>,
) -> Result<(), MalformedCookieError> {
    // RFC 6265 requires dates not to exceed 9999 years.
    static MAX_DATETIME: OffsetDateTime = datetime!(9999-12-31 23:59:59.999_999 UTC);

    let value = value
        .ok_or_else(|| MalformedCookieError::new("Missing value for max-age attribute"))?;
    let age: i64 = value.trim().parse().map_err(|_| {
        MalformedCookieError::new(format!("Invalid max-age attribute: {value}"))
    })?;
    if age < 0 {
        return Err(MalformedCookieError::new(format!(
            "Negative max-age attribute: {value}"
        )));
    }
    let expiry = OffsetDateTime::now_utc()
        .checked_add(Duration::seconds(age))
        .map_or(MAX_DATETIME, |expiry| std::cmp::min(expiry, MAX_DATETIME));
    cookie.expiry = Some(expiry);
    Ok(())
}

pub(super) fn parse_expires(
    cookie: &mut ClientCookie,
    value: Option<&str>,
    patterns: &[DatePattern],
) -> Result<(), MalformedCookieError> {
    let value =
        value.ok_or_else(|| MalformedCookieError::new("Missing value for expires attribute"))?;
    let expiry = parse_date(value, patterns).ok_or_else(|| {
        MalformedCookieError::new(format!("Unable to parse expires attribute: {value}"))
    })?;
    cookie.expiry = Some(expiry);
    Ok(())
}

pub(super) fn match_expiry(cookie: &ClientCookie) -> bool {
    !cookie.is_expired(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::{match_expiry, match_path, parse_expires, parse_max_age, parse_path, validate_path};
    use crate::{ClientCookie, CookieOrigin, DatePattern};
    use googletest::prelude::*;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    fn at(path: &str) -> CookieOrigin {
        CookieOrigin::new("www.example.com", 80, path, false).unwrap()
    }

    fn with_path(path: &str) -> ClientCookie {
        ClientCookie::new("a", "b").set_path(path)
    }

    #[test]
    fn blank_path_defaults_to_root() {
        for value in [None, Some(""), Some("   ")] {
            let mut cookie = ClientCookie::new("a", "b");
            parse_path(&mut cookie, value);
            assert_eq!(cookie.path(), Some("/"));
        }
    }

    #[test]
    fn path_matching() {
        let cases = [
            ("/", "/", true),
            ("/", "/anything", true),
            ("/a", "/a", true),
            ("/a", "/a/b", true),
            ("/a/", "/a/b", true),
            ("/a/", "/a", true),
            ("/a", "/ab", false),
            ("/a/b", "/a", false),
            ("/a", "/b/a", false),
        ];
        for (cookie_path, request_path, expected) in cases {
            assert_eq!(
                match_path(&with_path(cookie_path), &at(request_path)),
                expected,
                "Failed for cookie path {cookie_path} and request path {request_path}"
            );
        }
    }

    #[test]
    fn foreign_paths_are_rejected() {
        let err = validate_path(&with_path("/admin"), &at("/public/page")).unwrap_err();
        assert_that!(
            err,
            displays_as(eq(
                "Illegal path attribute \"/admin\". Path of origin: \"/public/page\""
            ))
        );
        assert!(validate_path(&with_path("/public"), &at("/public/page")).is_ok());
    }

    #[test]
    fn max_age_sets_the_expiry() {
        let mut cookie = ClientCookie::new("a", "b");
        parse_max_age(&mut cookie, Some("3600")).unwrap();
        let expiry = cookie.expiry().unwrap();
        let now = OffsetDateTime::now_utc();
        assert!(expiry > now + Duration::minutes(59));
        assert!(expiry <= now + Duration::hours(1));
    }

    #[test]
    fn max_age_is_clamped() {
        let mut cookie = ClientCookie::new("a", "b");
        parse_max_age(&mut cookie, Some(&i64::MAX.to_string())).unwrap();
        assert_eq!(cookie.expiry().unwrap().year(), 9999);
    }

    #[test]
    fn invalid_max_age() {
        let cases = [
            (None, "Missing value for max-age attribute"),
            (Some("soon"), "Invalid max-age attribute: soon"),
            (Some("-1"), "Negative max-age attribute: -1"),
        ];
        for (value, expected) in cases {
            let mut cookie = ClientCookie::new("a", "b");
            let err = parse_max_age(&mut cookie, value).unwrap_err();
            assert_that!(err, displays_as(eq(expected)));
            assert_eq!(cookie.expiry(), None);
        }
    }

    #[test]
    fn expires_uses_the_configured_patterns() {
        let mut cookie = ClientCookie::new("a", "b");
        parse_expires(
            &mut cookie,
            Some("Wed, 21 Oct 2015 07:28:00 GMT"),
            &DatePattern::ALL,
        )
        .unwrap();
        assert_eq!(cookie.expiry(), Some(datetime!(2015-10-21 07:28:00 UTC)));

        let err = parse_expires(
            &mut cookie,
            Some("Wed Oct 21 07:28:00 2015"),
            &[DatePattern::Rfc1123],
        )
        .unwrap_err();
        assert_that!(
            err,
            displays_as(eq("Unable to parse expires attribute: Wed Oct 21 07:28:00 2015"))
        );

        let err = parse_expires(&mut cookie, None, &DatePattern::ALL).unwrap_err();
        assert_that!(err, displays_as(eq("Missing value for expires attribute")));
    }

    #[test]
    fn expired_cookies_do_not_match() {
        let cookie = ClientCookie::new("a", "b");
        assert!(match_expiry(&cookie));

        let cookie = cookie.set_expiry(datetime!(1970-01-01 00:00:00 UTC));
        assert!(!match_expiry(&cookie));

        let cookie = cookie.set_expiry(datetime!(9999-12-31 23:59:59 UTC));
        assert!(match_expiry(&cookie));
    }
}
