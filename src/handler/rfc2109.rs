//! Domain and version rules of RFC 2109.
use crate::errors::MalformedCookieError;
use crate::{ClientCookie, CookieOrigin};

pub(super) fn parse_domain(
    cookie: &mut ClientCookie,
    value: Option<&str>,
) -> Result<(), MalformedCookieError> {
    let value =
        value.ok_or_else(|| MalformedCookieError::new("Missing value for domain attribute"))?;
    if value.trim().is_empty() {
        return Err(MalformedCookieError::new("Blank value for domain attribute"));
    }
    cookie.domain = Some(value.to_owned());
    Ok(())
}

pub(super) fn validate_domain(
    cookie: &ClientCookie,
    origin: &CookieOrigin,
) -> Result<(), MalformedCookieError> {
    let host = origin.host();
    let domain = cookie
        .domain()
        .ok_or_else(|| MalformedCookieError::new("Cookie domain may not be null"))?;
    if domain == host {
        return Ok(());
    }
    if !domain.contains('.') {
        return Err(MalformedCookieError::new(format!(
            "Domain attribute \"{domain}\" does not match the host \"{host}\""
        )));
    }
    if !domain.starts_with('.') {
        return Err(MalformedCookieError::new(format!(
            "Domain attribute \"{domain}\" violates RFC 2109: domain must start with a dot"
        )));
    }
    match domain[1..].find('.') {
        Some(i) if i + 1 != domain.len() - 1 => {}
        _ => {
            return Err(MalformedCookieError::new(format!(
                "Domain attribute \"{domain}\" violates RFC 2109: domain must contain an embedded dot"
            )))
        }
    }
    let host = host.to_ascii_lowercase();
    if !host.ends_with(domain) {
        return Err(MalformedCookieError::new(format!(
            "Illegal domain attribute \"{domain}\". Domain of origin: \"{host}\""
        )));
    }
    let host_without_domain = &host[..host.len() - domain.len()];
    if host_without_domain.contains('.') {
        return Err(MalformedCookieError::new(format!(
            "Domain attribute \"{domain}\" violates RFC 2109: host minus domain may not contain any dots"
        )));
    }
    Ok(())
}

pub(super) fn match_domain(cookie: &ClientCookie, origin: &CookieOrigin) -> bool {
    let host = origin.host();
    match cookie.domain() {
        Some(domain) => host == domain || (domain.starts_with('.') && host.ends_with(domain)),
        None => false,
    }
}

pub(super) fn parse_version(
    cookie: &mut ClientCookie,
    value: Option<&str>,
) -> Result<(), MalformedCookieError> {
    let value =
        value.ok_or_else(|| MalformedCookieError::new("Missing value for version attribute"))?;
    if value.trim().is_empty() {
        return Err(MalformedCookieError::new("Blank value for version attribute"));
    }
    cookie.version = value
        .trim()
        .parse()
        .map_err(|e| MalformedCookieError::new(format!("Invalid version: {e}")))?;
    Ok(())
}

pub(super) fn validate_version(cookie: &ClientCookie) -> Result<(), MalformedCookieError> {
    if cookie.version() < 0 {
        return Err(MalformedCookieError::new(
            "Cookie version may not be negative",
        ));
    }
    Ok(())
}
