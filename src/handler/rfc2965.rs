//! Rules introduced or tightened by RFC 2965.
use crate::errors::MalformedCookieError;
use crate::{Attribute, ClientCookie, CookieOrigin, CookieVariant, PortAttribute};

pub(super) fn parse_domain(
    cookie: &mut ClientCookie,
    value: Option<&str>,
) -> Result<(), MalformedCookieError> {
    let value =
        value.ok_or_else(|| MalformedCookieError::new("Missing value for domain attribute"))?;
    if value.trim().is_empty() {
        return Err(MalformedCookieError::new("Blank value for domain attribute"));
    }
    let mut domain = value.to_ascii_lowercase();
    if !domain.starts_with('.') {
        // An explicitly specified domain must always start with a dot.
        domain.insert(0, '.');
    }
    cookie.domain = Some(domain);
    Ok(())
}

/// `host` domain-matches `domain` if they are equal, or if `domain` starts
/// with a dot and is a suffix of `host`.
fn domain_match(host: &str, domain: &str) -> bool {
    host == domain || (domain.starts_with('.') && host.ends_with(domain))
}

pub(super) fn validate_domain(
    cookie: &ClientCookie,
    origin: &CookieOrigin,
) -> Result<(), MalformedCookieError> {
    let host = origin.host().to_ascii_lowercase();
    let domain = cookie
        .domain()
        .ok_or_else(|| MalformedCookieError::new("Invalid cookie state: domain not specified"))?
        .to_ascii_lowercase();

    if !cookie.contains_attribute(Attribute::Domain.as_str()) {
        // Without a domain attribute the cookie is bound to the effective host.
        if domain != host {
            return Err(MalformedCookieError::new(format!(
                "Illegal domain attribute: \"{domain}\". Domain of origin: \"{host}\""
            )));
        }
        return Ok(());
    }

    if !domain.starts_with('.') {
        return Err(MalformedCookieError::new(format!(
            "Domain attribute \"{domain}\" violates RFC 2109: domain must start with a dot"
        )));
    }
    let embedded_dot = matches!(domain[1..].find('.'), Some(i) if i + 1 != domain.len() - 1);
    if !embedded_dot && domain != ".local" {
        return Err(MalformedCookieError::new(format!(
            "Domain attribute \"{domain}\" violates RFC 2965: the value contains no embedded dots and the value is not .local"
        )));
    }
    if !domain_match(&host, &domain) {
        return Err(MalformedCookieError::new(format!(
            "Domain attribute \"{domain}\" violates RFC 2965: effective host name does not domain-match domain attribute."
        )));
    }
    let host_without_domain = &host[..host.len() - domain.len()];
    if host_without_domain.contains('.') {
        return Err(MalformedCookieError::new(format!(
            "Domain attribute \"{domain}\" violates RFC 2965: effective host minus domain may not contain any dots"
        )));
    }
    Ok(())
}

pub(super) fn match_domain(cookie: &ClientCookie, origin: &CookieOrigin) -> bool {
    let Some(domain) = cookie.domain() else {
        return false;
    };
    let host = origin.host().to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    if !domain_match(&host, &domain) {
        return false;
    }
    !host[..host.len() - domain.len()].contains('.')
}

pub(super) fn parse_port(
    cookie: &mut ClientCookie,
    value: Option<&str>,
) -> Result<(), MalformedCookieError> {
    if cookie.variant != CookieVariant::Cookie2 {
        return Ok(());
    }
    // A blank value keeps the default binding to the request port.
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        cookie.ports = Some(parse_port_list(value)?);
    }
    Ok(())
}

fn parse_port_list(value: &str) -> Result<Vec<u16>, MalformedCookieError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|port| !port.is_empty())
        .map(|port| {
            port.parse::<u16>().map_err(|e| {
                MalformedCookieError::new(format!("Invalid Port attribute: {value} ({e})"))
            })
        })
        .collect()
}

/// Applies the `Port` rules to the request port of `origin`.
fn port_match(cookie: &ClientCookie, origin: &CookieOrigin) -> bool {
    match cookie.port_attribute() {
        PortAttribute::Absent => true,
        PortAttribute::Blank | PortAttribute::List(_) => cookie
            .ports()
            .map_or(false, |ports| ports.contains(&origin.port())),
    }
}

pub(super) fn validate_port(
    cookie: &ClientCookie,
    origin: &CookieOrigin,
) -> Result<(), MalformedCookieError> {
    if port_match(cookie, origin) {
        return Ok(());
    }
    Err(MalformedCookieError::new(
        "Port attribute violates RFC 2965: Request port not found in cookie's port list.",
    ))
}

pub(super) fn match_port(cookie: &ClientCookie, origin: &CookieOrigin) -> bool {
    port_match(cookie, origin)
}

pub(super) fn parse_comment_url(cookie: &mut ClientCookie, value: Option<&str>) {
    if cookie.variant == CookieVariant::Cookie2 {
        cookie.comment_url = value.map(str::to_owned);
    }
}

pub(super) fn parse_version(
    cookie: &mut ClientCookie,
    value: Option<&str>,
) -> Result<(), MalformedCookieError> {
    let value =
        value.ok_or_else(|| MalformedCookieError::new("Missing value for version attribute"))?;
    match value.trim().parse::<i32>() {
        Ok(version) if version >= 0 => {
            cookie.version = version;
            Ok(())
        }
        _ => Err(MalformedCookieError::new("Invalid cookie version.")),
    }
}

pub(super) fn validate_version(cookie: &ClientCookie) -> Result<(), MalformedCookieError> {
    if cookie.variant == CookieVariant::Cookie2
        && !cookie.contains_attribute(Attribute::Version.as_str())
    {
        return Err(MalformedCookieError::new(
            "Violates RFC 2965. Version attribute is required.",
        ));
    }
    Ok(())
}
