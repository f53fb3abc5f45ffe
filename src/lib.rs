//! Client-side cookie specifications for HTTP, following RFC 2109 and RFC 2965.
//!
//! # Overview
//!
//! You can use `amaretti` to implement the cookie-handling logic of an HTTP client.
//!
//! It has support for:
//!
//! - Parsing `Set-Cookie` and `Set-Cookie2` response headers into cookies, via [`CookieSpec::parse`]
//! - Deciding if a server is allowed to set a cookie, via [`CookieSpec::validate`]
//! - Selecting the stored cookies that should be sent with a request, via [`CookieSpec::matches`]
//! - Formatting cookies into `Cookie` request headers, via [`CookieSpec::format_cookies`]
//!
//! Two specifications are available:
//!
//! - [`Rfc2109Spec`], the baseline rules of [RFC 2109](https://www.rfc-editor.org/rfc/rfc2109)
//! - [`Rfc2965Spec`], the stricter rules of [RFC 2965](https://www.rfc-editor.org/rfc/rfc2965),
//!   which add the `Port`, `CommentURL` and `Discard` attributes
//!
//! # Non-goals
//!
//! `amaretti` is not a cookie jar.
//! It doesn't store cookies, nor does it evict them when they expire: it gives you the rules
//! to decide what a jar should accept and what it should send.
//!
//! # Quickstart
//!
//! ## Incoming cookies
//!
//! ```rust
//! use amaretti::{CookieOrigin, CookieSpec, Rfc2965Spec};
//! use amaretti::header::Header;
//!
//! // Start by creating a specification. It determines which attributes are
//! // understood and which rules a cookie must satisfy.
//! let spec = Rfc2965Spec::new();
//! // The origin describes the request the response header belongs to.
//! let origin = CookieOrigin::new("www.example.com", 80, "/shop/cart", false).unwrap();
//!
//! let header = Header::new("Set-Cookie2", r#"session=abc; Version=1; Domain=".example.com""#);
//! let cookies = spec.parse(&header, &origin).unwrap();
//! assert_eq!(cookies[0].name_value(), ("session", "abc"));
//! // The path defaults to the directory of the request path.
//! assert_eq!(cookies[0].path(), Some("/shop"));
//!
//! // Only keep the cookies the server was allowed to set.
//! assert!(spec.validate(&cookies[0], &origin).is_ok());
//! ```
//!
//! ## Outgoing cookies
//!
//! ```rust
//! use amaretti::{ClientCookie, CookieOrigin, CookieSpec, Rfc2965Spec};
//!
//! let spec = Rfc2965Spec::new();
//! let stored = vec![
//!     ClientCookie::new("session", "abc")
//!         .set_version(1)
//!         .set_domain("www.example.com")
//!         .set_path("/"),
//! ];
//!
//! // Pick the cookies that match the request you are about to send...
//! let origin = CookieOrigin::new("www.example.com", 80, "/shop", false).unwrap();
//! let selected: Vec<_> = stored
//!     .into_iter()
//!     .filter(|cookie| spec.matches(cookie, &origin))
//!     .collect();
//!
//! // ...and turn them into headers.
//! let headers = spec.format_cookies(&selected).unwrap();
//! assert_eq!(headers[0].to_string(), "Cookie: $Version=1; session=\"abc\"");
//! // RFC 2965 clients also advertise the highest version they understand.
//! assert_eq!(spec.version_header().unwrap().to_string(), "Cookie2: $Version=1");
//! ```
//!
//! # Logging
//!
//! `amaretti` emits [`tracing`](https://docs.rs/tracing) events when it ignores an attribute
//! (`TRACE`) or rejects a cookie (`DEBUG`).
//! Install a subscriber if you want to see them.

pub mod config;
pub mod header;

mod attribute;
mod client_cookie;
mod date;
mod error;
mod handler;
mod origin;
mod rfc2109_spec;
mod rfc2965_spec;
mod spec;

pub use attribute::Attribute;
pub use client_cookie::{ClientCookie, CookieVariant, PortAttribute};
pub use date::DatePattern;
pub use origin::{CookieOrigin, LOCAL_DOMAIN_SUFFIX};
pub use rfc2109_spec::Rfc2109Spec;
pub use rfc2965_spec::Rfc2965Spec;
pub use spec::CookieSpec;
pub use time;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;

/// Errors that can occur when using `amaretti`.
pub mod errors {
    pub use crate::error::{CookieError, InvalidArgumentError, MalformedCookieError};
}
