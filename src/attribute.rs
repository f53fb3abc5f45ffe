use std::fmt;

/// The cookie attributes understood by the cookie specifications in this crate.
///
/// Attribute names are matched case-insensitively:
///
/// ```rust
/// use amaretti::Attribute;
///
/// assert_eq!(Attribute::from_name("Max-Age"), Some(Attribute::MaxAge));
/// assert_eq!(Attribute::from_name("COMMENTURL"), Some(Attribute::CommentUrl));
/// assert_eq!(Attribute::from_name("HttpOnly"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Version,
    Path,
    Domain,
    MaxAge,
    Secure,
    Comment,
    Expires,
    Port,
    CommentUrl,
    Discard,
}

impl Attribute {
    const ALL: [Attribute; 10] = [
        Attribute::Version,
        Attribute::Path,
        Attribute::Domain,
        Attribute::MaxAge,
        Attribute::Secure,
        Attribute::Comment,
        Attribute::Expires,
        Attribute::Port,
        Attribute::CommentUrl,
        Attribute::Discard,
    ];

    /// Looks up a known attribute by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Attribute> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.as_str().eq_ignore_ascii_case(name))
    }

    /// Returns the lower-cased name of the attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Version => "version",
            Attribute::Path => "path",
            Attribute::Domain => "domain",
            Attribute::MaxAge => "max-age",
            Attribute::Secure => "secure",
            Attribute::Comment => "comment",
            Attribute::Expires => "expires",
            Attribute::Port => "port",
            Attribute::CommentUrl => "commenturl",
            Attribute::Discard => "discard",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
