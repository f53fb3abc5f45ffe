use std::fmt;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// A date format accepted for the value of the `Expires` cookie attribute.
///
/// Dates are always interpreted as UTC.
///
/// ```rust
/// use amaretti::DatePattern;
///
/// let date = DatePattern::Rfc1123.parse("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
/// assert_eq!(date.year(), 2015);
///
/// // The same instant, in asctime format.
/// let other = DatePattern::Asctime.parse("Wed Oct 21 07:28:00 2015").unwrap();
/// assert_eq!(date, other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DatePattern {
    /// `Wed, 21 Oct 2015 07:28:00 GMT`
    #[cfg_attr(feature = "serde", serde(alias = "rfc1123"))]
    Rfc1123,
    /// `Wednesday, 21-Oct-2015 07:28:00 GMT`
    ///
    /// Only four-digit years are accepted.
    #[cfg_attr(feature = "serde", serde(alias = "rfc1036"))]
    Rfc1036,
    /// `Wed, 21-Oct-2015 07:28:00 GMT`, as used by the original Netscape cookie draft.
    #[cfg_attr(feature = "serde", serde(alias = "netscape"))]
    Netscape,
    /// `Wed Oct 21 07:28:00 2015`, ANSI C's `asctime()` format.
    #[cfg_attr(feature = "serde", serde(alias = "asctime"))]
    Asctime,
}

impl DatePattern {
    /// All the supported date patterns.
    pub const ALL: [DatePattern; 4] = [
        DatePattern::Rfc1123,
        DatePattern::Rfc1036,
        DatePattern::Netscape,
        DatePattern::Asctime,
    ];

    fn format(&self) -> &'static [FormatItem<'static>] {
        static RFC1123: &[FormatItem<'_>] = format_description!(
            "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
        );
        static RFC1036: &[FormatItem<'_>] = format_description!(
            "[weekday], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
        );
        static NETSCAPE: &[FormatItem<'_>] = format_description!(
            "[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
        );
        static ASCTIME: &[FormatItem<'_>] = format_description!(
            "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year]"
        );

        match self {
            DatePattern::Rfc1123 => RFC1123,
            DatePattern::Rfc1036 => RFC1036,
            DatePattern::Netscape => NETSCAPE,
            DatePattern::Asctime => ASCTIME,
        }
    }

    /// Parses `value` according to this pattern.
    ///
    /// Returns `None` if `value` is not a date in this format.
    pub fn parse(&self, value: &str) -> Option<OffsetDateTime> {
        PrimitiveDateTime::parse(value.trim(), self.format())
            .ok()
            .map(PrimitiveDateTime::assume_utc)
    }

    /// Returns the name of the pattern as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePattern::Rfc1123 => "RFC 1123",
            DatePattern::Rfc1036 => "RFC 1036",
            DatePattern::Netscape => "Netscape",
            DatePattern::Asctime => "asctime",
        }
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `value` with the first pattern in `patterns` that accepts it.
pub(crate) fn parse_date(value: &str, patterns: &[DatePattern]) -> Option<OffsetDateTime> {
    patterns.iter().find_map(|pattern| pattern.parse(value))
}
