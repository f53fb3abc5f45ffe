//! Configuration for a cookie specification.
//!
//! Check out the [`SpecConfig`] struct for more information.
use crate::DatePattern;

/// `SpecConfig` specifies how a cookie specification parses expiry dates
/// and how it lays out outgoing `Cookie` headers.
///
/// Check out the documentation for the fields of this struct for more information.
///
/// # Cookie specifications
///
/// To action the rules specified in this struct, you must convert it into a
/// [`Rfc2109Spec`] or a [`Rfc2965Spec`]:
///
/// ```rust
/// use amaretti::{DatePattern, Rfc2965Spec};
/// use amaretti::config::SpecConfig;
///
/// let mut config = SpecConfig::default();
/// config.date_patterns = vec![DatePattern::Rfc1123];
/// config.one_header = true;
/// let spec: Rfc2965Spec = config.into();
/// ```
///
/// [`Rfc2109Spec`]: crate::Rfc2109Spec
/// [`Rfc2965Spec`]: crate::Rfc2965Spec
#[derive(Debug, Clone)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct SpecConfig {
    /// The date formats accepted for the `Expires` attribute, tried in order.
    ///
    /// By default, all the [`DatePattern`]s are accepted.
    pub date_patterns: Vec<DatePattern>,
    /// If `true`, all cookies are formatted into a single `Cookie` header.
    /// If `false`, each cookie gets its own `Cookie` header.
    ///
    /// By default, this field is `false`.
    pub one_header: bool,
}

impl Default for SpecConfig {
    fn default() -> Self {
        SpecConfig {
            date_patterns: DatePattern::ALL.to_vec(),
            one_header: false,
        }
    }
}
