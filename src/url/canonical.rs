use crate::UrlError;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A URL with its fragment removed
///
/// Two URLs that differ only by fragment produce the same `CanonicalUrl`.
/// Equality, hashing and ordering all go through the serialized form, so the
/// type can be used directly as a set member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Parses a URL string and strips its fragment
    ///
    /// Only `http` and `https` URLs are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitesift::url::CanonicalUrl;
    ///
    /// let url = CanonicalUrl::parse("http://Site.example/a#intro").unwrap();
    /// assert_eq!(url.as_str(), "http://site.example/a");
    /// ```
    pub fn parse(url_str: &str) -> Result<Self, UrlError> {
        let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        Ok(Self::from_url(url))
    }

    /// Wraps an already parsed URL, dropping its fragment
    pub fn from_url(mut url: Url) -> Self {
        url.set_fragment(None);
        Self(url)
    }

    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
