use crate::url::CanonicalUrl;

/// Checks whether a candidate link is eligible for crawling
///
/// A candidate is in scope iff its canonical string starts with the base
/// URL's canonical string. The match is a plain string prefix, not path
/// segment aware: a base of `http://x/foo` also admits `http://x/foobar`.
///
/// # Examples
///
/// ```
/// use sitesift::url::{in_scope, CanonicalUrl};
///
/// let base = CanonicalUrl::parse("http://site/docs").unwrap();
/// let page = CanonicalUrl::parse("http://site/docs/intro").unwrap();
/// let other = CanonicalUrl::parse("http://other.com/docs").unwrap();
///
/// assert!(in_scope(&page, &base));
/// assert!(!in_scope(&other, &base));
/// ```
pub fn in_scope(candidate: &CanonicalUrl, base: &CanonicalUrl) -> bool {
    candidate.as_str().starts_with(base.as_str())
}
