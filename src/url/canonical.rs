use std::collections::HashSet;
use url::form_urlencoded;
use url::Url;

/// Default tracking query parameters stripped during canonicalization
pub const DEFAULT_TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
];

/// Maps (base, href) pairs to canonical URL strings.
///
/// The canonical string is the identity and dedup key for the entire system:
/// two hrefs that canonicalize to the same string are the same resource.
///
/// Canonicalization steps, in order:
///
/// 1. Resolve `href` relative to `base`
/// 2. Strip any fragment
/// 3. Reject unless the scheme is `http` or `https`
/// 4. Lower-case scheme and host (the `url` crate does this on parse)
/// 5. Retain an explicit non-default port; elide default ports
/// 6. Drop query parameters whose key is in the tracking blocklist,
///    re-encoding the remainder in their original relative order
///
/// The result is idempotent: canonicalizing a canonical URL against itself
/// yields the same string.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    tracking: HashSet<String>,
}

impl Canonicalizer {
    /// Creates a canonicalizer with the given tracking-parameter blocklist
    pub fn new<I, S>(tracking_params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tracking: tracking_params.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonicalizes `href` resolved against `base`
    ///
    /// Returns `None` for malformed hrefs and for schemes outside http/https
    /// (`mailto:`, `javascript:`, `data:` and friends all fail the scheme
    /// check after resolution).
    pub fn canonicalize(&self, base: &Url, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let joined = base.join(href).ok()?;
        self.apply(joined)
    }

    /// Canonicalizes an absolute URL string (used for seeds)
    pub fn canonicalize_absolute(&self, raw: &str) -> Option<String> {
        let url = Url::parse(raw.trim()).ok()?;
        self.apply(url)
    }

    fn apply(&self, mut url: Url) -> Option<String> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return None;
        }
        url.host_str()?;

        url.set_fragment(None);

        if url.query().is_some() {
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(key, _)| !self.tracking.contains(key.as_ref()))
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();

            if kept.is_empty() {
                url.set_query(None);
            } else {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(kept)
                    .finish();
                url.set_query(Some(&encoded));
            }
        }

        Some(url.to_string())
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKING_PARAMS.iter().copied())
    }
}
