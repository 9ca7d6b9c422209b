use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Content address of a URL, used as the hash index key.
///
/// Hex-encoded SHA-256 of the URL bytes. Collisions are treated as
/// impossible for this domain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UrlDigest(String);

impl UrlDigest {
    pub fn of(url: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(url.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UrlDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let digest = UrlDigest::of("http://example.com");
        assert_eq!(digest.as_str().len(), 64);
        assert!(digest.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, UrlDigest::of("http://example.com"));
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            UrlDigest::of("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn distinct_urls_have_distinct_digests() {
        assert_ne!(
            UrlDigest::of("http://example.com"),
            UrlDigest::of("http://example.com/")
        );
    }
}
