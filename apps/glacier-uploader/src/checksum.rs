//! Multipart ETag computation
//!
//! When an object is uploaded in parts, its ETag is not the MD5 of the whole
//! object. The service takes the MD5 of each part, concatenates the raw digest
//! bytes in part order, hashes that concatenation, and appends `-<part count>`.
//! The local composite value is only comparable if it follows the same recipe.

use md5::{Digest, Md5};

/// Raw MD5 digest of a single part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartDigest([u8; 16]);

impl PartDigest {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex form, as the service reports single-part ETags
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Compute the content digest of one chunk
pub fn digest(chunk: &[u8]) -> PartDigest {
    let mut out = [0u8; 16];
    out.copy_from_slice(&Md5::digest(chunk));
    PartDigest(out)
}

/// Derive the composite multipart ETag from ordered part digests
pub fn finalize(digests: &[PartDigest], count: usize) -> String {
    let mut hasher = Md5::new();
    for d in digests {
        hasher.update(d.as_bytes());
    }
    format!("{}-{}", hex::encode(hasher.finalize()), count)
}

/// Strip the surrounding quotes the service puts around ETags
pub fn unquote_etag(etag: &str) -> &str {
    etag.trim_matches('"')
}

// ============================================================================
// Accumulator
// ============================================================================

/// Running collection of part digests, fed one chunk at a time
#[derive(Debug, Default, Clone)]
pub struct CompositeEtag {
    digests: Vec<PartDigest>,
}

impl CompositeEtag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest a chunk and record it as the next part
    pub fn push_chunk(&mut self, chunk: &[u8]) -> PartDigest {
        let d = digest(chunk);
        self.push(d);
        d
    }

    pub fn push(&mut self, digest: PartDigest) {
        self.digests.push(digest);
    }

    pub fn part_count(&self) -> usize {
        self.digests.len()
    }

    pub fn finalize(&self) -> String {
        finalize(&self.digests, self.digests.len())
    }
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Outcome of comparing the service ETag with the local composite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityCheck {
    Match,
    Mismatch { remote: String, local: String },
}

impl IntegrityCheck {
    /// Compare a (possibly quoted) remote ETag against the local value
    pub fn compare(remote: &str, local: &str) -> Self {
        let remote = unquote_etag(remote);
        if remote == local {
            Self::Match
        } else {
            Self::Mismatch {
                remote: remote.to_string(),
                local: local.to_string(),
            }
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_value() {
        assert_eq!(digest(b"").to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            digest(b"hello world").to_hex(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
    }

    #[test]
    fn test_finalize_hashes_raw_digest_bytes() {
        let parts = [digest(b"part one"), digest(b"part two")];

        let mut concat = Vec::new();
        concat.extend_from_slice(parts[0].as_bytes());
        concat.extend_from_slice(parts[1].as_bytes());
        let expected = format!("{}-2", digest(&concat).to_hex());

        assert_eq!(finalize(&parts, 2), expected);
    }

    #[test]
    fn test_finalize_is_deterministic() {
        let parts = vec![digest(b"a"), digest(b"b"), digest(b"c")];
        assert_eq!(finalize(&parts, 3), finalize(&parts, 3));
    }

    #[test]
    fn test_finalize_depends_on_order() {
        let ab = [digest(b"a"), digest(b"b")];
        let ba = [digest(b"b"), digest(b"a")];
        assert_ne!(finalize(&ab, 2), finalize(&ba, 2));
    }

    #[test]
    fn test_accumulator_matches_free_function() {
        let mut acc = CompositeEtag::new();
        acc.push_chunk(b"first");
        acc.push_chunk(b"second");

        assert_eq!(acc.part_count(), 2);
        assert_eq!(
            acc.finalize(),
            finalize(&[digest(b"first"), digest(b"second")], 2)
        );
    }

    #[test]
    fn test_composite_format() {
        let mut acc = CompositeEtag::new();
        for chunk in [b"x".as_slice(), b"y", b"z"] {
            acc.push_chunk(chunk);
        }

        let etag = acc.finalize();
        let (hash, count) = etag.split_once('-').unwrap();
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(count, "3");
    }

    #[test]
    fn test_quoted_remote_etag_matches() {
        let check = IntegrityCheck::compare("\"abc123-3\"", "abc123-3");
        assert_eq!(check, IntegrityCheck::Match);
    }

    #[test]
    fn test_mismatch_keeps_both_values() {
        let check = IntegrityCheck::compare("\"abc123-3\"", "def456-3");
        assert_eq!(
            check,
            IntegrityCheck::Mismatch {
                remote: "abc123-3".to_string(),
                local: "def456-3".to_string(),
            }
        );
        assert!(!check.is_match());
    }
}
