use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA-256 fingerprint of content.
///
/// Fingerprints are what the registries record as `lastCommittedHash`:
/// a digest of the definition last applied to a target or binding. A
/// later run compares fingerprints to decide whether redeployment is
/// needed at all.
pub fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
