use sha2::{Digest, Sha256};

const DIGEST_HEX_LEN: usize = 16;

/// Truncated SHA-256 hex digest, used wherever a raw value must not be persisted
pub fn short_digest(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(DIGEST_HEX_LEN);
    hex
}
