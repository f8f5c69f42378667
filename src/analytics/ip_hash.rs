use sha2::{Digest, Sha256};

/// One-way digest of a client address.
///
/// SHA-256 over the textual address, lowercase hex. Deterministic so the
/// digest can serve as half of the (ip_hash, source) dedup key. Unsalted:
/// fine for dedup, not for adversarial hashing.
pub fn hash_ip(ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}
