//! Coordinate hashing.
//!
//! A key is digested with Blake3 and the 32-byte digest is split into two
//! 16-byte halves. Each half, read as a big-endian `u128`, becomes one
//! coordinate in `[0, 1)`.

use can_topology::Point;

/// Salt used by [`hash_key`].
pub const DEFAULT_SALT: &str = "can";

/// Bits of precision in an `f64` mantissa.
const F64_MANTISSA_BITS: u32 = 53;

/// A 32-byte key digest (Blake3 hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyDigest(pub [u8; 32]);

impl KeyDigest {
    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The two halves of the digest as big-endian integers.
    pub fn halves(&self) -> (u128, u128) {
        let mut hi = [0u8; 16];
        let mut lo = [0u8; 16];
        hi.copy_from_slice(&self.0[..16]);
        lo.copy_from_slice(&self.0[16..]);
        (u128::from_be_bytes(hi), u128::from_be_bytes(lo))
    }

    /// The coordinate this digest addresses.
    pub fn to_point(&self) -> Point {
        let (a, b) = self.halves();
        Point::new(unit_interval(a), unit_interval(b))
    }
}

impl std::fmt::Display for KeyDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 hex chars
        write!(f, "{}...", &self.to_hex()[..8])
    }
}

/// Normalize a `u128` to `[0, 1)`.
///
/// Equivalent to `v / 2^128` truncated to the 53 bits an `f64` can hold, so
/// the result never rounds up to 1.0.
fn unit_interval(v: u128) -> f64 {
    let top = (v >> (u128::BITS - F64_MANTISSA_BITS)) as u64;
    top as f64 / (1u64 << F64_MANTISSA_BITS) as f64
}

/// Digest a key under a salt: `blake3(salt ‖ ":" ‖ key)`.
pub fn digest_salted_key(salt: &str, key: &str) -> KeyDigest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(key.as_bytes());
    KeyDigest(*hasher.finalize().as_bytes())
}

/// Hash a key to its coordinate under a salt.
pub fn hash_salted_key(salt: &str, key: &str) -> Point {
    digest_salted_key(salt, key).to_point()
}

/// Hash a key to its coordinate under [`DEFAULT_SALT`].
pub fn hash_key(key: &str) -> Point {
    hash_salted_key(DEFAULT_SALT, key)
}
