//! DJB string hash.
//!
//! `h = 5381; for b in bytes { h = h * 33 + b }` over wrapping 32-bit
//! arithmetic. Script hints are derived from it.

const SEED: i32 = 5381;

/// DJB hash of `bytes` as a signed 32-bit value.
pub fn int_hash(bytes: &[u8]) -> i32 {
    bytes.iter().fold(SEED, |hash, &b| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(i32::from(b))
    })
}
