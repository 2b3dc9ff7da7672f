//! Bit-position arithmetic shared by the node algorithms
//!
//! Depth 0 tests the most significant bit of a key; depth `d` tests bit
//! `63 - d`. Masks therefore narrow as depth grows.

/// Number of bits in a key
pub const KEY_BITS: u16 = 64;

/// The bit tested by an internal node at depth 0
pub const HIGH_BIT: u64 = 1 << 63;

/// Single-bit mask tested by an internal node at `depth`.
#[inline]
pub fn bit_mask(depth: u16) -> u64 {
    debug_assert!(depth < KEY_BITS, "depth {depth} out of range");
    HIGH_BIT >> depth
}

/// Mask covering every bit strictly above the one tested at `depth`.
#[inline]
pub fn prefix_mask(depth: u16) -> u64 {
    debug_assert!(depth < KEY_BITS, "depth {depth} out of range");
    if depth == 0 {
        0
    } else {
        u64::MAX << (KEY_BITS - depth)
    }
}

/// Depth of the most significant bit where `a` and `b` differ.
///
/// Returns `None` when the keys are equal.
#[inline]
pub fn divergence_depth(a: u64, b: u64) -> Option<u16> {
    let diff = a ^ b;
    if diff == 0 {
        None
    } else {
        Some(diff.leading_zeros() as u16)
    }
}

/// Whether `key` has the bit tested at `depth` set.
#[inline]
pub fn is_one(key: u64, depth: u16) -> bool {
    key & bit_mask(depth) != 0
}
