//! Proof-of-work strength: leading zero bits of a digest.

/// Count the zero bits before the first set bit, scanning from byte 0.
///
/// Returns `8 * bytes.len()` when every byte is zero.
pub fn leading_zero_bits(bytes: &[u8]) -> u32 {
    let mut total = 0;
    for &b in bytes {
        let zeros = b.leading_zeros();
        total += zeros;
        if zeros < 8 {
            break;
        }
    }
    total
}
