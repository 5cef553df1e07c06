//! Fixed-width 256-bit arithmetic over little-endian byte arrays.
//!
//! Child derivation needs exact unsigned semantics that `Scalar` cannot
//! provide: the private scalar half is carried *unreduced* (mod nothing,
//! bounded by 2^255) and the nonce half wraps mod 2^256. Everything here
//! operates on `[u8; 32]` in little-endian order with byte-wise carry
//! propagation.

/// Keep only the low `256 - g` bits of a little-endian 256-bit value,
/// clearing the top `g` bits starting from the most significant byte.
///
/// `g` is the truncation width of the derivation scheme: 32 for
/// Khovratovich, 9 for Peikert.
pub(crate) fn truncate_high_bits(z: &[u8; 32], g: u32) -> [u8; 32] {
    debug_assert!(g <= 256);
    let mut out = *z;
    let mut remaining = g;
    for byte in out.iter_mut().rev() {
        if remaining == 0 {
            break;
        }
        if remaining >= 8 {
            *byte = 0;
            remaining -= 8;
        } else {
            *byte &= 0xff >> remaining;
            remaining = 0;
        }
    }
    out
}

/// Multiply a little-endian 256-bit value by 8.
///
/// Inputs are always truncated z-halves (below 2^247), so the shift
/// cannot carry out of 256 bits.
pub(crate) fn shl3(b: &[u8; 32]) -> [u8; 32] {
    let mut shifted = [0u8; 32];
    let mut high = 0u8;
    for (out, &byte) in shifted.iter_mut().zip(b.iter()) {
        *out = (byte << 3) | high;
        high = byte >> 5;
    }
    shifted
}

/// Compute `a + 8 * b` over little-endian 256-bit values.
///
/// Returns `None` if the sum reaches 2^255, the bound above which the
/// result is no longer a safe Ed25519 scalar. Callers must treat that as
/// a hard derivation failure, never wrap.
pub(crate) fn add_scaled_by_8(a: &[u8; 32], b: &[u8; 32]) -> Option<[u8; 32]> {
    let (sum, carry) = add_le_bytes(a, &shl3(b));
    if carry != 0 || sum[31] & 0b1000_0000 != 0 {
        return None;
    }
    Some(sum)
}

/// Compute `(a + b) mod 2^256` over little-endian 256-bit values.
pub(crate) fn add_wrapping(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    add_le_bytes(a, b).0
}

fn add_le_bytes(a: &[u8; 32], b: &[u8; 32]) -> ([u8; 32], u8) {
    let mut out = [0u8; 32];
    let mut carry = 0u16;
    for i in 0..32 {
        let sum = a[i] as u16 + b[i] as u16 + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }
    (out, carry as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_khovratovich_zeroes_top_four_bytes() {
        let z = [0xffu8; 32];
        let t = truncate_high_bits(&z, 32);
        assert_eq!(&t[..28], &[0xff; 28]);
        assert_eq!(&t[28..], &[0; 4]);
    }

    #[test]
    fn truncate_peikert_straddles_a_byte() {
        let z = [0xffu8; 32];
        let t = truncate_high_bits(&z, 9);
        // 9 bits: all of byte 31, the top bit of byte 30.
        assert_eq!(t[31], 0);
        assert_eq!(t[30], 0x7f);
        assert_eq!(&t[..30], &[0xff; 30]);
    }

    #[test]
    fn add_scaled_matches_small_integers() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        a[0] = 100;
        b[0] = 7;
        let sum = add_scaled_by_8(&a, &b).unwrap();
        assert_eq!(sum[0], 156); // 100 + 8*7
        assert_eq!(&sum[1..], &[0; 31]);
    }

    #[test]
    fn add_scaled_propagates_carries() {
        let mut a = [0u8; 32];
        a[0] = 0xff;
        a[1] = 0xff;
        let mut b = [0u8; 32];
        b[0] = 0x20; // 8 * 0x20 = 0x100
        let sum = add_scaled_by_8(&a, &b).unwrap();
        assert_eq!(sum[0], 0xff);
        assert_eq!(sum[1], 0x00);
        assert_eq!(sum[2], 0x01);
    }

    #[test]
    fn add_scaled_rejects_bit_255() {
        // a just below 2^255, b small but enough to cross it.
        let mut a = [0u8; 32];
        a[31] = 0x7f;
        for byte in a.iter_mut().take(31) {
            *byte = 0xff;
        }
        let mut b = [0u8; 32];
        b[0] = 1;
        assert_eq!(add_scaled_by_8(&a, &b), None);
    }

    #[test]
    fn add_wrapping_wraps_mod_2_256() {
        let a = [0xffu8; 32];
        let mut b = [0u8; 32];
        b[0] = 2;
        let sum = add_wrapping(&a, &b);
        assert_eq!(sum[0], 1);
        assert_eq!(&sum[1..], &[0; 31]);
    }
}
