//! Byte-level validation helpers shared by verification, public child
//! derivation and ECDH.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use std::convert::TryInto;

/// Converts 32 bytes into an Edwards point, checking both that the Y
/// coordinate decompresses onto the curve and that the point is torsion
/// free.
///
/// # Panics
/// If the input `bytes` slice does not have a length of 32.
#[inline(always)]
pub(crate) fn edwards_from_bytes(bytes: &[u8]) -> Option<EdwardsPoint> {
    let point = CompressedEdwardsY::from_slice(bytes).decompress()?;
    // `is_torsion_free` accepts exactly the points whose small-subgroup
    // component is zero; a plain `is_small_order` check would let mixed
    // points through.
    point.is_torsion_free().then_some(point)
}

/// Converts 32 bytes into a `Scalar`, checking that the value is fully
/// reduced mod the group order.
///
/// Used when deserializing the `S` half of a signature: an unreduced `S`
/// would make signatures malleable.
///
/// # Panics
/// If the input `bytes` slice does not have a length of 32.
#[inline(always)]
pub(crate) fn scalar_from_bytes(bytes: &[u8]) -> Option<Scalar> {
    let bytes: [u8; 32] = bytes.try_into().unwrap();
    // If the top four bits are unset the scalar is below 2^252 and thus
    // guaranteed reduced; otherwise fall back to the full canonical
    // check against the 2^252.5-bit group order.
    if bytes[31] & 240 == 0 {
        Some(Scalar::from_bits(bytes))
    } else {
        Scalar::from_canonical_bytes(bytes)
    }
}
