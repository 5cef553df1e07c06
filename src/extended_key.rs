//! Extended key value types.
//!
//! An extended private key is the 96-byte node of the BIP32-Ed25519 tree:
//! the scalar half `kl`, the signing-nonce half `kr` and the chain code.
//! An extended public key drops the private halves and keeps the curve
//! point plus the chain code (64 bytes), which is all a watch-only party
//! needs to derive soft descendants.

use curve25519_dalek::constants;
use curve25519_dalek::scalar::Scalar;
use zeroize::Zeroize;

use crate::common::edwards_from_bytes;

/// A node of the private derivation tree: `kl ‖ kr ‖ chain_code`.
///
/// Invariants kept by construction: `kl < 2^255` and `kl ≡ 0 (mod 8)`
/// (the clamped-scalar shape Ed25519 and X25519 expect). The key zeroizes
/// itself on drop; callers holding serialized copies own their wiping.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    kl: [u8; 32],
    kr: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedPrivateKey {
    pub(crate) fn new(kl: [u8; 32], kr: [u8; 32], chain_code: [u8; 32]) -> Self {
        Self { kl, kr, chain_code }
    }

    pub(crate) fn kl(&self) -> &[u8; 32] {
        &self.kl
    }

    pub(crate) fn kr(&self) -> &[u8; 32] {
        &self.kr
    }

    pub(crate) fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// The scalar half as an unreduced dalek scalar. Safe because the
    /// `kl < 2^255` invariant holds for every constructed node.
    pub(crate) fn scalar_bits(&self) -> Scalar {
        Scalar::from_bits(self.kl)
    }

    /// The compressed public point `kl·B`.
    pub fn public_key(&self) -> [u8; 32] {
        (&self.scalar_bits() * &constants::ED25519_BASEPOINT_TABLE)
            .compress()
            .0
    }

    /// Drop the private halves, keeping point and chain code.
    pub fn extended_public(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            public_key: self.public_key(),
            chain_code: self.chain_code,
        }
    }

    /// Serialize as the 96-byte wire form `kl ‖ kr ‖ chain_code`.
    pub fn serialize(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        out[..32].copy_from_slice(&self.kl);
        out[32..64].copy_from_slice(&self.kr);
        out[64..].copy_from_slice(&self.chain_code);
        out
    }

    /// Deserialize from the 96-byte wire form, returns `None` if the
    /// scalar half is not in clamped shape.
    pub fn deserialize(bytes: [u8; 96]) -> Option<Self> {
        let mut kl = [0u8; 32];
        let mut kr = [0u8; 32];
        let mut chain_code = [0u8; 32];
        kl.copy_from_slice(&bytes[..32]);
        kr.copy_from_slice(&bytes[32..64]);
        chain_code.copy_from_slice(&bytes[64..]);
        if kl[0] & 0b0000_0111 != 0 || kl[31] & 0b1000_0000 != 0 {
            return None;
        }
        Some(Self { kl, kr, chain_code })
    }
}

impl Zeroize for ExtendedPrivateKey {
    fn zeroize(&mut self) {
        self.kl.zeroize();
        self.kr.zeroize();
        self.chain_code.zeroize();
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl zeroize::ZeroizeOnDrop for ExtendedPrivateKey {}

/// A node of the public derivation tree: `public_key ‖ chain_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    public_key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedPublicKey {
    pub(crate) fn new(public_key: [u8; 32], chain_code: [u8; 32]) -> Self {
        Self {
            public_key,
            chain_code,
        }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.public_key
    }

    pub(crate) fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Serialize as the 64-byte wire form `public_key ‖ chain_code`.
    pub fn serialize(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.public_key);
        out[32..].copy_from_slice(&self.chain_code);
        out
    }

    /// Deserialize from the 64-byte wire form, returns `None` if the
    /// point half is not a valid torsion-free Edwards point.
    pub fn deserialize(bytes: [u8; 64]) -> Option<Self> {
        edwards_from_bytes(&bytes[..32])?;
        let mut public_key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        public_key.copy_from_slice(&bytes[..32]);
        chain_code.copy_from_slice(&bytes[32..]);
        Some(Self {
            public_key,
            chain_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> ExtendedPrivateKey {
        let mut kl = [0x11u8; 32];
        kl[0] = 0x10; // low three bits clear
        kl[31] = 0x51; // high bit clear
        ExtendedPrivateKey::new(kl, [0x22; 32], [0x33; 32])
    }

    #[test]
    fn private_round_trip() {
        let key = sample_key();
        let restored = ExtendedPrivateKey::deserialize(key.serialize()).unwrap();
        assert_eq!(restored.serialize(), key.serialize());
    }

    #[test]
    fn private_deserialize_rejects_unclamped_scalar() {
        let mut bytes = sample_key().serialize();
        bytes[0] |= 0b001;
        assert!(ExtendedPrivateKey::deserialize(bytes).is_none());

        let mut bytes = sample_key().serialize();
        bytes[31] |= 0b1000_0000;
        assert!(ExtendedPrivateKey::deserialize(bytes).is_none());
    }

    #[test]
    fn public_round_trip_and_validation() {
        let ext_pub = sample_key().extended_public();
        let restored = ExtendedPublicKey::deserialize(ext_pub.serialize()).unwrap();
        assert_eq!(restored, ext_pub);

        // An all-0xff first half is not a decompressible point.
        let mut bytes = ext_pub.serialize();
        bytes[..32].copy_from_slice(&[0xff; 32]);
        assert!(ExtendedPublicKey::deserialize(bytes).is_none());
    }

    #[test]
    fn public_key_matches_extended_public() {
        let key = sample_key();
        assert_eq!(key.public_key(), key.extended_public().public_key());
    }
}
