//! BIP32-Ed25519 key derivation.
//!
//! Implements the non-linear HD scheme of Khovratovich and Law
//! ("BIP32-Ed25519: Hierarchical Deterministic Keys over a Non-linear
//! Keyspace") plus the Peikert variant that truncates only 9 bits per
//! level. A 96-byte extended root key is expanded from a seed once, and
//! every further node is derived with HMAC-SHA512 over the parent's
//! material, keyed by the parent chain code.
//!
//! Soft indices (below 2^31) bind the derivation messages to the parent
//! *public* key, so a watch-only holder of an [`ExtendedPublicKey`] can
//! follow the same soft edges without any private material. Hardened
//! indices mix in `kl ‖ kr` and are private-only.

use curve25519_dalek::constants;
use curve25519_dalek::scalar::Scalar;
use hmac::{Hmac, Mac, NewMac};
use sha2::{Digest, Sha256, Sha512};

use crate::arith::{add_scaled_by_8, add_wrapping, shl3, truncate_high_bits};
use crate::common::edwards_from_bytes;
use crate::context::KeyContext;
use crate::error::{Error, Result};
use crate::extended_key::{ExtendedPrivateKey, ExtendedPublicKey};

type HmacSha512 = Hmac<Sha512>;

/// First index of the hardened range.
pub const HARDENED_OFFSET: u32 = 1 << 31;

/// Truncation width applied to the scalar half of `z` at every
/// derivation level. The width must be identical across all levels of a
/// derivation; it is therefore threaded through every call instead of
/// being ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationType {
    /// g = 32, the reference scheme from the BIP32-Ed25519 paper.
    Khovratovich,
    /// g = 9, allowing deeper trees before the scalar bound is reached.
    Peikert,
}

impl DerivationType {
    pub(crate) fn g(self) -> u32 {
        match self {
            DerivationType::Khovratovich => 32,
            DerivationType::Peikert => 9,
        }
    }
}

fn hmac_sha512(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Expand a seed into the extended root key.
///
/// `k = SHA512(seed)` is split into `kl ‖ kr`; while bit 5 of `kl[31]`
/// is set, the pair is re-derived as `HMAC-SHA512(key = kl, data = kr)`
/// and resplit. The loop is mandatory: it discards the (rare) expansions
/// whose scalar cannot be clamped into a safe range. `kl` is then
/// clamped and the chain code is `SHA256(0x01 ‖ seed)`.
///
/// Deterministic: the same seed always yields a byte-identical key.
pub fn from_seed(seed: &[u8]) -> ExtendedPrivateKey {
    let mut kl = [0u8; 32];
    let mut kr = [0u8; 32];
    let k = Sha512::digest(seed);
    kl.copy_from_slice(&k[..32]);
    kr.copy_from_slice(&k[32..]);
    while kl[31] & 0b0010_0000 != 0 {
        let k = hmac_sha512(&kl, &[&kr]);
        kl.copy_from_slice(&k[..32]);
        kr.copy_from_slice(&k[32..]);
    }
    kl[0] &= 0b1111_1000;
    kl[31] &= 0b0111_1111;
    kl[31] |= 0b0100_0000;

    let mut chain_code = [0u8; 32];
    let digest = Sha256::new().chain([0x01u8]).chain(seed).finalize();
    chain_code.copy_from_slice(&digest);

    ExtendedPrivateKey::new(kl, kr, chain_code)
}

fn child_private_at_depth(
    parent: &ExtendedPrivateKey,
    index: u32,
    derivation_type: DerivationType,
    depth: usize,
) -> Result<ExtendedPrivateKey> {
    let idx = index.to_le_bytes();
    let (z, chain_code) = if index < HARDENED_OFFSET {
        let public_key = parent.public_key();
        (
            hmac_sha512(parent.chain_code(), &[&[0x02], &public_key, &idx]),
            hmac_sha512(parent.chain_code(), &[&[0x03], &public_key, &idx]),
        )
    } else {
        (
            hmac_sha512(parent.chain_code(), &[&[0x00], parent.kl(), parent.kr(), &idx]),
            hmac_sha512(parent.chain_code(), &[&[0x01], parent.kl(), parent.kr(), &idx]),
        )
    };

    let mut zl = [0u8; 32];
    let mut zr = [0u8; 32];
    zl.copy_from_slice(&z[..32]);
    zr.copy_from_slice(&z[32..]);
    let zl = truncate_high_bits(&zl, derivation_type.g());

    // kl' = kl + 8·zl, aborting instead of wrapping once the scalar
    // leaves the safe range below 2^255.
    let kl = add_scaled_by_8(parent.kl(), &zl)
        .ok_or(Error::ScalarOverflow { index, depth })?;
    // kr' = (kr + zr) mod 2^256, plain wrapping addition.
    let kr = add_wrapping(parent.kr(), &zr);

    let mut child_chain = [0u8; 32];
    child_chain.copy_from_slice(&chain_code[32..]);
    Ok(ExtendedPrivateKey::new(kl, kr, child_chain))
}

/// Derive one child of a private node. Works for both soft and hardened
/// indices; fails with [`Error::ScalarOverflow`] if the child scalar
/// would reach 2^255.
pub fn derive_child_private(
    parent: &ExtendedPrivateKey,
    index: u32,
    derivation_type: DerivationType,
) -> Result<ExtendedPrivateKey> {
    child_private_at_depth(parent, index, derivation_type, 0)
}

/// Derive one child of a public node, without any private material.
///
/// Valid only for soft indices: hardened derivation messages contain
/// `kl ‖ kr`, which a public node does not hold, so `index >= 2^31` is
/// rejected. (The hardening boundary is `>=` everywhere in this crate.)
pub fn derive_child_public(
    parent: &ExtendedPublicKey,
    index: u32,
    derivation_type: DerivationType,
) -> Result<ExtendedPublicKey> {
    if index >= HARDENED_OFFSET {
        return Err(Error::HardenedPublicDerivation { index });
    }
    let public_key = parent.public_key();
    let parent_point = edwards_from_bytes(&public_key).ok_or(Error::InvalidPublicKey)?;
    let idx = index.to_le_bytes();
    let z = hmac_sha512(parent.chain_code(), &[&[0x02], &public_key, &idx]);
    let chain_code = hmac_sha512(parent.chain_code(), &[&[0x03], &public_key, &idx]);

    let mut zl = [0u8; 32];
    zl.copy_from_slice(&z[..32]);
    let zl = truncate_high_bits(&zl, derivation_type.g());

    // The same adjustment as the private side, applied in the exponent:
    // pk' = pk + (8·zl)·B mirrors kl' = kl + 8·zl.
    let child_point =
        parent_point + &Scalar::from_bits(shl3(&zl)) * &constants::ED25519_BASEPOINT_TABLE;

    let mut child_chain = [0u8; 32];
    child_chain.copy_from_slice(&chain_code[32..]);
    Ok(ExtendedPublicKey::new(child_point.compress().0, child_chain))
}

/// Fold private child derivation over a whole path. An empty path
/// returns the root itself.
pub fn derive_key(
    root: &ExtendedPrivateKey,
    path: &[u32],
    derivation_type: DerivationType,
) -> Result<ExtendedPrivateKey> {
    let mut node = root.clone();
    for (depth, &index) in path.iter().enumerate() {
        node = child_private_at_depth(&node, index, derivation_type, depth)?;
    }
    Ok(node)
}

/// Like [`derive_key`], but converts the final node into its public
/// form. Note this still derives privately along the whole path (the
/// path contains hardened segments); it is not public-only derivation.
pub fn derive_key_public(
    root: &ExtendedPrivateKey,
    path: &[u32],
    derivation_type: DerivationType,
) -> Result<ExtendedPublicKey> {
    derive_key(root, path, derivation_type).map(|node| node.extended_public())
}

/// Derive the 32-byte public key for `(context, account, key_index)`.
pub fn key_gen(
    root: &ExtendedPrivateKey,
    context: KeyContext,
    account: u32,
    key_index: u32,
    derivation_type: DerivationType,
) -> Result<[u8; 32]> {
    derive_key_public(root, &context.path_for(account, key_index), derivation_type)
        .map(|ext_pub| ext_pub.public_key())
}
