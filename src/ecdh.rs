//! Diffie-Hellman shared secrets between derived keys.
//!
//! Both sides' Ed25519 keys are mapped to their Curve25519 form, the
//! shared point is computed with an X25519 scalar multiplication, and
//! the result is hashed together with both public keys:
//!
//! `BLAKE2b-256(shared ‖ A ‖ B)` with `(A, B)` ordered by `me_first`.
//!
//! The ordering is part of the contract: both parties must agree
//! out-of-band on who concatenates first, and flipping both flags
//! yields a different (still mutually equal) secret. This is raw keyed
//! material, deliberately not a symmetric KDF.

use blake2::digest::{Update, VariableOutput};
use blake2::VarBlake2b;
use curve25519_dalek::constants;

use crate::common::edwards_from_bytes;
use crate::context::KeyContext;
use crate::derive::{derive_key, DerivationType};
use crate::error::{Error, Result};
use crate::extended_key::ExtendedPrivateKey;

/// Derive the 32-byte shared secret between our key at
/// `(context, account, key_index)` and `other_public_key`.
pub fn ecdh(
    root: &ExtendedPrivateKey,
    context: KeyContext,
    account: u32,
    key_index: u32,
    other_public_key: &[u8; 32],
    me_first: bool,
    derivation_type: DerivationType,
) -> Result<[u8; 32]> {
    let node = derive_key(
        root,
        &context.path_for(account, key_index),
        derivation_type,
    )?;
    let their_point = edwards_from_bytes(other_public_key).ok_or(Error::InvalidPublicKey)?;

    let scalar = node.scalar_bits();
    let our_point = &scalar * &constants::ED25519_BASEPOINT_TABLE;

    // Birational map to Curve25519; the derived scalar is already in
    // clamped form, so the ladder below agrees with X25519.
    let our_curve = our_point.to_montgomery();
    let their_curve = their_point.to_montgomery();
    let shared_point = &their_curve * &scalar;

    let mut hasher = VarBlake2b::new(32).expect("32 is a valid Blake2b output length");
    hasher.update(shared_point.as_bytes());
    if me_first {
        hasher.update(our_curve.as_bytes());
        hasher.update(their_curve.as_bytes());
    } else {
        hasher.update(their_curve.as_bytes());
        hasher.update(our_curve.as_bytes());
    }

    let mut secret = [0u8; 32];
    hasher.finalize_variable(|digest| secret.copy_from_slice(digest));
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::tests::test_root;
    use crate::derive::{from_seed, key_gen};

    // Seed of the mnemonic "identify length ranch make silver fog much
    // puzzle borrow relax occur drum blue oval book pledge reunion coral
    // grace lamp recall fever route carbon", empty passphrase.
    const OTHER_SEED_HEX: &str = "6202a70dbfc377144acfff679a78e3a2189b3cb6a62bdb3b29d1bf24182069088c5fdee944c35df736ee4a43a9a2ca78d90f3764039611f3e809da8887feb384";

    fn roots() -> (ExtendedPrivateKey, ExtendedPrivateKey) {
        (test_root(), from_seed(&hex::decode(OTHER_SEED_HEX).unwrap()))
    }

    #[test]
    fn shared_secret_is_symmetric() {
        let (alice, bob) = roots();
        let alice_pub = key_gen(&alice, KeyContext::Address, 0, 0, DerivationType::Peikert).unwrap();
        let bob_pub = key_gen(&bob, KeyContext::Address, 0, 0, DerivationType::Peikert).unwrap();

        let from_alice = ecdh(
            &alice,
            KeyContext::Address,
            0,
            0,
            &bob_pub,
            true,
            DerivationType::Peikert,
        )
        .unwrap();
        let from_bob = ecdh(
            &bob,
            KeyContext::Address,
            0,
            0,
            &alice_pub,
            false,
            DerivationType::Peikert,
        )
        .unwrap();
        assert_eq!(from_alice, from_bob);
        assert_eq!(
            hex::encode(from_alice),
            "3c91a2c6d50b1a74680760fcedf2def74f3503092cfe37e48227cca60244ad2c"
        );
    }

    #[test]
    fn flipping_both_orders_gives_a_different_mutual_secret() {
        let (alice, bob) = roots();
        let alice_pub = key_gen(&alice, KeyContext::Address, 0, 0, DerivationType::Peikert).unwrap();
        let bob_pub = key_gen(&bob, KeyContext::Address, 0, 0, DerivationType::Peikert).unwrap();

        let straight = ecdh(
            &alice,
            KeyContext::Address,
            0,
            0,
            &bob_pub,
            true,
            DerivationType::Peikert,
        )
        .unwrap();
        let flipped_alice = ecdh(
            &alice,
            KeyContext::Address,
            0,
            0,
            &bob_pub,
            false,
            DerivationType::Peikert,
        )
        .unwrap();
        let flipped_bob = ecdh(
            &bob,
            KeyContext::Address,
            0,
            0,
            &alice_pub,
            true,
            DerivationType::Peikert,
        )
        .unwrap();

        // Order dependency is real: same keys, different transcript.
        assert_ne!(straight, flipped_alice);
        assert_eq!(flipped_alice, flipped_bob);
    }

    #[test]
    fn distinct_key_indices_give_distinct_secrets() {
        let (alice, bob) = roots();
        let bob_pub = key_gen(&bob, KeyContext::Address, 0, 0, DerivationType::Peikert).unwrap();
        let s0 = ecdh(
            &alice,
            KeyContext::Address,
            0,
            0,
            &bob_pub,
            true,
            DerivationType::Peikert,
        )
        .unwrap();
        let s1 = ecdh(
            &alice,
            KeyContext::Address,
            0,
            1,
            &bob_pub,
            true,
            DerivationType::Peikert,
        )
        .unwrap();
        assert_ne!(s0, s1);
    }

    #[test]
    fn rejects_invalid_counterparty_key() {
        let (alice, _) = roots();
        assert_eq!(
            ecdh(
                &alice,
                KeyContext::Address,
                0,
                0,
                &[0xff; 32],
                true,
                DerivationType::Peikert,
            )
            .unwrap_err(),
            Error::InvalidPublicKey
        );
    }
}
