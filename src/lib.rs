/*
    Hierarchical-deterministic key derivation and signing over a non-linear
    extension of Ed25519 (BIP32-Ed25519, Khovratovich & Law:
    https://ieeexplore.ieee.org/document/7966967), with the Peikert 9-bit
    truncation variant as the wallet default.

    One seed expands into a 96-byte extended root key; soft and hardened
    children are derived per path segment, public keys and signatures come
    out the other end, and a watch-only holder of an extended public key can
    follow soft edges without any private material. Signing is deterministic
    EdDSA (RFC 8032) driven by the derived nonce half, with an anti-replay
    tag filter and JSON Schema gating in front of arbitrary-data signing.

    Everything here is a pure function over explicit inputs: no caching, no
    hidden state, safe to call concurrently. Private key material zeroizes
    itself on drop.
*/

mod arith;
mod common;
mod context;
mod derive;
mod ecdh;
mod error;
mod extended_key;
mod sign;
mod tags;

pub use context::{harden, KeyContext};
pub use derive::{
    derive_child_private, derive_child_public, derive_key, derive_key_public, from_seed, key_gen,
    DerivationType, HARDENED_OFFSET,
};
pub use ecdh::ecdh;
pub use error::{Error, Result};
pub use extended_key::{ExtendedPrivateKey, ExtendedPublicKey};
pub use sign::{raw_sign, sign_data, sign_transaction, verify, Encoding, SignMetadata};
pub use tags::RESERVED_TAGS;
