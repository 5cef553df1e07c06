//! Error kinds surfaced by derivation and signing.
//!
//! Every failure is local and synchronous; the engine never retries
//! internally and never returns partial output. Errors carry enough
//! detail to log the failing operation but no private key material.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The derived scalar reached 2^255. Ed25519 scalar arithmetic is
    /// unsafe above this bound, so the derivation is aborted instead of
    /// wrapping. The index is unusable; callers may pick another one.
    #[error("derived scalar overflowed 2^255 at index {index} (path depth {depth})")]
    ScalarOverflow { index: u32, depth: usize },

    /// A hardened index was passed to public-only derivation, which has
    /// no access to the private scalar.
    #[error("hardened index {index} cannot be derived from public material")]
    HardenedPublicDerivation { index: u32 },

    /// The message begins with a reserved protocol tag and signing it
    /// could double as a valid transaction or block signature.
    #[error("message starts with reserved protocol tag {tag:?}, refusing to sign")]
    ReservedTag { tag: &'static str },

    /// The decoded payload does not conform to the supplied JSON Schema.
    #[error("payload failed schema validation: {0}")]
    SchemaValidation(String),

    /// The payload could not be decoded per the declared encoding.
    #[error("payload decoding failed: {0}")]
    Decoding(String),

    /// The counterparty public key is not a valid torsion-free Edwards
    /// point.
    #[error("invalid public key")]
    InvalidPublicKey,
}
