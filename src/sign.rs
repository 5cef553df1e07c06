//! Deterministic EdDSA signing over derived keys, plus detached
//! verification.
//!
//! Three signing entry points with different gating:
//!
//! - [`raw_sign`] signs whatever bytes it is given for an explicit path.
//! - [`sign_data`] is the arbitrary-data path: it refuses messages that
//!   carry a reserved protocol tag prefix, decodes the payload per its
//!   declared encoding and validates it against a caller-supplied JSON
//!   Schema before signing. The signature always covers the original
//!   wire bytes; the schema only gates *what may be signed*.
//! - [`sign_transaction`] skips the tag filter, for payloads that
//!   legitimately are protocol-tagged transactions.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use curve25519_dalek::constants;
use curve25519_dalek::scalar::Scalar;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::common::{edwards_from_bytes, scalar_from_bytes};
use crate::context::KeyContext;
use crate::derive::{derive_key, DerivationType};
use crate::error::{Error, Result};
use crate::extended_key::ExtendedPrivateKey;
use crate::tags::reserved_prefix;

/// How a [`sign_data`] payload is decoded before schema validation.
/// This describes the payload, not the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Raw JSON bytes.
    None,
    /// Standard base64 wrapping JSON bytes.
    Base64,
    /// A msgpack document.
    Msgpack,
}

/// Decoding and shape constraints a [`sign_data`] payload must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignMetadata {
    pub encoding: Encoding,
    /// A JSON Schema document the decoded payload must conform to.
    pub schema: serde_json::Value,
}

/// Sign `message` with the key at `path`, RFC 8032 §5.1.6 style.
///
/// The nonce is derived deterministically from the extended key's `kr`
/// half rather than an Ed25519 prefix recomputed from a seed, which is
/// what makes signing work for derived keys that never had a seed of
/// their own.
pub fn raw_sign(
    root: &ExtendedPrivateKey,
    path: &[u32],
    message: &[u8],
    derivation_type: DerivationType,
) -> Result<[u8; 64]> {
    let node = derive_key(root, path, derivation_type)?;
    Ok(sign_with_node(&node, message))
}

fn sign_with_node(node: &ExtendedPrivateKey, message: &[u8]) -> [u8; 64] {
    let a = Scalar::from_bytes_mod_order(*node.kl());
    let public_key = (&a * &constants::ED25519_BASEPOINT_TABLE).compress();

    // r = SHA512(kr ‖ M) mod L, R = r·B
    let r = Scalar::from_hash(Sha512::new().chain(node.kr()).chain(message));
    let big_r = (&r * &constants::ED25519_BASEPOINT_TABLE).compress();

    // h = SHA512(R ‖ A ‖ M) mod L, S = r + h·a mod L
    let h = Scalar::from_hash(
        Sha512::new()
            .chain(big_r.as_bytes())
            .chain(public_key.as_bytes())
            .chain(message),
    );
    let s = r + h * a;

    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(big_r.as_bytes());
    signature[32..].copy_from_slice(&s.to_bytes());
    signature
}

/// Sign arbitrary data for `(context, account, key_index)`.
///
/// Fails without signing if the message starts with a reserved protocol
/// tag, if the payload cannot be decoded per `metadata.encoding`, or if
/// the decoded payload does not conform to `metadata.schema`. On
/// success the signature covers the original, undecoded bytes.
pub fn sign_data(
    root: &ExtendedPrivateKey,
    context: KeyContext,
    account: u32,
    key_index: u32,
    message: &[u8],
    metadata: &SignMetadata,
    derivation_type: DerivationType,
) -> Result<[u8; 64]> {
    // The anti-replay gate comes first: a tagged message must never
    // reach the schema check, let alone the signer.
    if let Some(tag) = reserved_prefix(message) {
        return Err(Error::ReservedTag { tag });
    }

    let decoded = decode_payload(message, metadata.encoding)?;
    let schema = JSONSchema::compile(&metadata.schema)
        .map_err(|e| Error::SchemaValidation(format!("invalid schema: {e}")))?;
    if let Err(errors) = schema.validate(&decoded) {
        let detail = errors
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::SchemaValidation(detail));
    }

    raw_sign(
        root,
        &context.path_for(account, key_index),
        message,
        derivation_type,
    )
}

fn decode_payload(message: &[u8], encoding: Encoding) -> Result<serde_json::Value> {
    match encoding {
        Encoding::None => {
            serde_json::from_slice(message).map_err(|e| Error::Decoding(e.to_string()))
        }
        Encoding::Base64 => {
            let raw = BASE64
                .decode(message)
                .map_err(|e| Error::Decoding(e.to_string()))?;
            serde_json::from_slice(&raw).map_err(|e| Error::Decoding(e.to_string()))
        }
        Encoding::Msgpack => {
            rmp_serde::from_slice(message).map_err(|e| Error::Decoding(e.to_string()))
        }
    }
}

/// Sign an already prefix-encoded transaction.
///
/// No tag filtering happens here: by calling this the caller asserts
/// the payload legitimately is a protocol-tagged transaction.
pub fn sign_transaction(
    root: &ExtendedPrivateKey,
    context: KeyContext,
    account: u32,
    key_index: u32,
    prefix_encoded_tx: &[u8],
    derivation_type: DerivationType,
) -> Result<[u8; 64]> {
    raw_sign(
        root,
        &context.path_for(account, key_index),
        prefix_encoded_tx,
        derivation_type,
    )
}

/// Verify a detached Ed25519 signature. Pure function, no derivation
/// involved; malformed points or an unreduced `S` verify as `false`.
pub fn verify(signature: &[u8; 64], message: &[u8], public_key: &[u8; 32]) -> bool {
    let a = match edwards_from_bytes(public_key) {
        Some(point) => point,
        None => return false,
    };
    let big_r = match edwards_from_bytes(&signature[..32]) {
        Some(point) => point,
        None => return false,
    };
    let s = match scalar_from_bytes(&signature[32..]) {
        Some(scalar) => scalar,
        None => return false,
    };

    let h = Scalar::from_hash(
        Sha512::new()
            .chain(&signature[..32])
            .chain(public_key)
            .chain(message),
    );
    &s * &constants::ED25519_BASEPOINT_TABLE == big_r + h * a
}
