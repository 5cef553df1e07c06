//! Reserved protocol tag prefixes.
//!
//! The chain's wire format prepends a short ASCII hash-domain tag to
//! every object before it is hashed or signed ("TX" for transactions,
//! "BH" for block headers, and so on). A signature produced by
//! arbitrary-data signing over bytes carrying one of these prefixes
//! would simultaneously be a valid protocol-level signature, so
//! [`crate::sign::sign_data`] refuses such messages outright.
//!
//! The table must stay bit-identical to the published list; it is kept
//! flat with a linear prefix scan, which is plenty for 39 short entries.

/// Hash-domain tags of the target chain's signable objects.
pub const RESERVED_TAGS: [&str; 39] = [
    "appID",
    "arv",
    "AS",
    "B256",
    "BH",
    "BR",
    "CR",
    "GE",
    "KP",
    "MA",
    "MB",
    "MX",
    "NIC",
    "NIR",
    "NIV",
    "NPR",
    "OT1",
    "OT2",
    "PF",
    "PL",
    "Program",
    "ProgData",
    "PS",
    "PK",
    "SD",
    "SpecialAddr",
    "STIB",
    "spc",
    "spm",
    "spp",
    "sps",
    "spv",
    "TE",
    "TG",
    "TL",
    "TX",
    "TXL",
    "VO",
    "VbrPk",
];

/// Returns the reserved tag the message starts with, if any. The match
/// is case-sensitive and byte-exact.
pub(crate) fn reserved_prefix(message: &[u8]) -> Option<&'static str> {
    RESERVED_TAGS
        .iter()
        .find(|tag| message.starts_with(tag.as_bytes()))
        .copied()
}
