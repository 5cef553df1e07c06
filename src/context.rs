//! Logical key contexts and their BIP44 paths.
//!
//! The key tree is partitioned by purpose: payment-address keys and
//! identity keys live under different coin-type constants, so the two
//! subtrees can never collide no matter which accounts or indices are
//! used.

use crate::derive::HARDENED_OFFSET;

/// Which subtree of the key hierarchy a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// Payment address keys, coin type 283.
    Address,
    /// Identity keys, coin type 0.
    Identity,
}

impl KeyContext {
    /// The fixed BIP44 coin-type constant of the context, unhardened.
    pub fn coin_type(self) -> u32 {
        match self {
            KeyContext::Address => 283,
            KeyContext::Identity => 0,
        }
    }

    /// The five-level BIP44 path `m/44'/coin'/account'/0/key_index`.
    ///
    /// Purpose, coin type and account are hardened; change is fixed to
    /// soft 0 and the key index is passed through unhardened (callers
    /// may still pass an index above 2^31 to harden it themselves).
    pub fn path_for(self, account: u32, key_index: u32) -> [u32; 5] {
        [
            harden(44),
            harden(self.coin_type()),
            harden(account),
            0,
            key_index,
        ]
    }
}

/// Map an index into the hardened range.
pub fn harden(index: u32) -> u32 {
    index + HARDENED_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_harden_the_first_three_levels() {
        let path = KeyContext::Address.path_for(2, 9);
        assert_eq!(path, [0x8000_002c, 0x8000_011b, 0x8000_0002, 0, 9]);
        for level in &path[..3] {
            assert!(level >= &HARDENED_OFFSET);
        }
        for level in &path[3..] {
            assert!(level < &HARDENED_OFFSET);
        }
    }

    #[test]
    fn contexts_use_disjoint_coin_types() {
        assert_ne!(
            KeyContext::Address.coin_type(),
            KeyContext::Identity.coin_type()
        );
        assert_ne!(
            KeyContext::Address.path_for(0, 0),
            KeyContext::Identity.path_for(0, 0)
        );
    }
}
