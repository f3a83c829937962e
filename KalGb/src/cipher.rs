//! Boundary for the byte-substitution cipher applied to encrypted sub-blocks.
//!
//! The substitution tables themselves ship with the game client and are not
//! part of this crate. Callers that have them plug them in through
//! [`NameCipher`], either with their own implementation or by loading the
//! tables into a [`SubstitutionCipher`].

/// Key used for the scene name block in version 12 files.
pub const NAME_BLOCK_KEY: u8 = 4;

/// Highest key the cipher defines.
pub const MAX_KEY: u8 = 99;

/// Decrypts an encrypted sub-block.
pub trait NameCipher {
    /// Decrypt `data` with the table selected by `key`.
    ///
    /// Returns `None` when `key` is outside `0..=MAX_KEY` or no table is
    /// available for it.
    fn decrypt(&self, key: u8, data: &[u8]) -> Option<Vec<u8>>;
}

/// Table-driven substitution cipher: one 256-entry decode table per key.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionCipher {
    tables: Vec<[u8; 256]>,
}

impl SubstitutionCipher {
    /// Build a cipher from decode tables indexed by key. Tables beyond
    /// `MAX_KEY` are ignored.
    #[must_use]
    pub fn new(mut tables: Vec<[u8; 256]>) -> Self {
        tables.truncate(usize::from(MAX_KEY) + 1);
        Self { tables }
    }
}

impl NameCipher for SubstitutionCipher {
    fn decrypt(&self, key: u8, data: &[u8]) -> Option<Vec<u8>> {
        if key > MAX_KEY {
            return None;
        }
        let table = self.tables.get(usize::from(key))?;
        Some(data.iter().map(|&b| table[usize::from(b)]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotate_table(by: u8) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = (i as u8).wrapping_sub(by);
        }
        table
    }

    #[test]
    fn test_substitution_uses_keyed_table() {
        let cipher = SubstitutionCipher::new((0..5).map(rotate_table).collect());
        assert_eq!(cipher.decrypt(4, b"efg").as_deref(), Some(&b"abc"[..]));
        assert_eq!(cipher.decrypt(0, b"abc").as_deref(), Some(&b"abc"[..]));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let cipher = SubstitutionCipher::new(vec![rotate_table(0); 120]);
        assert!(cipher.decrypt(MAX_KEY, b"x").is_some());
        assert!(cipher.decrypt(MAX_KEY + 1, b"x").is_none());
        assert!(SubstitutionCipher::default().decrypt(4, b"x").is_none());
    }
}
