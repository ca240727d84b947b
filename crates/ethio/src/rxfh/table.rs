//! RSS indirection table.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Size in bytes of one indirection table entry on the wire.
pub const ENTRY_SIZE: usize = std::mem::size_of::<u32>();

/// Wire size of a table with `n` entries.
pub const fn table_byte_size(n: u32) -> usize {
    n as usize * ENTRY_SIZE
}

/// RSS indirection table: hash bucket → RX ring index.
///
/// Always an owned copy; it never aliases an ioctl buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct IndirectTable(Vec<u32>);

impl IndirectTable {
    /// A table of `n` zeroed entries.
    pub fn new(n: usize) -> Self {
        Self(vec![0; n])
    }

    /// Copy a table out of native-endian wire bytes.
    ///
    /// Trailing bytes that do not make a whole entry are ignored.
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self(
            raw.chunks_exact(ENTRY_SIZE)
                .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    /// Wire size of this table in bytes.
    pub fn byte_size(&self) -> usize {
        self.0.len() * ENTRY_SIZE
    }

    /// Native-endian wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|n| n.to_ne_bytes()).collect()
    }

    /// Consume the table, returning its entries.
    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

impl From<Vec<u32>> for IndirectTable {
    fn from(entries: Vec<u32>) -> Self {
        Self(entries)
    }
}

impl From<&[u32]> for IndirectTable {
    fn from(entries: &[u32]) -> Self {
        Self(entries.to_vec())
    }
}

impl Deref for IndirectTable {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.0
    }
}

impl DerefMut for IndirectTable {
    fn deref_mut(&mut self) -> &mut [u32] {
        &mut self.0
    }
}

/// Eight entries per line, each line prefixed with its first index.
impl fmt::Display for IndirectTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.0.len().saturating_sub(1);
        for (i, n) in self.0.iter().enumerate() {
            if i % 8 == 0 {
                write!(f, "{:5}: ", i)?;
            }
            write!(f, " {:5}", n)?;
            if i % 8 == 7 || i == last {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_size() {
        let table = IndirectTable::new(128);
        assert_eq!(table.len(), 128);
        assert_eq!(table.byte_size(), 512);
        assert_eq!(table_byte_size(128), 512);
        assert!(table.iter().all(|&n| n == 0));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let table = IndirectTable::from(vec![0, 1, 2, 3, 0xffff_ffff]);
        let raw = table.to_bytes();
        assert_eq!(raw.len(), table.byte_size());
        assert_eq!(IndirectTable::from_bytes(&raw), table);
    }

    #[test]
    fn test_from_bytes_ignores_partial_entry() {
        let mut raw = 7u32.to_ne_bytes().to_vec();
        raw.push(0xaa);
        assert_eq!(&*IndirectTable::from_bytes(&raw), &[7]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut table = IndirectTable::from(vec![1, 2]);
        let copy = table.clone();
        table[0] = 9;
        assert_eq!(&*copy, &[1, 2]);
    }

    #[test]
    fn test_display() {
        let table = IndirectTable::from((0..10).map(|i| i % 4).collect::<Vec<_>>());
        let expected = concat!(
            "    0:      0     1     2     3     0     1     2     3\n",
            "    8:      0     1\n",
        );
        assert_eq!(table.to_string(), expected);
        assert_eq!(IndirectTable::new(0).to_string(), "");
    }
}
