//! Variable-length ioctl command buffers.
//!
//! Several ethtool commands carry a fixed header followed by trailing
//! arrays whose lengths come from an earlier size probe. [`CommandBuffer`]
//! owns one zeroed, 8-byte-aligned allocation and hands out views into it.
//! Every view is bounds-checked against the allocation before any access.

use std::marker::PhantomData;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Error, Result};

/// A zero-initialised header + trailing-data buffer.
#[derive(Debug, Clone)]
pub struct CommandBuffer<H> {
    storage: Vec<u64>,
    len: usize,
    _header: PhantomData<H>,
}

impl<H> CommandBuffer<H>
where
    H: FromBytes + IntoBytes + KnownLayout + Immutable,
{
    /// Size of the fixed header.
    pub const HEADER_LEN: usize = std::mem::size_of::<H>();

    /// Allocate a buffer holding `header` followed by `trailing` zero bytes.
    pub fn new(header: &H, trailing: usize) -> Result<Self> {
        let len = Self::HEADER_LEN
            .checked_add(trailing)
            .ok_or(Error::OutOfRange {
                what: "command buffer",
                needed: usize::MAX,
                available: isize::MAX as usize,
            })?;

        let mut buf = Self {
            storage: vec![0u64; len.div_ceil(8)],
            len,
            _header: PhantomData,
        };
        buf.set_header(header)?;
        Ok(buf)
    }

    /// Total size in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer has no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the trailing region.
    pub fn trailing_len(&self) -> usize {
        self.len - Self::HEADER_LEN
    }

    /// The whole buffer, as handed to the transport.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.as_bytes()[..self.len]
    }

    /// The whole buffer, mutable.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        let len = self.len;
        &mut self.storage.as_mut_bytes()[..len]
    }

    /// Copy the header out.
    pub fn header(&self) -> Result<H> {
        H::read_from_prefix(self.as_bytes())
            .map(|(header, _)| header)
            .map_err(|_| self.out_of_range("header", 0, Self::HEADER_LEN))
    }

    /// Overwrite the header.
    pub fn set_header(&mut self, header: &H) -> Result<()> {
        let available = self.len;
        header
            .write_to_prefix(self.as_mut_bytes())
            .map_err(|_| Error::OutOfRange {
                what: "header",
                needed: Self::HEADER_LEN,
                available,
            })
    }

    /// Bytes `[offset, offset + len)` of the trailing region.
    pub fn trailing(&self, what: &'static str, offset: usize, len: usize) -> Result<&[u8]> {
        let (start, end) = self.bounds(what, offset, len)?;
        Ok(&self.as_bytes()[start..end])
    }

    /// Mutable bytes `[offset, offset + len)` of the trailing region.
    pub fn trailing_mut(
        &mut self,
        what: &'static str,
        offset: usize,
        len: usize,
    ) -> Result<&mut [u8]> {
        let (start, end) = self.bounds(what, offset, len)?;
        Ok(&mut self.as_mut_bytes()[start..end])
    }

    /// A mutable `u32` view over `count` entries at `offset` in the trailing region.
    ///
    /// The view borrows the buffer; callers copy out before the buffer is dropped.
    pub fn u32s_mut(
        &mut self,
        what: &'static str,
        offset: usize,
        count: usize,
    ) -> Result<&mut [u32]> {
        let len = self.array_len(what, offset, count, 4)?;
        let available = self.len;
        let bytes = self.trailing_mut(what, offset, len)?;
        <[u32]>::mut_from_bytes(bytes).map_err(|_| Error::OutOfRange {
            what,
            needed: len,
            available,
        })
    }

    /// Copy `count` native-endian `u32`s at `offset` in the trailing region.
    pub fn read_u32s(&self, what: &'static str, offset: usize, count: usize) -> Result<Vec<u32>> {
        let len = self.array_len(what, offset, count, 4)?;
        let bytes = self.trailing(what, offset, len)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Copy `count` native-endian `u64`s at `offset` in the trailing region.
    pub fn read_u64s(&self, what: &'static str, offset: usize, count: usize) -> Result<Vec<u64>> {
        let len = self.array_len(what, offset, count, 8)?;
        let bytes = self.trailing(what, offset, len)?;
        Ok(bytes
            .chunks_exact(8)
            .map(|c| u64::from_ne_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect())
    }

    fn array_len(&self, what: &'static str, offset: usize, count: usize, size: usize) -> Result<usize> {
        count
            .checked_mul(size)
            .ok_or_else(|| self.out_of_range(what, offset, usize::MAX))
    }

    /// Absolute `[start, end)` for a trailing-region range, or `OutOfRange`.
    fn bounds(&self, what: &'static str, offset: usize, len: usize) -> Result<(usize, usize)> {
        let start = Self::HEADER_LEN
            .checked_add(offset)
            .ok_or_else(|| self.out_of_range(what, offset, len))?;
        let end = start
            .checked_add(len)
            .ok_or_else(|| self.out_of_range(what, offset, len))?;
        if end > self.len {
            return Err(Error::OutOfRange {
                what,
                needed: end,
                available: self.len,
            });
        }
        Ok((start, end))
    }

    fn out_of_range(&self, what: &'static str, offset: usize, len: usize) -> Error {
        Error::OutOfRange {
            what,
            needed: Self::HEADER_LEN.saturating_add(offset).saturating_add(len),
            available: self.len,
        }
    }
}
