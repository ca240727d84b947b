//! Device string sets.
//!
//! Names for statistics, features and RSS hash functions are not fixed;
//! each device reports them as a string set where position = bit index.

use tracing::debug;

use super::abi::{ETH_GSTRING_LEN, EthtoolGstrings, EthtoolSsetInfo, MAX_GSTRINGS};
use super::{Command, Ethtool, StringSetId};
use crate::buffer::CommandBuffer;
use crate::error::{Error, Result};
use crate::socket::Transport;
use crate::util::IfName;
use crate::util::ifname::c_str_to_string;

/// A string set from the device.
///
/// Names are kept in device order; the position of a name is its bit index
/// in the bitmasks that refer to the set. Empty slots are kept so indices
/// stay aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringSet {
    /// Which set this is.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub id: StringSetId,
    /// Strings in the set, indexed by position.
    pub strings: Vec<String>,
}

impl StringSet {
    /// An empty set.
    pub fn empty(id: StringSetId) -> Self {
        Self {
            id,
            strings: Vec::new(),
        }
    }

    /// Decode 32-byte NUL-padded entries.
    pub fn from_raw(id: StringSetId, raw: &[u8]) -> Self {
        let strings = raw.chunks_exact(ETH_GSTRING_LEN).map(c_str_to_string).collect();
        Self { id, strings }
    }

    /// Get a string by index.
    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings
            .get(index as usize)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Bit index of a name.
    pub fn index_of(&self, name: &str) -> Option<u32> {
        if name.is_empty() {
            return None;
        }
        self.strings
            .iter()
            .position(|s| s == name)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// Iterate over non-empty `(index, name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.strings
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, s)| (i as u32, s.as_str()))
    }

    /// Number of slots, including empty ones.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the set has no slots.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl<T: Transport> Ethtool<T> {
    /// Get a string set by ID.
    ///
    /// Sizes the set with `ETHTOOL_GSSET_INFO`. Drivers without it still
    /// report the statistics, self-test and private-flag counts through
    /// driver info, which is used as a fallback for those sets.
    pub fn get_string_set(&self, ifname: &str, id: StringSetId) -> Result<StringSet> {
        let ifname = IfName::new(ifname)?;
        let len = self.string_set_len(&ifname, id)?;
        self.read_strings(&ifname, id, len)
    }

    fn string_set_len(&self, ifname: &IfName, id: StringSetId) -> Result<u32> {
        let header = EthtoolSsetInfo {
            cmd: Command::GSsetInfo.code(),
            sset_mask: 1u64 << (id as u32),
            ..Default::default()
        };
        let mut buf = CommandBuffer::new(&header, 4)?;

        match self.issue(ifname, "get string set size", buf.as_mut_bytes()) {
            Ok(()) => {
                if buf.header()?.sset_mask == 0 {
                    return Ok(0);
                }
                Ok(buf.read_u32s("string set size", 0, 1)?[0])
            }
            Err(e) if e.is_not_supported() => {
                let info = self.drvinfo(ifname)?;
                match id.drvinfo_len(&info) {
                    Some(len) => {
                        debug!(%ifname, ?id, len, "string set size from driver info");
                        Ok(len)
                    }
                    None => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch `len` strings of set `id`.
    pub(crate) fn read_strings(&self, ifname: &IfName, id: StringSetId, len: u32) -> Result<StringSet> {
        if len == 0 {
            return Ok(StringSet::empty(id));
        }
        if len > MAX_GSTRINGS {
            return Err(Error::TooManyStrings {
                count: len,
                max: MAX_GSTRINGS,
            });
        }

        let header = EthtoolGstrings {
            cmd: Command::GStrings.code(),
            string_set: id as u32,
            len,
        };
        let size = len as usize * ETH_GSTRING_LEN;
        let mut buf = CommandBuffer::new(&header, size)?;
        self.issue(ifname, "get strings", buf.as_mut_bytes())?;

        let returned = buf.header()?.len.min(len) as usize;
        let raw = buf.trailing("strings", 0, returned * ETH_GSTRING_LEN)?;
        Ok(StringSet::from_raw(id, raw))
    }
}
