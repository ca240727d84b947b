//! RX flow hash (RSS) configuration.
//!
//! Reads and writes a device's RSS indirection table, hash key and hash
//! function through `ETHTOOL_GRSSH`/`ETHTOOL_SRSSH`, falling back to the
//! table-only `ETHTOOL_GRXFHINDIR`/`ETHTOOL_SRXFHINDIR` commands on drivers
//! that lack them.
//!
//! # Example
//!
//! ```rust,no_run
//! use ethio::{Ethtool, RssContext};
//!
//! # fn example() -> ethio::Result<()> {
//! let ethtool = Ethtool::new()?;
//!
//! let hash = ethtool.get_flow_hash("eth0", RssContext::NONE)?;
//! if let Some(table) = &hash.table {
//!     print!("{table}");
//! }
//!
//! // Spread flows over rings 0..4, weighting ring 0 twice as heavily.
//! ethtool.set_flow_hash("eth0", |c| c.weighted(0, [2u32, 1, 1, 1]))?;
//!
//! // New context on rings 4..8 with the Toeplitz hash.
//! let ctx = ethtool.set_flow_hash("eth0", |c| {
//!     c.new_context().equal(4, 4).hash_func("toeplitz")
//! })?;
//! println!("created context {ctx}");
//! # Ok(())
//! # }
//! ```

mod context;
mod fill;
mod protocol;
mod table;

use std::collections::BTreeMap;

pub use context::{RXFH_INDIR_NO_CHANGE, RssContext};
pub use fill::{FillAction, FillError};
pub use table::{ENTRY_SIZE, IndirectTable, table_byte_size};

use crate::error::{Error, Result};

/// RX flow hash configuration read from a device.
///
/// Every field other than `ring_count` is optional: `None` means the device
/// or path did not report it, which is distinct from an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlowHash {
    /// Number of RX rings.
    pub ring_count: u64,
    /// RSS hash key.
    pub key: Option<Vec<u8>>,
    /// Hash function name → enabled.
    pub funcs: Option<BTreeMap<String, bool>>,
    /// Indirection table.
    pub table: Option<IndirectTable>,
}

impl FlowHash {
    /// Name of the enabled hash function, if exactly one is reported.
    pub fn active_func(&self) -> Option<&str> {
        let mut active = self.funcs.as_ref()?.iter().filter(|(_, on)| **on);
        match (active.next(), active.next()) {
            (Some((name, _)), None) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Hash key as colon-separated hex bytes.
    pub fn key_hex(&self) -> Option<String> {
        self.key.as_ref().map(|key| {
            key.iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(":")
        })
    }
}

/// Builder for an RX flow hash change.
#[derive(Debug, Clone, Default)]
pub struct FlowHashBuilder {
    pub(crate) action: Option<FillAction>,
    pub(crate) key: Option<Vec<u8>>,
    pub(crate) hash_func: Option<String>,
    pub(crate) context: RssContext,
}

impl FlowHashBuilder {
    /// Create a new builder targeting the default context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table fill policy.
    pub fn action(mut self, action: FillAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Spread flows evenly over `n` rings starting at `start`.
    pub fn equal(self, start: u32, n: u32) -> Self {
        self.action(FillAction::Equal { start, n })
    }

    /// Spread flows by weight, one weight per ring starting at `start`.
    pub fn weighted(self, start: u32, weights: impl Into<Vec<u32>>) -> Self {
        self.action(FillAction::Weighted {
            start,
            weights: weights.into(),
        })
    }

    /// Reset the table to the driver default.
    pub fn default_table(self) -> Self {
        self.action(FillAction::Default)
    }

    /// Delete `context`.
    pub fn delete(mut self, context: RssContext) -> Self {
        self.context = context;
        self.action(FillAction::Delete)
    }

    /// Set the RSS hash key. Its length must equal the device key size.
    pub fn key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Select the RSS hash function by name.
    pub fn hash_func(mut self, name: impl Into<String>) -> Self {
        self.hash_func = Some(name.into());
        self
    }

    /// Target an existing context.
    pub fn context(mut self, context: RssContext) -> Self {
        self.context = context;
        self
    }

    /// Allocate a new context.
    pub fn new_context(self) -> Self {
        self.context(RssContext::ALLOC)
    }

    /// Whether only the indirection table changes.
    pub(crate) fn is_table_only(&self) -> bool {
        self.key.is_none()
            && self.hash_func.is_none()
            && self
                .action
                .as_ref()
                .is_some_and(|a| !matches!(a, FillAction::Delete))
    }

    /// Reject requests that cannot be sent, before any ioctl.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.action.is_none() && self.key.is_none() && self.hash_func.is_none() {
            return Err(Error::InvalidRequest(
                "no table, key or hash function change requested".to_string(),
            ));
        }

        if let Some(key) = &self.key
            && key.is_empty()
        {
            return Err(Error::InvalidRequest("hash key is empty".to_string()));
        }

        if let Some(FillAction::Delete) = &self.action {
            if self.context.is_default() || self.context.is_new() {
                return Err(Error::InvalidRequest(format!(
                    "cannot delete RSS context {}",
                    self.context
                )));
            }
            if self.key.is_some() || self.hash_func.is_some() {
                return Err(Error::InvalidRequest(
                    "deleting a context cannot also change key or hash function".to_string(),
                ));
            }
        }

        // A zero indir_size on any other context means delete.
        if let Some(FillAction::Default) = &self.action
            && !self.context.is_default()
        {
            return Err(Error::InvalidRequest(format!(
                "cannot reset the table of RSS context {}",
                self.context
            )));
        }

        if let Some(action) = &self.action {
            action.validate()?;
        }
        Ok(())
    }
}
