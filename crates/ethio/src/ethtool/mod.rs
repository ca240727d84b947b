//! Ethtool configuration via the `SIOCETHTOOL` ioctl.
//!
//! This module provides the [`Ethtool`] handle and the query/configure
//! operations that sit around the RX flow hash core: driver information,
//! statistics, features, channels, coalescing, link settings, permanent
//! address and module EEPROM access.
//!
//! # Example
//!
//! ```rust,no_run
//! use ethio::Ethtool;
//!
//! # fn example() -> ethio::Result<()> {
//! let ethtool = Ethtool::new()?;
//!
//! let info = ethtool.get_driver_info("eth0")?;
//! println!("driver: {} ({})", info.driver, info.bus_info);
//!
//! for (name, value) in ethtool.get_stats("eth0")? {
//!     println!("{name}: {value}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Setting Configuration
//!
//! ```rust,no_run
//! use ethio::Ethtool;
//!
//! # fn example() -> ethio::Result<()> {
//! let ethtool = Ethtool::new()?;
//!
//! ethtool.set_channels("eth0", |c| c.combined(8))?;
//! ethtool.set_features("eth0", |f| f.enable("rx-gro").disable("tx-tcp-segmentation"))?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
mod connection;
mod strset;
mod types;

pub use strset::StringSet;
pub use types::*;

use crate::error::{Error, Result};
use crate::socket::{EthtoolSocket, Transport};
use crate::util::IfName;

// =============================================================================
// Commands
// =============================================================================

/// Ethtool ioctl command codes (linux/ethtool.h).
///
/// Commands starting with `G` retrieve information, `S` modify parameters.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Get legacy link settings (`ethtool_cmd`).
    GSet = 0x01,
    /// Get driver information.
    GDrvinfo = 0x03,
    /// Get driver message level.
    GMsglvl = 0x07,
    /// Set driver message level.
    SMsglvl = 0x08,
    /// Get link status.
    GLink = 0x0a,
    /// Get interrupt coalescing parameters.
    GCoalesce = 0x0e,
    /// Set interrupt coalescing parameters.
    SCoalesce = 0x0f,
    /// Get a string set.
    GStrings = 0x1b,
    /// Get NIC statistics.
    GStats = 0x1d,
    /// Get permanent hardware address.
    GPermAddr = 0x20,
    /// Get number of RX rings.
    GRxRings = 0x2d,
    /// Get string set sizes.
    GSsetInfo = 0x37,
    /// Get RX flow hash indirection table (legacy).
    GRxfhIndir = 0x38,
    /// Set RX flow hash indirection table (legacy).
    SRxfhIndir = 0x39,
    /// Get device offload settings.
    GFeatures = 0x3a,
    /// Change device offload settings.
    SFeatures = 0x3b,
    /// Get channel counts.
    GChannels = 0x3c,
    /// Set channel counts.
    SChannels = 0x3d,
    /// Get plug-in module information.
    GModuleInfo = 0x42,
    /// Get plug-in module EEPROM.
    GModuleEeprom = 0x43,
    /// Get RX flow hash configuration.
    GRssh = 0x46,
    /// Set RX flow hash configuration.
    SRssh = 0x47,
}

impl Command {
    /// Raw command code.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

// =============================================================================
// String Sets
// =============================================================================

/// String set identifiers (`enum ethtool_stringset`).
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringSetId {
    /// Self-test result names.
    Test = 0,
    /// Statistic names, as reported by `ETHTOOL_GSTATS`.
    Stats = 1,
    /// Driver private flag names.
    PrivFlags = 2,
    /// Deprecated n-tuple filter names.
    NtupleFilters = 3,
    /// Device feature names.
    Features = 4,
    /// RSS hash function names.
    RssHashFuncs = 5,
    /// Tunable names.
    Tunables = 6,
    /// PHY statistic names.
    PhyStats = 7,
    /// PHY tunable names.
    PhyTunables = 8,
    /// Link mode names.
    LinkModes = 9,
    /// Message class names.
    MsgClasses = 10,
    /// Wake-on-LAN mode names.
    WolModes = 11,
}

impl StringSetId {
    /// The `ethtool_drvinfo` count used when `ETHTOOL_GSSET_INFO` is unsupported.
    pub(crate) fn drvinfo_len(self, info: &abi::EthtoolDrvinfo) -> Option<u32> {
        match self {
            StringSetId::Test => Some(info.testinfo_len),
            StringSetId::Stats => Some(info.n_stats),
            StringSetId::PrivFlags => Some(info.n_priv_flags),
            _ => None,
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for issuing ethtool commands.
///
/// Generic over the [`Transport`] so the protocol can be driven without a
/// kernel; the default is a real [`EthtoolSocket`]. Every operation takes
/// `&self` and an interface name.
#[derive(Debug)]
pub struct Ethtool<T: Transport = EthtoolSocket> {
    transport: T,
}

impl Ethtool<EthtoolSocket> {
    /// Open a control socket.
    pub fn new() -> Result<Self> {
        Ok(Self {
            transport: EthtoolSocket::new()?,
        })
    }
}

impl<T: Transport> Ethtool<T> {
    /// Use an existing transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the handle, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Issue one command buffer, mapping failures to `operation`.
    pub(crate) fn issue(&self, ifname: &IfName, operation: &str, data: &mut [u8]) -> Result<()> {
        let cmd = data
            .get(..4)
            .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .unwrap_or_default();
        tracing::trace!(%ifname, cmd = format_args!("{:#x}", cmd), len = data.len(), "ethtool ioctl");

        self.transport
            .ioctl(ifname, data)
            .map_err(|e| Error::from_io(e, operation))
    }

    /// Issue a fixed-size command structure in place.
    pub(crate) fn issue_struct<S>(&self, ifname: &IfName, operation: &str, req: &mut S) -> Result<()>
    where
        S: zerocopy::IntoBytes + zerocopy::FromBytes,
    {
        self.issue(ifname, operation, req.as_mut_bytes())
    }
}
