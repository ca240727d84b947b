//! Linux ethtool ioctl library.
//!
//! This crate talks to network drivers through the `SIOCETHTOOL` ioctl.
//! It covers RX flow hash (RSS) configuration, driver information,
//! statistics, offload features, channels, coalescing and transceiver
//! EEPROM decoding.
//!
//! # Features
//!
//! - `serde` - Derive `Serialize` on result types for JSON output
//!
//! # Example
//!
//! ```no_run
//! use ethio::{Ethtool, RssContext};
//!
//! fn main() -> ethio::Result<()> {
//!     let ethtool = Ethtool::new()?;
//!
//!     let info = ethtool.get_driver_info("eth0")?;
//!     println!("{} {}", info.driver, info.version);
//!
//!     let hash = ethtool.get_flow_hash("eth0", RssContext::NONE)?;
//!     println!("{} RX rings, hash function {:?}", hash.ring_count, hash.active_func());
//!
//!     // Spread flows evenly over the first 4 rings.
//!     ethtool.set_flow_hash("eth0", |c| c.equal(0, 4))?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing without a device
//!
//! [`Ethtool`] is generic over [`Transport`], the single ioctl seam. Tests
//! supply their own transport to play the kernel's part:
//!
//! ```
//! use ethio::{Ethtool, IfName, Transport};
//!
//! struct Unsupported;
//!
//! impl Transport for Unsupported {
//!     fn ioctl(&self, _ifname: &IfName, _data: &mut [u8]) -> std::io::Result<()> {
//!         Err(std::io::Error::from_raw_os_error(libc::EOPNOTSUPP))
//!     }
//! }
//!
//! let ethtool = Ethtool::with_transport(Unsupported);
//! let err = ethtool.get_driver_info("eth0").unwrap_err();
//! assert!(err.is_not_supported());
//! ```

pub mod buffer;
pub mod error;
pub mod ethtool;
pub mod rxfh;
pub mod sff;
pub mod socket;
pub mod util;

// Re-export common types at crate root for convenience
pub use buffer::CommandBuffer;
pub use error::{Error, Result};
pub use ethtool::{Command, Ethtool, StringSet, StringSetId};
pub use rxfh::{
    FillAction, FillError, FlowHash, FlowHashBuilder, IndirectTable, RXFH_INDIR_NO_CHANGE,
    RssContext,
};
pub use socket::{EthtoolSocket, Transport};
pub use util::IfName;
