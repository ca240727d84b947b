//! Kernel ABI structures for the `SIOCETHTOOL` ioctl (linux/ethtool.h).
//!
//! Field order, widths and reserved bytes match the kernel layout exactly;
//! the size tests at the bottom pin them.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Length of one entry in a string set.
pub const ETH_GSTRING_LEN: usize = 32;

/// Largest string set accepted from a device.
pub const MAX_GSTRINGS: u32 = 32768;

/// Capacity of the permanent address buffer.
pub const MAX_ADDR_LEN: u32 = 32;

/// Largest module EEPROM read.
pub const EEPROM_LEN: u32 = 640;

/// Largest RSS indirection table accepted from a device, in entries.
pub const MAX_INDIR_SIZE: u32 = 1 << 16;

/// Largest RSS hash key accepted from a device, in bytes.
pub const MAX_RSS_KEY_SIZE: u32 = 256;

/// `struct ethtool_value`: generic single-value command.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolValue {
    pub cmd: u32,
    pub data: u32,
}

/// `struct ethtool_rxfh`: RSS configuration header.
///
/// Followed by `indir_size` u32 ring indices, then `key_size` key bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolRxfh {
    pub cmd: u32,
    pub rss_context: u32,
    pub indir_size: u32,
    pub key_size: u32,
    pub hfunc: u8,
    pub input_xfrm: u8,
    pub rsvd8: [u8; 2],
    pub rsvd32: u32,
}

/// `struct ethtool_rxfh_indir`: legacy indirection table header.
///
/// Followed by `size` u32 ring indices.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolRxfhIndir {
    pub cmd: u32,
    pub size: u32,
}

/// `struct ethtool_rxnfc`, used here only for `ETHTOOL_GRXRINGS`.
///
/// The flow spec union is carried as opaque bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolRxnfc {
    pub cmd: u32,
    pub flow_type: u32,
    pub data: u64,
    pub fs: [u64; 21],
    pub rule_cnt: u32,
    pub rsvd: u32,
}

/// `struct ethtool_drvinfo`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolDrvinfo {
    pub cmd: u32,
    pub driver: [u8; 32],
    pub version: [u8; 32],
    pub fw_version: [u8; 32],
    pub bus_info: [u8; 32],
    pub erom_version: [u8; 32],
    pub reserved2: [u8; 12],
    pub n_priv_flags: u32,
    pub n_stats: u32,
    pub testinfo_len: u32,
    pub eedump_len: u32,
    pub regdump_len: u32,
}

/// `struct ethtool_cmd`: legacy link settings.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolCmd {
    pub cmd: u32,
    pub supported: u32,
    pub advertising: u32,
    pub speed: u16,
    pub duplex: u8,
    pub port: u8,
    pub phy_address: u8,
    pub transceiver: u8,
    pub autoneg: u8,
    pub mdio_support: u8,
    pub maxtxpkt: u32,
    pub maxrxpkt: u32,
    pub speed_hi: u16,
    pub eth_tp_mdix: u8,
    pub eth_tp_mdix_ctrl: u8,
    pub lp_advertising: u32,
    pub reserved: [u32; 2],
}

/// `struct ethtool_channels`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolChannels {
    pub cmd: u32,
    pub max_rx: u32,
    pub max_tx: u32,
    pub max_other: u32,
    pub max_combined: u32,
    pub rx_count: u32,
    pub tx_count: u32,
    pub other_count: u32,
    pub combined_count: u32,
}

/// `struct ethtool_coalesce`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolCoalesce {
    pub cmd: u32,
    pub rx_coalesce_usecs: u32,
    pub rx_max_coalesced_frames: u32,
    pub rx_coalesce_usecs_irq: u32,
    pub rx_max_coalesced_frames_irq: u32,
    pub tx_coalesce_usecs: u32,
    pub tx_max_coalesced_frames: u32,
    pub tx_coalesce_usecs_irq: u32,
    pub tx_max_coalesced_frames_irq: u32,
    pub stats_block_coalesce_usecs: u32,
    pub use_adaptive_rx_coalesce: u32,
    pub use_adaptive_tx_coalesce: u32,
    pub pkt_rate_low: u32,
    pub rx_coalesce_usecs_low: u32,
    pub rx_max_coalesced_frames_low: u32,
    pub tx_coalesce_usecs_low: u32,
    pub tx_max_coalesced_frames_low: u32,
    pub pkt_rate_high: u32,
    pub rx_coalesce_usecs_high: u32,
    pub rx_max_coalesced_frames_high: u32,
    pub tx_coalesce_usecs_high: u32,
    pub tx_max_coalesced_frames_high: u32,
    pub rate_sample_interval: u32,
}

/// `struct ethtool_sset_info` header. Followed by one u32 per set bit.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolSsetInfo {
    pub cmd: u32,
    pub reserved: u32,
    pub sset_mask: u64,
}

/// `struct ethtool_gstrings` header. Followed by `len` 32-byte strings.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolGstrings {
    pub cmd: u32,
    pub string_set: u32,
    pub len: u32,
}

/// `struct ethtool_stats` header. Followed by `n_stats` u64 counters.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolStats {
    pub cmd: u32,
    pub n_stats: u32,
}

/// `struct ethtool_perm_addr` header. Followed by `size` address bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolPermAddr {
    pub cmd: u32,
    pub size: u32,
}

/// `struct ethtool_modinfo`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolModinfo {
    pub cmd: u32,
    pub type_: u32,
    pub eeprom_len: u32,
    pub reserved: [u32; 8],
}

/// `struct ethtool_eeprom` header. Followed by `len` data bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolEeprom {
    pub cmd: u32,
    pub magic: u32,
    pub offset: u32,
    pub len: u32,
}

/// `struct ethtool_gfeatures` / `ethtool_sfeatures` header.
///
/// Followed by `size` feature blocks.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolFeaturesHdr {
    pub cmd: u32,
    pub size: u32,
}

/// `struct ethtool_get_features_block`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolGetFeaturesBlock {
    pub available: u32,
    pub requested: u32,
    pub active: u32,
    pub never_changed: u32,
}

/// `struct ethtool_set_features_block`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolSetFeaturesBlock {
    pub valid: u32,
    pub requested: u32,
}
