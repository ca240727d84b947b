//! Ethtool response types.
//!
//! This module contains strongly-typed structures for ethtool query
//! responses, builders for set requests, and the static name tables.

use std::fmt;

use super::abi;
use crate::util::ifname::c_str_to_string;

// =============================================================================
// Common Types
// =============================================================================

/// Duplex mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Duplex {
    /// Half duplex.
    Half,
    /// Full duplex.
    Full,
    /// Unknown duplex.
    #[default]
    Unknown,
}

impl Duplex {
    /// Parse from kernel value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Duplex::Half,
            0x01 => Duplex::Full,
            _ => Duplex::Unknown,
        }
    }

    /// Convert to kernel value.
    pub fn to_u8(self) -> u8 {
        match self {
            Duplex::Half => 0x00,
            Duplex::Full => 0x01,
            Duplex::Unknown => 0xff,
        }
    }
}

impl fmt::Display for Duplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Duplex::Half => "Half",
            Duplex::Full => "Full",
            Duplex::Unknown => "Unknown!",
        })
    }
}

/// Port type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Port {
    /// Twisted pair (RJ45).
    Tp,
    /// Attachment Unit Interface.
    Aui,
    /// Media Independent Interface.
    Mii,
    /// Fiber optic.
    Fibre,
    /// BNC connector.
    Bnc,
    /// Direct attach (copper SFP+).
    Da,
    /// No port.
    None,
    /// Other port type.
    #[default]
    Other,
}

impl Port {
    /// Parse from kernel value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Port::Tp,
            0x01 => Port::Aui,
            0x02 => Port::Mii,
            0x03 => Port::Fibre,
            0x04 => Port::Bnc,
            0x05 => Port::Da,
            0xef => Port::None,
            _ => Port::Other,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Port::Tp => "Twisted Pair",
            Port::Aui => "AUI",
            Port::Mii => "MII",
            Port::Fibre => "FIBRE",
            Port::Bnc => "BNC",
            Port::Da => "Direct Attach Copper",
            Port::None => "None",
            Port::Other => "Other",
        })
    }
}

/// Transceiver type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Transceiver {
    /// PHY and MAC in the same package.
    Internal,
    /// PHY and MAC in different packages.
    External,
    /// Unknown transceiver.
    #[default]
    Unknown,
}

impl Transceiver {
    /// Parse from kernel value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Transceiver::Internal,
            0x01 => Transceiver::External,
            _ => Transceiver::Unknown,
        }
    }
}

impl fmt::Display for Transceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transceiver::Internal => "internal",
            Transceiver::External => "external",
            Transceiver::Unknown => "unknown",
        })
    }
}

/// MDI-X status or control (`ETH_TP_MDI_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MdiX {
    /// Status unknown, or control unsupported.
    #[default]
    Invalid,
    /// MDI (straight-through).
    Mdi,
    /// MDI-X (crossover).
    MdiX,
    /// Auto-select (control only).
    Auto,
}

impl MdiX {
    /// Parse from kernel value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x01 => MdiX::Mdi,
            0x02 => MdiX::MdiX,
            0x03 => MdiX::Auto,
            _ => MdiX::Invalid,
        }
    }
}

impl fmt::Display for MdiX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MdiX::Invalid => "Unknown",
            MdiX::Mdi => "off",
            MdiX::MdiX => "on",
            MdiX::Auto => "auto",
        })
    }
}

// =============================================================================
// Driver Info
// =============================================================================

/// Driver information (`ETHTOOL_GDRVINFO`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DriverInfo {
    /// Driver short name.
    pub driver: String,
    /// Driver version string.
    pub version: String,
    /// Firmware version string.
    pub fw_version: String,
    /// Device bus address.
    pub bus_info: String,
    /// Expansion ROM version string.
    pub erom_version: String,
    /// Number of driver private flags.
    pub n_priv_flags: u32,
    /// Number of statistics.
    pub n_stats: u32,
    /// Number of self-test results.
    pub testinfo_len: u32,
    /// EEPROM dump size in bytes.
    pub eedump_len: u32,
    /// Register dump size in bytes.
    pub regdump_len: u32,
}

impl From<&abi::EthtoolDrvinfo> for DriverInfo {
    fn from(raw: &abi::EthtoolDrvinfo) -> Self {
        Self {
            driver: c_str_to_string(&raw.driver),
            version: c_str_to_string(&raw.version),
            fw_version: c_str_to_string(&raw.fw_version),
            bus_info: c_str_to_string(&raw.bus_info),
            erom_version: c_str_to_string(&raw.erom_version),
            n_priv_flags: raw.n_priv_flags,
            n_stats: raw.n_stats,
            testinfo_len: raw.testinfo_len,
            eedump_len: raw.eedump_len,
            regdump_len: raw.regdump_len,
        }
    }
}

// =============================================================================
// Link Settings
// =============================================================================

/// Speed value meaning "unknown" in `ethtool_cmd`.
pub const SPEED_UNKNOWN: u32 = u32::MAX;

/// Legacy link settings (`ETHTOOL_GSET`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Settings {
    /// Supported link modes and features (legacy 32-bit mask).
    pub supported: u32,
    /// Advertised link modes and features.
    pub advertising: u32,
    /// Link modes advertised by the link partner.
    pub lp_advertising: u32,
    /// Speed in Mb/s, `None` when unknown.
    pub speed: Option<u32>,
    /// Duplex mode.
    pub duplex: Duplex,
    /// Physical connector.
    pub port: Port,
    /// MDIO address of the PHY.
    pub phy_address: u8,
    /// Transceiver in use.
    pub transceiver: Transceiver,
    /// Autonegotiation enabled.
    pub autoneg: bool,
    /// MDI-X status.
    pub mdix: MdiX,
    /// MDI-X control.
    pub mdix_ctrl: MdiX,
}

impl From<&abi::EthtoolCmd> for Settings {
    fn from(raw: &abi::EthtoolCmd) -> Self {
        let speed = (u32::from(raw.speed_hi) << 16) | u32::from(raw.speed);
        Self {
            supported: raw.supported,
            advertising: raw.advertising,
            lp_advertising: raw.lp_advertising,
            speed: match speed {
                0 | 0xffff | SPEED_UNKNOWN => None,
                s => Some(s),
            },
            duplex: Duplex::from_u8(raw.duplex),
            port: Port::from_u8(raw.port),
            phy_address: raw.phy_address,
            transceiver: Transceiver::from_u8(raw.transceiver),
            autoneg: raw.autoneg != 0,
            mdix: MdiX::from_u8(raw.eth_tp_mdix),
            mdix_ctrl: MdiX::from_u8(raw.eth_tp_mdix_ctrl),
        }
    }
}

impl Settings {
    /// Names of the supported link speeds.
    pub fn supported_modes(&self) -> Vec<&'static str> {
        link_speed_names(&[self.supported])
    }

    /// Names of the advertised link speeds.
    pub fn advertised_modes(&self) -> Vec<&'static str> {
        link_speed_names(&[self.advertising])
    }

    /// Names of the supported ports.
    pub fn supported_ports(&self) -> Vec<&'static str> {
        link_port_names(&[self.supported])
    }

    /// Whether the device supports autonegotiation.
    pub fn supports_autoneg(&self) -> bool {
        link_mode_test_bit(&[self.supported], LINK_MODE_AUTONEG_BIT)
    }
}

// =============================================================================
// Link Modes
// =============================================================================

/// `ETHTOOL_LINK_MODE_Autoneg_BIT`.
pub const LINK_MODE_AUTONEG_BIT: u32 = 6;

/// Link speed modes by bit number.
///
/// Not exhaustive; newer kernels define more bits than listed here.
pub static LINK_SPEED_NAMES: &[(u32, &str)] = &[
    (0, "10baseT/Half"),
    (1, "10baseT/Full"),
    (2, "100baseT/Half"),
    (3, "100baseT/Full"),
    (4, "1000baseT/Half"),
    (5, "1000baseT/Full"),
    (12, "10000baseT/Full"),
    (15, "2500baseX/Full"),
    (17, "1000baseKX/Full"),
    (18, "10000baseKX4/Full"),
    (19, "10000baseKR/Full"),
    (20, "10000baseR_FEC"),
    (21, "20000baseMLD2/Full"),
    (22, "20000baseKR2/Full"),
    (23, "40000baseKR4/Full"),
    (24, "40000baseCR4/Full"),
    (25, "40000baseSR4/Full"),
    (26, "40000baseLR4/Full"),
    (27, "56000baseKR4/Full"),
    (28, "56000baseCR4/Full"),
    (29, "56000baseSR4/Full"),
    (30, "56000baseLR4/Full"),
    (31, "25000baseCR/Full"),
    (32, "25000baseKR/Full"),
    (33, "25000baseSR/Full"),
    (34, "50000baseCR2/Full"),
    (35, "50000baseKR2/Full"),
    (36, "100000baseKR4/Full"),
    (37, "100000baseSR4/Full"),
    (38, "100000baseCR4/Full"),
    (39, "100000baseLR4_ER4/Full"),
    (40, "50000baseSR2/Full"),
    (41, "1000baseX/Full"),
    (42, "10000baseCR/Full"),
    (43, "10000baseSR/Full"),
    (44, "10000baseLR/Full"),
    (45, "10000baseLRM/Full"),
    (46, "10000baseER/Full"),
    (47, "2500baseT/Full"),
    (48, "5000baseT/Full"),
];

/// Port types by link mode bit number.
pub static LINK_PORT_NAMES: &[(u32, &str)] = &[
    (7, "TP"),
    (8, "AUI"),
    (11, "BNC"),
    (9, "MII"),
    (10, "FIBRE"),
    (16, "Backplane"),
];

/// FEC modes by link mode bit number.
pub static LINK_FEC_NAMES: &[(u32, &str)] = &[
    (49, "None"),
    (51, "BaseR"),
    (50, "RS"),
    (74, "LLRS"),
];

/// Test `bit` in a link mode mask made of 32-bit words.
pub fn link_mode_test_bit(words: &[u32], bit: u32) -> bool {
    words
        .get((bit / 32) as usize)
        .is_some_and(|w| w & (1 << (bit % 32)) != 0)
}

fn names_in(table: &'static [(u32, &'static str)], words: &[u32]) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(bit, _)| link_mode_test_bit(words, *bit))
        .map(|(_, name)| *name)
        .collect()
}

/// Link speed names set in `words`, in ascending bit order.
pub fn link_speed_names(words: &[u32]) -> Vec<&'static str> {
    names_in(LINK_SPEED_NAMES, words)
}

/// Port names set in `words`.
pub fn link_port_names(words: &[u32]) -> Vec<&'static str> {
    names_in(LINK_PORT_NAMES, words)
}

/// FEC mode names set in `words`.
pub fn link_fec_names(words: &[u32]) -> Vec<&'static str> {
    names_in(LINK_FEC_NAMES, words)
}

// =============================================================================
// Message Level
// =============================================================================

/// Driver message classes (`NETIF_MSG_*`).
pub static MSG_LEVEL_NAMES: &[(u32, &str)] = &[
    (0x0001, "drv"),
    (0x0002, "probe"),
    (0x0004, "link"),
    (0x0008, "timer"),
    (0x0010, "ifdown"),
    (0x0020, "ifup"),
    (0x0040, "rx_err"),
    (0x0080, "tx_err"),
    (0x0100, "tx_queued"),
    (0x0200, "intr"),
    (0x0400, "tx_done"),
    (0x0800, "rx_status"),
    (0x1000, "pktdata"),
    (0x2000, "hw"),
    (0x4000, "wol"),
];

/// Driver message level bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MsgLevel(pub u32);

impl MsgLevel {
    /// Names of the enabled message classes, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        MSG_LEVEL_NAMES
            .iter()
            .filter(|(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for MsgLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x} ({})", self.0, self.0)?;
        let names = self.names();
        if !names.is_empty() {
            write!(f, "\n\t\t\t       {}", names.join(" "))?;
        }
        Ok(())
    }
}

// =============================================================================
// Features
// =============================================================================

/// State of one device feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Feature {
    /// Feature name from the device's feature string set.
    pub name: String,
    /// Can be changed by the user.
    pub available: bool,
    /// Requested by the user.
    pub requested: bool,
    /// Currently enabled.
    pub active: bool,
    /// Fixed regardless of what is requested.
    pub never_changed: bool,
}

/// Device features (offloads).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Features {
    /// Features in device order.
    pub features: Vec<Feature>,
}

impl Features {
    /// Look up a feature by name.
    pub fn get(&self, feature: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == feature)
    }

    /// Check if a feature is currently active.
    pub fn is_active(&self, feature: &str) -> bool {
        self.get(feature).is_some_and(|f| f.active)
    }

    /// Check if a feature is supported by hardware.
    pub fn is_hw_supported(&self, feature: &str) -> bool {
        self.get(feature).is_some_and(|f| f.available)
    }

    /// Check if a feature can be changed.
    pub fn is_changeable(&self, feature: &str) -> bool {
        self.get(feature)
            .is_some_and(|f| f.available && !f.never_changed)
    }

    /// Get all active feature names.
    pub fn active_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|f| f.active)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Iterate over all features with their status.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.features.iter().map(|f| (f.name.as_str(), f.active))
    }

    /// Number of named features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the device reported no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Builder for setting features.
#[derive(Debug, Clone, Default)]
pub struct FeaturesBuilder {
    pub(crate) changes: Vec<(String, bool)>,
}

impl FeaturesBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a feature.
    pub fn enable(mut self, feature: &str) -> Self {
        self.changes.push((feature.to_string(), true));
        self
    }

    /// Disable a feature.
    pub fn disable(mut self, feature: &str) -> Self {
        self.changes.push((feature.to_string(), false));
        self
    }

    /// Set a feature on or off.
    pub fn set(mut self, feature: &str, enabled: bool) -> Self {
        self.changes.push((feature.to_string(), enabled));
        self
    }

    /// Whether no change was requested.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

// =============================================================================
// Channels
// =============================================================================

/// Channel counts.
///
/// Contains current and maximum channel (queue) counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Channels {
    /// Maximum RX channels.
    pub rx_max: u32,
    /// Maximum TX channels.
    pub tx_max: u32,
    /// Maximum other channels.
    pub other_max: u32,
    /// Maximum combined channels.
    pub combined_max: u32,
    /// Current RX channels.
    pub rx_count: u32,
    /// Current TX channels.
    pub tx_count: u32,
    /// Current other channels.
    pub other_count: u32,
    /// Current combined channels.
    pub combined_count: u32,
}

impl From<&abi::EthtoolChannels> for Channels {
    fn from(raw: &abi::EthtoolChannels) -> Self {
        Self {
            rx_max: raw.max_rx,
            tx_max: raw.max_tx,
            other_max: raw.max_other,
            combined_max: raw.max_combined,
            rx_count: raw.rx_count,
            tx_count: raw.tx_count,
            other_count: raw.other_count,
            combined_count: raw.combined_count,
        }
    }
}

/// Builder for setting channel counts.
#[derive(Debug, Clone, Default)]
pub struct ChannelsBuilder {
    pub(crate) rx: Option<u32>,
    pub(crate) tx: Option<u32>,
    pub(crate) other: Option<u32>,
    pub(crate) combined: Option<u32>,
}

impl ChannelsBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set RX channel count.
    pub fn rx(mut self, count: u32) -> Self {
        self.rx = Some(count);
        self
    }

    /// Set TX channel count.
    pub fn tx(mut self, count: u32) -> Self {
        self.tx = Some(count);
        self
    }

    /// Set other channel count.
    pub fn other(mut self, count: u32) -> Self {
        self.other = Some(count);
        self
    }

    /// Set combined channel count.
    pub fn combined(mut self, count: u32) -> Self {
        self.combined = Some(count);
        self
    }

    pub(crate) fn apply(&self, raw: &mut abi::EthtoolChannels) {
        if let Some(v) = self.rx {
            raw.rx_count = v;
        }
        if let Some(v) = self.tx {
            raw.tx_count = v;
        }
        if let Some(v) = self.other {
            raw.other_count = v;
        }
        if let Some(v) = self.combined {
            raw.combined_count = v;
        }
    }
}

// =============================================================================
// Coalesce
// =============================================================================

/// Interrupt coalescing parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coalesce {
    /// RX coalesce microseconds.
    pub rx_usecs: u32,
    /// RX max frames before interrupt.
    pub rx_max_frames: u32,
    /// RX coalesce microseconds (irq context).
    pub rx_usecs_irq: u32,
    /// RX max frames (irq context).
    pub rx_max_frames_irq: u32,
    /// TX coalesce microseconds.
    pub tx_usecs: u32,
    /// TX max frames before interrupt.
    pub tx_max_frames: u32,
    /// TX coalesce microseconds (irq context).
    pub tx_usecs_irq: u32,
    /// TX max frames (irq context).
    pub tx_max_frames_irq: u32,
    /// Stats block update microseconds.
    pub stats_block_usecs: u32,
    /// Use adaptive RX coalescing.
    pub use_adaptive_rx: bool,
    /// Use adaptive TX coalescing.
    pub use_adaptive_tx: bool,
    /// Packet rate low threshold.
    pub pkt_rate_low: u32,
    /// RX microseconds below the low rate.
    pub rx_usecs_low: u32,
    /// RX max frames below the low rate.
    pub rx_max_frames_low: u32,
    /// TX microseconds below the low rate.
    pub tx_usecs_low: u32,
    /// TX max frames below the low rate.
    pub tx_max_frames_low: u32,
    /// Packet rate high threshold.
    pub pkt_rate_high: u32,
    /// RX microseconds above the high rate.
    pub rx_usecs_high: u32,
    /// RX max frames above the high rate.
    pub rx_max_frames_high: u32,
    /// TX microseconds above the high rate.
    pub tx_usecs_high: u32,
    /// TX max frames above the high rate.
    pub tx_max_frames_high: u32,
    /// Rate sample interval in seconds.
    pub rate_sample_interval: u32,
}

impl From<&abi::EthtoolCoalesce> for Coalesce {
    fn from(raw: &abi::EthtoolCoalesce) -> Self {
        Self {
            rx_usecs: raw.rx_coalesce_usecs,
            rx_max_frames: raw.rx_max_coalesced_frames,
            rx_usecs_irq: raw.rx_coalesce_usecs_irq,
            rx_max_frames_irq: raw.rx_max_coalesced_frames_irq,
            tx_usecs: raw.tx_coalesce_usecs,
            tx_max_frames: raw.tx_max_coalesced_frames,
            tx_usecs_irq: raw.tx_coalesce_usecs_irq,
            tx_max_frames_irq: raw.tx_max_coalesced_frames_irq,
            stats_block_usecs: raw.stats_block_coalesce_usecs,
            use_adaptive_rx: raw.use_adaptive_rx_coalesce != 0,
            use_adaptive_tx: raw.use_adaptive_tx_coalesce != 0,
            pkt_rate_low: raw.pkt_rate_low,
            rx_usecs_low: raw.rx_coalesce_usecs_low,
            rx_max_frames_low: raw.rx_max_coalesced_frames_low,
            tx_usecs_low: raw.tx_coalesce_usecs_low,
            tx_max_frames_low: raw.tx_max_coalesced_frames_low,
            pkt_rate_high: raw.pkt_rate_high,
            rx_usecs_high: raw.rx_coalesce_usecs_high,
            rx_max_frames_high: raw.rx_max_coalesced_frames_high,
            tx_usecs_high: raw.tx_coalesce_usecs_high,
            tx_max_frames_high: raw.tx_max_coalesced_frames_high,
            rate_sample_interval: raw.rate_sample_interval,
        }
    }
}

/// Builder for setting coalescing parameters.
#[derive(Debug, Clone, Default)]
pub struct CoalesceBuilder {
    pub(crate) rx_usecs: Option<u32>,
    pub(crate) rx_max_frames: Option<u32>,
    pub(crate) tx_usecs: Option<u32>,
    pub(crate) tx_max_frames: Option<u32>,
    pub(crate) use_adaptive_rx: Option<bool>,
    pub(crate) use_adaptive_tx: Option<bool>,
}

impl CoalesceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set RX coalesce microseconds.
    pub fn rx_usecs(mut self, usecs: u32) -> Self {
        self.rx_usecs = Some(usecs);
        self
    }

    /// Set RX max frames before interrupt.
    pub fn rx_max_frames(mut self, frames: u32) -> Self {
        self.rx_max_frames = Some(frames);
        self
    }

    /// Set TX coalesce microseconds.
    pub fn tx_usecs(mut self, usecs: u32) -> Self {
        self.tx_usecs = Some(usecs);
        self
    }

    /// Set TX max frames before interrupt.
    pub fn tx_max_frames(mut self, frames: u32) -> Self {
        self.tx_max_frames = Some(frames);
        self
    }

    /// Enable or disable adaptive RX coalescing.
    pub fn use_adaptive_rx(mut self, enabled: bool) -> Self {
        self.use_adaptive_rx = Some(enabled);
        self
    }

    /// Enable or disable adaptive TX coalescing.
    pub fn use_adaptive_tx(mut self, enabled: bool) -> Self {
        self.use_adaptive_tx = Some(enabled);
        self
    }

    pub(crate) fn apply(&self, raw: &mut abi::EthtoolCoalesce) {
        if let Some(v) = self.rx_usecs {
            raw.rx_coalesce_usecs = v;
        }
        if let Some(v) = self.rx_max_frames {
            raw.rx_max_coalesced_frames = v;
        }
        if let Some(v) = self.tx_usecs {
            raw.tx_coalesce_usecs = v;
        }
        if let Some(v) = self.tx_max_frames {
            raw.tx_max_coalesced_frames = v;
        }
        if let Some(v) = self.use_adaptive_rx {
            raw.use_adaptive_rx_coalesce = u32::from(v);
        }
        if let Some(v) = self.use_adaptive_tx {
            raw.use_adaptive_tx_coalesce = u32::from(v);
        }
    }
}

// =============================================================================
// Module EEPROM
// =============================================================================

/// Module EEPROM layout reported by `ETHTOOL_GMODULEINFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ModuleKind {
    /// SFP ID page only.
    Sff8079,
    /// SFP ID page plus diagnostics page A2.
    Sff8472,
    /// QSFP+/QSFP28 memory map.
    Sff8636,
    /// QSFP memory map.
    Sff8436,
    /// Some other layout.
    Other(u32),
}

impl ModuleKind {
    /// Parse from kernel value (`ETH_MODULE_SFF_*`).
    pub fn from_u32(v: u32) -> Self {
        match v {
            0x1 => ModuleKind::Sff8079,
            0x2 => ModuleKind::Sff8472,
            0x3 => ModuleKind::Sff8636,
            0x4 => ModuleKind::Sff8436,
            other => ModuleKind::Other(other),
        }
    }
}

/// Raw plug-in module EEPROM contents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModuleEeprom {
    /// Memory map layout.
    pub kind: ModuleKind,
    /// EEPROM bytes, starting at offset 0.
    pub data: Vec<u8>,
}

impl ModuleEeprom {
    /// Lowercase hex encoding of the EEPROM bytes.
    pub fn hex(&self) -> String {
        self.data.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
