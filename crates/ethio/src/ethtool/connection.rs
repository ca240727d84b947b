//! Ethtool query and configuration operations.
//!
//! Each operation is one fixed-size ioctl, or a size probe followed by a
//! header + trailing-array ioctl.

use tracing::debug;

use super::abi::{
    EEPROM_LEN, EthtoolChannels, EthtoolCmd, EthtoolCoalesce, EthtoolDrvinfo,
    EthtoolEeprom, EthtoolFeaturesHdr, EthtoolModinfo, EthtoolPermAddr, EthtoolRxnfc,
    EthtoolSetFeaturesBlock, EthtoolStats, EthtoolValue, MAX_ADDR_LEN, MAX_GSTRINGS,
};
use super::types::*;
use super::{Command, Ethtool, StringSetId};
use crate::buffer::CommandBuffer;
use crate::error::{Error, Result};
use crate::socket::Transport;
use crate::util::IfName;

impl<T: Transport> Ethtool<T> {
    // =========================================================================
    // Driver Info
    // =========================================================================

    pub(crate) fn drvinfo(&self, ifname: &IfName) -> Result<EthtoolDrvinfo> {
        let mut req = EthtoolDrvinfo {
            cmd: Command::GDrvinfo.code(),
            ..Default::default()
        };
        self.issue_struct(ifname, "get driver info", &mut req)?;
        Ok(req)
    }

    /// Get driver information for an interface.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let info = ethtool.get_driver_info("eth0")?;
    /// println!("{} {} ({})", info.driver, info.version, info.bus_info);
    /// ```
    pub fn get_driver_info(&self, ifname: &str) -> Result<DriverInfo> {
        let ifname = IfName::new(ifname)?;
        Ok(DriverInfo::from(&self.drvinfo(&ifname)?))
    }

    /// Get the driver name of an interface.
    pub fn get_driver_name(&self, ifname: &str) -> Result<String> {
        Ok(self.get_driver_info(ifname)?.driver)
    }

    /// Get the bus address of an interface.
    pub fn get_bus_info(&self, ifname: &str) -> Result<String> {
        Ok(self.get_driver_info(ifname)?.bus_info)
    }

    // =========================================================================
    // RX Rings
    // =========================================================================

    pub(crate) fn ring_count(&self, ifname: &IfName) -> Result<u64> {
        let mut req = EthtoolRxnfc {
            cmd: Command::GRxRings.code(),
            ..Default::default()
        };
        self.issue_struct(ifname, "get RX ring count", &mut req)?;
        Ok(req.data)
    }

    /// Get the number of RX rings.
    pub fn get_ring_count(&self, ifname: &str) -> Result<u64> {
        self.ring_count(&IfName::new(ifname)?)
    }

    // =========================================================================
    // Link Settings
    // =========================================================================

    /// Get legacy link settings (speed, duplex, port, autonegotiation).
    pub fn get_settings(&self, ifname: &str) -> Result<Settings> {
        let ifname = IfName::new(ifname)?;
        let mut req = EthtoolCmd {
            cmd: Command::GSet.code(),
            ..Default::default()
        };
        self.issue_struct(&ifname, "get link settings", &mut req)?;
        Ok(Settings::from(&req))
    }

    /// Get link state: `true` when the link is up.
    pub fn get_link_state(&self, ifname: &str) -> Result<bool> {
        let ifname = IfName::new(ifname)?;
        let mut req = EthtoolValue {
            cmd: Command::GLink.code(),
            data: 0,
        };
        self.issue_struct(&ifname, "get link state", &mut req)?;
        Ok(req.data != 0)
    }

    /// Get the driver message level.
    pub fn get_msg_level(&self, ifname: &str) -> Result<MsgLevel> {
        let ifname = IfName::new(ifname)?;
        let mut req = EthtoolValue {
            cmd: Command::GMsglvl.code(),
            data: 0,
        };
        self.issue_struct(&ifname, "get message level", &mut req)?;
        Ok(MsgLevel(req.data))
    }

    /// Set the driver message level.
    pub fn set_msg_level(&self, ifname: &str, level: MsgLevel) -> Result<()> {
        let ifname = IfName::new(ifname)?;
        let mut req = EthtoolValue {
            cmd: Command::SMsglvl.code(),
            data: level.0,
        };
        self.issue_struct(&ifname, "set message level", &mut req)
    }

    // =========================================================================
    // Permanent Address
    // =========================================================================

    /// Get the permanent hardware address.
    ///
    /// Returns `None` when the device reports an all-zero address.
    pub fn get_perm_addr(&self, ifname: &str) -> Result<Option<String>> {
        let ifname = IfName::new(ifname)?;
        let header = EthtoolPermAddr {
            cmd: Command::GPermAddr.code(),
            size: MAX_ADDR_LEN,
        };
        let mut buf = CommandBuffer::new(&header, MAX_ADDR_LEN as usize)?;
        self.issue(&ifname, "get permanent address", buf.as_mut_bytes())?;

        let size = buf.header()?.size as usize;
        let addr = buf.trailing("permanent address", 0, size)?;
        if addr.iter().all(|&b| b == 0) {
            return Ok(None);
        }

        Ok(Some(
            addr.iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(":"),
        ))
    }

    // =========================================================================
    // Channels
    // =========================================================================

    fn channels(&self, ifname: &IfName) -> Result<EthtoolChannels> {
        let mut req = EthtoolChannels {
            cmd: Command::GChannels.code(),
            ..Default::default()
        };
        self.issue_struct(ifname, "get channels", &mut req)?;
        Ok(req)
    }

    /// Get channel counts.
    pub fn get_channels(&self, ifname: &str) -> Result<Channels> {
        Ok(Channels::from(&self.channels(&IfName::new(ifname)?)?))
    }

    /// Set channel counts.
    ///
    /// Counts not set in the builder keep their current value. Returns the
    /// channel configuration as written.
    ///
    /// # Example
    ///
    /// ```ignore
    /// ethtool.set_channels("eth0", |c| c.combined(4))?;
    /// ```
    pub fn set_channels(
        &self,
        ifname: &str,
        configure: impl FnOnce(ChannelsBuilder) -> ChannelsBuilder,
    ) -> Result<Channels> {
        let ifname = IfName::new(ifname)?;
        let builder = configure(ChannelsBuilder::new());

        let mut req = self.channels(&ifname)?;
        builder.apply(&mut req);
        req.cmd = Command::SChannels.code();
        self.issue_struct(&ifname, "set channels", &mut req)?;
        Ok(Channels::from(&req))
    }

    // =========================================================================
    // Coalesce
    // =========================================================================

    fn coalesce(&self, ifname: &IfName) -> Result<EthtoolCoalesce> {
        let mut req = EthtoolCoalesce {
            cmd: Command::GCoalesce.code(),
            ..Default::default()
        };
        self.issue_struct(ifname, "get coalesce", &mut req)?;
        Ok(req)
    }

    /// Get interrupt coalescing parameters.
    pub fn get_coalesce(&self, ifname: &str) -> Result<Coalesce> {
        Ok(Coalesce::from(&self.coalesce(&IfName::new(ifname)?)?))
    }

    /// Set interrupt coalescing parameters.
    ///
    /// Parameters not set in the builder keep their current value.
    pub fn set_coalesce(
        &self,
        ifname: &str,
        configure: impl FnOnce(CoalesceBuilder) -> CoalesceBuilder,
    ) -> Result<Coalesce> {
        let ifname = IfName::new(ifname)?;
        let builder = configure(CoalesceBuilder::new());

        let mut req = self.coalesce(&ifname)?;
        builder.apply(&mut req);
        req.cmd = Command::SCoalesce.code();
        self.issue_struct(&ifname, "set coalesce", &mut req)?;
        Ok(Coalesce::from(&req))
    }

    // =========================================================================
    // Features
    // =========================================================================

    /// Get device features.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let features = ethtool.get_features("eth0")?;
    /// println!("GRO: {}", features.is_active("rx-gro"));
    /// ```
    pub fn get_features(&self, ifname: &str) -> Result<Features> {
        let ifname = IfName::new(ifname)?;
        let names = self.get_string_set(ifname.as_str(), StringSetId::Features)?;
        if names.is_empty() {
            return Ok(Features::default());
        }

        let blocks = names.len().div_ceil(32);
        let header = EthtoolFeaturesHdr {
            cmd: Command::GFeatures.code(),
            size: blocks as u32,
        };
        let mut buf = CommandBuffer::new(&header, blocks * 16)?;
        self.issue(&ifname, "get features", buf.as_mut_bytes())?;

        let words = buf.read_u32s("feature blocks", 0, blocks * 4)?;
        let bit = |field: usize, index: u32| {
            let block = &words[(index / 32) as usize * 4..][..4];
            block[field] & (1 << (index % 32)) != 0
        };

        let features = names
            .iter()
            .map(|(index, name)| Feature {
                name: name.to_string(),
                available: bit(0, index),
                requested: bit(1, index),
                active: bit(2, index),
                never_changed: bit(3, index),
            })
            .collect();

        Ok(Features { features })
    }

    /// Change device features.
    ///
    /// All names are resolved before anything is sent; an unknown name
    /// fails with [`Error::UnknownFeature`].
    pub fn set_features(
        &self,
        ifname: &str,
        configure: impl FnOnce(FeaturesBuilder) -> FeaturesBuilder,
    ) -> Result<()> {
        let ifname = IfName::new(ifname)?;
        let builder = configure(FeaturesBuilder::new());
        if builder.is_empty() {
            return Ok(());
        }

        let names = self.get_string_set(ifname.as_str(), StringSetId::Features)?;
        let mut blocks = vec![EthtoolSetFeaturesBlock::default(); names.len().div_ceil(32)];

        for (name, enabled) in &builder.changes {
            let index = names
                .index_of(name)
                .ok_or_else(|| Error::UnknownFeature { name: name.clone() })?;
            let block = &mut blocks[(index / 32) as usize];
            let mask = 1u32 << (index % 32);
            block.valid |= mask;
            if *enabled {
                block.requested |= mask;
            } else {
                block.requested &= !mask;
            }
        }

        let header = EthtoolFeaturesHdr {
            cmd: Command::SFeatures.code(),
            size: blocks.len() as u32,
        };
        let mut buf = CommandBuffer::new(&header, blocks.len() * 8)?;
        for (i, block) in blocks.iter().enumerate() {
            let words = buf.u32s_mut("feature blocks", i * 8, 2)?;
            words[0] = block.valid;
            words[1] = block.requested;
        }
        self.issue(&ifname, "set features", buf.as_mut_bytes())
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Get NIC statistics, in device order.
    ///
    /// Counters whose name is empty are skipped.
    pub fn get_stats(&self, ifname: &str) -> Result<Vec<(String, u64)>> {
        let ifname = IfName::new(ifname)?;
        let n_stats = self.drvinfo(&ifname)?.n_stats;
        if n_stats > MAX_GSTRINGS {
            return Err(Error::TooManyStrings {
                count: n_stats,
                max: MAX_GSTRINGS,
            });
        }

        let names = self.read_strings(&ifname, StringSetId::Stats, n_stats)?;

        let header = EthtoolStats {
            cmd: Command::GStats.code(),
            n_stats,
        };
        let mut buf = CommandBuffer::new(&header, n_stats as usize * 8)?;
        self.issue(&ifname, "get stats", buf.as_mut_bytes())?;

        let count = buf.header()?.n_stats.min(n_stats) as usize;
        let values = buf.read_u64s("stats", 0, count)?;

        Ok(names
            .iter()
            .filter_map(|(i, name)| values.get(i as usize).map(|v| (name.to_string(), *v)))
            .collect())
    }

    // =========================================================================
    // Module EEPROM
    // =========================================================================

    /// Read the plug-in module EEPROM.
    pub fn get_module_eeprom(&self, ifname: &str) -> Result<ModuleEeprom> {
        let ifname = IfName::new(ifname)?;
        let mut info = EthtoolModinfo {
            cmd: Command::GModuleInfo.code(),
            ..Default::default()
        };
        self.issue_struct(&ifname, "get module info", &mut info)?;

        if info.eeprom_len > EEPROM_LEN {
            return Err(Error::OutOfRange {
                what: "module EEPROM",
                needed: info.eeprom_len as usize,
                available: EEPROM_LEN as usize,
            });
        }
        debug!(%ifname, kind = info.type_, len = info.eeprom_len, "module EEPROM");

        let header = EthtoolEeprom {
            cmd: Command::GModuleEeprom.code(),
            offset: 0,
            len: info.eeprom_len,
            ..Default::default()
        };
        let mut buf = CommandBuffer::new(&header, info.eeprom_len as usize)?;
        self.issue(&ifname, "get module EEPROM", buf.as_mut_bytes())?;

        let len = buf.header()?.len.min(info.eeprom_len) as usize;
        Ok(ModuleEeprom {
            kind: ModuleKind::from_u32(info.type_),
            data: buf.trailing("module EEPROM", 0, len)?.to_vec(),
        })
    }
}
