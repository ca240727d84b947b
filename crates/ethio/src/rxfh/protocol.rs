//! RX flow hash get/set protocol.
//!
//! `ETHTOOL_GRSSH` and `ETHTOOL_SRSSH` use a two-phase exchange: a
//! header-only probe returns the indirection table and key sizes, then a
//! single buffer of header + `indir_size` ring indices + `key_size` key
//! bytes carries the full request.

use std::collections::BTreeMap;

use tracing::debug;

use super::table::table_byte_size;
use super::{FillAction, FlowHash, FlowHashBuilder, IndirectTable, RXFH_INDIR_NO_CHANGE, RssContext};
use crate::buffer::CommandBuffer;
use crate::error::{Error, Result};
use crate::ethtool::abi::{EthtoolRxfh, EthtoolRxfhIndir, MAX_INDIR_SIZE, MAX_RSS_KEY_SIZE};
use crate::ethtool::{Command, Ethtool, StringSetId};
use crate::socket::Transport;
use crate::util::IfName;

impl<T: Transport> Ethtool<T> {
    /// Get the RX flow hash configuration of `context`.
    ///
    /// On drivers without `ETHTOOL_GRSSH` support for non-default contexts,
    /// falls back to the legacy table-only query; the result then carries
    /// only the ring count and table.
    pub fn get_flow_hash(&self, ifname: &str, context: RssContext) -> Result<FlowHash> {
        let ifname = IfName::new(ifname)?;
        let ring_count = self.ring_count(&ifname)?;

        let mut probe = EthtoolRxfh {
            cmd: Command::GRssh.code(),
            rss_context: context.id(),
            ..Default::default()
        };
        if let Err(e) = self.issue_struct(&ifname, "get RX flow hash indir size and key size", &mut probe) {
            if e.is_not_supported() && !context.is_default() {
                debug!(%ifname, %context, "RSS query unsupported, using legacy indirection table");
                let table = self.get_indir_legacy(&ifname)?;
                return Ok(FlowHash {
                    ring_count,
                    table: Some(table),
                    ..Default::default()
                });
            }
            return Err(e);
        }
        debug!(
            %ifname,
            indir_size = probe.indir_size,
            key_size = probe.key_size,
            "RX flow hash sizes"
        );
        check_rxfh_sizes(&probe)?;

        let header = EthtoolRxfh {
            cmd: Command::GRssh.code(),
            rss_context: context.id(),
            indir_size: probe.indir_size,
            key_size: probe.key_size,
            ..Default::default()
        };
        let trailing = table_byte_size(probe.indir_size) + probe.key_size as usize;
        let mut buf = CommandBuffer::new(&header, trailing)?;
        self.issue(&ifname, "get RX flow hash configuration", buf.as_mut_bytes())?;

        let reply = buf.header()?;
        let table = match reply.indir_size {
            0 => None,
            n => Some(IndirectTable::from(buf.read_u32s(
                "indirection table",
                0,
                n as usize,
            )?)),
        };
        let key = match reply.key_size {
            0 => None,
            n => Some(
                buf.trailing("hash key", table_byte_size(reply.indir_size), n as usize)?
                    .to_vec(),
            ),
        };
        // Buffer is released here; everything returned is a copy.
        drop(buf);

        let funcs = if reply.hfunc == 0 {
            debug!(%ifname, "device reports no RSS hash function");
            None
        } else {
            let names = self.get_string_set(ifname.as_str(), StringSetId::RssHashFuncs)?;
            Some(hash_funcs(&names, reply.hfunc))
        };

        Ok(FlowHash {
            ring_count,
            key,
            funcs,
            table,
        })
    }

    /// Change the RX flow hash configuration.
    ///
    /// Returns the id of the newly allocated context when the builder asked
    /// for one, [`RssContext::NONE`] otherwise. Parameters, hash function
    /// and key size are all checked before the set command is issued.
    ///
    /// # Example
    ///
    /// ```ignore
    /// ethtool.set_flow_hash("eth0", |c| c.equal(0, 4).hash_func("toeplitz"))?;
    /// ethtool.set_flow_hash("eth0", |c| c.delete(RssContext(1)))?;
    /// ```
    pub fn set_flow_hash(
        &self,
        ifname: &str,
        configure: impl FnOnce(FlowHashBuilder) -> FlowHashBuilder,
    ) -> Result<RssContext> {
        let ifname = IfName::new(ifname)?;
        let config = configure(FlowHashBuilder::new());
        config.validate()?;

        let ring_count = self.ring_count(&ifname)?;
        debug!(%ifname, ring_count, context = %config.context, "setting RX flow hash");

        // Probe the default context; an ALLOC context cannot be queried.
        let mut probe = EthtoolRxfh {
            cmd: Command::GRssh.code(),
            ..Default::default()
        };
        if let Err(e) = self.issue_struct(&ifname, "get RX flow hash indir size and key size", &mut probe) {
            if e.is_not_supported()
                && config.is_table_only()
                && config.context.is_default()
                && let Some(action) = &config.action
            {
                debug!(%ifname, "RSS set unsupported, using legacy indirection table");
                self.set_indir_legacy(&ifname, action)?;
                return Ok(RssContext::NONE);
            }
            return Err(e);
        }
        check_rxfh_sizes(&probe)?;

        let hfunc = match &config.hash_func {
            Some(name) => self.resolve_hash_func(&ifname, name, probe.hfunc)?,
            None => 0,
        };

        let key = config.key.as_deref().unwrap_or_default();
        if !key.is_empty() {
            if probe.key_size == 0 {
                return Err(Error::NotSupported("changing the RSS hash key".to_string()));
            }
            if key.len() != probe.key_size as usize {
                return Err(Error::KeySizeMismatch {
                    expected: probe.key_size as usize,
                    actual: key.len(),
                });
            }
        }

        // Only Equal/Weighted carry table entries; Default and Delete send none.
        let table_len = match &config.action {
            Some(action) if action.writes_table() => {
                if probe.indir_size == 0 {
                    return Err(Error::NotSupported(
                        "changing the RX flow hash indirection table".to_string(),
                    ));
                }
                probe.indir_size
            }
            _ => 0,
        };
        let table_bytes = table_byte_size(table_len);

        let header = EthtoolRxfh {
            cmd: Command::SRssh.code(),
            rss_context: config.context.id(),
            indir_size: RXFH_INDIR_NO_CHANGE,
            key_size: key.len() as u32,
            hfunc,
            ..Default::default()
        };
        let mut buf = CommandBuffer::new(&header, table_bytes + key.len())?;

        if let Some(action) = &config.action {
            let table = buf.u32s_mut("indirection table", 0, table_len as usize)?;
            let filled = action.fill(table)?;
            let mut header = buf.header()?;
            header.indir_size = match action {
                // A zero size on a non-default context deletes it.
                FillAction::Delete => 0,
                _ => filled,
            };
            buf.set_header(&header)?;
            debug!(%ifname, ?action, indir_size = header.indir_size, "filled indirection table");
        }

        if !key.is_empty() {
            buf.trailing_mut("hash key", table_bytes, key.len())?
                .copy_from_slice(key);
        }

        self.issue(&ifname, "set RX flow hash configuration", buf.as_mut_bytes())?;

        if config.context.is_new() {
            let created = RssContext(buf.header()?.rss_context);
            debug!(%ifname, context = %created, "allocated RSS context");
            return Ok(created);
        }
        Ok(RssContext::NONE)
    }

    /// Map a hash function name to its `hfunc` bit.
    fn resolve_hash_func(&self, ifname: &IfName, name: &str, supported: u8) -> Result<u8> {
        if supported == 0 {
            return Err(Error::NotSupported(
                "selecting the RSS hash function".to_string(),
            ));
        }

        let names = self.get_string_set(ifname.as_str(), StringSetId::RssHashFuncs)?;
        names
            .index_of(name)
            .and_then(|bit| 1u8.checked_shl(bit))
            .ok_or_else(|| Error::UnknownHashFunction {
                name: name.to_string(),
            })
    }

    /// Size of the legacy indirection table.
    fn indir_legacy_size(&self, ifname: &IfName) -> Result<u32> {
        let mut probe = EthtoolRxfhIndir {
            cmd: Command::GRxfhIndir.code(),
            size: 0,
        };
        self.issue_struct(ifname, "get RX flow hash indirection table size", &mut probe)?;
        if probe.size == 0 {
            return Err(Error::NotSupported(
                "RX flow hash indirection table".to_string(),
            ));
        }
        check_indir_size(probe.size)?;
        Ok(probe.size)
    }

    fn get_indir_legacy(&self, ifname: &IfName) -> Result<IndirectTable> {
        let size = self.indir_legacy_size(ifname)?;

        let header = EthtoolRxfhIndir {
            cmd: Command::GRxfhIndir.code(),
            size,
        };
        let mut buf = CommandBuffer::new(&header, table_byte_size(size))?;
        self.issue(ifname, "get RX flow hash indirection table", buf.as_mut_bytes())?;

        let returned = buf.header()?.size;
        Ok(IndirectTable::from(buf.read_u32s(
            "indirection table",
            0,
            returned as usize,
        )?))
    }

    fn set_indir_legacy(&self, ifname: &IfName, action: &FillAction) -> Result<()> {
        let size = self.indir_legacy_size(ifname)?;

        let header = EthtoolRxfhIndir {
            cmd: Command::SRxfhIndir.code(),
            size,
        };
        let mut buf = CommandBuffer::new(&header, table_byte_size(size))?;
        let filled = action.fill(buf.u32s_mut("indirection table", 0, size as usize)?)?;

        let mut header = buf.header()?;
        header.size = filled;
        buf.set_header(&header)?;

        self.issue(ifname, "set RX flow hash indirection table", buf.as_mut_bytes())
    }
}

fn check_indir_size(indir_size: u32) -> Result<()> {
    if indir_size > MAX_INDIR_SIZE {
        return Err(Error::OutOfRange {
            what: "RX flow hash indirection table",
            needed: table_byte_size(indir_size),
            available: table_byte_size(MAX_INDIR_SIZE),
        });
    }
    Ok(())
}

/// Reject device-reported sizes before they size an allocation.
fn check_rxfh_sizes(probe: &EthtoolRxfh) -> Result<()> {
    check_indir_size(probe.indir_size)?;
    if probe.key_size > MAX_RSS_KEY_SIZE {
        return Err(Error::OutOfRange {
            what: "RX flow hash key",
            needed: probe.key_size as usize,
            available: MAX_RSS_KEY_SIZE as usize,
        });
    }
    Ok(())
}

/// Expand an `hfunc` bitmask over the device's full function name set.
fn hash_funcs(names: &crate::ethtool::StringSet, hfunc: u8) -> BTreeMap<String, bool> {
    names
        .iter()
        .map(|(bit, name)| {
            let on = bit < 8 && hfunc & (1 << bit) != 0;
            (name.to_string(), on)
        })
        .collect()
}
