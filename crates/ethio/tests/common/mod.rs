//! Common test utilities for integration tests.
//!
//! Provides `FakeDevice`, a [`Transport`] that answers ethtool commands
//! from per-command handlers and records every request it sees.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use ethio::ethtool::abi::{ETH_GSTRING_LEN, EthtoolGstrings, EthtoolRxnfc, EthtoolSsetInfo};
use ethio::{Command, IfName, StringSetId, Transport};
use zerocopy::{FromBytes, IntoBytes};

type Handler = Box<dyn Fn(&mut [u8]) -> io::Result<()>>;

/// A scripted network device.
///
/// Commands without a handler fail with `EOPNOTSUPP`, like a driver that
/// does not implement them.
#[derive(Default)]
pub struct FakeDevice {
    handlers: HashMap<u32, Handler>,
    string_sets: HashMap<u32, Vec<String>>,
    requests: RefCell<Vec<Vec<u8>>>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `cmd` with `handler`.
    pub fn on(mut self, cmd: Command, handler: impl Fn(&mut [u8]) -> io::Result<()> + 'static) -> Self {
        self.handlers.insert(cmd.code(), Box::new(handler));
        self
    }

    /// Fail `cmd` with `errno`.
    #[allow(dead_code)]
    pub fn fail(self, cmd: Command, errno: i32) -> Self {
        self.on(cmd, move |_| Err(io::Error::from_raw_os_error(errno)))
    }

    /// Report `n` RX rings.
    pub fn ring_count(self, n: u64) -> Self {
        self.on(Command::GRxRings, move |data| {
            let (mut req, _) = EthtoolRxnfc::read_from_prefix(data).unwrap();
            req.data = n;
            req.write_to_prefix(data).unwrap();
            Ok(())
        })
    }

    /// Serve a string set through `ETHTOOL_GSSET_INFO` and `ETHTOOL_GSTRINGS`.
    pub fn strings(mut self, set: StringSetId, names: &[&str]) -> Self {
        self.string_sets
            .insert(set as u32, names.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Command codes in the order they were issued.
    pub fn commands(&self) -> Vec<u32> {
        self.requests
            .borrow()
            .iter()
            .map(|r| u32::from_ne_bytes([r[0], r[1], r[2], r[3]]))
            .collect()
    }

    /// Whether `cmd` was issued at all.
    pub fn issued(&self, cmd: Command) -> bool {
        self.commands().contains(&cmd.code())
    }

    /// Request buffers for `cmd`, as sent (before the device answered).
    pub fn requests(&self, cmd: Command) -> Vec<Vec<u8>> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| u32::from_ne_bytes([r[0], r[1], r[2], r[3]]) == cmd.code())
            .cloned()
            .collect()
    }

    fn sset_info(&self, data: &mut [u8]) -> io::Result<()> {
        let (mut hdr, _) = EthtoolSsetInfo::read_from_prefix(data).unwrap();
        let set = hdr.sset_mask.trailing_zeros();
        let Some(names) = self.string_sets.get(&set) else {
            hdr.sset_mask = 0;
            hdr.write_to_prefix(data).unwrap();
            return Ok(());
        };
        hdr.write_to_prefix(data).unwrap();
        let len = names.len() as u32;
        data[16..20].copy_from_slice(len.as_bytes());
        Ok(())
    }

    fn gstrings(&self, data: &mut [u8]) -> io::Result<()> {
        let (mut hdr, _) = EthtoolGstrings::read_from_prefix(data).unwrap();
        let names = self
            .string_sets
            .get(&hdr.string_set)
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EOPNOTSUPP))?;
        let count = names.len().min(hdr.len as usize);
        for (i, name) in names.iter().take(count).enumerate() {
            let off = 12 + i * ETH_GSTRING_LEN;
            data[off..off + ETH_GSTRING_LEN].fill(0);
            data[off..off + name.len()].copy_from_slice(name.as_bytes());
        }
        hdr.len = count as u32;
        hdr.write_to_prefix(data).unwrap();
        Ok(())
    }
}

impl Transport for FakeDevice {
    fn ioctl(&self, _ifname: &IfName, data: &mut [u8]) -> io::Result<()> {
        self.requests.borrow_mut().push(data.to_vec());
        let cmd = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);

        if let Some(handler) = self.handlers.get(&cmd) {
            return handler(data);
        }
        if !self.string_sets.is_empty() {
            if cmd == Command::GSsetInfo.code() {
                return self.sset_info(data);
            }
            if cmd == Command::GStrings.code() {
                return self.gstrings(data);
            }
        }
        Err(io::Error::from_raw_os_error(libc::EOPNOTSUPP))
    }
}

/// Read the `i`th 32-bit word of a buffer.
#[allow(dead_code)]
pub fn word(data: &[u8], i: usize) -> u32 {
    u32::from_ne_bytes(data[i * 4..i * 4 + 4].try_into().unwrap())
}

/// Write the `i`th 32-bit word of a buffer.
#[allow(dead_code)]
pub fn put_word(data: &mut [u8], i: usize, v: u32) {
    data[i * 4..i * 4 + 4].copy_from_slice(&v.to_ne_bytes());
}
