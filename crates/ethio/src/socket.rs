//! Ethtool control socket.
//!
//! Every ethtool command is a single `SIOCETHTOOL` ioctl on an ordinary
//! datagram socket, addressed by interface name. The payload is a
//! command-coded buffer whose first 32 bits select the operation; this
//! layer never interprets anything past that.

use std::cell::Cell;
use std::io;
use std::marker::PhantomData;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use crate::error::{Error, Result};
use crate::util::IfName;

/// `SIOCETHTOOL` request code (linux/sockios.h).
pub const SIOCETHTOOL: libc::c_ulong = 0x8946;

/// A device control channel able to issue ethtool ioctls.
///
/// `data` is the complete command buffer, including the leading command
/// code. Implementations fill it in place and return the raw OS error
/// unchanged on failure.
pub trait Transport {
    /// Issue one ethtool command against `ifname`.
    fn ioctl(&self, ifname: &IfName, data: &mut [u8]) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn ioctl(&self, ifname: &IfName, data: &mut [u8]) -> io::Result<()> {
        (**self).ioctl(ifname, data)
    }
}

/// An `AF_INET`/`SOCK_DGRAM` socket used solely as an ioctl target.
///
/// The descriptor is closed on drop. A socket can move to another thread
/// but cannot be shared between threads; open one per caller instead.
///
/// ```compile_fail
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<ethio::EthtoolSocket>();
/// ```
///
/// ```compile_fail
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<ethio::Ethtool>();
/// ```
#[derive(Debug)]
pub struct EthtoolSocket {
    fd: OwnedFd,
    _not_sync: PhantomData<Cell<()>>,
}

impl EthtoolSocket {
    /// Open a new control socket.
    pub fn new() -> Result<Self> {
        // SAFETY: socket(2) takes no pointers; the result is checked below.
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0) };
        if fd < 0 {
            return Err(Error::from_io(io::Error::last_os_error(), "socket"));
        }

        // SAFETY: `fd` was just returned by socket(2) and is owned by nobody else.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self {
            fd,
            _not_sync: PhantomData,
        })
    }
}

impl AsRawFd for EthtoolSocket {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.fd.as_raw_fd()
    }
}

impl Transport for EthtoolSocket {
    fn ioctl(&self, ifname: &IfName, data: &mut [u8]) -> io::Result<()> {
        if data.len() < 4 {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }

        // SAFETY: `ifreq` is plain C data for which all-zero bytes are valid.
        let mut ifr: libc::ifreq = unsafe { std::mem::zeroed() };
        ifr.ifr_name = ifname.to_ifr_name();
        ifr.ifr_ifru.ifru_data = data.as_mut_ptr().cast();

        // SAFETY: `ifr` points at `data`, which stays borrowed mutably for the
        // whole call; the kernel never writes past the size encoded in it.
        let ret = unsafe { libc::ioctl(self.fd.as_raw_fd(), SIOCETHTOOL, &mut ifr) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_buffer_rejected() {
        let Ok(sock) = EthtoolSocket::new() else {
            return;
        };
        let name = IfName::new("lo").unwrap();
        let err = sock.ioctl(&name, &mut [0u8; 2]).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
    }

    #[test]
    fn test_socket_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<EthtoolSocket>();
        assert_send::<crate::Ethtool>();
    }
}
