//! Error types for ethtool operations.

use std::io;

use crate::rxfh::FillError;

/// Result type for ethtool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during ethtool operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The ioctl itself failed; `errno` is the raw value the kernel returned.
    #[error("{operation}: {message} (errno {errno})")]
    Ioctl {
        /// The operation that failed.
        operation: String,
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// A computed offset would read or write past the command buffer.
    #[error("{what} out of range: need {needed} bytes, buffer has {available}")]
    OutOfRange {
        /// The region that did not fit.
        what: &'static str,
        /// End offset of the region.
        needed: usize,
        /// Size of the allocation.
        available: usize,
    },

    /// Indirection table fill policy rejected its parameters.
    #[error("fill RX flow hash indirection table: {0}")]
    Fill(#[from] FillError),

    /// Requested RSS hash function is not in the device's string set.
    #[error("unknown hash function `{name}`")]
    UnknownHashFunction {
        /// The requested function name.
        name: String,
    },

    /// Requested feature is not in the device's feature string set.
    #[error("unsupported feature `{name}`")]
    UnknownFeature {
        /// The requested feature name.
        name: String,
    },

    /// RSS hash key length does not match the device key size.
    #[error("hash key is {actual} bytes, device expects {expected}")]
    KeySizeMismatch {
        /// Key size reported by the device.
        expected: usize,
        /// Length of the supplied key.
        actual: usize,
    },

    /// Request is well-formed but asks for nothing sensible.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Operation not supported.
    #[error("operation not supported: {0}")]
    NotSupported(String),

    /// Interface name cannot be passed to the kernel.
    #[error("invalid interface name: {0}")]
    InvalidInterfaceName(String),

    /// String set is larger than the supported maximum.
    #[error("too many strings: device reported {count}, at most {max} supported")]
    TooManyStrings {
        /// Number of strings the device reported.
        count: u32,
        /// Maximum supported.
        max: u32,
    },

    /// Data was shorter than its format requires.
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// EEPROM identifier byte does not match the requested decoder.
    #[error("unknown module identifier 0x{0:02x}")]
    UnknownModule(u8),

    /// Parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create an ioctl error from a positive errno value.
    pub fn from_errno(errno: i32, operation: impl Into<String>) -> Self {
        let message = io::Error::from_raw_os_error(errno).to_string();
        Self::Ioctl {
            operation: operation.into(),
            errno,
            message,
        }
    }

    /// Wrap an I/O error returned by a transport.
    ///
    /// Errors carrying an OS error code become [`Error::Ioctl`]; others stay
    /// [`Error::Io`].
    pub fn from_io(err: io::Error, operation: impl Into<String>) -> Self {
        match err.raw_os_error() {
            Some(errno) => Self::from_errno(errno, operation),
            None => Self::Io(err),
        }
    }

    /// Replace the operation context of an ioctl error.
    ///
    /// Other errors are returned unchanged.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Ioctl { errno, message, .. } => Self::Ioctl {
                operation: operation.into(),
                errno,
                message,
            },
            other => other,
        }
    }

    /// Check if the device or driver does not support the operation.
    pub fn is_not_supported(&self) -> bool {
        match self {
            Self::Ioctl { errno, .. } => *errno == libc::EOPNOTSUPP || *errno == libc::ENOTSUP,
            Self::NotSupported(_) => true,
            _ => false,
        }
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Ioctl { errno, .. } => matches!(*errno, libc::EPERM | libc::EACCES),
            _ => false,
        }
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Ioctl { errno, .. } => matches!(*errno, libc::ENOENT | libc::ENODEV),
            _ => false,
        }
    }

    /// Check if this is a capacity error.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Get the errno value if this is an ioctl error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Ioctl { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}
