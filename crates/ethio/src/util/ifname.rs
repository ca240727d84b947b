//! Interface name validation and marshaling.

use std::fmt;

use crate::error::{Error, Result};

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = libc::IFNAMSIZ;

/// Validate an interface name.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInterfaceName("empty name".to_string()));
    }

    if name.len() >= IFNAMSIZ {
        return Err(Error::InvalidInterfaceName(format!(
            "{} is too long (max {} chars)",
            name,
            IFNAMSIZ - 1
        )));
    }

    if name.contains('/') || name.contains('\0') {
        return Err(Error::InvalidInterfaceName(format!(
            "{:?} contains invalid characters",
            name
        )));
    }

    if name.chars().any(|c| c.is_whitespace()) {
        return Err(Error::InvalidInterfaceName(format!(
            "{:?} contains whitespace",
            name
        )));
    }

    Ok(())
}

/// A validated interface name, ready to be copied into an `ifreq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IfName(String);

impl IfName {
    /// Validate and wrap an interface name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a NUL-padded `ifr_name` field.
    pub fn to_ifr_name(&self) -> [libc::c_char; IFNAMSIZ] {
        let mut out = [0 as libc::c_char; IFNAMSIZ];
        for (dst, src) in out.iter_mut().zip(self.0.as_bytes()) {
            *dst = *src as libc::c_char;
        }
        out
    }
}

impl fmt::Display for IfName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for IfName {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl TryFrom<String> for IfName {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl TryFrom<&String> for IfName {
    type Error = Error;

    fn try_from(name: &String) -> Result<Self> {
        Self::new(name.as_str())
    }
}

impl TryFrom<&IfName> for IfName {
    type Error = Error;

    fn try_from(name: &IfName) -> Result<Self> {
        Ok(name.clone())
    }
}

/// Convert a NUL-terminated C char array to a `String`.
///
/// Reads up to the first NUL, or the whole slice if there is none.
pub fn c_str_to_string(raw: &[u8]) -> String {
    let end = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(validate("eth0").is_ok());
        assert!(validate("lo").is_ok());
        assert!(validate("enp3s0f1np1").is_ok());

        assert!(validate("").is_err());
        assert!(validate("this_name_is_way_too_long_for_an_interface").is_err());
        assert!(validate("eth/0").is_err());
        assert!(validate("eth 0").is_err());
        assert!(validate("eth\00").is_err());
    }

    #[test]
    fn test_ifr_name_is_nul_padded() {
        let name = IfName::new("eth0").unwrap();
        let raw = name.to_ifr_name();
        assert_eq!(raw[..4], [b'e' as libc::c_char, b't' as _, b'h' as _, b'0' as _]);
        assert!(raw[4..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_longest_name_keeps_terminator() {
        let name = IfName::new("a".repeat(IFNAMSIZ - 1)).unwrap();
        assert_eq!(name.to_ifr_name()[IFNAMSIZ - 1], 0);
    }

    #[test]
    fn test_c_str_to_string() {
        assert_eq!(c_str_to_string(&[]), "");
        assert_eq!(c_str_to_string(b"0.5-4\0\0\0"), "0.5-4");
        assert_eq!(c_str_to_string(b"1.6\0.0-22-generic"), "1.6");
        assert_eq!(c_str_to_string(b"ixgbe"), "ixgbe");
    }
}
