//! RSS contexts.

use std::fmt;

/// Indirection size value meaning "leave the table unchanged".
///
/// Same bit pattern as [`RssContext::ALLOC`], but it lives in the
/// `indir_size` field and means something else.
pub const RXFH_INDIR_NO_CHANGE: u32 = 0xffff_ffff;

/// An RSS context identifier.
///
/// Context 0 is the device's default RSS state. [`RssContext::ALLOC`] asks
/// the device to create a new context and report its id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RssContext(pub u32);

impl RssContext {
    /// The default context.
    pub const NONE: RssContext = RssContext(0);

    /// Allocate a new context (`ETH_RXFH_CONTEXT_ALLOC`).
    pub const ALLOC: RssContext = RssContext(0xffff_ffff);

    /// Whether this requests allocation of a new context.
    pub const fn is_new(self) -> bool {
        self.0 == Self::ALLOC.0
    }

    /// Whether this is the default context.
    pub const fn is_default(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Raw id.
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl From<u32> for RssContext {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for RssContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_new() {
            f.write_str("new")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinguished_values() {
        assert!(RssContext::ALLOC.is_new());
        assert!(!RssContext::NONE.is_new());
        assert!(RssContext::NONE.is_default());
        assert!(!RssContext(3).is_new());
        assert_eq!(RssContext::ALLOC.id(), RXFH_INDIR_NO_CHANGE);
        assert_eq!(RssContext::default(), RssContext::NONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(RssContext(4).to_string(), "4");
        assert_eq!(RssContext::ALLOC.to_string(), "new");
    }
}
