//! Transceiver EEPROM decoders.
//!
//! [`ModuleEeprom`] holds the raw bytes read with
//! [`Ethtool::get_module_eeprom`](crate::Ethtool::get_module_eeprom);
//! [`ModuleEeprom::decode`] turns them into structured fields according to
//! the memory map the driver reported.
//!
//! # Example
//!
//! ```no_run
//! use ethio::Ethtool;
//! use ethio::sff::ModuleInfo;
//!
//! let ethtool = Ethtool::new()?;
//! let eeprom = ethtool.get_module_eeprom("eth0")?;
//! match eeprom.decode()? {
//!     ModuleInfo::Sfp(id) => println!("{} {}", id.vendor_name, id.vendor_pn),
//!     ModuleInfo::SfpWithDiagnostics { id, diagnostics } => {
//!         println!("{} {}", id.vendor_name, id.vendor_pn);
//!         if let Some(dom) = diagnostics {
//!             println!("temperature: {:.2} C", dom.temperature.value);
//!         }
//!     }
//!     ModuleInfo::Qsfp(qsfp) => println!("{}", qsfp.identifier),
//! }
//! # Ok::<(), ethio::Error>(())
//! ```

pub mod sff8024;
pub mod sff8079;
pub mod sff8472;
pub mod sff8636;

pub use sff8079::Sff8079;
pub use sff8472::{Calibration, Diagnostics, Measurement, RxPowerKind};
pub use sff8636::{QsfpDetails, Sff8636};

use crate::error::{Error, Result};
use crate::ethtool::{ModuleEeprom, ModuleKind};

/// Decoded module EEPROM.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ModuleInfo {
    /// SFP serial ID page only.
    Sfp(Sff8079),
    /// SFP serial ID page plus the diagnostics page, if the module
    /// implements digital diagnostics monitoring.
    SfpWithDiagnostics {
        /// Serial ID page.
        id: Sff8079,
        /// Diagnostics page; `None` when DOM is not implemented.
        diagnostics: Option<Diagnostics>,
    },
    /// QSFP family module.
    Qsfp(Sff8636),
}

impl ModuleEeprom {
    /// Decode the EEPROM according to its memory map.
    pub fn decode(&self) -> Result<ModuleInfo> {
        match self.kind {
            ModuleKind::Sff8079 => Ok(ModuleInfo::Sfp(Sff8079::decode(&self.data)?)),
            ModuleKind::Sff8472 => Ok(ModuleInfo::SfpWithDiagnostics {
                id: Sff8079::decode(&self.data)?,
                diagnostics: Diagnostics::decode(&self.data)?,
            }),
            ModuleKind::Sff8636 | ModuleKind::Sff8436 => {
                Ok(ModuleInfo::Qsfp(Sff8636::decode(&self.data)?))
            }
            ModuleKind::Other(kind) => Err(Error::NotSupported(format!(
                "module EEPROM type 0x{:x}",
                kind
            ))),
        }
    }
}

pub(crate) fn require_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(Error::Truncated {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Space-padded ASCII field with padding removed.
pub(crate) fn ascii_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

pub(crate) fn oui(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Collect the names of all set bits from a `(byte offset, bit, name)` table.
pub(crate) fn bit_names(data: &[u8], table: &[(usize, u8, &str)]) -> Vec<String> {
    table
        .iter()
        .filter(|(offset, bit, _)| data[*offset] & (1u8 << *bit) != 0)
        .map(|(_, _, name)| name.to_string())
        .collect()
}
