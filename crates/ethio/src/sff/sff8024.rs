//! SFF-8024 code tables shared by the SFP and QSFP memory maps.

use crate::ethtool::ModuleKind;

/// Unknown or unspecified module.
pub const ID_UNKNOWN: u8 = 0x00;
/// SFP/SFP+/SFP28.
pub const ID_SFP: u8 = 0x03;
/// QSFP (INF-8438).
pub const ID_QSFP: u8 = 0x0c;
/// QSFP+ (SFF-8436/8636).
pub const ID_QSFP_PLUS: u8 = 0x0d;
/// QSFP28 (SFF-8636).
pub const ID_QSFP28: u8 = 0x11;

/// Describe an identifier byte.
pub fn identifier(code: u8) -> &'static str {
    match code {
        ID_UNKNOWN => "(no module present, unknown, or unspecified)",
        0x01 => "(GBIC)",
        0x02 => "(module soldered to motherboard)",
        ID_SFP => "(SFP)",
        0x04 => "(300 pin XBI)",
        0x05 => "(XENPAK)",
        0x06 => "(XFP)",
        0x07 => "(XFF)",
        0x08 => "(XFP-E)",
        0x09 => "(XPAK)",
        0x0a => "(X2)",
        0x0b => "(DWDM-SFP)",
        ID_QSFP => "(QSFP)",
        ID_QSFP_PLUS => "(QSFP+)",
        0x0e => "(CXP)",
        0x0f => "(Shielded Mini Multilane HD 4X)",
        0x10 => "(Shielded Mini Multilane HD 8X)",
        ID_QSFP28 => "(QSFP28)",
        0x12 => "(CXP2/CXP28)",
        0x13 => "(CDFP Style 1/Style 2)",
        0x14 => "(Shielded Mini Multilane HD 4X Fanout Cable)",
        0x15 => "(Shielded Mini Multilane HD 8X Fanout Cable)",
        0x16 => "(CDFP Style 3)",
        0x17 => "(microQSFP)",
        _ => "(reserved or unknown)",
    }
}

/// Describe a connector byte.
pub fn connector(code: u8) -> &'static str {
    match code {
        0x00 => "(unknown or unspecified)",
        0x01 => "(SC)",
        0x02 => "(Fibre Channel Style 1 copper)",
        0x03 => "(Fibre Channel Style 2 copper)",
        0x04 => "(BNC/TNC)",
        0x05 => "(Fibre Channel coaxial headers)",
        0x06 => "(FibreJack)",
        0x07 => "(LC)",
        0x08 => "(MT-RJ)",
        0x09 => "(MU)",
        0x0a => "(SG)",
        0x0b => "(Optical pigtail)",
        0x0c => "(MPO Parallel Optic)",
        0x0d => "(MPO Parallel Optic - 2x16)",
        0x20 => "(HSSDC II)",
        0x21 => "(Copper pigtail)",
        0x22 => "(RJ45)",
        0x23 => "(No separable connector)",
        0x24 => "(MXC 2x16)",
        _ => "(reserved or unknown)",
    }
}

/// Describe an encoding byte.
///
/// Codes 4h to 6h mean different things in the SFP and QSFP memory maps,
/// so the module kind selects the table.
pub fn encoding(code: u8, kind: ModuleKind) -> &'static str {
    let qsfp = matches!(kind, ModuleKind::Sff8636 | ModuleKind::Sff8436);
    let sfp = matches!(kind, ModuleKind::Sff8079 | ModuleKind::Sff8472);
    match code {
        0x00 => "(unspecified)",
        0x01 => "(8B/10B)",
        0x02 => "(4B/5B)",
        0x03 => "(NRZ)",
        0x04 if sfp => "(Manchester)",
        0x04 if qsfp => "(SONET Scrambled)",
        0x05 if sfp => "(SONET Scrambled)",
        0x05 if qsfp => "(64B/66B)",
        0x06 if sfp => "(64B/66B)",
        0x06 if qsfp => "(Manchester)",
        0x07 => "(256B/257B (transcoded FEC-enabled data))",
        0x08 => "(PAM4)",
        _ => "(reserved or unknown)",
    }
}

/// Format a code byte with its description, e.g. `0x03 (SFP)`.
pub fn describe(code: u8, text: &str) -> String {
    format!("0x{:02x} {}", code, text)
}
