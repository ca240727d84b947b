//! SFF-8636 / SFF-8436 QSFP memory map (lower page and upper page 00h).

use super::{ascii_field, oui, require_len, sff8024};
use crate::error::Result;
use crate::ethtool::ModuleKind;

/// Length of the dump that is decoded.
pub const ID_LEN: usize = 256;

const ID_OFFSET: usize = 0x00;
const PWR_MODE_OFFSET: usize = 0x5d;
const HIGH_PWR_ENABLE: u8 = 1 << 2;

const EXT_ID_OFFSET: usize = 0x81;
const EXT_ID_PWR_CLASS_MASK: u8 = 0xc0;
const EXT_ID_PWR_CLASS_1: u8 = 0x00;
const EXT_ID_PWR_CLASS_2: u8 = 0x40;
const EXT_ID_PWR_CLASS_3: u8 = 0x80;
const EXT_ID_PWR_CLASS_4: u8 = 0xc0;
const EXT_ID_CDR_TX_MASK: u8 = 0x08;
const EXT_ID_CDR_RX_MASK: u8 = 0x04;
const EXT_ID_EPWR_CLASS_MASK: u8 = 0x03;
const EXT_ID_PWR_CLASS_5: u8 = 0x01;
const EXT_ID_PWR_CLASS_6: u8 = 0x02;
const EXT_ID_PWR_CLASS_7: u8 = 0x03;

const CTOR_OFFSET: usize = 0x82;
const ETHERNET_COMP_OFFSET: usize = 0x83;
const SONET_COMP_OFFSET: usize = 0x84;
const SAS_COMP_OFFSET: usize = 0x85;
const GIGE_COMP_OFFSET: usize = 0x86;
const FC_LEN_OFFSET: usize = 0x87;
const FC_SPEED_OFFSET: usize = 0x8a;
const ENCODING_OFFSET: usize = 0x8b;
const BR_NOMINAL_OFFSET: usize = 0x8c;
const SM_LEN_OFFSET: usize = 0x8e;
const OM3_LEN_OFFSET: usize = 0x8f;
const OM2_LEN_OFFSET: usize = 0x90;
const OM1_LEN_OFFSET: usize = 0x91;
const CBL_LEN_OFFSET: usize = 0x92;
const VENDOR_NAME: std::ops::RangeInclusive<usize> = 0x94..=0xa3;
const VENDOR_OUI: std::ops::RangeInclusive<usize> = 0xa5..=0xa7;
const VENDOR_PN: std::ops::RangeInclusive<usize> = 0xa8..=0xb7;
const VENDOR_REV: std::ops::RangeInclusive<usize> = 0xb8..=0xb9;
const OPTION_1_OFFSET: usize = 0xc0;
const VENDOR_SN: std::ops::RangeInclusive<usize> = 0xc4..=0xd3;
const DATE_CODE: std::ops::RangeInclusive<usize> = 0xd4..=0xdb;

const ETHERNET_RSRVD: u8 = 1 << 7;

/// Decoded QSFP identification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sff8636 {
    /// Identifier, e.g. `0x11 (QSFP28)`.
    pub identifier: String,
    /// Remaining fields; only present for QSFP, QSFP+ and QSFP28.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub details: Option<QsfpDetails>,
}

/// Fields decoded for QSFP family identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QsfpDetails {
    /// Raw extended identifier byte.
    pub ext_identifier: String,
    /// Power class, CDR and high power mode descriptions.
    pub ext_identifier_descr: Vec<String>,
    /// Connector with description.
    pub connector: String,
    /// Raw compliance code bytes 131 to 138.
    pub transceiver_codes: String,
    /// Highest priority compliance name, if any code is set.
    pub transceiver_type: Option<String>,
    /// Encoding with description.
    pub encoding: String,
    /// Nominal bit rate, Mbps.
    pub br_nominal_mbps: u32,
    /// Single-mode fiber length, km.
    pub length_smf_km: u32,
    /// OM3 50um fiber length, m.
    pub length_om3_m: u32,
    /// OM2 50um fiber length, m.
    pub length_om2_m: u32,
    /// OM1 62.5um fiber length, m.
    pub length_om1_m: u32,
    /// Copper or active cable length, m.
    pub length_copper_m: u32,
    /// Vendor name.
    pub vendor_name: String,
    /// Vendor IEEE OUI, `xx:xx:xx`.
    pub vendor_oui: String,
    /// Vendor part number.
    pub vendor_pn: String,
    /// Vendor revision.
    pub vendor_rev: String,
    /// Vendor serial number.
    pub vendor_sn: String,
    /// Vendor date code (`YYMMDDLL`).
    pub date_code: String,
}

impl Sff8636 {
    /// Decode a QSFP EEPROM dump.
    ///
    /// Identifiers outside the QSFP family decode to the identifier alone.
    pub fn decode(id: &[u8]) -> Result<Self> {
        require_len(id, ID_LEN)?;
        let identifier = sff8024::describe(id[ID_OFFSET], sff8024::identifier(id[ID_OFFSET]));
        let details = matches!(
            id[ID_OFFSET],
            sff8024::ID_QSFP | sff8024::ID_QSFP_PLUS | sff8024::ID_QSFP28
        )
        .then(|| QsfpDetails::decode(id));
        Ok(Self {
            identifier,
            details,
        })
    }
}

impl QsfpDetails {
    fn decode(id: &[u8]) -> Self {
        Self {
            ext_identifier: format!("0x{:02x}", id[EXT_ID_OFFSET]),
            ext_identifier_descr: ext_identifier_descr(id),
            connector: sff8024::describe(id[CTOR_OFFSET], sff8024::connector(id[CTOR_OFFSET])),
            transceiver_codes: id[ETHERNET_COMP_OFFSET..=FC_SPEED_OFFSET]
                .iter()
                .map(|b| format!("0x{:02x}", b))
                .collect::<Vec<_>>()
                .join(" "),
            transceiver_type: transceiver_type(id).map(str::to_string),
            encoding: sff8024::describe(
                id[ENCODING_OFFSET],
                sff8024::encoding(id[ENCODING_OFFSET], ModuleKind::Sff8636),
            ),
            br_nominal_mbps: u32::from(id[BR_NOMINAL_OFFSET]) * 100,
            length_smf_km: u32::from(id[SM_LEN_OFFSET]),
            length_om3_m: u32::from(id[OM3_LEN_OFFSET]) * 2,
            length_om2_m: u32::from(id[OM2_LEN_OFFSET]),
            length_om1_m: u32::from(id[OM1_LEN_OFFSET]),
            length_copper_m: u32::from(id[CBL_LEN_OFFSET]),
            vendor_name: ascii_field(&id[VENDOR_NAME]),
            vendor_oui: oui(&id[VENDOR_OUI]),
            vendor_pn: ascii_field(&id[VENDOR_PN]),
            vendor_rev: ascii_field(&id[VENDOR_REV]),
            vendor_sn: ascii_field(&id[VENDOR_SN]),
            date_code: ascii_field(&id[DATE_CODE]),
        }
    }
}

fn ext_identifier_descr(id: &[u8]) -> Vec<String> {
    let ext = id[EXT_ID_OFFSET];
    let mut descr = Vec::new();

    match ext & EXT_ID_PWR_CLASS_MASK {
        EXT_ID_PWR_CLASS_1 => descr.push("1.5W max. Power consumption"),
        EXT_ID_PWR_CLASS_2 => descr.push("2.0W max. Power consumption"),
        EXT_ID_PWR_CLASS_3 => descr.push("2.5W max. Power consumption"),
        EXT_ID_PWR_CLASS_4 => descr.push("3.5W max. Power consumption"),
        _ => {}
    }

    descr.push(if ext & EXT_ID_CDR_TX_MASK != 0 {
        "CDR present in TX"
    } else {
        "No CDR in TX"
    });
    descr.push(if ext & EXT_ID_CDR_RX_MASK != 0 {
        "CDR present in RX"
    } else {
        "No CDR in RX"
    });

    // Legacy (0) adds nothing beyond classes 1 to 4.
    match ext & EXT_ID_EPWR_CLASS_MASK {
        EXT_ID_PWR_CLASS_5 => descr.push("4.0W max. Power consumption"),
        EXT_ID_PWR_CLASS_6 => descr.push("4.5W max. Power consumption"),
        EXT_ID_PWR_CLASS_7 => descr.push("5.0W max. Power consumption"),
        _ => {}
    }

    descr.push(if id[PWR_MODE_OFFSET] & HIGH_PWR_ENABLE != 0 {
        "High Power Class (> 3.5 W) enabled"
    } else {
        "High Power Class (> 3.5 W) not enabled"
    });

    descr.into_iter().map(str::to_string).collect()
}

/// First matching compliance code, in decreasing order of precedence.
fn transceiver_type(id: &[u8]) -> Option<&'static str> {
    let eth = id[ETHERNET_COMP_OFFSET];
    let checks: [(u8, u8, &str); 7] = [
        (eth, 1 << 6, "10G Ethernet: 10G Base-LRM"),
        (eth, 1 << 5, "10G Ethernet: 10G Base-LR"),
        (eth, 1 << 4, "10G Ethernet: 10G Base-SR"),
        (eth, 1 << 3, "40G Ethernet: 40G Base-CR4"),
        (eth, 1 << 2, "40G Ethernet: 40G Base-SR4"),
        (eth, 1 << 1, "40G Ethernet: 40G Base-LR4"),
        (eth, 1 << 0, "40G Ethernet: 40G Active Cable (XLPPI)"),
    ];
    if let Some((_, _, name)) = checks.iter().find(|(byte, mask, _)| byte & mask != 0) {
        return Some(*name);
    }

    if eth & ETHERNET_RSRVD != 0 {
        return Some(extended_compliance(id[OPTION_1_OFFSET]));
    }

    let sonet = id[SONET_COMP_OFFSET];
    let sas = id[SAS_COMP_OFFSET];
    let gige = id[GIGE_COMP_OFFSET];
    let fc_len = id[FC_LEN_OFFSET];
    let checks: [(u8, u8, &str); 15] = [
        (sonet, 1 << 3, "40G OTN (OTU3B/OTU3C)"),
        (sonet, 1 << 2, "SONET: OC-48, long reach"),
        (sonet, 1 << 1, "SONET: OC-48, intermediate reach"),
        (sonet, 1 << 0, "SONET: OC-48, short reach"),
        (sas, 1 << 5, "SAS 6.0G"),
        (sas, 1 << 4, "SAS 3.0G"),
        (gige, 1 << 3, "Ethernet: 1000BASE-T"),
        (gige, 1 << 2, "Ethernet: 1000BASE-CX"),
        (gige, 1 << 1, "Ethernet: 1000BASE-LX"),
        (gige, 1 << 0, "Ethernet: 1000BASE-SX"),
        (fc_len, 1 << 7, "FC: very long distance (V)"),
        (fc_len, 1 << 6, "FC: short distance (S)"),
        (fc_len, 1 << 5, "FC: intermediate distance (I)"),
        (fc_len, 1 << 4, "FC: long distance (L)"),
        (fc_len, 1 << 3, "FC: medium distance (M)"),
    ];
    checks
        .iter()
        .find(|(byte, mask, _)| byte & mask != 0)
        .map(|(_, _, name)| *name)
}

/// SFF-8024 extended specification compliance codes.
fn extended_compliance(code: u8) -> &'static str {
    match code {
        0x01 => "100G Ethernet: 100G AOC or 25GAUI C2M AOC with worst BER of 5x10^(-5)",
        0x02 => "100G Ethernet: 100G Base-SR4 or 25GBase-SR",
        0x03 => "100G Ethernet: 100G Base-LR4",
        0x04 => "100G Ethernet: 100G Base-ER4",
        0x05 => "100G Ethernet: 100G Base-SR10",
        0x06 => "100G Ethernet: 100G CWDM4 MSA with FEC",
        0x07 => "100G Ethernet: 100G PSM4 Parallel SMF",
        0x08 => "100G Ethernet: 100G ACC or 25GAUI C2M ACC with worst BER of 5x10^(-5)",
        0x09 => "100G Ethernet: 100G CWDM4 MSA without FEC",
        0x0b => "100G Ethernet: 100G Base-CR4 or 25G Base-CR CA-L",
        0x0c => "25G Ethernet: 25G Base-CR CA-S",
        0x0d => "25G Ethernet: 25G Base-CR CA-N",
        0x10 => "40G Ethernet: 40G Base-ER4",
        0x11 => "4x10G Ethernet: 10G Base-SR",
        0x12 => "40G Ethernet: 40G PSM4 Parallel SMF",
        0x13 => "Ethernet: G959.1 profile P1I1-2D1 (10709 MBd, 2km, 1310nm SM)",
        0x14 => "Ethernet: G959.1 profile P1S1-2D2 (10709 MBd, 40km, 1550nm SM)",
        0x15 => "Ethernet: G959.1 profile P1L1-2D2 (10709 MBd, 80km, 1550nm SM)",
        0x16 => "10G Ethernet: 10G Base-T with SFI electrical interface",
        0x17 => "100G Ethernet: 100G CLR4",
        0x18 => "100G Ethernet: 100G AOC or 25GAUI C2M AOC with worst BER of 10^(-12)",
        0x19 => "100G Ethernet: 100G ACC or 25GAUI C2M ACC with worst BER of 10^(-12)",
        _ => "(reserved or unknown)",
    }
}
