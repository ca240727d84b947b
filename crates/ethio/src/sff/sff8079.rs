//! SFF-8079 SFP serial ID (page A0h).

use super::{ascii_field, bit_names, oui, require_len, sff8024};
use crate::error::{Error, Result};
use crate::ethtool::ModuleKind;

/// Length of the serial ID page that is decoded.
pub const ID_LEN: usize = 96;

const EXT_ID_SFP: u8 = 0x04;

static TRANSCEIVER_TYPES: &[(usize, u8, &str)] = &[
    // 10G Ethernet
    (3, 7, "10G Ethernet: 10G Base-ER [SFF-8472 rev10.4 only]"),
    (3, 6, "10G Ethernet: 10G Base-LRM"),
    (3, 5, "10G Ethernet: 10G Base-LR"),
    (3, 4, "10G Ethernet: 10G Base-SR"),
    // Infiniband
    (3, 3, "Infiniband: 1X SX"),
    (3, 2, "Infiniband: 1X LX"),
    (3, 1, "Infiniband: 1X Copper Active"),
    (3, 0, "Infiniband: 1X Copper Passive"),
    // ESCON
    (4, 7, "ESCON: ESCON MMF, 1310nm LED"),
    (4, 6, "ESCON: ESCON SMF, 1310nm Laser"),
    // SONET
    (4, 5, "SONET: OC-192, short reach"),
    (4, 4, "SONET: SONET reach specifier bit 1"),
    (4, 3, "SONET: SONET reach specifier bit 2"),
    (4, 2, "SONET: OC-48, long reach"),
    (4, 1, "SONET: OC-48, intermediate reach"),
    (4, 0, "SONET: OC-48, short reach"),
    (5, 6, "SONET: OC-12, single mode, long reach"),
    (5, 5, "SONET: OC-12, single mode, inter. reach"),
    (5, 4, "SONET: OC-12, short reach"),
    (5, 2, "SONET: OC-3, single mode, long reach"),
    (5, 1, "SONET: OC-3, single mode, inter. reach"),
    (5, 0, "SONET: OC-3, short reach"),
    // Ethernet
    (6, 7, "Ethernet: BASE-PX"),
    (6, 6, "Ethernet: BASE-BX10"),
    (6, 5, "Ethernet: 100BASE-FX"),
    (6, 4, "Ethernet: 100BASE-LX/LX10"),
    (6, 3, "Ethernet: 1000BASE-T"),
    (6, 2, "Ethernet: 1000BASE-CX"),
    (6, 1, "Ethernet: 1000BASE-LX"),
    (6, 0, "Ethernet: 1000BASE-SX"),
    // Fibre Channel link length
    (7, 7, "FC: very long distance (V)"),
    (7, 6, "FC: short distance (S)"),
    (7, 5, "FC: intermediate distance (I)"),
    (7, 4, "FC: long distance (L)"),
    (7, 3, "FC: medium distance (M)"),
    // Fibre Channel transmitter technology
    (7, 2, "FC: Shortwave laser, linear Rx (SA)"),
    (7, 1, "FC: Longwave laser (LC)"),
    (7, 0, "FC: Electrical inter-enclosure (EL)"),
    (8, 7, "FC: Electrical intra-enclosure (EL)"),
    (8, 6, "FC: Shortwave laser w/o OFC (SN)"),
    (8, 5, "FC: Shortwave laser with OFC (SL)"),
    (8, 4, "FC: Longwave laser (LL)"),
    (8, 3, "FC: Copper Active"),
    (8, 2, "FC: Copper Passive"),
    (8, 1, "FC: Copper FC-BaseT"),
    // Fibre Channel transmission media
    (9, 7, "FC: Twin Axial Pair (TW)"),
    (9, 6, "FC: Twisted Pair (TP)"),
    (9, 5, "FC: Miniature Coax (MI)"),
    (9, 4, "FC: Video Coax (TV)"),
    (9, 3, "FC: Multimode, 62.5um (M6)"),
    (9, 2, "FC: Multimode, 50um (M5)"),
    (9, 0, "FC: Single Mode (SM)"),
    // Fibre Channel speed
    (10, 7, "FC: 1200 MBytes/sec"),
    (10, 6, "FC: 800 MBytes/sec"),
    (10, 4, "FC: 400 MBytes/sec"),
    (10, 2, "FC: 200 MBytes/sec"),
    (10, 0, "FC: 100 MBytes/sec"),
];

static OPTIONS: &[(usize, u8, &str)] = &[
    (65, 1, "RX_LOS implemented"),
    (65, 2, "RX_LOS implemented, inverted"),
    (65, 3, "TX_FAULT implemented"),
    (65, 4, "TX_DISABLE implemented"),
    (65, 5, "RATE_SELECT implemented"),
    (65, 6, "Tunable transmitter technology"),
    (65, 7, "Receiver decision threshold implemented"),
    (64, 0, "Linear receiver output implemented"),
    (64, 1, "Power level 2 requirement"),
    (64, 2, "Cooled transceiver implemented"),
    (64, 3, "Retimer or CDR implemented"),
    (64, 4, "Paging implemented"),
    (64, 5, "Power level 3 requirement"),
];

/// Decoded SFP serial ID.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sff8079 {
    /// Identifier, e.g. `0x03 (SFP)`.
    pub identifier: String,
    /// Extended identifier with description.
    pub ext_identifier: String,
    /// Connector with description.
    pub connector: String,
    /// Raw transceiver code bytes 3 to 10.
    pub transceiver_codes: String,
    /// Compliance names for every set transceiver code bit.
    pub transceiver_types: Vec<String>,
    /// Encoding with description.
    pub encoding: String,
    /// Nominal signalling rate in MBd.
    pub br_nominal_mbd: u32,
    /// Rate identifier with description.
    pub rate_identifier: String,
    /// Single-mode fiber length, km.
    pub length_smf_km: u32,
    /// Single-mode fiber length, m.
    pub length_smf_m: u32,
    /// 50um OM2 fiber length, m.
    pub length_50um_m: u32,
    /// 62.5um OM1 fiber length, m.
    pub length_62_5um_m: u32,
    /// Copper cable length, m.
    pub length_copper_m: u32,
    /// 50um OM3 fiber length, m.
    pub length_om3_m: u32,
    /// Passive copper cable compliance (passive cables only).
    pub passive_copper_compliance: Option<String>,
    /// Active copper cable compliance (active cables only).
    pub active_copper_compliance: Option<String>,
    /// Laser wavelength in nm (optical modules only).
    pub laser_wavelength_nm: Option<u16>,
    /// Vendor name.
    pub vendor_name: String,
    /// Vendor IEEE OUI, `xx:xx:xx`.
    pub vendor_oui: String,
    /// Vendor part number.
    pub vendor_pn: String,
    /// Vendor revision.
    pub vendor_rev: String,
    /// Raw option bytes 64 and 65.
    pub option_values: String,
    /// Names of the implemented options.
    pub options: Vec<String>,
    /// Upper bit rate margin, percent.
    pub br_margin_max_percent: u8,
    /// Lower bit rate margin, percent.
    pub br_margin_min_percent: u8,
    /// Vendor serial number.
    pub vendor_sn: String,
    /// Vendor date code (`YYMMDDLL`).
    pub date_code: String,
}

impl Sff8079 {
    /// Decode the serial ID page.
    ///
    /// The data is accepted if either the identifier is SFP or the
    /// extended identifier says the module is defined by the 2-wire ID.
    pub fn decode(id: &[u8]) -> Result<Self> {
        require_len(id, ID_LEN)?;
        if id[0] != sff8024::ID_SFP && id[1] != EXT_ID_SFP {
            return Err(Error::UnknownModule(id[0]));
        }

        let (passive_copper_compliance, active_copper_compliance, laser_wavelength_nm) =
            if id[8] & (1 << 2) != 0 {
                (Some(copper_compliance(id[60], false)), None, None)
            } else if id[8] & (1 << 3) != 0 {
                (None, Some(copper_compliance(id[60], true)), None)
            } else {
                (None, None, Some(u16::from_be_bytes([id[60], id[61]])))
            };

        Ok(Self {
            identifier: sff8024::describe(id[0], sff8024::identifier(id[0])),
            ext_identifier: sff8024::describe(id[1], &ext_identifier(id[1])),
            connector: sff8024::describe(id[2], sff8024::connector(id[2])),
            transceiver_codes: hex_bytes(&id[3..=10]),
            transceiver_types: bit_names(id, TRANSCEIVER_TYPES),
            encoding: sff8024::describe(id[11], sff8024::encoding(id[11], ModuleKind::Sff8079)),
            br_nominal_mbd: u32::from(id[12]) * 100,
            rate_identifier: sff8024::describe(id[13], rate_identifier(id[13])),
            length_smf_km: u32::from(id[14]),
            length_smf_m: u32::from(id[15]) * 100,
            length_50um_m: u32::from(id[16]) * 10,
            length_62_5um_m: u32::from(id[17]) * 10,
            length_copper_m: u32::from(id[18]),
            length_om3_m: u32::from(id[19]) * 10,
            passive_copper_compliance,
            active_copper_compliance,
            laser_wavelength_nm,
            vendor_name: ascii_field(&id[20..=35]),
            vendor_oui: oui(&id[37..=39]),
            vendor_pn: ascii_field(&id[40..=55]),
            vendor_rev: ascii_field(&id[56..=59]),
            option_values: hex_bytes(&id[64..=65]),
            options: bit_names(id, OPTIONS),
            br_margin_max_percent: id[66],
            br_margin_min_percent: id[67],
            vendor_sn: ascii_field(&id[68..=83]),
            date_code: ascii_field(&id[84..=91]),
        })
    }

    /// Manufacturing date as `20YY-MM-DD`, if the date code is numeric.
    pub fn vendor_date(&self) -> Option<String> {
        let digits = self.date_code.get(..6)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(format!("20{}-{}-{}", &digits[..2], &digits[2..4], &digits[4..6]))
    }
}

fn ext_identifier(code: u8) -> String {
    match code {
        0x00 => "(GBIC not specified / not MOD_DEF compliant)".to_string(),
        EXT_ID_SFP => "(GBIC/SFP defined by 2-wire interface ID)".to_string(),
        0x05..=0x07 => format!("(GBIC compliant with MOD_DEF {})", code),
        _ => "(unknown)".to_string(),
    }
}

fn rate_identifier(code: u8) -> &'static str {
    match code {
        0x00 => "(unspecified)",
        0x01 => "(4/2/1G Rate_Select & AS0/AS1)",
        0x02 => "(8/4/2G Rx Rate_Select only)",
        0x03 => "(8/4/2G Independent Rx & Tx Rate_Select)",
        0x04 => "(8/4/2G Tx Rate_Select only)",
        _ => "(reserved or unknown)",
    }
}

fn copper_compliance(code: u8, active: bool) -> String {
    let text = match (code, active) {
        (0x00, _) => "(unspecified)",
        (0x01, _) => "(SFF-8431 appendix E)",
        (0x04, true) => "(SFF-8431 limiting)",
        _ => "(unknown)",
    };
    format!("0x{:02x} {} [SFF-8472 rev10.4 only]", code, text)
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn put(id: &mut [u8], offset: usize, text: &str, width: usize) {
        let field = &mut id[offset..offset + width];
        field.fill(b' ');
        field[..text.len()].copy_from_slice(text.as_bytes());
    }

    /// A 10GBASE-SR optical SFP+.
    pub(crate) fn sample_sfp() -> Vec<u8> {
        let mut id = vec![0u8; 512];
        id[0] = 0x03;
        id[1] = 0x04;
        id[2] = 0x07;
        id[3] = 0x10;
        id[11] = 0x06;
        id[12] = 0x67;
        id[15] = 0x00;
        id[16] = 0x08;
        id[17] = 0x03;
        id[19] = 0x1e;
        put(&mut id, 20, "FINISAR CORP.", 16);
        id[37..40].copy_from_slice(&[0x00, 0x90, 0x65]);
        put(&mut id, 40, "FTLX8571D3BCL", 16);
        put(&mut id, 56, "A", 4);
        id[60] = 0x03;
        id[61] = 0x52;
        id[64] = 0x00;
        id[65] = 0x1a;
        put(&mut id, 68, "ALM0XKD", 16);
        put(&mut id, 84, "12052700", 8);
        id
    }

    #[test]
    fn test_decode_optical_sfp() {
        let sfp = Sff8079::decode(&sample_sfp()).unwrap();
        assert_eq!(sfp.identifier, "0x03 (SFP)");
        assert_eq!(sfp.ext_identifier, "0x04 (GBIC/SFP defined by 2-wire interface ID)");
        assert_eq!(sfp.connector, "0x07 (LC)");
        assert_eq!(
            sfp.transceiver_codes,
            "0x10 0x00 0x00 0x00 0x00 0x00 0x00 0x00"
        );
        assert_eq!(sfp.transceiver_types, vec!["10G Ethernet: 10G Base-SR"]);
        assert_eq!(sfp.encoding, "0x06 (64B/66B)");
        assert_eq!(sfp.br_nominal_mbd, 10300);
        assert_eq!(sfp.length_50um_m, 80);
        assert_eq!(sfp.length_62_5um_m, 30);
        assert_eq!(sfp.length_om3_m, 300);
        assert_eq!(sfp.laser_wavelength_nm, Some(850));
        assert_eq!(sfp.passive_copper_compliance, None);
        assert_eq!(sfp.vendor_name, "FINISAR CORP.");
        assert_eq!(sfp.vendor_oui, "00:90:65");
        assert_eq!(sfp.vendor_pn, "FTLX8571D3BCL");
        assert_eq!(sfp.vendor_rev, "A");
        assert_eq!(sfp.vendor_sn, "ALM0XKD");
        assert_eq!(sfp.date_code, "12052700");
        assert_eq!(sfp.vendor_date().as_deref(), Some("2012-05-27"));
        assert_eq!(sfp.option_values, "0x00 0x1a");
        assert_eq!(
            sfp.options,
            vec![
                "RX_LOS implemented",
                "TX_FAULT implemented",
                "TX_DISABLE implemented"
            ]
        );
    }

    #[test]
    fn test_decode_passive_copper() {
        let mut id = sample_sfp();
        id[3] = 0;
        id[8] = 1 << 2;
        id[60] = 0x01;
        let sfp = Sff8079::decode(&id).unwrap();
        assert_eq!(sfp.transceiver_types, vec!["FC: Copper Passive"]);
        assert_eq!(
            sfp.passive_copper_compliance.as_deref(),
            Some("0x01 (SFF-8431 appendix E) [SFF-8472 rev10.4 only]")
        );
        assert_eq!(sfp.laser_wavelength_nm, None);
    }

    #[test]
    fn test_decode_active_copper() {
        let mut id = sample_sfp();
        id[8] = 1 << 3;
        id[60] = 0x04;
        let sfp = Sff8079::decode(&id).unwrap();
        assert_eq!(
            sfp.active_copper_compliance.as_deref(),
            Some("0x04 (SFF-8431 limiting) [SFF-8472 rev10.4 only]")
        );
    }

    #[test]
    fn test_identifier_check() {
        let mut id = sample_sfp();
        id[0] = 0x0d;
        id[1] = 0x00;
        assert!(matches!(
            Sff8079::decode(&id),
            Err(Error::UnknownModule(0x0d))
        ));

        // Either byte is enough.
        id[1] = 0x04;
        assert!(Sff8079::decode(&id).is_ok());
    }

    #[test]
    fn test_truncated() {
        let id = sample_sfp();
        assert!(matches!(
            Sff8079::decode(&id[..64]),
            Err(Error::Truncated {
                expected: 96,
                actual: 64
            })
        ));
    }

    #[test]
    fn test_vendor_date_not_numeric() {
        let mut id = sample_sfp();
        put(&mut id, 84, "", 8);
        let sfp = Sff8079::decode(&id).unwrap();
        assert_eq!(sfp.date_code, "");
        assert_eq!(sfp.vendor_date(), None);
    }
}
