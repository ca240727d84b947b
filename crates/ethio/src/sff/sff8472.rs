//! SFF-8472 digital diagnostics monitoring (page A2h).
//!
//! The diagnostics page follows the serial ID page at offset 256 of the
//! kernel's EEPROM dump. All multi-byte values are big-endian.

use super::require_len;
use crate::error::Result;

/// Offset of page A2h in the EEPROM dump.
pub const A2_BASE: usize = 0x100;
/// Length of the dump that is decoded (A0h + A2h).
pub const DUMP_LEN: usize = 512;

// A0h
const A0_DOM: usize = 92;
const A0_OPTIONS: usize = 93;
const DOM_PWRT: u8 = 1 << 3;
const DOM_EXTCAL: u8 = 1 << 4;
const DOM_IMPL: u8 = 1 << 6;
const OPTIONS_AW: u8 = 1 << 7;

// A2h: thresholds are high alarm, low alarm, high warning, low warning.
const TEMP: usize = 96;
const TEMP_THRESH: usize = 0;
const VCC: usize = 98;
const VCC_THRESH: usize = 8;
const BIAS: usize = 100;
const BIAS_THRESH: usize = 16;
const TX_PWR: usize = 102;
const TX_PWR_THRESH: usize = 24;
const RX_PWR: usize = 104;
const RX_PWR_THRESH: usize = 32;

// A2h external calibration constants.
const CAL_RXPWR4: usize = 56;
const CAL_TXI_SLP: usize = 76;
const CAL_TXPWR_SLP: usize = 80;
const CAL_T_SLP: usize = 84;
const CAL_V_SLP: usize = 88;

/// How the module's raw readings are calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Calibration {
    /// Readings are already in physical units.
    Internal,
    /// Readings need the slope/offset and polynomial constants from A2h.
    External,
}

/// What the received power reading measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RxPowerKind {
    /// Optical modulation amplitude.
    Oma,
    /// Average power.
    Average,
}

/// A monitored value with its alarm and warning thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Measurement {
    /// Current reading.
    pub value: f64,
    /// High alarm threshold.
    pub high_alarm: f64,
    /// Low alarm threshold.
    pub low_alarm: f64,
    /// High warning threshold.
    pub high_warning: f64,
    /// Low warning threshold.
    pub low_warning: f64,
}

/// Decoded diagnostics page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostics {
    /// Calibration mode.
    pub calibration: Calibration,
    /// Received power measurement type.
    pub rx_power_kind: RxPowerKind,
    /// Alarm and warning flags are implemented.
    pub alarms_supported: bool,
    /// Module temperature, degrees Celsius.
    pub temperature: Measurement,
    /// Supply voltage, V.
    pub vcc: Measurement,
    /// Laser bias current, mA.
    pub tx_bias: Measurement,
    /// Transmitted optical power, mW.
    pub tx_power: Measurement,
    /// Received optical power, mW.
    pub rx_power: Measurement,
}

/// Convert milliwatts to dBm.
pub fn mw_to_dbm(mw: f64) -> f64 {
    10.0 * mw.log10()
}

impl Diagnostics {
    /// Decode the diagnostics page from a full A0h + A2h dump.
    ///
    /// Returns `Ok(None)` if the module does not implement DOM.
    pub fn decode(id: &[u8]) -> Result<Option<Self>> {
        require_len(id, DUMP_LEN)?;
        let dom = id[A0_DOM];
        if dom & DOM_IMPL == 0 {
            return Ok(None);
        }

        let a2 = &id[A2_BASE..DUMP_LEN];
        let calibration = if dom & DOM_EXTCAL != 0 {
            Calibration::External
        } else {
            Calibration::Internal
        };
        let cal = Calibrator { a2, calibration };

        Ok(Some(Self {
            calibration,
            rx_power_kind: if dom & DOM_PWRT != 0 {
                RxPowerKind::Average
            } else {
                RxPowerKind::Oma
            },
            alarms_supported: id[A0_OPTIONS] & OPTIONS_AW != 0,
            temperature: cal.measure(TEMP, TEMP_THRESH, |c, off| c.temperature(off)),
            vcc: cal.measure(VCC, VCC_THRESH, |c, off| {
                c.linear(off, CAL_V_SLP) / 10_000.0
            }),
            tx_bias: cal.measure(BIAS, BIAS_THRESH, |c, off| {
                c.linear(off, CAL_TXI_SLP) * 0.002
            }),
            tx_power: cal.measure(TX_PWR, TX_PWR_THRESH, |c, off| {
                c.linear(off, CAL_TXPWR_SLP) / 10_000.0
            }),
            rx_power: cal.measure(RX_PWR, RX_PWR_THRESH, |c, off| {
                c.rx_power(off) / 10_000.0
            }),
        }))
    }
}

struct Calibrator<'a> {
    a2: &'a [u8],
    calibration: Calibration,
}

impl Calibrator<'_> {
    fn u16_at(&self, off: usize) -> u16 {
        u16::from_be_bytes([self.a2[off], self.a2[off + 1]])
    }

    fn i16_at(&self, off: usize) -> i16 {
        i16::from_be_bytes([self.a2[off], self.a2[off + 1]])
    }

    fn f32_at(&self, off: usize) -> f32 {
        f32::from_be_bytes([
            self.a2[off],
            self.a2[off + 1],
            self.a2[off + 2],
            self.a2[off + 3],
        ])
    }

    /// Apply slope (unsigned 8.8 fixed point) and signed offset; the offset
    /// word follows the slope word.
    fn slope_offset(&self, raw: f64, slope_at: usize) -> f64 {
        match self.calibration {
            Calibration::Internal => raw,
            Calibration::External => {
                let slope = f64::from(self.u16_at(slope_at)) / 256.0;
                let offset = f64::from(self.i16_at(slope_at + 2));
                raw * slope + offset
            }
        }
    }

    fn linear(&self, off: usize, slope_at: usize) -> f64 {
        self.slope_offset(f64::from(self.u16_at(off)), slope_at)
    }

    /// Temperature in units of 1/256 degree.
    fn temperature(&self, off: usize) -> f64 {
        self.slope_offset(f64::from(self.i16_at(off)), CAL_T_SLP) / 256.0
    }

    /// Received power in 0.1 uW; external calibration is a fourth order
    /// polynomial with coefficients stored highest order first.
    fn rx_power(&self, off: usize) -> f64 {
        let raw = f64::from(self.u16_at(off));
        match self.calibration {
            Calibration::Internal => raw,
            Calibration::External => (0..5).fold(0.0, |acc, i| {
                acc * raw + f64::from(self.f32_at(CAL_RXPWR4 + i * 4))
            }),
        }
    }

    fn measure(&self, value: usize, thresholds: usize, read: impl Fn(&Self, usize) -> f64) -> Measurement {
        Measurement {
            value: read(self, value),
            high_alarm: read(self, thresholds),
            low_alarm: read(self, thresholds + 2),
            high_warning: read(self, thresholds + 4),
            low_warning: read(self, thresholds + 6),
        }
    }
}
