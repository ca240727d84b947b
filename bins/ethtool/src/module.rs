//! Plug-in module (`-m`) output.

use ethio::Ethtool;
use ethio::sff::{Diagnostics, Measurement, ModuleInfo, QsfpDetails, Sff8079, sff8472::mw_to_dbm};

use crate::{print_json, tolerate};

pub fn show(ethtool: &Ethtool, device: &str, hex: bool, json: bool) -> anyhow::Result<()> {
    let Some(eeprom) = tolerate(device, ethtool.get_module_eeprom(device))? else {
        return Ok(());
    };

    if hex {
        if json {
            return print_json(&serde_json::json!({ "eeprom": eeprom.hex() }));
        }
        for (i, chunk) in eeprom.data.chunks(16).enumerate() {
            let bytes: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            println!("0x{:04x}: {}", i * 16, bytes.join(" "));
        }
        return Ok(());
    }

    let info = eeprom.decode()?;
    if json {
        return print_json(&info);
    }

    match &info {
        ModuleInfo::Sfp(id) => print_sfp(id),
        ModuleInfo::SfpWithDiagnostics { id, diagnostics } => {
            print_sfp(id);
            if let Some(dom) = diagnostics {
                print_diagnostics(dom);
            }
        }
        ModuleInfo::Qsfp(q) => {
            field("Identifier", &q.identifier);
            if let Some(details) = &q.details {
                print_qsfp(details);
            }
        }
    }

    Ok(())
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("\t{:<42}: {}", label, value);
}

fn print_sfp(id: &Sff8079) {
    field("Identifier", &id.identifier);
    field("Extended identifier", &id.ext_identifier);
    field("Connector", &id.connector);
    field("Transceiver codes", &id.transceiver_codes);
    for t in &id.transceiver_types {
        field("Transceiver type", t);
    }
    field("Encoding", &id.encoding);
    field("BR, Nominal", format!("{}MBd", id.br_nominal_mbd));
    field("Rate identifier", &id.rate_identifier);
    field("Length (SMF,km)", format!("{}km", id.length_smf_km));
    field("Length (SMF)", format!("{}m", id.length_smf_m));
    field("Length (50um)", format!("{}m", id.length_50um_m));
    field("Length (62.5um)", format!("{}m", id.length_62_5um_m));
    field("Length (Copper)", format!("{}m", id.length_copper_m));
    field("Length (OM3)", format!("{}m", id.length_om3_m));
    if let Some(c) = &id.passive_copper_compliance {
        field("Passive Cu cmplnce.", c);
    }
    if let Some(c) = &id.active_copper_compliance {
        field("Active Cu cmplnce.", c);
    }
    if let Some(nm) = id.laser_wavelength_nm {
        field("Laser wavelength", format!("{}nm", nm));
    }
    field("Vendor name", &id.vendor_name);
    field("Vendor OUI", &id.vendor_oui);
    field("Vendor PN", &id.vendor_pn);
    field("Vendor rev", &id.vendor_rev);
    field("Option values", &id.option_values);
    for o in &id.options {
        field("Option", o);
    }
    field("BR margin, max", format!("{}%", id.br_margin_max_percent));
    field("BR margin, min", format!("{}%", id.br_margin_min_percent));
    field("Vendor SN", &id.vendor_sn);
    match id.vendor_date() {
        Some(date) => field("Date code", date),
        None => field("Date code", &id.date_code),
    }
}

fn print_qsfp(q: &QsfpDetails) {
    field("Extended identifier", &q.ext_identifier);
    for d in &q.ext_identifier_descr {
        field("Extended identifier description", d);
    }
    field("Connector", &q.connector);
    field("Transceiver codes", &q.transceiver_codes);
    if let Some(t) = &q.transceiver_type {
        field("Transceiver type", t);
    }
    field("Encoding", &q.encoding);
    field("BR, Nominal", format!("{}Mbps", q.br_nominal_mbps));
    field("Length (SMF,km)", format!("{}km", q.length_smf_km));
    field("Length (OM3 50um)", format!("{}m", q.length_om3_m));
    field("Length (OM2 50um)", format!("{}m", q.length_om2_m));
    field("Length (OM1 62.5um)", format!("{}m", q.length_om1_m));
    field("Length (Copper or Active cable)", format!("{}m", q.length_copper_m));
    field("Vendor name", &q.vendor_name);
    field("Vendor OUI", &q.vendor_oui);
    field("Vendor PN", &q.vendor_pn);
    field("Vendor rev", &q.vendor_rev);
    field("Vendor SN", &q.vendor_sn);
    field("Date code", &q.date_code);
}

fn power(m: &Measurement) -> String {
    format!("{:.4} mW / {:.2} dBm", m.value, mw_to_dbm(m.value))
}

fn print_diagnostics(dom: &Diagnostics) {
    field("Laser bias current", format!("{:.3} mA", dom.tx_bias.value));
    field("Laser output power", power(&dom.tx_power));
    field("Receiver signal average optical power", power(&dom.rx_power));
    field("Module temperature", format!("{:.2} degrees C", dom.temperature.value));
    field("Module voltage", format!("{:.4} V", dom.vcc.value));
    field("Alarm/warning flags implemented", if dom.alarms_supported { "Yes" } else { "No" });

    let thresholds = [
        ("Laser bias current", &dom.tx_bias, "mA"),
        ("Laser output power", &dom.tx_power, "mW"),
        ("Module temperature", &dom.temperature, "C"),
        ("Module voltage", &dom.vcc, "V"),
        ("Laser rx power", &dom.rx_power, "mW"),
    ];
    for (name, m, unit) in thresholds {
        field(&format!("{} high alarm threshold", name), format!("{:.4} {}", m.high_alarm, unit));
        field(&format!("{} low alarm threshold", name), format!("{:.4} {}", m.low_alarm, unit));
        field(&format!("{} high warning threshold", name), format!("{:.4} {}", m.high_warning, unit));
        field(&format!("{} low warning threshold", name), format!("{:.4} {}", m.low_warning, unit));
    }
}
