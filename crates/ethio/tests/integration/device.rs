//! Device information integration tests.

use ethio::ethtool::abi::{
    EthtoolChannels, EthtoolDrvinfo, EthtoolEeprom, EthtoolModinfo, EthtoolPermAddr, EthtoolValue,
};
use ethio::ethtool::{ModuleKind, MsgLevel};
use ethio::sff::ModuleInfo;
use ethio::{Command, Error, Ethtool, StringSetId};
use zerocopy::{FromBytes, IntoBytes};

use crate::common::{FakeDevice, put_word, word};

fn drvinfo(n_stats: u32, n_priv_flags: u32) -> impl Fn(&mut [u8]) -> std::io::Result<()> {
    move |data| {
        let (mut info, _) = EthtoolDrvinfo::read_from_prefix(data).unwrap();
        info.driver[..5].copy_from_slice(b"ixgbe");
        info.version[..6].copy_from_slice(b"5.19.6");
        info.bus_info[..12].copy_from_slice(b"0000:03:00.0");
        info.n_stats = n_stats;
        info.n_priv_flags = n_priv_flags;
        info.write_to_prefix(data).unwrap();
        Ok(())
    }
}

#[test]
fn test_driver_info() {
    let dev = FakeDevice::new().on(Command::GDrvinfo, drvinfo(3, 0));
    let ethtool = Ethtool::with_transport(&dev);

    let info = ethtool.get_driver_info("eth0").unwrap();
    assert_eq!(info.driver, "ixgbe");
    assert_eq!(info.version, "5.19.6");
    assert_eq!(info.bus_info, "0000:03:00.0");
    assert_eq!(info.n_stats, 3);
    assert_eq!(ethtool.get_driver_name("eth0").unwrap(), "ixgbe");
    assert_eq!(ethtool.get_bus_info("eth0").unwrap(), "0000:03:00.0");
}

#[test]
fn test_unsupported_command() {
    let dev = FakeDevice::new();
    let ethtool = Ethtool::with_transport(&dev);

    let err = ethtool.get_driver_info("eth0").unwrap_err();
    assert!(err.is_not_supported());
    assert!(err.to_string().starts_with("get driver info: "));
}

#[test]
fn test_permission_denied() {
    let dev = FakeDevice::new().fail(Command::SMsglvl, libc::EPERM);
    let ethtool = Ethtool::with_transport(&dev);

    let err = ethtool.set_msg_level("eth0", MsgLevel(0x7)).unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(word(&dev.requests(Command::SMsglvl)[0], 1), 0x7);
}

#[test]
fn test_msg_level_and_link() {
    let dev = FakeDevice::new()
        .on(Command::GMsglvl, |data| {
            put_word(data, 1, 0x0005);
            Ok(())
        })
        .on(Command::GLink, |data| {
            let (mut v, _) = EthtoolValue::read_from_prefix(data).unwrap();
            v.data = 1;
            v.write_to_prefix(data).unwrap();
            Ok(())
        });
    let ethtool = Ethtool::with_transport(&dev);

    let level = ethtool.get_msg_level("eth0").unwrap();
    assert_eq!(level.names(), vec!["drv", "link"]);
    assert!(ethtool.get_link_state("eth0").unwrap());
}

#[test]
fn test_stats() {
    let dev = FakeDevice::new()
        .on(Command::GDrvinfo, drvinfo(3, 0))
        .strings(StringSetId::Stats, &["rx_packets", "", "tx_packets"])
        .on(Command::GStats, |data| {
            for (i, v) in [100u64, 7, 200].iter().enumerate() {
                data[8 + i * 8..16 + i * 8].copy_from_slice(v.as_bytes());
            }
            Ok(())
        });
    let ethtool = Ethtool::with_transport(&dev);

    let stats = ethtool.get_stats("eth0").unwrap();
    assert_eq!(
        stats,
        vec![
            ("rx_packets".to_string(), 100),
            ("tx_packets".to_string(), 200)
        ]
    );
    assert_eq!(dev.requests(Command::GStats)[0].len(), 8 + 24);
}

#[test]
fn test_string_set_falls_back_to_driver_info() {
    let dev = FakeDevice::new()
        .on(Command::GDrvinfo, drvinfo(0, 2))
        .fail(Command::GSsetInfo, libc::EOPNOTSUPP)
        .strings(StringSetId::PrivFlags, &["legacy-rx", "vf-ipsec"]);
    let ethtool = Ethtool::with_transport(&dev);

    let set = ethtool
        .get_string_set("eth0", StringSetId::PrivFlags)
        .unwrap();
    assert_eq!(set.strings, vec!["legacy-rx", "vf-ipsec"]);

    // Features have no driver-info count to fall back on.
    let err = ethtool
        .get_string_set("eth0", StringSetId::Features)
        .unwrap_err();
    assert!(err.is_not_supported());
}

fn feature_device() -> FakeDevice {
    FakeDevice::new()
        .strings(StringSetId::Features, &["rx-gro", "tx-tso", "rx-hash"])
        .on(Command::GFeatures, |data| {
            assert_eq!(word(data, 1), 1);
            put_word(data, 2, 0b111);
            put_word(data, 3, 0b101);
            put_word(data, 4, 0b001);
            put_word(data, 5, 0b100);
            Ok(())
        })
        .on(Command::SFeatures, |_| Ok(()))
}

#[test]
fn test_features() {
    let dev = feature_device();
    let ethtool = Ethtool::with_transport(&dev);

    let features = ethtool.get_features("eth0").unwrap();
    assert_eq!(features.len(), 3);
    assert!(features.is_active("rx-gro"));
    assert!(!features.is_active("tx-tso"));
    assert!(features.is_hw_supported("rx-hash"));
    assert!(!features.is_changeable("rx-hash"));
    assert_eq!(features.active_features(), vec!["rx-gro"]);

    let hash = features.get("rx-hash").unwrap();
    assert!(hash.requested);
    assert!(!hash.active);
    assert!(hash.never_changed);
}

#[test]
fn test_set_features() {
    let dev = feature_device();
    let ethtool = Ethtool::with_transport(&dev);

    ethtool
        .set_features("eth0", |f| f.enable("tx-tso").disable("rx-gro"))
        .unwrap();

    let req = &dev.requests(Command::SFeatures)[0];
    assert_eq!(req.len(), 8 + 8);
    assert_eq!(word(req, 1), 1);
    assert_eq!(word(req, 2), 0b011);
    assert_eq!(word(req, 3), 0b010);
}

#[test]
fn test_set_unknown_feature() {
    let dev = feature_device();
    let ethtool = Ethtool::with_transport(&dev);

    let err = ethtool
        .set_features("eth0", |f| f.enable("tx-tso").enable("rx-warp"))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownFeature { ref name } if name == "rx-warp"));
    assert!(!dev.issued(Command::SFeatures));
}

#[test]
fn test_perm_addr() {
    let dev = FakeDevice::new().on(Command::GPermAddr, |data| {
        let (mut hdr, _) = EthtoolPermAddr::read_from_prefix(data).unwrap();
        assert_eq!(hdr.size, 32);
        hdr.size = 6;
        hdr.write_to_prefix(data).unwrap();
        data[8..14].copy_from_slice(&[0x00, 0x1b, 0x21, 0xaa, 0xbb, 0xcc]);
        Ok(())
    });
    let ethtool = Ethtool::with_transport(&dev);

    assert_eq!(
        ethtool.get_perm_addr("eth0").unwrap().as_deref(),
        Some("00:1b:21:aa:bb:cc")
    );
}

#[test]
fn test_perm_addr_all_zero() {
    let dev = FakeDevice::new().on(Command::GPermAddr, |data| {
        put_word(data, 1, 6);
        Ok(())
    });
    let ethtool = Ethtool::with_transport(&dev);

    assert_eq!(ethtool.get_perm_addr("eth0").unwrap(), None);
}

#[test]
fn test_set_channels_keeps_other_counts() {
    let dev = FakeDevice::new()
        .on(Command::GChannels, |data| {
            let (mut ch, _) = EthtoolChannels::read_from_prefix(data).unwrap();
            ch.max_combined = 8;
            ch.combined_count = 4;
            ch.max_other = 1;
            ch.other_count = 1;
            ch.write_to_prefix(data).unwrap();
            Ok(())
        })
        .on(Command::SChannels, |_| Ok(()));
    let ethtool = Ethtool::with_transport(&dev);

    let channels = ethtool.set_channels("eth0", |c| c.combined(2)).unwrap();
    assert_eq!(channels.combined_count, 2);
    assert_eq!(channels.other_count, 1);

    let req = &dev.requests(Command::SChannels)[0];
    let (sent, _) = EthtoolChannels::read_from_prefix(req).unwrap();
    assert_eq!(sent.combined_count, 2);
    assert_eq!(sent.other_count, 1);
    assert_eq!(sent.max_combined, 8);
}

fn sfp_eeprom() -> Vec<u8> {
    let mut id = vec![0u8; 512];
    id[0] = 0x03;
    id[1] = 0x04;
    id[2] = 0x07;
    id[20..36].copy_from_slice(b"FINISAR CORP.   ");
    id[37..40].copy_from_slice(&[0x00, 0x90, 0x65]);
    id
}

fn module_device(kind: u32, len: u32) -> FakeDevice {
    FakeDevice::new()
        .on(Command::GModuleInfo, move |data| {
            let (mut info, _) = EthtoolModinfo::read_from_prefix(data).unwrap();
            info.type_ = kind;
            info.eeprom_len = len;
            info.write_to_prefix(data).unwrap();
            Ok(())
        })
        .on(Command::GModuleEeprom, |data| {
            let (hdr, _) = EthtoolEeprom::read_from_prefix(data).unwrap();
            let eeprom = sfp_eeprom();
            let len = hdr.len as usize;
            data[16..16 + len].copy_from_slice(&eeprom[..len]);
            Ok(())
        })
}

#[test]
fn test_module_eeprom() {
    let dev = module_device(0x2, 512);
    let ethtool = Ethtool::with_transport(&dev);

    let eeprom = ethtool.get_module_eeprom("eth0").unwrap();
    assert_eq!(eeprom.kind, ModuleKind::Sff8472);
    assert_eq!(eeprom.data.len(), 512);
    assert!(eeprom.hex().starts_with("030407"));

    match eeprom.decode().unwrap() {
        ModuleInfo::SfpWithDiagnostics { id, diagnostics } => {
            assert_eq!(id.identifier, "0x03 (SFP)");
            assert_eq!(id.connector, "0x07 (LC)");
            assert_eq!(id.vendor_name, "FINISAR CORP.");
            assert_eq!(id.vendor_oui, "00:90:65");
            assert_eq!(diagnostics, None);
        }
        other => panic!("unexpected module info {:?}", other),
    }
}

#[test]
fn test_module_eeprom_too_large() {
    let dev = module_device(0x3, 1024);
    let ethtool = Ethtool::with_transport(&dev);

    let err = ethtool.get_module_eeprom("eth0").unwrap_err();
    assert!(err.is_out_of_range());
    assert!(!dev.issued(Command::GModuleEeprom));
}
