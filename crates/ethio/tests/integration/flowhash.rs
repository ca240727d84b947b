//! RX flow hash integration tests.
//!
//! Each test scripts the kernel side of the `ETHTOOL_GRSSH`/`ETHTOOL_SRSSH`
//! exchange and checks both the decoded result and the exact requests sent.

use std::collections::BTreeMap;
use std::io;

use ethio::ethtool::abi::{EthtoolRxfh, EthtoolRxfhIndir};
use ethio::{Command, Error, Ethtool, RXFH_INDIR_NO_CHANGE, RssContext, StringSetId};
use zerocopy::{FromBytes, IntoBytes};

use crate::common::{FakeDevice, put_word, word};

const HDR: usize = 24;

/// GRSSH handler for a device with the given sizes and hash function.
///
/// The header-only probe gets the sizes; the full query gets table entry
/// `i % 4` and key byte `i`.
fn grssh(indir_size: u32, key_size: u32, hfunc: u8) -> impl Fn(&mut [u8]) -> io::Result<()> {
    move |data| {
        let (mut hdr, _) = EthtoolRxfh::read_from_prefix(data).unwrap();
        hdr.hfunc = hfunc;
        if hdr.indir_size == 0 && hdr.key_size == 0 {
            hdr.indir_size = indir_size;
            hdr.key_size = key_size;
            hdr.write_to_prefix(data).unwrap();
            return Ok(());
        }

        assert_eq!(hdr.indir_size, indir_size);
        assert_eq!(hdr.key_size, key_size);
        assert_eq!(data.len(), HDR + indir_size as usize * 4 + key_size as usize);
        for i in 0..indir_size as usize {
            put_word(&mut data[HDR..], i, i as u32 % 4);
        }
        let key_off = HDR + indir_size as usize * 4;
        for (i, b) in data[key_off..].iter_mut().enumerate() {
            *b = i as u8;
        }
        hdr.write_to_prefix(data).unwrap();
        Ok(())
    }
}

fn rss_device(indir_size: u32, key_size: u32, hfunc: u8) -> FakeDevice {
    FakeDevice::new()
        .ring_count(4)
        .on(Command::GRssh, grssh(indir_size, key_size, hfunc))
        .on(Command::SRssh, |_| Ok(()))
        .strings(StringSetId::RssHashFuncs, &["toeplitz", "xor", "crc32"])
}

fn header(data: &[u8]) -> EthtoolRxfh {
    EthtoolRxfh::read_from_prefix(data).unwrap().0
}

mod get {
    use super::*;

    #[test]
    fn test_table_and_hash_function() {
        let dev = rss_device(4, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let hash = ethtool.get_flow_hash("eth0", RssContext::NONE).unwrap();
        assert_eq!(hash.ring_count, 4);
        assert_eq!(hash.key, None);
        assert_eq!(hash.table.unwrap().into_inner(), vec![0, 1, 2, 3]);
        assert_eq!(
            hash.funcs,
            Some(BTreeMap::from([
                ("crc32".to_string(), false),
                ("toeplitz".to_string(), true),
                ("xor".to_string(), false),
            ]))
        );

        let reqs = dev.requests(Command::GRssh);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].len(), HDR);
        assert_eq!(reqs[1].len(), HDR + 16);
    }

    #[test]
    fn test_key_follows_table() {
        let dev = rss_device(8, 40, 0b010);
        let ethtool = Ethtool::with_transport(&dev);

        let hash = ethtool.get_flow_hash("eth0", RssContext::NONE).unwrap();
        assert_eq!(hash.table.as_ref().unwrap().len(), 8);
        assert_eq!(hash.key, Some((0..40).collect::<Vec<u8>>()));
        assert_eq!(hash.active_func(), Some("xor"));
    }

    #[test]
    fn test_context_is_sent() {
        let dev = rss_device(4, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        ethtool.get_flow_hash("eth0", RssContext(5)).unwrap();
        for req in dev.requests(Command::GRssh) {
            assert_eq!(header(&req).rss_context, 5);
        }
    }

    #[test]
    fn test_no_hash_function_reported() {
        let dev = rss_device(4, 0, 0);
        let ethtool = Ethtool::with_transport(&dev);

        let hash = ethtool.get_flow_hash("eth0", RssContext::NONE).unwrap();
        assert_eq!(hash.funcs, None);
        assert!(hash.table.is_some());
        assert!(!dev.issued(Command::GStrings));
    }

    #[test]
    fn test_no_table_reported() {
        let dev = rss_device(0, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let hash = ethtool.get_flow_hash("eth0", RssContext::NONE).unwrap();
        assert_eq!(hash.table, None);
        assert_eq!(hash.key, None);
    }

    #[test]
    fn test_legacy_fallback_for_context() {
        let dev = FakeDevice::new()
            .ring_count(4)
            .on(Command::GRxfhIndir, |data| {
                let (mut hdr, _) = EthtoolRxfhIndir::read_from_prefix(data).unwrap();
                if hdr.size == 0 {
                    hdr.size = 4;
                    hdr.write_to_prefix(data).unwrap();
                    return Ok(());
                }
                for i in 0..4 {
                    put_word(&mut data[8..], i, 3 - i as u32);
                }
                Ok(())
            });
        let ethtool = Ethtool::with_transport(&dev);

        let hash = ethtool.get_flow_hash("eth0", RssContext(1)).unwrap();
        assert_eq!(hash.ring_count, 4);
        assert_eq!(hash.table.unwrap().into_inner(), vec![3, 2, 1, 0]);
        assert_eq!(hash.key, None);
        assert_eq!(hash.funcs, None);
    }

    #[test]
    fn test_unsupported_on_default_context() {
        let dev = FakeDevice::new().ring_count(4);
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool.get_flow_hash("eth0", RssContext::NONE).unwrap_err();
        assert!(err.is_not_supported());
        assert!(!dev.issued(Command::GRxfhIndir));
    }

    #[test]
    fn test_reply_larger_than_allocation() {
        let dev = FakeDevice::new().ring_count(4).on(Command::GRssh, |data| {
            let (mut hdr, _) = EthtoolRxfh::read_from_prefix(data).unwrap();
            hdr.indir_size = if hdr.indir_size == 0 { 4 } else { 256 };
            hdr.write_to_prefix(data).unwrap();
            Ok(())
        });
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool.get_flow_hash("eth0", RssContext::NONE).unwrap_err();
        assert!(err.is_out_of_range(), "{err}");
    }

    #[test]
    fn test_device_sizes_are_capped() {
        let dev = FakeDevice::new()
            .ring_count(4)
            .on(Command::GRssh, grssh(1 << 28, 0, 0));
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool.get_flow_hash("eth0", RssContext::NONE).unwrap_err();
        assert!(err.is_out_of_range(), "{err}");
        assert_eq!(dev.requests(Command::GRssh).len(), 1);

        let dev = FakeDevice::new()
            .ring_count(4)
            .on(Command::GRssh, grssh(4, u32::MAX, 0));
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool.get_flow_hash("eth0", RssContext::NONE).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { what: "RX flow hash key", .. }));
        assert_eq!(dev.requests(Command::GRssh).len(), 1);
    }

    #[test]
    fn test_legacy_table_size_is_capped() {
        let dev = FakeDevice::new()
            .ring_count(4)
            .on(Command::GRxfhIndir, |data| {
                put_word(data, 1, u32::MAX);
                Ok(())
            });
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool.get_flow_hash("eth0", RssContext(1)).unwrap_err();
        assert!(err.is_out_of_range(), "{err}");
        assert_eq!(dev.requests(Command::GRxfhIndir).len(), 1);
    }

    #[test]
    fn test_invalid_interface_name() {
        let dev = FakeDevice::new();
        let ethtool = Ethtool::with_transport(&dev);

        assert!(matches!(
            ethtool.get_flow_hash("", RssContext::NONE),
            Err(Error::InvalidInterfaceName(_))
        ));
        assert!(dev.commands().is_empty());
    }
}

mod set {
    use super::*;

    #[test]
    fn test_equal_spread() {
        let dev = rss_device(8, 40, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let ctx = ethtool.set_flow_hash("eth0", |c| c.equal(0, 4)).unwrap();
        assert_eq!(ctx, RssContext::NONE);

        let reqs = dev.requests(Command::SRssh);
        assert_eq!(reqs.len(), 1);
        let req = &reqs[0];
        assert_eq!(req.len(), HDR + 32);
        let hdr = header(req);
        assert_eq!(hdr.rss_context, 0);
        assert_eq!(hdr.indir_size, 8);
        assert_eq!(hdr.key_size, 0);
        assert_eq!(hdr.hfunc, 0);
        let table: Vec<u32> = (0..8).map(|i| word(&req[HDR..], i)).collect();
        assert_eq!(table, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn test_weighted_spread() {
        let dev = rss_device(8, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        ethtool
            .set_flow_hash("eth0", |c| c.weighted(2, [1u32, 3]))
            .unwrap();

        let req = &dev.requests(Command::SRssh)[0];
        let table: Vec<u32> = (0..8).map(|i| word(&req[HDR..], i)).collect();
        assert_eq!(table, vec![2, 2, 3, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn test_key_only() {
        let dev = rss_device(8, 40, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        ethtool.set_flow_hash("eth0", |c| c.key(vec![0x5a; 40])).unwrap();

        let req = &dev.requests(Command::SRssh)[0];
        assert_eq!(req.len(), HDR + 40);
        let hdr = header(req);
        assert_eq!(hdr.indir_size, RXFH_INDIR_NO_CHANGE);
        assert_eq!(hdr.key_size, 40);
        assert!(req[HDR..].iter().all(|&b| b == 0x5a));
    }

    #[test]
    fn test_table_and_key() {
        let dev = rss_device(4, 4, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        ethtool
            .set_flow_hash("eth0", |c| c.equal(1, 2).key([1u8, 2, 3, 4]))
            .unwrap();

        let req = &dev.requests(Command::SRssh)[0];
        assert_eq!(req.len(), HDR + 16 + 4);
        assert_eq!(header(req).indir_size, 4);
        assert_eq!(&req[HDR + 16..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_key_size_mismatch() {
        let dev = rss_device(8, 40, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool
            .set_flow_hash("eth0", |c| c.key(vec![0xaa; 4]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::KeySizeMismatch {
                expected: 40,
                actual: 4
            }
        ));
        assert!(!dev.issued(Command::SRssh));
    }

    #[test]
    fn test_key_unsupported() {
        let dev = rss_device(8, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool
            .set_flow_hash("eth0", |c| c.key(vec![0xaa; 40]))
            .unwrap_err();
        assert!(err.is_not_supported());
        assert!(!dev.issued(Command::SRssh));
    }

    #[test]
    fn test_hash_function() {
        let dev = rss_device(8, 0, 0b111);
        let ethtool = Ethtool::with_transport(&dev);

        ethtool.set_flow_hash("eth0", |c| c.hash_func("xor")).unwrap();

        let req = &dev.requests(Command::SRssh)[0];
        assert_eq!(req.len(), HDR);
        let hdr = header(req);
        assert_eq!(hdr.hfunc, 0b010);
        assert_eq!(hdr.indir_size, RXFH_INDIR_NO_CHANGE);
    }

    #[test]
    fn test_unknown_hash_function() {
        let dev = rss_device(8, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool
            .set_flow_hash("eth0", |c| c.equal(0, 2).hash_func("siphash"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownHashFunction { ref name } if name == "siphash"));
        assert!(!dev.issued(Command::SRssh));
    }

    #[test]
    fn test_hash_function_unsupported() {
        let dev = rss_device(8, 0, 0);
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool
            .set_flow_hash("eth0", |c| c.hash_func("toeplitz"))
            .unwrap_err();
        assert!(err.is_not_supported());
        assert!(!dev.issued(Command::SRssh));
    }

    #[test]
    fn test_new_context_returns_id() {
        let dev = FakeDevice::new()
            .ring_count(8)
            .on(Command::GRssh, grssh(4, 0, 0b001))
            .on(Command::SRssh, |data| {
                let (mut hdr, _) = EthtoolRxfh::read_from_prefix(data).unwrap();
                assert_eq!(hdr.rss_context, RssContext::ALLOC.id());
                hdr.rss_context = 7;
                hdr.write_to_prefix(data).unwrap();
                Ok(())
            });
        let ethtool = Ethtool::with_transport(&dev);

        let ctx = ethtool
            .set_flow_hash("eth0", |c| c.new_context().equal(4, 4))
            .unwrap();
        assert_eq!(ctx, RssContext(7));
    }

    #[test]
    fn test_existing_context_returns_none() {
        let dev = rss_device(4, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let ctx = ethtool
            .set_flow_hash("eth0", |c| c.context(RssContext(2)).equal(0, 2))
            .unwrap();
        assert_eq!(ctx, RssContext::NONE);
        assert_eq!(header(&dev.requests(Command::SRssh)[0]).rss_context, 2);
    }

    #[test]
    fn test_delete_context() {
        let dev = rss_device(128, 40, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let ctx = ethtool
            .set_flow_hash("eth0", |c| c.delete(RssContext(3)))
            .unwrap();
        assert_eq!(ctx, RssContext::NONE);

        let req = &dev.requests(Command::SRssh)[0];
        assert_eq!(req.len(), HDR);
        let hdr = header(req);
        assert_eq!(hdr.rss_context, 3);
        assert_eq!(hdr.indir_size, 0);
        assert_eq!(hdr.key_size, 0);
    }

    #[test]
    fn test_default_table() {
        let dev = rss_device(128, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        ethtool.set_flow_hash("eth0", |c| c.default_table()).unwrap();

        let req = &dev.requests(Command::SRssh)[0];
        assert_eq!(req.len(), HDR);
        assert_eq!(header(req).indir_size, 0);
    }

    #[test]
    fn test_weights_exceed_table() {
        let dev = rss_device(4, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool
            .set_flow_hash("eth0", |c| c.weighted(0, [4u32, 4]))
            .unwrap_err();
        assert!(matches!(err, Error::Fill(_)));
        assert!(!dev.issued(Command::SRssh));
    }

    #[test]
    fn test_empty_request_sends_nothing() {
        let dev = rss_device(4, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool.set_flow_hash("eth0", |c| c).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(dev.commands().is_empty());
    }

    #[test]
    fn test_device_sizes_are_capped() {
        let dev = FakeDevice::new()
            .ring_count(4)
            .on(Command::GRssh, grssh(1 << 28, u32::MAX, 0))
            .on(Command::SRssh, |_| Ok(()));
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool.set_flow_hash("eth0", |c| c.equal(0, 2)).unwrap_err();
        assert!(err.is_out_of_range(), "{err}");
        assert!(!dev.issued(Command::SRssh));
    }

    #[test]
    fn test_legacy_fallback() {
        let dev = FakeDevice::new()
            .ring_count(4)
            .on(Command::GRxfhIndir, |data| {
                let (mut hdr, _) = EthtoolRxfhIndir::read_from_prefix(data).unwrap();
                hdr.size = 4;
                hdr.write_to_prefix(data).unwrap();
                Ok(())
            })
            .on(Command::SRxfhIndir, |_| Ok(()));
        let ethtool = Ethtool::with_transport(&dev);

        let ctx = ethtool.set_flow_hash("eth0", |c| c.equal(0, 2)).unwrap();
        assert_eq!(ctx, RssContext::NONE);

        let reqs = dev.requests(Command::SRxfhIndir);
        assert_eq!(reqs.len(), 1);
        let req = &reqs[0];
        assert_eq!(req.len(), 8 + 16);
        assert_eq!(word(req, 1), 4);
        let table: Vec<u32> = (0..4).map(|i| word(&req[8..], i)).collect();
        assert_eq!(table, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_no_legacy_fallback_with_key() {
        let dev = FakeDevice::new()
            .ring_count(4)
            .on(Command::SRxfhIndir, |_| Ok(()));
        let ethtool = Ethtool::with_transport(&dev);

        let err = ethtool
            .set_flow_hash("eth0", |c| c.equal(0, 2).key([1u8; 40]))
            .unwrap_err();
        assert!(err.is_not_supported());
        assert!(!dev.issued(Command::SRxfhIndir));
    }

    #[test]
    fn test_request_header_is_native_layout() {
        let dev = rss_device(4, 0, 0b001);
        let ethtool = Ethtool::with_transport(&dev);

        ethtool.set_flow_hash("eth0", |c| c.equal(0, 1)).unwrap();
        let req = &dev.requests(Command::SRssh)[0];
        assert_eq!(&req[..4], Command::SRssh.code().as_bytes());
    }
}
