//! ethio-ethtool: query and control network devices through ethio.
//!
//! Covers the subset of ethtool that ethio implements: driver info,
//! statistics, features, channels, coalescing, module EEPROM and RX flow
//! hash (RSS) configuration.

mod module;

use std::process;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use ethio::util::parse::ParseError;
use ethio::util::{get_bool, get_hash_key, get_u32, get_weights};
use ethio::{Ethtool, FlowHashBuilder, RssContext};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "ethio-ethtool", version)]
#[command(about = "Query and control network device settings")]
struct Cli {
    /// Print results as JSON
    #[arg(short = 'j', long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Device name (when no subcommand is given)
    device: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show device settings (default action)
    Show {
        /// Device name
        device: String,
    },
    /// Show driver information
    #[command(short_flag = 'i')]
    Driver {
        /// Device name
        device: String,
    },
    /// Show NIC statistics
    #[command(short_flag = 'S')]
    Stats {
        /// Device name
        device: String,
    },
    /// Show device features (offloads)
    #[command(short_flag = 'k')]
    Features {
        /// Device name
        device: String,
    },
    /// Change device features
    #[command(short_flag = 'K')]
    SetFeatures {
        /// Device name
        device: String,
        /// Feature name and value pairs, e.g. `rx-gro off tx-tso on`
        #[arg(required = true, num_args = 2..)]
        changes: Vec<String>,
    },
    /// Show permanent hardware address
    #[command(short_flag = 'P')]
    PermAddr {
        /// Device name
        device: String,
    },
    /// Show plug-in module information
    #[command(short_flag = 'm')]
    Module {
        /// Device name
        device: String,
        /// Dump the raw EEPROM as hex
        #[arg(long)]
        hex: bool,
    },
    /// Show channel counts
    #[command(short_flag = 'l')]
    Channels {
        /// Device name
        device: String,
    },
    /// Change channel counts
    #[command(short_flag = 'L')]
    SetChannels {
        /// Device name
        device: String,
        #[arg(long, value_parser = parse_u32)]
        rx: Option<u32>,
        #[arg(long, value_parser = parse_u32)]
        tx: Option<u32>,
        #[arg(long, value_parser = parse_u32)]
        other: Option<u32>,
        #[arg(long, value_parser = parse_u32)]
        combined: Option<u32>,
    },
    /// Show coalesce parameters
    #[command(short_flag = 'c')]
    Coalesce {
        /// Device name
        device: String,
    },
    /// Change coalesce parameters
    #[command(short_flag = 'C')]
    SetCoalesce {
        /// Device name
        device: String,
        #[arg(long, value_parser = parse_u32)]
        rx_usecs: Option<u32>,
        #[arg(long, value_parser = parse_u32)]
        rx_frames: Option<u32>,
        #[arg(long, value_parser = parse_u32)]
        tx_usecs: Option<u32>,
        #[arg(long, value_parser = parse_u32)]
        tx_frames: Option<u32>,
        #[arg(long, value_parser = parse_switch)]
        adaptive_rx: Option<bool>,
        #[arg(long, value_parser = parse_switch)]
        adaptive_tx: Option<bool>,
    },
    /// Show RX flow hash indirection table, key and hash function
    #[command(short_flag = 'x')]
    Rxfh {
        /// Device name
        device: String,
        /// RSS context
        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        context: u32,
    },
    /// Change RX flow hash configuration
    #[command(short_flag = 'X')]
    SetRxfh {
        /// Device name
        device: String,
        /// Spread flows evenly over N rings
        #[arg(long, value_parser = parse_u32, conflicts_with_all = ["weight", "default", "delete"])]
        equal: Option<u32>,
        /// Spread flows by per-ring weight, e.g. `2,1,1,1`
        #[arg(long, value_parser = parse_weights, conflicts_with_all = ["default", "delete"])]
        weight: Option<Weights>,
        /// First ring used by --equal or --weight
        #[arg(long, default_value_t = 0, value_parser = parse_u32)]
        start: u32,
        /// Reset the table to the driver default
        #[arg(long, conflicts_with = "delete")]
        default: bool,
        /// Delete the context given with --context
        #[arg(long, requires = "context")]
        delete: bool,
        /// Existing RSS context to change
        #[arg(long, value_parser = parse_u32, conflicts_with = "new_context")]
        context: Option<u32>,
        /// Allocate a new RSS context
        #[arg(long)]
        new_context: bool,
        /// Hash key as colon-separated hex bytes
        #[arg(long, value_parser = parse_hash_key)]
        hkey: Option<HashKey>,
        /// Hash function name
        #[arg(long)]
        hfunc: Option<String>,
    },
}

/// Parsed `--hkey` value.
#[derive(Clone, Debug)]
struct HashKey(Vec<u8>);

fn parse_hash_key(s: &str) -> Result<HashKey, ParseError> {
    get_hash_key(s).map(HashKey)
}

/// Parsed `--weight` value.
#[derive(Clone, Debug)]
struct Weights(Vec<u32>);

fn parse_weights(s: &str) -> Result<Weights, ParseError> {
    get_weights(s).map(Weights)
}

/// Decimal or `0x`-prefixed hex.
fn parse_u32(s: &str) -> Result<u32, ParseError> {
    get_u32(s)
}

fn parse_switch(s: &str) -> Result<bool, ParseError> {
    get_bool(s)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            if let Some(device) = cli.device {
                Commands::Show { device }
            } else {
                eprintln!("Usage: ethio-ethtool <device> or ethio-ethtool <subcommand>");
                process::exit(1);
            }
        }
    };

    if let Err(e) = run(command, json) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(command: Commands, json: bool) -> anyhow::Result<()> {
    let ethtool = Ethtool::new().context("open ethtool socket")?;

    match command {
        Commands::Show { device } => show_device(&ethtool, &device, json),
        Commands::Driver { device } => show_driver(&ethtool, &device, json),
        Commands::Stats { device } => show_stats(&ethtool, &device, json),
        Commands::Features { device } => show_features(&ethtool, &device, json),
        Commands::SetFeatures { device, changes } => set_features(&ethtool, &device, &changes),
        Commands::PermAddr { device } => show_perm_addr(&ethtool, &device, json),
        Commands::Module { device, hex } => module::show(&ethtool, &device, hex, json),
        Commands::Channels { device } => show_channels(&ethtool, &device, json),
        Commands::SetChannels {
            device,
            rx,
            tx,
            other,
            combined,
        } => {
            if rx.is_none() && tx.is_none() && other.is_none() && combined.is_none() {
                bail!("no channel counts given");
            }
            let channels = ethtool.set_channels(&device, |mut c| {
                if let Some(n) = rx {
                    c = c.rx(n);
                }
                if let Some(n) = tx {
                    c = c.tx(n);
                }
                if let Some(n) = other {
                    c = c.other(n);
                }
                if let Some(n) = combined {
                    c = c.combined(n);
                }
                c
            })?;
            print_channels(&device, &channels, json)
        }
        Commands::Coalesce { device } => {
            let coalesce = ethtool.get_coalesce(&device)?;
            print_coalesce(&device, &coalesce, json)
        }
        Commands::SetCoalesce {
            device,
            rx_usecs,
            rx_frames,
            tx_usecs,
            tx_frames,
            adaptive_rx,
            adaptive_tx,
        } => {
            let coalesce = ethtool.set_coalesce(&device, |mut c| {
                if let Some(v) = rx_usecs {
                    c = c.rx_usecs(v);
                }
                if let Some(v) = rx_frames {
                    c = c.rx_max_frames(v);
                }
                if let Some(v) = tx_usecs {
                    c = c.tx_usecs(v);
                }
                if let Some(v) = tx_frames {
                    c = c.tx_max_frames(v);
                }
                if let Some(v) = adaptive_rx {
                    c = c.use_adaptive_rx(v);
                }
                if let Some(v) = adaptive_tx {
                    c = c.use_adaptive_tx(v);
                }
                c
            })?;
            print_coalesce(&device, &coalesce, json)
        }
        Commands::Rxfh { device, context } => {
            show_rxfh(&ethtool, &device, RssContext(context), json)
        }
        Commands::SetRxfh {
            device,
            equal,
            weight,
            start,
            default,
            delete,
            context,
            new_context,
            hkey,
            hfunc,
        } => {
            let mut builder = FlowHashBuilder::new();
            if let Some(n) = equal {
                builder = builder.equal(start, n);
            } else if let Some(Weights(weights)) = weight {
                builder = builder.weighted(start, weights);
            } else if default {
                builder = builder.default_table();
            }
            if new_context {
                builder = builder.new_context();
            } else if let Some(id) = context {
                builder = if delete {
                    builder.delete(RssContext(id))
                } else {
                    builder.context(RssContext(id))
                };
            }
            if let Some(HashKey(key)) = hkey {
                builder = builder.key(key);
            }
            if let Some(name) = hfunc {
                builder = builder.hash_func(name);
            }

            let created = ethtool.set_flow_hash(&device, move |_| builder)?;
            if new_context {
                if json {
                    print_json(&serde_json::json!({ "context": created }))?;
                } else {
                    println!("New RSS context is {}", created);
                }
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turn not-supported and permission-denied outcomes into a note on stderr.
fn tolerate<T>(device: &str, result: ethio::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_supported() || e.is_permission_denied() => {
            eprintln!("{}: {}", device, e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

fn show_device(ethtool: &Ethtool, device: &str, json: bool) -> anyhow::Result<()> {
    // Virtual devices often lack link settings; show what is available.
    let settings = match ethtool.get_settings(device) {
        Err(e) if e.is_not_supported() => {
            tracing::debug!(device, "link settings not supported");
            None
        }
        other => Some(other?),
    };
    let msg_level = ethtool.get_msg_level(device).ok();
    let link = ethtool.get_link_state(device)?;

    if json {
        return print_json(&serde_json::json!({
            "settings": settings,
            "msg_level": msg_level,
            "link_detected": link,
        }));
    }

    println!("Settings for {}:", device);

    if let Some(s) = &settings {
        let ports = s.supported_ports();
        if !ports.is_empty() {
            println!("\tSupported ports: [ {} ]", ports.join(" "));
        }

        let supported = s.supported_modes();
        if !supported.is_empty() {
            println!("\tSupported link modes:");
            for mode in supported {
                println!("\t\t{}", mode);
            }
        }
        println!(
            "\tSupports auto-negotiation: {}",
            if s.supports_autoneg() { "Yes" } else { "No" }
        );

        let advertised = s.advertised_modes();
        if !advertised.is_empty() {
            println!("\tAdvertised link modes:");
            for mode in advertised {
                println!("\t\t{}", mode);
            }
        }

        match s.speed {
            Some(speed) => println!("\tSpeed: {}Mb/s", speed),
            None => println!("\tSpeed: Unknown!"),
        }
        println!("\tDuplex: {}", s.duplex);
        println!("\tPort: {}", s.port);
        println!("\tPHYAD: {}", s.phy_address);
        println!("\tTransceiver: {}", s.transceiver);
        println!("\tAuto-negotiation: {}", on_off(s.autoneg));
        println!("\tMDI-X: {}", s.mdix);
    }

    if let Some(level) = msg_level {
        println!("\tCurrent message level: {}", level);
    }
    println!("\tLink detected: {}", yes_no(link));

    Ok(())
}

fn show_driver(ethtool: &Ethtool, device: &str, json: bool) -> anyhow::Result<()> {
    let info = ethtool.get_driver_info(device)?;

    if json {
        return print_json(&info);
    }

    println!("driver: {}", info.driver);
    println!("version: {}", info.version);
    println!("firmware-version: {}", info.fw_version);
    println!("expansion-rom-version: {}", info.erom_version);
    println!("bus-info: {}", info.bus_info);
    println!("supports-statistics: {}", yes_no(info.n_stats > 0));
    println!("supports-test: {}", yes_no(info.testinfo_len > 0));
    println!("supports-eeprom-access: {}", yes_no(info.eedump_len > 0));
    println!("supports-register-dump: {}", yes_no(info.regdump_len > 0));
    println!("supports-priv-flags: {}", yes_no(info.n_priv_flags > 0));

    Ok(())
}

fn show_stats(ethtool: &Ethtool, device: &str, json: bool) -> anyhow::Result<()> {
    let stats = ethtool.get_stats(device)?;

    if json {
        let map: serde_json::Map<String, serde_json::Value> = stats
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect();
        return print_json(&map);
    }

    println!("NIC statistics:");
    for (name, value) in stats {
        println!("     {}: {}", name, value);
    }

    Ok(())
}

fn show_features(ethtool: &Ethtool, device: &str, json: bool) -> anyhow::Result<()> {
    let features = ethtool.get_features(device)?;

    if json {
        return print_json(&features);
    }

    println!("Features for {}:", device);

    for feature in &features.features {
        let mut notes = Vec::new();
        if !feature.available || feature.never_changed {
            notes.push("fixed".to_string());
        }
        if feature.requested != feature.active {
            notes.push(format!("requested {}", on_off(feature.requested)));
        }

        if notes.is_empty() {
            println!("{}: {}", feature.name, on_off(feature.active));
        } else {
            println!(
                "{}: {} [{}]",
                feature.name,
                on_off(feature.active),
                notes.join(", ")
            );
        }
    }

    Ok(())
}

fn set_features(ethtool: &Ethtool, device: &str, changes: &[String]) -> anyhow::Result<()> {
    if changes.len() % 2 != 0 {
        bail!("feature changes must be name and on|off pairs");
    }

    let pairs = changes
        .chunks(2)
        .map(|pair| {
            let enabled = get_bool(&pair[1])
                .with_context(|| format!("value for feature `{}`", pair[0]))?;
            Ok((pair[0].as_str(), enabled))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    ethtool.set_features(device, |mut f| {
        for (name, enabled) in &pairs {
            f = f.set(name, *enabled);
        }
        f
    })?;

    Ok(())
}

fn show_perm_addr(ethtool: &Ethtool, device: &str, json: bool) -> anyhow::Result<()> {
    let addr = ethtool.get_perm_addr(device)?;

    if json {
        return print_json(&serde_json::json!({ "permanent_address": addr }));
    }

    match addr {
        Some(addr) => println!("Permanent address: {}", addr),
        None => println!("Permanent address: not set"),
    }

    Ok(())
}

fn show_channels(ethtool: &Ethtool, device: &str, json: bool) -> anyhow::Result<()> {
    let channels = ethtool.get_channels(device)?;
    print_channels(device, &channels, json)
}

fn print_channels(
    device: &str,
    channels: &ethio::ethtool::Channels,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        return print_json(channels);
    }

    println!("Channel parameters for {}:", device);

    println!("Pre-set maximums:");
    println!("\tRX:\t\t{}", channels.rx_max);
    println!("\tTX:\t\t{}", channels.tx_max);
    println!("\tOther:\t\t{}", channels.other_max);
    println!("\tCombined:\t{}", channels.combined_max);

    println!("Current hardware settings:");
    println!("\tRX:\t\t{}", channels.rx_count);
    println!("\tTX:\t\t{}", channels.tx_count);
    println!("\tOther:\t\t{}", channels.other_count);
    println!("\tCombined:\t{}", channels.combined_count);

    Ok(())
}

fn print_coalesce(
    device: &str,
    coalesce: &ethio::ethtool::Coalesce,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        return print_json(coalesce);
    }

    println!("Coalesce parameters for {}:", device);
    println!(
        "Adaptive RX: {}  TX: {}",
        on_off(coalesce.use_adaptive_rx),
        on_off(coalesce.use_adaptive_tx)
    );
    println!("stats-block-usecs:\t{}", coalesce.stats_block_usecs);
    println!("sample-interval:\t{}", coalesce.rate_sample_interval);
    println!("pkt-rate-low:\t\t{}", coalesce.pkt_rate_low);
    println!("pkt-rate-high:\t\t{}", coalesce.pkt_rate_high);
    println!();
    println!("rx-usecs:\t{}", coalesce.rx_usecs);
    println!("rx-frames:\t{}", coalesce.rx_max_frames);
    println!("rx-usecs-irq:\t{}", coalesce.rx_usecs_irq);
    println!("rx-frames-irq:\t{}", coalesce.rx_max_frames_irq);
    println!();
    println!("tx-usecs:\t{}", coalesce.tx_usecs);
    println!("tx-frames:\t{}", coalesce.tx_max_frames);
    println!("tx-usecs-irq:\t{}", coalesce.tx_usecs_irq);
    println!("tx-frames-irq:\t{}", coalesce.tx_max_frames_irq);
    println!();
    println!("rx-usecs-low:\t{}", coalesce.rx_usecs_low);
    println!("rx-frames-low:\t{}", coalesce.rx_max_frames_low);
    println!("tx-usecs-low:\t{}", coalesce.tx_usecs_low);
    println!("tx-frames-low:\t{}", coalesce.tx_max_frames_low);
    println!();
    println!("rx-usecs-high:\t{}", coalesce.rx_usecs_high);
    println!("rx-frames-high:\t{}", coalesce.rx_max_frames_high);
    println!("tx-usecs-high:\t{}", coalesce.tx_usecs_high);
    println!("tx-frames-high:\t{}", coalesce.tx_max_frames_high);

    Ok(())
}

fn show_rxfh(
    ethtool: &Ethtool,
    device: &str,
    context: RssContext,
    json: bool,
) -> anyhow::Result<()> {
    let Some(hash) = tolerate(device, ethtool.get_flow_hash(device, context))? else {
        return Ok(());
    };

    if json {
        return print_json(&hash);
    }

    println!(
        "RX flow hash indirection table for {} with {} RX ring(s):",
        device, hash.ring_count
    );
    match &hash.table {
        Some(table) if !table.is_empty() => print!("{}", table),
        _ => println!("Operation not supported"),
    }

    println!("RSS hash key:");
    match hash.key_hex() {
        Some(key) if !key.is_empty() => println!("{}", key),
        _ => println!("Operation not supported"),
    }

    println!("RSS hash function:");
    match &hash.funcs {
        Some(funcs) => {
            for (name, enabled) in funcs {
                println!("    {}: {}", name, on_off(*enabled));
            }
        }
        None => println!("    Operation not supported"),
    }

    Ok(())
}
