//! Shared utilities for ethio.

pub mod ifname;
pub mod parse;

pub use ifname::IfName;
pub use parse::{get_bool, get_hash_key, get_u32, get_weights};
