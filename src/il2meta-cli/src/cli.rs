//! CLI argument definitions for il2meta
//!
//! Base offsets are caller-supplied; nothing in the image is trusted to
//! locate the tables. Offsets accept `0x`-prefixed hex or plain decimal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "il2meta")]
#[command(about = "IL2CPP global-metadata inspector", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode type-definition records and resolve their names
    #[command(visible_alias = "t")]
    Typedefs {
        /// Path to the metadata image (e.g. global-metadata.dat)
        input: PathBuf,

        /// Base offset of the type-definition record array
        #[arg(long, value_parser = parse_offset)]
        typedefs: u64,

        /// Base offset of the string table
        #[arg(long, value_parser = parse_offset)]
        strings: u64,

        /// Number of record slots to decode
        #[arg(short = 'n', long, default_value = "10")]
        count: u32,

        /// Report failed slots on stderr and keep decoding
        #[arg(short = 'k', long)]
        skip_errors: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Maximum bytes to scan per string entry
        #[arg(long, default_value_t = il2meta::DEFAULT_MAX_STRING_LEN)]
        max_string_len: usize,

        /// Render malformed string bytes as U+FFFD instead of dropping them
        #[arg(long)]
        lossy: bool,
    },

    /// Resolve a single string table index
    #[command(visible_alias = "s")]
    String {
        /// Path to the metadata image
        input: PathBuf,

        /// Base offset of the string table
        #[arg(long, value_parser = parse_offset)]
        strings: u64,

        /// String table index (0xFFFFFFFF is the "no string" sentinel)
        #[arg(value_parser = parse_offset)]
        index: u64,
    },
}

/// Parse a byte offset, accepting `0x`-prefixed hex or decimal
pub fn parse_offset(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|_| format!("invalid offset '{s}' (expected decimal or 0x-prefixed hex)"))
}
