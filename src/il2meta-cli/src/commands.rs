//! Command handlers

use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use il2meta::{
    resolve_string, DecodedRecord, Inspector, InspectorConfig, OnSlotError, SlotError,
    StringOptions,
};

/// Decode records from a metadata image on disk
fn decode(input: &Path, config: InspectorConfig) -> Result<(Vec<DecodedRecord>, Vec<SlotError>)> {
    let mut source = File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    Ok(Inspector::new(config).run(&mut source).collect_partial())
}

/// Render one decoded record in the dump format
fn render(record: &DecodedRecord) -> String {
    let fields = record
        .fields
        .iter()
        .map(|f| format!("{f:#x}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    let _ = writeln!(out, "Type {} @ {:#X}:", record.slot, record.offset);
    let _ = writeln!(out, "    NameIdx: {} ('{}')", record.name_index, record.name);
    let _ = writeln!(out, "    Raw: [{fields}]");
    let _ = writeln!(out, "    Hex: {}", hex::encode(record.bytes));
    out
}

/// `il2meta typedefs` - decode and print a run of type-definition records
pub fn typedefs(input: &Path, config: InspectorConfig, json: bool) -> Result<()> {
    let abort = config.on_slot_error == OnSlotError::Abort;
    let (records, errors) = decode(input, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            print!("{}", render(record));
        }
    }

    if abort {
        if let Some(err) = errors.into_iter().next() {
            return Err(err).context("Failed to decode record");
        }
    } else {
        for err in &errors {
            eprintln!("Warning: failed to decode record: {err}");
        }
    }

    Ok(())
}

/// Resolve one string table index from a metadata image on disk
fn lookup(input: &Path, string_base: u64, index: u64) -> Result<String> {
    let Ok(index) = u32::try_from(index) else {
        bail!("String index {index:#x} does not fit in 32 bits");
    };

    let mut source = File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    Ok(resolve_string(&mut source, string_base, index, &StringOptions::default())?)
}

/// `il2meta string` - resolve a single string table index
pub fn resolve(input: &Path, string_base: u64, index: u64) -> Result<()> {
    let name = lookup(input, string_base, index)?;
    println!("String at index {index}: '{name}'");
    Ok(())
}
