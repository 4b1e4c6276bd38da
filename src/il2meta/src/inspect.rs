//! Type catalog inspection
//!
//! Walks a fixed count of record slots, decoding each record and resolving
//! its name against the string table. Decoding is lazy and per-slot
//! independent: a failed slot is tagged with its index and, depending on
//! policy, either skipped or ends the run. Already-decoded slots are never
//! discarded.

use std::io::{Read, Seek};

use serde::Serialize;

use crate::record::{read_record, RawRecord};
use crate::strings::{resolve_string, StringOptions};
use crate::{Error, FIELD_COUNT, RECORD_SIZE};

/// What to do when a slot fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnSlotError {
    /// Yield the error and stop the run
    #[default]
    Abort,
    /// Yield the error and continue with the next slot
    Skip,
}

/// Inspection parameters; both bases are absolute byte offsets into the image
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    /// Base offset of the type-definition record array
    pub record_base: u64,
    /// Base offset of the string table
    pub string_base: u64,
    /// Number of record slots to decode
    pub count: u32,
    pub on_slot_error: OnSlotError,
    pub strings: StringOptions,
}

impl InspectorConfig {
    pub fn new(record_base: u64, string_base: u64, count: u32) -> Self {
        Self {
            record_base,
            string_base,
            count,
            on_slot_error: OnSlotError::default(),
            strings: StringOptions::default(),
        }
    }
}

/// One fully decoded record slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedRecord {
    /// Zero-based slot index within the record array
    pub slot: u32,
    /// Absolute byte offset of the record
    pub offset: u64,
    /// Field 0, the string table index of the type's name
    pub name_index: u32,
    /// Resolved name, or "NULL" for the reserved index
    pub name: String,
    /// All 8 fields in record order (fields[0] == name_index)
    pub fields: [u32; FIELD_COUNT],
    /// The record's raw bytes
    pub bytes: [u8; RECORD_SIZE as usize],
}

/// A slot decode failure, tagged with where it happened
#[derive(thiserror::Error, Debug)]
#[error("slot {slot} at 0x{offset:x}: {source}")]
pub struct SlotError {
    pub slot: u32,
    pub offset: u64,
    #[source]
    pub source: Error,
}

/// Decodes record slots against a string table
#[derive(Debug, Clone)]
pub struct Inspector {
    config: InspectorConfig,
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        Self { config }
    }

    /// Start a lazy run over slots `0..count` in ascending order
    ///
    /// Each decode re-reads from the source, so a fresh run on an unmodified
    /// source yields an identical sequence.
    pub fn run<'a, R: Read + Seek>(&'a self, source: &'a mut R) -> Run<'a, R> {
        Run {
            config: &self.config,
            source,
            next_slot: 0,
            done: false,
        }
    }
}

/// Lazy iterator over decoded slots; see [`Inspector::run`]
pub struct Run<'a, R> {
    config: &'a InspectorConfig,
    source: &'a mut R,
    next_slot: u32,
    done: bool,
}

impl<R: Read + Seek> Run<'_, R> {
    fn decode_slot(&mut self, slot: u32) -> Result<DecodedRecord, SlotError> {
        let offset = self
            .config
            .record_base
            .saturating_add(u64::from(slot).saturating_mul(RECORD_SIZE));
        let tag = move |source: Error| SlotError {
            slot,
            offset,
            source,
        };

        let record = read_record(self.source, self.config.record_base, slot).map_err(tag)?;
        let name = resolve_string(
            self.source,
            self.config.string_base,
            record.name_index(),
            &self.config.strings,
        )
        .map_err(tag)?;

        Ok(assemble(slot, record, name))
    }

    /// Drain the run into successfully decoded slots and tagged failures
    pub fn collect_partial(self) -> (Vec<DecodedRecord>, Vec<SlotError>) {
        let mut records = Vec::new();
        let mut errors = Vec::new();
        for item in self {
            match item {
                Ok(record) => records.push(record),
                Err(err) => errors.push(err),
            }
        }
        (records, errors)
    }
}

impl<R: Read + Seek> Iterator for Run<'_, R> {
    type Item = Result<DecodedRecord, SlotError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next_slot >= self.config.count {
            return None;
        }

        let slot = self.next_slot;
        self.next_slot += 1;

        let item = self.decode_slot(slot);
        if item.is_err() && self.config.on_slot_error == OnSlotError::Abort {
            self.done = true;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = (self.config.count - self.next_slot) as usize;
        // Abort policy may end the run early
        (0, Some(remaining))
    }
}

fn assemble(slot: u32, record: RawRecord, name: String) -> DecodedRecord {
    DecodedRecord {
        slot,
        offset: record.offset,
        name_index: record.name_index(),
        name,
        fields: record.fields,
        bytes: record.bytes,
    }
}
