//! Fixed-layout record reading
//!
//! Type-definition records are 32 bytes: 8 consecutive little-endian u32
//! fields. Records are addressed by slot index from a caller-supplied base.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LE};

use crate::{Error, Result, FIELD_COUNT, RECORD_SIZE};

/// One record as read from the image: raw bytes plus decoded fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord {
    /// Absolute byte offset the record was read from
    pub offset: u64,
    /// The 32 raw bytes
    pub bytes: [u8; RECORD_SIZE as usize],
    /// The 8 fields, decoded little-endian in field order
    pub fields: [u32; FIELD_COUNT],
}

impl RawRecord {
    /// Field 0: index of the type's name in the string table
    #[inline]
    pub fn name_index(&self) -> u32 {
        self.fields[0]
    }
}

/// Read the record at `record_base + slot * 32`
///
/// Seeks to the computed offset and reads exactly 32 bytes. Fails with
/// [`Error::SeekOutOfRange`] when the offset is at or past end of source,
/// or [`Error::Truncated`] when the record starts in-bounds but fewer than
/// 32 bytes remain.
pub fn read_record<R: Read + Seek>(source: &mut R, record_base: u64, slot: u32) -> Result<RawRecord> {
    // Saturate on overflow; a wrapped offset must never land back in bounds
    let offset = record_base.saturating_add(u64::from(slot).saturating_mul(RECORD_SIZE));
    let len = source.seek(SeekFrom::End(0))?;

    if offset >= len {
        return Err(Error::SeekOutOfRange { offset, len });
    }
    if len - offset < RECORD_SIZE {
        return Err(Error::Truncated {
            offset,
            needed: RECORD_SIZE as usize,
            actual: (len - offset) as usize,
        });
    }

    source.seek(SeekFrom::Start(offset))?;
    let mut bytes = [0u8; RECORD_SIZE as usize];
    source.read_exact(&mut bytes)?;

    let mut fields = [0u32; FIELD_COUNT];
    for (i, field) in fields.iter_mut().enumerate() {
        *field = LE::read_u32(&bytes[i * 4..i * 4 + 4]);
    }

    Ok(RawRecord {
        offset,
        bytes,
        fields,
    })
}
