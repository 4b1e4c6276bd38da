//! IL2CPP global-metadata inspector
//!
//! Decodes fixed-layout type-definition records out of a `global-metadata.dat`
//! image and resolves their name indices against the metadata string table.
//!
//! # Format Overview
//!
//! ## Type-definition records
//!
//! A packed array of 32-byte records at a caller-supplied base offset:
//! - 8 fields, each a 4-byte little-endian unsigned integer
//! - Field 0: index into the string table (the type's name)
//! - Fields 1-7: opaque at this layer
//!
//! ## String table
//!
//! A contiguous region of null-terminated strings at a caller-supplied base
//! offset. Records reference strings by byte offset relative to that base.
//! The index `0xFFFFFFFF` is reserved and means "no string".
//!
//! Neither base offset is discovered from the image; both come from the
//! caller (the metadata header that would locate them is out of scope).

mod record;
mod strings;

pub mod inspect;

pub use inspect::{DecodedRecord, Inspector, InspectorConfig, OnSlotError, Run, SlotError};
pub use record::{read_record, RawRecord};
pub use strings::{resolve_string, DecodeMode, StringOptions, DEFAULT_MAX_STRING_LEN};

/// Size of one type-definition record in bytes
pub const RECORD_SIZE: u64 = 32;

/// Number of u32 fields in one record
pub const FIELD_COUNT: usize = 8;

/// Reserved string index meaning "no string"
pub const INVALID_STRING_INDEX: u32 = 0xFFFF_FFFF;

/// Name returned for the reserved string index
pub const NULL_NAME: &str = "NULL";

/// Errors from metadata reading
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Seek to 0x{offset:x} is beyond end of source (len 0x{len:x})")]
    SeekOutOfRange { offset: u64, len: u64 },

    #[error("Truncated record at 0x{offset:x}: need {needed} bytes, got {actual}")]
    Truncated {
        offset: u64,
        needed: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(RECORD_SIZE, 32);
        assert_eq!(FIELD_COUNT, 8);
        assert_eq!(RECORD_SIZE as usize, FIELD_COUNT * 4);
        assert_eq!(INVALID_STRING_INDEX, u32::MAX);
    }

    #[test]
    fn test_error_display() {
        let err = Error::SeekOutOfRange {
            offset: 0x100,
            len: 0x80,
        };
        assert!(err.to_string().contains("beyond end of source"));

        let err = Error::Truncated {
            offset: 0x60,
            needed: 32,
            actual: 12,
        };
        assert!(err.to_string().contains("need 32 bytes, got 12"));
    }
}
