//! String table resolution
//!
//! The metadata string table is a contiguous region of null-terminated
//! strings referenced by byte offset from a caller-supplied base. Resolution
//! is best-effort: the table's extent is not separately bounded, so the scan
//! trusts the next NUL byte, the configured length cap, or end-of-source.

use std::io::{Read, Seek, SeekFrom};

use memchr::memchr;

use crate::{Result, INVALID_STRING_INDEX, NULL_NAME};

/// Scan chunk size for terminator search
const CHUNK_SIZE: usize = 256;

/// Default maximum string length in bytes (64 KiB)
pub const DEFAULT_MAX_STRING_LEN: usize = 64 * 1024;

/// How malformed UTF-8 bytes in a string entry are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Drop malformed bytes silently; the scan for the terminator continues
    #[default]
    Lenient,
    /// Substitute U+FFFD for malformed sequences
    Replace,
}

/// String resolution options
#[derive(Debug, Clone, Copy)]
pub struct StringOptions {
    /// Hard cap on scanned bytes per string; the table itself is unbounded
    pub max_len: usize,
    pub mode: DecodeMode,
}

impl Default for StringOptions {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_STRING_LEN,
            mode: DecodeMode::Lenient,
        }
    }
}

/// Resolve the string at `string_base + index`
///
/// The reserved index `0xFFFFFFFF` resolves to `"NULL"` without touching the
/// source. Otherwise bytes are accumulated up to the first NUL, the length
/// cap, or end-of-source, whichever comes first, then decoded per
/// [`DecodeMode`]. A position at or past end-of-source yields an empty
/// string, not an error; only OS-level I/O failures propagate.
pub fn resolve_string<R: Read + Seek>(
    source: &mut R,
    string_base: u64,
    index: u32,
    opts: &StringOptions,
) -> Result<String> {
    if index == INVALID_STRING_INDEX {
        return Ok(NULL_NAME.to_string());
    }

    // Saturate on overflow so a pathological base falls into the past-EOF case
    let position = string_base.saturating_add(u64::from(index));
    let len = source.seek(SeekFrom::End(0))?;
    if position >= len {
        return Ok(String::new());
    }

    source.seek(SeekFrom::Start(position))?;

    let mut accumulated: Vec<u8> = Vec::new();
    let mut buf = [0u8; CHUNK_SIZE];

    while accumulated.len() < opts.max_len {
        let want = CHUNK_SIZE.min(opts.max_len - accumulated.len());
        let n = source.read(&mut buf[..want])?;
        if n == 0 {
            break;
        }

        match memchr(0, &buf[..n]) {
            Some(terminator) => {
                accumulated.extend_from_slice(&buf[..terminator]);
                break;
            }
            None => accumulated.extend_from_slice(&buf[..n]),
        }
    }

    Ok(decode(&accumulated, opts.mode))
}

/// Decode accumulated bytes per the configured mode
fn decode(bytes: &[u8], mode: DecodeMode) -> String {
    match mode {
        DecodeMode::Replace => String::from_utf8_lossy(bytes).into_owned(),
        DecodeMode::Lenient => {
            let mut out = String::with_capacity(bytes.len());
            let mut rest = bytes;
            loop {
                match std::str::from_utf8(rest) {
                    Ok(s) => {
                        out.push_str(s);
                        break;
                    }
                    Err(e) => {
                        let (valid, after) = rest.split_at(e.valid_up_to());
                        out.push_str(std::str::from_utf8(valid).unwrap_or(""));
                        match e.error_len() {
                            // Skip the malformed bytes, keep scanning
                            Some(skip) => rest = &after[skip..],
                            // Incomplete sequence at the end; drop it
                            None => break,
                        }
                    }
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// A source that panics on any I/O, to prove a call does none
    struct NoIo;

    impl Read for NoIo {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            panic!("read performed");
        }
    }

    impl Seek for NoIo {
        fn seek(&mut self, _pos: SeekFrom) -> std::io::Result<u64> {
            panic!("seek performed");
        }
    }

    fn table(base: usize, entries: &[u8]) -> Cursor<Vec<u8>> {
        let mut data = vec![0x55u8; base];
        data.extend_from_slice(entries);
        Cursor::new(data)
    }

    #[test]
    fn test_invalid_index_is_null_with_zero_io() {
        let mut source = NoIo;
        let name =
            resolve_string(&mut source, 0xBCFE15, INVALID_STRING_INDEX, &Default::default())
                .unwrap();
        assert_eq!(name, "NULL");
    }

    #[test]
    fn test_resolve_at_relative_offset() {
        // "Foo\0" lives at relative offset 10 inside the table
        let mut entries = vec![0u8; 10];
        entries.extend_from_slice(b"Foo\0junk");
        let mut source = table(0x100, &entries);

        let name = resolve_string(&mut source, 0x100, 10, &Default::default()).unwrap();
        assert_eq!(name, "Foo");
    }

    #[test]
    fn test_missing_terminator_returns_remainder() {
        let mut source = table(0x20, b"Int32");
        let name = resolve_string(&mut source, 0x20, 0, &Default::default()).unwrap();
        assert_eq!(name, "Int32");
    }

    #[test]
    fn test_position_past_end_is_empty() {
        let mut source = table(0, b"abc\0");
        let name = resolve_string(&mut source, 0, 100, &Default::default()).unwrap();
        assert_eq!(name, "");
    }

    #[test]
    fn test_position_overflow_is_empty() {
        // base + index would wrap u64; resolves like any past-EOF position
        let mut source = table(0, b"abc\0");
        let name =
            resolve_string(&mut source, u64::MAX - 2, 100, &Default::default()).unwrap();
        assert_eq!(name, "");
    }

    #[test]
    fn test_empty_entry() {
        let mut source = table(0, b"\0abc");
        let name = resolve_string(&mut source, 0, 0, &Default::default()).unwrap();
        assert_eq!(name, "");
    }

    #[test]
    fn test_lenient_drops_malformed_bytes() {
        // 0xFF is never valid UTF-8; it vanishes without aborting the scan
        let mut source = table(0, b"In\xFFt32\0");
        let name = resolve_string(&mut source, 0, 0, &Default::default()).unwrap();
        assert_eq!(name, "Int32");
    }

    #[test]
    fn test_replace_substitutes_malformed_bytes() {
        let mut source = table(0, b"In\xFFt32\0");
        let opts = StringOptions {
            mode: DecodeMode::Replace,
            ..Default::default()
        };
        let name = resolve_string(&mut source, 0, 0, &opts).unwrap();
        assert_eq!(name, "In\u{FFFD}t32");
    }

    #[test]
    fn test_max_len_caps_scan() {
        let mut data = vec![b'A'; 1000];
        data.push(0);
        let mut source = Cursor::new(data);
        let opts = StringOptions {
            max_len: 16,
            ..Default::default()
        };
        let name = resolve_string(&mut source, 0, 0, &opts).unwrap();
        assert_eq!(name.len(), 16);
    }

    #[test]
    fn test_terminator_across_chunk_boundary() {
        // Entry longer than one scan chunk
        let mut data = vec![b'x'; CHUNK_SIZE + 37];
        data.push(0);
        let mut source = Cursor::new(data);
        let name = resolve_string(&mut source, 0, 0, &Default::default()).unwrap();
        assert_eq!(name.len(), CHUNK_SIZE + 37);
    }

    #[test]
    fn test_multibyte_utf8_survives() {
        let mut source = table(4, "Größe\0".as_bytes());
        let name = resolve_string(&mut source, 4, 0, &Default::default()).unwrap();
        assert_eq!(name, "Größe");
    }
}
