// Table construction.
//
// TableEncoder consumes mapping records in ascending code point order and
// appends one packed entry per record to the main table and the record's
// UTF-8 replacement to the side table. After every record the running
// offset is padded back to an even value so that the next offset can be
// stored halved.

use log::{debug, trace};

use super::entry::{CODE_POINT_LIMIT, Entry, REPL_OFFSET_LIMIT, REPL_SIZE_LIMIT};
use super::lookup::FoldTable;

// ---------------------------------------------------------------------------
// Input record
// ---------------------------------------------------------------------------

/// One folding: `code_point` folds to the `replacement` sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
    pub code_point: u32,
    pub replacement: Vec<char>,
}

impl MappingRecord {
    pub fn new(code_point: u32, replacement: impl Into<Vec<char>>) -> Self {
        Self {
            code_point,
            replacement: replacement.into(),
        }
    }

    /// Byte length of the UTF-8 encoded replacement.
    pub fn utf8_len(&self) -> usize {
        self.replacement.iter().map(|c| c.len_utf8()).sum()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Construction failure. Any of these aborts the whole build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("code point U+{code_point:04X} does not fit in 17 bits")]
    CodePointTooLarge { code_point: u32 },
    #[error("replacement for U+{code_point:04X} is {len} bytes long (max 7)")]
    ReplacementTooLong { code_point: u32, len: usize },
    #[error("replacement table full at U+{code_point:04X}: offset {offset} exceeds the 12-bit index")]
    TableOverflow { code_point: u32, offset: usize },
    #[error("U+{code_point:04X} follows U+{previous:04X}; records must be strictly ascending")]
    UnsortedInput { previous: u32, code_point: u32 },
}

impl BuildError {
    /// The code point of the record that failed.
    pub fn code_point(&self) -> u32 {
        match *self {
            Self::CodePointTooLarge { code_point }
            | Self::ReplacementTooLong { code_point, .. }
            | Self::TableOverflow { code_point, .. }
            | Self::UnsortedInput { code_point, .. } => code_point,
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Summary of an encoder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of main-table entries.
    pub entries: usize,
    /// Side table length in bytes, padding included.
    pub repl_bytes: usize,
    /// Number of zero pad bytes in the side table.
    pub padding_bytes: usize,
    /// Longest single replacement in bytes.
    pub longest_replacement: usize,
}

// ---------------------------------------------------------------------------
// TableEncoder
// ---------------------------------------------------------------------------

/// Incremental table builder.
///
/// # Example
/// ```
/// use foldtab::table::{MappingRecord, TableEncoder};
///
/// let mut enc = TableEncoder::new();
/// enc.push(&MappingRecord::new(0x130, ['i', '\u{307}'])).unwrap();
/// let table = enc.finish();
/// assert_eq!(table.repl_table(), &[0x69, 0xCC, 0x87, 0x00]);
/// ```
#[derive(Debug, Default)]
pub struct TableEncoder {
    main: Vec<u32>,
    repl: Vec<u8>,
    /// Byte offset the next replacement is written at. Always even.
    next_offset: usize,
    last_code_point: Option<u32>,
    padding: usize,
    longest: usize,
}

impl TableEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the main table for `entries` records.
    ///
    /// The hint is capped at [`CODE_POINT_LIMIT`]: no strictly ascending
    /// input can hold more entries than that.
    pub fn with_capacity(entries: usize) -> Self {
        let entries = entries.min(CODE_POINT_LIMIT as usize);
        Self {
            main: Vec::with_capacity(entries),
            repl: Vec::with_capacity(entries.saturating_mul(2).min(REPL_OFFSET_LIMIT)),
            ..Self::default()
        }
    }

    /// Append one record.
    ///
    /// All checks run before either table is touched, so a failed push
    /// leaves the encoder unchanged.
    pub fn push(&mut self, record: &MappingRecord) -> Result<Entry, BuildError> {
        let code_point = record.code_point;
        let len = record.utf8_len();

        if code_point >= CODE_POINT_LIMIT {
            return Err(BuildError::CodePointTooLarge { code_point });
        }
        if len >= REPL_SIZE_LIMIT {
            return Err(BuildError::ReplacementTooLong { code_point, len });
        }
        if self.next_offset >= REPL_OFFSET_LIMIT {
            return Err(BuildError::TableOverflow {
                code_point,
                offset: self.next_offset,
            });
        }
        if let Some(previous) = self.last_code_point
            && code_point <= previous
        {
            return Err(BuildError::UnsortedInput {
                previous,
                code_point,
            });
        }

        let entry = Entry::pack(code_point, self.next_offset, len);
        trace!(
            "U+{code_point:04X}: offset {} size {len} -> {:#010X}",
            self.next_offset,
            entry.raw()
        );
        self.main.push(entry.raw());

        let mut buf = [0u8; 4];
        for c in &record.replacement {
            self.repl.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        self.next_offset += len;

        if self.next_offset % 2 != 0 {
            self.repl.push(0);
            self.next_offset += 1;
            self.padding += 1;
        }

        self.last_code_point = Some(code_point);
        self.longest = self.longest.max(len);
        Ok(entry)
    }

    /// Number of entries pushed so far.
    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    /// Offset the next replacement will be stored at.
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    pub fn stats(&self) -> BuildStats {
        BuildStats {
            entries: self.main.len(),
            repl_bytes: self.repl.len(),
            padding_bytes: self.padding,
            longest_replacement: self.longest,
        }
    }

    /// Freeze the tables.
    pub fn finish(self) -> FoldTable {
        self.finish_with_stats().0
    }

    /// Freeze the tables, also returning the run's statistics.
    pub fn finish_with_stats(self) -> (FoldTable, BuildStats) {
        let stats = self.stats();
        debug!(
            "fold table: {} entries ({} bytes), {} replacement bytes ({} padding)",
            self.main.len(),
            self.main.len() * 4,
            self.repl.len(),
            self.padding
        );
        (FoldTable::from_parts_unchecked(self.main, self.repl), stats)
    }
}

/// Build a table from a complete record sequence.
pub fn encode_all<'r, I>(records: I) -> Result<FoldTable, BuildError>
where
    I: IntoIterator<Item = &'r MappingRecord>,
{
    encode_with_stats(records).map(|(table, _)| table)
}

/// Like [`encode_all`], also returning the build statistics.
pub fn encode_with_stats<'r, I>(records: I) -> Result<(FoldTable, BuildStats), BuildError>
where
    I: IntoIterator<Item = &'r MappingRecord>,
{
    let records = records.into_iter();
    let mut enc = TableEncoder::with_capacity(records.size_hint().0);
    for record in records {
        enc.push(record)?;
    }
    Ok(enc.finish_with_stats())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
