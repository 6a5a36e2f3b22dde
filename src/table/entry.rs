// Packed main-table entry.
//
// Each entry is a single u32:
//
//   bits  0..=16  code point            (17 bits)
//   bits 17..=28  replacement offset / 2 (12 bits)
//   bits 29..=31  replacement length     (3 bits)
//
// The replacement offset is always even, so its lowest bit is not stored.

use std::ops::Range;

/// Width of the code point field.
pub const CODE_POINT_BITS: u32 = 17;
/// Width of the halved replacement offset field.
pub const REPL_IDX_BITS: u32 = 12;
/// Width of the replacement length field.
pub const REPL_SIZE_BITS: u32 = 3;

pub const REPL_IDX_SHIFT: u32 = CODE_POINT_BITS;
pub const REPL_SIZE_SHIFT: u32 = CODE_POINT_BITS + REPL_IDX_BITS;

pub const CODE_POINT_MASK: u32 = (1 << CODE_POINT_BITS) - 1; // 0x1FFFF
pub const REPL_IDX_MASK: u32 = (1 << REPL_IDX_BITS) - 1; // 0xFFF

/// Exclusive upper bound for an encodable code point (`CF_MAX`).
pub const CODE_POINT_LIMIT: u32 = 1 << CODE_POINT_BITS;

/// Exclusive upper bound for a replacement's UTF-8 length.
pub const REPL_SIZE_LIMIT: usize = 1 << REPL_SIZE_BITS;

/// Exclusive upper bound for a replacement byte offset.
pub const REPL_OFFSET_LIMIT: usize = 2 << REPL_IDX_BITS;

/// A packed main-table entry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entry(u32);

impl Entry {
    /// Wrap a raw table word without checking it.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Pack the three fields. Callers must have checked every field against
    /// its limit; the encoder does this and reports a `BuildError` instead.
    pub(crate) fn pack(code_point: u32, repl_offset: usize, repl_size: usize) -> Self {
        debug_assert!(code_point < CODE_POINT_LIMIT);
        debug_assert!(repl_offset < REPL_OFFSET_LIMIT);
        debug_assert!(repl_offset % 2 == 0, "odd replacement offset {repl_offset}");
        debug_assert!(repl_size < REPL_SIZE_LIMIT);

        let raw = code_point
            | ((repl_offset / 2) as u32) << REPL_IDX_SHIFT
            | (repl_size as u32) << REPL_SIZE_SHIFT;
        let entry = Self(raw);
        debug_assert!(
            entry.code_point() == code_point
                && entry.repl_index() == repl_offset
                && entry.repl_size() == repl_size
        );
        entry
    }

    /// `CF_CODE_POINT(x)`: the folded code point.
    #[inline]
    pub const fn code_point(self) -> u32 {
        self.0 & CODE_POINT_MASK
    }

    /// The stored (halved) replacement offset.
    #[inline]
    pub const fn repl_idx_half(self) -> u32 {
        (self.0 >> REPL_IDX_SHIFT) & REPL_IDX_MASK
    }

    /// `CF_REPL_IDX(x)`: byte offset of the replacement in the side table.
    #[inline]
    pub const fn repl_index(self) -> usize {
        self.repl_idx_half() as usize * 2
    }

    /// `CF_REPL_SIZE(x)`: byte length of the replacement.
    #[inline]
    pub const fn repl_size(self) -> usize {
        (self.0 >> REPL_SIZE_SHIFT) as usize
    }

    /// Byte range of the replacement in the side table.
    #[inline]
    pub const fn repl_range(self) -> Range<usize> {
        self.repl_index()..self.repl_index() + self.repl_size()
    }
}

impl From<Entry> for u32 {
    fn from(e: Entry) -> u32 {
        e.0
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("raw", &format_args!("{:#010X}", self.0))
            .field("code_point", &format_args!("U+{:04X}", self.code_point()))
            .field("repl_index", &self.repl_index())
            .field("repl_size", &self.repl_size())
            .finish()
    }
}
