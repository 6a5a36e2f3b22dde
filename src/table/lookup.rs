// Runtime lookup.
//
// The main table is sorted by code point, so a lookup is a binary search on
// the low 17 bits of each entry followed by a slice into the side table.
// Nothing here allocates; results borrow from the replacement table.

use super::entry::Entry;

/// Result of folding a single code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold<'a> {
    /// The code point folds to these UTF-8 bytes.
    Replace(&'a [u8]),
    /// No folding is defined; the code point maps to itself.
    Identity(u32),
}

impl<'a> Fold<'a> {
    pub fn is_identity(&self) -> bool {
        matches!(self, Fold::Identity(_))
    }

    /// The replacement bytes, if any.
    pub fn replacement(&self) -> Option<&'a [u8]> {
        match *self {
            Fold::Replace(bytes) => Some(bytes),
            Fold::Identity(_) => None,
        }
    }

    /// The replacement as text. `None` for identity, and for bytes that are
    /// not UTF-8 (a table not produced by the encoder).
    pub fn as_str(&self) -> Option<&'a str> {
        self.replacement().and_then(|b| std::str::from_utf8(b).ok())
    }
}

// ---------------------------------------------------------------------------
// Borrowed table
// ---------------------------------------------------------------------------

/// A table pair borrowed from elsewhere, typically emitted static arrays.
///
/// ```
/// use foldtab::table::{Fold, FoldTableRef};
///
/// static MAIN: [u32; 1] = [0x130 | 3 << 29];
/// static REPL: [u8; 4] = [0x69, 0xCC, 0x87, 0x00];
/// static TABLE: FoldTableRef<'static> = FoldTableRef::new(&MAIN, &REPL);
///
/// assert_eq!(TABLE.lookup(0x130), Fold::Replace("i\u{307}".as_bytes()));
/// assert_eq!(TABLE.lookup(0x131), Fold::Identity(0x131));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldTableRef<'a> {
    main: &'a [u32],
    repl: &'a [u8],
}

impl<'a> FoldTableRef<'a> {
    pub const EMPTY: FoldTableRef<'static> = FoldTableRef {
        main: &[],
        repl: &[],
    };

    /// Wrap a main table and its side table.
    ///
    /// The pair should come from the same encoder run. An entry whose range
    /// falls outside `repl` is treated as absent.
    pub const fn new(main: &'a [u32], repl: &'a [u8]) -> Self {
        Self { main, repl }
    }

    pub fn main_table(&self) -> &'a [u32] {
        self.main
    }

    pub fn repl_table(&self) -> &'a [u8] {
        self.repl
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    /// Iterate decoded entries in table order.
    pub fn entries(self) -> impl ExactSizeIterator<Item = Entry> + 'a {
        self.main.iter().map(|&raw| Entry::from_raw(raw))
    }

    /// Find the entry for `code_point`.
    pub fn find(self, code_point: u32) -> Option<Entry> {
        let pos = self
            .main
            .binary_search_by(|&raw| Entry::from_raw(raw).code_point().cmp(&code_point));
        match pos {
            Err(_) => None,
            Ok(n) => Some(Entry::from_raw(self.main[n])),
        }
    }

    /// Fold one code point.
    pub fn lookup(self, code_point: u32) -> Fold<'a> {
        match self.find(code_point) {
            Some(e) => self
                .repl
                .get(e.repl_range())
                .map_or(Fold::Identity(code_point), Fold::Replace),
            None => Fold::Identity(code_point),
        }
    }
}

impl Default for FoldTableRef<'_> {
    fn default() -> Self {
        FoldTableRef::EMPTY
    }
}

// ---------------------------------------------------------------------------
// Owned table
// ---------------------------------------------------------------------------

/// An immutable table pair produced by [`TableEncoder`](super::TableEncoder).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldTable {
    main: Vec<u32>,
    repl: Vec<u8>,
}

impl FoldTable {
    pub(crate) fn from_parts_unchecked(main: Vec<u32>, repl: Vec<u8>) -> Self {
        Self { main, repl }
    }

    /// Borrow as a [`FoldTableRef`].
    pub fn as_table_ref(&self) -> FoldTableRef<'_> {
        FoldTableRef::new(&self.main, &self.repl)
    }

    pub fn main_table(&self) -> &[u32] {
        &self.main
    }

    pub fn repl_table(&self) -> &[u8] {
        &self.repl
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = Entry> + '_ {
        self.as_table_ref().entries()
    }

    pub fn find(&self, code_point: u32) -> Option<Entry> {
        self.as_table_ref().find(code_point)
    }

    pub fn lookup(&self, code_point: u32) -> Fold<'_> {
        self.as_table_ref().lookup(code_point)
    }

    /// Split into `(main_table, repl_table)`.
    pub fn into_parts(self) -> (Vec<u32>, Vec<u8>) {
        (self.main, self.repl)
    }
}
