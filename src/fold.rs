// String-level case folding on top of a fold table.
//
// The table only covers code points >= 0x80. ASCII is folded here with
// `to_ascii_lowercase`, matching CaseFolding.txt for that range.

use std::borrow::Cow;

use crate::table::{Fold, FoldTable, FoldTableRef};

impl<'t> FoldTableRef<'t> {
    /// Fold one character, appending the result to `out`.
    pub fn fold_char_into(self, c: char, out: &mut String) {
        if c.is_ascii() {
            out.push(c.to_ascii_lowercase());
            return;
        }
        self.lookup(c as u32).push_to(c, out);
    }

    fn changes(self, c: char) -> bool {
        if c.is_ascii() {
            c.is_ascii_uppercase()
        } else {
            !self.lookup(c as u32).is_identity()
        }
    }

    /// Fold a string, borrowing it when no character changes.
    ///
    /// ```
    /// # use foldtab::table::{MappingRecord, encode_all};
    /// # use std::borrow::Cow;
    /// let table = encode_all(&[MappingRecord::new(0xDF, ['s', 's'])]).unwrap();
    /// let t = table.as_table_ref();
    /// assert!(matches!(t.fold_str("strasse"), Cow::Borrowed("strasse")));
    /// assert_eq!(t.fold_str("STRAßE"), "strasse");
    /// ```
    pub fn fold_str<'s>(self, s: &'s str) -> Cow<'s, str> {
        match s.char_indices().find(|&(_, c)| self.changes(c)) {
            Some((pos, _)) => {
                let mut output = String::with_capacity(s.len() + 8);
                // Everything before `pos` is already folded.
                output.push_str(&s[..pos]);
                for c in s[pos..].chars() {
                    self.fold_char_into(c, &mut output);
                }
                Cow::Owned(output)
            }
            None => Cow::Borrowed(s),
        }
    }

    /// Case-insensitive equality under full folding.
    pub fn eq_ignore_case(self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        self.fold_str(a) == self.fold_str(b)
    }
}

impl FoldTable {
    pub fn fold_str<'s>(&self, s: &'s str) -> Cow<'s, str> {
        self.as_table_ref().fold_str(s)
    }

    pub fn eq_ignore_case(&self, a: &str, b: &str) -> bool {
        self.as_table_ref().eq_ignore_case(a, b)
    }
}

impl Fold<'_> {
    /// Append the folded form of `c` (the character this result was looked
    /// up for) to `out`.
    pub fn push_to(&self, c: char, out: &mut String) {
        match self.as_str() {
            Some(s) => out.push_str(s),
            None => out.push(c),
        }
    }
}
