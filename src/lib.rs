//! Foldtab: compact Unicode case folding tables.
//!
//! The crate provides:
//! - A bit-packed table format and its encoder / O(log n) lookup (`table`)
//! - A `CaseFolding.txt` reader (`source`)
//! - C and Rust source emitters for the encoded tables (`emit`)
//! - String-level folding on top of a table (`fold`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use foldtab::source::{self, SourceOptions};
//! use foldtab::table::{Fold, encode_all};
//!
//! let data = "\
//! 00DF; F; 0073 0073; # LATIN SMALL LETTER SHARP S
//! 0130; F; 0069 0307; # LATIN CAPITAL LETTER I WITH DOT ABOVE
//! ";
//! let records = source::parse(data, &SourceOptions::default()).unwrap();
//! let table = encode_all(&records).unwrap();
//!
//! assert_eq!(table.lookup(0x130).as_str(), Some("i\u{307}"));
//! assert_eq!(table.lookup(0x131), Fold::Identity(0x131));
//! assert_eq!(table.fold_str("GROß"), "gross");
//! ```

pub mod emit;
pub mod fold;
pub mod io;
pub mod source;
pub mod table;

#[cfg(feature = "cli")]
pub mod cli;

pub use table::{Fold, FoldTable, FoldTableRef};
