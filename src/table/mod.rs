// Bit-packed case folding table.
//
// - `entry`:   32-bit packed entry layout and field accessors
// - `encoder`: records -> (main table, replacement table)
// - `lookup`:  FoldTable / FoldTableRef, binary search + side-table slice

pub mod encoder;
pub mod entry;
pub mod lookup;

pub use encoder::{
    BuildError, BuildStats, MappingRecord, TableEncoder, encode_all, encode_with_stats,
};
pub use entry::Entry;
pub use lookup::{Fold, FoldTable, FoldTableRef};
