#![no_main]
use foldtab::table::{Fold, MappingRecord, TableEncoder};
use libfuzzer_sys::fuzz_target;

// Records are decoded from 4-byte chunks: a 17-bit code point delta and a
// replacement length. Whatever the encoder accepts must look up exactly.
fuzz_target!(|data: &[u8]| {
    let mut enc = TableEncoder::new();
    let mut accepted = Vec::new();
    let mut cp = 0x80u32;
    for chunk in data.chunks_exact(4) {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        cp = cp.saturating_add(1 + (word & 0xFFF));
        let len = (word >> 29) as usize;
        let record = MappingRecord::new(cp, vec!['x'; len]);
        if enc.push(&record).is_ok() {
            accepted.push(record);
        }
    }
    let table = enc.finish();
    assert_eq!(table.len(), accepted.len());
    for r in &accepted {
        assert_eq!(table.lookup(r.code_point), Fold::Replace("x".repeat(r.replacement.len()).as_bytes()));
    }
    for probe in data.chunks_exact(3) {
        let q = u32::from_le_bytes([probe[0], probe[1], probe[2], 0]);
        if accepted.binary_search_by_key(&q, |r| r.code_point).is_err() {
            assert_eq!(table.lookup(q), Fold::Identity(q));
        }
    }
});
