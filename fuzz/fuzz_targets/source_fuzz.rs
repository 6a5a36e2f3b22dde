#![no_main]
use foldtab::source::{self, FoldKind, SourceOptions};
use foldtab::table::{Fold, encode_all};
use libfuzzer_sys::fuzz_target;

// Arbitrary CaseFolding.txt text: parsing and encoding may fail, but a table
// that does get built must return every parsed replacement.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for kind in [FoldKind::Full, FoldKind::Simple] {
        let Ok(records) = source::parse(text, &SourceOptions { kind }) else {
            continue;
        };
        let Ok(table) = encode_all(&records) else {
            continue;
        };
        for r in &records {
            let expected: String = r.replacement.iter().collect();
            assert_eq!(table.lookup(r.code_point), Fold::Replace(expected.as_bytes()));
        }
    }
});
