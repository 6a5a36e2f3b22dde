use foldtab::source::{self, FoldKind, SourceOptions};
use foldtab::table::entry::REPL_OFFSET_LIMIT;
use foldtab::table::{
    BuildError, Entry, Fold, FoldTableRef, MappingRecord, TableEncoder, encode_all,
};

const EXCERPT: &str = include_str!("data/CaseFolding-excerpt.txt");

fn records(kind: FoldKind) -> Vec<MappingRecord> {
    source::parse(EXCERPT, &SourceOptions { kind }).unwrap()
}

fn utf8(chars: &[char]) -> Vec<u8> {
    chars.iter().collect::<String>().into_bytes()
}

fn round_up_even(n: usize) -> usize {
    n + (n & 1)
}

// ---------------------------------------------------------------------------
// Real data
// ---------------------------------------------------------------------------

#[test]
fn excerpt_record_counts() {
    assert_eq!(records(FoldKind::Full).len(), 24);
    assert_eq!(records(FoldKind::Simple).len(), 16);
}

#[test]
fn every_record_round_trips() {
    for kind in [FoldKind::Full, FoldKind::Simple] {
        let recs = records(kind);
        let table = encode_all(&recs).unwrap();
        assert_eq!(table.len(), recs.len());
        for r in &recs {
            assert_eq!(
                table.lookup(r.code_point),
                Fold::Replace(&utf8(&r.replacement)),
                "U+{:04X} ({kind:?})",
                r.code_point
            );
        }
    }
}

#[test]
fn absent_code_points_are_identity() {
    let recs = records(FoldKind::Full);
    let table = encode_all(&recs).unwrap();
    let present: std::collections::HashSet<u32> = recs.iter().map(|r| r.code_point).collect();
    for q in (0..0x11000).chain([0x1E8FF, 0x1E901, 0x1FFFF, 0x20000, 0x10FFFF]) {
        if !present.contains(&q) {
            assert_eq!(table.lookup(q), Fold::Identity(q), "U+{q:04X}");
        }
    }
}

#[test]
fn full_and_simple_differ_where_expected() {
    let full = encode_all(&records(FoldKind::Full)).unwrap();
    let simple = encode_all(&records(FoldKind::Simple)).unwrap();

    assert_eq!(full.lookup(0x1E9E).as_str(), Some("ss"));
    assert_eq!(simple.lookup(0x1E9E).as_str(), Some("\u{DF}"));

    assert_eq!(full.lookup(0xDF).as_str(), Some("ss"));
    assert!(simple.lookup(0xDF).is_identity());

    // Turkic mappings are never selected.
    assert_eq!(full.lookup(0x130).as_str(), Some("i\u{307}"));
    assert!(simple.lookup(0x130).is_identity());
}

#[test]
fn offsets_are_even_and_monotonic() {
    let table = encode_all(&records(FoldKind::Full)).unwrap();
    let entries: Vec<Entry> = table.entries().collect();

    assert_eq!(entries[0].repl_index(), 0);
    for e in &entries {
        assert_eq!(e.repl_index() % 2, 0, "{e:?}");
    }
    for pair in entries.windows(2) {
        assert!(pair[0].code_point() < pair[1].code_point());
        assert_eq!(
            pair[1].repl_index(),
            round_up_even(pair[0].repl_index() + pair[0].repl_size()),
            "{:?} -> {:?}",
            pair[0],
            pair[1]
        );
    }
    let last = entries.last().unwrap();
    assert_eq!(
        table.repl_table().len(),
        round_up_even(last.repl_index() + last.repl_size())
    );
}

#[test]
fn string_folding_with_real_data() {
    let table = encode_all(&records(FoldKind::Full)).unwrap();
    assert_eq!(table.fold_str("MAẞE"), "masse");
    assert_eq!(table.fold_str("ﬃ"), "ffi");
    assert_eq!(table.fold_str("ΑΣ"), "ασ");
    assert_eq!(table.fold_str("\u{212A}elvin"), "kelvin");
    assert!(table.eq_ignore_case("MASSE", "Maße"));
    assert!(table.eq_ignore_case("𐐀", "𐐨"));
}

#[test]
fn sample_pair_folds_correctly() {
    let recs = records(FoldKind::Full);
    let table = encode_all(&recs).unwrap();
    let (input, expected) = source::sample_pairs(&recs, 3);
    assert_eq!(input.chars().count(), recs.len().div_ceil(3));
    assert_eq!(table.fold_str(&input), expected);
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn dotted_i_then_single_byte() {
    let mut enc = TableEncoder::new();
    let first = enc
        .push(&MappingRecord::new(0x0130, ['\u{69}', '\u{307}']))
        .unwrap();
    assert_eq!(first.code_point(), 0x130);
    assert_eq!(first.repl_size(), 3);
    assert_eq!(first.repl_idx_half(), 0);
    assert_eq!(enc.next_offset(), 4);

    let second = enc.push(&MappingRecord::new(0x212A, ['k'])).unwrap();
    assert_eq!(second.repl_idx_half(), 2);
    assert_eq!(second.repl_size(), 1);
    assert_eq!(enc.next_offset(), 6);

    let table = enc.finish();
    assert_eq!(table.repl_table(), &[0x69, 0xCC, 0x87, 0x00, b'k', 0x00]);
    assert_eq!(table.main_table(), &[0x6000_0130, 0x2004_212A]);
}

// ---------------------------------------------------------------------------
// Boundaries
// ---------------------------------------------------------------------------

/// Records with 2-byte replacements, so record `i` lands at offset `2 * i`.
fn two_byte_records(n: u32) -> Vec<MappingRecord> {
    (0..n)
        .map(|i| MappingRecord::new(0x100 + i, ['\u{E9}']))
        .collect()
}

#[test]
fn overflow_boundary() {
    // 4096 records fit: halved offsets 0..=4095.
    let fits = REPL_OFFSET_LIMIT / 2;
    let recs = two_byte_records(fits as u32 + 1);

    let table = encode_all(&recs[..fits]).unwrap();
    assert_eq!(table.entries().last().unwrap().repl_idx_half(), 0xFFF);

    let mut enc = TableEncoder::new();
    for r in &recs[..fits] {
        enc.push(r).unwrap();
    }
    assert_eq!(enc.next_offset(), REPL_OFFSET_LIMIT);

    let overflow = &recs[fits];
    assert_eq!(
        enc.push(overflow),
        Err(BuildError::TableOverflow {
            code_point: overflow.code_point,
            offset: REPL_OFFSET_LIMIT
        })
    );
    assert!(matches!(
        encode_all(&recs),
        Err(BuildError::TableOverflow { .. })
    ));
}

#[test]
fn zero_length_replacements_do_not_consume_space() {
    // Never produced by the parser, but the format allows repl_size == 0.
    let mut recs = two_byte_records(10);
    recs.push(MappingRecord::new(0x200, Vec::<char>::new()));
    let table = encode_all(&recs).unwrap();
    assert_eq!(table.lookup(0x200), Fold::Replace(&[]));
    assert_eq!(table.repl_table().len(), 20);
}

#[test]
fn size_and_code_point_boundaries() {
    let ok = encode_all(&[
        MappingRecord::new(0x1FFFF, ['\u{10428}', '\u{1F00}']),
    ])
    .unwrap();
    assert_eq!(ok.find(0x1FFFF).unwrap().repl_size(), 7);

    assert_eq!(
        encode_all(&[MappingRecord::new(0x100, ['\u{10428}', '\u{10428}'])]),
        Err(BuildError::ReplacementTooLong {
            code_point: 0x100,
            len: 8
        })
    );
    assert_eq!(
        encode_all(&[MappingRecord::new(0x20000, ['a'])]),
        Err(BuildError::CodePointTooLarge {
            code_point: 0x20000
        })
    );
}

#[test]
fn unsorted_input_is_rejected() {
    let mut recs = records(FoldKind::Full);
    recs.swap(3, 4);
    let err = encode_all(&recs).unwrap_err();
    assert!(matches!(err, BuildError::UnsortedInput { .. }));
}

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

static MAIN: [u32; 2] = [0x4000_00DF, 0x4002_1E9E];
static REPL: [u8; 4] = [b's', b's', b's', b's'];
static SHARP_S: FoldTableRef<'static> = FoldTableRef::new(&MAIN, &REPL);

#[test]
fn static_table_matches_encoder_output() {
    let built = encode_all(&[
        MappingRecord::new(0xDF, ['s', 's']),
        MappingRecord::new(0x1E9E, ['s', 's']),
    ])
    .unwrap();
    assert_eq!(built.main_table(), &MAIN);
    assert_eq!(built.repl_table(), &REPL);
    assert_eq!(SHARP_S.lookup(0x1E9E).as_str(), Some("ss"));
    assert_eq!(SHARP_S.fold_str("GROẞ"), "gross");

    // Lookups are shareable across threads without synchronization.
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| SHARP_S.lookup(0xDF).as_str() == Some("ss")))
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }
}
