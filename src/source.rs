// CaseFolding.txt reader.
//
// Each data line has the form
//
//   <code>; <status>; <mapping>; # <name>
//
// where <mapping> is one or more space-separated hex code points. Status is
// one of C (common), F (full), S (simple) or T (Turkic). Only the statuses
// selected by the fold kind are kept, and code points below 0x80 are dropped
// because ASCII is folded without the table.

use log::debug;

use crate::table::MappingRecord;

/// First code point stored in the table.
pub const FIRST_NON_ASCII: u32 = 0x80;

/// Default stride for [`sample_pairs`].
pub const DEFAULT_SAMPLE_STRIDE: usize = 20;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Which mappings to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoldKind {
    /// C + F: multi-character replacements allowed.
    #[default]
    Full,
    /// C + S: always a single character.
    Simple,
}

impl FoldKind {
    pub fn selects(self, status: Status) -> bool {
        match status {
            Status::Common => true,
            Status::Full => self == FoldKind::Full,
            Status::Simple => self == FoldKind::Simple,
            Status::Turkic => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FoldKind::Full => "full",
            FoldKind::Simple => "simple",
        }
    }
}

/// Reader configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOptions {
    pub kind: FoldKind,
}

/// Status field of a CaseFolding.txt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Common,
    Full,
    Simple,
    Turkic,
}

impl Status {
    fn parse(field: &str) -> Option<Self> {
        match field {
            "C" => Some(Status::Common),
            "F" => Some(Status::Full),
            "S" => Some(Status::Simple),
            "T" => Some(Status::Turkic),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("invalid hex code point `{0}`")]
    InvalidHex(String),
    #[error("unknown status `{0}`")]
    UnknownStatus(String),
    #[error("U+{0:04X} is not a Unicode scalar value")]
    NotScalar(u32),
    #[error("empty mapping")]
    EmptyMapping,
}

/// A malformed data line. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

/// One parsed data line, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFoldingLine {
    pub code_point: u32,
    pub status: Status,
    pub mapping: Vec<char>,
}

fn parse_hex(s: &str) -> Result<u32, ParseErrorKind> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseErrorKind::InvalidHex(s.to_string()));
    }
    u32::from_str_radix(s, 16).map_err(|_| ParseErrorKind::InvalidHex(s.to_string()))
}

fn parse_scalar(s: &str) -> Result<char, ParseErrorKind> {
    let cp = parse_hex(s)?;
    char::from_u32(cp).ok_or(ParseErrorKind::NotScalar(cp))
}

/// Parse a single line. Blank and comment-only lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<CaseFoldingLine>, ParseErrorKind> {
    let data = match line.split_once('#') {
        Some((data, _comment)) => data,
        None => line,
    };
    if data.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = data.split(';');
    let code = fields.next().ok_or(ParseErrorKind::MissingField("code"))?;
    let status = fields
        .next()
        .ok_or(ParseErrorKind::MissingField("status"))?
        .trim();
    let mapping = fields.next().ok_or(ParseErrorKind::MissingField("mapping"))?;

    let code_point = parse_scalar(code)? as u32;
    let status =
        Status::parse(status).ok_or_else(|| ParseErrorKind::UnknownStatus(status.to_string()))?;
    let mapping = mapping
        .split_whitespace()
        .map(parse_scalar)
        .collect::<Result<Vec<_>, _>>()?;
    if mapping.is_empty() {
        return Err(ParseErrorKind::EmptyMapping);
    }

    Ok(Some(CaseFoldingLine {
        code_point,
        status,
        mapping,
    }))
}

/// Parse a whole CaseFolding.txt into table records, in file order.
pub fn parse(text: &str, opts: &SourceOptions) -> Result<Vec<MappingRecord>, ParseError> {
    let mut records = Vec::new();
    let mut skipped_status = 0usize;
    let mut skipped_ascii = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let parsed = parse_line(line).map_err(|kind| ParseError {
            line: idx + 1,
            kind,
        })?;
        let Some(parsed) = parsed else {
            continue;
        };
        if !opts.kind.selects(parsed.status) {
            skipped_status += 1;
            continue;
        }
        if parsed.code_point < FIRST_NON_ASCII {
            skipped_ascii += 1;
            continue;
        }
        records.push(MappingRecord {
            code_point: parsed.code_point,
            replacement: parsed.mapping,
        });
    }

    debug!(
        "case folding ({}): {} records, {} lines with other status, {} ascii",
        opts.kind.name(),
        records.len(),
        skipped_status,
        skipped_ascii
    );
    Ok(records)
}

/// Build a self-test pair from every `stride`-th record: the source
/// characters concatenated, and their replacements concatenated. Folding
/// the first string must produce the second.
pub fn sample_pairs(records: &[MappingRecord], stride: usize) -> (String, String) {
    let mut input = String::new();
    let mut expected = String::new();
    for record in records.iter().step_by(stride.max(1)) {
        let Some(c) = char::from_u32(record.code_point) else {
            continue;
        };
        input.push(c);
        expected.extend(record.replacement.iter());
    }
    (input, expected)
}
