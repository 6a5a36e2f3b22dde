// File-level helpers.
//
// Thin wrappers that read CaseFolding.txt from disk (or any reader), build
// the table, and write the emitted source with buffered I/O.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::emit::{self, EmitOptions};
use crate::source::{self, ParseError, SourceOptions};
use crate::table::{
    BuildError, BuildStats, FoldTable, FoldTableRef, MappingRecord, encode_with_stats,
};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Malformed CaseFolding.txt.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// Table construction failed.
    #[error("build error: {0}")]
    Build(#[from] BuildError),
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read and parse CaseFolding.txt from any reader.
pub fn read_records<R: Read>(reader: R, opts: &SourceOptions) -> Result<Vec<MappingRecord>, IoError> {
    let mut text = String::new();
    BufReader::with_capacity(BUF_SIZE, reader).read_to_string(&mut text)?;
    Ok(source::parse(&text, opts)?)
}

/// Read and parse CaseFolding.txt from `path`.
pub fn load_records(path: &Path, opts: &SourceOptions) -> Result<Vec<MappingRecord>, IoError> {
    debug!("reading {}", path.display());
    read_records(File::open(path)?, opts)
}

/// Encode records, returning the table and its build statistics.
pub fn build(records: &[MappingRecord]) -> Result<(FoldTable, BuildStats), BuildError> {
    encode_with_stats(records)
}

/// Read CaseFolding.txt from `reader` and encode it.
pub fn build_from_reader<R: Read>(
    reader: R,
    opts: &SourceOptions,
) -> Result<(FoldTable, BuildStats), IoError> {
    let records = read_records(reader, opts)?;
    Ok(build(&records)?)
}

/// Read CaseFolding.txt from `path` and encode it.
pub fn build_from_path(
    path: &Path,
    opts: &SourceOptions,
) -> Result<(FoldTable, BuildStats), IoError> {
    let records = load_records(path, opts)?;
    let (table, stats) = build(&records)?;
    info!(
        "{}: {} entries, {} replacement bytes",
        path.display(),
        stats.entries,
        stats.repl_bytes
    );
    Ok((table, stats))
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Emit `table` to any writer through a buffer.
pub fn write_table<W: Write>(
    writer: W,
    table: FoldTableRef<'_>,
    opts: &EmitOptions,
) -> Result<(), IoError> {
    let mut w = BufWriter::with_capacity(BUF_SIZE, writer);
    emit::emit(&mut w, table, opts)?;
    w.flush()?;
    Ok(())
}

/// Emit `table` to a new file at `path`, replacing any existing file.
/// Returns the number of bytes written.
pub fn write_table_file(
    path: &Path,
    table: FoldTableRef<'_>,
    opts: &EmitOptions,
) -> Result<u64, IoError> {
    write_table(File::create(path)?, table, opts)?;
    let size = std::fs::metadata(path)?.len();
    debug!("wrote {} ({size} bytes, {})", path.display(), opts.format.name());
    Ok(size)
}
