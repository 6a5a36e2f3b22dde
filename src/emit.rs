// Table emission.
//
// Writes an encoded table pair as source text that can be compiled into a
// consuming program:
//
// - C:    `CF_*` accessor macros plus `cf_table` / `cf_repl` arrays
// - Rust: `CF_TABLE` / `CF_REPL` statics and a `CASE_FOLD` FoldTableRef
//
// The output is deterministic for a given table, so regenerated files only
// change when the data does.

use std::io::{self, Write};

#[cfg(feature = "file-io")]
use sha2::{Digest, Sha256};

use crate::table::FoldTableRef;
use crate::table::entry::CODE_POINT_BITS;

/// Output container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmitFormat {
    /// C include file.
    #[default]
    C,
    /// Rust source module.
    Rust,
}

impl EmitFormat {
    pub fn name(self) -> &'static str {
        match self {
            EmitFormat::C => "c",
            EmitFormat::Rust => "rust",
        }
    }
}

/// Layout options for the emitted text.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub format: EmitFormat,
    /// Main-table words per line.
    pub entries_per_line: usize,
    /// Replacement bytes per line.
    pub bytes_per_line: usize,
    /// Name written into the "Generated by" header line.
    pub generator: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            format: EmitFormat::C,
            entries_per_line: 6,
            bytes_per_line: 12,
            generator: concat!("foldtab ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// SHA-256 over the little-endian main table followed by the side table.
#[cfg(feature = "file-io")]
pub fn table_digest(table: FoldTableRef<'_>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for word in table.main_table() {
        hasher.update(word.to_le_bytes());
    }
    hasher.update(table.repl_table());
    hasher.finalize().into()
}

fn write_header<W: Write>(w: &mut W, table: FoldTableRef<'_>, opts: &EmitOptions) -> io::Result<()> {
    writeln!(w, "// Generated by {}", opts.generator)?;
    #[cfg(feature = "file-io")]
    {
        write!(w, "// sha256: ")?;
        for b in table_digest(table) {
            write!(w, "{b:02x}")?;
        }
        writeln!(w)?;
    }
    #[cfg(not(feature = "file-io"))]
    let _ = table;
    Ok(())
}

/// Write `values` as comma-separated rows of `per_line` items, each row
/// prefixed with `indent`. With `trailing_comma` every row ends in a comma
/// (Rust style); otherwise only rows before the last do (C style).
fn write_rows<W, T, F>(
    w: &mut W,
    values: &[T],
    per_line: usize,
    indent: &str,
    trailing_comma: bool,
    mut fmt: F,
) -> io::Result<()>
where
    W: Write,
    F: FnMut(&mut W, &T) -> io::Result<()>,
{
    let per_line = per_line.max(1);
    let rows = values.len().div_ceil(per_line);
    for (row_idx, row) in values.chunks(per_line).enumerate() {
        write!(w, "{indent}")?;
        for (i, v) in row.iter().enumerate() {
            if i > 0 {
                write!(w, ", ")?;
            }
            fmt(w, v)?;
        }
        if trailing_comma || row_idx + 1 < rows {
            write!(w, ",")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn emit_c<W: Write>(w: &mut W, table: FoldTableRef<'_>, opts: &EmitOptions) -> io::Result<()> {
    let main = table.main_table();
    let repl = table.repl_table();

    write_header(w, table, opts)?;
    writeln!(w)?;
    writeln!(w, "#define CF_MAX            (1 << {CODE_POINT_BITS})")?;
    writeln!(w, "#define CF_TABLE_SIZE     {}", main.len())?;
    writeln!(w, "#define CF_CODE_POINT(x)  ((x) & 0x1FFFF)")?;
    writeln!(w, "#define CF_REPL_IDX(x)    ((((x) >> 17) & 0xFFF) * 2)")?;
    writeln!(w, "#define CF_REPL_SIZE(x)   ((x) >> 29)")?;
    writeln!(w)?;

    writeln!(w, "static const uint32_t cf_table[{}] = {{", main.len())?;
    write_rows(w, main, opts.entries_per_line, "  ", false, |w, v| {
        write!(w, "0x{v:X}")
    })?;
    writeln!(w, "}};")?;
    writeln!(w)?;

    writeln!(w, "static const unsigned char cf_repl[{}] = {{", repl.len())?;
    write_rows(w, repl, opts.bytes_per_line, "  ", false, |w, v| {
        write!(w, "0x{v:02X}")
    })?;
    writeln!(w, "}};")
}

fn emit_rust<W: Write>(w: &mut W, table: FoldTableRef<'_>, opts: &EmitOptions) -> io::Result<()> {
    let main = table.main_table();
    let repl = table.repl_table();

    write_header(w, table, opts)?;
    writeln!(w)?;

    writeln!(w, "pub static CF_TABLE: [u32; {}] = [", main.len())?;
    write_rows(w, main, opts.entries_per_line, "    ", true, |w, v| {
        write!(w, "0x{v:08X}")
    })?;
    writeln!(w, "];")?;
    writeln!(w)?;

    writeln!(w, "pub static CF_REPL: [u8; {}] = [", repl.len())?;
    write_rows(w, repl, opts.bytes_per_line, "    ", true, |w, v| {
        write!(w, "0x{v:02X}")
    })?;
    writeln!(w, "];")?;
    writeln!(w)?;

    writeln!(
        w,
        "pub static CASE_FOLD: foldtab::table::FoldTableRef<'static> =\n    \
         foldtab::table::FoldTableRef::new(&CF_TABLE, &CF_REPL);"
    )
}

/// Write `table` in the configured format.
pub fn emit<W: Write>(w: &mut W, table: FoldTableRef<'_>, opts: &EmitOptions) -> io::Result<()> {
    match opts.format {
        EmitFormat::C => emit_c(w, table, opts),
        EmitFormat::Rust => emit_rust(w, table, opts),
    }
}

/// Render `table` to a string.
pub fn emit_to_string(table: FoldTableRef<'_>, opts: &EmitOptions) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = emit(&mut out, table, opts);
    String::from_utf8_lossy(&out).into_owned()
}
