// Command-line front end for foldtab.
//
// Subcommands:
//   build   CaseFolding.txt -> C include / Rust source
//   lookup  fold code points (or a string) with a freshly built table
//   sample  print a self-test string pair
//   config  print build/configuration details

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use log::warn;

use crate::emit::{EmitFormat, EmitOptions};
use crate::io as fio;
use crate::source::{self, DEFAULT_SAMPLE_STRIDE, FoldKind, SourceOptions};
use crate::table::entry::{CODE_POINT_BITS, REPL_IDX_BITS, REPL_OFFSET_LIMIT, REPL_SIZE_BITS};
use crate::table::{Fold, FoldTable, MappingRecord};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const DEFAULT_ENTRIES_PER_LINE: usize = 6;
const DEFAULT_BYTES_PER_LINE: usize = 12;

// ---------------------------------------------------------------------------
// Code point parsing (U+XXXX, 0xXXXX or bare hex)
// ---------------------------------------------------------------------------

fn parse_code_point(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let digits = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return Err("empty code point".into());
    }
    let cp = u32::from_str_radix(digits, 16).map_err(|e| format!("invalid code point '{s}': {e}"))?;
    if cp > char::MAX as u32 {
        return Err(format!("code point '{s}' is beyond U+10FFFF"));
    }
    Ok(cp)
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Unicode case folding table generator.
#[derive(Parser, Debug)]
#[command(
    name = "foldtab",
    version,
    about = "Unicode case folding table generator",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Build fold tables from CaseFolding.txt.
    Build(BuildArgs),
    /// Fold code points using a table built from CaseFolding.txt.
    Lookup(LookupArgs),
    /// Print a self-test input string and its expected folding.
    Sample(SampleArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Full,
    Simple,
}

impl From<KindArg> for FoldKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Full => FoldKind::Full,
            KindArg::Simple => FoldKind::Simple,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    C,
    Rust,
}

impl From<FormatArg> for EmitFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::C => EmitFormat::C,
            FormatArg::Rust => EmitFormat::Rust,
        }
    }
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Output container.
    #[arg(long, value_enum, default_value_t = FormatArg::C)]
    format: FormatArg,

    /// Main-table words per output line.
    #[arg(long = "entries-per-line", value_parser = clap::value_parser!(u16).range(1..), default_value_t = DEFAULT_ENTRIES_PER_LINE as u16)]
    entries_per_line: u16,

    /// Replacement bytes per output line.
    #[arg(long = "bytes-per-line", value_parser = clap::value_parser!(u16).range(1..), default_value_t = DEFAULT_BYTES_PER_LINE as u16)]
    bytes_per_line: u16,
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Which foldings to extract.
    #[arg(long, short = 'k', value_enum, default_value_t = KindArg::Full)]
    kind: KindArg,

    /// CaseFolding.txt (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    #[command(flatten)]
    layout: LayoutArgs,

    /// CaseFolding.txt (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// Which foldings to extract.
    #[arg(long, short = 'k', value_enum, default_value_t = KindArg::Full)]
    kind: KindArg,

    /// CaseFolding.txt (default: stdin).
    #[arg(long, short = 'i', value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Fold a whole string instead of single code points.
    #[arg(long, short = 't')]
    text: Option<String>,

    /// Code points to fold (U+0130, 0x130 or 130).
    #[arg(value_parser = parse_code_point, required_unless_present = "text")]
    code_points: Vec<u32>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Which foldings to extract.
    #[arg(long, short = 'k', value_enum, default_value_t = KindArg::Full)]
    kind: KindArg,

    /// Take every Nth table entry.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), default_value_t = DEFAULT_SAMPLE_STRIDE as u32)]
    stride: u32,

    /// CaseFolding.txt (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// CaseFolding.txt (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Build,
    Lookup,
    Sample,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    kind: FoldKind,
    format: EmitFormat,
    entries_per_line: usize,
    bytes_per_line: usize,
    stride: usize,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    code_points: Vec<u32>,
    text: Option<String>,
}

impl Options {
    fn base(command: Command, cli: &Cli) -> Self {
        Self {
            command,
            use_stdout: false,
            force: cli.force,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            json_output: cli.json_output,
            kind: FoldKind::Full,
            format: EmitFormat::C,
            entries_per_line: DEFAULT_ENTRIES_PER_LINE,
            bytes_per_line: DEFAULT_BYTES_PER_LINE,
            stride: DEFAULT_SAMPLE_STRIDE,
            input_file: None,
            output_file: None,
            code_points: Vec::new(),
            text: None,
        }
    }

    fn source_options(&self) -> SourceOptions {
        SourceOptions { kind: self.kind }
    }

    fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            format: self.format,
            entries_per_line: self.entries_per_line,
            bytes_per_line: self.bytes_per_line,
            ..Default::default()
        }
    }
}

fn resolve_options(cli: Cli) -> Options {
    match &cli.command {
        Cmd::Build(args) => Options {
            use_stdout: args.stdout,
            kind: args.kind.into(),
            format: args.layout.format.into(),
            entries_per_line: args.layout.entries_per_line as usize,
            bytes_per_line: args.layout.bytes_per_line as usize,
            input_file: args.input.clone().or_else(|| args.input_pos.clone()),
            output_file: args.output.clone().or_else(|| args.output_pos.clone()),
            ..Options::base(Command::Build, &cli)
        },
        Cmd::Lookup(args) => Options {
            kind: args.kind.into(),
            input_file: args.input.clone(),
            code_points: args.code_points.clone(),
            text: args.text.clone(),
            ..Options::base(Command::Lookup, &cli)
        },
        Cmd::Sample(args) => Options {
            kind: args.kind.into(),
            stride: args.stride as usize,
            input_file: args.input.clone().or_else(|| args.input_pos.clone()),
            ..Options::base(Command::Sample, &cli)
        },
        Cmd::Config => Options::base(Command::Config, &cli),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("foldtab".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn load_records(opts: &Options) -> Result<Vec<MappingRecord>, i32> {
    let result = match &opts.input_file {
        Some(path) => fio::load_records(path, &opts.source_options()),
        None => fio::read_records(io::stdin().lock(), &opts.source_options()),
    };
    result.map_err(|e| {
        let name = opts
            .input_file
            .as_ref()
            .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
        eprintln!("foldtab: {name}: {e}");
        1
    })
}

fn load_table(opts: &Options) -> Result<FoldTable, i32> {
    let records = load_records(opts)?;
    fio::build(&records).map(|(table, _)| table).map_err(|e| {
        eprintln!("foldtab: build error: {e}");
        1
    })
}

fn format_scalars(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s
            .chars()
            .map(|c| format!("U+{:04X}", c as u32))
            .collect::<Vec<_>>()
            .join(" "),
        Err(_) => "<invalid utf-8>".to_string(),
    }
}

fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One `lookup` output line, and whether `cp` changes under folding.
fn describe_fold(table: &FoldTable, cp: u32) -> (String, bool) {
    // ASCII is folded here, not stored in the table.
    let ascii_fold = u8::try_from(cp)
        .ok()
        .filter(u8::is_ascii_uppercase)
        .map(|b| [b.to_ascii_lowercase()]);
    let fold = match &ascii_fold {
        Some(lower) => Fold::Replace(lower),
        None => table.lookup(cp),
    };
    match fold {
        Fold::Replace(bytes) => (
            format!(
                "U+{cp:04X} -> {} ({})",
                format_scalars(bytes),
                format_bytes(bytes)
            ),
            true,
        ),
        Fold::Identity(_) => (format!("U+{cp:04X} -> U+{cp:04X} (identity)"), false),
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("foldtab version {version}");

    let file_io = cfg!(feature = "file-io") as u8;
    eprintln!("FILE_IO={file_io}");
    eprintln!("CODE_POINT_BITS={CODE_POINT_BITS}");
    eprintln!("REPL_IDX_BITS={REPL_IDX_BITS}");
    eprintln!("REPL_SIZE_BITS={REPL_SIZE_BITS}");
    eprintln!("REPL_OFFSET_LIMIT={REPL_OFFSET_LIMIT}");
    eprintln!("DEFAULT_ENTRIES_PER_LINE={DEFAULT_ENTRIES_PER_LINE}");
    eprintln!("DEFAULT_BYTES_PER_LINE={DEFAULT_BYTES_PER_LINE}");
    eprintln!("DEFAULT_SAMPLE_STRIDE={DEFAULT_SAMPLE_STRIDE}");

    0
}

// ---------------------------------------------------------------------------
// Build command
// ---------------------------------------------------------------------------

fn cmd_build(opts: &Options) -> i32 {
    let records = match load_records(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let (table, stats) = match fio::build(&records) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("foldtab: build error: {e}");
            return 1;
        }
    };

    let emit_opts = opts.emit_options();
    let result = match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => {
            fio::write_table(io::stdout().lock(), table.as_table_ref(), &emit_opts)
        }
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "foldtab: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return 1;
            }
            fio::write_table_file(path, table.as_table_ref(), &emit_opts).map(|_| ())
        }
    };
    if let Err(e) = result {
        eprintln!("foldtab: write error: {e}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "foldtab: {} entries, {} replacement bytes ({} padding), longest replacement {}",
            stats.entries, stats.repl_bytes, stats.padding_bytes, stats.longest_replacement
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "build",
            "kind": opts.kind.name(),
            "format": opts.format.name(),
            "entries": stats.entries,
            "main_table_bytes": stats.entries * 4,
            "repl_table_bytes": stats.repl_bytes,
            "padding_bytes": stats.padding_bytes,
            "longest_replacement": stats.longest_replacement,
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Lookup command
// ---------------------------------------------------------------------------

fn cmd_lookup(opts: &Options) -> i32 {
    let table = match load_table(opts) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut folded = 0usize;

    for &cp in &opts.code_points {
        let (line, changed) = describe_fold(&table, cp);
        folded += changed as usize;
        if let Err(e) = writeln!(out, "{line}") {
            eprintln!("foldtab: write error: {e}");
            return 1;
        }
    }

    if let Some(text) = &opts.text
        && let Err(e) = writeln!(out, "{}", table.fold_str(text))
    {
        eprintln!("foldtab: write error: {e}");
        return 1;
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "lookup",
            "kind": opts.kind.name(),
            "entries": table.len(),
            "queries": opts.code_points.len(),
            "folded": folded,
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Sample command
// ---------------------------------------------------------------------------

fn cmd_sample(opts: &Options) -> i32 {
    let records = match load_records(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let (input, expected) = source::sample_pairs(&records, opts.stride);
    println!("test: {input}");
    println!("test_result: {expected}");
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_logging(opts: &Options) {
    let level = match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);
    init_logging(&opts);

    // -c wins over an explicit output file.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        warn!("-c option overrides output filename: {}", path.display());
    }

    let exit_code = match opts.command {
        Command::Build => cmd_build(&opts),
        Command::Lookup => cmd_lookup(&opts),
        Command::Sample => cmd_sample(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
