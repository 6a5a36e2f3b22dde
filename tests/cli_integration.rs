use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_foldtab").to_string()
}

const EXCERPT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/CaseFolding-excerpt.txt");

#[test]
fn cli_build_to_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("case_fold.inc");

    let st = Command::new(bin())
        .args(["build", EXCERPT])
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("#define CF_TABLE_SIZE     24"));
    assert!(text.contains("static const uint32_t cf_table[24] = {"));

    // Refuses to clobber without -f.
    let st = Command::new(bin())
        .args(["build", EXCERPT])
        .arg(&output)
        .status()
        .unwrap();
    assert!(!st.success());

    let st = Command::new(bin())
        .args(["--force", "build", "--kind", "simple", "--format", "rust", EXCERPT])
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("pub static CF_TABLE: [u32; 16] = ["));
    assert!(text.contains("pub static CASE_FOLD: foldtab::table::FoldTableRef<'static>"));
}

#[test]
fn cli_build_from_stdin_to_stdout() {
    let mut child = Command::new(bin())
        .args(["build", "--entries-per-line", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"00DF; F; 0073 0073; # LATIN SMALL LETTER SHARP S\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.contains("static const uint32_t cf_table[1] = {\n  0x400000DF\n};"));
    assert!(text.contains("static const unsigned char cf_repl[2] = {\n  0x73, 0x73\n};"));
}

#[test]
fn cli_build_reports_parse_errors() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.txt");
    std::fs::write(&input, "00B5; C; 03BC;\n00DF; Q; 0073;\n").unwrap();

    let out = Command::new(bin())
        .args(["build", "-c"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("line 2"), "stderr: {err}");
}

#[test]
fn cli_build_json_stats() {
    let out = Command::new(bin())
        .args(["--json", "build", "-c", EXCERPT])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(stats["command"], "build");
    assert_eq!(stats["entries"], 24);
    assert_eq!(stats["main_table_bytes"], 96);
}

#[test]
fn cli_lookup() {
    let out = Command::new(bin())
        .args(["lookup", "-i", EXCERPT, "U+0130", "0x41", "212A"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "U+0130 -> U+0069 U+0307 (69 CC 87)",
            "U+0041 -> U+0061 (61)",
            "U+212A -> U+006B (6B)",
        ]
    );
}

#[test]
fn cli_lookup_text() {
    let out = Command::new(bin())
        .args(["lookup", "-i", EXCERPT, "--text", "Maße ﬃ"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "masse ffi\n");
}

#[test]
fn cli_sample() {
    let out = Command::new(bin())
        .args(["sample", EXCERPT])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "test: \u{B5}\u{FB03}\ntest_result: \u{3BC}ffi\n"
    );
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("REPL_OFFSET_LIMIT=8192"));
}
