#![no_main]
use libfuzzer_sys::fuzz_target;

// Command-line parsing must never panic, whatever the argument soup.
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let args: Vec<String> = text
        .split(|c: char| c.is_whitespace() || c == '\0')
        .filter(|t| !t.is_empty())
        .take(32)
        .map(str::to_string)
        .collect();
    foldtab::cli::fuzz_try_parse_args(&args);
});
