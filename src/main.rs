fn main() {
    #[cfg(feature = "cli")]
    foldtab::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("foldtab: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
