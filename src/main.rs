fn main() {
    #[cfg(feature = "cli")]
    oxilz78::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("oxilz78: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
