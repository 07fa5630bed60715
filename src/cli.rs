// Command-line front end for oxilz78.
//
// Subcommands:
//   compress: factorize a file or stdin, write a factor stream or just count
//   inspect: print the header and factors of a factor stream
//   config: print build features and defaults

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::compressor::CompressOptions;
use crate::format::{self, FactorReader};
use crate::io::{self as file_io, FileOptions, FileStats};
use crate::source::DEFAULT_BUFFER_SIZE;
use crate::trie::DEFAULT_MAX_NODES;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024;

/// Default number of factors printed by `inspect`.
const DEFAULT_INSPECT_LIMIT: u64 = 64;

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M, G suffixes)
// ---------------------------------------------------------------------------

fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024u64),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        Some(b'g' | b'G') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1u64),
    };
    let num: u64 = num_part
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Streaming LZ78 factorizer.
#[derive(Parser, Debug)]
#[command(
    name = "oxilz78",
    version,
    about = "LZ78 factorization over a move-to-front trie",
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
    /// Factorize an input stream.
    Compress(CompressArgs),
    /// Print the contents of a factor stream.
    Inspect(InspectArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Only count factors (do not write a factor stream).
    #[arg(long = "count-only")]
    count_only: bool,

    /// Read buffer size (supports K/M/G suffix).
    #[arg(long = "buffer-size", value_parser = parse_byte_size, default_value_t = DEFAULT_BUFFER_SIZE as u64)]
    buffer_size: u64,

    /// Maximum dictionary size in nodes, root included (plain integer).
    #[arg(
        long = "max-nodes",
        value_parser = clap::value_parser!(u64).range(1..),
        default_value_t = DEFAULT_MAX_NODES as u64
    )]
    max_nodes: u64,

    /// Do not append an Adler-32 checksum to the factor stream.
    #[arg(long = "no-checksum")]
    no_checksum: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Factor stream file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Print at most this many factors (0 = summary only).
    #[arg(long, short = 'n', default_value_t = DEFAULT_INSPECT_LIMIT)]
    limit: u64,

    /// Print every factor.
    #[arg(long, conflicts_with = "limit")]
    all: bool,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Compress,
    Inspect,
    Config,
}

struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    count_only: bool,
    checksum: bool,
    buffer_size: usize,
    max_nodes: usize,
    inspect_limit: Option<u64>,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
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
            count_only: false,
            checksum: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_nodes: DEFAULT_MAX_NODES,
            inspect_limit: Some(DEFAULT_INSPECT_LIMIT),
            input_file: None,
            output_file: None,
        }
    }
}

fn resolve_options(cli: Cli) -> Options {
    match &cli.command {
        Cmd::Compress(args) => Options {
            use_stdout: args.stdout,
            count_only: args.count_only,
            checksum: !args.no_checksum,
            buffer_size: usize::try_from(args.buffer_size).unwrap_or(usize::MAX),
            max_nodes: usize::try_from(args.max_nodes)
                .unwrap_or(usize::MAX)
                .min(DEFAULT_MAX_NODES),
            input_file: args.input.clone().or_else(|| args.input_pos.clone()),
            output_file: args.output.clone().or_else(|| args.output_pos.clone()),
            ..Options::base(Command::Compress, &cli)
        },
        Cmd::Inspect(args) => Options {
            inspect_limit: if args.all { None } else { Some(args.limit) },
            input_file: Some(args.input.clone()),
            ..Options::base(Command::Inspect, &cli)
        },
        Cmd::Config => Options::base(Command::Config, &cli),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("oxilz78".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("oxilz78 version {version} (Rust)");

    let adler32 = cfg!(feature = "adler32") as u8;
    let file_io = cfg!(feature = "file-io") as u8;
    let ptr_size = std::mem::size_of::<*const ()>();

    eprintln!("ADLER32={adler32}");
    eprintln!("FILE_IO={file_io}");
    eprintln!("STREAM_VERSION={}", format::header::STREAM_VERSION);
    eprintln!("DEFAULT_BUFFER_SIZE={DEFAULT_BUFFER_SIZE}");
    eprintln!("DEFAULT_MAX_NODES={DEFAULT_MAX_NODES}");
    eprintln!("sizeof(usize)={ptr_size}");

    0
}

// ---------------------------------------------------------------------------
// Compress command
// ---------------------------------------------------------------------------

fn build_file_options(opts: &Options) -> FileOptions {
    FileOptions {
        compress: CompressOptions {
            buffer_size: opts.buffer_size,
            max_nodes: opts.max_nodes,
            ..Default::default()
        },
        checksum: opts.checksum,
    }
}

fn cmd_compress(opts: &Options) -> i32 {
    let file_opts = build_file_options(opts);

    let input: Box<dyn Read> = match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!("oxilz78: input file: {}: {e}", path.display());
                return 1;
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let output: Option<Box<dyn Write>> = if opts.count_only {
        None
    } else {
        match (opts.use_stdout, &opts.output_file) {
            (true, _) | (_, None) => Some(Box::new(BufWriter::with_capacity(
                BUF_SIZE,
                io::stdout().lock(),
            ))),
            (false, Some(path)) => {
                if path.exists() && !opts.force {
                    eprintln!(
                        "oxilz78: output file exists, use -f to overwrite: {}",
                        path.display()
                    );
                    return 1;
                }
                match File::create(path) {
                    Ok(f) => Some(Box::new(BufWriter::with_capacity(BUF_SIZE, f))),
                    Err(e) => {
                        eprintln!("oxilz78: output file: {}: {e}", path.display());
                        return 1;
                    }
                }
            }
        }
    };

    let stats = match file_io::compress_stream(input, output, &file_opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("oxilz78: compress error: {e}");
            return 1;
        }
    };

    report_compress(opts, &stats);
    0
}

fn report_compress(opts: &Options, stats: &FileStats) {
    if opts.count_only && !opts.quiet {
        eprintln!(
            "oxilz78: input size: {}, factors: {}",
            stats.input_size, stats.factors
        );
    } else if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "oxilz78: compressor: input size: {}, factors: {}, trie size: {}, output size: {}",
            stats.input_size,
            stats.factors,
            stats.trie_size,
            stats.output_size.unwrap_or(0)
        );
        if opts.verbose > 1
            && let Some(digest) = stats.input_sha256
        {
            eprintln!("oxilz78: input sha256: {}", file_io::hex(&digest));
        }
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "compress",
            "input_size": stats.input_size,
            "factors": stats.factors,
            "trie_size": stats.trie_size,
            "output_size": stats.output_size,
            "input_sha256": stats.input_sha256.map(|d| file_io::hex(&d)),
        });
        match serde_json::to_string_pretty(&json) {
            Ok(text) => eprintln!("{text}"),
            Err(e) => log::error!("oxilz78: cannot render stats: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Inspect command
// ---------------------------------------------------------------------------

fn cmd_inspect(opts: &Options) -> i32 {
    let Some(path) = &opts.input_file else {
        eprintln!("oxilz78: inspect: missing input file");
        return 1;
    };

    let data = match File::open(path).and_then(|f| {
        let mut buf = Vec::new();
        BufReader::with_capacity(BUF_SIZE, f).read_to_end(&mut buf)?;
        Ok(buf)
    }) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("oxilz78: input file: {}: {e}", path.display());
            return 1;
        }
    };

    let mut reader = match FactorReader::new(&data) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("oxilz78: {}: {e}", path.display());
            return 1;
        }
    };
    let header = reader.header();

    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(BUF_SIZE, stdout.lock());
    let mut printed = 0u64;
    let mut terminal = false;

    if !opts.quiet {
        let _ = writeln!(
            out,
            "stream version {} flags {:?} ({} bytes)",
            header.version,
            header.flags,
            data.len()
        );
    }

    for (i, item) in reader.by_ref().enumerate() {
        let factor = match item {
            Ok(f) => f,
            Err(e) => {
                let _ = out.flush();
                eprintln!("oxilz78: {}: factor {i}: {e}", path.display());
                return 1;
            }
        };
        terminal |= factor.is_terminal();
        if !opts.quiet && opts.inspect_limit.is_none_or(|limit| printed < limit) {
            let _ = writeln!(out, "{i:>10}  {factor}");
            printed += 1;
        }
    }

    let factors = reader.factors_read();
    if !opts.quiet {
        if printed < factors {
            let _ = writeln!(out, "... {} more", factors - printed);
        }
        let _ = writeln!(
            out,
            "factors: {factors}, terminal factor: {}",
            if terminal { "yes" } else { "no" }
        );
    }
    if let Err(e) = out.flush() {
        eprintln!("oxilz78: write error: {e}");
        return 1;
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "inspect",
            "stream_size": data.len(),
            "version": header.version,
            "checksum": header.has_checksum(),
            "factors": factors,
            "terminal": terminal,
        });
        match serde_json::to_string_pretty(&json) {
            Ok(text) => eprintln!("{text}"),
            Err(e) => log::error!("oxilz78: cannot render stats: {e}"),
        }
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "oxilz78: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    log::debug!("oxilz78: running {:?}", opts.command);
    let exit_code = match opts.command {
        Command::Compress => cmd_compress(&opts),
        Command::Inspect => cmd_inspect(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
