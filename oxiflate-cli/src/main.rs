//! OxiFlate CLI
//!
//! Decompresses a raw DEFLATE stream (RFC 1951) from a file or stdin.

mod utils;

use clap::Parser;
use oxiflate::{InflateConfig, Inflater};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use utils::{format_summary, init_logging};

#[derive(Parser, Debug)]
#[command(name = "oxiflate")]
#[command(author, version, about = "Decompress raw DEFLATE streams")]
#[command(long_about = "
OxiFlate decompresses raw DEFLATE data (RFC 1951, no zlib or gzip header).

Examples:
  oxiflate data.deflate
  oxiflate data.deflate -o data.bin
  cat data.deflate | oxiflate - --stats
  oxiflate --max-output 1048576 untrusted.deflate
")]
struct Cli {
    /// Compressed input file (`-` for stdin)
    input: PathBuf,

    /// Write decompressed data to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum decompressed size in bytes
    #[arg(long, value_name = "BYTES", default_value_t = InflateConfig::DEFAULT_MAX_OUTPUT_SIZE)]
    max_output: usize,

    /// Print stream statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(&cli.input)?;
    debug!(path = %cli.input.display(), bytes = input.len(), "read input");

    let inflater = Inflater::new(InflateConfig::new(cli.max_output));
    let (output, summary) = inflater.inflate_with_summary(&input)?;

    if summary.input_bytes < input.len() {
        debug!(
            trailing = input.len() - summary.input_bytes,
            "ignored bytes after final block"
        );
    }

    match &cli.output {
        Some(path) => fs::write(path, &output)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }

    if cli.stats {
        eprint!("{}", format_summary(&summary));
    }

    Ok(())
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        return Ok(data);
    }
    fs::read(path)
}
