//! Utility functions for the CLI.

use oxiflate::InflateSummary;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Log level selected by repeated `-v` flags.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Format a decode summary as a small table.
pub fn format_summary(summary: &InflateSummary) -> String {
    let blocks = &summary.blocks;
    let mut out = String::new();
    out.push_str(&format!("{:>12} {:>12} {:>8}\n", "Input", "Output", "Ratio"));
    out.push_str(&format!("{}\n", "-".repeat(34)));
    out.push_str(&format!(
        "{:>12} {:>12} {:>7.2}x\n",
        summary.input_bytes,
        summary.output_bytes,
        summary.ratio()
    ));
    out.push_str(&format!(
        "Blocks: {} ({} stored, {} fixed, {} dynamic)\n",
        blocks.total(),
        blocks.stored,
        blocks.fixed,
        blocks.dynamic
    ));
    out
}
