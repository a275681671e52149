use std::path::PathBuf;

use clap::Parser;

/// Relay a byte stream through a fixed-capacity ring buffer.
#[derive(Parser, Debug)]
#[command(name = "bytering", version)]
pub struct Args {
    /// Config file to load instead of ~/.bytering/config.toml or ./bytering.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ring capacity in bytes; overrides config and BYTERING_CAPACITY.
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Read from this file instead of stdin.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Skip flushing the output each time the ring drains.
    #[arg(long)]
    pub no_flush: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_stdio() {
        let args = Args::try_parse_from(["bytering"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.capacity.is_none());
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(!args.no_flush);
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "bytering",
            "--capacity",
            "4096",
            "--input",
            "in.bin",
            "--output",
            "out.bin",
            "--no-flush",
        ])
        .unwrap();
        assert_eq!(args.capacity, Some(4096));
        assert_eq!(args.input.as_deref(), Some(std::path::Path::new("in.bin")));
        assert!(args.no_flush);
    }

    #[test]
    fn rejects_non_numeric_capacity() {
        assert!(Args::try_parse_from(["bytering", "--capacity", "big"]).is_err());
    }
}
