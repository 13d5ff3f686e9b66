use clap::Parser;
use log::{info, LevelFilter};

use crate::compression::StreamFormat;
use crate::error::{Error, Result};
use crate::{DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Round-trip checker for the hmz block codec",
    long_about = "
    Splits every named file into blocks, compresses each block, decompresses it again and
    checks that the result matches. Reports the compression ratio and the time taken per file.
    No files are written."
)]
pub struct Args {
    /// Files to check
    #[clap(required = true)]
    files: Vec<String>,

    /// Use the four stream layout for Huffman coded blocks
    #[clap(short = 'm', long = "multi")]
    multi: bool,

    /// Decode the four streams of a block on separate threads
    #[clap(short = 'p', long = "parallel")]
    parallel: bool,

    /// Block size in bytes
    #[clap(short = 'b', long = "block-size", default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// Settings for one run of the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmzOpts {
    /// Files to read for input
    pub files: Vec<String>,
    /// Layout used for Huffman coded blocks
    pub format: StreamFormat,
    /// Decode multi layout streams in parallel
    pub parallel: bool,
    /// Bytes per block
    pub block_size: usize,
    /// Verbosity of user information
    pub verbosity: LevelFilter,
}

impl HmzOpts {
    /// Put command line information from CLAP into our internal structure.
    pub fn from_args(args: Args) -> Result<Self> {
        if args.block_size == 0 || args.block_size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidArgument("block size must be between 1 and 2^30 bytes"));
        }
        Ok(Self {
            files: args.files,
            format: if args.multi {
                StreamFormat::Multi
            } else {
                StreamFormat::Single
            },
            parallel: args.parallel,
            block_size: args.block_size,
            verbosity: level_filter(args.v),
        })
    }

    /// Log the settings. Call once the logger is up.
    pub fn report(&self) {
        info!("---- hmz Initialization Start ----");
        info!("Verbosity set to {}", self.verbosity);
        info!("Stream format set to {:?}", self.format);
        if self.parallel {
            info!("Decoding multi layout streams in parallel");
        }
        info!("Block size set to {}", self.block_size);
        info!("Checking {} file(s)", self.files.len());
        info!("---- hmz Initialization End ----\n");
    }
}

/// Map -v0 through -v5 onto the log levels.
fn level_filter(v: u8) -> LevelFilter {
    match v {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Parse the process arguments.
pub fn hmzopts_init() -> Result<HmzOpts> {
    HmzOpts::from_args(Args::parse())
}

#[cfg(test)]
mod test {
    use super::{Args, HmzOpts};
    use crate::compression::StreamFormat;
    use crate::DEFAULT_BLOCK_SIZE;
    use clap::Parser;
    use log::LevelFilter;

    fn parse(args: &[&str]) -> HmzOpts {
        HmzOpts::from_args(Args::try_parse_from(args).unwrap()).unwrap()
    }

    #[test]
    fn defaults_test() {
        let opts = parse(&["hmz", "a.txt"]);
        assert_eq!(opts.files, vec!["a.txt".to_string()]);
        assert_eq!(opts.format, StreamFormat::Single);
        assert_eq!(opts.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(opts.verbosity, LevelFilter::Info);
        assert!(!opts.parallel);
    }

    #[test]
    fn flags_test() {
        let opts = parse(&["hmz", "-m", "-p", "--block-size", "4096", "-v", "5", "a", "b"]);
        assert_eq!(opts.files.len(), 2);
        assert_eq!(opts.format, StreamFormat::Multi);
        assert!(opts.parallel);
        assert_eq!(opts.block_size, 4096);
        assert_eq!(opts.verbosity, LevelFilter::Trace);
        assert_eq!(parse(&["hmz", "-v", "0", "a"]).verbosity, LevelFilter::Off);
    }

    #[test]
    fn rejects_bad_input_test() {
        assert!(Args::try_parse_from(["hmz"]).is_err());
        let args = Args::try_parse_from(["hmz", "-b", "0", "a"]).unwrap();
        assert!(HmzOpts::from_args(args).is_err());
    }
}
