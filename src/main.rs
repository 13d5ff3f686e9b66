//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::error::Error;
use std::fs;
use std::time::Instant;

use log::{error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use hmz::tools::cli::{hmzopts_init, HmzOpts};
use hmz::{compressed_size, Decoder, Encoder};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Totals for one checked file.
struct FileReport {
    input: usize,
    compressed: usize,
    blocks: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opts = hmzopts_init()?;

    // Available log levels are Off, Error, Warn, Info, Debug, Trace
    TermLogger::init(
        opts.verbosity,
        Config::default(),
        TerminalMode::Stdout,
        ColorChoice::Auto,
    )?;
    opts.report();

    let mut encoder = Encoder::new(opts.format)?;
    let mut decoder = Decoder::new()?.with_parallel_streams(opts.parallel);

    let mut failures = 0;
    for file in &opts.files {
        let start = Instant::now();
        match check_file(file, &opts, &mut encoder, &mut decoder) {
            Ok(report) => {
                let ratio = if report.input == 0 {
                    1.0
                } else {
                    report.compressed as f64 / report.input as f64
                };
                info!(
                    "{}: {} blocks, {} -> {} bytes ({:.3}), {:?}",
                    file,
                    report.blocks,
                    report.input,
                    report.compressed,
                    ratio,
                    start.elapsed()
                );
            }
            Err(e) => {
                error!("{}: {}", file, e);
                failures += 1;
            }
        }
    }

    info!("Done.\n");
    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, opts.files.len()).into());
    }
    Ok(())
}

/// Encode and decode every block of `file`, comparing each block with its source. Blocks are
/// decoded into a full block size buffer, so the last block checks a larger than needed output.
fn check_file(
    file: &str,
    opts: &HmzOpts,
    encoder: &mut Encoder,
    decoder: &mut Decoder,
) -> Result<FileReport, Box<dyn Error>> {
    let data = fs::read(file)?;
    let mut packed = vec![0_u8; compressed_size(opts.block_size)];
    let mut restored = vec![0_u8; opts.block_size];
    let mut report = FileReport {
        input: data.len(),
        compressed: 0,
        blocks: 0,
    };

    for (i, block) in data.chunks(opts.block_size).enumerate() {
        let packed_len = encoder.encode(block, &mut packed)?;
        let restored_len = decoder.decode(&packed[..packed_len], &mut restored)?;
        if restored[..restored_len] != *block {
            return Err(format!("block {} did not survive the round trip", i).into());
        }
        report.compressed += packed_len;
        report.blocks += 1;
    }
    Ok(report)
}
