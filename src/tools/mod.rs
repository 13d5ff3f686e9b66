//! The tools module provides the helper functions used by the block encoder and the binary.
//!
//! The tools are:
//! - cli: Command line interface for the hmz round-trip checker.
//! - freq_count: Four-lane frequency count of a block.
//! - scratch: Fallible allocation of the encoder and decoder tables.
//! - symbol_sort: Bucket sort of the symbols by count.
//!
pub mod cli;
pub mod freq_count;
pub mod scratch;
pub mod symbol_sort;
