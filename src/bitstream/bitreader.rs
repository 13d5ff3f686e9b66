//! BitReader: the decode side of the bitstream subsystem.
//!
//! Reads one trailered bit stream produced by BitPacker. The reader keeps a 64 bit window
//! loaded from `pos` and a count of bits already consumed from it. `tail` is the start of the
//! last full 8 byte window before the trailer. Once the window sits at `tail` it has been
//! shifted right by the padding count, so the last valid bit is always bit 64 of the window.
//!
//! NOTE: the window never reads past the stream. Streams with 8 or fewer data bytes are loaded
//! right aligned as the final window straight away.
//!

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Stream data bytes, trailer excluded.
    data: &'a [u8],
    queue: u64,
    consumed: u32,
    pos: usize,
    tail: usize,
    padding: u32,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader over one stream, trailer byte included.
    pub fn new(stream: &'a [u8]) -> Result<Self> {
        let (&trailer, data) = stream
            .split_last()
            .ok_or(Error::CorruptStream("empty bit stream"))?;
        if trailer > 7 || (data.is_empty() && trailer != 0) {
            return Err(Error::CorruptStream("invalid bit stream trailer"));
        }
        let padding = trailer as u32;

        if data.len() > 8 {
            let mut reader = Self {
                data,
                queue: 0,
                consumed: 0,
                pos: 0,
                tail: data.len() - 8,
                padding,
            };
            reader.queue = reader.load(0);
            return Ok(reader);
        }

        // Short stream: the whole thing is the final window.
        let mut window = [0_u8; 8];
        window[8 - data.len()..].copy_from_slice(data);
        let valid = data.len() as u32 * 8 - padding;
        Ok(Self {
            data,
            queue: u64::from_be_bytes(window) >> padding,
            consumed: 64 - valid,
            pos: 0,
            tail: 0,
            padding,
        })
    }

    #[inline(always)]
    fn load(&self, pos: usize) -> u64 {
        let mut window = [0_u8; 8];
        window.copy_from_slice(&self.data[pos..pos + 8]);
        u64::from_be_bytes(window)
    }

    #[inline(always)]
    fn fill(&mut self, pos: usize, bytes: usize) {
        self.pos = pos;
        self.queue = self.load(pos);
        self.consumed -= (bytes as u32) << 3;
    }

    /// Return the next `bits` bits (1..=12) without consuming them. Bits past the end of the
    /// window read as zero. Callers must only peek after a successful refill.
    #[inline(always)]
    pub fn peek(&self, bits: u32) -> usize {
        ((self.queue << self.consumed) >> (64 - bits)) as usize
    }

    #[inline(always)]
    pub fn consume(&mut self, bits: u32) {
        self.consumed += bits;
    }

    /// Reload a full window of real data bytes. Returns false when the next window would reach
    /// the tail, after which only `refill` may be used.
    #[inline(always)]
    pub fn refill_fast(&mut self) -> bool {
        let bytes = (self.consumed >> 3) as usize;
        let next = self.pos + bytes;
        if next >= self.tail {
            return false;
        }
        self.fill(next, bytes);
        true
    }

    /// Make sure `bits` bits can be peeked, loading the final window when needed. Returns false
    /// when the stream has no bits left.
    #[inline(always)]
    pub fn refill(&mut self, bits: u32) -> bool {
        if self.consumed + bits <= 64 {
            return true;
        }
        if self.pos == self.tail {
            return self.consumed < 64;
        }

        let mut bytes = (self.consumed >> 3) as usize;
        let mut next = self.pos + bytes;
        let mut extra = 0;
        if next >= self.tail {
            bytes = self.tail - self.pos;
            next = self.tail;
            extra = self.padding;
        }
        self.fill(next, bytes);
        self.consumed += extra;
        self.queue >>= extra;
        true
    }

    /// The stream decoded cleanly only if the final window is loaded and fully consumed.
    pub fn finish(&self) -> Result<()> {
        if self.pos != self.tail || self.consumed != 64 {
            return Err(Error::CorruptStream("bit count mismatch at end of stream"));
        }
        Ok(())
    }

    /// Debugging function. Report current position in the stream.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.pos, self.consumed)
    }
}
