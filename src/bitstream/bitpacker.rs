use crate::error::{Error, Result};

/// Packs variable length codes into a caller supplied output slice.
///
/// Codes are left aligned into the free region of a 64 bit queue, first written = most
/// significant. At most 48 bits (four 12 bit codes) may be put between two flushes.
pub struct BitPacker<'a> {
    output: &'a mut [u8],
    pos: usize,
    queue: u64,
    /// Count of free (not yet written) bits in the queue.
    free: u32,
}

impl<'a> BitPacker<'a> {
    /// Create a new BitPacker writing into `output` starting at byte `pos`.
    pub fn new(output: &'a mut [u8], pos: usize) -> Self {
        Self {
            output,
            pos,
            queue: 0,
            free: 64,
        }
    }

    /// Put the low `bits` bits of `code` on the queue. Does not touch the output.
    #[inline(always)]
    pub fn put(&mut self, code: u64, bits: u32) {
        self.free -= bits;
        self.queue |= code << self.free;
    }

    /// Write out every complete byte on the queue, keeping the 0-7 leftover bits.
    #[inline(always)]
    pub fn flush(&mut self) -> Result<()> {
        let bytes = ((64 - self.free) >> 3) as usize;
        self.write_bytes(bytes)?;
        let bits = (bytes as u32) << 3;
        self.free += bits;
        self.queue = self.queue.checked_shl(bits).unwrap_or(0);
        Ok(())
    }

    /// Write the remaining bits rounded up to a full byte, then the trailer byte holding the
    /// number of padding bits. Returns the position just past the trailer.
    pub fn finish(mut self) -> Result<usize> {
        if self.free < 64 {
            let bytes = ((64 - self.free + 7) >> 3) as usize;
            self.write_bytes(bytes)?;
        }
        let trailer = (self.free & 7) as u8;
        let capacity = self.output.len();
        *self
            .output
            .get_mut(self.pos)
            .ok_or_else(|| Error::overflow(self.pos + 1, capacity))? = trailer;
        Ok(self.pos + 1)
    }

    fn write_bytes(&mut self, bytes: usize) -> Result<()> {
        let end = self.pos + bytes;
        let capacity = self.output.len();
        self.output
            .get_mut(self.pos..end)
            .ok_or_else(|| Error::overflow(end, capacity))?
            .copy_from_slice(&self.queue.to_be_bytes()[..bytes]);
        self.pos = end;
        Ok(())
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        let bits = self.pos * 8 + (64 - self.free) as usize;
        format!("[{}.{}]", bits / 8, bits % 8)
    }
}
