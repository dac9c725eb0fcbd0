//! Bit-level output for the entropy-coded segment.
//!
//! Bits are packed most-significant first. Every complete `0xFF` byte is
//! followed by a stuffed `0x00` so it cannot be mistaken for a marker.

use std::io::Write;

/// Bit writer over any byte sink.
pub struct BitWriter<W: Write> {
    inner: W,
    /// Pending bits, right-aligned
    acc: u32,
    /// Number of valid bits in `acc` (always < 8 between calls)
    used: u32,
    /// Bytes handed to `inner`, stuffing included
    written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, acc: 0, used: 0, written: 0 }
    }

    /// Writes the low `count` bits of `value`, `count` in `0..=16`.
    pub fn write_bits(&mut self, count: u32, value: u32) -> std::io::Result<()> {
        debug_assert!(count <= 16);
        if count == 0 {
            return Ok(());
        }
        let mask = (1u32 << count) - 1;
        self.acc = (self.acc << count) | (value & mask);
        self.used += count;
        while self.used >= 8 {
            self.used -= 8;
            let byte = (self.acc >> self.used) as u8;
            self.emit(byte)?;
        }
        self.acc &= (1u32 << self.used) - 1;
        Ok(())
    }

    /// Pads the trailing partial byte with 1-bits and writes it out.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.used > 0 {
            let padding = 8 - self.used;
            let byte = ((self.acc << padding) | ((1 << padding) - 1)) as u8;
            self.emit(byte)?;
            self.acc = 0;
            self.used = 0;
        }
        Ok(())
    }

    /// Bytes written so far, including stuffed zeros.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    fn emit(&mut self, byte: u8) -> std::io::Result<()> {
        if byte == 0xFF {
            self.inner.write_all(&[0xFF, 0x00])?;
            self.written += 2;
        } else {
            self.inner.write_all(&[byte])?;
            self.written += 1;
        }
        Ok(())
    }
}
