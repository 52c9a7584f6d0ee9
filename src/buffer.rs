//! Interleaved 16-bit PCM output buffer.
//!
//! Decoders write each channel independently. Every channel owns a write
//! cursor that starts at its slot inside the first frame and steps one frame
//! width per sample, so consecutive per-channel writes land interleaved:
//!
//! ```text
//! byte:  0  1  2  3  4  5  6  7
//!       [ L0  ][ R0  ][ L1  ][ R1  ] ...
//! ```
//!
//! A cycle is: appends, `finalize_write`, reads until drained, `reset`.

use std::io;

use tracing::{debug, trace};

use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::{BLOCK_SIZE, SAMPLE_WIDTH};

/// Block values are saturated to this magnitude. -32768 is never produced.
const CLAMP_LIMIT: f32 = 32767.0;

/// Fixed-capacity buffer turning per-channel samples into interleaved
/// little-endian 16-bit PCM bytes.
#[derive(Debug)]
pub struct InterleavedBuffer {
    /// All channels interleaved.
    storage: Box<[u8]>,
    /// Next write offset per channel. Not equal across channels.
    write_cursors: Vec<usize>,
    /// Next unread byte.
    read_cursor: usize,
    /// One past the last valid byte, captured at finalize.
    write_end: usize,
    /// Bytes per frame (`channels * SAMPLE_WIDTH`).
    frame_width: usize,
    /// Block values saturated since construction.
    clipped: u64,
}

impl Default for InterleavedBuffer {
    fn default() -> Self {
        Self::stereo()
    }
}

impl InterleavedBuffer {
    /// Create a buffer with the given geometry.
    pub fn new(config: BufferConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Stereo buffer with the default frame capacity.
    pub fn stereo() -> Self {
        Self::from_valid(BufferConfig::stereo())
    }

    fn from_valid(config: BufferConfig) -> Self {
        let mut buffer = InterleavedBuffer {
            storage: vec![0u8; config.byte_capacity()].into_boxed_slice(),
            write_cursors: vec![0; config.channels],
            read_cursor: 0,
            write_end: 0,
            frame_width: config.frame_width(),
            clipped: 0,
        };
        buffer.reset();
        debug!(
            channels = config.channels,
            frames = config.frame_capacity,
            bytes = buffer.storage.len(),
            "created interleaved buffer"
        );
        buffer
    }

    pub fn channels(&self) -> usize {
        self.write_cursors.len()
    }

    /// Bytes per interleaved frame.
    pub fn frame_width(&self) -> usize {
        self.frame_width
    }

    /// Size of the backing store in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Frames the buffer can hold per cycle.
    pub fn frame_capacity(&self) -> usize {
        self.storage.len() / self.frame_width
    }

    /// Bytes finalized but not yet read.
    pub fn bytes_available(&self) -> usize {
        self.write_end - self.read_cursor
    }

    /// The unread part of the finalized data.
    pub fn pending(&self) -> &[u8] {
        &self.storage[self.read_cursor..self.write_end]
    }

    /// Number of block values that were saturated since construction.
    ///
    /// `reset` does not clear this.
    pub fn clipped_samples(&self) -> u64 {
        self.clipped
    }

    fn cursor(&self, channel: usize) -> Result<usize, BufferError> {
        self.write_cursors
            .get(channel)
            .copied()
            .ok_or(BufferError::InvalidChannel {
                channel,
                channels: self.channels(),
            })
    }

    /// Write one sample for `channel` and advance its cursor by a frame.
    pub fn append_sample(&mut self, channel: usize, value: i16) -> Result<(), BufferError> {
        let pos = self.cursor(channel)?;
        if pos + SAMPLE_WIDTH > self.storage.len() {
            return Err(BufferError::Overflow {
                channel,
                offset: pos,
                capacity: self.storage.len(),
            });
        }

        self.storage[pos..pos + SAMPLE_WIDTH].copy_from_slice(&value.to_le_bytes());
        self.write_cursors[channel] = pos + self.frame_width;
        Ok(())
    }

    /// Write one synthesis block of `BLOCK_SIZE` float samples for `channel`.
    ///
    /// Values are saturated to ±32767 and truncated toward zero. NaN becomes 0.
    /// The whole block is bounds-checked before anything is written.
    pub fn append_block(&mut self, channel: usize, values: &[f32]) -> Result<(), BufferError> {
        if values.len() != BLOCK_SIZE {
            return Err(BufferError::BlockLength {
                expected: BLOCK_SIZE,
                actual: values.len(),
            });
        }

        let mut pos = self.cursor(channel)?;
        let last = pos + (BLOCK_SIZE - 1) * self.frame_width;
        if last + SAMPLE_WIDTH > self.storage.len() {
            return Err(BufferError::Overflow {
                channel,
                offset: last,
                capacity: self.storage.len(),
            });
        }

        for &value in values {
            let (sample, saturated) = saturate(value);
            if saturated {
                self.clipped += 1;
            }
            self.storage[pos..pos + SAMPLE_WIDTH].copy_from_slice(&sample.to_le_bytes());
            pos += self.frame_width;
        }

        self.write_cursors[channel] = pos;
        Ok(())
    }

    /// Close the write phase of a cycle and rewind the read cursor.
    ///
    /// Channel 0 is written first within every frame, so its cursor marks
    /// the end of valid data.
    pub fn finalize_write(&mut self) {
        self.write_end = self.write_cursors[0];
        self.read_cursor = 0;
        trace!(
            bytes = self.write_end,
            clipped = self.clipped,
            "finalized write cycle"
        );
    }

    /// Copy finalized bytes into `dest`, returning how many were copied.
    ///
    /// If `dest` is larger than what remains, everything remaining is
    /// copied. Otherwise the copy is rounded down to whole frames.
    pub fn read(&mut self, dest: &mut [u8]) -> usize {
        let remaining = self.bytes_available();
        let count = if dest.len() > remaining {
            remaining
        } else {
            dest.len() - dest.len() % self.frame_width
        };

        let start = self.read_cursor;
        dest[..count].copy_from_slice(&self.storage[start..start + count]);
        self.read_cursor += count;
        count
    }

    /// Like [`read`](Self::read), copying at most `max_count` bytes into
    /// `dest` starting at `offset`.
    ///
    /// `max_count` is capped to the space left in `dest` after `offset`, so
    /// an oversized request copies what fits. Only an `offset` past the end
    /// of `dest` is an error.
    pub fn read_at(
        &mut self,
        dest: &mut [u8],
        offset: usize,
        max_count: usize,
    ) -> Result<usize, BufferError> {
        if offset > dest.len() {
            return Err(BufferError::DestinationTooSmall {
                needed: offset,
                available: dest.len(),
            });
        }
        let end = offset + max_count.min(dest.len() - offset);
        Ok(self.read(&mut dest[offset..end]))
    }

    /// Discard buffered content and rewind every cursor.
    ///
    /// Storage bytes are not zeroed.
    pub fn reset(&mut self) {
        self.read_cursor = 0;
        self.write_end = 0;
        for (channel, cursor) in self.write_cursors.iter_mut().enumerate() {
            *cursor = channel * SAMPLE_WIDTH;
        }
        trace!("reset interleaved buffer");
    }
}

/// Frame-aligned reads. A `buf` shorter than one frame yields `Ok(0)` even
/// while data remains.
impl io::Read for InterleavedBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(InterleavedBuffer::read(self, buf))
    }
}

/// Clamp and truncate a synthesized value, reporting whether it saturated.
fn saturate(value: f32) -> (i16, bool) {
    let saturated = value > CLAMP_LIMIT || value < -CLAMP_LIMIT;
    (value.clamp(-CLAMP_LIMIT, CLAMP_LIMIT) as i16, saturated)
}
