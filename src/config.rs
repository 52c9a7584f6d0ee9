//! Buffer geometry: channel count and frame capacity.

use crate::error::BufferError;
use crate::{DEFAULT_FRAME_CAPACITY, MAX_CHANNELS, SAMPLE_WIDTH};

/// Shape of an [`InterleavedBuffer`](crate::InterleavedBuffer).
///
/// The default is stereo with room for 1152 frames (4608 bytes), the
/// largest block a layer-III decoder emits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BufferConfig {
    /// Number of interleaved channels (1..=8).
    pub channels: usize,
    /// Frames (one sample per channel) the buffer can hold per cycle.
    pub frame_capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        BufferConfig {
            channels: 2,
            frame_capacity: DEFAULT_FRAME_CAPACITY,
        }
    }
}

impl BufferConfig {
    pub fn stereo() -> Self {
        Self::default()
    }

    pub fn mono() -> Self {
        Self::default().with_channels(1)
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_frame_capacity(mut self, frame_capacity: usize) -> Self {
        self.frame_capacity = frame_capacity;
        self
    }

    /// Bytes per interleaved frame.
    pub fn frame_width(&self) -> usize {
        self.channels * SAMPLE_WIDTH
    }

    /// Total size of the backing store in bytes.
    pub fn byte_capacity(&self) -> usize {
        self.frame_capacity * self.frame_width()
    }

    /// Check that the geometry describes a usable buffer.
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(BufferError::UnsupportedChannelCount(self.channels));
        }
        if self.frame_capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        Ok(())
    }
}
