//! Producer-side interface a decoder writes through.

use crate::buffer::InterleavedBuffer;
use crate::error::BufferError;

/// Destination for decoded samples.
///
/// A decoder is generic over this so it can write into a local
/// [`InterleavedBuffer`] or straight into a
/// [`FrameSender`](crate::handoff::FrameSender).
pub trait SampleSink {
    /// Append one already-quantized sample to `channel`.
    fn append_sample(&mut self, channel: usize, value: i16) -> Result<(), BufferError>;

    /// Append one synthesis block of `BLOCK_SIZE` float samples to `channel`.
    fn append_block(&mut self, channel: usize, values: &[f32]) -> Result<(), BufferError>;

    /// Mark the end of a decode cycle.
    ///
    /// Fails with [`BufferError::Disconnected`] when the cycle can no longer
    /// reach a consumer.
    fn finalize_write(&mut self) -> Result<(), BufferError>;

    /// Discard everything written since the last cycle.
    fn clear(&mut self);

    /// Decoding is being stopped early.
    fn set_stop_flag(&mut self) {}

    /// No more samples will be written.
    fn close(&mut self) {}
}

impl SampleSink for InterleavedBuffer {
    fn append_sample(&mut self, channel: usize, value: i16) -> Result<(), BufferError> {
        InterleavedBuffer::append_sample(self, channel, value)
    }

    fn append_block(&mut self, channel: usize, values: &[f32]) -> Result<(), BufferError> {
        InterleavedBuffer::append_block(self, channel, values)
    }

    fn finalize_write(&mut self) -> Result<(), BufferError> {
        InterleavedBuffer::finalize_write(self);
        Ok(())
    }

    fn clear(&mut self) {
        self.reset()
    }
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn append_sample(&mut self, channel: usize, value: i16) -> Result<(), BufferError> {
        (**self).append_sample(channel, value)
    }

    fn append_block(&mut self, channel: usize, values: &[f32]) -> Result<(), BufferError> {
        (**self).append_block(channel, values)
    }

    fn finalize_write(&mut self) -> Result<(), BufferError> {
        (**self).finalize_write()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn set_stop_flag(&mut self) {
        (**self).set_stop_flag()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
