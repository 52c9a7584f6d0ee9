//! Fixed-capacity output buffer that turns per-channel decoded samples into
//! interleaved little-endian 16-bit PCM.
//!
//! A decoder appends samples one channel at a time, either singly or in
//! 32-sample synthesis blocks, then finalizes the cycle. The consumer drains
//! raw bytes at its own pace, always in whole frames, and the buffer is reset
//! for the next cycle.
//!
//! # Example
//!
//! ```
//! use pcm_interleave::InterleavedBuffer;
//!
//! let mut buf = InterleavedBuffer::stereo();
//! buf.append_sample(0, 1000).unwrap();
//! buf.append_sample(1, -1000).unwrap();
//! buf.finalize_write();
//!
//! let mut out = [0u8; 16];
//! let n = buf.read(&mut out);
//! assert_eq!(&out[..n], &[0xe8, 0x03, 0x18, 0xfc]);
//! ```
//!
//! When the consumer lives on another thread, use [`handoff::channel`] to
//! pass finalized blocks over a bounded channel instead of sharing the
//! buffer.

mod buffer;
mod config;
pub mod error;
pub mod handoff;
mod sink;

pub use buffer::InterleavedBuffer;
pub use config::BufferConfig;
pub use error::BufferError;
pub use sink::SampleSink;

/// Samples per synthesis block accepted by `append_block`.
pub const BLOCK_SIZE: usize = 32;

/// Bytes per sample (16-bit PCM).
pub const SAMPLE_WIDTH: usize = 2;

/// Largest supported channel count.
pub const MAX_CHANNELS: usize = 8;

/// Default frames per cycle: one layer-III granule pair per channel.
pub const DEFAULT_FRAME_CAPACITY: usize = 1152;
