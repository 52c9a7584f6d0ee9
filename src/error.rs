use thiserror::Error;

/// Contract violations reported by the interleaved buffer and its handoff.
///
/// None of these leave the buffer in a partially written state: an append
/// that fails has not touched storage or moved any cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Channel count outside `1..=MAX_CHANNELS`.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),
    /// A buffer must hold at least one frame.
    #[error("frame capacity must be non-zero")]
    ZeroCapacity,
    /// Channel index does not exist in this buffer.
    #[error("channel {channel} out of range for a {channels}-channel buffer")]
    InvalidChannel { channel: usize, channels: usize },
    /// Synthesis blocks are always `BLOCK_SIZE` samples long.
    #[error("block holds {actual} samples, expected {expected}")]
    BlockLength { expected: usize, actual: usize },
    /// The append would write past the end of storage.
    #[error("channel {channel} overflows buffer: write at byte {offset}, capacity {capacity}")]
    Overflow {
        channel: usize,
        offset: usize,
        capacity: usize,
    },
    /// Read offset lies past the end of the destination slice.
    #[error("destination too small: offset {needed} past {available} bytes")]
    DestinationTooSmall { needed: usize, available: usize },
    /// The other end of a handoff channel has been dropped.
    #[error("handoff channel disconnected")]
    Disconnected,
}
