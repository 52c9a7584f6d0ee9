//! Hand finalized PCM blocks from a decoding thread to an output thread.
//!
//! The buffer itself has no synchronization. Instead of sharing it, the
//! producer side owns one, drains every finalized cycle into an owned
//! [`PcmBlock`] and sends it over a bounded channel. A full channel blocks
//! the producer, which gives the output side back-pressure.

use std::io;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use tracing::debug;

use crate::SAMPLE_WIDTH;
use crate::buffer::InterleavedBuffer;
use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::sink::SampleSink;

/// One decode cycle's worth of interleaved little-endian PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBlock {
    bytes: Vec<u8>,
    channels: usize,
}

impl PcmBlock {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of whole frames in the block.
    pub fn frames(&self) -> usize {
        self.bytes.len() / (self.channels * SAMPLE_WIDTH)
    }

    /// De-interleaved samples of one channel. Empty for an unknown channel.
    pub fn samples(&self, channel: usize) -> impl Iterator<Item = i16> + '_ {
        let at = channel * SAMPLE_WIDTH;
        self.bytes
            .chunks_exact(self.channels * SAMPLE_WIDTH)
            .filter_map(move |frame| frame.get(at..at + SAMPLE_WIDTH))
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
    }
}

/// Open a handoff whose producer writes into a buffer shaped by `config`.
///
/// `depth` is the number of finalized blocks that may be queued before the
/// producer blocks. Zero makes every send wait for the receiver.
pub fn channel(
    config: BufferConfig,
    depth: usize,
) -> Result<(FrameSender, FrameReceiver), BufferError> {
    let buffer = InterleavedBuffer::new(config)?;
    let (tx, rx) = bounded(depth);
    debug!(depth, channels = config.channels, "opened PCM handoff");

    let sender = FrameSender {
        buffer,
        tx: Some(tx),
    };
    let receiver = FrameReceiver {
        rx,
        current: None,
        pos: 0,
    };
    Ok((sender, receiver))
}

/// Producer half: a [`SampleSink`] that ships each finalized cycle.
pub struct FrameSender {
    buffer: InterleavedBuffer,
    tx: Option<Sender<PcmBlock>>,
}

impl FrameSender {
    /// The buffer collecting the current cycle.
    pub fn buffer(&self) -> &InterleavedBuffer {
        &self.buffer
    }

    /// Finalize the current cycle, send it and start a new one.
    ///
    /// Returns the number of bytes sent. Empty cycles send nothing.
    pub fn finalize_and_send(&mut self) -> Result<usize, BufferError> {
        self.buffer.finalize_write();
        let bytes = self.buffer.pending().to_vec();
        self.buffer.reset();

        if bytes.is_empty() {
            return Ok(0);
        }

        let tx = self.tx.as_ref().ok_or(BufferError::Disconnected)?;
        let len = bytes.len();
        let block = PcmBlock {
            bytes,
            channels: self.buffer.channels(),
        };
        tx.send(block).map_err(|_| BufferError::Disconnected)?;
        Ok(len)
    }

    /// Drop the sending side so the receiver sees end of stream once it has
    /// drained what is queued.
    pub fn disconnect(&mut self) {
        if self.tx.take().is_some() {
            debug!("closed PCM handoff sender");
        }
    }
}

impl SampleSink for FrameSender {
    fn append_sample(&mut self, channel: usize, value: i16) -> Result<(), BufferError> {
        self.buffer.append_sample(channel, value)
    }

    fn append_block(&mut self, channel: usize, values: &[f32]) -> Result<(), BufferError> {
        self.buffer.append_block(channel, values)
    }

    fn finalize_write(&mut self) -> Result<(), BufferError> {
        self.finalize_and_send().map(drop)
    }

    fn clear(&mut self) {
        self.buffer.reset();
    }

    fn set_stop_flag(&mut self) {
        self.disconnect();
    }

    fn close(&mut self) {
        self.disconnect();
    }
}

/// Consumer half. Read it block by block or as a byte stream.
pub struct FrameReceiver {
    rx: Receiver<PcmBlock>,
    /// Block being served through `io::Read`.
    current: Option<PcmBlock>,
    pos: usize,
}

impl FrameReceiver {
    /// Wait for the next block. `None` once the sender is gone and the
    /// queue is empty.
    pub fn recv(&self) -> Option<PcmBlock> {
        self.rx.recv().ok()
    }

    /// Next block if one is queued. Fails with
    /// [`BufferError::Disconnected`] once the sender is gone and the queue
    /// is empty.
    pub fn try_recv(&self) -> Result<Option<PcmBlock>, BufferError> {
        match self.rx.try_recv() {
            Ok(block) => Ok(Some(block)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(BufferError::Disconnected),
        }
    }
}

/// Concatenated byte stream of all blocks. Blocks until data arrives and
/// returns `Ok(0)` once the sender is gone and everything has been read.
impl io::Read for FrameReceiver {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if let Some(block) = &self.current {
                let rest = &block.bytes[self.pos..];
                if !rest.is_empty() {
                    let n = rest.len().min(buf.len());
                    buf[..n].copy_from_slice(&rest[..n]);
                    self.pos += n;
                    return Ok(n);
                }
            }

            match self.rx.recv() {
                Ok(block) => {
                    self.current = Some(block);
                    self.pos = 0;
                }
                Err(_) => {
                    debug!("PCM handoff drained");
                    self.current = None;
                    return Ok(0);
                }
            }
        }
    }
}
