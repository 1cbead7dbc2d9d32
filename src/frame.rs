//! Frame encoding and the incremental decoder.
//!
//! Wire format:
//! - START (1 byte): `$` opens a frame
//! - PAYLOAD (0-32 bytes): templated message text, free of `$`, `*`, and newline
//! - CHECKSUM DELIMITER (1 byte): `*` closes the payload
//! - CHECKSUM (1-2 bytes): XOR of the payload bytes in lowercase hex
//! - TERMINATOR (1 byte): newline closes the frame

use heapless::Vec;

use crate::checksum::{self, MAX_CHECKSUM_DIGITS};
use crate::messages::Message;

/// Start delimiter, opens every frame.
pub const FRAME_START: u8 = b'$';

/// Checksum delimiter, separates the payload from the checksum text.
pub const CHECKSUM_DELIMITER: u8 = b'*';

/// Terminator, closes every frame.
pub const FRAME_TERMINATOR: u8 = b'\n';

/// Maximum payload size in bytes.
pub const MAX_PAYLOAD_SIZE: usize = 32;

/// Maximum size of a complete frame, delimiters included.
pub const MAX_FRAME_SIZE: usize = 1 + MAX_PAYLOAD_SIZE + 1 + MAX_CHECKSUM_DIGITS + 1;

/// Errors that can occur while encoding or decoding frames.
///
/// Every decoder error is recoverable: the decoder resets itself and picks
/// the stream back up at the next start delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// A delimiter or terminator in an impossible position, or a validated
    /// payload that matches no message template.
    MalformedFrame,
    /// Payload longer than [`MAX_PAYLOAD_SIZE`].
    PayloadTooLong,
    /// Checksum text longer than [`MAX_CHECKSUM_DIGITS`].
    ChecksumTooLong,
    /// Recorded checksum does not match the received payload.
    ChecksumMismatch,
    /// Byte in the checksum region that is not a lowercase hex digit.
    InvalidChecksumCharacter,
    /// Message kind that cannot travel on the wire ([`Message::None`]).
    UnsupportedKind,
    /// Destination buffer too small for the encoded frame.
    BufferTooSmall,
}

/// Encode a message into a complete frame.
///
/// Returns the number of bytes written. On error nothing has been written:
/// [`FrameError::UnsupportedKind`] for [`Message::None`], or
/// [`FrameError::BufferTooSmall`] when `buffer` cannot hold the frame (size
/// it at [`MAX_FRAME_SIZE`] to be safe). The checksum is always written as
/// two digits even when a single one would do.
pub fn encode(message: &Message, buffer: &mut [u8]) -> Result<usize, FrameError> {
    let payload = message.to_payload()?;
    let frame_len = 1 + payload.len() + 1 + MAX_CHECKSUM_DIGITS + 1;
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    let digest = checksum::compute(payload.as_bytes());

    buffer[0] = FRAME_START;
    buffer[1..1 + payload.len()].copy_from_slice(payload.as_bytes());
    buffer[1 + payload.len()] = CHECKSUM_DELIMITER;
    buffer[2 + payload.len()..2 + payload.len() + MAX_CHECKSUM_DIGITS]
        .copy_from_slice(&checksum::render_hex(digest));
    buffer[frame_len - 1] = FRAME_TERMINATOR;

    Ok(frame_len)
}

/// Encode a message into an owned buffer.
pub fn encode_to_vec(message: &Message) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
    let mut buffer = [0u8; MAX_FRAME_SIZE];
    let len = encode(message, &mut buffer)?;
    let mut vec = Vec::new();
    vec.extend_from_slice(&buffer[..len])
        .map_err(|_| FrameError::BufferTooSmall)?;
    Ok(vec)
}

/// Decoder states, one per frame region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Scanning for the start delimiter.
    WaitingForStart,
    /// Accumulating payload bytes.
    RecordingPayload,
    /// Accumulating checksum digits.
    RecordingChecksum,
}

/// Incremental decoder for incoming frames.
///
/// Feed it one byte at a time as they arrive from the serial port. Between
/// frames it scans for `$` and ignores everything else, so it can join a
/// stream mid-frame and after any error it resynchronizes on the next `$`.
/// One decoder instance serves one byte stream.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    checksum_text: Vec<u8, MAX_CHECKSUM_DIGITS>,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder waiting for the first frame.
    pub fn new() -> Self {
        Self {
            state: DecodeState::WaitingForStart,
            payload: Vec::new(),
            checksum_text: Vec::new(),
        }
    }

    /// Discard any frame in progress and go back to scanning for `$`.
    ///
    /// Runs internally after every completed or failed frame, so both
    /// accumulators are empty whenever a new frame begins.
    pub fn reset(&mut self) {
        self.state = DecodeState::WaitingForStart;
        self.payload.clear();
        self.checksum_text.clear();
    }

    /// Feed one byte to the decoder.
    ///
    /// Returns `Ok(Some(message))` when the byte completes a valid frame,
    /// `Ok(None)` while a frame is still in progress, and `Err` when the
    /// byte reveals a malformed frame. No error is fatal: the decoder has
    /// already reset and the caller can keep feeding the stream.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Message>, FrameError> {
        match self.state {
            DecodeState::WaitingForStart => {
                if byte == FRAME_START {
                    self.state = DecodeState::RecordingPayload;
                }
                // Anything else is inter-frame noise; keep scanning.
                Ok(None)
            }
            DecodeState::RecordingPayload => match byte {
                FRAME_START | FRAME_TERMINATOR => {
                    self.reset();
                    Err(FrameError::MalformedFrame)
                }
                CHECKSUM_DELIMITER => {
                    self.state = DecodeState::RecordingChecksum;
                    Ok(None)
                }
                _ => {
                    if self.payload.push(byte).is_err() {
                        self.reset();
                        return Err(FrameError::PayloadTooLong);
                    }
                    Ok(None)
                }
            },
            DecodeState::RecordingChecksum => match byte {
                b'0'..=b'9' | b'a'..=b'f' => {
                    if self.checksum_text.push(byte).is_err() {
                        self.reset();
                        return Err(FrameError::ChecksumTooLong);
                    }
                    Ok(None)
                }
                FRAME_TERMINATOR => {
                    let outcome = self.finish();
                    self.reset();
                    outcome.map(Some)
                }
                _ => {
                    self.reset();
                    Err(FrameError::InvalidChecksumCharacter)
                }
            },
        }
    }

    /// Feed a run of bytes to the decoder.
    ///
    /// Stops at the first complete message and returns it; bytes after that
    /// message stay unconsumed for the caller's next read. On error the
    /// consumed prefix is gone, but the decoder has reset and the rest of
    /// the stream can follow.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Message>, FrameError> {
        for &byte in bytes {
            if let Some(message) = self.feed(byte)? {
                return Ok(Some(message));
            }
        }
        Ok(None)
    }

    /// Validate the recorded frame and parse its message.
    fn finish(&self) -> Result<Message, FrameError> {
        // The grammar requires at least one checksum digit.
        let recorded =
            checksum::parse_hex(&self.checksum_text).ok_or(FrameError::MalformedFrame)?;
        let computed = checksum::compute(&self.payload);
        if recorded != computed {
            return Err(FrameError::ChecksumMismatch);
        }
        let payload =
            core::str::from_utf8(&self.payload).map_err(|_| FrameError::MalformedFrame)?;
        Message::from_payload(payload)
    }
}
