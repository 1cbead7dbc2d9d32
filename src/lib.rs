//! Serial link protocol for the Naumachia fleet battle game.
//!
//! Two boards play a match against each other over a UART cable. This crate
//! defines the wire format they speak and nothing else: game rules, fields,
//! and the serial driver live with the callers on both ends.
//!
//! # Frame format
//!
//! Every message travels in one ASCII frame:
//!
//! ```text
//! ┌─────┬─────────────┬─────┬────────────┬──────┐
//! │ '$' │   PAYLOAD   │ '*' │  CHECKSUM  │ '\n' │
//! │ 1B  │    0-32B    │ 1B  │ 1-2B hex   │ 1B   │
//! └─────┴─────────────┴─────┴────────────┴──────┘
//! ```
//!
//! The payload is comma-separated template text per message kind
//! (`SHO,3,7`), and the checksum is the XOR of all payload bytes written in
//! lowercase hex, so `$SHO,3,7*50` plus a newline is a complete shot at
//! row 3, column 7.
//!
//! Sending is a single call to [`encode`]. Receiving goes through a
//! [`FrameDecoder`], which consumes one byte at a time, reports each
//! malformed frame as it is detected, and resynchronizes on the next `$`.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

pub mod checksum;
pub mod frame;
pub mod messages;

pub use frame::{
    encode, encode_to_vec, FrameDecoder, FrameError, CHECKSUM_DELIMITER, FRAME_START,
    FRAME_TERMINATOR, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
};
pub use messages::Message;
