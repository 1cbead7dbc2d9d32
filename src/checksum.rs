//! Payload checksum and its wire representation.
//!
//! Every frame carries the XOR of its payload bytes, written in lowercase
//! hex. The sender always emits two digits; the receiver accepts one or
//! two, so digests are compared as numbers rather than as text.

/// Maximum number of hex digits in the checksum field of a frame.
pub const MAX_CHECKSUM_DIGITS: usize = 2;

/// Compute the digest of a payload: XOR of all its bytes.
///
/// The empty payload has digest `0x00`.
pub fn compute(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |digest, &byte| digest ^ byte)
}

/// Render a digest as exactly two lowercase hex digits.
pub fn render_hex(digest: u8) -> [u8; 2] {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    [HEX[(digest >> 4) as usize], HEX[(digest & 0x0f) as usize]]
}

/// Parse a checksum field back into a digest.
///
/// Accepts one or two lowercase hex digits. Anything else (empty input,
/// uppercase, non-hex bytes, extra digits) yields `None`.
pub fn parse_hex(text: &[u8]) -> Option<u8> {
    if text.is_empty() || text.len() > MAX_CHECKSUM_DIGITS {
        return None;
    }
    let mut digest = 0;
    for &byte in text {
        digest = (digest << 4) | hex_value(byte)?;
    }
    Some(digest)
}

/// Value of a single lowercase hex digit.
fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}
