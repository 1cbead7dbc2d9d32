//! Game messages and their payload templates.
//!
//! Each message kind has a fixed comma-separated template with a fixed
//! number of decimal parameters. The template text is the contract both
//! boards rely on; the framing around it lives in [`crate::frame`].

use core::fmt::Write;

use heapless::String;

use crate::frame::{FrameError, MAX_PAYLOAD_SIZE};

// Payload tags, the first field of every template
const TAG_CHALLENGE: &str = "CHA";
const TAG_ACCEPT: &str = "ACC";
const TAG_REVISE: &str = "REV";
const TAG_SHOOT: &str = "SHO";
const TAG_RESULT: &str = "RES";

/// One message on the game link.
///
/// `Challenge`, `Accept`, and `Revise` carry the opening negotiation that
/// decides which board shoots first; `Shoot` and `Result` carry the turn
/// exchange for the rest of the match. `None` is the "no message"
/// placeholder callers hold between turns and is the one kind that cannot
/// be put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// No message; encoding this is an error.
    None,
    /// Open a match, committing to a secret via its hash.
    Challenge { hash: u16 },
    /// Answer a challenge with the acceptor's own number.
    Accept { number: u16 },
    /// Reveal the secret behind an earlier challenge.
    Revise { secret: u16 },
    /// Fire at one cell of the opponent's field.
    Shoot { row: u16, col: u16 },
    /// Report what the last shot hit. Outcome codes belong to the game
    /// layer; the link carries them verbatim.
    Result { row: u16, col: u16, outcome: u16 },
}

impl Message {
    /// Wire tag of this message kind, or `None` for [`Message::None`].
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Message::None => None,
            Message::Challenge { .. } => Some(TAG_CHALLENGE),
            Message::Accept { .. } => Some(TAG_ACCEPT),
            Message::Revise { .. } => Some(TAG_REVISE),
            Message::Shoot { .. } => Some(TAG_SHOOT),
            Message::Result { .. } => Some(TAG_RESULT),
        }
    }

    /// Check if this message belongs to the opening negotiation.
    pub fn is_negotiation(&self) -> bool {
        matches!(
            self,
            Message::Challenge { .. } | Message::Accept { .. } | Message::Revise { .. }
        )
    }

    /// Render this message as its templated payload text.
    ///
    /// Returns [`FrameError::UnsupportedKind`] for [`Message::None`]. The
    /// output is complete or absent, never partial.
    pub fn to_payload(&self) -> Result<String<MAX_PAYLOAD_SIZE>, FrameError> {
        let mut payload = String::new();
        let result = match self {
            Message::None => return Err(FrameError::UnsupportedKind),
            Message::Challenge { hash } => write!(payload, "{},{}", TAG_CHALLENGE, hash),
            Message::Accept { number } => write!(payload, "{},{}", TAG_ACCEPT, number),
            Message::Revise { secret } => write!(payload, "{},{}", TAG_REVISE, secret),
            Message::Shoot { row, col } => write!(payload, "{},{},{}", TAG_SHOOT, row, col),
            Message::Result { row, col, outcome } => {
                write!(payload, "{},{},{},{}", TAG_RESULT, row, col, outcome)
            }
        };
        // The widest template, RES,65535,65535,65535, fits the capacity
        result.map_err(|_| FrameError::PayloadTooLong)?;
        Ok(payload)
    }

    /// Parse a checksum-validated payload back into a message.
    ///
    /// The leading tag selects the kind; the remaining fields must match
    /// its arity exactly and parse as decimal `u16`.
    pub fn from_payload(payload: &str) -> Result<Self, FrameError> {
        let mut fields = payload.split(',');
        let tag = fields.next().ok_or(FrameError::MalformedFrame)?;
        let message = match tag {
            TAG_CHALLENGE => Message::Challenge {
                hash: next_param(&mut fields)?,
            },
            TAG_ACCEPT => Message::Accept {
                number: next_param(&mut fields)?,
            },
            TAG_REVISE => Message::Revise {
                secret: next_param(&mut fields)?,
            },
            TAG_SHOOT => Message::Shoot {
                row: next_param(&mut fields)?,
                col: next_param(&mut fields)?,
            },
            TAG_RESULT => Message::Result {
                row: next_param(&mut fields)?,
                col: next_param(&mut fields)?,
                outcome: next_param(&mut fields)?,
            },
            _ => return Err(FrameError::MalformedFrame),
        };
        // Fields beyond the template's arity
        if fields.next().is_some() {
            return Err(FrameError::MalformedFrame);
        }
        Ok(message)
    }
}

/// Parse the next template field as a decimal `u16`.
fn next_param(fields: &mut core::str::Split<'_, char>) -> Result<u16, FrameError> {
    fields
        .next()
        .ok_or(FrameError::MalformedFrame)?
        .parse()
        .map_err(|_| FrameError::MalformedFrame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_payload_templates() {
        let cases: [(Message, &str); 5] = [
            (Message::Challenge { hash: 42 }, "CHA,42"),
            (Message::Accept { number: 1 }, "ACC,1"),
            (Message::Revise { secret: 12345 }, "REV,12345"),
            (Message::Shoot { row: 3, col: 7 }, "SHO,3,7"),
            (
                Message::Result {
                    row: 0,
                    col: 0,
                    outcome: 3,
                },
                "RES,0,0,3",
            ),
        ];
        for (message, expected) in cases {
            assert_eq!(message.to_payload().unwrap().as_str(), expected);
        }
    }

    #[test]
    fn test_to_payload_widest_template_fits() {
        let payload = Message::Result {
            row: u16::MAX,
            col: u16::MAX,
            outcome: u16::MAX,
        }
        .to_payload()
        .unwrap();
        assert_eq!(payload.as_str(), "RES,65535,65535,65535");
        assert!(payload.len() <= MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn test_to_payload_rejects_none() {
        assert_eq!(Message::None.to_payload(), Err(FrameError::UnsupportedKind));
    }

    #[test]
    fn test_from_payload_each_kind() {
        assert_eq!(
            Message::from_payload("CHA,42"),
            Ok(Message::Challenge { hash: 42 })
        );
        assert_eq!(
            Message::from_payload("ACC,1"),
            Ok(Message::Accept { number: 1 })
        );
        assert_eq!(
            Message::from_payload("REV,12345"),
            Ok(Message::Revise { secret: 12345 })
        );
        assert_eq!(
            Message::from_payload("SHO,3,7"),
            Ok(Message::Shoot { row: 3, col: 7 })
        );
        assert_eq!(
            Message::from_payload("RES,9,0,1"),
            Ok(Message::Result {
                row: 9,
                col: 0,
                outcome: 1
            })
        );
    }

    #[test]
    fn test_from_payload_unknown_tag() {
        assert_eq!(Message::from_payload("XYZ,1"), Err(FrameError::MalformedFrame));
        assert_eq!(Message::from_payload(""), Err(FrameError::MalformedFrame));
        // Tags are uppercase on the wire
        assert_eq!(Message::from_payload("cha,1"), Err(FrameError::MalformedFrame));
    }

    #[test]
    fn test_from_payload_wrong_arity() {
        assert_eq!(Message::from_payload("CHA"), Err(FrameError::MalformedFrame));
        assert_eq!(
            Message::from_payload("CHA,1,2"),
            Err(FrameError::MalformedFrame)
        );
        assert_eq!(Message::from_payload("SHO,3"), Err(FrameError::MalformedFrame));
        assert_eq!(
            Message::from_payload("SHO,3,7,9"),
            Err(FrameError::MalformedFrame)
        );
        assert_eq!(
            Message::from_payload("RES,1,2"),
            Err(FrameError::MalformedFrame)
        );
    }

    #[test]
    fn test_from_payload_bad_numbers() {
        assert_eq!(Message::from_payload("CHA,"), Err(FrameError::MalformedFrame));
        assert_eq!(Message::from_payload("CHA,x"), Err(FrameError::MalformedFrame));
        assert_eq!(
            Message::from_payload("CHA,-1"),
            Err(FrameError::MalformedFrame)
        );
        // One past u16::MAX
        assert_eq!(
            Message::from_payload("CHA,65536"),
            Err(FrameError::MalformedFrame)
        );
        assert_eq!(
            Message::from_payload("SHO, 3,7"),
            Err(FrameError::MalformedFrame)
        );
    }

    #[test]
    fn test_payload_roundtrip() {
        let messages = [
            Message::Challenge { hash: 0 },
            Message::Accept { number: u16::MAX },
            Message::Revise { secret: 31337 },
            Message::Shoot { row: 9, col: 0 },
            Message::Result {
                row: 5,
                col: 5,
                outcome: 2,
            },
        ];
        for message in messages {
            let payload = message.to_payload().unwrap();
            assert_eq!(Message::from_payload(payload.as_str()), Ok(message));
        }
    }

    #[test]
    fn test_tag() {
        assert_eq!(Message::Shoot { row: 1, col: 2 }.tag(), Some("SHO"));
        assert_eq!(Message::Challenge { hash: 7 }.tag(), Some("CHA"));
        assert_eq!(Message::None.tag(), None);
    }

    #[test]
    fn test_is_negotiation() {
        assert!(Message::Challenge { hash: 1 }.is_negotiation());
        assert!(Message::Accept { number: 1 }.is_negotiation());
        assert!(Message::Revise { secret: 1 }.is_negotiation());
        assert!(!Message::Shoot { row: 1, col: 2 }.is_negotiation());
        assert!(!Message::Result {
            row: 1,
            col: 2,
            outcome: 0
        }
        .is_negotiation());
        assert!(!Message::None.is_negotiation());
    }
}
