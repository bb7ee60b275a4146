// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for the receive path.
//!
//! Two tiers, matching the framing contract:
//! - [`ReceiveError`] is fatal for the datagram: nothing after it is parsed,
//!   events already dispatched stand.
//! - [`SubmessageError`] is confined to one submessage: it is counted and the
//!   cursor advances by the declared length, so the rest of the stream still
//!   parses.

use std::fmt;

/// Cursor-level failure: a typed read would cross the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorError {
    /// Offset the read started from.
    pub offset: usize,
    /// Bytes the read needed.
    pub needed: usize,
    /// Bytes actually remaining.
    pub remaining: usize,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "out of bounds read at offset {}: needed {} bytes, {} remaining",
            self.offset, self.needed, self.remaining
        )
    }
}

impl std::error::Error for CursorError {}

/// Coarse classification of a fatal error, for drop accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Message header was unusable; nothing was dispatched.
    Header,
    /// Submessage framing broke mid-stream; earlier events stand.
    Framing,
}

/// Fatal error for one datagram. Surfaced to the caller as the drop reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveError {
    /// First four bytes are not the RTPS magic.
    InvalidProtocolId { found: [u8; 4] },
    /// Buffer ends inside the fixed message header.
    TruncatedHeader { length: usize },
    /// Buffer ends inside a submessage header.
    TruncatedSubmessageHeader { offset: usize },
    /// Declared submessage length runs past the end of the buffer.
    LengthExceedsBuffer {
        kind: u8,
        declared: u16,
        remaining: usize,
    },
    /// Unknown submessage kind with the "extends to end" sentinel: the next
    /// submessage boundary cannot be determined.
    SentinelOnUnknownKind { kind: u8, offset: usize },
}

impl ReceiveError {
    /// Header-class errors abort before anything is dispatched; framing-class
    /// errors abort the remainder only.
    pub fn class(&self) -> ErrorClass {
        match self {
            ReceiveError::InvalidProtocolId { .. } | ReceiveError::TruncatedHeader { .. } => {
                ErrorClass::Header
            }
            ReceiveError::TruncatedSubmessageHeader { .. }
            | ReceiveError::LengthExceedsBuffer { .. }
            | ReceiveError::SentinelOnUnknownKind { .. } => ErrorClass::Framing,
        }
    }
}

impl fmt::Display for ReceiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiveError::InvalidProtocolId { found } => {
                write!(f, "invalid protocol id {:02x?} (expected \"RTPS\")", found)
            }
            ReceiveError::TruncatedHeader { length } => {
                write!(f, "message truncated inside header ({} bytes)", length)
            }
            ReceiveError::TruncatedSubmessageHeader { offset } => {
                write!(f, "message truncated inside submessage header at offset {}", offset)
            }
            ReceiveError::LengthExceedsBuffer {
                kind,
                declared,
                remaining,
            } => write!(
                f,
                "submessage 0x{:02x} declares {} octets but only {} remain",
                kind, declared, remaining
            ),
            ReceiveError::SentinelOnUnknownKind { kind, offset } => write!(
                f,
                "unknown submessage 0x{:02x} at offset {} uses end-of-message sentinel",
                kind, offset
            ),
        }
    }
}

impl std::error::Error for ReceiveError {}

/// Recoverable error inside one submessage body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmessageError {
    /// Body ended before the fields it declares.
    Truncated {
        submessage: &'static str,
        offset: usize,
        needed: usize,
    },
    /// A field is internally inconsistent.
    InvalidField {
        submessage: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for SubmessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmessageError::Truncated {
                submessage,
                offset,
                needed,
            } => write!(
                f,
                "{} body truncated at offset {} (needed {} bytes)",
                submessage, offset, needed
            ),
            SubmessageError::InvalidField { submessage, reason } => {
                write!(f, "{} has invalid field: {}", submessage, reason)
            }
        }
    }
}

impl std::error::Error for SubmessageError {}

/// Decoder helper: attach the submessage name to a cursor overrun.
pub(crate) fn truncated(submessage: &'static str, err: CursorError) -> SubmessageError {
    SubmessageError::Truncated {
        submessage,
        offset: err.offset,
        needed: err.needed,
    }
}
