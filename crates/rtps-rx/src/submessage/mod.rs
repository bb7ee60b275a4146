// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Submessage decoders, one per kind (RTPS v2.3 Table 8.13).
//!
//! Every decoder receives the raw body span (exactly the declared length, or
//! the remainder of the message for the end sentinel) plus the parsed
//! [`SubmessageHeader`], and builds its own body-scoped [`ReadCursor`] — so a
//! decoder physically cannot read into the next submessage, and alignment is
//! relative to the submessage start as the wire format requires.
//!
//! Decoders that fail leave the stream intact: the orchestrator advances by
//! the declared length, not by however far the decoder got.

mod control;
mod data;
mod info;

pub(crate) use control::{decode_acknack, decode_gap, decode_heartbeat};
pub(crate) use data::decode_data;
pub(crate) use info::{
    decode_info_destination, decode_info_reply, decode_info_source, decode_info_timestamp,
};

use crate::error::SubmessageError;
use crate::events::SubmessageEvent;
use crate::header::SubmessageHeader;

/// Outcome of one submessage decode.
#[derive(Debug)]
pub(crate) struct Decoded<'a> {
    /// Event to forward, if this kind produces one (INFO_* and PAD do not).
    pub event: Option<SubmessageEvent<'a>>,
    /// Whether this was the last submessage in the message. Lets the
    /// orchestrator terminate the walk without relying on offset arithmetic
    /// alone.
    pub last: bool,
}

impl<'a> Decoded<'a> {
    pub(crate) fn event(event: SubmessageEvent<'a>, header: &SubmessageHeader) -> Self {
        Self {
            event: Some(event),
            last: header.extends_to_end(),
        }
    }

    pub(crate) fn state_only(header: &SubmessageHeader) -> Self {
        Self {
            event: None,
            last: header.extends_to_end(),
        }
    }
}

/// PAD: wire padding, content discarded. Always succeeds.
pub(crate) fn decode_pad<'a>(
    _body: &'a [u8],
    header: &SubmessageHeader,
) -> Result<Decoded<'a>, SubmessageError> {
    Ok(Decoded::state_only(header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Endianness;

    fn pad_header(octets_to_next: u16) -> SubmessageHeader {
        SubmessageHeader {
            kind: crate::constants::SUBMSG_PAD,
            flags: 0x01,
            octets_to_next,
            endianness: Endianness::Little,
        }
    }

    #[test]
    fn test_pad_discards_content() {
        let body = [0xAAu8; 12];
        let decoded = decode_pad(&body, &pad_header(12)).expect("pad");
        assert!(decoded.event.is_none());
        assert!(!decoded.last);
    }

    #[test]
    fn test_pad_with_sentinel_is_last() {
        let decoded = decode_pad(&[], &pad_header(0)).expect("pad");
        assert!(decoded.event.is_none());
        assert!(decoded.last);
    }
}
