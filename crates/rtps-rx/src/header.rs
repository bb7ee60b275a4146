// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Message and submessage header codecs (Sec.8.3.3).
//!
//! The fixed 20-byte message header is always big-endian-free (magic and GUID
//! prefix are octet arrays, version/vendor are octet pairs in wire order).
//! Submessage headers carry their own endianness in the flags' low bit, which
//! governs the `octetsToNextHeader` field and the whole body that follows.

use crate::constants::{
    HEADER_SIZE, RTPS_MAGIC, SUBMSG_HEADER_SIZE,
};
use crate::cursor::{Endianness, ReadCursor};
use crate::error::ReceiveError;
use crate::types::{GuidPrefix, ProtocolVersion, VendorId};

/// Fixed RTPS message header, present once per datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub version: ProtocolVersion,
    pub vendor_id: VendorId,
    pub guid_prefix: GuidPrefix,
}

/// Per-submessage header: kind + flags + octetsToNextHeader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmessageHeader {
    pub kind: u8,
    pub flags: u8,
    /// Body length in octets; 0 is the "extends to end of message" sentinel.
    pub octets_to_next: u16,
    /// Byte order of the body, from flags bit 0.
    pub endianness: Endianness,
}

impl SubmessageHeader {
    /// Whether the length field carries the end-of-message sentinel.
    pub fn extends_to_end(&self) -> bool {
        self.octets_to_next == 0
    }
}

/// Decode the fixed message header from the start of the datagram.
///
/// Fatal on failure: a datagram without a valid header is dropped before any
/// submessage is looked at.
pub fn decode_message_header(cursor: &mut ReadCursor<'_>) -> Result<MessageHeader, ReceiveError> {
    if cursor.remaining() < HEADER_SIZE {
        return Err(ReceiveError::TruncatedHeader {
            length: cursor.remaining(),
        });
    }

    // Bounds are pre-checked above; these reads cannot fail.
    let truncated = |length| ReceiveError::TruncatedHeader { length };
    let mut magic = [0u8; 4];
    magic.copy_from_slice(cursor.read_bytes(4).map_err(|e| truncated(e.remaining))?);
    if &magic != RTPS_MAGIC {
        log::debug!("[RECV] rejected datagram: magic {:02x?}", magic);
        return Err(ReceiveError::InvalidProtocolId { found: magic });
    }

    let major = cursor.read_u8().map_err(|e| truncated(e.remaining))?;
    let minor = cursor.read_u8().map_err(|e| truncated(e.remaining))?;
    let mut vendor_id = [0u8; 2];
    vendor_id.copy_from_slice(cursor.read_bytes(2).map_err(|e| truncated(e.remaining))?);
    let guid_prefix = cursor
        .read_guid_prefix()
        .map_err(|e| truncated(e.remaining))?;

    Ok(MessageHeader {
        version: ProtocolVersion { major, minor },
        vendor_id,
        guid_prefix,
    })
}

/// Decode one submessage header at the cursor.
///
/// A buffer that ends inside the 4-byte header is a framing error: the stream
/// cannot be walked any further.
pub fn decode_submessage_header(
    cursor: &mut ReadCursor<'_>,
) -> Result<SubmessageHeader, ReceiveError> {
    if cursor.remaining() < SUBMSG_HEADER_SIZE {
        return Err(ReceiveError::TruncatedSubmessageHeader {
            offset: cursor.offset(),
        });
    }

    let offset = cursor.offset();
    let truncated = |_| ReceiveError::TruncatedSubmessageHeader { offset };
    let kind = cursor.read_u8().map_err(truncated)?;
    let flags = cursor.read_u8().map_err(truncated)?;
    let endianness = Endianness::from_flags(flags);
    let octets_to_next = cursor.read_u16(endianness).map_err(truncated)?;

    Ok(SubmessageHeader {
        kind,
        flags,
        octets_to_next,
        endianness,
    })
}
