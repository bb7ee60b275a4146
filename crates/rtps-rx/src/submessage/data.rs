// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DATA submessage decoder (Sec.8.3.7.2).
//!
//! Body layout:
//!
//! ```text
//! extraFlags(2) + octetsToInlineQos(2) + readerId(4) + writerId(4) + SN(8)
//!   + [inlineQos parameter list, if Q flag]
//!   + [serializedPayload, if D or K flag]
//! ```
//!
//! `octetsToInlineQos` counts from the octet after itself to the first octet
//! of the inline QoS (or payload), which lets future revisions grow the fixed
//! part without breaking old readers — we honor it rather than assuming 16.
//! The payload is forwarded as an opaque span; interpreting it is the
//! endpoint layer's job.

use crate::constants::{FLAG_DATA_INLINE_QOS, FLAG_DATA_KEY, FLAG_DATA_PAYLOAD, PID_SENTINEL};
use crate::cursor::ReadCursor;
use crate::error::{truncated, SubmessageError};
use crate::events::{DataEvent, SubmessageEvent};
use crate::header::SubmessageHeader;
use crate::types::decode_sequence_number;

use super::Decoded;

/// Octets from after `octetsToInlineQos` to the inline QoS when only the
/// fixed fields precede it: readerId(4) + writerId(4) + SN(8).
const OCTETS_TO_INLINE_QOS_MIN: u16 = 16;

pub(crate) fn decode_data<'a>(
    body: &'a [u8],
    header: &SubmessageHeader,
) -> Result<Decoded<'a>, SubmessageError> {
    let mut cursor = ReadCursor::new(body);
    let oob = |e| truncated("DATA", e);

    let _extra_flags = cursor.read_u16(header.endianness).map_err(oob)?;
    let octets_to_inline_qos = cursor.read_u16(header.endianness).map_err(oob)?;
    let reader_id = cursor.read_entity_id().map_err(oob)?;
    let writer_id = cursor.read_entity_id().map_err(oob)?;
    let sequence_number = decode_sequence_number(&mut cursor, header.endianness).map_err(oob)?;

    if sequence_number <= 0 {
        return Err(SubmessageError::InvalidField {
            submessage: "DATA",
            reason: "non-positive sequence number",
        });
    }
    if octets_to_inline_qos < OCTETS_TO_INLINE_QOS_MIN {
        return Err(SubmessageError::InvalidField {
            submessage: "DATA",
            reason: "octetsToInlineQos below fixed fields",
        });
    }

    // Jump to the inline QoS / payload position the writer declared.
    // Cursor is at body offset 20; the target is 4 + octetsToInlineQos.
    let target = 4 + octets_to_inline_qos as usize;
    cursor.skip(target - cursor.offset()).map_err(oob)?;

    let inline_qos = if header.flags & FLAG_DATA_INLINE_QOS != 0 {
        Some(walk_inline_qos(body, &mut cursor, header)?)
    } else {
        None
    };

    let has_payload = header.flags & (FLAG_DATA_PAYLOAD | FLAG_DATA_KEY) != 0;
    let payload: &[u8] = if has_payload { cursor.remainder() } else { &[] };

    let event = DataEvent {
        reader_id,
        writer_id,
        sequence_number,
        inline_qos,
        payload,
        key_payload: header.flags & FLAG_DATA_KEY != 0,
    };
    Ok(Decoded::event(SubmessageEvent::Data(event), header))
}

/// Walk the inline QoS parameter list to the sentinel.
///
/// Parameters are pid(2) + length(2) + padded value, 4-byte aligned relative
/// to the submessage start. Returns the span of the list without the
/// sentinel; the cursor is left just past the sentinel header, where the
/// payload begins.
fn walk_inline_qos<'a>(
    body: &'a [u8],
    cursor: &mut ReadCursor<'a>,
    header: &SubmessageHeader,
) -> Result<&'a [u8], SubmessageError> {
    let oob = |e| truncated("DATA", e);
    let qos_start = cursor.offset();

    loop {
        cursor.align(4).map_err(oob)?;
        let param_start = cursor.offset();
        let pid = cursor.read_u16(header.endianness).map_err(oob)?;
        let length = cursor.read_u16(header.endianness).map_err(oob)?;
        if pid == PID_SENTINEL {
            // Sentinel length is ignored per the wire format.
            return Ok(&body[qos_start..param_start]);
        }
        cursor.skip(length as usize).map_err(oob)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SUBMSG_DATA;
    use crate::cursor::Endianness;

    fn data_header(flags: u8, len: u16) -> SubmessageHeader {
        SubmessageHeader {
            kind: SUBMSG_DATA,
            flags: flags | 0x01,
            octets_to_next: len,
            endianness: Endianness::Little,
        }
    }

    fn data_body(payload: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&0u16.to_le_bytes()); // extraFlags
        body.extend_from_slice(&16u16.to_le_bytes()); // octetsToInlineQos
        body.extend_from_slice(&[0, 0, 0, 0x04]); // reader
        body.extend_from_slice(&[0, 0, 0, 0x03]); // writer
        body.extend_from_slice(&0i32.to_le_bytes()); // SN high
        body.extend_from_slice(&7u32.to_le_bytes()); // SN low
        body.extend_from_slice(payload);
        body
    }

    fn expect_data<'a>(decoded: Decoded<'a>) -> DataEvent<'a> {
        match decoded.event {
            Some(SubmessageEvent::Data(data)) => data,
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_data_without_inline_qos() {
        let body = data_body(b"hello");
        let header = data_header(FLAG_DATA_PAYLOAD, body.len() as u16);
        let data = expect_data(decode_data(&body, &header).expect("data"));
        assert_eq!(data.writer_id, [0, 0, 0, 0x03]);
        assert_eq!(data.sequence_number, 7);
        assert!(data.inline_qos.is_none());
        assert_eq!(data.payload, b"hello");
        assert!(!data.key_payload);
    }

    #[test]
    fn test_data_with_inline_qos() {
        let mut body = data_body(&[]);
        // One parameter (pid 0x0070, 4 bytes) then the sentinel, then payload.
        body.extend_from_slice(&0x0070u16.to_le_bytes());
        body.extend_from_slice(&4u16.to_le_bytes());
        body.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
        body.extend_from_slice(&PID_SENTINEL.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(b"payload!");

        let header = data_header(FLAG_DATA_INLINE_QOS | FLAG_DATA_PAYLOAD, body.len() as u16);
        let data = expect_data(decode_data(&body, &header).expect("data"));
        let qos = data.inline_qos.expect("inline qos present");
        assert_eq!(qos.len(), 8);
        assert_eq!(&qos[4..8], &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(data.payload, b"payload!");
    }

    #[test]
    fn test_data_key_flag() {
        let body = data_body(b"keyhash");
        let header = data_header(FLAG_DATA_KEY, body.len() as u16);
        let data = expect_data(decode_data(&body, &header).expect("data"));
        assert!(data.key_payload);
        assert_eq!(data.payload, b"keyhash");
    }

    #[test]
    fn test_data_no_payload_flags_yields_empty_span() {
        let body = data_body(b"ignored trailing bytes");
        let header = data_header(0, body.len() as u16);
        let data = expect_data(decode_data(&body, &header).expect("data"));
        assert!(data.payload.is_empty());
    }

    #[test]
    fn test_data_honors_larger_octets_to_inline_qos() {
        // A future revision with 4 extra fixed octets before the payload.
        let mut body = Vec::new();
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&20u16.to_le_bytes());
        body.extend_from_slice(&[0u8; 8]); // entity ids
        body.extend_from_slice(&0i32.to_le_bytes());
        body.extend_from_slice(&1u32.to_le_bytes());
        body.extend_from_slice(&[0xEE; 4]); // unknown fixed extension
        body.extend_from_slice(b"data");

        let header = data_header(FLAG_DATA_PAYLOAD, body.len() as u16);
        let data = expect_data(decode_data(&body, &header).expect("data"));
        assert_eq!(data.payload, b"data");
    }

    #[test]
    fn test_data_rejects_nonpositive_sequence_number() {
        let mut body = data_body(&[]);
        body[12..16].copy_from_slice(&0i32.to_le_bytes());
        body[16..20].copy_from_slice(&0u32.to_le_bytes());
        let header = data_header(FLAG_DATA_PAYLOAD, body.len() as u16);
        assert!(matches!(
            decode_data(&body, &header),
            Err(SubmessageError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_data_rejects_short_octets_to_inline_qos() {
        let mut body = data_body(&[]);
        body[2..4].copy_from_slice(&8u16.to_le_bytes());
        let header = data_header(0, body.len() as u16);
        assert!(decode_data(&body, &header).is_err());
    }

    #[test]
    fn test_data_unterminated_inline_qos_is_recoverable() {
        let mut body = data_body(&[]);
        body.extend_from_slice(&0x0070u16.to_le_bytes());
        body.extend_from_slice(&64u16.to_le_bytes()); // runs past the body

        let header = data_header(FLAG_DATA_INLINE_QOS, body.len() as u16);
        assert!(matches!(
            decode_data(&body, &header),
            Err(SubmessageError::Truncated { .. })
        ));
    }

    #[test]
    fn test_data_truncated_fixed_fields() {
        let body = [0u8; 12];
        let header = data_header(FLAG_DATA_PAYLOAD, 12);
        assert!(matches!(
            decode_data(&body, &header),
            Err(SubmessageError::Truncated { .. })
        ));
    }
}
