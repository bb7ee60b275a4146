// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control submessage decoders: HEARTBEAT, GAP, ACKNACK.
//!
//! These carry reliability bookkeeping for the endpoint layer; the receiver
//! validates wire consistency and forwards them untouched.

use crate::constants::{FLAG_FINAL, FLAG_LIVELINESS};
use crate::cursor::ReadCursor;
use crate::error::{truncated, SubmessageError};
use crate::events::{AckNackEvent, GapEvent, HeartbeatEvent, SubmessageEvent};
use crate::header::SubmessageHeader;
use crate::types::{decode_sequence_number, SequenceNumberSet};

use super::Decoded;

/// HEARTBEAT (Sec.8.3.7.5): readerId + writerId + firstSN + lastSN + count.
pub(crate) fn decode_heartbeat<'a>(
    body: &'a [u8],
    header: &SubmessageHeader,
) -> Result<Decoded<'a>, SubmessageError> {
    let mut cursor = ReadCursor::new(body);
    let oob = |e| truncated("HEARTBEAT", e);

    let reader_id = cursor.read_entity_id().map_err(oob)?;
    let writer_id = cursor.read_entity_id().map_err(oob)?;
    let first_sn = decode_sequence_number(&mut cursor, header.endianness).map_err(oob)?;
    let last_sn = decode_sequence_number(&mut cursor, header.endianness).map_err(oob)?;
    let count = cursor.read_u32(header.endianness).map_err(oob)?;

    if first_sn <= 0 {
        return Err(SubmessageError::InvalidField {
            submessage: "HEARTBEAT",
            reason: "firstSN must be positive",
        });
    }
    // lastSN == firstSN - 1 is the legal "nothing written yet" form.
    if last_sn < first_sn - 1 {
        return Err(SubmessageError::InvalidField {
            submessage: "HEARTBEAT",
            reason: "lastSN below firstSN - 1",
        });
    }

    let event = HeartbeatEvent {
        reader_id,
        writer_id,
        first_sn,
        last_sn,
        count,
        final_flag: header.flags & FLAG_FINAL != 0,
        liveliness_flag: header.flags & FLAG_LIVELINESS != 0,
    };
    Ok(Decoded::event(SubmessageEvent::Heartbeat(event), header))
}

/// GAP (Sec.8.3.7.4): readerId + writerId + gapStart + gapList.
pub(crate) fn decode_gap<'a>(
    body: &'a [u8],
    header: &SubmessageHeader,
) -> Result<Decoded<'a>, SubmessageError> {
    let mut cursor = ReadCursor::new(body);
    let oob = |e| truncated("GAP", e);

    let reader_id = cursor.read_entity_id().map_err(oob)?;
    let writer_id = cursor.read_entity_id().map_err(oob)?;
    let gap_start = decode_sequence_number(&mut cursor, header.endianness).map_err(oob)?;
    let gap_list = SequenceNumberSet::decode(&mut cursor, header.endianness)
        .map_err(oob)?
        .ok_or(SubmessageError::InvalidField {
            submessage: "GAP",
            reason: "malformed sequence number set",
        })?;

    if gap_start <= 0 {
        return Err(SubmessageError::InvalidField {
            submessage: "GAP",
            reason: "gapStart must be positive",
        });
    }

    let event = GapEvent {
        reader_id,
        writer_id,
        gap_start,
        gap_list,
    };
    Ok(Decoded::event(SubmessageEvent::Gap(event), header))
}

/// ACKNACK (Sec.8.3.7.1): readerId + writerId + readerSNState + count.
pub(crate) fn decode_acknack<'a>(
    body: &'a [u8],
    header: &SubmessageHeader,
) -> Result<Decoded<'a>, SubmessageError> {
    let mut cursor = ReadCursor::new(body);
    let oob = |e| truncated("ACKNACK", e);

    let reader_id = cursor.read_entity_id().map_err(oob)?;
    let writer_id = cursor.read_entity_id().map_err(oob)?;
    let reader_sn_state = SequenceNumberSet::decode(&mut cursor, header.endianness)
        .map_err(oob)?
        .ok_or(SubmessageError::InvalidField {
            submessage: "ACKNACK",
            reason: "malformed sequence number set",
        })?;
    let count = cursor.read_u32(header.endianness).map_err(oob)?;

    let event = AckNackEvent {
        reader_id,
        writer_id,
        reader_sn_state,
        count,
        final_flag: header.flags & FLAG_FINAL != 0,
    };
    Ok(Decoded::event(SubmessageEvent::AckNack(event), header))
}
