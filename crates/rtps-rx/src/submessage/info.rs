// SPDX-License-Identifier: Apache-2.0 OR MIT

//! INFO_* decoders: header-state submessages that never produce events.
//!
//! These mutate the per-datagram [`ReceiverState`] so that later submessages
//! in the same message are interpreted with the right source, destination,
//! timestamp, and reply routing. State is only written after a body parses
//! completely; a truncated body leaves the previous state untouched.

use crate::constants::{FLAG_REPLY_MULTICAST, FLAG_TS_INVALIDATE, LOCATOR_SIZE, MAX_REPLY_LOCATORS};
use crate::cursor::ReadCursor;
use crate::error::{truncated, SubmessageError};
use crate::header::SubmessageHeader;
use crate::receiver::ReceiverState;
use crate::types::{Locator, ProtocolVersion, RtpsTime};

use super::Decoded;

/// INFO_SRC (Sec.8.3.7.9): a relay overrides the logical source.
///
/// Body: unused(4) + version(2) + vendorId(2) + guidPrefix(12).
pub(crate) fn decode_info_source<'a>(
    body: &'a [u8],
    header: &SubmessageHeader,
    state: &mut ReceiverState,
) -> Result<Decoded<'a>, SubmessageError> {
    let mut cursor = ReadCursor::new(body);
    let oob = |e| truncated("INFO_SRC", e);

    cursor.skip(4).map_err(oob)?;
    let major = cursor.read_u8().map_err(oob)?;
    let minor = cursor.read_u8().map_err(oob)?;
    let mut vendor_id = [0u8; 2];
    vendor_id.copy_from_slice(cursor.read_bytes(2).map_err(oob)?);
    let guid_prefix = cursor.read_guid_prefix().map_err(oob)?;

    state.source_version = ProtocolVersion { major, minor };
    state.source_vendor_id = vendor_id;
    state.source_guid_prefix = guid_prefix;
    // A relay boundary invalidates the previous sender's clock.
    state.have_timestamp = false;
    state.timestamp = RtpsTime::INVALID;

    log::debug!(
        "[RECV] INFO_SRC: source now {:02x?} (vendor {:02x?}, version {})",
        guid_prefix,
        vendor_id,
        state.source_version
    );
    Ok(Decoded::state_only(header))
}

/// INFO_DST (Sec.8.3.7.6): scope subsequent submessages to one destination.
///
/// Body: guidPrefix(12).
pub(crate) fn decode_info_destination<'a>(
    body: &'a [u8],
    header: &SubmessageHeader,
    state: &mut ReceiverState,
) -> Result<Decoded<'a>, SubmessageError> {
    let mut cursor = ReadCursor::new(body);
    let guid_prefix = cursor
        .read_guid_prefix()
        .map_err(|e| truncated("INFO_DST", e))?;

    state.dest_guid_prefix = guid_prefix;
    log::debug!("[RECV] INFO_DST: destination now {:02x?}", guid_prefix);
    Ok(Decoded::state_only(header))
}

/// INFO_TS (Sec.8.3.7.7): timestamp for subsequent data-bearing submessages.
///
/// With the invalidate flag set the body is empty and the current timestamp
/// is cleared; otherwise the body is a Time_t(8).
pub(crate) fn decode_info_timestamp<'a>(
    body: &'a [u8],
    header: &SubmessageHeader,
    state: &mut ReceiverState,
) -> Result<Decoded<'a>, SubmessageError> {
    if header.flags & FLAG_TS_INVALIDATE != 0 {
        state.have_timestamp = false;
        state.timestamp = RtpsTime::INVALID;
        log::debug!("[RECV] INFO_TS: timestamp invalidated");
        return Ok(Decoded::state_only(header));
    }

    let mut cursor = ReadCursor::new(body);
    let timestamp =
        RtpsTime::decode(&mut cursor, header.endianness).map_err(|e| truncated("INFO_TS", e))?;

    state.have_timestamp = true;
    state.timestamp = timestamp;
    log::debug!(
        "[RECV] INFO_TS: timestamp=({}, {})",
        timestamp.seconds,
        timestamp.fraction
    );
    Ok(Decoded::state_only(header))
}

/// INFO_REPLY (Sec.8.3.7.8): replace the reply locator lists wholesale.
///
/// Body: unicast locator list, then a multicast list when the M flag is set.
/// The multicast list is cleared when the flag is absent.
pub(crate) fn decode_info_reply<'a>(
    body: &'a [u8],
    header: &SubmessageHeader,
    state: &mut ReceiverState,
) -> Result<Decoded<'a>, SubmessageError> {
    let mut cursor = ReadCursor::new(body);

    let unicast = decode_locator_list(&mut cursor, header)?;
    let multicast = if header.flags & FLAG_REPLY_MULTICAST != 0 {
        decode_locator_list(&mut cursor, header)?
    } else {
        Vec::new()
    };

    log::debug!(
        "[RECV] INFO_REPLY: {} unicast, {} multicast reply locators",
        unicast.len(),
        multicast.len()
    );
    state.unicast_reply_locators = unicast;
    state.multicast_reply_locators = multicast;
    Ok(Decoded::state_only(header))
}

/// Locator list: count(u32) + count 24-byte locators.
///
/// The count is validated against both the remaining body and
/// `MAX_REPLY_LOCATORS` before any allocation; a 4-byte field must not be
/// able to request one.
fn decode_locator_list(
    cursor: &mut ReadCursor<'_>,
    header: &SubmessageHeader,
) -> Result<Vec<Locator>, SubmessageError> {
    let oob = |e| truncated("INFO_REPLY", e);
    let count = cursor.read_u32(header.endianness).map_err(oob)? as usize;

    if count > MAX_REPLY_LOCATORS {
        return Err(SubmessageError::InvalidField {
            submessage: "INFO_REPLY",
            reason: "locator count exceeds bound",
        });
    }
    if count * LOCATOR_SIZE > cursor.remaining() {
        return Err(SubmessageError::InvalidField {
            submessage: "INFO_REPLY",
            reason: "locator count exceeds body",
        });
    }

    let mut locators = Vec::with_capacity(count);
    for _ in 0..count {
        locators.push(Locator::decode(cursor, header.endianness).map_err(oob)?);
    }
    Ok(locators)
}
