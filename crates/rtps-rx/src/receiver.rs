// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Message receiver: the stateful orchestrator for one incoming datagram.
//!
//! `process_message` resets the per-datagram state, decodes the fixed header,
//! then walks the submessage stream in wire order. INFO_* submessages mutate
//! the state; DATA/HEARTBEAT/GAP/ACKNACK are dispatched to the
//! [`EndpointSink`] with a snapshot of the state in effect at that point.
//!
//! Error policy (two tiers):
//! - Fatal: bad magic, truncated headers, a declared length past the end of
//!   the buffer, or an end-of-message sentinel on an unknown kind. Parsing
//!   stops; events already dispatched stand.
//! - Recoverable: a decoder rejects its own body. The submessage is dropped,
//!   the cursor advances by the declared length, and the rest of the stream
//!   still parses — one corrupt submessage cannot desynchronize the walk.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::constants::{
    PROTOCOL_VERSION, SUBMSG_ACKNACK, SUBMSG_DATA, SUBMSG_GAP, SUBMSG_HEARTBEAT, SUBMSG_INFO_DST,
    SUBMSG_INFO_REPLY, SUBMSG_INFO_SRC, SUBMSG_INFO_TS, SUBMSG_PAD, SUBMSG_VENDOR_BASE,
};
use crate::cursor::ReadCursor;
use crate::error::ReceiveError;
use crate::events::{EndpointSink, EventScope};
use crate::header::{decode_message_header, decode_submessage_header, SubmessageHeader};
use crate::submessage;
use crate::types::{
    GuidPrefix, Locator, ProtocolVersion, RtpsTime, VendorId, GUIDPREFIX_UNKNOWN, VENDORID_UNKNOWN,
};

/// Per-datagram receiver state (Sec.8.3.4).
///
/// Lives for the duration of one `process_message` call; reset at the start
/// of each. Values never leak across datagrams.
#[derive(Debug, Clone)]
pub struct ReceiverState {
    /// Logical sender, from the message header until INFO_SRC overrides it.
    pub source_version: ProtocolVersion,
    pub source_vendor_id: VendorId,
    pub source_guid_prefix: GuidPrefix,
    /// Intended destination; wildcard until the first INFO_DST.
    pub dest_guid_prefix: GuidPrefix,
    /// Protocol version asserted for the destination side.
    pub dest_version: ProtocolVersion,
    /// Reply routing, replaced wholesale by INFO_REPLY.
    pub unicast_reply_locators: Vec<Locator>,
    pub multicast_reply_locators: Vec<Locator>,
    /// Timestamp from a preceding INFO_TS, applied to subsequent
    /// data-bearing submessages until overridden or invalidated.
    pub have_timestamp: bool,
    pub timestamp: RtpsTime,
    /// Local participant the datagram was handed to.
    pub local_guid_prefix: GuidPrefix,
    /// Network address the datagram arrived from.
    pub source_address: SocketAddr,
}

const UNSPECIFIED_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));

impl Default for ReceiverState {
    fn default() -> Self {
        Self {
            source_version: PROTOCOL_VERSION,
            source_vendor_id: VENDORID_UNKNOWN,
            source_guid_prefix: GUIDPREFIX_UNKNOWN,
            dest_guid_prefix: GUIDPREFIX_UNKNOWN,
            dest_version: PROTOCOL_VERSION,
            unicast_reply_locators: Vec::new(),
            multicast_reply_locators: Vec::new(),
            have_timestamp: false,
            timestamp: RtpsTime::INVALID,
            local_guid_prefix: GUIDPREFIX_UNKNOWN,
            source_address: UNSPECIFIED_ADDR,
        }
    }
}

impl ReceiverState {
    fn reset(&mut self) {
        *self = ReceiverState::default();
    }
}

/// Processing phase, for observability and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    HeaderParsed,
    Dispatching,
    /// Terminal success for the datagram.
    Done,
    /// Terminal failure; the drop reason went back to the caller.
    Failed,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

/// Counters for one processed datagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Submessages walked (including INFO_*, PAD, and skipped ones).
    pub submessages: u32,
    /// Events dispatched to the sink.
    pub events: u32,
    /// Submessages dropped by their own decoder (stream continued).
    pub recoverable_errors: u32,
    /// Unknown kinds skipped via their declared length.
    pub ignored: u32,
}

/// Receive-side orchestrator. One instance per ingest thread, or pooled with
/// exclusive checkout per datagram; not reentrant during a call.
#[derive(Debug, Default)]
pub struct MessageReceiver {
    state: ReceiverState,
    phase: Phase,
}

impl MessageReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to `Idle` with all receiver state at defaults. Called
    /// internally at the start of every datagram; exposed for callers that
    /// recycle receivers across configuration changes.
    pub fn reset(&mut self) {
        self.state.reset();
        self.phase = Phase::Idle;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Receiver state as of the last processed submessage. Snapshot only;
    /// the next `process_message` call resets it.
    pub fn state(&self) -> &ReceiverState {
        &self.state
    }

    /// Process one datagram.
    ///
    /// The buffer must be the exact received byte count and stay immutable
    /// for the duration of the call; event payload spans borrow from it.
    /// On a fatal error the remaining buffer is abandoned and the drop
    /// reason returned; events dispatched before the error stand.
    pub fn process_message(
        &mut self,
        local_guid_prefix: GuidPrefix,
        source_address: SocketAddr,
        buffer: &[u8],
        sink: &mut dyn EndpointSink,
    ) -> Result<ProcessSummary, ReceiveError> {
        self.reset();
        let mut cursor = ReadCursor::new(buffer);

        let header = decode_message_header(&mut cursor).map_err(|err| self.fail(err))?;
        self.state.source_version = header.version;
        self.state.source_vendor_id = header.vendor_id;
        self.state.source_guid_prefix = header.guid_prefix;
        self.state.local_guid_prefix = local_guid_prefix;
        self.state.source_address = source_address;
        self.phase = Phase::HeaderParsed;

        log::debug!(
            "[RECV] datagram from {}: {} bytes, sender {:02x?} (vendor {:02x?}, version {})",
            source_address,
            buffer.len(),
            header.guid_prefix,
            header.vendor_id,
            header.version
        );

        self.phase = Phase::Dispatching;
        let mut summary = ProcessSummary::default();

        while !cursor.is_eof() {
            let submsg_start = cursor.offset();
            let smh = decode_submessage_header(&mut cursor).map_err(|err| self.fail(err))?;

            let remaining = cursor.remaining();
            let body_len = if smh.extends_to_end() {
                remaining
            } else {
                let declared = smh.octets_to_next as usize;
                if declared > remaining {
                    return Err(self.fail(ReceiveError::LengthExceedsBuffer {
                        kind: smh.kind,
                        declared: smh.octets_to_next,
                        remaining,
                    }));
                }
                declared
            };

            // Bounds verified above; this read cannot fail.
            let body = cursor
                .read_bytes(body_len)
                .map_err(|_| self.fail(ReceiveError::TruncatedSubmessageHeader {
                    offset: submsg_start,
                }))?;
            summary.submessages += 1;

            let last =
                self.dispatch_submessage(&smh, submsg_start, body, sink, &mut summary)?;
            if last {
                break;
            }
        }

        self.phase = Phase::Done;
        log::debug!(
            "[RECV] done: {} submessages, {} events, {} recoverable errors, {} ignored",
            summary.submessages,
            summary.events,
            summary.recoverable_errors,
            summary.ignored
        );
        Ok(summary)
    }

    /// Decode one submessage body and dispatch its event, if any.
    /// Returns whether the walk should stop (last submessage).
    fn dispatch_submessage(
        &mut self,
        smh: &SubmessageHeader,
        submsg_start: usize,
        body: &[u8],
        sink: &mut dyn EndpointSink,
        summary: &mut ProcessSummary,
    ) -> Result<bool, ReceiveError> {
        let result = match smh.kind {
            SUBMSG_PAD => submessage::decode_pad(body, smh),
            SUBMSG_DATA => submessage::decode_data(body, smh),
            SUBMSG_HEARTBEAT => submessage::decode_heartbeat(body, smh),
            SUBMSG_GAP => submessage::decode_gap(body, smh),
            SUBMSG_ACKNACK => submessage::decode_acknack(body, smh),
            SUBMSG_INFO_SRC => submessage::decode_info_source(body, smh, &mut self.state),
            SUBMSG_INFO_DST => submessage::decode_info_destination(body, smh, &mut self.state),
            SUBMSG_INFO_TS => submessage::decode_info_timestamp(body, smh, &mut self.state),
            SUBMSG_INFO_REPLY => submessage::decode_info_reply(body, smh, &mut self.state),
            kind => {
                // Forward compatibility: unknown kinds are skipped via their
                // declared length. With the sentinel the next boundary is
                // unknowable, which is fatal.
                if smh.extends_to_end() {
                    return Err(self.fail(ReceiveError::SentinelOnUnknownKind {
                        kind,
                        offset: submsg_start,
                    }));
                }
                if kind >= SUBMSG_VENDOR_BASE {
                    log::debug!(
                        "[RECV] ignoring vendor-specific submessage 0x{:02x} ({} octets)",
                        kind,
                        body.len()
                    );
                } else {
                    log::debug!(
                        "[RECV] ignoring unknown submessage 0x{:02x} ({} octets)",
                        kind,
                        body.len()
                    );
                }
                summary.ignored += 1;
                return Ok(false);
            }
        };

        match result {
            Ok(decoded) => {
                if let Some(event) = decoded.event {
                    let scope = scope_of(&self.state);
                    sink.on_submessage(&scope, event);
                    summary.events += 1;
                }
                Ok(decoded.last)
            }
            Err(err) => {
                // Confined to this submessage: the cursor already sits at the
                // declared boundary, so the rest of the stream still parses.
                log::warn!(
                    "[RECV] dropping submessage 0x{:02x} at offset {}: {}",
                    smh.kind,
                    submsg_start,
                    err
                );
                summary.recoverable_errors += 1;
                // A sentinel body was the remainder; nothing left to walk.
                Ok(smh.extends_to_end())
            }
        }
    }

    fn fail(&mut self, err: ReceiveError) -> ReceiveError {
        self.phase = Phase::Failed;
        log::warn!("[RECV] dropping datagram ({:?} class): {}", err.class(), err);
        err
    }
}

fn scope_of(state: &ReceiverState) -> EventScope<'_> {
    EventScope {
        source_guid_prefix: state.source_guid_prefix,
        source_version: state.source_version,
        source_vendor_id: state.source_vendor_id,
        dest_guid_prefix: state.dest_guid_prefix,
        timestamp: state.have_timestamp.then_some(state.timestamp),
        unicast_reply_locators: &state.unicast_reply_locators,
        multicast_reply_locators: &state.multicast_reply_locators,
        local_guid_prefix: state.local_guid_prefix,
        source_address: state.source_address,
    }
}
