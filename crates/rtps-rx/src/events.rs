// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed events handed to the endpoint collaborator.
//!
//! The receiver makes exactly one [`EndpointSink::on_submessage`] call per
//! recognized data-bearing or control submessage, in wire order. The scope
//! passed alongside is a snapshot of the receiver state in effect at that
//! point in the stream (source identity, destination prefix, timestamp,
//! reply locators). Payload spans borrow from the caller's buffer; a sink
//! that keeps data past the call must copy it.

use std::net::SocketAddr;

use crate::types::{
    EntityId, GuidPrefix, Locator, ProtocolVersion, RtpsTime, SequenceNumberSet, VendorId,
};

/// Receiver-state snapshot attached to every dispatched event.
#[derive(Debug, Clone, Copy)]
pub struct EventScope<'a> {
    /// Logical sender: message header, possibly overridden by INFO_SRC.
    pub source_guid_prefix: GuidPrefix,
    pub source_version: ProtocolVersion,
    pub source_vendor_id: VendorId,
    /// Intended receiver: GUIDPREFIX_UNKNOWN until the first INFO_DST.
    pub dest_guid_prefix: GuidPrefix,
    /// Source timestamp from a preceding INFO_TS, if one is in effect.
    pub timestamp: Option<RtpsTime>,
    /// Locators a reply should target, replaced wholesale by INFO_REPLY.
    pub unicast_reply_locators: &'a [Locator],
    pub multicast_reply_locators: &'a [Locator],
    /// Local participant the datagram was delivered to; destination matching
    /// against `dest_guid_prefix` is the endpoint layer's call.
    pub local_guid_prefix: GuidPrefix,
    /// Network address the datagram arrived from.
    pub source_address: SocketAddr,
}

/// DATA submessage: a serialized sample from a writer.
#[derive(Debug, Clone, Copy)]
pub struct DataEvent<'a> {
    pub reader_id: EntityId,
    pub writer_id: EntityId,
    pub sequence_number: i64,
    /// Raw inline QoS parameter list (without the sentinel), if flagged.
    pub inline_qos: Option<&'a [u8]>,
    /// Serialized payload span; not interpreted here.
    pub payload: &'a [u8],
    /// Payload is a serialized key rather than data (K flag).
    pub key_payload: bool,
}

/// HEARTBEAT submessage: writer's available sequence range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatEvent {
    pub reader_id: EntityId,
    pub writer_id: EntityId,
    pub first_sn: i64,
    pub last_sn: i64,
    /// Monotonic counter for duplicate suppression.
    pub count: u32,
    /// No acknowledgment response required.
    pub final_flag: bool,
    /// Writer asserts liveliness with this heartbeat.
    pub liveliness_flag: bool,
}

/// GAP submessage: sequence numbers the reader will never receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapEvent {
    pub reader_id: EntityId,
    pub writer_id: EntityId,
    pub gap_start: i64,
    pub gap_list: SequenceNumberSet,
}

/// ACKNACK submessage: reader's acknowledgment state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckNackEvent {
    pub reader_id: EntityId,
    pub writer_id: EntityId,
    pub reader_sn_state: SequenceNumberSet,
    /// Monotonic counter for duplicate suppression.
    pub count: u32,
    pub final_flag: bool,
}

/// One recognized data-bearing or control submessage.
#[derive(Debug, Clone)]
pub enum SubmessageEvent<'a> {
    Data(DataEvent<'a>),
    Heartbeat(HeartbeatEvent),
    Gap(GapEvent),
    AckNack(AckNackEvent),
}

impl SubmessageEvent<'_> {
    /// Wire submessage id this event was decoded from.
    pub fn kind(&self) -> u8 {
        match self {
            SubmessageEvent::Data(_) => crate::constants::SUBMSG_DATA,
            SubmessageEvent::Heartbeat(_) => crate::constants::SUBMSG_HEARTBEAT,
            SubmessageEvent::Gap(_) => crate::constants::SUBMSG_GAP,
            SubmessageEvent::AckNack(_) => crate::constants::SUBMSG_ACKNACK,
        }
    }
}

/// Endpoint/discovery collaborator boundary.
///
/// The receiver makes no assumption about how the sink queues, matches, or
/// stores events; it only guarantees wire order within one datagram and that
/// no call is made after a fatal framing error.
pub trait EndpointSink {
    fn on_submessage(&mut self, scope: &EventScope<'_>, event: SubmessageEvent<'_>);
}
