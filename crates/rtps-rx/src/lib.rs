// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # rtps-rx
//!
//! Receive-side RTPS wire-protocol engine: turns raw datagrams into typed,
//! validated submessage events for an endpoint layer, without interpreting
//! payloads or touching reader/writer caches.
//!
//! ## Pipeline
//!
//! ```text
//! datagram bytes
//!   -> message header (magic, version, vendor, GUID prefix)
//!   -> submessage walk (per-kind decoders, body-scoped cursors)
//!   -> EndpointSink events, in wire order
//! ```
//!
//! The [`MessageReceiver`] owns the per-datagram interpretation state
//! (source identity, destination prefix, timestamp, reply locators) that
//! INFO_* submessages mutate and data-bearing submessages snapshot. All
//! parsing is bounds-checked through [`cursor::ReadCursor`]; a malformed
//! submessage is dropped and counted while the rest of the stream still
//! parses, and only broken framing aborts the datagram.
//!
//! ## Example
//!
//! ```no_run
//! use rtps_rx::{EndpointSink, EventScope, MessageReceiver, SubmessageEvent};
//!
//! struct Printer;
//! impl EndpointSink for Printer {
//!     fn on_submessage(&mut self, scope: &EventScope<'_>, event: SubmessageEvent<'_>) {
//!         println!("from {:02x?}: kind 0x{:02x}", scope.source_guid_prefix, event.kind());
//!     }
//! }
//!
//! let mut receiver = MessageReceiver::new();
//! let local_prefix = [0u8; 12];
//! let source = "239.255.0.1:7400".parse().unwrap();
//! let datagram: Vec<u8> = vec![];
//! let mut sink = Printer;
//! let _ = receiver.process_message(local_prefix, source, &datagram, &mut sink);
//! ```

pub mod constants;
pub mod cursor;
pub mod error;
pub mod events;
pub mod header;
pub mod receiver;
mod submessage;
pub mod types;

pub use cursor::{Endianness, ReadCursor};
pub use error::{CursorError, ErrorClass, ReceiveError, SubmessageError};
pub use events::{
    AckNackEvent, DataEvent, EndpointSink, EventScope, GapEvent, HeartbeatEvent, SubmessageEvent,
};
pub use header::{MessageHeader, SubmessageHeader};
pub use receiver::{MessageReceiver, Phase, ProcessSummary, ReceiverState};
pub use types::{
    GuidPrefix, Locator, ProtocolVersion, RtpsTime, SequenceNumberSet, VendorId,
};
