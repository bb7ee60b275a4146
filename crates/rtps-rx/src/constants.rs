// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RTPS protocol constants (DDS-RTPS v2.3 Sec.8.3)
//!
//! Centralizes the magic numbers, submessage ids, and wire sizes used by the
//! receive path. **Never hardcode these elsewhere.**

use crate::types::ProtocolVersion;

/// RTPS protocol magic: "RTPS" (Sec.8.3.3.1)
pub const RTPS_MAGIC: &[u8; 4] = b"RTPS";

/// Highest RTPS protocol version this receiver speaks.
///
/// All major vendors (RTI, FastDDS, OpenDDS, Cyclone) interoperate at 2.4.
/// Incoming datagrams may carry any version; only the magic is validated.
pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion { major: 2, minor: 4 };

// ============================================================================
// RTPS Submessage IDs (RTPS v2.3 Table 8.13)
// ============================================================================

/// PAD submessage ID - alignment padding, content is discarded
pub const SUBMSG_PAD: u8 = 0x01;

/// ACKNACK submessage ID - reliable protocol acknowledgment (Sec.8.3.7.1)
pub const SUBMSG_ACKNACK: u8 = 0x06;

/// HEARTBEAT submessage ID - writer liveliness and available sequences (Sec.8.3.7.5)
pub const SUBMSG_HEARTBEAT: u8 = 0x07;

/// GAP submessage ID - irrecoverably missing sequence numbers (Sec.8.3.7.4)
pub const SUBMSG_GAP: u8 = 0x08;

/// INFO_TS submessage ID - source timestamp for subsequent submessages (Sec.8.3.7.7)
pub const SUBMSG_INFO_TS: u8 = 0x09;

/// INFO_SRC submessage ID - logical source override for relayed messages (Sec.8.3.7.9)
pub const SUBMSG_INFO_SRC: u8 = 0x0c;

/// INFO_REPLY submessage ID - reply locator lists (Sec.8.3.7.8)
pub const SUBMSG_INFO_REPLY: u8 = 0x0f;

/// INFO_DST submessage ID - destination GUID prefix (Sec.8.3.7.6)
pub const SUBMSG_INFO_DST: u8 = 0x0e;

/// DATA submessage ID - serialized user/discovery data (Sec.8.3.7.2)
pub const SUBMSG_DATA: u8 = 0x15;

/// First vendor-specific submessage ID (0x80..=0xff are vendor extensions)
pub const SUBMSG_VENDOR_BASE: u8 = 0x80;

// ============================================================================
// Submessage flag bits (low byte of each submessage header)
// ============================================================================

/// Endianness flag, bit 0 of every submessage: set = little-endian body
pub const FLAG_ENDIANNESS: u8 = 0x01;

/// DATA: inline QoS parameter list present (bit 1)
pub const FLAG_DATA_INLINE_QOS: u8 = 0x02;

/// DATA: serialized payload present (bit 2)
pub const FLAG_DATA_PAYLOAD: u8 = 0x04;

/// DATA: payload is a serialized key, not data (bit 3)
pub const FLAG_DATA_KEY: u8 = 0x08;

/// HEARTBEAT/ACKNACK: final flag, no response required (bit 1)
pub const FLAG_FINAL: u8 = 0x02;

/// HEARTBEAT: liveliness assertion (bit 2)
pub const FLAG_LIVELINESS: u8 = 0x04;

/// INFO_TS: invalidate flag, no timestamp follows (bit 1)
pub const FLAG_TS_INVALIDATE: u8 = 0x02;

/// INFO_REPLY: multicast locator list follows the unicast list (bit 1)
pub const FLAG_REPLY_MULTICAST: u8 = 0x02;

// ============================================================================
// Wire sizes and offsets (Sec.8.3.3, Sec.9.4)
// ============================================================================

/// RTPS message header size (magic + version + vendor + GUID prefix)
pub const HEADER_SIZE: usize = 20;

/// GUID prefix size (12 bytes per RTPS v2.3)
pub const GUID_PREFIX_SIZE: usize = 12;

/// Entity ID size
pub const ENTITY_ID_SIZE: usize = 4;

/// Submessage header size (id + flags + octetsToNextHeader)
pub const SUBMSG_HEADER_SIZE: usize = 4;

/// Locator wire size (kind + port + 16-byte address)
pub const LOCATOR_SIZE: usize = 24;

/// Inline QoS parameter id terminating the parameter list (PID_SENTINEL)
pub const PID_SENTINEL: u16 = 0x0001;

/// Upper bound on locators accepted per INFO_REPLY list.
///
/// The wire format allows a 32-bit count; an adversarial datagram must not
/// be able to force a large allocation from a 4-byte field.
pub const MAX_REPLY_LOCATORS: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtps_constants() {
        assert_eq!(RTPS_MAGIC, b"RTPS");
        assert_eq!(PROTOCOL_VERSION.major, 2);
        assert_eq!(HEADER_SIZE, 20);
        assert_eq!(GUID_PREFIX_SIZE, 12);
        assert_eq!(SUBMSG_HEADER_SIZE, 4);
        assert_eq!(LOCATOR_SIZE, 24);
    }

    #[test]
    fn test_submessage_ids_match_table_8_13() {
        assert_eq!(SUBMSG_PAD, 0x01);
        assert_eq!(SUBMSG_ACKNACK, 0x06);
        assert_eq!(SUBMSG_HEARTBEAT, 0x07);
        assert_eq!(SUBMSG_GAP, 0x08);
        assert_eq!(SUBMSG_INFO_TS, 0x09);
        assert_eq!(SUBMSG_INFO_SRC, 0x0c);
        assert_eq!(SUBMSG_INFO_DST, 0x0e);
        assert_eq!(SUBMSG_INFO_REPLY, 0x0f);
        assert_eq!(SUBMSG_DATA, 0x15);
    }
}
