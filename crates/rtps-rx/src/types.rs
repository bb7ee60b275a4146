// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire-level value types shared by the header codecs and submessage decoders.

#[cfg(test)]
use crate::constants::LOCATOR_SIZE;
use crate::cursor::{Endianness, ReadCursor};
use crate::error::CursorError;

/// GUID prefix: identifies a participant (12 bytes).
pub type GuidPrefix = [u8; 12];

/// Entity ID within a participant (4 bytes, always big-endian on the wire).
pub type EntityId = [u8; 4];

/// Vendor ID in wire order (OMG registry values).
pub type VendorId = [u8; 2];

/// Unknown/wildcard GUID prefix.
pub const GUIDPREFIX_UNKNOWN: GuidPrefix = [0; 12];

/// Unknown entity ID.
pub const ENTITYID_UNKNOWN: EntityId = [0; 4];

/// Unknown vendor ID.
pub const VENDORID_UNKNOWN: VendorId = [0; 2];

/// RTPS protocol version (major.minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// RTPS timestamp: seconds since UNIX epoch plus a 1/2^32-second fraction
/// (Time_t, Sec.9.3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpsTime {
    pub seconds: i32,
    pub fraction: u32,
}

impl RtpsTime {
    /// TIME_INVALID sentinel (Sec.9.3.2).
    pub const INVALID: RtpsTime = RtpsTime {
        seconds: -1,
        fraction: 0xffff_ffff,
    };

    pub fn new(seconds: i32, fraction: u32) -> Self {
        Self { seconds, fraction }
    }

    /// Decode seconds + fraction from a submessage body.
    pub fn decode(cursor: &mut ReadCursor<'_>, endianness: Endianness) -> Result<Self, CursorError> {
        let seconds = cursor.read_i32(endianness)?;
        let fraction = cursor.read_u32(endianness)?;
        Ok(Self { seconds, fraction })
    }

    /// Nanoseconds since UNIX epoch (fraction is 1/2^32 seconds).
    pub fn as_nanos(&self) -> i64 {
        let nanos_from_secs = i64::from(self.seconds) * 1_000_000_000;
        let nanos_from_fraction = ((u64::from(self.fraction) * 1_000_000_000) >> 32) as i64;
        nanos_from_secs + nanos_from_fraction
    }
}

/// Network locator: kind + port + 16-byte address (Sec.9.3.2, 24 bytes).
///
/// UDPv4 locators carry the IPv4 address in the last 4 address bytes, matching
/// the encode side used for discovery announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub kind: i32,
    pub port: u32,
    pub address: [u8; 16],
}

impl Locator {
    /// LOCATOR_KIND_UDPv4
    pub const KIND_UDPV4: i32 = 1;
    /// LOCATOR_KIND_UDPv6
    pub const KIND_UDPV6: i32 = 2;

    /// Decode one 24-byte locator from a submessage body.
    pub fn decode(cursor: &mut ReadCursor<'_>, endianness: Endianness) -> Result<Self, CursorError> {
        let kind = cursor.read_i32(endianness)?;
        let port = cursor.read_u32(endianness)?;
        let mut address = [0u8; 16];
        address.copy_from_slice(cursor.read_bytes(16)?);
        Ok(Self { kind, port, address })
    }

    /// IPv4 octets for UDPv4 locators.
    pub fn ipv4_octets(&self) -> Option<[u8; 4]> {
        if self.kind == Self::KIND_UDPV4 {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(&self.address[12..16]);
            Some(octets)
        } else {
            None
        }
    }
}

/// Decode a SequenceNumber_t: high `i32` + low `u32` (Sec.9.4.2.5).
pub fn decode_sequence_number(
    cursor: &mut ReadCursor<'_>,
    endianness: Endianness,
) -> Result<i64, CursorError> {
    let high = cursor.read_i32(endianness)?;
    let low = cursor.read_u32(endianness)?;
    Ok((i64::from(high) << 32) | i64::from(low))
}

/// Maximum number of bitmap bits in a SequenceNumberSet (RTPS limit).
pub const MAX_BITMAP_BITS: u32 = 256;
const WORD_BITS: u32 = 32;
const BITMAP_WORDS: usize = 8;

/// SequenceNumberSet as carried by GAP and ACKNACK submessages (Sec.9.4.2.6).
///
/// Wire format: bitmapBase (SequenceNumber_t) + numBits (u32) +
/// ceil(numBits/32) bitmap words. Bit 0 of the set is the most significant
/// bit of word 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceNumberSet {
    base: i64,
    num_bits: u32,
    bitmap: [u32; BITMAP_WORDS],
}

impl SequenceNumberSet {
    /// Create an empty set with the provided base sequence number.
    pub fn empty(base: i64) -> Self {
        Self {
            base,
            num_bits: 0,
            bitmap: [0; BITMAP_WORDS],
        }
    }

    /// Decode from a submessage body.
    ///
    /// `numBits > 256` or a negative base is internally inconsistent and
    /// reported as `None`; the caller maps that to a recoverable field error.
    pub fn decode(
        cursor: &mut ReadCursor<'_>,
        endianness: Endianness,
    ) -> Result<Option<Self>, CursorError> {
        let base = decode_sequence_number(cursor, endianness)?;
        let num_bits = cursor.read_u32(endianness)?;
        if base < 0 || num_bits > MAX_BITMAP_BITS {
            return Ok(None);
        }

        let word_count = Self::word_count_for_bits(num_bits);
        let mut bitmap = [0u32; BITMAP_WORDS];
        for word in bitmap.iter_mut().take(word_count) {
            *word = cursor.read_u32(endianness)?;
        }

        Ok(Some(Self {
            base,
            num_bits,
            bitmap,
        }))
    }

    /// Compute number of words required for a given bit count.
    pub fn word_count_for_bits(bits: u32) -> usize {
        bits.div_ceil(WORD_BITS) as usize
    }

    /// Base sequence number of the set.
    pub fn base(&self) -> i64 {
        self.base
    }

    /// Number of bitmap bits actually used.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Whether a sequence number is contained in the set.
    pub fn contains(&self, seq: i64) -> bool {
        if seq < self.base {
            return false;
        }
        let offset = (seq - self.base) as u64;
        if offset >= u64::from(self.num_bits) {
            return false;
        }
        let word = (offset / u64::from(WORD_BITS)) as usize;
        let bit = (offset % u64::from(WORD_BITS)) as u32;
        self.bitmap[word] & (1 << (31 - bit)) != 0
    }

    /// Iterate through all sequence numbers contained in the set.
    pub fn iter(&self) -> SequenceNumberIter {
        SequenceNumberIter {
            base: self.base,
            num_bits: self.num_bits,
            bitmap: self.bitmap,
            index: 0,
        }
    }
}

/// Iterator over sequences contained in a `SequenceNumberSet`.
#[derive(Clone)]
pub struct SequenceNumberIter {
    base: i64,
    num_bits: u32,
    bitmap: [u32; BITMAP_WORDS],
    index: u32,
}

impl Iterator for SequenceNumberIter {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.num_bits {
            let offset = self.index;
            let word = (offset / WORD_BITS) as usize;
            let bit = offset % WORD_BITS;
            self.index += 1;
            if self.bitmap[word] & (1 << (31 - bit)) != 0 {
                return Some(self.base + i64::from(offset));
            }
        }
        None
    }
}

impl IntoIterator for &SequenceNumberSet {
    type Item = i64;
    type IntoIter = SequenceNumberIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtps_time_nanos() {
        let t = RtpsTime::new(1, 0x8000_0000); // 1.5 s
        assert_eq!(t.as_nanos(), 1_500_000_000);
        assert_eq!(RtpsTime::new(0, 0).as_nanos(), 0);
    }

    #[test]
    fn test_time_invalid_sentinel() {
        assert_eq!(RtpsTime::INVALID.seconds, -1);
        assert_eq!(RtpsTime::INVALID.fraction, 0xffff_ffff);
    }

    #[test]
    fn test_sequence_number_high_low() {
        // high = 1, low = 2 -> (1 << 32) + 2, little-endian body
        let buf = [1, 0, 0, 0, 2, 0, 0, 0];
        let mut cursor = ReadCursor::new(&buf);
        let sn = decode_sequence_number(&mut cursor, Endianness::Little).expect("sn");
        assert_eq!(sn, (1i64 << 32) + 2);
    }

    #[test]
    fn test_locator_udpv4_round_trip() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1i32.to_le_bytes()); // kind UDPv4
        buf.extend_from_slice(&7410u32.to_le_bytes()); // port
        buf.extend_from_slice(&[0u8; 12]);
        buf.extend_from_slice(&[192, 168, 1, 100]);
        assert_eq!(buf.len(), LOCATOR_SIZE);

        let mut cursor = ReadCursor::new(&buf);
        let locator = Locator::decode(&mut cursor, Endianness::Little).expect("locator");
        assert_eq!(locator.kind, Locator::KIND_UDPV4);
        assert_eq!(locator.port, 7410);
        assert_eq!(locator.ipv4_octets(), Some([192, 168, 1, 100]));
    }

    #[test]
    fn test_sequence_number_set_decode_and_iter() {
        // base = 5, numBits = 34, bits 0, 1, 33 set
        let mut buf = Vec::new();
        buf.extend_from_slice(&0i32.to_le_bytes()); // base high
        buf.extend_from_slice(&5u32.to_le_bytes()); // base low
        buf.extend_from_slice(&34u32.to_le_bytes()); // numBits
        buf.extend_from_slice(&0xC000_0000u32.to_le_bytes()); // word 0: bits 0,1
        buf.extend_from_slice(&0x4000_0000u32.to_le_bytes()); // word 1: bit 33

        let mut cursor = ReadCursor::new(&buf);
        let set = SequenceNumberSet::decode(&mut cursor, Endianness::Little)
            .expect("read")
            .expect("valid set");
        assert_eq!(set.base(), 5);
        assert_eq!(set.num_bits(), 34);
        assert!(set.contains(5));
        assert!(set.contains(6));
        assert!(set.contains(38));
        assert!(!set.contains(7));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![5, 6, 38]);
    }

    #[test]
    fn test_sequence_number_set_rejects_oversized_bitmap() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&300u32.to_le_bytes()); // numBits > 256

        let mut cursor = ReadCursor::new(&buf);
        let set = SequenceNumberSet::decode(&mut cursor, Endianness::Little).expect("read");
        assert!(set.is_none());
    }

    #[test]
    fn test_sequence_number_set_truncated_bitmap() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&64u32.to_le_bytes()); // needs 2 words
        buf.extend_from_slice(&0u32.to_le_bytes()); // only 1 present

        let mut cursor = ReadCursor::new(&buf);
        assert!(SequenceNumberSet::decode(&mut cursor, Endianness::Little).is_err());
    }
}
