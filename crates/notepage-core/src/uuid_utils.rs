//! UUIDv7 utilities for time-ordered note and user identifiers.
//!
//! Notes use UUIDv7 ids as the tie-breaker in the `(note_date, id)` sort key.
//! A v7 id carries its creation time in the leading 48 bits, so ids generated
//! later compare greater both as [`Uuid`] values and as PostgreSQL `uuid`
//! columns (both compare bytewise).
//!
//! ```text
//! 0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |       rand_a         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                        rand_b                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            rand_b                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use notepage_core::uuid_utils::new_v7;
///
/// let id = new_v7();
/// assert_eq!(id.get_version_num(), 7);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Build a UUIDv7 from raw milliseconds since the Unix epoch and a sequence
/// number placed in the random bits.
///
/// Fixtures use this to produce ids with a known, strictly increasing order
/// without depending on the wall clock.
pub fn v7_from_millis(millis: u64, seq: u16) -> Uuid {
    let bytes = [
        ((millis >> 40) & 0xFF) as u8,
        ((millis >> 32) & 0xFF) as u8,
        ((millis >> 24) & 0xFF) as u8,
        ((millis >> 16) & 0xFF) as u8,
        ((millis >> 8) & 0xFF) as u8,
        (millis & 0xFF) as u8,
        0x70 | ((seq >> 8) & 0x0F) as u8, // version 7 + high bits of rand_a
        (seq & 0xFF) as u8,
        0x80, // variant (10)
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
    ];
    Uuid::from_bytes(bytes)
}
