//! Conversion of engine base-time values into UTC instants.
//!
//! The engine reports dates as microseconds since 1601-01-01T00:00:00Z. They
//! are widened to Windows file time (100 ns units, same epoch) and then
//! mapped onto a calendar that spans 0001-01-01T00:00:00Z through
//! 9999-12-31T23:59:59.9999999Z, clamping at both ends.

use crate::error::BridgeError;
use crate::internal_error;
use chrono::{DateTime, Utc};

/// Largest file time that still maps into the calendar range.
pub const MAX_FILE_TIME: i64 = 2_650_467_743_999_999_999;

/// 100 ns ticks between 0001-01-01 and the file-time epoch (1601-01-01).
pub const FILE_TIME_OFFSET: i64 = 504_911_232_000_000_000;

/// 100 ns ticks between 0001-01-01 and 9999-12-31T23:59:59.9999999.
pub const MAX_CALENDAR_TICKS: i64 = 3_155_378_975_999_999_999;

const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;
const BASE_TIME_TO_FILE_TIME: i64 = 10;

// 100 ns ticks between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Earliest instant a date argument can take.
pub fn min_utc() -> Result<DateTime<Utc>, BridgeError> {
    calendar_ticks_to_utc(0)
}

/// Latest instant a date argument can take.
pub fn max_utc() -> Result<DateTime<Utc>, BridgeError> {
    calendar_ticks_to_utc(MAX_CALENDAR_TICKS)
}

/// Convert engine base-time ticks to UTC.
pub fn base_time_to_utc(ticks: i64) -> Result<DateTime<Utc>, BridgeError> {
    match ticks.checked_mul(BASE_TIME_TO_FILE_TIME) {
        Some(file_time) => file_time_to_utc(file_time),
        // Out of i64 range in either direction lies past the matching clamp.
        None if ticks > 0 => max_utc(),
        None => min_utc(),
    }
}

/// Convert a file time to UTC.
///
/// Values above [`MAX_FILE_TIME`] clamp to [`max_utc`]. Negative values are
/// shifted onto the calendar epoch and clamp to [`min_utc`] once the shifted
/// tick count is zero or below.
pub fn file_time_to_utc(file_time: i64) -> Result<DateTime<Utc>, BridgeError> {
    let ticks = if file_time > MAX_FILE_TIME {
        MAX_CALENDAR_TICKS
    } else if file_time < 0 {
        let universal_ticks = file_time + FILE_TIME_OFFSET;
        if universal_ticks <= 0 { 0 } else { universal_ticks }
    } else {
        file_time + FILE_TIME_OFFSET
    };
    calendar_ticks_to_utc(ticks)
}

/// Map a UTC instant back to engine base-time ticks, truncating below one
/// microsecond.
pub fn utc_to_base_time(dt: &DateTime<Utc>) -> i64 {
    let subsec_ticks = (dt.timestamp_subsec_nanos() as i64 / NANOS_PER_TICK) as i128;
    let since_unix = dt.timestamp() as i128 * TICKS_PER_SECOND as i128 + subsec_ticks;
    let file_time = since_unix + (UNIX_EPOCH_TICKS - FILE_TIME_OFFSET) as i128;
    let ticks = file_time.div_euclid(BASE_TIME_TO_FILE_TIME as i128);
    ticks.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

fn calendar_ticks_to_utc(ticks: i64) -> Result<DateTime<Utc>, BridgeError> {
    let since_unix = ticks - UNIX_EPOCH_TICKS;
    let secs = since_unix.div_euclid(TICKS_PER_SECOND);
    let nanos = (since_unix.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK) as u32;
    DateTime::from_timestamp(secs, nanos).ok_or_else(|| internal_error!(format!("Calendar ticks {ticks} are out of range")))
}
