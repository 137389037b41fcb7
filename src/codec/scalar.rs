use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};

use crate::{Error, Result};

/// Days from 0001-01-01 (chrono's common era origin) to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const MILLIS_PER_SECOND: i64 = 1_000;
const MICROS_PER_SECOND: i64 = 1_000_000;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MILLI: u32 = 1_000_000;
const NANOS_PER_MICRO: u32 = 1_000;

pub fn encode_date(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub fn decode_date(days: i32) -> Result<NaiveDate> {
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| Error::Layout(format!("day offset {days} is out of range")))
}

/// Leap seconds surface as subsecond nanos past 10^9; fold them into the
/// last in-range tick so time-of-day encodings never leave the day.
fn clamped_nanos(time: NaiveTime) -> u32 {
    time.nanosecond().min(NANOS_PER_SECOND as u32 - 1)
}

pub fn encode_time_millis(time: NaiveTime) -> i32 {
    let secs = time.num_seconds_from_midnight() as i64;
    let subsec = (clamped_nanos(time) / NANOS_PER_MILLI) as i64;
    (secs * MILLIS_PER_SECOND + subsec) as i32
}

pub fn decode_time_millis(millis: i32) -> Result<NaiveTime> {
    if millis < 0 {
        return Err(Error::Layout(format!(
            "time of day {millis}ms is out of range"
        )));
    }
    let secs = (millis as u32) / MILLIS_PER_SECOND as u32;
    let subsec = (millis as u32) % MILLIS_PER_SECOND as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, subsec * NANOS_PER_MILLI)
        .ok_or_else(|| Error::Layout(format!("time of day {millis}ms is out of range")))
}

pub fn encode_time_micros(time: NaiveTime) -> i64 {
    let secs = time.num_seconds_from_midnight() as i64;
    let subsec = (clamped_nanos(time) / NANOS_PER_MICRO) as i64;
    secs * MICROS_PER_SECOND + subsec
}

pub fn decode_time_micros(micros: i64) -> Result<NaiveTime> {
    if micros < 0 || micros / MICROS_PER_SECOND > u32::MAX as i64 {
        return Err(Error::Layout(format!(
            "time of day {micros}us is out of range"
        )));
    }
    let secs = (micros / MICROS_PER_SECOND) as u32;
    let subsec = (micros % MICROS_PER_SECOND) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, subsec * NANOS_PER_MICRO)
        .ok_or_else(|| Error::Layout(format!("time of day {micros}us is out of range")))
}

pub fn encode_time_nanos(time: NaiveTime) -> i64 {
    let secs = time.num_seconds_from_midnight() as i64;
    secs * NANOS_PER_SECOND + clamped_nanos(time) as i64
}

pub fn decode_time_nanos(nanos: i64) -> Result<NaiveTime> {
    if nanos < 0 || nanos / NANOS_PER_SECOND > u32::MAX as i64 {
        return Err(Error::Layout(format!(
            "time of day {nanos}ns is out of range"
        )));
    }
    let secs = (nanos / NANOS_PER_SECOND) as u32;
    let subsec = (nanos % NANOS_PER_SECOND) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, subsec)
        .ok_or_else(|| Error::Layout(format!("time of day {nanos}ns is out of range")))
}

pub fn encode_timestamp_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub fn decode_timestamp_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| Error::Layout(format!("timestamp {millis}ms is out of range")))
}

pub fn encode_timestamp_micros(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

pub fn decode_timestamp_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| Error::Layout(format!("timestamp {micros}us is out of range")))
}

pub fn encode_timestamp_nanos(ts: DateTime<Utc>) -> Result<i64> {
    ts.timestamp_nanos_opt()
        .ok_or_else(|| Error::Layout("timestamp is out of nanosecond range".to_string()))
}

pub fn decode_timestamp_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}
