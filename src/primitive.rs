// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Untagged date/time primitives.
//!
//! These are the runtime values every tag in this crate erases to:
//!
//! - [`PlainDate`] — a calendar date (an alias of [`chrono::NaiveDate`]).
//! - [`PlainTime`] — a time-of-day with an optional offset-provider.
//! - [`PlainDateTime`] — a date and time-of-day with an optional
//!   offset-provider.
//!
//! Calendar arithmetic, parsing and formatting are chrono's; this module
//! only attaches the optional [`SharedTz`] and the [`Fold`] disambiguator
//! and enforces the classic field ranges (years `1..=9999`, microsecond
//! resolution).
//!
//! # Comparison
//!
//! Two values sharing the same provider object (or both without one)
//! compare by wall-clock fields.  Two aware values compare as UTC
//! instants.  A naive and an aware value are never equal and have no
//! ordering (`partial_cmp` returns `None`).

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike, Utc,
};
use qtty::Seconds;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{ConstructionError, Error};
use crate::tzinfo::{OffsetQuery, SharedTz, TzInfo};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Smallest representable year.
pub const MINYEAR: i32 = 1;
/// Largest representable year.
pub const MAXYEAR: i32 = 9999;

const NANOS_PER_MICRO: u32 = 1_000;
const MICROS_PER_SECOND: i64 = 1_000_000;

// ═══════════════════════════════════════════════════════════════════════════
// Fold
// ═══════════════════════════════════════════════════════════════════════════

/// Which of two identical wall-clock readings a value denotes when a
/// provider's offset falls back (e.g. the repeated hour at the end of DST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Fold {
    #[default]
    Earlier = 0,
    Later = 1,
}

impl TryFrom<u8> for Fold {
    type Error = ConstructionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Fold::Earlier),
            1 => Ok(Fold::Later),
            other => Err(ConstructionError::InvalidFold(other)),
        }
    }
}

impl From<Fold> for u8 {
    fn from(fold: Fold) -> Self {
        fold as u8
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PlainDate
// ═══════════════════════════════════════════════════════════════════════════

/// A calendar date with no time-of-day.
pub type PlainDate = NaiveDate;

/// Values usable wherever a calendar date is expected.
///
/// A date+time is one of them: it exposes its date portion, which is why
/// a plain runtime check for "is a date" also accepts it.
pub trait DateLike {
    fn calendar_date(&self) -> PlainDate;
}

impl DateLike for NaiveDate {
    #[inline]
    fn calendar_date(&self) -> PlainDate {
        *self
    }
}

impl DateLike for PlainDateTime {
    #[inline]
    fn calendar_date(&self) -> PlainDate {
        self.local.date()
    }
}

/// Build a calendar date, rejecting out-of-range fields.
pub fn new_date(year: i32, month: u32, day: u32) -> Result<PlainDate, ConstructionError> {
    if !(MINYEAR..=MAXYEAR).contains(&year) {
        return Err(ConstructionError::YearOutOfRange(year));
    }
    if !(1..=12).contains(&month) {
        return Err(ConstructionError::MonthOutOfRange(month));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ConstructionError::DayOutOfRange { year, month, day })
}

/// Re-validate a chrono date against the supported year range.
pub fn check_date(date: NaiveDate) -> Result<PlainDate, ConstructionError> {
    use chrono::Datelike;
    if (MINYEAR..=MAXYEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(ConstructionError::YearOutOfRange(date.year()))
    }
}

/// Today's date in the system timezone.
pub fn today() -> PlainDate {
    Local::now().date_naive()
}

fn new_naive_time(
    hour: u32,
    minute: u32,
    second: u32,
    microsecond: u32,
) -> Result<NaiveTime, ConstructionError> {
    if hour > 23 {
        return Err(ConstructionError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(ConstructionError::MinuteOutOfRange(minute));
    }
    if second > 59 {
        return Err(ConstructionError::SecondOutOfRange(second));
    }
    if microsecond > 999_999 {
        return Err(ConstructionError::MicrosecondOutOfRange(microsecond));
    }
    NaiveTime::from_hms_micro_opt(hour, minute, second, microsecond)
        .ok_or(ConstructionError::Overflow)
}

/// Drop sub-microsecond precision and reject leap-second readings.
fn truncate_time(time: NaiveTime) -> Result<NaiveTime, ConstructionError> {
    let nanos = time.nanosecond();
    if nanos >= 1_000_000_000 {
        return Err(ConstructionError::SecondOutOfRange(60));
    }
    time.with_nanosecond(nanos - nanos % NANOS_PER_MICRO)
        .ok_or(ConstructionError::Overflow)
}

fn same_provider(a: Option<&SharedTz>, b: Option<&SharedTz>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.ptr_eq(b),
        _ => false,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PlainTime
// ═══════════════════════════════════════════════════════════════════════════

/// A time-of-day with an optional offset-provider.
#[derive(Clone)]
pub struct PlainTime {
    time: NaiveTime,
    tzinfo: Option<SharedTz>,
    fold: Fold,
}

impl PlainTime {
    // ── constructors ──────────────────────────────────────────────────

    /// Build a time-of-day, rejecting out-of-range fields.
    pub fn new(
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        tzinfo: Option<SharedTz>,
        fold: Fold,
    ) -> Result<Self, ConstructionError> {
        Ok(Self {
            time: new_naive_time(hour, minute, second, microsecond)?,
            tzinfo,
            fold,
        })
    }

    /// Adopt a chrono time, truncated to microseconds.
    pub fn from_naive(
        time: NaiveTime,
        tzinfo: Option<SharedTz>,
        fold: Fold,
    ) -> Result<Self, ConstructionError> {
        Ok(Self {
            time: truncate_time(time)?,
            tzinfo,
            fold,
        })
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    #[inline]
    pub fn second(&self) -> u32 {
        self.time.second()
    }

    #[inline]
    pub fn microsecond(&self) -> u32 {
        self.time.nanosecond() / NANOS_PER_MICRO
    }

    #[inline]
    pub fn fold(&self) -> Fold {
        self.fold
    }

    /// The attached offset-provider, if any.
    #[inline]
    pub fn tzinfo(&self) -> Option<&SharedTz> {
        self.tzinfo.as_ref()
    }

    /// The wall-clock reading as a chrono time.
    #[inline]
    pub fn naive(&self) -> NaiveTime {
        self.time
    }

    /// Offset reported by the provider for a bare time-of-day.
    pub fn utcoffset(&self) -> Option<FixedOffset> {
        self.tzinfo.as_ref()?.utc_offset(OffsetQuery::TimeOfDay)
    }

    pub fn tzname(&self) -> Option<String> {
        self.tzinfo.as_ref()?.tz_name(OffsetQuery::TimeOfDay)
    }

    pub fn dst(&self) -> Option<Duration> {
        self.tzinfo.as_ref()?.dst(OffsetQuery::TimeOfDay)
    }

    /// `HH:MM:SS[.ffffff][±HH:MM]`.
    pub fn isoformat(&self) -> String {
        let mut out = self.time.format("%H:%M:%S").to_string();
        if self.microsecond() != 0 {
            out.push_str(&format!(".{:06}", self.microsecond()));
        }
        if let Some(offset) = self.utcoffset() {
            out.push_str(&offset.to_string());
        }
        out
    }

    // ── field replacement ─────────────────────────────────────────────

    pub fn with_hour(&self, hour: u32) -> Result<Self, ConstructionError> {
        self.rebuild(hour, self.minute(), self.second(), self.microsecond())
    }

    pub fn with_minute(&self, minute: u32) -> Result<Self, ConstructionError> {
        self.rebuild(self.hour(), minute, self.second(), self.microsecond())
    }

    pub fn with_second(&self, second: u32) -> Result<Self, ConstructionError> {
        self.rebuild(self.hour(), self.minute(), second, self.microsecond())
    }

    pub fn with_microsecond(&self, microsecond: u32) -> Result<Self, ConstructionError> {
        self.rebuild(self.hour(), self.minute(), self.second(), microsecond)
    }

    pub fn with_fold(&self, fold: Fold) -> Self {
        Self { fold, ..self.clone() }
    }

    /// Same wall-clock reading with another provider (or none).
    pub fn with_tzinfo(&self, tzinfo: Option<SharedTz>) -> Self {
        Self {
            time: self.time,
            tzinfo,
            fold: self.fold,
        }
    }

    fn rebuild(
        &self,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
    ) -> Result<Self, ConstructionError> {
        Self::new(
            hour,
            minute,
            second,
            microsecond,
            self.tzinfo.clone(),
            self.fold,
        )
    }

    // ── comparison keys ───────────────────────────────────────────────

    fn wall_micros(&self) -> i64 {
        i64::from(self.time.num_seconds_from_midnight()) * MICROS_PER_SECOND
            + i64::from(self.microsecond())
    }

    fn utc_micros(&self, offset: FixedOffset) -> i64 {
        self.wall_micros() - i64::from(offset.local_minus_utc()) * MICROS_PER_SECOND
    }
}

impl PartialEq for PlainTime {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Eq for PlainTime {}

impl PartialOrd for PlainTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if same_provider(self.tzinfo(), other.tzinfo()) {
            return Some(self.wall_micros().cmp(&other.wall_micros()));
        }
        match (self.utcoffset(), other.utcoffset()) {
            (None, None) => Some(self.wall_micros().cmp(&other.wall_micros())),
            (Some(a), Some(b)) => Some(self.utc_micros(a).cmp(&other.utc_micros(b))),
            _ => None,
        }
    }
}

impl Hash for PlainTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.utcoffset() {
            Some(offset) => self.utc_micros(offset).hash(state),
            None => self.wall_micros().hash(state),
        }
    }
}

impl fmt::Display for PlainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.isoformat())
    }
}

impl fmt::Debug for PlainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainTime")
            .field("time", &format_args!("{}", self.time))
            .field("tzinfo", &self.tzinfo)
            .field("fold", &u8::from(self.fold))
            .finish()
    }
}

impl FromStr for PlainTime {
    type Err = Error;

    /// Parses `HH:MM:SS[.f]` with an optional `±HH:MM`/`Z` suffix.  A
    /// suffix becomes a [`FixedOffset`] provider.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono only parses offsets alongside a date, so borrow one.
        if let Ok(stamped) = DateTime::parse_from_rfc3339(&format!("1970-01-01T{s}")) {
            let offset = *stamped.offset();
            return Ok(Self::from_naive(
                stamped.naive_local().time(),
                Some(SharedTz::new(offset)),
                Fold::Earlier,
            )?);
        }
        let time = NaiveTime::from_str(s)?;
        Ok(Self::from_naive(time, None, Fold::Earlier)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PlainDateTime
// ═══════════════════════════════════════════════════════════════════════════

/// A calendar date and time-of-day with an optional offset-provider.
#[derive(Clone)]
pub struct PlainDateTime {
    local: NaiveDateTime,
    tzinfo: Option<SharedTz>,
    fold: Fold,
}

impl PlainDateTime {
    // ── constructors ──────────────────────────────────────────────────

    /// Build a date+time, rejecting out-of-range fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        tzinfo: Option<SharedTz>,
        fold: Fold,
    ) -> Result<Self, ConstructionError> {
        let date = new_date(year, month, day)?;
        let time = new_naive_time(hour, minute, second, microsecond)?;
        Ok(Self {
            local: NaiveDateTime::new(date, time),
            tzinfo,
            fold,
        })
    }

    /// Adopt a chrono date+time, truncated to microseconds.
    pub fn from_naive(
        local: NaiveDateTime,
        tzinfo: Option<SharedTz>,
        fold: Fold,
    ) -> Result<Self, ConstructionError> {
        let date = check_date(local.date())?;
        let time = truncate_time(local.time())?;
        Ok(Self {
            local: NaiveDateTime::new(date, time),
            tzinfo,
            fold,
        })
    }

    /// Join a date and a time-of-day; the provider and fold come from `time`.
    pub fn combine(date: PlainDate, time: &PlainTime) -> Result<Self, ConstructionError> {
        Self::from_naive(
            NaiveDateTime::new(date, time.naive()),
            time.tzinfo().cloned(),
            time.fold(),
        )
    }

    /// The current moment.
    ///
    /// Without a provider the result is the naive system-local wall time;
    /// with one it is the provider's wall time for the current UTC instant.
    pub fn now(tzinfo: Option<SharedTz>) -> Result<Self, ConstructionError> {
        Self::from_utc(Utc::now().naive_utc(), tzinfo)
    }

    /// The current UTC wall time, naive.
    pub fn utcnow() -> Result<Self, ConstructionError> {
        Self::from_naive(Utc::now().naive_utc(), None, Fold::Earlier)
    }

    /// The moment `timestamp` seconds after the Unix epoch, rounded to the
    /// microsecond.  Same provider rules as [`PlainDateTime::now`].
    pub fn from_timestamp(
        timestamp: Seconds,
        tzinfo: Option<SharedTz>,
    ) -> Result<Self, ConstructionError> {
        Self::from_utc(utc_from_timestamp(timestamp)?, tzinfo)
    }

    /// The UTC wall time `timestamp` seconds after the Unix epoch, naive.
    pub fn utc_from_timestamp(timestamp: Seconds) -> Result<Self, ConstructionError> {
        Self::from_naive(utc_from_timestamp(timestamp)?, None, Fold::Earlier)
    }

    /// Convert a UTC wall time into `tzinfo`'s wall time.
    fn from_utc(utc: NaiveDateTime, tzinfo: Option<SharedTz>) -> Result<Self, ConstructionError> {
        let Some(tz) = tzinfo else {
            let local = Local.from_utc_datetime(&utc).naive_local();
            return Self::from_naive(local, None, Fold::Earlier);
        };
        let offset = tz
            .offset_from_utc(&utc)
            .ok_or(ConstructionError::UndefinedOffset)?;
        let local = utc
            .checked_add_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
            .ok_or(ConstructionError::Overflow)?;
        // The second reading of a repeated wall time is the later fold.
        let fold = match tz.utc_offset(OffsetQuery::Wall {
            local,
            fold: Fold::Earlier,
        }) {
            Some(earlier) if earlier != offset => Fold::Later,
            _ => Fold::Earlier,
        };
        Self::from_naive(local, Some(tz), fold)
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub fn year(&self) -> i32 {
        chrono::Datelike::year(&self.local)
    }

    #[inline]
    pub fn month(&self) -> u32 {
        chrono::Datelike::month(&self.local)
    }

    #[inline]
    pub fn day(&self) -> u32 {
        chrono::Datelike::day(&self.local)
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        self.local.minute()
    }

    #[inline]
    pub fn second(&self) -> u32 {
        self.local.second()
    }

    #[inline]
    pub fn microsecond(&self) -> u32 {
        self.local.nanosecond() / NANOS_PER_MICRO
    }

    #[inline]
    pub fn fold(&self) -> Fold {
        self.fold
    }

    /// The attached offset-provider, if any.
    #[inline]
    pub fn tzinfo(&self) -> Option<&SharedTz> {
        self.tzinfo.as_ref()
    }

    /// The wall-clock reading as a chrono date+time.
    #[inline]
    pub fn naive(&self) -> NaiveDateTime {
        self.local
    }

    /// The calendar-date portion.
    #[inline]
    pub fn date(&self) -> PlainDate {
        self.local.date()
    }

    /// The time-of-day portion, without the provider.
    pub fn time(&self) -> PlainTime {
        PlainTime {
            time: self.local.time(),
            tzinfo: None,
            fold: self.fold,
        }
    }

    /// The time-of-day portion, keeping the provider.
    pub fn timetz(&self) -> PlainTime {
        PlainTime {
            time: self.local.time(),
            tzinfo: self.tzinfo.clone(),
            fold: self.fold,
        }
    }

    fn query(&self, fold: Fold) -> OffsetQuery {
        OffsetQuery::Wall {
            local: self.local,
            fold,
        }
    }

    /// Offset reported by the provider for this wall time.
    pub fn utcoffset(&self) -> Option<FixedOffset> {
        self.tzinfo.as_ref()?.utc_offset(self.query(self.fold))
    }

    pub fn tzname(&self) -> Option<String> {
        self.tzinfo.as_ref()?.tz_name(self.query(self.fold))
    }

    pub fn dst(&self) -> Option<Duration> {
        self.tzinfo.as_ref()?.dst(self.query(self.fold))
    }

    /// Seconds since the Unix epoch.  A naive value is read as
    /// system-local wall time.
    pub fn timestamp(&self) -> Seconds {
        let offset = self
            .utcoffset()
            .or_else(|| Local.utc_offset(self.query(self.fold)))
            .unwrap_or_else(|| Utc.fix());
        let (secs, nanos) = self.utc_parts(offset);
        Seconds::new(secs as f64 + f64::from(nanos) / 1e9)
    }

    /// `YYYY-MM-DDTHH:MM:SS[.ffffff][±HH:MM]`.
    pub fn isoformat(&self) -> String {
        let mut out = self.local.format("%Y-%m-%dT%H:%M:%S").to_string();
        if self.microsecond() != 0 {
            out.push_str(&format!(".{:06}", self.microsecond()));
        }
        if let Some(offset) = self.utcoffset() {
            out.push_str(&offset.to_string());
        }
        out
    }

    // ── field replacement ─────────────────────────────────────────────

    pub fn with_year(&self, year: i32) -> Result<Self, ConstructionError> {
        let date = new_date(year, self.month(), self.day())?;
        Ok(self.with_date(date))
    }

    pub fn with_month(&self, month: u32) -> Result<Self, ConstructionError> {
        let date = new_date(self.year(), month, self.day())?;
        Ok(self.with_date(date))
    }

    pub fn with_day(&self, day: u32) -> Result<Self, ConstructionError> {
        let date = new_date(self.year(), self.month(), day)?;
        Ok(self.with_date(date))
    }

    pub fn with_hour(&self, hour: u32) -> Result<Self, ConstructionError> {
        let time = self.time().with_hour(hour)?;
        Ok(self.with_naive_time(time.naive()))
    }

    pub fn with_minute(&self, minute: u32) -> Result<Self, ConstructionError> {
        let time = self.time().with_minute(minute)?;
        Ok(self.with_naive_time(time.naive()))
    }

    pub fn with_second(&self, second: u32) -> Result<Self, ConstructionError> {
        let time = self.time().with_second(second)?;
        Ok(self.with_naive_time(time.naive()))
    }

    pub fn with_microsecond(&self, microsecond: u32) -> Result<Self, ConstructionError> {
        let time = self.time().with_microsecond(microsecond)?;
        Ok(self.with_naive_time(time.naive()))
    }

    pub fn with_fold(&self, fold: Fold) -> Self {
        Self { fold, ..self.clone() }
    }

    /// Same wall-clock reading with another provider (or none).
    pub fn with_tzinfo(&self, tzinfo: Option<SharedTz>) -> Self {
        Self {
            local: self.local,
            tzinfo,
            fold: self.fold,
        }
    }

    fn with_date(&self, date: PlainDate) -> Self {
        Self {
            local: NaiveDateTime::new(date, self.local.time()),
            ..self.clone()
        }
    }

    fn with_naive_time(&self, time: NaiveTime) -> Self {
        Self {
            local: NaiveDateTime::new(self.local.date(), time),
            ..self.clone()
        }
    }

    /// The same instant expressed in `tzinfo`'s wall time.
    ///
    /// A naive value is read as system-local wall time first.
    pub fn astimezone(&self, tzinfo: SharedTz) -> Result<Self, ConstructionError> {
        let offset = self
            .utcoffset()
            .or_else(|| Local.utc_offset(self.query(self.fold)))
            .ok_or(ConstructionError::UndefinedOffset)?;
        let utc = self
            .local
            .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
            .ok_or(ConstructionError::Overflow)?;
        Self::from_utc(utc, Some(tzinfo))
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Shift the wall-clock reading, keeping the provider.
    pub fn checked_add_signed(&self, rhs: Duration) -> Option<Self> {
        let local = self.local.checked_add_signed(rhs)?;
        Self::from_naive(local, self.tzinfo.clone(), self.fold).ok()
    }

    pub fn checked_sub_signed(&self, rhs: Duration) -> Option<Self> {
        let local = self.local.checked_sub_signed(rhs)?;
        Self::from_naive(local, self.tzinfo.clone(), self.fold).ok()
    }

    /// Elapsed time from `other` to `self`.
    ///
    /// `None` when one operand is naive and the other aware.
    pub fn signed_duration_since(&self, other: &Self) -> Option<Duration> {
        if same_provider(self.tzinfo(), other.tzinfo()) {
            return Some(self.local - other.local);
        }
        match (self.utcoffset(), other.utcoffset()) {
            (None, None) => Some(self.local - other.local),
            (Some(a), Some(b)) => {
                let (a_secs, a_nanos) = self.utc_parts(a);
                let (b_secs, b_nanos) = other.utc_parts(b);
                Some(
                    Duration::seconds(a_secs - b_secs)
                        + Duration::nanoseconds(i64::from(a_nanos) - i64::from(b_nanos)),
                )
            }
            _ => None,
        }
    }

    // ── comparison keys ───────────────────────────────────────────────

    /// A later-fold reading whose offset differs from the earlier one's.
    /// Such a value never equals a value under another provider.
    fn fold_dependent(&self) -> bool {
        self.fold == Fold::Later
            && self.tzinfo.as_ref().is_some_and(|tz| {
                tz.utc_offset(self.query(Fold::Later)) != tz.utc_offset(self.query(Fold::Earlier))
            })
    }

    fn utc_parts(&self, offset: FixedOffset) -> (i64, u32) {
        let wall = self.local.and_utc();
        (
            wall.timestamp() - i64::from(offset.local_minus_utc()),
            wall.timestamp_subsec_nanos(),
        )
    }
}

fn utc_from_timestamp(timestamp: Seconds) -> Result<NaiveDateTime, ConstructionError> {
    let value = timestamp.value();
    let out_of_range = ConstructionError::TimestampOutOfRange(value);
    let micros = (value * 1e6).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(out_of_range);
    }
    let micros = micros as i64;
    let secs = micros.div_euclid(MICROS_PER_SECOND);
    let nanos = (micros.rem_euclid(MICROS_PER_SECOND) as u32) * NANOS_PER_MICRO;
    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(|utc| utc.naive_utc())
        .ok_or(out_of_range)
}

impl PartialEq for PlainDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Eq for PlainDateTime {}

impl PartialOrd for PlainDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if same_provider(self.tzinfo(), other.tzinfo()) {
            return Some(self.local.cmp(&other.local));
        }
        let ordering = match (self.utcoffset(), other.utcoffset()) {
            (None, None) => self.local.cmp(&other.local),
            (Some(a), Some(b)) => self.utc_parts(a).cmp(&other.utc_parts(b)),
            _ => return None,
        };
        if ordering == Ordering::Equal && (self.fold_dependent() || other.fold_dependent()) {
            return None;
        }
        Some(ordering)
    }
}

impl Hash for PlainDateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Fold is ignored so equal wall times under one provider hash alike;
        // fold-dependent values only equal values under that same provider.
        let offset = self
            .tzinfo
            .as_ref()
            .and_then(|tz| tz.utc_offset(self.query(Fold::Earlier)));
        match offset {
            Some(offset) => self.utc_parts(offset).hash(state),
            None => self.local.hash(state),
        }
    }
}

/// Panics when the result leaves the supported year range; use
/// [`PlainDateTime::checked_add_signed`] to handle that case.
impl Add<Duration> for PlainDateTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add_signed(rhs)
            .unwrap_or_else(|| panic!("`PlainDateTime + Duration` overflowed"))
    }
}

/// Panics when the result leaves the supported year range; use
/// [`PlainDateTime::checked_sub_signed`] to handle that case.
impl Sub<Duration> for PlainDateTime {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.checked_sub_signed(rhs)
            .unwrap_or_else(|| panic!("`PlainDateTime - Duration` overflowed"))
    }
}

impl fmt::Display for PlainDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.isoformat())
    }
}

impl fmt::Debug for PlainDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainDateTime")
            .field("local", &format_args!("{}", self.local))
            .field("tzinfo", &self.tzinfo)
            .field("fold", &u8::from(self.fold))
            .finish()
    }
}

impl FromStr for PlainDateTime {
    type Err = Error;

    /// Parses RFC 3339 (offset becomes a [`FixedOffset`] provider) or a
    /// naive `YYYY-MM-DDTHH:MM:SS[.f]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(stamped) = DateTime::parse_from_rfc3339(s) {
            let offset = *stamped.offset();
            return Ok(Self::from_naive(
                stamped.naive_local(),
                Some(SharedTz::new(offset)),
                Fold::Earlier,
            )?);
        }
        let local = NaiveDateTime::from_str(s)?;
        Ok(Self::from_naive(local, None, Fold::Earlier)?)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
macro_rules! impl_iso_serde {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let raw = String::deserialize(deserializer)?;
                    raw.parse().map_err(de::Error::custom)
                }
            }
        )+
    };
}

#[cfg(feature = "serde")]
impl_iso_serde!(PlainTime, PlainDateTime);

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tzinfo::UnknownOffset;
    use std::collections::hash_map::DefaultHasher;

    fn utc() -> Option<SharedTz> {
        Some(SharedTz::new(Utc))
    }

    fn east(hours: i32) -> Option<SharedTz> {
        Some(SharedTz::new(FixedOffset::east_opt(hours * 3600).unwrap()))
    }

    /// Offset -04:00 until 2024-11-03T01:00, -05:00 from 02:00, with the
    /// hour in between read twice.
    #[derive(Debug)]
    struct FallBack;

    impl TzInfo for FallBack {
        fn utc_offset(&self, query: OffsetQuery) -> Option<FixedOffset> {
            let OffsetQuery::Wall { local, fold } = query else {
                return None;
            };
            let day = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
            let repeated_from = day.and_hms_opt(1, 0, 0).unwrap();
            let repeated_to = day.and_hms_opt(2, 0, 0).unwrap();
            let hours = if local < repeated_from {
                -4
            } else if local < repeated_to {
                match fold {
                    Fold::Earlier => -4,
                    Fold::Later => -5,
                }
            } else {
                -5
            };
            FixedOffset::east_opt(hours * 3600)
        }
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn date_rejects_out_of_range_fields() {
        assert!(new_date(2024, 2, 29).is_ok());
        assert_eq!(
            new_date(0, 1, 1),
            Err(ConstructionError::YearOutOfRange(0))
        );
        assert_eq!(
            new_date(2024, 13, 1),
            Err(ConstructionError::MonthOutOfRange(13))
        );
        assert_eq!(
            new_date(2023, 2, 29),
            Err(ConstructionError::DayOutOfRange {
                year: 2023,
                month: 2,
                day: 29
            })
        );
    }

    #[test]
    fn time_rejects_out_of_range_fields() {
        let err = |h, m, s, us| PlainTime::new(h, m, s, us, None, Fold::Earlier).unwrap_err();
        assert_eq!(err(24, 0, 0, 0), ConstructionError::HourOutOfRange(24));
        assert_eq!(err(0, 60, 0, 0), ConstructionError::MinuteOutOfRange(60));
        assert_eq!(err(0, 0, 60, 0), ConstructionError::SecondOutOfRange(60));
        assert_eq!(
            err(0, 0, 0, 1_000_000),
            ConstructionError::MicrosecondOutOfRange(1_000_000)
        );
    }

    #[test]
    fn fold_accepts_only_zero_and_one() {
        assert_eq!(Fold::try_from(0u8), Ok(Fold::Earlier));
        assert_eq!(Fold::try_from(1u8), Ok(Fold::Later));
        assert_eq!(Fold::try_from(2u8), Err(ConstructionError::InvalidFold(2)));
    }

    #[test]
    fn datetime_fields_roundtrip() {
        let dt = PlainDateTime::new(2024, 1, 2, 13, 4, 5, 678, utc(), Fold::Later).unwrap();
        assert_eq!(
            (dt.year(), dt.month(), dt.day()),
            (2024, 1, 2)
        );
        assert_eq!(
            (dt.hour(), dt.minute(), dt.second(), dt.microsecond()),
            (13, 4, 5, 678)
        );
        assert_eq!(dt.fold(), Fold::Later);
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(dt.time().tzinfo().is_none());
        assert!(dt.timetz().tzinfo().is_some());
    }

    #[test]
    fn from_naive_truncates_to_microseconds() {
        let local = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_nano_opt(0, 0, 0, 1_234_567)
            .unwrap();
        let dt = PlainDateTime::from_naive(local, None, Fold::Earlier).unwrap();
        assert_eq!(dt.microsecond(), 1_234);
    }

    #[test]
    fn aware_values_compare_as_instants() {
        let noon_utc = PlainDateTime::new(2024, 1, 1, 12, 0, 0, 0, utc(), Fold::Earlier).unwrap();
        let two_pm_east =
            PlainDateTime::new(2024, 1, 1, 14, 0, 0, 0, east(2), Fold::Earlier).unwrap();
        assert_eq!(noon_utc, two_pm_east);
        assert_eq!(hash_of(&noon_utc), hash_of(&two_pm_east));
        assert_eq!(
            noon_utc.signed_duration_since(&two_pm_east),
            Some(Duration::zero())
        );
    }

    #[test]
    fn later_fold_never_equals_another_provider() {
        let fall_back = Some(SharedTz::new(FallBack));
        let later =
            PlainDateTime::new(2024, 11, 3, 1, 30, 0, 0, fall_back.clone(), Fold::Later).unwrap();
        let earlier = later.with_fold(Fold::Earlier);
        assert_eq!(later.utcoffset(), FixedOffset::east_opt(-5 * 3600));

        // same instant, other provider
        let same_instant = PlainDateTime::new(2024, 11, 3, 6, 30, 0, 0, utc(), Fold::Earlier).unwrap();
        assert_ne!(later, same_instant);
        assert_eq!(later.partial_cmp(&same_instant), None);
        let after = PlainDateTime::new(2024, 11, 3, 7, 0, 0, 0, utc(), Fold::Earlier).unwrap();
        assert!(later < after);

        // one provider compares wall times, fold aside
        assert_eq!(later, earlier);
        assert_eq!(hash_of(&later), hash_of(&earlier));

        let earlier_instant =
            PlainDateTime::new(2024, 11, 3, 5, 30, 0, 0, utc(), Fold::Earlier).unwrap();
        assert_eq!(earlier, earlier_instant);
        assert_eq!(hash_of(&earlier), hash_of(&earlier_instant));

        // outside the repeated hour the later fold changes nothing
        let plain_later =
            PlainDateTime::new(2024, 11, 3, 3, 0, 0, 0, fall_back, Fold::Later).unwrap();
        let plain_instant = PlainDateTime::new(2024, 11, 3, 8, 0, 0, 0, utc(), Fold::Earlier).unwrap();
        assert_eq!(plain_later, plain_instant);
        assert_eq!(hash_of(&plain_later), hash_of(&plain_instant));
    }

    #[test]
    fn naive_and_aware_are_unordered() {
        let naive = PlainDateTime::new(2024, 1, 1, 12, 0, 0, 0, None, Fold::Earlier).unwrap();
        let aware = naive.with_tzinfo(utc());
        assert_ne!(naive, aware);
        assert_eq!(naive.partial_cmp(&aware), None);
        assert_eq!(naive.signed_duration_since(&aware), None);
    }

    #[test]
    fn silent_provider_compares_like_naive() {
        let naive = PlainTime::new(12, 0, 0, 0, None, Fold::Earlier).unwrap();
        let silent = naive.with_tzinfo(Some(SharedTz::new(UnknownOffset)));
        assert_eq!(naive, silent);
    }

    #[test]
    fn time_comparison_uses_offsets() {
        let a = PlainTime::new(12, 0, 0, 0, utc(), Fold::Earlier).unwrap();
        let b = PlainTime::new(13, 0, 0, 0, east(1), Fold::Earlier).unwrap();
        let c = PlainTime::new(12, 30, 0, 0, utc(), Fold::Earlier).unwrap();
        assert_eq!(a, b);
        assert!(a < c);
        assert!(b < c);
    }

    #[test]
    fn arithmetic_keeps_provider() {
        let dt = PlainDateTime::new(2024, 12, 31, 23, 0, 0, 0, utc(), Fold::Earlier).unwrap();
        let next = dt.clone() + Duration::hours(2);
        assert_eq!(next.year(), 2025);
        assert!(next.tzinfo().unwrap().ptr_eq(dt.tzinfo().unwrap()));
        assert_eq!(next.clone() - Duration::hours(2), dt);

        let edge = PlainDateTime::new(9999, 12, 31, 23, 0, 0, 0, None, Fold::Earlier).unwrap();
        assert!(edge.checked_add_signed(Duration::hours(1)).is_none());
        let last = edge.clone() + Duration::minutes(59);
        assert_eq!((last.year(), last.hour(), last.minute()), (9999, 23, 59));
    }

    #[test]
    #[should_panic(expected = "`PlainDateTime + Duration` overflowed")]
    fn adding_past_the_last_year_panics() {
        let edge = PlainDateTime::new(9999, 12, 31, 23, 0, 0, 0, None, Fold::Earlier).unwrap();
        let _ = edge + Duration::hours(1);
    }

    #[test]
    #[should_panic(expected = "`PlainDateTime - Duration` overflowed")]
    fn subtracting_before_the_first_year_panics() {
        let edge = PlainDateTime::new(1, 1, 1, 0, 0, 0, 0, utc(), Fold::Earlier).unwrap();
        let _ = edge - Duration::seconds(1);
    }

    #[test]
    fn astimezone_preserves_the_instant() {
        let dt = PlainDateTime::new(2024, 1, 1, 12, 0, 0, 0, utc(), Fold::Earlier).unwrap();
        let shifted = dt.astimezone(east(5).unwrap()).unwrap();
        assert_eq!(shifted.hour(), 17);
        assert_eq!(shifted, dt);
        assert_eq!(
            dt.astimezone(SharedTz::new(UnknownOffset)),
            Err(ConstructionError::UndefinedOffset)
        );
    }

    #[test]
    fn timestamp_roundtrips_through_utc() {
        let dt = PlainDateTime::from_timestamp(Seconds::new(946_728_000.5), utc()).unwrap();
        assert_eq!(dt.isoformat(), "2000-01-01T12:00:00.500000+00:00");
        assert_eq!(dt.timestamp(), Seconds::new(946_728_000.5));

        let naive = PlainDateTime::utc_from_timestamp(Seconds::new(0.0)).unwrap();
        assert_eq!(naive.isoformat(), "1970-01-01T00:00:00");
        assert!(PlainDateTime::utc_from_timestamp(Seconds::new(f64::NAN)).is_err());
    }

    #[test]
    fn isoformat_and_parse_agree() {
        let dt = PlainDateTime::new(2024, 1, 2, 13, 0, 0, 0, east(1), Fold::Earlier).unwrap();
        let text = dt.to_string();
        assert_eq!(text, "2024-01-02T13:00:00+01:00");
        let parsed: PlainDateTime = text.parse().unwrap();
        assert_eq!(parsed, dt);
        assert_eq!(parsed.utcoffset(), dt.utcoffset());

        let naive: PlainDateTime = "2024-01-02T13:00:00".parse().unwrap();
        assert!(naive.tzinfo().is_none());

        let t: PlainTime = "12:00:00Z".parse().unwrap();
        assert_eq!(t.utcoffset(), Some(Utc.fix()));
        let t: PlainTime = "12:00:00.000250".parse().unwrap();
        assert_eq!(t.microsecond(), 250);
        assert!(t.tzinfo().is_none());

        assert!("not a time".parse::<PlainTime>().is_err());
    }
}
