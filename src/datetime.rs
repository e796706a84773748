// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The date+time tag.
//!
//! [`DateTime<Z>`] wraps a [`PlainDateTime`] and records in `Z` what is
//! known about its offset-provider.  Construction infers `Z` from the
//! provider argument, and every operation that can attach, replace or drop
//! the provider re-derives it:
//!
//! | Operation | Result |
//! |-----------|--------|
//! | [`DateTime::new`] | `DateTime<Naive>` |
//! | [`DateTime::with_tz(…, tz, …)`](DateTime::with_tz) | `DateTime<<T as TzArg>::Param>` |
//! | [`date`](DateTime::date) | [`Date`] |
//! | [`time`](DateTime::time) | `Time<Naive>` |
//! | [`timetz`](DateTime::timetz) | `Time<Z>` |
//! | [`with_tzinfo(tz)`](DateTime::with_tzinfo) | `DateTime<<T as TzArg>::Param>` |
//! | [`astimezone(tz)`](DateTime::astimezone) | `DateTime<T>` |
//! | `+`/`-` a `chrono::Duration`, `with_<field>` | `DateTime<Z>` |

use chrono::{Duration, Local};
use qtty::Seconds;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, Deref, Sub};
use std::str::FromStr;

use crate::date::Date;
use crate::error::{ConstructionError, Error};
use crate::params::{Aware, AnyTz, Naive, NoTz, TzArg, TzParam};
use crate::primitive::{DateLike, Fold, PlainDate, PlainDateTime};
use crate::time::{NaiveTime, Time};
use crate::tzinfo::{SharedTz, TzInfo};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A date and time-of-day whose offset-provider state is tracked by `Z`.
///
/// Layout-identical to [`PlainDateTime`].  Ordering is only defined between
/// values of the same `Z`.
#[repr(transparent)]
pub struct DateTime<Z: TzParam = AnyTz> {
    inner: PlainDateTime,
    _tz: PhantomData<fn() -> Z>,
}

/// A date+time without a reported offset.
pub type NaiveDateTime = DateTime<Naive>;

/// A date+time with a reported offset.
pub type AwareDateTime = DateTime<Aware>;

impl DateTime {
    // ── constructors ──────────────────────────────────────────────────

    /// Build a date+time with no provider.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
    ) -> Result<NaiveDateTime, ConstructionError> {
        Self::with_tz(
            year,
            month,
            day,
            hour,
            minute,
            second,
            microsecond,
            NoTz,
            Fold::Earlier,
        )
    }

    /// Build a date+time; the result parameter follows `tzinfo`.
    #[allow(clippy::too_many_arguments)]
    pub fn with_tz<T: TzArg>(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        tzinfo: T,
        fold: Fold,
    ) -> Result<DateTime<T::Param>, ConstructionError> {
        PlainDateTime::new(
            year,
            month,
            day,
            hour,
            minute,
            second,
            microsecond,
            tzinfo.into_tzinfo(),
            fold,
        )
        .map(DateTime::retag)
    }

    /// Join a date and a time-of-day; the parameter is the time's.
    pub fn combine<Y: TzParam>(date: Date, time: &Time<Y>) -> Result<DateTime<Y>, ConstructionError> {
        PlainDateTime::combine(date.into_inner(), time).map(DateTime::retag)
    }

    /// Join a date and a time-of-day under `tzinfo`, ignoring the time's
    /// own provider.
    pub fn combine_with_tz<Y: TzParam, T: TzArg>(
        date: Date,
        time: &Time<Y>,
        tzinfo: T,
    ) -> Result<DateTime<T::Param>, ConstructionError> {
        let time = time.with_tzinfo(tzinfo);
        PlainDateTime::combine(date.into_inner(), &time).map(DateTime::retag)
    }

    /// The current moment, as wall time of `tzinfo` (system-local wall
    /// time for [`NoTz`]).
    pub fn now<T: TzArg>(tzinfo: T) -> Result<DateTime<T::Param>, ConstructionError> {
        PlainDateTime::now(tzinfo.into_tzinfo()).map(DateTime::retag)
    }

    /// The current UTC wall time, naive.
    pub fn utcnow() -> Result<NaiveDateTime, ConstructionError> {
        PlainDateTime::utcnow().map(DateTime::retag)
    }

    /// The moment `timestamp` seconds after the Unix epoch, as wall time of
    /// `tzinfo` (system-local wall time for [`NoTz`]).
    pub fn fromtimestamp<T: TzArg>(
        timestamp: Seconds,
        tzinfo: T,
    ) -> Result<DateTime<T::Param>, ConstructionError> {
        PlainDateTime::from_timestamp(timestamp, tzinfo.into_tzinfo()).map(DateTime::retag)
    }

    /// The UTC wall time `timestamp` seconds after the Unix epoch, naive.
    pub fn utcfromtimestamp(timestamp: Seconds) -> Result<NaiveDateTime, ConstructionError> {
        PlainDateTime::utc_from_timestamp(timestamp).map(DateTime::retag)
    }
}

impl<Z: TzParam> DateTime<Z> {
    #[inline]
    pub(crate) fn retag(inner: PlainDateTime) -> Self {
        Self {
            inner,
            _tz: PhantomData,
        }
    }

    /// The primitive value.
    #[inline]
    pub fn into_inner(self) -> PlainDateTime {
        self.inner
    }

    /// Forget what is known about the provider.
    #[inline]
    pub fn widen(self) -> DateTime {
        DateTime::retag(self.inner)
    }

    /// Re-parametrize without looking at the value.  Use
    /// [`as_naive`](crate::as_naive) or [`as_aware`](crate::as_aware) when
    /// the claim has to hold.
    #[inline]
    pub fn retag_unchecked<Y: TzParam>(self) -> DateTime<Y> {
        DateTime::retag(self.inner)
    }

    // ── derived values ────────────────────────────────────────────────

    /// The calendar-date portion.
    #[inline]
    pub fn date(&self) -> Date {
        Date::from(self.inner.date())
    }

    /// The time-of-day portion, without the provider.
    #[inline]
    pub fn time(&self) -> NaiveTime {
        Time::retag(self.inner.time())
    }

    /// The time-of-day portion, keeping the provider.
    #[inline]
    pub fn timetz(&self) -> Time<Z> {
        Time::retag(self.inner.timetz())
    }

    // ── field replacement ─────────────────────────────────────────────

    pub fn with_year(&self, year: i32) -> Result<Self, ConstructionError> {
        self.inner.with_year(year).map(Self::retag)
    }

    pub fn with_month(&self, month: u32) -> Result<Self, ConstructionError> {
        self.inner.with_month(month).map(Self::retag)
    }

    pub fn with_day(&self, day: u32) -> Result<Self, ConstructionError> {
        self.inner.with_day(day).map(Self::retag)
    }

    pub fn with_hour(&self, hour: u32) -> Result<Self, ConstructionError> {
        self.inner.with_hour(hour).map(Self::retag)
    }

    pub fn with_minute(&self, minute: u32) -> Result<Self, ConstructionError> {
        self.inner.with_minute(minute).map(Self::retag)
    }

    pub fn with_second(&self, second: u32) -> Result<Self, ConstructionError> {
        self.inner.with_second(second).map(Self::retag)
    }

    pub fn with_microsecond(&self, microsecond: u32) -> Result<Self, ConstructionError> {
        self.inner.with_microsecond(microsecond).map(Self::retag)
    }

    pub fn with_fold(&self, fold: Fold) -> Self {
        Self::retag(self.inner.with_fold(fold))
    }

    /// Same wall-clock reading under another provider.
    pub fn with_tzinfo<T: TzArg>(&self, tzinfo: T) -> DateTime<T::Param> {
        DateTime::retag(self.inner.with_tzinfo(tzinfo.into_tzinfo()))
    }

    /// Same wall-clock reading with the provider dropped.
    pub fn without_tzinfo(&self) -> NaiveDateTime {
        self.with_tzinfo(NoTz)
    }

    // ── provider shifts ───────────────────────────────────────────────

    /// The same instant as wall time of `tzinfo`.
    ///
    /// A naive value is read as system-local wall time first.
    pub fn astimezone<T: TzInfo>(&self, tzinfo: T) -> Result<DateTime<T>, ConstructionError> {
        self.inner
            .astimezone(SharedTz::new(tzinfo))
            .map(DateTime::retag)
    }

    /// [`astimezone`](DateTime::astimezone) for a type-erased provider.
    pub fn astimezone_shared(&self, tzinfo: SharedTz) -> Result<AwareDateTime, ConstructionError> {
        self.inner.astimezone(tzinfo).map(DateTime::retag)
    }

    /// The same instant as system-local wall time.
    pub fn astimezone_local(&self) -> Result<DateTime<Local>, ConstructionError> {
        self.astimezone(Local)
    }

    // ── arithmetic ────────────────────────────────────────────────────

    pub fn checked_add_signed(&self, rhs: Duration) -> Option<Self> {
        self.inner.checked_add_signed(rhs).map(Self::retag)
    }

    pub fn checked_sub_signed(&self, rhs: Duration) -> Option<Self> {
        self.inner.checked_sub_signed(rhs).map(Self::retag)
    }

    /// Elapsed time from `other` to `self`; `None` when their runtime
    /// states are mixed naive and aware.
    #[inline]
    pub fn signed_duration_since(&self, other: &Self) -> Option<Duration> {
        self.inner.signed_duration_since(&other.inner)
    }
}

impl<T: TzInfo> DateTime<T> {
    /// Forget the concrete provider type, keeping awareness.
    #[inline]
    pub fn into_aware(self) -> AwareDateTime {
        DateTime::retag(self.inner)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<PlainDateTime> for DateTime {
    #[inline]
    fn from(inner: PlainDateTime) -> Self {
        Self::retag(inner)
    }
}

impl<Z: TzParam> From<DateTime<Z>> for PlainDateTime {
    #[inline]
    fn from(datetime: DateTime<Z>) -> Self {
        datetime.inner
    }
}

impl<Z: TzParam> Deref for DateTime<Z> {
    type Target = PlainDateTime;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<Z: TzParam> AsRef<PlainDateTime> for DateTime<Z> {
    #[inline]
    fn as_ref(&self) -> &PlainDateTime {
        &self.inner
    }
}

impl<Z: TzParam> DateLike for DateTime<Z> {
    #[inline]
    fn calendar_date(&self) -> PlainDate {
        self.inner.date()
    }
}

// ── Primitive behaviour, unchanged ────────────────────────────────────────

impl<Z: TzParam> Clone for DateTime<Z> {
    fn clone(&self) -> Self {
        Self::retag(self.inner.clone())
    }
}

impl<Z: TzParam> PartialEq for DateTime<Z> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Z: TzParam> PartialEq<PlainDateTime> for DateTime<Z> {
    #[inline]
    fn eq(&self, other: &PlainDateTime) -> bool {
        self.inner == *other
    }
}

impl<Z: TzParam> Eq for DateTime<Z> {}

impl<Z: TzParam> PartialOrd for DateTime<Z> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl<Z: TzParam> Hash for DateTime<Z> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

/// Panics when the result leaves the supported year range, like the
/// primitive's operator.
impl<Z: TzParam> Add<Duration> for DateTime<Z> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        Self::retag(self.inner + rhs)
    }
}

/// Panics when the result leaves the supported year range, like the
/// primitive's operator.
impl<Z: TzParam> Sub<Duration> for DateTime<Z> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        Self::retag(self.inner - rhs)
    }
}

impl<Z: TzParam> fmt::Display for DateTime<Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<Z: TzParam> fmt::Debug for DateTime<Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateTime<{}>({:?})", Z::label(), self.inner)
    }
}

/// Parsing does not check `Z`; narrow with [`as_naive`](crate::as_naive)
/// or [`as_aware`](crate::as_aware) when the claim matters.
impl<Z: TzParam> FromStr for DateTime<Z> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlainDateTime::from_str(s).map(Self::retag)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl<Z: TzParam> Serialize for DateTime<Z> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, Z: TzParam> Deserialize<'de> for DateTime<Z> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        PlainDateTime::deserialize(deserializer).map(Self::retag)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn plus(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn naive_construction_matches_primitive() {
        let tagged: NaiveDateTime = DateTime::new(2024, 1, 2, 13, 0, 0, 0).unwrap();
        let plain = PlainDateTime::new(2024, 1, 2, 13, 0, 0, 0, None, Fold::Earlier).unwrap();
        assert_eq!(tagged, plain);
        assert_eq!(tagged.clone().into_inner(), plain);
        assert_eq!(tagged.isoformat(), plain.isoformat());
        assert_eq!(
            std::mem::size_of::<NaiveDateTime>(),
            std::mem::size_of::<PlainDateTime>()
        );
    }

    #[test]
    fn provider_argument_picks_the_parameter() {
        let utc: DateTime<Utc> =
            DateTime::with_tz(2024, 1, 1, 15, 0, 0, 0, Utc, Fold::Earlier).unwrap();
        let aware: AwareDateTime = utc.clone().into_aware();
        assert_eq!(aware, utc.clone().into_aware());
        assert_eq!(utc.widen().utcoffset(), Some(plus(0)));

        let unknown: DateTime =
            DateTime::with_tz(2024, 1, 1, 15, 0, 0, 0, None::<SharedTz>, Fold::Earlier).unwrap();
        assert!(unknown.tzinfo().is_none());
    }

    #[test]
    fn construction_errors_pass_through() {
        assert_eq!(
            DateTime::new(2024, 4, 31, 0, 0, 0, 0),
            Err(ConstructionError::DayOutOfRange {
                year: 2024,
                month: 4,
                day: 31
            })
        );
        assert_eq!(
            DateTime::with_tz(2024, 1, 1, 0, 0, 0, 1_000_000, Utc, Fold::Earlier),
            Err(ConstructionError::MicrosecondOutOfRange(1_000_000))
        );
    }

    #[test]
    fn derived_values_rederive_their_parameter() {
        let dt: DateTime<FixedOffset> =
            DateTime::with_tz(2024, 1, 2, 13, 30, 0, 0, plus(1), Fold::Earlier).unwrap();

        let date: Date = dt.date();
        assert_eq!(date, Date::new(2024, 1, 2).unwrap());

        let naive_time: NaiveTime = dt.time();
        assert!(naive_time.tzinfo().is_none());

        let aware_time: Time<FixedOffset> = dt.timetz();
        assert_eq!(aware_time.utcoffset(), Some(plus(1)));

        let dropped: NaiveDateTime = dt.without_tzinfo();
        assert_eq!(dropped.naive(), dt.naive());

        let reattached: DateTime<Utc> = dropped.with_tzinfo(Utc);
        assert_eq!(reattached.hour(), 13);
    }

    #[test]
    fn combine_takes_the_time_parameter() {
        let date = Date::new(2024, 1, 1).unwrap();
        let time = Time::with_tz(8, 0, 0, 0, Utc, Fold::Earlier).unwrap();
        let joined: DateTime<Utc> = DateTime::combine(date, &time).unwrap();
        assert_eq!(joined.isoformat(), "2024-01-01T08:00:00+00:00");

        let naive_time = Time::new(8, 0, 0, 0).unwrap();
        let overridden: DateTime<FixedOffset> =
            DateTime::combine_with_tz(date, &naive_time, plus(2)).unwrap();
        assert_eq!(overridden.isoformat(), "2024-01-01T08:00:00+02:00");
    }

    #[test]
    fn astimezone_moves_wall_time_not_instant() {
        let dt = DateTime::with_tz(2024, 6, 1, 12, 0, 0, 0, Utc, Fold::Earlier).unwrap();
        let shifted: DateTime<FixedOffset> = dt.astimezone(plus(-4)).unwrap();
        assert_eq!(shifted.hour(), 8);
        assert_eq!(shifted.clone().widen(), dt.clone().widen());

        let erased: AwareDateTime = dt.astimezone_shared(SharedTz::new(plus(9))).unwrap();
        assert_eq!(erased.hour(), 21);
    }

    #[test]
    fn arithmetic_preserves_parameter() {
        let dt = DateTime::with_tz(2024, 1, 31, 23, 0, 0, 0, Utc, Fold::Earlier).unwrap();
        let next: DateTime<Utc> = dt.clone() + Duration::hours(1);
        assert_eq!((next.month(), next.day(), next.hour()), (2, 1, 0));
        assert_eq!(next.signed_duration_since(&dt), Some(Duration::hours(1)));
        assert!(dt < next);
        assert_eq!(next - Duration::hours(1), dt);

        let edge = DateTime::new(1, 1, 1, 0, 0, 0, 0).unwrap();
        assert!(edge.checked_sub_signed(Duration::seconds(1)).is_none());
    }

    #[test]
    #[should_panic(expected = "overflowed")]
    fn operator_past_the_last_year_panics() {
        let last = DateTime::with_tz(9999, 12, 31, 23, 59, 59, 0, Utc, Fold::Earlier).unwrap();
        let _ = last + Duration::seconds(1);
    }

    #[test]
    #[should_panic(expected = "overflowed")]
    fn operator_before_the_first_year_panics() {
        let _ = DateTime::new(1, 1, 1, 0, 0, 0, 0).unwrap() - Duration::microseconds(1);
    }

    #[test]
    fn timestamps_route_through_the_provider() {
        let at: DateTime<Utc> = DateTime::fromtimestamp(Seconds::new(0.0), Utc).unwrap();
        assert_eq!(at.isoformat(), "1970-01-01T00:00:00+00:00");
        let naive: NaiveDateTime = DateTime::utcfromtimestamp(Seconds::new(86_400.0)).unwrap();
        assert_eq!(naive.isoformat(), "1970-01-02T00:00:00");
        assert!(DateTime::utcnow().unwrap().tzinfo().is_none());
        assert!(DateTime::now(Utc).unwrap().tzinfo().is_some());
    }

    #[test]
    fn parsing_does_not_enforce_the_parameter() {
        let claimed: AwareDateTime = "2024-01-01T12:00:00".parse().unwrap();
        assert!(claimed.utcoffset().is_none());
        let real: AwareDateTime = "2024-01-01T12:00:00+00:00".parse().unwrap();
        assert_eq!(real.utcoffset(), Some(plus(0)));
    }
}
