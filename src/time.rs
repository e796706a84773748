// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The time-of-day tag.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;
use std::str::FromStr;

use crate::error::{ConstructionError, Error};
use crate::params::{Aware, AnyTz, Naive, NoTz, TzArg, TzParam};
use crate::primitive::{Fold, PlainTime};
use crate::tzinfo::TzInfo;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A time-of-day whose offset-provider state is tracked by `Z`.
///
/// Layout-identical to [`PlainTime`]: the parameter lives in a zero-sized
/// `PhantomData`.  Every [`PlainTime`] accessor is reachable through
/// `Deref`; the inherent methods below shadow the ones whose result
/// parameter changes.
#[repr(transparent)]
pub struct Time<Z: TzParam = AnyTz> {
    inner: PlainTime,
    _tz: PhantomData<fn() -> Z>,
}

/// A time-of-day without a reported offset.
pub type NaiveTime = Time<Naive>;

/// A time-of-day with a reported offset.
pub type AwareTime = Time<Aware>;

impl Time {
    // ── constructors ──────────────────────────────────────────────────

    /// Build a time-of-day with no provider.
    pub fn new(
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
    ) -> Result<NaiveTime, ConstructionError> {
        Self::with_tz(hour, minute, second, microsecond, NoTz, Fold::Earlier)
    }

    /// Build a time-of-day; the result parameter follows `tzinfo`.
    pub fn with_tz<T: TzArg>(
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        tzinfo: T,
        fold: Fold,
    ) -> Result<Time<T::Param>, ConstructionError> {
        PlainTime::new(hour, minute, second, microsecond, tzinfo.into_tzinfo(), fold)
            .map(Time::retag)
    }
}

impl<Z: TzParam> Time<Z> {
    #[inline]
    pub(crate) fn retag(inner: PlainTime) -> Self {
        Self {
            inner,
            _tz: PhantomData,
        }
    }

    /// The primitive value.
    #[inline]
    pub fn into_inner(self) -> PlainTime {
        self.inner
    }

    /// Forget what is known about the provider.
    #[inline]
    pub fn widen(self) -> Time {
        Time::retag(self.inner)
    }

    /// Re-parametrize without looking at the value.  Use
    /// [`as_naive`](crate::as_naive) or [`as_aware`](crate::as_aware) when
    /// the claim has to hold.
    #[inline]
    pub fn retag_unchecked<Y: TzParam>(self) -> Time<Y> {
        Time::retag(self.inner)
    }

    // ── field replacement ─────────────────────────────────────────────

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
    pub fn with_tzinfo<T: TzArg>(&self, tzinfo: T) -> Time<T::Param> {
        Time::retag(self.inner.with_tzinfo(tzinfo.into_tzinfo()))
    }

    /// Same wall-clock reading with the provider dropped.
    pub fn without_tzinfo(&self) -> NaiveTime {
        self.with_tzinfo(NoTz)
    }
}

impl<T: TzInfo> Time<T> {
    /// Forget the concrete provider type, keeping awareness.
    #[inline]
    pub fn into_aware(self) -> AwareTime {
        Time::retag(self.inner)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<PlainTime> for Time {
    #[inline]
    fn from(inner: PlainTime) -> Self {
        Self::retag(inner)
    }
}

impl<Z: TzParam> From<Time<Z>> for PlainTime {
    #[inline]
    fn from(time: Time<Z>) -> Self {
        time.inner
    }
}

impl<Z: TzParam> Deref for Time<Z> {
    type Target = PlainTime;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<Z: TzParam> AsRef<PlainTime> for Time<Z> {
    #[inline]
    fn as_ref(&self) -> &PlainTime {
        &self.inner
    }
}

// ── Primitive behaviour, unchanged ────────────────────────────────────────

impl<Z: TzParam> Clone for Time<Z> {
    fn clone(&self) -> Self {
        Self::retag(self.inner.clone())
    }
}

impl<Z: TzParam> PartialEq for Time<Z> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Z: TzParam> PartialEq<PlainTime> for Time<Z> {
    #[inline]
    fn eq(&self, other: &PlainTime) -> bool {
        self.inner == *other
    }
}

impl<Z: TzParam> Eq for Time<Z> {}

impl<Z: TzParam> PartialOrd for Time<Z> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl<Z: TzParam> Hash for Time<Z> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<Z: TzParam> fmt::Display for Time<Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<Z: TzParam> fmt::Debug for Time<Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time<{}>({:?})", Z::label(), self.inner)
    }
}

/// Parsing does not check `Z`; narrow with [`as_naive`](crate::as_naive)
/// or [`as_aware`](crate::as_aware) when the claim matters.
impl<Z: TzParam> FromStr for Time<Z> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlainTime::from_str(s).map(Self::retag)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl<Z: TzParam> Serialize for Time<Z> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, Z: TzParam> Deserialize<'de> for Time<Z> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        PlainTime::deserialize(deserializer).map(Self::retag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tzinfo::SharedTz;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn naive_construction_matches_primitive() {
        let tagged: NaiveTime = Time::new(12, 0, 0, 0).unwrap();
        let plain = PlainTime::new(12, 0, 0, 0, None, Fold::Earlier).unwrap();
        assert_eq!(tagged, plain);
        assert_eq!(tagged.hour(), 12);
        assert!(tagged.tzinfo().is_none());
        assert_eq!(std::mem::size_of::<NaiveTime>(), std::mem::size_of::<PlainTime>());
    }

    #[test]
    fn provider_argument_picks_the_parameter() {
        let utc: Time<Utc> = Time::with_tz(12, 0, 0, 0, Utc, Fold::Earlier).unwrap();
        assert!(utc.tzinfo().is_some_and(|tz| tz.is::<Utc>()));

        let shared: AwareTime =
            Time::with_tz(12, 0, 0, 0, SharedTz::new(Utc), Fold::Earlier).unwrap();
        assert_eq!(shared, utc.clone().into_aware());

        let unknown: Time = Time::with_tz(12, 0, 0, 0, None::<SharedTz>, Fold::Earlier).unwrap();
        assert!(unknown.tzinfo().is_none());

        let explicit_none: NaiveTime = Time::with_tz(12, 0, 0, 0, NoTz, Fold::Earlier).unwrap();
        assert_eq!(explicit_none, unknown.into_inner());
    }

    #[test]
    fn construction_errors_pass_through() {
        assert_eq!(
            Time::new(25, 0, 0, 0),
            Err(ConstructionError::HourOutOfRange(25))
        );
    }

    #[test]
    fn replacement_rederives_the_parameter() {
        let naive = Time::new(9, 30, 0, 0).unwrap();
        let east: Time<FixedOffset> = naive.with_tzinfo(FixedOffset::east_opt(3600).unwrap());
        assert_eq!(east.utcoffset(), FixedOffset::east_opt(3600));
        let back: NaiveTime = east.without_tzinfo();
        assert_eq!(back, naive);

        let later = east.with_minute(45).unwrap();
        assert_eq!(later.minute(), 45);
        assert!(later.tzinfo().is_some());
        assert!(east.with_second(61).is_err());

        let claimed: Time<Utc> = back.retag_unchecked();
        assert!(claimed.tzinfo().is_none());
    }

    #[test]
    fn debug_names_the_parameter() {
        let t = Time::new(12, 0, 0, 0).unwrap();
        assert!(format!("{t:?}").starts_with("Time<Naive>("));
        assert_eq!(t.to_string(), "12:00:00");
    }
}
