// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The calendar-date tag.

use chrono::{Duration, NaiveDate};
use std::fmt;
use std::ops::{Add, Deref, Sub};
use std::str::FromStr;

use crate::error::{ConstructionError, Error};
use crate::primitive::{self, check_date, PlainDate};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A calendar date with no time-of-day.
///
/// Layout-identical to [`PlainDate`].  Unlike the primitive, the tag's
/// instance check rejects date+time values (see
/// [`InstanceCheck`](crate::InstanceCheck)).
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    inner: PlainDate,
}

impl Date {
    /// Build a date; fields are validated by the primitive.
    #[inline]
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ConstructionError> {
        primitive::new_date(year, month, day).map(Self::from)
    }

    /// Today's date in the system timezone.
    #[inline]
    pub fn today() -> Self {
        Self::from(primitive::today())
    }

    /// The primitive value.
    #[inline]
    pub const fn into_inner(self) -> PlainDate {
        self.inner
    }

    /// Shift by whole days, `None` outside the supported year range.
    pub fn checked_add_signed(self, rhs: Duration) -> Option<Self> {
        let date = self.inner.checked_add_signed(rhs)?;
        check_date(date).ok().map(Self::from)
    }

    pub fn checked_sub_signed(self, rhs: Duration) -> Option<Self> {
        let date = self.inner.checked_sub_signed(rhs)?;
        check_date(date).ok().map(Self::from)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<PlainDate> for Date {
    #[inline]
    fn from(inner: PlainDate) -> Self {
        Self { inner }
    }
}

impl From<Date> for PlainDate {
    #[inline]
    fn from(date: Date) -> Self {
        date.inner
    }
}

impl Deref for Date {
    type Target = PlainDate;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<PlainDate> for Date {
    #[inline]
    fn as_ref(&self) -> &PlainDate {
        &self.inner
    }
}

impl PartialEq<PlainDate> for Date {
    #[inline]
    fn eq(&self, other: &PlainDate) -> bool {
        self.inner == *other
    }
}

impl primitive::DateLike for Date {
    #[inline]
    fn calendar_date(&self) -> PlainDate {
        self.inner
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

/// Panics when the result leaves the supported year range; use
/// [`Date::checked_add_signed`] to handle that case.
impl Add<Duration> for Date {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add_signed(rhs)
            .unwrap_or_else(|| panic!("`Date + Duration` overflowed"))
    }
}

/// Panics when the result leaves the supported year range; use
/// [`Date::checked_sub_signed`] to handle that case.
impl Sub<Duration> for Date {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.checked_sub_signed(rhs)
            .unwrap_or_else(|| panic!("`Date - Duration` overflowed"))
    }
}

impl Sub for Date {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.inner - rhs.inner
    }
}

// ── Display / parsing ─────────────────────────────────────────────────────

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({})", self.inner)
    }
}

impl FromStr for Date {
    type Err = Error;

    /// Parses `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::from_str(s)?;
        Ok(Self::from(check_date(date)?))
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn construction_matches_primitive() {
        let tagged = Date::new(2024, 1, 1).unwrap();
        let plain = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(tagged, plain);
        assert_eq!(tagged.into_inner(), plain);
        assert_eq!(tagged.year(), 2024);
        assert_eq!(tagged.weekday(), plain.weekday());
        assert_eq!(std::mem::size_of::<Date>(), std::mem::size_of::<PlainDate>());
    }

    #[test]
    fn construction_errors_pass_through() {
        assert_eq!(
            Date::new(2024, 2, 30),
            Err(primitive::new_date(2024, 2, 30).unwrap_err())
        );
        assert_eq!(
            Date::new(10_000, 1, 1),
            Err(ConstructionError::YearOutOfRange(10_000))
        );
    }

    #[test]
    fn arithmetic_in_days() {
        let d = Date::new(2024, 2, 28).unwrap();
        let next = d + Duration::days(2);
        assert_eq!(next, Date::new(2024, 3, 1).unwrap());
        assert_eq!(next - d, Duration::days(2));
        assert_eq!(next - Duration::days(2), d);
        assert!(Date::new(9999, 12, 31)
            .unwrap()
            .checked_add_signed(Duration::days(1))
            .is_none());
    }

    #[test]
    #[should_panic(expected = "`Date + Duration` overflowed")]
    fn adding_past_the_last_year_panics() {
        let _ = Date::new(9999, 12, 31).unwrap() + Duration::days(1);
    }

    #[test]
    #[should_panic(expected = "`Date - Duration` overflowed")]
    fn subtracting_before_the_first_year_panics() {
        let _ = Date::new(1, 1, 1).unwrap() - Duration::days(1);
    }

    #[test]
    fn operators_reach_both_edges() {
        let last = Date::new(9999, 12, 31).unwrap();
        assert_eq!(Date::new(9999, 12, 30).unwrap() + Duration::days(1), last);
        assert_eq!(last.to_string().parse::<Date>().unwrap(), last);

        let first = Date::new(1, 1, 1).unwrap();
        assert_eq!(Date::new(1, 1, 2).unwrap() - Duration::days(1), first);
        assert!(first.checked_sub_signed(Duration::days(1)).is_none());
    }

    #[test]
    fn parse_and_display() {
        let d: Date = "2024-01-01".parse().unwrap();
        assert_eq!(d.to_string(), "2024-01-01");
        assert_eq!(format!("{d:?}"), "Date(2024-01-01)");
        assert!("2024-01-01T00:00:00".parse::<Date>().is_err());
    }
}
