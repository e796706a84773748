// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Naive/aware classification and narrowing.
//!
//! The reported offset, not the mere presence of a provider, decides:
//! a value whose provider answers "no offset" is naive.  Every call looks
//! at the value afresh; nothing is cached.
//!
//! The narrowing functions are the trusted way from an unparametrized (or
//! freshly deserialized) tag to [`NaiveTime`], [`AwareDateTime`] and
//! friends:
//!
//! ```
//! use chronotag::{as_aware, as_naive, is_naive, DateTime};
//!
//! let parsed: DateTime = "2024-01-02T13:00:00".parse().unwrap();
//! assert!(is_naive(&parsed));
//! assert!(as_aware(parsed.clone()).is_err());
//! let naive = as_naive(parsed).unwrap();
//! assert_eq!(naive.hour(), 13);
//! ```

use chrono::FixedOffset;
use std::fmt::Debug;

use crate::date::Date;
use crate::datetime::{AwareDateTime, DateTime, NaiveDateTime};
use crate::error::{Classification, MismatchError};
use crate::instance::{Inspect, PrimitiveRef};
use crate::params::TzParam;
use crate::primitive::{PlainDateTime, PlainTime};
use crate::time::{AwareTime, NaiveTime, Time};
use crate::tzinfo::SharedTz;

// ═══════════════════════════════════════════════════════════════════════════
// HasTzInfo
// ═══════════════════════════════════════════════════════════════════════════

/// Values carrying an offset-provider field: time-of-day and date+time.
///
/// Calendar dates have no such field and do not implement
/// this trait.
pub trait HasTzInfo {
    fn tzinfo(&self) -> Option<&SharedTz>;

    /// The provider's offset for this very value.
    fn utcoffset(&self) -> Option<FixedOffset>;
}

impl HasTzInfo for PlainTime {
    #[inline]
    fn tzinfo(&self) -> Option<&SharedTz> {
        PlainTime::tzinfo(self)
    }

    #[inline]
    fn utcoffset(&self) -> Option<FixedOffset> {
        PlainTime::utcoffset(self)
    }
}

impl HasTzInfo for PlainDateTime {
    #[inline]
    fn tzinfo(&self) -> Option<&SharedTz> {
        PlainDateTime::tzinfo(self)
    }

    #[inline]
    fn utcoffset(&self) -> Option<FixedOffset> {
        PlainDateTime::utcoffset(self)
    }
}

impl<Z: TzParam> HasTzInfo for Time<Z> {
    #[inline]
    fn tzinfo(&self) -> Option<&SharedTz> {
        PlainTime::tzinfo(self)
    }

    #[inline]
    fn utcoffset(&self) -> Option<FixedOffset> {
        PlainTime::utcoffset(self)
    }
}

impl<Z: TzParam> HasTzInfo for DateTime<Z> {
    #[inline]
    fn tzinfo(&self) -> Option<&SharedTz> {
        PlainDateTime::tzinfo(self)
    }

    #[inline]
    fn utcoffset(&self) -> Option<FixedOffset> {
        PlainDateTime::utcoffset(self)
    }
}

impl<V: HasTzInfo + ?Sized> HasTzInfo for &V {
    #[inline]
    fn tzinfo(&self) -> Option<&SharedTz> {
        (**self).tzinfo()
    }

    #[inline]
    fn utcoffset(&self) -> Option<FixedOffset> {
        (**self).utcoffset()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Predicates
// ═══════════════════════════════════════════════════════════════════════════

/// No provider, or a provider that reports no offset for `value`.
#[inline]
pub fn is_naive<V: HasTzInfo + ?Sized>(value: &V) -> bool {
    value.tzinfo().is_none() || value.utcoffset().is_none()
}

/// A provider reporting a concrete offset for `value`.
#[inline]
pub fn is_aware<V: HasTzInfo + ?Sized>(value: &V) -> bool {
    !is_naive(value)
}

// ═══════════════════════════════════════════════════════════════════════════
// Narrowing
// ═══════════════════════════════════════════════════════════════════════════

/// Values that narrow to a naive or aware tag.
pub trait Narrow: HasTzInfo + Debug + Sized {
    type Naive;
    type Aware;

    #[doc(hidden)]
    fn retag_naive(self) -> Self::Naive;

    #[doc(hidden)]
    fn retag_aware(self) -> Self::Aware;
}

impl Narrow for PlainTime {
    type Naive = NaiveTime;
    type Aware = AwareTime;

    fn retag_naive(self) -> NaiveTime {
        Time::retag(self)
    }

    fn retag_aware(self) -> AwareTime {
        Time::retag(self)
    }
}

impl<Z: TzParam> Narrow for Time<Z> {
    type Naive = NaiveTime;
    type Aware = AwareTime;

    fn retag_naive(self) -> NaiveTime {
        Time::retag(self.into_inner())
    }

    fn retag_aware(self) -> AwareTime {
        Time::retag(self.into_inner())
    }
}

impl Narrow for PlainDateTime {
    type Naive = NaiveDateTime;
    type Aware = AwareDateTime;

    fn retag_naive(self) -> NaiveDateTime {
        DateTime::retag(self)
    }

    fn retag_aware(self) -> AwareDateTime {
        DateTime::retag(self)
    }
}

impl<Z: TzParam> Narrow for DateTime<Z> {
    type Naive = NaiveDateTime;
    type Aware = AwareDateTime;

    fn retag_naive(self) -> NaiveDateTime {
        DateTime::retag(self.into_inner())
    }

    fn retag_aware(self) -> AwareDateTime {
        DateTime::retag(self.into_inner())
    }
}

/// Narrow to the naive tag, or hand the value back in the error.
pub fn as_naive<V: Narrow>(value: V) -> Result<V::Naive, MismatchError<V>> {
    if is_naive(&value) {
        Ok(value.retag_naive())
    } else {
        Err(MismatchError::new(Classification::Naive, value))
    }
}

/// Narrow to the aware tag, or hand the value back in the error.
pub fn as_aware<V: Narrow>(value: V) -> Result<V::Aware, MismatchError<V>> {
    if is_aware(&value) {
        Ok(value.retag_aware())
    } else {
        Err(MismatchError::new(Classification::Aware, value))
    }
}

/// Narrow to [`Date`] when the value is exactly a calendar date.
///
/// A date+time is rejected even though it carries a calendar date; take
/// its [`date`](DateTime::date) first if that is what is wanted.
pub fn as_calendar_date<V: Inspect + Debug>(value: V) -> Result<Date, MismatchError<V>> {
    let date = match value.inspect() {
        Some(PrimitiveRef::Date(date)) => Some(*date),
        _ => None,
    };
    match date {
        Some(date) => Ok(Date::from(date)),
        None => Err(MismatchError::new(Classification::CalendarDate, value)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
