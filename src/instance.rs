// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Runtime instance checks against tags.
//!
//! A tag's parameter is erased at runtime, so "is this value a `T`?" can
//! only be answered from what the value itself carries: which primitive it
//! is, and its own offset-provider.  Two pieces do that:
//!
//! - [`Inspect`] reflects any value into a [`PrimitiveRef`], or into
//!   nothing for `None` and foreign values.
//! - [`InstanceCheck`] is implemented by every tag and decides membership
//!   from a [`PrimitiveRef`].
//!
//! The calendar-date check is asymmetric: a date+time is a
//! date instance (it exposes a calendar date), yet [`Date::matches`]
//! rejects it.
//!
//! ```
//! use chronotag::{isinstance, Date, DateTime, InstanceCheck};
//!
//! let day = Date::new(2024, 1, 1).unwrap();
//! let moment = DateTime::new(2024, 1, 2, 13, 0, 0, 0).unwrap();
//! assert!(Date::matches(&day));
//! assert!(!Date::matches(&moment));
//! assert!(isinstance::<DateTime, _>(&moment));
//! assert!(Date::matches(&moment.date()));
//! ```

use chrono::{FixedOffset, Local, Utc};
use std::any::Any;

use crate::date::Date;
use crate::datetime::DateTime;
use crate::params::{AnyTz, Aware, Naive, TzParam};
use crate::primitive::{DateLike, PlainDate, PlainDateTime, PlainTime};
use crate::time::Time;
use crate::tzinfo::UnknownOffset;

// ═══════════════════════════════════════════════════════════════════════════
// Reflection
// ═══════════════════════════════════════════════════════════════════════════

/// A borrowed view of a primitive runtime value.
#[derive(Debug, Clone, Copy)]
pub enum PrimitiveRef<'a> {
    Date(&'a PlainDate),
    Time(&'a PlainTime),
    DateTime(&'a PlainDateTime),
}

impl PrimitiveRef<'_> {
    /// The calendar date exposed by a date instance.
    pub fn calendar_date(&self) -> Option<PlainDate> {
        match self {
            PrimitiveRef::Date(date) => Some(date.calendar_date()),
            PrimitiveRef::DateTime(datetime) => Some(datetime.calendar_date()),
            PrimitiveRef::Time(_) => None,
        }
    }

    /// Runtime instance of the calendar-date primitive, date+time included.
    #[inline]
    pub fn is_date_instance(&self) -> bool {
        self.calendar_date().is_some()
    }

    /// Runtime instance of the time-of-day primitive.
    #[inline]
    pub fn is_time_instance(&self) -> bool {
        matches!(self, PrimitiveRef::Time(_))
    }

    /// Runtime instance of the date+time primitive.
    #[inline]
    pub fn is_datetime_instance(&self) -> bool {
        matches!(self, PrimitiveRef::DateTime(_))
    }
}

/// Reflect a value into the primitive it is at runtime.
pub trait Inspect {
    fn inspect(&self) -> Option<PrimitiveRef<'_>>;
}

impl Inspect for PlainDate {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        Some(PrimitiveRef::Date(self))
    }
}

impl Inspect for PlainTime {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        Some(PrimitiveRef::Time(self))
    }
}

impl Inspect for PlainDateTime {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        Some(PrimitiveRef::DateTime(self))
    }
}

impl Inspect for Date {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        Some(PrimitiveRef::Date(self.as_ref()))
    }
}

impl<Z: TzParam> Inspect for Time<Z> {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        Some(PrimitiveRef::Time(self.as_ref()))
    }
}

impl<Z: TzParam> Inspect for DateTime<Z> {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        Some(PrimitiveRef::DateTime(self.as_ref()))
    }
}

impl<V: Inspect> Inspect for Option<V> {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        self.as_ref()?.inspect()
    }
}

impl<V: Inspect + ?Sized> Inspect for &V {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        (**self).inspect()
    }
}

impl<V: Inspect + ?Sized> Inspect for Box<V> {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        (**self).inspect()
    }
}

/// Try `$value` as each tag parametrization in the list.
macro_rules! downcast_tags {
    ($value:expr, $($param:ty),+ $(,)?) => {
        $(
            if let Some(time) = $value.downcast_ref::<Time<$param>>() {
                return time.inspect();
            }
            if let Some(datetime) = $value.downcast_ref::<DateTime<$param>>() {
                return datetime.inspect();
            }
        )+
    };
}

/// Type-erased values are recognised when they are primitives, [`Date`],
/// or a `Time`/`DateTime` parametrized by one of this crate's markers or
/// built-in providers (`AnyTz`, `Naive`, `Aware`, `Utc`, `FixedOffset`,
/// `Local`, `UnknownOffset`).
///
/// A tag parametrized by a user-defined [`TzInfo`](crate::TzInfo) has its
/// own `TypeId` and reflects as nothing once erased; call
/// [`widen`](DateTime::widen) before erasing it.
impl Inspect for dyn Any {
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        if let Some(date) = self.downcast_ref::<PlainDate>() {
            return Some(PrimitiveRef::Date(date));
        }
        if let Some(time) = self.downcast_ref::<PlainTime>() {
            return Some(PrimitiveRef::Time(time));
        }
        if let Some(datetime) = self.downcast_ref::<PlainDateTime>() {
            return Some(PrimitiveRef::DateTime(datetime));
        }
        if let Some(date) = self.downcast_ref::<Date>() {
            return date.inspect();
        }
        downcast_tags!(self, AnyTz, Naive, Aware, Utc, FixedOffset, Local, UnknownOffset);
        None
    }
}

impl Inspect for dyn Any + Send + Sync {
    #[inline]
    fn inspect(&self) -> Option<PrimitiveRef<'_>> {
        (self as &dyn Any).inspect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// InstanceCheck — the per-tag hook
// ═══════════════════════════════════════════════════════════════════════════

/// Membership test of a tag, decided from a value's runtime state only.
pub trait InstanceCheck {
    /// Whether `value` belongs to the tag.
    fn check(value: PrimitiveRef<'_>) -> bool;

    /// Whether `candidate` is an instance of the tag.  Never fails: `None`
    /// and foreign values are simply not instances.
    #[inline]
    fn matches<V: Inspect + ?Sized>(candidate: &V) -> bool {
        candidate.inspect().is_some_and(Self::check)
    }
}

impl InstanceCheck for Date {
    /// A date instance that is not also a date+time instance.
    #[inline]
    fn check(value: PrimitiveRef<'_>) -> bool {
        value.is_date_instance() && !value.is_datetime_instance()
    }
}

/// Any parametrization: `Z` is not recoverable from the value.
impl<Z: TzParam> InstanceCheck for Time<Z> {
    #[inline]
    fn check(value: PrimitiveRef<'_>) -> bool {
        value.is_time_instance()
    }
}

/// Any parametrization: `Z` is not recoverable from the value.
impl<Z: TzParam> InstanceCheck for DateTime<Z> {
    #[inline]
    fn check(value: PrimitiveRef<'_>) -> bool {
        value.is_datetime_instance()
    }
}

/// `isinstance(candidate, T)`, routed through `T`'s [`InstanceCheck`].
#[inline]
pub fn isinstance<T: InstanceCheck, V: Inspect + ?Sized>(candidate: &V) -> bool {
    T::matches(candidate)
}

/// Offset-state admission of a tag's parameter.
pub trait TzAdmission {
    fn admits(value: PrimitiveRef<'_>) -> bool;
}

impl TzAdmission for Date {
    #[inline]
    fn admits(_value: PrimitiveRef<'_>) -> bool {
        true
    }
}

impl<Z: TzParam> TzAdmission for Time<Z> {
    fn admits(value: PrimitiveRef<'_>) -> bool {
        match value {
            PrimitiveRef::Time(time) => Z::admits(time.tzinfo(), time.utcoffset()),
            _ => false,
        }
    }
}

impl<Z: TzParam> TzAdmission for DateTime<Z> {
    fn admits(value: PrimitiveRef<'_>) -> bool {
        match value {
            PrimitiveRef::DateTime(datetime) => Z::admits(datetime.tzinfo(), datetime.utcoffset()),
            _ => false,
        }
    }
}

/// [`isinstance`] refined by the parameter: a `Time<Naive>` conforms only
/// when the value is naive, a `DateTime<Utc>` only when it reports an
/// offset through a [`chrono::Utc`] provider, and so on.
pub fn conforms<T, V>(candidate: &V) -> bool
where
    T: InstanceCheck + TzAdmission,
    V: Inspect + ?Sized,
{
    candidate
        .inspect()
        .is_some_and(|value| T::check(value) && T::admits(value))
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
