// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Offset-providers.
//!
//! A [`TzInfo`] is the object attached to a time-of-day or date+time value
//! that reports its signed offset from UTC, or reports nothing at all.
//! The second case is legal: a provider may exist yet have no defined
//! offset for a particular value, and such a value counts as *naive*.
//!
//! # Built-in providers
//!
//! | Provider | Offset for a date+time | Offset for a bare time-of-day |
//! |----------|------------------------|-------------------------------|
//! | [`chrono::FixedOffset`] | the fixed offset | the fixed offset |
//! | [`chrono::Utc`] | `+00:00` | `+00:00` |
//! | [`chrono::Local`] | system rules, `fold` picks ambiguous wall times | none |
//! | [`UnknownOffset`] | none | none |

use chrono::{Duration, FixedOffset, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::primitive::Fold;

// ═══════════════════════════════════════════════════════════════════════════
// TzInfo trait
// ═══════════════════════════════════════════════════════════════════════════

/// What an offset-provider is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetQuery {
    /// A time-of-day with no calendar date attached.
    TimeOfDay,
    /// A wall-clock date+time, with the fold used to pick between the two
    /// readings of a repeated hour.
    Wall { local: NaiveDateTime, fold: Fold },
}

/// Upcast helper so a `dyn TzInfo` can report its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An offset-from-UTC provider.
///
/// Only [`utc_offset`](TzInfo::utc_offset) is required.  Returning `None`
/// means "no defined offset for this value", which makes the value naive.
pub trait TzInfo: AsAny + fmt::Debug + Send + Sync {
    /// Offset from UTC for the queried value, if defined.
    fn utc_offset(&self, query: OffsetQuery) -> Option<FixedOffset>;

    /// Human-readable zone name.
    fn tz_name(&self, _query: OffsetQuery) -> Option<String> {
        None
    }

    /// Daylight-saving adjustment already included in the offset.
    fn dst(&self, _query: OffsetQuery) -> Option<Duration> {
        None
    }

    /// Offset in effect at the UTC instant `utc`.
    ///
    /// The default treats `utc` as a wall time, which is exact for any
    /// provider whose offset does not vary.
    fn offset_from_utc(&self, utc: &NaiveDateTime) -> Option<FixedOffset> {
        self.utc_offset(OffsetQuery::Wall {
            local: *utc,
            fold: Fold::Earlier,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SharedTz — the type-erased provider handle
// ═══════════════════════════════════════════════════════════════════════════

/// A shared, type-erased offset-provider.
///
/// Primitive values store providers through this handle.  Two values
/// hold "the same provider" when their handles point at the same
/// allocation ([`SharedTz::ptr_eq`]).
#[derive(Clone)]
pub struct SharedTz(Arc<dyn TzInfo>);

impl SharedTz {
    /// Wrap a concrete provider.
    pub fn new<T: TzInfo>(tz: T) -> Self {
        Self(Arc::new(tz))
    }

    /// The provider as a trait object.
    #[inline]
    pub fn get(&self) -> &dyn TzInfo {
        &*self.0
    }

    /// Whether both handles refer to the same provider object.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether the provider's concrete type is `T`.
    pub fn is<T: TzInfo>(&self) -> bool {
        AsAny::as_any(self.get()).is::<T>()
    }

    /// Borrow the provider as its concrete type `T`.
    pub fn downcast_ref<T: TzInfo>(&self) -> Option<&T> {
        AsAny::as_any(self.get()).downcast_ref::<T>()
    }
}

impl From<Arc<dyn TzInfo>> for SharedTz {
    fn from(tz: Arc<dyn TzInfo>) -> Self {
        Self(tz)
    }
}

impl Deref for SharedTz {
    type Target = dyn TzInfo;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.get()
    }
}

impl fmt::Debug for SharedTz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.get(), f)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Providers
// ═══════════════════════════════════════════════════════════════════════════

/// A provider that is attached but never reports an offset.
///
/// Values carrying it are naive even though `tzinfo()` is `Some`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UnknownOffset;

impl TzInfo for UnknownOffset {
    #[inline]
    fn utc_offset(&self, _query: OffsetQuery) -> Option<FixedOffset> {
        None
    }
}

impl TzInfo for FixedOffset {
    #[inline]
    fn utc_offset(&self, _query: OffsetQuery) -> Option<FixedOffset> {
        Some(*self)
    }

    fn tz_name(&self, _query: OffsetQuery) -> Option<String> {
        Some(format!("UTC{self}"))
    }

    fn offset_from_utc(&self, _utc: &NaiveDateTime) -> Option<FixedOffset> {
        Some(*self)
    }
}

impl TzInfo for Utc {
    #[inline]
    fn utc_offset(&self, _query: OffsetQuery) -> Option<FixedOffset> {
        Some(Utc.fix())
    }

    fn tz_name(&self, _query: OffsetQuery) -> Option<String> {
        Some("UTC".to_string())
    }

    fn dst(&self, _query: OffsetQuery) -> Option<Duration> {
        Some(Duration::zero())
    }

    fn offset_from_utc(&self, _utc: &NaiveDateTime) -> Option<FixedOffset> {
        Some(Utc.fix())
    }
}

impl TzInfo for Local {
    fn utc_offset(&self, query: OffsetQuery) -> Option<FixedOffset> {
        // A zone with rules has no offset without a date to apply them to.
        let OffsetQuery::Wall { local, fold } = query else {
            return None;
        };
        match Local.offset_from_local_datetime(&local) {
            LocalResult::Single(offset) => Some(offset),
            LocalResult::Ambiguous(earlier, later) => Some(match fold {
                Fold::Earlier => earlier,
                Fold::Later => later,
            }),
            // Wall time skipped by a transition: use the offset in force
            // just before it.
            LocalResult::None => Some(Local.offset_from_utc_datetime(&local)),
        }
    }

    fn offset_from_utc(&self, utc: &NaiveDateTime) -> Option<FixedOffset> {
        Some(Local.offset_from_utc_datetime(utc))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wall(h: u32) -> OffsetQuery {
        OffsetQuery::Wall {
            local: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            fold: Fold::Earlier,
        }
    }

    #[test]
    fn fixed_offset_reports_itself() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(plus_two.utc_offset(OffsetQuery::TimeOfDay), Some(plus_two));
        assert_eq!(plus_two.utc_offset(wall(12)), Some(plus_two));
        assert_eq!(
            TzInfo::tz_name(&plus_two, OffsetQuery::TimeOfDay).as_deref(),
            Some("UTC+02:00")
        );
    }

    #[test]
    fn utc_reports_zero() {
        let zero = FixedOffset::east_opt(0).unwrap();
        assert_eq!(Utc.utc_offset(OffsetQuery::TimeOfDay), Some(zero));
        assert_eq!(Utc.dst(wall(3)), Some(Duration::zero()));
    }

    #[test]
    fn local_has_no_offset_for_bare_time() {
        assert_eq!(Local.utc_offset(OffsetQuery::TimeOfDay), None);
        assert!(Local.utc_offset(wall(12)).is_some());
    }

    #[test]
    fn unknown_offset_never_reports() {
        assert_eq!(UnknownOffset.utc_offset(OffsetQuery::TimeOfDay), None);
        assert_eq!(UnknownOffset.utc_offset(wall(12)), None);
        assert_eq!(UnknownOffset.offset_from_utc(&NaiveDateTime::MIN), None);
    }

    #[test]
    fn shared_handle_downcasts_and_compares_by_identity() {
        let a = SharedTz::new(Utc);
        let b = a.clone();
        let c = SharedTz::new(Utc);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert!(a.is::<Utc>());
        assert!(!a.is::<FixedOffset>());
        assert_eq!(a.downcast_ref::<Utc>(), Some(&Utc));
        assert_eq!(format!("{a:?}"), format!("{Utc:?}"));
    }
}
