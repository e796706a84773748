// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Chronotag
//!
//! Date and time values tagged at compile time with what is known about
//! their offset-provider, with no runtime cost: every tag is a
//! `#[repr(transparent)]` wrapper over its primitive.
//!
//! # Core types
//!
//! - [`Date`] — a calendar date that is not a date+time.
//! - [`Time<Z>`] — a time-of-day parameterised by a [`TzParam`] marker.
//! - [`DateTime<Z>`] — a date+time parameterised by a [`TzParam`] marker.
//! - [`PlainTime`] / [`PlainDateTime`] — the untagged primitives, each
//!   carrying an optional [`TzInfo`] provider and a [`Fold`].
//!
//! # Parameters
//!
//! | Marker | Claim |
//! |--------|-------|
//! | [`AnyTz`] | none (the default) |
//! | [`Naive`] | no offset is reported |
//! | [`Aware`] | an offset is reported |
//! | any `T: TzInfo` | an offset is reported by a `T` provider |
//!
//! The parameter is a compile-time claim only.  Runtime decisions look at
//! the value itself: [`InstanceCheck::matches`] for "is this a `Date`?",
//! [`is_naive`]/[`is_aware`] for the offset state, and [`as_naive`],
//! [`as_aware`] and [`as_calendar_date`] to turn an unchecked value into a
//! trusted tag.
//!
//! ```
//! use chronotag::{as_aware, is_aware, DateTime, NaiveDateTime};
//! use chrono::FixedOffset;
//!
//! let naive: NaiveDateTime = DateTime::new(2024, 1, 2, 13, 0, 0, 0).unwrap();
//! let east = naive.with_tzinfo(FixedOffset::east_opt(3600).unwrap());
//! assert!(is_aware(&east));
//! assert!(as_aware(naive).is_err());
//! ```

pub mod annotated;
mod classify;
mod date;
mod datetime;
mod error;
mod instance;
mod params;
mod primitive;
mod time;
mod tzinfo;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use classify::{as_aware, as_calendar_date, as_naive, is_aware, is_naive, HasTzInfo, Narrow};
pub use date::Date;
pub use datetime::{AwareDateTime, DateTime, NaiveDateTime};
pub use error::{Classification, ConstructionError, Error, MismatchError};
pub use instance::{conforms, isinstance, Inspect, InstanceCheck, PrimitiveRef, TzAdmission};
pub use params::{AnyTz, Aware, Naive, NoTz, TzArg, TzConstraint, TzParam};
pub use primitive::{DateLike, Fold, PlainDate, PlainDateTime, PlainTime, MAXYEAR, MINYEAR};
pub use time::{AwareTime, NaiveTime, Time};
pub use tzinfo::{AsAny, OffsetQuery, SharedTz, TzInfo, UnknownOffset};
