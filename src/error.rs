// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.
//!
//! Two kinds of failure exist: the primitive constructors reject
//! out-of-range fields ([`ConstructionError`]), and the narrowing helpers
//! reject values whose runtime state does not match the claimed
//! classification ([`MismatchError`]).  The tag layer adds no failure
//! modes of its own and never wraps a [`ConstructionError`].

use std::fmt;
use thiserror::Error;

/// A primitive constructor was given a field outside its valid range.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConstructionError {
    #[error("year {0} is out of range 1..=9999")]
    YearOutOfRange(i32),

    #[error("month {0} is out of range 1..=12")]
    MonthOutOfRange(u32),

    #[error("day {day} is out of range for {year:04}-{month:02}")]
    DayOutOfRange { year: i32, month: u32, day: u32 },

    #[error("hour {0} is out of range 0..=23")]
    HourOutOfRange(u32),

    #[error("minute {0} is out of range 0..=59")]
    MinuteOutOfRange(u32),

    #[error("second {0} is out of range 0..=59")]
    SecondOutOfRange(u32),

    #[error("microsecond {0} is out of range 0..=999999")]
    MicrosecondOutOfRange(u32),

    #[error("fold must be 0 or 1, got {0}")]
    InvalidFold(u8),

    #[error("timestamp {0} is out of the representable range")]
    TimestampOutOfRange(f64),

    #[error("offset-provider reported no offset")]
    UndefinedOffset,

    #[error("result is out of the representable range")]
    Overflow,
}

/// The classification a narrowing call asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// No offset-provider, or one that reports no offset.
    Naive,
    /// An offset-provider that reports a concrete offset.
    Aware,
    /// A calendar date that is not also a date+time.
    CalendarDate,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Classification::Naive => "naive",
            Classification::Aware => "aware",
            Classification::CalendarDate => "a calendar date",
        })
    }
}

/// A value did not satisfy the classification claimed for it.
///
/// The rejected value is handed back untouched so the caller can recover
/// it with [`MismatchError::into_inner`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("value is not {expected}: {value:?}")]
pub struct MismatchError<V: fmt::Debug> {
    pub expected: Classification,
    pub value: V,
}

impl<V: fmt::Debug> MismatchError<V> {
    pub(crate) fn new(expected: Classification, value: V) -> Self {
        #[cfg(feature = "log")]
        log::debug!("classification mismatch: expected {expected}, got {value:?}");
        Self { expected, value }
    }

    /// Recover the rejected value.
    pub fn into_inner(self) -> V {
        self.value
    }
}

/// Failure of an operation that parses, constructs or classifies.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("value is not {expected}: {repr}")]
    Mismatch {
        expected: Classification,
        repr: String,
    },

    #[error("invalid ISO-8601 input: {0}")]
    Parse(#[from] chrono::ParseError),
}

impl<V: fmt::Debug> From<MismatchError<V>> for Error {
    fn from(err: MismatchError<V>) -> Self {
        Error::Mismatch {
            expected: err.expected,
            repr: format!("{:?}", err.value),
        }
    }
}
