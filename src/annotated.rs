// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The awareness annotation, readable at runtime.
//!
//! A tag's parameter is invisible to anything that only sees values, such
//! as a deserializer.  [`Annotated`] exposes the parameter's
//! [`TzConstraint`] as a constant, and with the `serde` feature the
//! [`checked`] module enforces it while deserializing:
//!
//! ```ignore
//! #[derive(serde::Deserialize)]
//! struct Meeting {
//!     #[serde(with = "chronotag::annotated::checked")]
//!     starts: chronotag::AwareDateTime,
//! }
//! ```
//!
//! Without `checked`, a tag field accepts whatever its primitive accepts.

use chrono::FixedOffset;

use crate::date::Date;
use crate::datetime::DateTime;
use crate::params::{TzConstraint, TzParam};
use crate::time::Time;

/// Tag types whose parameter carries a runtime-readable constraint.
pub trait Annotated {
    /// `None` when the tag makes no awareness claim.
    const CONSTRAINT: Option<TzConstraint>;

    /// Type label used in diagnostics.
    fn label() -> String;

    /// The offset the value's provider reports, if any.
    fn reported_offset(&self) -> Option<FixedOffset>;

    /// Whether this value's runtime state satisfies the tag's parameter.
    fn admitted(&self) -> bool;
}

impl Annotated for Date {
    const CONSTRAINT: Option<TzConstraint> = None;

    fn label() -> String {
        "Date".to_string()
    }

    #[inline]
    fn reported_offset(&self) -> Option<FixedOffset> {
        None
    }

    #[inline]
    fn admitted(&self) -> bool {
        true
    }
}

impl<Z: TzParam> Annotated for Time<Z> {
    const CONSTRAINT: Option<TzConstraint> = Z::CONSTRAINT;

    fn label() -> String {
        format!("Time<{}>", Z::label())
    }

    fn reported_offset(&self) -> Option<FixedOffset> {
        self.utcoffset()
    }

    fn admitted(&self) -> bool {
        Z::admits(self.tzinfo(), self.utcoffset())
    }
}

impl<Z: TzParam> Annotated for DateTime<Z> {
    const CONSTRAINT: Option<TzConstraint> = Z::CONSTRAINT;

    fn label() -> String {
        format!("DateTime<{}>", Z::label())
    }

    fn reported_offset(&self) -> Option<FixedOffset> {
        self.utcoffset()
    }

    fn admitted(&self) -> bool {
        Z::admits(self.tzinfo(), self.utcoffset())
    }
}

/// The constraint annotated on `T`.
#[inline]
pub fn constraint_of<T: Annotated>() -> Option<TzConstraint> {
    T::CONSTRAINT
}

/// `serde(with = ...)` helpers enforcing the annotation.
#[cfg(feature = "serde")]
pub mod checked {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt::Debug;

    use super::Annotated;
    use crate::error::MismatchError;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        value.serialize(serializer)
    }

    /// Deserialize like the primitive, then reject values whose runtime
    /// state the tag's parameter does not admit.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Deserialize<'de> + Annotated + Debug,
        D: Deserializer<'de>,
    {
        let value = T::deserialize(deserializer)?;
        if value.admitted() {
            return Ok(value);
        }
        match T::CONSTRAINT {
            Some(constraint) if !constraint.admits(value.reported_offset()) => Err(
                de::Error::custom(MismatchError::new(constraint.classification(), value)),
            ),
            _ => Err(de::Error::custom(format_args!(
                "value does not conform to {}: {value:?}",
                T::label()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::{AwareDateTime, NaiveDateTime};
    use crate::primitive::Fold;
    use crate::time::NaiveTime;
    use chrono::Utc;

    #[test]
    fn constants_follow_the_parameter() {
        assert_eq!(constraint_of::<Date>(), None);
        assert_eq!(constraint_of::<DateTime>(), None);
        assert_eq!(constraint_of::<NaiveTime>(), Some(TzConstraint::Naive));
        assert_eq!(constraint_of::<AwareDateTime>(), Some(TzConstraint::Aware));
        assert_eq!(constraint_of::<DateTime<Utc>>(), Some(TzConstraint::Aware));
        assert_eq!(<NaiveDateTime as Annotated>::label(), "DateTime<Naive>");
    }

    #[test]
    fn admission_reads_the_runtime_state() {
        let naive = DateTime::new(2024, 1, 1, 0, 0, 0, 0).unwrap();
        assert!(naive.admitted());
        let claimed: AwareDateTime = naive.retag_unchecked();
        assert!(!claimed.admitted());

        let utc = DateTime::with_tz(2024, 1, 1, 0, 0, 0, 0, Utc, Fold::Earlier).unwrap();
        assert!(utc.admitted());
    }
}
