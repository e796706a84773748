// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Offset-provider type parameters.
//!
//! Each tag type carries a compile-time parameter `Z: TzParam` saying what
//! is known about its offset-provider.  The parameter is zero-sized and
//! never stored; it only steers the type checker.
//!
//! | Parameter | Meaning |
//! |-----------|---------|
//! | [`AnyTz`] | nothing is known (the unparametrized tag) |
//! | [`Naive`] | no provider, or one reporting no offset |
//! | [`Aware`] | a provider reporting an offset, of unknown type |
//! | any `T: TzInfo` | an aware value whose provider is a `T` |
//!
//! Constructors infer the parameter from their provider argument through
//! [`TzArg`]:
//!
//! | Argument | Parameter |
//! |----------|-----------|
//! | [`NoTz`] | [`Naive`] |
//! | `T: TzInfo` | `T` |
//! | [`SharedTz`] | [`Aware`] |
//! | `Option<SharedTz>` | [`AnyTz`] |

use chrono::FixedOffset;

use crate::error::Classification;
use crate::tzinfo::{SharedTz, TzInfo};

// ═══════════════════════════════════════════════════════════════════════════
// TzConstraint — the runtime side-channel annotation
// ═══════════════════════════════════════════════════════════════════════════

/// Awareness constraint a parameter stands for, readable at runtime.
///
/// Reflection consumers (deserializers, validators) cannot see `Z` through
/// the value itself; they read this annotation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TzConstraint {
    Naive,
    Aware,
}

impl TzConstraint {
    /// Whether a value reporting `offset` satisfies the constraint.
    #[inline]
    pub fn admits(self, offset: Option<FixedOffset>) -> bool {
        match self {
            TzConstraint::Naive => offset.is_none(),
            TzConstraint::Aware => offset.is_some(),
        }
    }

    #[inline]
    pub fn classification(self) -> Classification {
        match self {
            TzConstraint::Naive => Classification::Naive,
            TzConstraint::Aware => Classification::Aware,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TzParam trait
// ═══════════════════════════════════════════════════════════════════════════

/// Marker trait for offset-provider type parameters.
pub trait TzParam: 'static {
    /// The constraint this parameter annotates, `None` for [`AnyTz`].
    const CONSTRAINT: Option<TzConstraint>;

    /// Display label used by `Debug` output of tagged values.
    fn label() -> &'static str;

    /// Whether a value with this provider and reported offset fits the
    /// parameter.
    fn admits(_tzinfo: Option<&SharedTz>, offset: Option<FixedOffset>) -> bool {
        Self::CONSTRAINT.map_or(true, |constraint| constraint.admits(offset))
    }
}

/// Unparametrized: no claim about the provider.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct AnyTz;

/// No provider, or one that reports no offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Naive;

/// A provider that reports an offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Aware;

impl TzParam for AnyTz {
    const CONSTRAINT: Option<TzConstraint> = None;

    #[inline]
    fn label() -> &'static str {
        "AnyTz"
    }
}

impl TzParam for Naive {
    const CONSTRAINT: Option<TzConstraint> = Some(TzConstraint::Naive);

    #[inline]
    fn label() -> &'static str {
        "Naive"
    }
}

impl TzParam for Aware {
    const CONSTRAINT: Option<TzConstraint> = Some(TzConstraint::Aware);

    #[inline]
    fn label() -> &'static str {
        "Aware"
    }
}

/// A concrete provider type: aware, and the provider must be a `T`.
impl<T: TzInfo> TzParam for T {
    const CONSTRAINT: Option<TzConstraint> = Some(TzConstraint::Aware);

    fn label() -> &'static str {
        std::any::type_name::<T>()
    }

    fn admits(tzinfo: Option<&SharedTz>, offset: Option<FixedOffset>) -> bool {
        offset.is_some() && tzinfo.is_some_and(SharedTz::is::<T>)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TzArg — provider arguments and the parameter they imply
// ═══════════════════════════════════════════════════════════════════════════

/// The explicit "no provider" argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct NoTz;

/// A provider argument accepted by tag constructors.
///
/// The associated [`Param`](TzArg::Param) is the parameter of the value the
/// constructor returns.
pub trait TzArg {
    type Param: TzParam;

    fn into_tzinfo(self) -> Option<SharedTz>;
}

impl TzArg for NoTz {
    type Param = Naive;

    #[inline]
    fn into_tzinfo(self) -> Option<SharedTz> {
        None
    }
}

impl<T: TzInfo> TzArg for T {
    type Param = T;

    #[inline]
    fn into_tzinfo(self) -> Option<SharedTz> {
        Some(SharedTz::new(self))
    }
}

impl TzArg for SharedTz {
    type Param = Aware;

    #[inline]
    fn into_tzinfo(self) -> Option<SharedTz> {
        Some(self)
    }
}

impl TzArg for Option<SharedTz> {
    type Param = AnyTz;

    #[inline]
    fn into_tzinfo(self) -> Option<SharedTz> {
        self
    }
}
