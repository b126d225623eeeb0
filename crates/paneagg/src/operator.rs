// Copyright 2026 The paneagg Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The associative-reduction abstraction: identity / lift / combine / lower.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Returned by [`ReductionKind::from_str`] for an unrecognized `--type` value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown reduction kind `{0}` (expected one of MIN, MAX, CNT, SUM, AVG)")]
pub struct ParseReductionKindError(String);

/// The reduction kinds the wire format (CLI `--type`) knows about.
///
/// Only [`ReductionKind::Sum`] and [`ReductionKind::Min`] are implemented; the
/// rest are reserved placeholders, matching the upstream design this engine
/// carries forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReductionKind {
    Min,
    Max,
    Cnt,
    Sum,
    Avg,
}

impl fmt::Display for ReductionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReductionKind::Min => "MIN",
            ReductionKind::Max => "MAX",
            ReductionKind::Cnt => "CNT",
            ReductionKind::Sum => "SUM",
            ReductionKind::Avg => "AVG",
        };
        f.write_str(s)
    }
}

impl FromStr for ReductionKind {
    type Err = ParseReductionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MIN" => Ok(ReductionKind::Min),
            "MAX" => Ok(ReductionKind::Max),
            "CNT" => Ok(ReductionKind::Cnt),
            "SUM" => Ok(ReductionKind::Sum),
            "AVG" => Ok(ReductionKind::Avg),
            other => Err(ParseReductionKindError(other.to_string())),
        }
    }
}

/// An associative reduction over `i32` inputs with `i32` partial state.
///
/// `combine` is not required to be commutative by the contract, though both
/// operators implemented here (`Sum`, `Min`) happen to be. The order of
/// arguments matters for non-commutative extensions: the newly-seen element
/// is always the left operand.
pub trait Aggregator: Copy {
    /// The user-visible result type.
    type Out: Copy + PartialEq + fmt::Debug;

    /// The reduction this aggregator implements, for error reporting and CLI dispatch.
    const KIND: ReductionKind;

    /// The unit of `combine`: `combine(identity(), x) == x`.
    fn identity() -> i32;

    /// Promote a raw input to a partial.
    fn lift(x: i32) -> i32;

    /// Combine two partials; `a` is the more-recently-observed operand.
    fn combine(a: i32, b: i32) -> i32;

    /// Reduce a partial to the user-visible output.
    fn lower(p: i32) -> Self::Out;
}

/// Wrapping two's-complement integer sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sum;

impl Aggregator for Sum {
    type Out = i32;
    const KIND: ReductionKind = ReductionKind::Sum;

    #[inline(always)]
    fn identity() -> i32 {
        0
    }

    #[inline(always)]
    fn lift(x: i32) -> i32 {
        x
    }

    #[inline(always)]
    fn combine(a: i32, b: i32) -> i32 {
        a.wrapping_add(b)
    }

    #[inline(always)]
    fn lower(p: i32) -> i32 {
        p
    }
}

/// Signed integer minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Min;

impl Aggregator for Min {
    type Out = i32;
    const KIND: ReductionKind = ReductionKind::Min;

    #[inline(always)]
    fn identity() -> i32 {
        i32::MAX
    }

    #[inline(always)]
    fn lift(x: i32) -> i32 {
        x
    }

    #[inline(always)]
    fn combine(a: i32, b: i32) -> i32 {
        a.min(b)
    }

    #[inline(always)]
    fn lower(p: i32) -> i32 {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_kind_round_trips_through_display_and_from_str() {
        for kind in [
            ReductionKind::Min,
            ReductionKind::Max,
            ReductionKind::Cnt,
            ReductionKind::Sum,
            ReductionKind::Avg,
        ] {
            let s = kind.to_string();
            assert_eq!(s.parse::<ReductionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("sum".parse::<ReductionKind>().unwrap(), ReductionKind::Sum);
        assert_eq!("Min".parse::<ReductionKind>().unwrap(), ReductionKind::Min);
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("median".parse::<ReductionKind>().is_err());
    }

    #[test]
    fn sum_identity_and_combine() {
        assert_eq!(Sum::combine(Sum::identity(), 7), 7);
        assert_eq!(Sum::combine(3, 4), 7);
    }

    #[test]
    fn min_identity_and_combine() {
        assert_eq!(Min::combine(Min::identity(), 7), 7);
        assert_eq!(Min::combine(3, 4), 3);
    }
}
