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

use thiserror::Error;

/// A specialized `Result` type for aggregator operations.
pub type Result<T> = std::result::Result<T, HammerError>;

/// The error type for the two-stack sliding aggregator and its circular buffer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HammerError {
    #[error("invalid window configuration: window={window}, slide={slide} (require window >= slide >= 1 and window % slide == 0)")]
    InvalidConfig { window: usize, slide: usize },

    #[error("insert would overflow the window: {len} live element(s), capacity {capacity}, tried to add {additional}")]
    Overflow {
        len: usize,
        capacity: usize,
        additional: usize,
    },

    #[error("evict({requested}) exceeds the materialized output stack ({available} available)")]
    Underflow { requested: usize, available: usize },

    #[error("reduction kind {0:?} is not implemented")]
    Unsupported(super::operator::ReductionKind),

    #[error("invariant violation during swap: {0}")]
    InvariantViolation(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::ReductionKind;

    #[test]
    fn invalid_config_display() {
        let e = HammerError::InvalidConfig { window: 4, slide: 3 };
        assert_eq!(
            e.to_string(),
            "invalid window configuration: window=4, slide=3 (require window >= slide >= 1 and window % slide == 0)"
        );
    }

    #[test]
    fn overflow_display() {
        let e = HammerError::Overflow {
            len: 2,
            capacity: 2,
            additional: 1,
        };
        assert_eq!(
            e.to_string(),
            "insert would overflow the window: 2 live element(s), capacity 2, tried to add 1"
        );
    }

    #[test]
    fn underflow_display() {
        let e = HammerError::Underflow {
            requested: 5,
            available: 2,
        };
        assert_eq!(
            e.to_string(),
            "evict(5) exceeds the materialized output stack (2 available)"
        );
    }

    #[test]
    fn unsupported_display() {
        let e = HammerError::Unsupported(ReductionKind::Max);
        assert_eq!(e.to_string(), "reduction kind Max is not implemented");
    }

    #[test]
    fn invariant_violation_display() {
        let e = HammerError::InvariantViolation("empty buffer");
        assert_eq!(e.to_string(), "invariant violation during swap: empty buffer");
    }
}
