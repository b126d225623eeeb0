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

//! `paneagg`: a count-based sliding-window aggregation engine.
//!
//! The core type is [`TwoStackAggregator`], which maintains `O(1)` amortized
//! `insert`/`evict`/`query` over a window of `W` elements with slide `S`,
//! using a pair of stacks layered over a single [`CircularBuffer`] and an
//! optional AVX2-accelerated `swap` to rebuild the output stack in bulk.

pub mod aggregator;
pub mod buffer;
pub mod error;
pub mod operator;
pub mod simd;

pub use aggregator::TwoStackAggregator;
pub use buffer::CircularBuffer;
pub use error::{HammerError, Result};
pub use operator::{Aggregator, Min, ParseReductionKindError, ReductionKind, Sum};
