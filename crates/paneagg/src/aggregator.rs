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

//! The two-stack sliding aggregator: O(1) amortized `insert`/`evict`/`query`
//! over a count-based window, backed by a single circular buffer and a
//! periodic `swap` that rebuilds pane-aligned prefix aggregates.

use std::marker::PhantomData;

use crate::buffer::CircularBuffer;
use crate::error::{HammerError, Result};
use crate::operator::Aggregator;
use crate::simd;

/// Below this slide width (and below this bulk-operation length), the SIMD
/// paths fall back to the scalar loop: there isn't a full vector's worth of
/// work to amortize the setup cost.
const SIMD_MIN_WIDTH: usize = simd::LANES * 2;

/// A sliding-window aggregator for a count-based window of size `W` and
/// slide `S`, parameterized by an associative reduction `Op`.
pub struct TwoStackAggregator<Op: Aggregator> {
    window: usize,
    slide: usize,
    buffer: CircularBuffer<i32>,
    istack_size: usize,
    istack_val: i32,
    ostack_size: usize,
    ostack_val: Vec<i32>,
    _op: PhantomData<Op>,
}

impl<Op: Aggregator> TwoStackAggregator<Op> {
    /// Construct an aggregator for window `window` and slide `slide`.
    ///
    /// Requires `window >= slide >= 1` and `window % slide == 0`.
    pub fn new(window: usize, slide: usize) -> Result<Self> {
        if window == 0 || slide == 0 || slide > window || window % slide != 0 {
            return Err(HammerError::InvalidConfig { window, slide });
        }
        Ok(Self {
            window,
            slide,
            buffer: CircularBuffer::with_capacity(window),
            istack_size: 0,
            istack_val: Op::identity(),
            ostack_size: 0,
            ostack_val: vec![Op::identity(); window],
            _op: PhantomData,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn slide(&self) -> usize {
        self.slide
    }

    /// Number of live elements currently held (across both stacks).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append one value to the window.
    pub fn insert(&mut self, v: i32) -> Result<()> {
        if self.buffer.is_full() {
            return Err(HammerError::Overflow {
                len: self.buffer.len(),
                capacity: self.window,
                additional: 1,
            });
        }
        let prev = self.live_istack_val();
        self.istack_val = Op::combine(Op::lift(v), prev);
        self.buffer.enqueue(v)?;
        self.istack_size += 1;
        Ok(())
    }

    /// Append `src` to the window. Equivalent to calling [`Self::insert`] for
    /// each element of `src` in order.
    pub fn insert_bulk(&mut self, src: &[i32]) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        if self.buffer.len() + src.len() > self.window {
            return Err(HammerError::Overflow {
                len: self.buffer.len(),
                capacity: self.window,
                additional: src.len(),
            });
        }
        let prev = self.live_istack_val();
        self.istack_val = if self.slide < SIMD_MIN_WIDTH || src.len() < SIMD_MIN_WIDTH {
            src.iter().fold(prev, |acc, &v| Op::combine(Op::lift(v), acc))
        } else {
            Op::combine(simd::reduce_chunk(Op::KIND, src, true), prev)
        };
        self.istack_size += src.len();
        self.buffer.enqueue_many(src)?;
        Ok(())
    }

    /// Drop the `k` oldest live elements from the window.
    ///
    /// `k` must not exceed the size of the materialized output stack; in the
    /// canonical usage pattern (`query` then `evict(slide)` per step) this is
    /// always satisfied because `query` materializes the whole window first.
    pub fn evict(&mut self, k: usize) -> Result<()> {
        if k == 0 {
            return Ok(());
        }
        if k > self.ostack_size {
            return Err(HammerError::Underflow {
                requested: k,
                available: self.ostack_size,
            });
        }
        self.ostack_size -= k;
        self.buffer.dequeue_many(k)?;
        Ok(())
    }

    /// The aggregate of the current window.
    ///
    /// Idempotent: repeated calls without an intervening `insert`/`evict`
    /// return the same value and leave the aggregator in the same state.
    pub fn query(&mut self, use_simd: bool) -> Result<Op::Out> {
        if self.ostack_size == 0 {
            self.swap(use_simd)?;
        }
        let top = if self.ostack_size == 0 {
            Op::identity()
        } else {
            self.ostack_val[self.ostack_size - 1]
        };
        Ok(Op::lower(Op::combine(top, self.live_istack_val())))
    }

    /// Empty the aggregator, as if freshly constructed with the same
    /// `(window, slide, Op)`.
    pub fn reset(&mut self) {
        self.istack_size = 0;
        self.istack_val = Op::identity();
        self.ostack_size = 0;
        self.buffer.reset();
    }

    #[inline]
    fn live_istack_val(&self) -> i32 {
        if self.istack_size == 0 {
            Op::identity()
        } else {
            self.istack_val
        }
    }

    /// Rebuild the output stack from the buffer's current live range.
    ///
    /// `ostack_val[k * slide - 1]` becomes the aggregate of the `k * slide`
    /// most recently inserted live elements, for every full pane `k`; a
    /// trailing partial pane (when the live count isn't a multiple of
    /// `slide`) is written at its own final index. Other slots are left
    /// stale and must never be read — `evict` only ever exposes pane-aligned
    /// indices when called in multiples of `slide`, the intended usage.
    fn swap(&mut self, use_simd: bool) -> Result<()> {
        let n = self.istack_size;
        tracing::trace!(window = self.window, slide = self.slide, n, use_simd, "swap");

        if n == 0 {
            self.ostack_size = 0;
            return Ok(());
        }
        if self.buffer.rear().is_none() {
            return Err(HammerError::InvariantViolation(
                "non-empty input stack but empty circular buffer",
            ));
        }

        if !use_simd || self.slide < SIMD_MIN_WIDTH {
            let mut temp = Op::identity();
            for i in 0..n {
                let phys = self.buffer.index_from_rear(i);
                let v = self.buffer.get(phys);
                temp = Op::combine(Op::lift(v), temp);
                self.ostack_val[i] = temp;
            }
        } else {
            let mut temp = Op::identity();
            let mut lo = 0;
            while lo < n {
                let hi = (lo + self.slide).min(n);
                let block = self.reduce_pane(lo, hi);
                temp = Op::combine(block, temp);
                self.ostack_val[hi - 1] = temp;
                lo = hi;
            }
        }

        self.ostack_size = n;
        self.istack_size = 0;
        self.istack_val = Op::identity();
        Ok(())
    }

    /// Reduce the pane spanning rear-relative offsets `[lo, hi)` (`lo` is
    /// newer, `hi - 1` is the oldest offset in the pane) via the SIMD path,
    /// splitting at the buffer's physical wrap boundary when the pane
    /// straddles it.
    fn reduce_pane(&self, lo: usize, hi: usize) -> i32 {
        let newest = self.buffer.index_from_rear(lo);
        let oldest = self.buffer.index_from_rear(hi - 1);
        let data = self.buffer.raw();
        if oldest <= newest {
            simd::reduce_chunk(Op::KIND, &data[oldest..=newest], true)
        } else {
            let tail = simd::reduce_chunk(Op::KIND, &data[oldest..], true);
            let head = simd::reduce_chunk(Op::KIND, &data[..=newest], true);
            Op::combine(head, tail)
        }
    }
}
