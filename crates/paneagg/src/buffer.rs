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

//! A fixed-capacity circular buffer with bulk enqueue/dequeue.
//!
//! The buffer never clears evicted slots; callers must only read within
//! `[front, front + len)` (mod capacity).

use crate::error::{HammerError, Result};

/// A cache-line-aligned ring of fixed capacity `C`.
#[repr(align(64))]
pub struct CircularBuffer<T> {
    data: Box<[T]>,
    front: Option<usize>,
    rear: Option<usize>,
    len: usize,
}

impl<T: Copy + Default> CircularBuffer<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![T::default(); capacity].into_boxed_slice(),
            front: None,
            rear: None,
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    pub fn rear(&self) -> Option<usize> {
        self.rear
    }

    #[inline]
    pub fn front(&self) -> Option<usize> {
        self.front
    }

    /// Physical index of the element that is `offset` slots older than `rear`
    /// (`offset = 0` is `rear` itself, the newest element).
    #[inline]
    pub fn index_from_rear(&self, offset: usize) -> usize {
        debug_assert!(offset < self.len);
        let rear = self.rear.expect("index_from_rear called on empty buffer");
        let capacity = self.capacity();
        (rear + capacity - offset % capacity) % capacity
    }

    #[inline]
    pub fn get(&self, physical_index: usize) -> T {
        self.data[physical_index]
    }

    /// The full backing storage, including slots outside the live range.
    /// Used by the SIMD swap path to slice out contiguous physical runs.
    #[inline]
    pub fn raw(&self) -> &[T] {
        &self.data
    }

    pub fn enqueue(&mut self, value: T) -> Result<()> {
        self.enqueue_many(&[value])
    }

    /// Append `values` in order, splitting the physical write at the wrap
    /// boundary when necessary.
    pub fn enqueue_many(&mut self, values: &[T]) -> Result<()> {
        let capacity = self.capacity();
        if self.len + values.len() > capacity {
            return Err(HammerError::Overflow {
                len: self.len,
                capacity,
                additional: values.len(),
            });
        }
        if values.is_empty() {
            return Ok(());
        }

        let start = match self.rear {
            Some(r) => (r + 1) % capacity,
            None => {
                self.front = Some(0);
                0
            }
        };

        let first_run = (capacity - start).min(values.len());
        self.data[start..start + first_run].copy_from_slice(&values[..first_run]);
        if first_run < values.len() {
            let remaining = values.len() - first_run;
            self.data[..remaining].copy_from_slice(&values[first_run..]);
        }

        self.rear = Some((start + values.len() - 1) % capacity);
        self.len += values.len();
        Ok(())
    }

    /// Remove and return the front element, or `None` if empty.
    pub fn dequeue(&mut self) -> Option<T> {
        let front = self.front?;
        let value = self.data[front];
        self.dequeue_many(1).expect("len() >= 1 was just checked");
        Some(value)
    }

    pub fn dequeue_many(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        if count > self.len {
            return Err(HammerError::Underflow {
                requested: count,
                available: self.len,
            });
        }
        let capacity = self.capacity();
        self.len -= count;
        if self.len == 0 {
            self.front = None;
            self.rear = None;
        } else {
            let front = self.front.expect("non-empty buffer has a front cursor");
            self.front = Some((front + count) % capacity);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.front = None;
        self.rear = None;
        self.len = 0;
    }
}
