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

//! Width-8 lane-wise reduction of a contiguous `i32` run, with a portable
//! scalar fallback. The two paths must be bit-identical: integer wrapping add
//! and signed min are both associative and commutative, so any grouping of
//! the same multiset of inputs produces the same result.

use crate::operator::ReductionKind;

/// Number of lanes in the vectorized reduction this module targets.
pub const LANES: usize = 8;

/// Reduce `chunk` under `kind`, using AVX2 when available and requested and
/// the chunk is at least one vector wide; scalar otherwise.
pub fn reduce_chunk(kind: ReductionKind, chunk: &[i32], use_simd: bool) -> i32 {
    debug_assert!(
        matches!(kind, ReductionKind::Sum | ReductionKind::Min),
        "reduce_chunk only supports Sum and Min"
    );

    #[cfg(target_arch = "x86_64")]
    {
        if use_simd && chunk.len() >= LANES && is_x86_feature_detected!("avx2") {
            // SAFETY: gated on the runtime `avx2` feature check above.
            return unsafe { avx2::reduce(kind, chunk) };
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    let _ = use_simd;

    reduce_scalar(kind, chunk)
}

pub fn reduce_scalar(kind: ReductionKind, chunk: &[i32]) -> i32 {
    match kind {
        ReductionKind::Sum => chunk.iter().fold(0i32, |acc, &x| acc.wrapping_add(x)),
        ReductionKind::Min => chunk.iter().copied().fold(i32::MAX, i32::min),
        _ => unreachable!("reduce_scalar only supports Sum and Min"),
    }
}

#[cfg(target_arch = "x86_64")]
mod avx2 {
    use std::arch::x86_64::*;

    use super::ReductionKind;

    #[target_feature(enable = "avx2")]
    pub unsafe fn reduce(kind: ReductionKind, chunk: &[i32]) -> i32 {
        match kind {
            ReductionKind::Sum => reduce_sum(chunk),
            ReductionKind::Min => reduce_min(chunk),
            _ => unreachable!("reduce only supports Sum and Min"),
        }
    }

    #[target_feature(enable = "avx2")]
    unsafe fn reduce_sum(chunk: &[i32]) -> i32 {
        let mut acc = _mm256_setzero_si256();
        let mut iter = chunk.chunks_exact(8);
        for lane in iter.by_ref() {
            let v = _mm256_loadu_si256(lane.as_ptr() as *const __m256i);
            acc = _mm256_add_epi32(acc, v);
        }
        let mut lanes = [0i32; 8];
        _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
        let mut total = lanes.iter().fold(0i32, |a, &b| a.wrapping_add(b));
        for &x in iter.remainder() {
            total = total.wrapping_add(x);
        }
        total
    }

    #[target_feature(enable = "avx2")]
    unsafe fn reduce_min(chunk: &[i32]) -> i32 {
        let mut acc = _mm256_set1_epi32(i32::MAX);
        let mut iter = chunk.chunks_exact(8);
        for lane in iter.by_ref() {
            let v = _mm256_loadu_si256(lane.as_ptr() as *const __m256i);
            acc = _mm256_min_epi32(acc, v);
        }
        let mut lanes = [0i32; 8];
        _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc);
        let mut total = lanes.iter().copied().fold(i32::MAX, i32::min);
        for &x in iter.remainder() {
            total = total.min(x);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_simd_sum_agree_on_various_lengths() {
        for len in [0usize, 1, 7, 8, 9, 15, 16, 17, 63, 64, 1000] {
            let data: Vec<i32> = (0..len as i32).map(|x| x * 3 - 7).collect();
            let scalar = reduce_chunk(ReductionKind::Sum, &data, false);
            let simd = reduce_chunk(ReductionKind::Sum, &data, true);
            assert_eq!(scalar, simd, "mismatch at len={len}");
        }
    }

    #[test]
    fn scalar_and_simd_min_agree_on_various_lengths() {
        for len in [0usize, 1, 7, 8, 9, 15, 16, 17, 63, 64, 1000] {
            let data: Vec<i32> = (0..len as i32).map(|x| (x * 37) % 101 - 50).collect();
            let scalar = reduce_chunk(ReductionKind::Min, &data, false);
            let simd = reduce_chunk(ReductionKind::Min, &data, true);
            assert_eq!(scalar, simd, "mismatch at len={len}");
        }
    }

    #[test]
    fn empty_chunk_is_identity() {
        assert_eq!(reduce_chunk(ReductionKind::Sum, &[], true), 0);
        assert_eq!(reduce_chunk(ReductionKind::Min, &[], true), i32::MAX);
    }

    #[test]
    fn sum_wraps_like_native_i32() {
        let data = [i32::MAX, 1, i32::MAX, 1];
        let scalar = reduce_chunk(ReductionKind::Sum, &data, false);
        let simd = reduce_chunk(ReductionKind::Sum, &data, true);
        assert_eq!(scalar, simd);
    }
}
