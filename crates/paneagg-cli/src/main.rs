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

#[macro_use]
extern crate tracing;

mod cli;

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use paneagg::{Min, ReductionKind, Sum, TwoStackAggregator};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::cli::PaneAggOpts;

fn main() -> Result<()> {
    let opts = PaneAggOpts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if opts.size == 0 || opts.slide == 0 || opts.size % opts.slide != 0 {
        bail!(
            "invalid --size/--slide: size={}, slide={} (require size % slide == 0)",
            opts.size,
            opts.slide
        );
    }
    if opts.input_size() == 0 || opts.input_size() > opts.size {
        bail!(
            "invalid --input: {} (must be nonzero and at most --size {})",
            opts.input_size(),
            opts.size
        );
    }

    if let Some(cpu) = opts.cpu {
        pin_to_cpu(cpu);
    }

    match opts.r#type {
        ReductionKind::Sum => run::<Sum>(&opts),
        ReductionKind::Min => run::<Min>(&opts),
        other => Err(paneagg::HammerError::Unsupported(other).into()),
    }
}

fn pin_to_cpu(cpu: usize) {
    match core_affinity::get_core_ids() {
        Some(ids) if cpu < ids.len() => {
            if !core_affinity::set_for_current(ids[cpu]) {
                warn!(cpu, "failed to pin worker thread to requested core");
            } else {
                info!(cpu, "pinned worker thread");
            }
        }
        _ => warn!(cpu, "requested core is out of range; continuing unpinned"),
    }
}

fn run<Op>(opts: &PaneAggOpts) -> Result<()>
where
    Op: paneagg::Aggregator,
{
    if let Some(lanes) = opts.lanes {
        if lanes != paneagg::simd::LANES {
            warn!(
                requested = lanes,
                actual = paneagg::simd::LANES,
                "--lanes is diagnostic only; the compiled lane width cannot be overridden at runtime"
            );
        }
    }

    let input_size = opts.input_size();
    info!(
        size = opts.size,
        slide = opts.slide,
        input = input_size,
        kind = %Op::KIND,
        "starting run"
    );

    let scalar = drive::<Op>(opts.size, opts.slide, input_size, opts.seed, opts.duration, false)
        .context("scalar pass failed")?;
    report("scalar", scalar);

    if !opts.no_simd {
        let simd = drive::<Op>(opts.size, opts.slide, input_size, opts.seed, opts.duration, true)
            .context("simd pass failed")?;
        report("simd", simd);
    }

    Ok(())
}

struct PassResult {
    ticks: u64,
    elements: u64,
    elapsed: Duration,
}

fn drive<Op>(
    window: usize,
    slide: usize,
    input_size: usize,
    seed: u64,
    duration_secs: u64,
    use_simd: bool,
) -> Result<PassResult>
where
    Op: paneagg::Aggregator,
{
    let mut agg = TwoStackAggregator::<Op>::new(window, slide)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let deadline = Instant::now() + Duration::from_secs(duration_secs);

    let mut tick = vec![0i32; input_size];
    let mut ticks = 0u64;
    let mut elements = 0u64;
    let start = Instant::now();

    // Warm the window before timing steady-state sliding.
    while agg.len() + input_size <= window {
        for v in tick.iter_mut() {
            *v = rng.gen_range(-1_000_000..1_000_000);
        }
        agg.insert_bulk(&tick)?;
    }

    while Instant::now() < deadline {
        for v in tick.iter_mut() {
            *v = rng.gen_range(-1_000_000..1_000_000);
        }
        agg.insert_bulk(&tick)?;
        let _ = agg.query(use_simd)?;
        agg.evict(input_size)?;
        ticks += 1;
        elements += input_size as u64;
    }

    Ok(PassResult {
        ticks,
        elements,
        elapsed: start.elapsed(),
    })
}

fn report(label: &str, result: PassResult) {
    let secs = result.elapsed.as_secs_f64().max(f64::EPSILON);
    let throughput = result.elements as f64 / secs;
    println!(
        "{label}: {} ticks, {} elements in {:.3}s ({:.2} elements/s)",
        result.ticks, result.elements, secs, throughput
    );
}
