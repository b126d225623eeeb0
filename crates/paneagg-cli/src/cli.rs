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

use clap::Parser;
use paneagg::ReductionKind;

/// Throughput benchmark harness for the `paneagg` sliding-window aggregator.
///
/// Generates a synthetic stream, replays it against the two-stack aggregator
/// once with the scalar reduction path and once with the SIMD path (when
/// available), and prints one throughput line per pass.
#[derive(Debug, Parser)]
#[command(name = "paneagg", version, about)]
pub struct PaneAggOpts {
    /// Window size, in elements.
    #[arg(long, default_value_t = 1_048_576)]
    pub size: usize,

    /// Slide size, in elements. Must divide `size`.
    #[arg(long, default_value_t = 1_024)]
    pub slide: usize,

    /// How long to run each pass, in seconds.
    #[arg(long, default_value_t = 5)]
    pub duration: u64,

    /// Number of elements to draw per tick before sliding. Defaults to `slide`.
    #[arg(long)]
    pub input: Option<usize>,

    /// Reduction to run.
    #[arg(long, value_name = "TYPE", default_value_t = ReductionKind::Sum)]
    pub r#type: ReductionKind,

    /// Override the detected SIMD lane width (diagnostic use only).
    #[arg(long)]
    pub lanes: Option<usize>,

    /// Disable the SIMD pass and run scalar-only.
    #[arg(long)]
    pub no_simd: bool,

    /// Seed for the synthetic input generator.
    #[arg(long, default_value_t = 0xA5A5_A5A5_A5A5_A5A5)]
    pub seed: u64,

    /// Pin the worker thread to this CPU core (best-effort; a failure to pin
    /// is logged and does not abort the run).
    #[arg(long)]
    pub cpu: Option<usize>,
}

impl PaneAggOpts {
    /// The number of elements to draw per tick; `--input` if given, else `--slide`.
    pub fn input_size(&self) -> usize {
        self.input.unwrap_or(self.slide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults_with_no_flags() {
        let opts = PaneAggOpts::try_parse_from(["paneagg"]).unwrap();
        assert_eq!(opts.size, 1_048_576);
        assert_eq!(opts.slide, 1_024);
        assert_eq!(opts.r#type, ReductionKind::Sum);
        assert!(!opts.no_simd);
    }

    #[test]
    fn parses_explicit_flags() {
        let opts = PaneAggOpts::try_parse_from([
            "paneagg",
            "--size",
            "256",
            "--slide",
            "64",
            "--type",
            "min",
            "--no-simd",
            "--cpu",
            "3",
        ])
        .unwrap();
        assert_eq!(opts.size, 256);
        assert_eq!(opts.slide, 64);
        assert_eq!(opts.r#type, ReductionKind::Min);
        assert!(opts.no_simd);
        assert_eq!(opts.cpu, Some(3));
    }

    #[test]
    fn rejects_unknown_reduction_type() {
        assert!(PaneAggOpts::try_parse_from(["paneagg", "--type", "median"]).is_err());
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(PaneAggOpts::try_parse_from(["paneagg", "--bogus-flag"]).is_err());
    }

    #[test]
    fn input_size_defaults_to_slide() {
        let opts = PaneAggOpts::try_parse_from(["paneagg", "--slide", "128"]).unwrap();
        assert_eq!(opts.input_size(), 128);
    }

    #[test]
    fn input_size_honors_explicit_override() {
        let opts =
            PaneAggOpts::try_parse_from(["paneagg", "--slide", "128", "--input", "32"]).unwrap();
        assert_eq!(opts.input_size(), 32);
    }
}
