//! Chart granularity profiles
//!
//! The line chart renders one of four fixed sampling/display profiles.
//! Each profile carries three constants: the minimum elapsed time between
//! retained samples, the vertical half-range used to center the price
//! axis, and the horizontal time span the renderer shows.
//!
//! The set is fixed at compile time and not runtime-configurable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supported chart granularities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Granularity {
    /// 1 second
    S1,
    /// 15 seconds
    S15,
    /// 30 seconds
    S30,
    /// 60 seconds
    S60,
}

impl Granularity {
    /// Minimum elapsed time between retained samples, in milliseconds.
    pub fn sampling_interval_ms(&self) -> i64 {
        match self {
            Granularity::S1 => 1_000,
            Granularity::S15 => 15_000,
            Granularity::S30 => 30_000,
            Granularity::S60 => 60_000,
        }
    }

    /// Vertical half-range around the center price, in currency units.
    pub fn half_range(&self) -> Decimal {
        match self {
            Granularity::S1 => Decimal::from(300),
            Granularity::S15 => Decimal::from(500),
            Granularity::S30 => Decimal::from(700),
            Granularity::S60 => Decimal::from(1_000),
        }
    }

    /// Horizontal time span shown by the renderer, in milliseconds.
    pub fn window_ms(&self) -> i64 {
        match self {
            Granularity::S1 => 15_000,
            Granularity::S15 => 60_000,
            Granularity::S30 => 120_000,
            Granularity::S60 => 300_000,
        }
    }

    /// Toggle caption used by the chart header.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::S1 => "1s",
            Granularity::S15 => "15s",
            Granularity::S30 => "30s",
            Granularity::S60 => "60s",
        }
    }

    /// All granularities, coarsest last.
    pub fn all() -> &'static [Granularity] {
        &[
            Granularity::S1,
            Granularity::S15,
            Granularity::S30,
            Granularity::S60,
        ]
    }
}
