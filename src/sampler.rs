//! Bucketed price sampler for the real-time line chart
//!
//! Consumes scalar price ticks and maintains, for each granularity, a
//! capped time-ordered series suitable for charting. All four series are
//! updated on every ingest so that switching granularity shows whatever
//! history has already accumulated; only the active one is rendered.
//!
//! Invariants per series:
//! - Timestamps strictly increase.
//! - Consecutive retained ticks are separated by at least the owning
//!   granularity's sampling interval (debouncing).
//! - At most [`SERIES_CAPACITY`] ticks are retained; the oldest is
//!   evicted first (rolling buffer, amortized O(1)).

use std::collections::{BTreeMap, VecDeque};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::feed::PriceUpdate;
use crate::granularity::Granularity;

/// Maximum retained ticks per granularity.
pub const SERIES_CAPACITY: usize = 50;

/// Axis center used when neither a live nor a base price is known yet.
pub const DEFAULT_CENTER_PRICE: i64 = 100_000;

/// One retained price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Observation time (Unix milliseconds).
    pub timestamp: i64,
    /// Observed price.
    pub price: Decimal,
}

/// Bounded FIFO of retained ticks for one granularity.
#[derive(Debug)]
pub struct Series {
    points: VecDeque<Tick>,
}

impl Series {
    fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(SERIES_CAPACITY),
        }
    }

    /// Timestamp of the most recently retained tick, if any.
    pub fn last_timestamp(&self) -> Option<i64> {
        self.points.back().map(|t| t.timestamp)
    }

    /// Number of retained ticks.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no ticks.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy of the retained ticks in chronological order.
    ///
    /// Renderers take a snapshot rather than holding a reference into
    /// the buffer across subsequent ingests.
    pub fn snapshot(&self) -> Vec<Tick> {
        self.points.iter().copied().collect()
    }

    fn push(&mut self, tick: Tick) {
        self.points.push_back(tick);
        while self.points.len() > SERIES_CAPACITY {
            self.points.pop_front();
        }
    }

    fn clear(&mut self) {
        self.points.clear();
    }
}

/// Compute the fixed vertical axis bounds for a granularity around a
/// center price.
///
/// Bounds are `center ± half_range`, with the minimum clamped to zero,
/// then rounded outward to the nearest 100 (min floored, max ceiled)
/// for display cleanliness. Pure function of its inputs.
pub fn axis_range(granularity: Granularity, center: Decimal) -> (Decimal, Decimal) {
    let half = granularity.half_range();
    let raw_min = (center - half).max(Decimal::ZERO);
    let raw_max = center + half;

    let hundred = Decimal::from(100);
    let min = (raw_min / hundred).floor() * hundred;
    let max = (raw_max / hundred).ceil() * hundred;
    (min, max)
}

/// Ingest statistics, reset together with the series on subject change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerStats {
    /// Ingest calls observed.
    pub ticks_observed: u64,
    /// Ingest calls skipped because no usable price was present.
    pub ticks_skipped: u64,
    /// Samples appended across all granularities.
    pub samples_accepted: u64,
}

/// Owns the per-granularity series and the chart-facing sampling state.
///
/// One instance per chart; the buffers are instance state, never shared
/// across charts, so concurrent chart instances cannot leak into each
/// other.
#[derive(Debug)]
pub struct ChartSampler {
    series: BTreeMap<Granularity, Series>,
    active: Granularity,
    subject: Option<String>,
    last_price: Option<Decimal>,
    stats: SamplerStats,
}

impl Default for ChartSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSampler {
    /// Create a sampler with empty series and the finest granularity
    /// active.
    pub fn new() -> Self {
        let mut series = BTreeMap::new();
        for &g in Granularity::all() {
            series.insert(g, Series::new());
        }
        Self {
            series,
            active: Granularity::S1,
            subject: None,
            last_price: None,
            stats: SamplerStats::default(),
        }
    }

    /// Ingest one observed price at time `now` (Unix milliseconds).
    ///
    /// A missing or non-positive price is a no-op (the feed uses absent
    /// and zero as its missing-value markers). Otherwise each
    /// granularity independently retains the tick iff its sampling
    /// interval has elapsed since the last retained tick; series beyond
    /// capacity evict from the front. O(1) per granularity.
    pub fn ingest(&mut self, price: Option<Decimal>, now: i64) {
        self.stats.ticks_observed += 1;

        let price = match price {
            Some(p) if p > Decimal::ZERO => p,
            _ => {
                self.stats.ticks_skipped += 1;
                return;
            }
        };

        self.last_price = Some(price);

        for (granularity, series) in &mut self.series {
            let due = match series.last_timestamp() {
                None => true,
                Some(last) => now - last >= granularity.sampling_interval_ms(),
            };
            if due {
                series.push(Tick {
                    timestamp: now,
                    price,
                });
                self.stats.samples_accepted += 1;
                trace!(
                    granularity = granularity.label(),
                    timestamp = now,
                    retained = series.len(),
                    "sample retained"
                );
            }
        }
    }

    /// Feed a decoded price-update frame into the sampler.
    pub fn apply_update(&mut self, update: &PriceUpdate, now: i64) {
        self.ingest(update.current_price, now);
    }

    /// Switch which series is rendered. Buffers are untouched; the newly
    /// active series shows whatever history it already accumulated.
    pub fn select_granularity(&mut self, granularity: Granularity) {
        self.active = granularity;
    }

    /// Currently rendered granularity.
    pub fn active(&self) -> Granularity {
        self.active
    }

    /// Set the subject (instrument code) this sampler tracks.
    ///
    /// Changing subject clears all four series, the live price, and the
    /// counters, guaranteeing no stale cross-subject data is displayed.
    /// Setting the same subject again is a no-op.
    pub fn set_subject(&mut self, code: &str) {
        if self.subject.as_deref() == Some(code) {
            return;
        }
        debug!(subject = code, "subject changed; clearing chart series");
        self.subject = Some(code.to_string());
        for series in self.series.values_mut() {
            series.clear();
        }
        self.last_price = None;
        self.stats = SamplerStats::default();
    }

    /// Subject currently tracked, if any.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Most recently accepted price, if any.
    pub fn last_price(&self) -> Option<Decimal> {
        self.last_price
    }

    /// Series for a granularity.
    pub fn series(&self, granularity: Granularity) -> &Series {
        // All four series are created in new() and never removed.
        &self.series[&granularity]
    }

    /// Snapshot of a granularity's series.
    pub fn snapshot(&self, granularity: Granularity) -> Vec<Tick> {
        self.series[&granularity].snapshot()
    }

    /// Snapshot of the active series.
    pub fn active_snapshot(&self) -> Vec<Tick> {
        self.snapshot(self.active)
    }

    /// Vertical axis bounds for the active granularity.
    ///
    /// Center fallback chain: last live price, then the caller's base
    /// price, then [`DEFAULT_CENTER_PRICE`].
    pub fn axis_bounds(&self, base_price: Option<Decimal>) -> (Decimal, Decimal) {
        let center = self
            .last_price
            .or(base_price)
            .unwrap_or_else(|| Decimal::from(DEFAULT_CENTER_PRICE));
        axis_range(self.active, center)
    }

    /// Ingest statistics since creation or the last subject change.
    pub fn stats(&self) -> SamplerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(p: i64) -> Option<Decimal> {
        Some(Decimal::from(p))
    }

    #[test]
    fn test_first_tick_retained_everywhere() {
        let mut sampler = ChartSampler::new();
        sampler.ingest(price(70_000), 1_000);

        for &g in Granularity::all() {
            assert_eq!(sampler.series(g).len(), 1);
        }
    }

    #[test]
    fn test_interval_debounce_per_granularity() {
        let mut sampler = ChartSampler::new();
        // One tick per second for 16 seconds.
        for i in 0..16 {
            sampler.ingest(price(70_000 + i), i * 1_000);
        }

        assert_eq!(sampler.series(Granularity::S1).len(), 16);
        // S15 keeps t=0 and t=15_000 only.
        assert_eq!(sampler.series(Granularity::S15).len(), 2);
        assert_eq!(sampler.series(Granularity::S30).len(), 1);
        assert_eq!(sampler.series(Granularity::S60).len(), 1);
    }

    #[test]
    fn test_equal_timestamp_dropped() {
        let mut sampler = ChartSampler::new();
        sampler.ingest(price(70_000), 5_000);
        sampler.ingest(price(70_100), 5_000);

        assert_eq!(sampler.series(Granularity::S1).len(), 1);
        let snap = sampler.snapshot(Granularity::S1);
        assert_eq!(snap[0].price, Decimal::from(70_000));
    }

    #[test]
    fn test_missing_price_is_noop() {
        let mut sampler = ChartSampler::new();
        sampler.ingest(None, 1_000);
        sampler.ingest(Some(Decimal::ZERO), 2_000);
        sampler.ingest(Some(Decimal::from(-50)), 3_000);

        for &g in Granularity::all() {
            assert!(sampler.series(g).is_empty());
        }
        assert_eq!(sampler.stats().ticks_skipped, 3);
        assert_eq!(sampler.last_price(), None);
    }

    #[test]
    fn test_capacity_eviction_is_rolling() {
        let mut sampler = ChartSampler::new();
        // 60 accepted S1 samples; only the last 50 survive.
        for i in 0..60 {
            sampler.ingest(price(70_000 + i), i * 1_000);
        }

        let snap = sampler.snapshot(Granularity::S1);
        assert_eq!(snap.len(), SERIES_CAPACITY);
        assert_eq!(snap.first().unwrap().timestamp, 10 * 1_000);
        assert_eq!(snap.last().unwrap().timestamp, 59 * 1_000);
        assert_eq!(snap.last().unwrap().price, Decimal::from(70_059));
    }

    #[test]
    fn test_axis_range_centering() {
        let (min, max) = axis_range(Granularity::S1, Decimal::from(10_000));
        assert_eq!(min, Decimal::from(9_700));
        assert_eq!(max, Decimal::from(10_300));

        // Off-round center: floor the min, ceil the max.
        let (min, max) = axis_range(Granularity::S60, Decimal::from(10_050));
        assert_eq!(min, Decimal::from(9_000));
        assert_eq!(max, Decimal::from(11_100));
    }

    #[test]
    fn test_axis_range_clamps_at_zero() {
        let (min, max) = axis_range(Granularity::S1, Decimal::from(100));
        assert_eq!(min, Decimal::ZERO);
        assert_eq!(max, Decimal::from(400));
    }

    #[test]
    fn test_axis_bounds_fallback_chain() {
        let mut sampler = ChartSampler::new();

        // Nothing known: hardcoded default center.
        let (min, max) = sampler.axis_bounds(None);
        assert_eq!(min, Decimal::from(99_700));
        assert_eq!(max, Decimal::from(100_300));

        // Base price known, no live price yet.
        let (min, _) = sampler.axis_bounds(Some(Decimal::from(50_000)));
        assert_eq!(min, Decimal::from(49_700));

        // Live price wins over base price.
        sampler.ingest(price(80_000), 1_000);
        let (min, _) = sampler.axis_bounds(Some(Decimal::from(50_000)));
        assert_eq!(min, Decimal::from(79_700));
    }

    #[test]
    fn test_select_granularity_keeps_history() {
        let mut sampler = ChartSampler::new();
        for i in 0..31 {
            sampler.ingest(price(70_000), i * 1_000);
        }

        sampler.select_granularity(Granularity::S15);
        assert_eq!(sampler.active(), Granularity::S15);
        // Accumulated while S1 was active: t=0, t=15_000, t=30_000.
        assert_eq!(sampler.active_snapshot().len(), 3);
    }

    #[test]
    fn test_subject_change_clears_all_series() {
        let mut sampler = ChartSampler::new();
        sampler.set_subject("005930");
        for i in 0..10 {
            sampler.ingest(price(70_000), i * 1_000);
        }
        for &g in Granularity::all() {
            assert!(!sampler.series(g).is_empty());
        }

        sampler.set_subject("000660");
        for &g in Granularity::all() {
            assert_eq!(sampler.series(g).len(), 0);
        }
        assert_eq!(sampler.last_price(), None);
        assert_eq!(sampler.stats(), SamplerStats::default());
    }

    #[test]
    fn test_same_subject_is_noop() {
        let mut sampler = ChartSampler::new();
        sampler.set_subject("005930");
        sampler.ingest(price(70_000), 1_000);

        sampler.set_subject("005930");
        assert_eq!(sampler.series(Granularity::S1).len(), 1);
    }
}
