//! Net-present values of annual quantities
//!
//! A series is first discounted value-by-value to a reference year,
//!
//! $$ x_d(y) = \frac{x(y)}{(1 + r)^{y - y_{ref}}} $$
//!
//! and then averaged over an interval. Between two reported years the missing
//! annual values are linearly interpolated and discounted again relative to
//! the earlier year, which collapses into two weights $w_1(r, \Delta t)$ and
//! $w_2(r, \Delta t)$ applied to the values at both ends of the segment:
//!
//! $$ NPV = \frac{1}{N} \left( \sum_{segments} w_1 x_d(y_0) + w_2 x_d(y_1) + x_d(y_{last}) \right) $$
//!
//! Two conventions are supported. With annual compounding
//!
//! $$ w_1 = \sum_{i=1}^{\Delta t - 1} (1 + r)^{-i} \left(1 - \frac{i}{\Delta t}\right), \quad
//!    w_2 = \sum_{i=1}^{\Delta t} (1 + r)^{\Delta t - i} \frac{i}{\Delta t} $$
//!
//! and with continuous compounding
//!
//! $$ w_1 = \frac{1}{r} - \frac{1 - e^{-r \Delta t}}{r^2 \Delta t}, \quad
//!    w_2 = -\frac{1}{r} + \frac{e^{r \Delta t} - 1}{r^2 \Delta t} $$
//!
//! Without discounting both conventions average a constant series to itself.

use crate::cumulative::interval_points;
use log::debug;
use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::timeseries::{FloatValue, Timeseries, Year};
use std::collections::HashMap;

/// Rates closer to zero than this use the series expansion of the continuous weights
const CONTINUOUS_RATE_EPSILON: FloatValue = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compounding {
    Annual,
    Continuous,
}

impl Compounding {
    /// Segment weights `(w1, w2)` for a discount rate and segment length
    pub fn weights(&self, rate: FloatValue, dt: Year) -> (FloatValue, FloatValue) {
        let n = dt as FloatValue;
        match self {
            Compounding::Annual => {
                let w1: FloatValue = (1..dt)
                    .map(|i| (1.0 + rate).powi(-i) * (1.0 - i as FloatValue / n))
                    .sum();
                let w2: FloatValue = (1..=dt)
                    .map(|i| (1.0 + rate).powi(dt - i) * (i as FloatValue / n))
                    .sum();
                (w1, w2)
            }
            Compounding::Continuous if rate.abs() < CONTINUOUS_RATE_EPSILON => {
                let correction = rate * n * n / 6.0;
                (n / 2.0 - correction, n / 2.0 + correction)
            }
            Compounding::Continuous => {
                let w1 = 1.0 / rate - (1.0 - (-rate * n).exp()) / (rate * rate * n);
                let w2 = -1.0 / rate + ((rate * n).exp() - 1.0) / (rate * rate * n);
                (w1, w2)
            }
        }
    }
}

/// Memoised segment weights
///
/// Weights only depend on the convention, the rate and the segment length, so
/// a single cache can be shared across all scenarios of a run.
#[derive(Debug, Clone, Default)]
pub struct WeightCache {
    weights: HashMap<(Compounding, u64, Year), (FloatValue, FloatValue)>,
}

impl WeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(
        &mut self,
        compounding: Compounding,
        rate: FloatValue,
        dt: Year,
    ) -> (FloatValue, FloatValue) {
        *self
            .weights
            .entry((compounding, rate.to_bits(), dt))
            .or_insert_with(|| {
                debug!(
                    "Computing {:?} weights for rate {} and segment length {}",
                    compounding, rate, dt
                );
                compounding.weights(rate, dt)
            })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Discount every value of `ts` to `discount_year` using an annual rate
pub fn discount(ts: &Timeseries, rate: FloatValue, discount_year: Year) -> Timeseries {
    ts.map_values(|year, value| value / (1.0 + rate).powi(year - discount_year))
}

/// Average net-present value of an already discounted series
///
/// Fails with [`SR15Error::OutOfDomain`](sr15_core::errors::SR15Error::OutOfDomain)
/// if the series does not cover both ends of the interval.
pub fn npv_weighted(
    ts: &Timeseries,
    first_year: Year,
    last_year: Year,
    rate: FloatValue,
    compounding: Compounding,
    cache: &mut WeightCache,
) -> SR15Result<FloatValue> {
    let points = interval_points(ts, first_year, last_year)?;

    let mut value = 0.0;
    for pair in points.windows(2) {
        let ((yr, x_yr), (next_yr, x_next)) = (pair[0], pair[1]);
        let (w1, w2) = cache.weights(compounding, rate, next_yr - yr);
        value += w1 * x_yr + w2 * x_next;
    }
    let (_, x_last) = points[points.len() - 1];
    value += x_last;

    Ok(value / (last_year - first_year + 1) as FloatValue)
}
