//! Scalar functions of time and position (heat-flux sources, ambient
//! temperatures).

use std::fmt;

use px_core::numeric::Vec3;

use crate::error::{ThermalError, ThermalResult};

/// f(t, x) evaluated once per quadrature point.
pub trait ScalarFunction: Send + Sync + fmt::Debug {
    fn value(&self, time: f64, position: &Vec3) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantFunction(pub f64);

impl ScalarFunction for ConstantFunction {
    fn value(&self, _time: f64, _position: &Vec3) -> f64 {
        self.0
    }
}

/// Piecewise-linear function of time, held constant outside its breakpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct PiecewiseLinear {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl PiecewiseLinear {
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> ThermalResult<Self> {
        if times.is_empty() || times.len() != values.len() {
            return Err(ThermalError::InvalidArg {
                what: format!(
                    "piecewise linear function needs matching non-empty columns (got {} times, {} values)",
                    times.len(),
                    values.len()
                ),
            });
        }
        if times.iter().chain(&values).any(|x| !x.is_finite()) {
            return Err(ThermalError::InvalidArg {
                what: "piecewise linear function contains non-finite values".to_string(),
            });
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ThermalError::InvalidArg {
                what: "piecewise linear times must be strictly increasing".to_string(),
            });
        }
        Ok(Self { times, values })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn at(&self, time: f64) -> f64 {
        let last = self.times.len() - 1;
        if time <= self.times[0] {
            return self.values[0];
        }
        if time >= self.times[last] {
            return self.values[last];
        }
        let idx = self.times.partition_point(|&t| t < time);
        let (t0, t1) = (self.times[idx - 1], self.times[idx]);
        let (v0, v1) = (self.values[idx - 1], self.values[idx]);
        v0 + (v1 - v0) * (time - t0) / (t1 - t0)
    }
}

impl ScalarFunction for PiecewiseLinear {
    fn value(&self, time: f64, _position: &Vec3) -> f64 {
        self.at(time)
    }
}
