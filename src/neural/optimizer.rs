use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    neural::{values::Sample, NeuralNetwork},
    prelude::*,
};

/// Online stochastic gradient descent: one randomly drawn sample per
/// iteration, for a fixed number of iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimizer {
    iterations: usize,
    rate: f64,
    #[serde(default)]
    iterations_per_log: Option<usize>,
}

impl Optimizer {
    pub fn new(iterations: usize, rate: f64) -> Self {
        Self {
            iterations,
            rate,
            iterations_per_log: None,
        }
    }

    /// Logs the error every `iterations_per_log` iterations; `None` or `Some(0)` disables it.
    pub fn with_log(mut self, iterations_per_log: Option<usize>) -> Self {
        self.iterations_per_log = iterations_per_log;
        self
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn train<R: Rng + ?Sized>(
        &self,
        net: &mut NeuralNetwork,
        samples: &[Sample],
        rng: &mut R,
    ) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        self.train_with(net, samples, rng, |samples, rng| {
            samples[rng.gen_range(0..samples.len())].clone()
        })
    }

    /// Trains on samples produced by `draw` each iteration. `samples` is only
    /// used to report the error when logging is enabled.
    pub fn train_with<R, F>(
        &self,
        net: &mut NeuralNetwork,
        samples: &[Sample],
        rng: &mut R,
        mut draw: F,
    ) -> Result<()>
    where
        R: Rng + ?Sized,
        F: FnMut(&[Sample], &mut R) -> Sample,
    {
        for i in 0..self.iterations {
            let sample = draw(samples, rng);
            net.back_propagation(&sample.inputs, &sample.targets, self.rate)?;

            if self.iterations_per_log.is_some_and(|ipl| ipl > 0 && i % ipl == 0) {
                let mse = net.mean_squared_error(samples)?;
                info!(iteration = i, error = mse, "training");
            }
        }
        Ok(())
    }
}
