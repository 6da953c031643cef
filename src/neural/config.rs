use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::activations::Activations;
use crate::prelude::*;

/// Shape of a fully-connected input/hidden/output network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_count: usize,
    pub output_count: usize,
    #[serde(default = "default_hidden_layers")]
    pub hidden_layers: usize,
    pub hidden_width: usize,
    #[serde(default)]
    pub activation: Activations,
    /// Range initial weights are drawn from uniformly
    #[serde(default = "default_init_range")]
    pub init_range: RangeInclusive<f64>,
}

fn default_hidden_layers() -> usize {
    1
}

fn default_init_range() -> RangeInclusive<f64> {
    -1.0..=1.0
}

impl NetworkConfig {
    /// One hidden layer of `hidden_count` neurons, sigmoid everywhere.
    pub fn new(input_count: usize, output_count: usize, hidden_count: usize) -> Self {
        Self {
            input_count,
            output_count,
            hidden_layers: default_hidden_layers(),
            hidden_width: hidden_count,
            activation: Activations::default(),
            init_range: default_init_range(),
        }
    }

    pub fn with_hidden_layers(mut self, hidden_layers: usize, hidden_width: usize) -> Self {
        self.hidden_layers = hidden_layers;
        self.hidden_width = hidden_width;
        self
    }

    pub fn with_activation(mut self, activation: Activations) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_init_range(mut self, init_range: RangeInclusive<f64>) -> Self {
        self.init_range = init_range;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_count == 0 || self.output_count == 0 || self.hidden_width == 0 {
            return Err(Error::TopologyErr(format!(
                "every layer needs at least one neuron, got {} input, {} hidden, {} output",
                self.input_count, self.hidden_width, self.output_count
            )));
        }
        if self.hidden_layers != 1 {
            return Err(Error::TopologyErr(format!(
                "exactly one hidden layer is supported, got {}",
                self.hidden_layers
            )));
        }
        let (lo, hi) = (*self.init_range.start(), *self.init_range.end());
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(Error::TopologyErr(format!(
                "invalid initial weight range {lo}..={hi}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_forms() {
        let three = NetworkConfig::new(2, 1, 4);
        assert_eq!(three.hidden_layers, 1);
        assert_eq!(three.hidden_width, 4);
        assert_eq!(three.activation, Activations::Sigmoid);

        let four = NetworkConfig::new(2, 1, 1).with_hidden_layers(1, 3);
        assert_eq!(four.hidden_width, 3);

        let five = four.clone().with_activation(Activations::Tanh);
        assert_eq!(five.activation, Activations::Tanh);
        assert!(five.validate().is_ok());
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            NetworkConfig::new(0, 1, 2).validate(),
            Err(Error::TopologyErr(_))
        ));
        assert!(matches!(
            NetworkConfig::new(2, 1, 2).with_hidden_layers(2, 3).validate(),
            Err(Error::TopologyErr(_))
        ));
        assert!(matches!(
            NetworkConfig::new(2, 1, 2)
                .with_init_range(1.0..=-1.0)
                .validate(),
            Err(Error::TopologyErr(_))
        ));
    }
}
