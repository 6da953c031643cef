use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use super::activations::Activation;

/// Index of a neuron in its network's neuron arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId(pub(crate) usize);

/// Index of a synapse in its network's synapse arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SynapseId(pub(crate) usize);

impl NeuronId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl SynapseId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Input,
    Hidden,
    Output,
}

impl Layer {
    /// The layer a neuron of this layer may send synapses to.
    pub fn next(self) -> Option<Layer> {
        match self {
            Layer::Input => Some(Layer::Hidden),
            Layer::Hidden => Some(Layer::Output),
            Layer::Output => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Input => "input",
            Layer::Hidden => "hidden",
            Layer::Output => "output",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct Neuron {
    layer: Layer,
    activation: Arc<dyn Activation>,
    pub(crate) value: f64,
    pub(crate) error: f64,
    pub(crate) inputs: Vec<SynapseId>,
    pub(crate) outputs: Vec<SynapseId>,
}

impl Neuron {
    pub(crate) fn new(layer: Layer, activation: Arc<dyn Activation>) -> Self {
        Self {
            layer,
            activation,
            value: 0.0,
            error: 0.0,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn activation(&self) -> &Arc<dyn Activation> {
        &self.activation
    }

    /// Activation computed by the last forward pass (the raw input for input neurons)
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Error term computed by the last backpropagation pass
    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn inputs(&self) -> &[SynapseId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[SynapseId] {
        &self.outputs
    }

    /// Applies this neuron's activation function to a weighted sum and stores the result.
    pub(crate) fn activate(&mut self, weighted_sum: f64) -> f64 {
        self.value = self.activation.call(weighted_sum);
        self.value
    }

    /// Stores `upstream * f'(value)` as this neuron's error term.
    ///
    /// `upstream` is `target - value` for output neurons and the error-weighted
    /// sum over outgoing synapses for hidden neurons.
    pub(crate) fn set_error(&mut self, upstream: f64) -> f64 {
        self.error = upstream * self.activation.derivative(self.value);
        self.error
    }
}

impl fmt::Debug for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neuron")
            .field("layer", &self.layer)
            .field("value", &self.value)
            .field("error", &self.error)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synapse {
    source: NeuronId,
    destination: NeuronId,
    pub(crate) weight: f64,
    pub(crate) signal: f64,
    pub(crate) delta: f64,
}

impl Synapse {
    pub(crate) fn new(source: NeuronId, destination: NeuronId, weight: f64) -> Self {
        Self {
            source,
            destination,
            weight,
            signal: 0.0,
            delta: 0.0,
        }
    }

    pub fn source(&self) -> NeuronId {
        self.source
    }

    pub fn destination(&self) -> NeuronId {
        self.destination
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Value carried from the source neuron on the last forward pass
    pub fn signal(&self) -> f64 {
        self.signal
    }

    /// Weight change applied on the last training step
    pub fn delta(&self) -> f64 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::activations::Activations;

    #[test]
    fn layer_order() {
        assert_eq!(Layer::Input.next(), Some(Layer::Hidden));
        assert_eq!(Layer::Hidden.next(), Some(Layer::Output));
        assert_eq!(Layer::Output.next(), None);
    }

    #[test]
    fn neuron_activation_and_error() {
        let mut neuron = Neuron::new(Layer::Output, Arc::new(Activations::Sigmoid));

        assert_eq!(neuron.activate(0.0), 0.5);
        assert_eq!(neuron.set_error(1.0 - 0.5), 0.5 * 0.25);
        assert_eq!(neuron.error(), 0.125);
    }
}
