pub mod activations;
pub mod config;
pub mod graph;
pub mod optimizer;
pub mod values;

use crate::prelude::*;
use std::{fmt, ops::RangeInclusive, sync::Arc};

use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use tracing::debug;

use self::{
    activations::{Activation, Activations},
    config::NetworkConfig,
    graph::{Layer, Neuron, NeuronId, Synapse, SynapseId},
    values::{Sample, ValuesList},
};

/// Range a synapse weight is drawn from when `connect` picks it.
pub const DEFAULT_INIT_RANGE: RangeInclusive<f64> = -1.0..=1.0;

/// A feed-forward network with one input, one hidden and one output layer.
///
/// Neurons and synapses live in two arenas owned by the network and refer to
/// each other by index. Synapses only ever run input -> hidden or
/// hidden -> output, so the graph cannot contain a cycle.
#[derive(Clone)]
pub struct NeuralNetwork {
    activation: Arc<dyn Activation>,
    neurons: Vec<Neuron>,
    synapses: Vec<Synapse>,
    input: Vec<NeuronId>,
    hidden: Vec<NeuronId>,
    output: Vec<NeuronId>,
}

impl Default for NeuralNetwork {
    fn default() -> Self {
        Self::empty(Activations::Sigmoid)
    }
}

impl NeuralNetwork {
    /// Creates a network without neurons. Neurons added through
    /// `add_*_neuron` share `activation`.
    pub fn empty(activation: impl Activation + 'static) -> Self {
        Self::empty_shared(Arc::new(activation))
    }

    pub fn empty_shared(activation: Arc<dyn Activation>) -> Self {
        Self {
            activation,
            neurons: Vec::new(),
            synapses: Vec::new(),
            input: Vec::new(),
            hidden: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Builds fully-connected layers as described by `config`, weights drawn from the thread rng.
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Result<Self> {
        Self::fully_connected(config, Arc::new(config.activation), rng)
    }

    /// Like `with_rng`, but every neuron uses `activation` instead of `config.activation`.
    pub fn fully_connected<R: Rng + ?Sized>(
        config: &NetworkConfig,
        activation: Arc<dyn Activation>,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;

        let die = Uniform::from(config.init_range.clone());
        let mut net = Self::empty_shared(activation);

        let inputs: Vec<_> = (0..config.input_count)
            .map(|_| net.add_input_neuron())
            .collect();
        let hidden: Vec<_> = (0..config.hidden_width)
            .map(|_| net.add_hidden_neuron())
            .collect();
        let outputs: Vec<_> = (0..config.output_count)
            .map(|_| net.add_output_neuron())
            .collect();

        // every pair is adjacent and new, so the checks in `connect_with_weight` are skipped
        for &h in &hidden {
            for &i in &inputs {
                net.link(i, h, die.sample(rng));
            }
        }
        for &o in &outputs {
            for &h in &hidden {
                net.link(h, o, die.sample(rng));
            }
        }

        debug!(
            inputs = config.input_count,
            hidden = config.hidden_width,
            outputs = config.output_count,
            synapses = net.synapses.len(),
            "built fully-connected network"
        );
        Ok(net)
    }

    /// Adds a neuron with its own activation function to `layer`.
    pub fn add_neuron(&mut self, layer: Layer, activation: Arc<dyn Activation>) -> NeuronId {
        let id = NeuronId(self.neurons.len());
        self.neurons.push(Neuron::new(layer, activation));
        match layer {
            Layer::Input => self.input.push(id),
            Layer::Hidden => self.hidden.push(id),
            Layer::Output => self.output.push(id),
        }
        id
    }

    pub fn add_input_neuron(&mut self) -> NeuronId {
        self.add_neuron(Layer::Input, self.activation.clone())
    }

    pub fn add_hidden_neuron(&mut self) -> NeuronId {
        self.add_neuron(Layer::Hidden, self.activation.clone())
    }

    pub fn add_output_neuron(&mut self) -> NeuronId {
        self.add_neuron(Layer::Output, self.activation.clone())
    }

    /// Connects `source` to `destination` with a weight drawn uniformly from `DEFAULT_INIT_RANGE`.
    pub fn connect<R: Rng + ?Sized>(
        &mut self,
        source: NeuronId,
        destination: NeuronId,
        rng: &mut R,
    ) -> Result<SynapseId> {
        let weight = rng.gen_range(DEFAULT_INIT_RANGE);
        self.connect_with_weight(source, destination, weight)
    }

    /// Appends a synapse to `source`'s outgoing list and `destination`'s incoming list.
    pub fn connect_with_weight(
        &mut self,
        source: NeuronId,
        destination: NeuronId,
        weight: f64,
    ) -> Result<SynapseId> {
        let src_layer = self.get(source)?.layer();
        let dst_layer = self.get(destination)?.layer();

        if src_layer.next() != Some(dst_layer) {
            return Err(Error::TopologyErr(format!(
                "cannot connect {src_layer} neuron {} to {dst_layer} neuron {}",
                source.0, destination.0
            )));
        }
        if self.neurons[source.0]
            .outputs
            .iter()
            .any(|s| self.synapses[s.0].destination() == destination)
        {
            return Err(Error::TopologyErr(format!(
                "neurons {} and {} are already connected",
                source.0, destination.0
            )));
        }

        Ok(self.link(source, destination, weight))
    }

    fn link(&mut self, source: NeuronId, destination: NeuronId, weight: f64) -> SynapseId {
        let id = SynapseId(self.synapses.len());
        self.synapses.push(Synapse::new(source, destination, weight));
        self.neurons[source.0].outputs.push(id);
        self.neurons[destination.0].inputs.push(id);
        id
    }

    fn get(&self, id: NeuronId) -> Result<&Neuron> {
        self.neurons
            .get(id.0)
            .ok_or_else(|| Error::TopologyErr(format!("no neuron {} in this network", id.0)))
    }

    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.neurons.get(id.0)
    }

    pub fn synapse(&self, id: SynapseId) -> Option<&Synapse> {
        self.synapses.get(id.0)
    }

    /// Neurons of `layer` in the order they were added
    pub fn layer(&self, layer: Layer) -> &[NeuronId] {
        match layer {
            Layer::Input => &self.input,
            Layer::Hidden => &self.hidden,
            Layer::Output => &self.output,
        }
    }

    /// Returns (input, hidden, output) neuron counts
    pub fn layer_sizes(&self) -> (usize, usize, usize) {
        (self.input.len(), self.hidden.len(), self.output.len())
    }

    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    pub fn set_weight(&mut self, id: SynapseId, weight: f64) -> Result<()> {
        let synapse = self
            .synapses
            .get_mut(id.0)
            .ok_or_else(|| Error::TopologyErr(format!("no synapse {} in this network", id.0)))?;
        synapse.weight = weight;
        Ok(())
    }

    /// Reset every weight to a uniformly random value in `r`
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        r: RangeInclusive<f64>,
        rng: &mut R,
    ) -> Result<()> {
        let (lo, hi) = (*r.start(), *r.end());
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(Error::TopologyErr(format!(
                "invalid weight range {lo}..={hi}"
            )));
        }
        let die = Uniform::from(r);
        for synapse in self.synapses.iter_mut() {
            synapse.weight = die.sample(rng);
        }
        Ok(())
    }

    fn check_len(values: &[f64], layer: &[NeuronId]) -> Result<()> {
        if values.len() != layer.len() {
            return Err(Error::DimensionErr {
                expected: layer.len(),
                actual: values.len(),
            });
        }
        Ok(())
    }

    /// Propagates `inputs` through the network and returns the output layer's activations.
    pub fn calculate_outputs(&mut self, inputs: &ValuesList) -> Result<ValuesList> {
        Self::check_len(inputs, &self.input)?;
        self.forward(inputs);
        Ok(self.output_values())
    }

    fn output_values(&self) -> ValuesList {
        self.output
            .iter()
            .map(|id| self.neurons[id.0].value)
            .collect()
    }

    fn forward(&mut self, inputs: &[f64]) {
        // raw inputs, no activation function
        for (&id, &x) in self.input.iter().zip(inputs) {
            self.neurons[id.0].value = x;
        }
        for k in 0..self.hidden.len() {
            let id = self.hidden[k];
            self.fire(id);
        }
        for k in 0..self.output.len() {
            let id = self.output[k];
            self.fire(id);
        }
    }

    /// Sums weight * source activation over the incoming synapses of `id` and activates it.
    fn fire(&mut self, id: NeuronId) -> f64 {
        let mut sum = 0.0;
        for s in &self.neurons[id.0].inputs {
            let synapse = &mut self.synapses[s.0];
            synapse.signal = self.neurons[synapse.source().0].value;
            sum += synapse.weight * synapse.signal;
        }
        self.neurons[id.0].activate(sum)
    }

    /// Performs one step of stochastic gradient descent on a single example.
    ///
    /// All error terms are computed from the pre-update weights before any
    /// weight changes, so the step is the exact gradient of the squared error
    /// for this example.
    pub fn back_propagation(
        &mut self,
        inputs: &ValuesList,
        targets: &ValuesList,
        learning_rate: f64,
    ) -> Result<()> {
        Self::check_len(inputs, &self.input)?;
        Self::check_len(targets, &self.output)?;

        self.forward(inputs);

        for (&id, &target) in self.output.iter().zip(targets.iter()) {
            let neuron = &mut self.neurons[id.0];
            neuron.set_error(target - neuron.value);
        }

        for &id in &self.hidden {
            let upstream: f64 = self.neurons[id.0]
                .outputs
                .iter()
                .map(|s| {
                    let synapse = &self.synapses[s.0];
                    self.neurons[synapse.destination().0].error * synapse.weight
                })
                .sum();
            self.neurons[id.0].set_error(upstream);
        }

        for synapse in self.synapses.iter_mut() {
            let error = self.neurons[synapse.destination().0].error;
            synapse.delta = learning_rate * error * synapse.signal;
            synapse.weight += synapse.delta;
        }
        Ok(())
    }

    /// Mean-squared error over a set of samples
    pub fn mean_squared_error(&mut self, samples: &[Sample]) -> Result<f64> {
        let mut sum = 0.0;
        let mut count = 0;
        for sample in samples {
            Self::check_len(&sample.targets, &self.output)?;
            let outputs = self.calculate_outputs(&sample.inputs)?;
            for (o, t) in outputs.iter().zip(sample.targets.iter()) {
                let diff = o - t;
                sum += diff * diff;
            }
            count += outputs.len();
        }
        if count == 0 {
            return Ok(0.0);
        }
        Ok(sum / count as f64)
    }

    /// Outgoing weights of every input neuron, in synapse order
    pub fn input_weights(&self) -> Vec<ValuesList> {
        self.input
            .iter()
            .map(|id| self.weights(&self.neurons[id.0].outputs))
            .collect()
    }

    /// Incoming weights of every output neuron, in synapse order
    pub fn output_weights(&self) -> Vec<ValuesList> {
        self.output
            .iter()
            .map(|id| self.weights(&self.neurons[id.0].inputs))
            .collect()
    }

    fn weights(&self, synapses: &[SynapseId]) -> ValuesList {
        synapses.iter().map(|s| self.synapses[s.0].weight).collect()
    }

    /// Overwrites the outgoing weights of every input neuron. Nothing changes on error.
    pub fn set_input_weights(&mut self, weights: &[ValuesList]) -> Result<()> {
        let lists: Vec<_> = self
            .input
            .iter()
            .map(|id| self.neurons[id.0].outputs.clone())
            .collect();
        self.assign_weights(Layer::Input, &lists, weights)
    }

    /// Overwrites the incoming weights of every output neuron. Nothing changes on error.
    pub fn set_output_weights(&mut self, weights: &[ValuesList]) -> Result<()> {
        let lists: Vec<_> = self
            .output
            .iter()
            .map(|id| self.neurons[id.0].inputs.clone())
            .collect();
        self.assign_weights(Layer::Output, &lists, weights)
    }

    fn assign_weights(
        &mut self,
        layer: Layer,
        synapses: &[Vec<SynapseId>],
        weights: &[ValuesList],
    ) -> Result<()> {
        if synapses.len() != weights.len() {
            return Err(Error::FormatErr(format!(
                "expected weights for {} {layer} neurons, got {}",
                synapses.len(),
                weights.len()
            )));
        }
        for (n, (ids, ws)) in synapses.iter().zip(weights).enumerate() {
            if ids.len() != ws.len() {
                return Err(Error::FormatErr(format!(
                    "{layer} neuron {n} has {} synapses, got {} weights",
                    ids.len(),
                    ws.len()
                )));
            }
        }

        for (ids, ws) in synapses.iter().zip(weights) {
            for (s, &w) in ids.iter().zip(ws.iter()) {
                self.synapses[s.0].weight = w;
            }
        }
        Ok(())
    }
}

impl fmt::Display for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (i, h, o) = self.layer_sizes();
        writeln!(f, "NeuralNetwork {i}-{h}-{o}")?;
        for layer in [Layer::Input, Layer::Hidden, Layer::Output] {
            for (k, id) in self.layer(layer).iter().enumerate() {
                let neuron = &self.neurons[id.0];
                write!(f, "  {layer}[{k}] value={} error={}", neuron.value, neuron.error)?;
                if !neuron.inputs.is_empty() {
                    write!(f, " in={}", self.weights(&neuron.inputs))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeuralNetwork")
            .field("neurons", &self.neurons)
            .field("synapses", &self.synapses)
            .field("input", &self.input)
            .field("hidden", &self.hidden)
            .field("output", &self.output)
            .finish()
    }
}
