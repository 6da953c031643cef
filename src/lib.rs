//! A small feed-forward neural network engine.
//!
//! A [`NeuralNetwork`](neural::NeuralNetwork) holds an input, a hidden and an
//! output layer of neurons joined by weighted synapses. It is evaluated with
//! `calculate_outputs` and trained one example at a time with
//! `back_propagation` (plain stochastic gradient descent). Trained weights can
//! be written to and read back from a CSV text format through [`persist`].
//!
//! ```
//! use layered_nn::neural::{config::NetworkConfig, values::ValuesList, NeuralNetwork};
//!
//! let mut net = NeuralNetwork::new(&NetworkConfig::new(2, 1, 3)).unwrap();
//! let inputs = ValuesList::from([1.0, 0.0]);
//!
//! net.back_propagation(&inputs, &ValuesList::from([1.0]), 0.9).unwrap();
//! let outputs = net.calculate_outputs(&inputs).unwrap();
//! assert_eq!(outputs.len(), 1);
//! ```

pub mod neural;
pub mod persist;
pub mod prelude;
