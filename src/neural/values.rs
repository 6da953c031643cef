use std::{
    fmt,
    ops::{Deref, Index},
};

use serde::{Deserialize, Serialize};

/// An ordered list of reals fed to, or read from, one layer of a network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValuesList(Vec<f64>);

impl ValuesList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for ValuesList {
    type Target = [f64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Index<usize> for ValuesList {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<f64>> for ValuesList {
    fn from(value: Vec<f64>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[f64; N]> for ValuesList {
    fn from(value: [f64; N]) -> Self {
        Self(value.to_vec())
    }
}

impl From<&[f64]> for ValuesList {
    fn from(value: &[f64]) -> Self {
        Self(value.to_vec())
    }
}

impl FromIterator<f64> for ValuesList {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValuesList {
    type Item = f64;
    type IntoIter = std::vec::IntoIter<f64>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValuesList {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValuesList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

/// One training example: the inputs and the outputs the network should produce for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub inputs: ValuesList,
    pub targets: ValuesList,
}

impl Sample {
    pub fn new(inputs: impl Into<ValuesList>, targets: impl Into<ValuesList>) -> Self {
        Self {
            inputs: inputs.into(),
            targets: targets.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_read() {
        let mut values = ValuesList::new();
        values.push(1.0);
        values.push(0.25);

        assert_eq!(values.len(), 2);
        assert_eq!(values[1], 0.25);
        assert_eq!(values, ValuesList::from([1.0, 0.25]));
        assert_eq!(values.iter().sum::<f64>(), 1.25);
    }

    #[test]
    fn display() {
        let values: ValuesList = [0.5, -1.0].into_iter().collect();
        assert_eq!(values.to_string(), "[0.5, -1]");
        assert_eq!(ValuesList::new().to_string(), "[]");
    }
}
