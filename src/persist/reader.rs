use std::io::Read;

use csv::{StringRecord, StringRecordsIntoIter};
use tracing::debug;

use super::CsvFormat;
use crate::{
    neural::{config::NetworkConfig, values::ValuesList, NeuralNetwork},
    prelude::*,
};

#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    format: CsvFormat,
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

fn next_record<R: Read>(records: &mut StringRecordsIntoIter<R>) -> Result<Option<StringRecord>> {
    Ok(records.next().transpose()?)
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: CsvFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &CsvFormat {
        &self.format
    }

    /// Records of `reader` with surrounding whitespace trimmed from every field.
    /// Empty lines produce no record.
    pub fn records<R: Read>(&self, reader: R) -> Result<StringRecordsIntoIter<R>> {
        Ok(self.format.reader_builder()?.from_reader(reader).into_records())
    }

    /// Builds a fully-connected network from its layer sizes and weight blocks.
    ///
    /// Both blocks are read and checked against the header before the
    /// network is allocated.
    pub fn read_network<R: Read>(&self, reader: R) -> Result<NeuralNetwork> {
        let mut records = self.records(reader)?;

        let header = next_record(&mut records)?
            .ok_or_else(|| Error::TopologyErr("missing layer sizes header".to_string()))?;
        if header.len() != 3 {
            return Err(Error::TopologyErr(format!(
                "header needs three layer sizes (input, hidden, output), got {} fields",
                header.len()
            )));
        }
        let mut sizes = [0usize; 3];
        for (size, field) in sizes.iter_mut().zip(header.iter()) {
            *size = field.parse().map_err(|_| {
                Error::TopologyErr(format!("layer size '{field}' is not a count"))
            })?;
        }
        let [inputs, hidden, outputs] = sizes;

        let config = NetworkConfig::new(inputs, outputs, hidden);
        config.validate()?;

        let input_weights = read_block(&mut records, inputs, hidden, "input")?;
        let output_weights = read_block(&mut records, outputs, hidden, "output")?;

        let mut net = NeuralNetwork::new(&config)?;
        net.set_input_weights(&input_weights)?;
        net.set_output_weights(&output_weights)?;

        debug!(inputs, hidden, outputs, "read network weights");
        Ok(net)
    }

    pub fn parse_network(&self, text: &str) -> Result<NeuralNetwork> {
        self.read_network(text.as_bytes())
    }
}

/// Reads `count` weight lines of `width` weights each.
fn read_block<R: Read>(
    records: &mut StringRecordsIntoIter<R>,
    count: usize,
    width: usize,
    layer: &str,
) -> Result<Vec<ValuesList>> {
    // grows with the lines actually present, not with the header's claim
    let mut lists = Vec::new();
    while lists.len() < count {
        let record = next_record(records)?.ok_or_else(|| {
            Error::FormatErr(format!(
                "expected {count} {layer} weight lines, found {}",
                lists.len()
            ))
        })?;
        if is_blank(&record) {
            continue;
        }
        lists.push(parse_weights(&record, width, layer, lists.len())?);
    }
    Ok(lists)
}

fn parse_weights(
    record: &StringRecord,
    width: usize,
    layer: &str,
    neuron: usize,
) -> Result<ValuesList> {
    let mut len = record.len();
    if len.checked_sub(1) == Some(width) && record.get(width) == Some("") {
        len = width;
    }
    if len != width {
        return Err(Error::FormatErr(format!(
            "{layer} neuron {neuron} needs {width} weights, got {len}"
        )));
    }
    record
        .iter()
        .take(len)
        .map(|f| {
            f.parse::<f64>().map_err(|_| {
                Error::FormatErr(format!(
                    "weight '{f}' of {layer} neuron {neuron} is not a number"
                ))
            })
        })
        .collect()
}
