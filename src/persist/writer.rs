use std::io::{self, Write};

use tracing::debug;

use super::CsvFormat;
use crate::{
    neural::{values::ValuesList, NeuralNetwork},
    prelude::*,
};

pub struct CsvWriter<W: Write> {
    inner: csv::Writer<W>,
    format: CsvFormat,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W) -> Result<Self> {
        Self::with_format(inner, CsvFormat::default())
    }

    pub fn with_format(inner: W, format: CsvFormat) -> Result<Self> {
        let inner = format.writer_builder()?.from_writer(inner);
        Ok(Self { inner, format })
    }

    pub fn format(&self) -> &CsvFormat {
        &self.format
    }

    /// Flushes buffered records and hands back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner().map_err(|err| {
            let cause = err.error();
            Error::IoErr(io::Error::new(cause.kind(), cause.to_string()))
        })
    }

    /// Writes one line of fields, quoting the ones that need it.
    pub fn write_record<I, T>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.inner.write_record(fields)?;
        Ok(())
    }

    /// Writes a bare line separator; an empty record would come out as `""`.
    pub fn write_blank_line(&mut self) -> Result<()> {
        self.inner.flush()?;
        self.inner
            .get_mut()
            .write_all(self.format.line_separator.as_bytes())?;
        Ok(())
    }

    fn write_weights(&mut self, weights: &ValuesList) -> Result<()> {
        self.write_record(weights.iter().map(|w| w.to_string()))
    }

    /// Writes the layer sizes followed by the input and output weight blocks.
    pub fn write_network(&mut self, net: &NeuralNetwork) -> Result<()> {
        let (inputs, hidden, outputs) = net.layer_sizes();
        self.write_record([inputs, hidden, outputs].map(|n| n.to_string()))?;

        self.write_blank_line()?;
        for weights in net.input_weights() {
            self.write_weights(&weights)?;
        }

        self.write_blank_line()?;
        for weights in net.output_weights() {
            self.write_weights(&weights)?;
        }

        self.write_blank_line()?;
        debug!(inputs, hidden, outputs, "wrote network weights");
        Ok(())
    }
}
