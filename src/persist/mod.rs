//! Text format for trained weights.
//!
//! ```text
//! <inputs>,<hidden>,<outputs>
//!
//! <outgoing weights of input neuron 0>
//! ...
//!
//! <incoming weights of output neuron 0>
//! ...
//!
//! ```
//!
//! Records are read and written with the `csv` crate: fields may be quoted,
//! a quote inside a quoted field is doubled, and lines may end with CRLF, CR
//! or LF. Empty lines are skipped on read. The writer never emits a separator
//! after the last weight of a line; the reader accepts one.

mod reader;
mod writer;

use std::{fs::File, path::Path};

use csv::{ReaderBuilder, Terminator, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::{neural::NeuralNetwork, prelude::*};

pub use reader::CsvReader;
pub use writer::CsvWriter;

pub const FIELD_SEP_SEMICOLON: char = ';';
pub const FIELD_SEP_COMMA: char = ',';
pub const FIELD_SEP_TAB: char = '\t';
pub const FIELD_SEP_BAR: char = '|';

pub const QUOTE_SINGLE: char = '\'';
pub const QUOTE_DOUBLE: char = '"';

pub const EOL_CR: &str = "\r";
pub const EOL_LF: &str = "\n";
pub const EOL_CRLF: &str = "\r\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvFormat {
    pub field_separator: char,
    pub quote: char,
    /// Only used when writing; the reader accepts any of CR, LF and CRLF
    pub line_separator: String,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            field_separator: FIELD_SEP_COMMA,
            quote: QUOTE_DOUBLE,
            line_separator: EOL_CRLF.to_string(),
        }
    }
}

impl CsvFormat {
    pub fn with_field_separator(mut self, field_separator: char) -> Self {
        self.field_separator = field_separator;
        self
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_line_separator(mut self, line_separator: &str) -> Self {
        self.line_separator = line_separator.to_string();
        self
    }

    fn terminator(&self) -> Result<Terminator> {
        match self.line_separator.as_bytes() {
            b"\r\n" => Ok(Terminator::CRLF),
            &[eol] if eol.is_ascii() => Ok(Terminator::Any(eol)),
            _ => Err(Error::FormatErr(format!(
                "line separator {:?} is neither CRLF nor a single ASCII character",
                self.line_separator
            ))),
        }
    }

    pub(crate) fn reader_builder(&self) -> Result<ReaderBuilder> {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(ascii(self.field_separator, "field separator")?)
            .quote(ascii(self.quote, "quote")?);
        Ok(builder)
    }

    pub(crate) fn writer_builder(&self) -> Result<WriterBuilder> {
        let mut builder = WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(ascii(self.field_separator, "field separator")?)
            .quote(ascii(self.quote, "quote")?)
            .terminator(self.terminator()?);
        Ok(builder)
    }
}

fn ascii(c: char, what: &str) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(Error::FormatErr(format!("{what} '{c}' is not an ASCII character")))
    }
}

/// Writes the weights of `net` to a file at `path`.
pub fn save(net: &NeuralNetwork, path: impl AsRef<Path>, format: &CsvFormat) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = CsvWriter::with_format(file, format.clone())?;
    writer.write_network(net)?;
    writer.into_inner()?;
    Ok(())
}

/// Rebuilds a fully-connected network from a weight file.
pub fn load(path: impl AsRef<Path>, format: &CsvFormat) -> Result<NeuralNetwork> {
    let file = File::open(path)?;
    CsvReader::with_format(format.clone()).read_network(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::{
        config::NetworkConfig,
        optimizer::Optimizer,
        values::{Sample, ValuesList},
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn trained() -> NeuralNetwork {
        let mut rng = StdRng::seed_from_u64(31);
        let config = NetworkConfig::new(2, 1, 1).with_hidden_layers(1, 3);
        let mut net = NeuralNetwork::with_rng(&config, &mut rng).unwrap();
        let samples = vec![
            Sample::new([0.0, 0.0], [0.0]),
            Sample::new([0.0, 1.0], [1.0]),
            Sample::new([1.0, 0.0], [1.0]),
            Sample::new([1.0, 1.0], [1.0]),
        ];
        Optimizer::new(500, 0.9)
            .train(&mut net, &samples, &mut rng)
            .unwrap();
        net
    }

    fn assert_same_behaviour(a: &mut NeuralNetwork, b: &mut NeuralNetwork) {
        assert_eq!(a.layer_sizes(), b.layer_sizes());
        assert_eq!(a.input_weights(), b.input_weights());
        assert_eq!(a.output_weights(), b.output_weights());
        for x in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.3, 0.8]] {
            let x = ValuesList::from(x);
            assert_eq!(
                a.calculate_outputs(&x).unwrap(),
                b.calculate_outputs(&x).unwrap()
            );
        }
    }

    #[test]
    fn round_trip_every_format() {
        let mut net = trained();
        let formats = [
            CsvFormat::default(),
            CsvFormat::default()
                .with_field_separator(FIELD_SEP_SEMICOLON)
                .with_line_separator(EOL_LF),
            CsvFormat::default()
                .with_field_separator(FIELD_SEP_TAB)
                .with_line_separator(EOL_CR),
            CsvFormat::default()
                .with_field_separator(FIELD_SEP_BAR)
                .with_quote(QUOTE_SINGLE),
        ];

        for format in formats {
            let mut writer = CsvWriter::with_format(Vec::new(), format.clone()).unwrap();
            writer.write_network(&net).unwrap();
            let bytes = writer.into_inner().unwrap();

            let mut back = CsvReader::with_format(format)
                .read_network(bytes.as_slice())
                .unwrap();
            assert_same_behaviour(&mut net, &mut back);
        }
    }

    #[test]
    fn save_and_load_file() {
        let mut net = trained();
        let path = std::env::temp_dir().join(format!("layered_nn_{}.csv", std::process::id()));

        save(&net, &path, &CsvFormat::default()).unwrap();
        let mut back = load(&path, &CsvFormat::default()).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_same_behaviour(&mut net, &mut back);
    }

    #[test]
    fn rejects_unusable_format() {
        for format in [
            CsvFormat::default().with_field_separator('§'),
            CsvFormat::default().with_quote('«'),
        ] {
            assert!(matches!(
                CsvReader::with_format(format.clone()).parse_network("1,1,1\n0.5\n0.5\n"),
                Err(Error::FormatErr(_))
            ));
            assert!(matches!(
                CsvWriter::with_format(Vec::new(), format),
                Err(Error::FormatErr(_))
            ));
        }

        let two_char_eol = CsvFormat::default().with_line_separator("\n\r");
        assert!(matches!(
            CsvWriter::with_format(Vec::new(), two_char_eol),
            Err(Error::FormatErr(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("layered_nn_does_not_exist/network.csv");
        assert!(matches!(
            load(path, &CsvFormat::default()),
            Err(Error::IoErr(_))
        ));
    }
}
