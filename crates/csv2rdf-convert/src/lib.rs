//! # csv2rdf Convert
//!
//! Turns CSV files into N-Triples documents.
//!
//! A conversion run is a [`ConversionJob`] (validated paths, optional [`Context`], the graph
//! being built) driven through the [`Converter`] trait:
//!
//! ```rust,no_run
//! use csv2rdf_convert::{ConversionJob, Converter, TableConverter, TableMapping};
//!
//! # fn main() -> Result<(), csv2rdf_convert::ConvertError> {
//! let mapping = TableMapping::from_json_file("ratings.mapping.json")?;
//! let job = ConversionJob::from_output_directory("data/ratings.csv", "out", None)?;
//! let mut converter = TableConverter::new(job, mapping);
//! converter.convert()?;
//! converter.serialize()?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod converter;
pub mod mapping;
pub mod normalize;
pub mod source;
pub mod table;

pub use context::Context;
pub use converter::{ConversionJob, Converter, OutputTarget};
pub use mapping::{ColumnMapping, TableMapping, ValueKind};
pub use normalize::{german_to_english_float, name_to_uri, parse_yes_no, NumericInput};
pub use source::{Column, CsvOptions, CsvSource, Record};
pub use table::TableConverter;

use csv2rdf_core::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by conversion jobs and their helpers
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("invalid input '{}': {reason}", path.display())]
    InvalidInput { path: PathBuf, reason: String },

    #[error("invalid output '{}': {reason}", path.display())]
    InvalidOutput { path: PathBuf, reason: String },

    #[error("method {type_name}#{operation}() is not implemented")]
    NotImplemented {
        type_name: &'static str,
        operation: &'static str,
    },

    #[error("invalid number '{input}'")]
    InvalidNumber { input: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("invalid mapping: {0}")]
    Mapping(String),

    #[error("row {row}: {source}")]
    Row {
        row: u64,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn at_row(self, row: u64) -> Self {
        ConvertError::Row {
            row,
            source: Box::new(self),
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
