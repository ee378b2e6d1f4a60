//! Lazy CSV row source

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

use crate::{ConvertError, Result};

/// Reader settings for a CSV input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter, must be a single ASCII character
    pub delimiter: char,
    /// First row holds column names
    pub has_headers: bool,
    /// Allow rows with differing field counts
    pub flexible: bool,
    /// Trim whitespace around fields
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: true,
            flexible: false,
            trim: false,
        }
    }
}

impl CsvOptions {
    fn builder(&self) -> Result<ReaderBuilder> {
        if !self.delimiter.is_ascii() {
            return Err(ConvertError::Mapping(format!(
                "delimiter '{}' is not an ASCII character",
                self.delimiter
            )));
        }
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter as u8)
            .has_headers(self.has_headers)
            .flexible(self.flexible)
            .trim(if self.trim { Trim::All } else { Trim::None });
        Ok(builder)
    }
}

/// Column reference: header name or zero-based index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Column {
    Index(usize),
    Name(String),
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Index(i) => write!(f, "#{}", i),
            Column::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl From<usize> for Column {
    fn from(index: usize) -> Self {
        Column::Index(index)
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::Name(name.to_string())
    }
}

/// One data row, addressable by column name or index
#[derive(Debug, Clone)]
pub struct Record {
    row: u64,
    headers: Option<Rc<StringRecord>>,
    values: StringRecord,
}

impl Record {
    /// One-based data row number (header row excluded)
    pub fn row(&self) -> u64 {
        self.row
    }

    pub fn by_index(&self, index: usize) -> Option<&str> {
        self.values.get(index)
    }

    /// Value under the named header; `None` without headers or for unknown names
    pub fn by_name(&self, name: &str) -> Option<&str> {
        let index = self.headers.as_ref()?.iter().position(|h| h == name)?;
        self.values.get(index)
    }

    pub fn get(&self, column: &Column) -> Option<&str> {
        match column {
            Column::Index(i) => self.by_index(*i),
            Column::Name(name) => self.by_name(name),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// CSV input yielding [`Record`]s lazily
pub struct CsvSource<R: Read = File> {
    reader: csv::Reader<R>,
    headers: Option<Rc<StringRecord>>,
    width: usize,
}

impl CsvSource<File> {
    pub fn open(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_reader(file, options)
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(input: R, options: &CsvOptions) -> Result<Self> {
        let mut reader = options.builder()?.from_reader(input);
        // Without a header row this peeks at the first record without consuming it
        let first = reader.headers()?.clone();
        let width = first.len();
        let headers = options.has_headers.then(|| Rc::new(first));
        Ok(Self {
            reader,
            headers,
            width,
        })
    }

    pub fn headers(&self) -> Option<&StringRecord> {
        self.headers.as_deref()
    }

    /// Whether `column` can be resolved against this input's header row, or its first
    /// record when there is none
    pub fn has_column(&self, column: &Column) -> bool {
        match (column, &self.headers) {
            (Column::Index(i), _) => *i < self.width,
            (Column::Name(name), Some(headers)) => headers.iter().any(|h| h == name),
            (Column::Name(_), None) => false,
        }
    }

    /// Remaining rows; read errors are yielded in place
    pub fn records(&mut self) -> impl Iterator<Item = Result<Record>> + '_ {
        let headers = self.headers.clone();
        self.reader
            .records()
            .zip(1u64..)
            .map(move |(result, row)| {
                let values = result.map_err(|e| ConvertError::from(e).at_row(row))?;
                Ok(Record {
                    row,
                    headers: headers.clone(),
                    values,
                })
            })
    }
}
