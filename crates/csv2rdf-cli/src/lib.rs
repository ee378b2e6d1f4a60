//! # csv2rdf CLI Library
//!
//! Command-line front end for the table converter: run a mapping over a CSV file,
//! inspect slugs and list the built-in vocabularies.

pub mod commands;

pub use commands::*;
