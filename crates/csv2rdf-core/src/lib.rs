//! # csv2rdf Core
//!
//! RDF building blocks for the csv2rdf converters, on top of the `oxrdf` term model:
//! - validated term construction (`model`)
//! - an append-only, insertion-ordered graph (`graph`)
//! - N-Triples output through `oxrdfio` (`ntriples`)
//! - vocabulary namespaces (`vocab`)

pub mod graph;
pub mod model;
pub mod ntriples;
pub mod vocab;

pub use graph::Graph;
pub use model::{blank_node, iri, lang_literal};
pub use ntriples::NTriplesWriter;
pub use oxrdf::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term, Triple};
pub use vocab::{Namespace, VocabularyRegistry};

use thiserror::Error;

/// Errors raised while constructing RDF terms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid IRI '{iri}': {reason}")]
    InvalidIri { iri: String, reason: String },

    #[error("invalid blank node label '{label}': {reason}")]
    InvalidBlankNode { label: String, reason: String },

    #[error("invalid language tag '{tag}': {reason}")]
    InvalidLanguageTag { tag: String, reason: String },

    #[error("unknown vocabulary prefix '{0}'")]
    UnknownVocabulary(String),

    #[error("vocabulary prefix '{0}' is reserved for absolute IRIs")]
    ReservedPrefix(String),
}
