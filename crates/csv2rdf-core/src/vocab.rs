//! Vocabulary namespaces and the registry that resolves them

use oxrdf::NamedNode;
use std::collections::BTreeMap;

use crate::model::iri;
use crate::ModelError;

pub const SCHEMA: &str = "http://schema.org/";
pub const GEO: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";
pub const GR: &str = "http://purl.org/goodrelations/v1#";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

// IRI schemes that cannot be registered as prefixes, or absolute IRIs would resolve as CURIEs
const RESERVED_PREFIXES: &[&str] = &[
    "http", "https", "urn", "ftp", "file", "mailto", "tag", "data", "doi", "info",
];

/// Base IRI from which term IRIs are minted by appending local names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    base: NamedNode,
}

impl Namespace {
    pub fn new(base: impl Into<String>) -> Result<Self, ModelError> {
        Ok(Self {
            base: iri(base)?,
        })
    }

    pub fn base(&self) -> &NamedNode {
        &self.base
    }

    /// Mint `<base><local>`
    pub fn term(&self, local: &str) -> Result<NamedNode, ModelError> {
        iri(format!("{}{}", self.base.as_str(), local))
    }
}

/// Read-only mapping from vocabulary short name to namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyRegistry {
    namespaces: BTreeMap<String, Namespace>,
}

impl VocabularyRegistry {
    /// Registry without any vocabularies
    pub fn empty() -> Self {
        Self {
            namespaces: BTreeMap::new(),
        }
    }

    /// Builder-style registration, used while assembling a registry.
    ///
    /// Common IRI schemes (`http`, `urn`, ...) are rejected as prefixes.
    pub fn with(mut self, prefix: impl Into<String>, base: &str) -> Result<Self, ModelError> {
        let prefix = prefix.into();
        if RESERVED_PREFIXES.contains(&prefix.to_ascii_lowercase().as_str()) {
            return Err(ModelError::ReservedPrefix(prefix));
        }
        self.namespaces.insert(prefix, Namespace::new(base)?);
        Ok(self)
    }

    pub fn get(&self, prefix: &str) -> Option<&Namespace> {
        self.namespaces.get(prefix)
    }

    /// Mint a term from a registered vocabulary
    pub fn term(&self, prefix: &str, local: &str) -> Result<NamedNode, ModelError> {
        self.get(prefix)
            .ok_or_else(|| ModelError::UnknownVocabulary(prefix.to_string()))?
            .term(local)
    }

    /// Resolve `prefix:local` against the registry. Values whose prefix is not registered
    /// must be absolute IRIs.
    pub fn resolve(&self, value: &str) -> Result<NamedNode, ModelError> {
        match value.split_once(':') {
            Some((prefix, local)) => match self.get(prefix) {
                Some(namespace) => namespace.term(local),
                None => iri(value),
            },
            None => Err(ModelError::InvalidIri {
                iri: value.to_string(),
                reason: "neither a CURIE nor an absolute IRI".to_string(),
            }),
        }
    }

    /// Registered prefixes and their base IRIs, sorted by prefix
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Namespace)> {
        self.namespaces.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

impl Default for VocabularyRegistry {
    fn default() -> Self {
        let builtin = [
            ("schema", SCHEMA),
            ("geo", GEO),
            ("gr", GR),
            ("rdf", RDF),
            ("rdfs", RDFS),
            ("xsd", XSD),
        ];
        let namespaces = builtin
            .into_iter()
            .map(|(prefix, base)| {
                (
                    prefix.to_string(),
                    Namespace {
                        base: NamedNode::new_unchecked(base),
                    },
                )
            })
            .collect();
        Self { namespaces }
    }
}
