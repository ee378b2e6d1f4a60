//! Checked constructors for `oxrdf` terms
//!
//! The `oxrdf` constructors report parse errors without the offending input; these wrap
//! them so a failing cell or mapping entry can be named in the error.

use oxrdf::{BlankNode, Literal, NamedNode};

use crate::ModelError;

/// Absolute IRI, rejecting relative references and malformed input
pub fn iri(value: impl Into<String>) -> Result<NamedNode, ModelError> {
    let value = value.into();
    NamedNode::new(value.as_str()).map_err(|e| ModelError::InvalidIri {
        iri: value,
        reason: e.to_string(),
    })
}

/// Blank node with an explicit label (written `_:label`)
pub fn blank_node(label: impl Into<String>) -> Result<BlankNode, ModelError> {
    let label = label.into();
    BlankNode::new(label.as_str()).map_err(|e| ModelError::InvalidBlankNode {
        label,
        reason: e.to_string(),
    })
}

/// Language-tagged string. Tags are normalized to lower case.
pub fn lang_literal(value: impl Into<String>, tag: &str) -> Result<Literal, ModelError> {
    Literal::new_language_tagged_literal(value, tag).map_err(|e| ModelError::InvalidLanguageTag {
        tag: tag.to_string(),
        reason: e.to_string(),
    })
}
