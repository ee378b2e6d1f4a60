//! Declarative table-to-graph mappings

use csv2rdf_core::{iri, lang_literal, vocab, NamedNode, VocabularyRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::source::{Column, CsvOptions};
use crate::{ConvertError, Result};

/// How a cell value becomes an RDF object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Plain string literal
    #[default]
    String,
    /// Language-tagged literal, tag taken from `lang`
    Lang,
    /// `xsd:integer`
    Integer,
    /// German decimal ("1,59") as `xsd:double`
    DecimalDe,
    /// German "ja"/anything else as `xsd:boolean`
    YesNo,
    /// Cell holds an absolute IRI
    Iri,
    /// IRI minted from a base and the slugged cell
    Slug,
}

/// Mapping of one column to one predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub column: Column,
    /// CURIE (`schema:name`) or absolute IRI
    pub predicate: String,
    #[serde(default)]
    pub kind: ValueKind,
    /// Language tag for `lang` columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Base IRI for `slug` columns; defaults to the subject base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Capitalize slug components for `slug` columns
    #[serde(default)]
    pub capitalize: bool,
}

/// Configuration of a [`TableConverter`](crate::TableConverter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMapping {
    /// Subjects are `<subject_base><slug of subject column>`
    pub subject_base: String,
    pub subject_column: Column,
    #[serde(default)]
    pub subject_capitalize: bool,
    /// Optional `rdf:type` for every subject, CURIE or absolute IRI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub csv: CsvOptions,
    /// Extra prefixes on top of the built-in vocabularies
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vocabularies: BTreeMap<String, String>,
    pub columns: Vec<ColumnMapping>,
}

impl TableMapping {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConvertError::Mapping(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| ConvertError::Mapping(format!("'{}': {}", path.display(), e)))
    }

    /// Resolve every CURIE and base IRI, checking the mapping is usable.
    ///
    /// `subject_base` overrides the configured base when given.
    pub(crate) fn compile(
        &self,
        registry: &VocabularyRegistry,
        subject_base: Option<&str>,
    ) -> Result<CompiledMapping> {
        let mut registry = registry.clone();
        for (prefix, base) in &self.vocabularies {
            registry = registry.with(prefix.clone(), base)?;
        }

        let subject_base = subject_base.unwrap_or(&self.subject_base).to_string();
        check_base(&subject_base)?;

        let class = self
            .class
            .as_deref()
            .map(|c| registry.resolve(c))
            .transpose()?;
        let rdf_type = iri(format!("{}type", vocab::RDF))?;

        let mut columns = Vec::with_capacity(self.columns.len());
        for mapping in &self.columns {
            let predicate = registry.resolve(&mapping.predicate)?;
            let lang = match (mapping.kind, &mapping.lang) {
                (ValueKind::Lang, Some(tag)) => {
                    lang_literal("", tag)?;
                    Some(tag.clone())
                }
                (ValueKind::Lang, None) => {
                    return Err(ConvertError::Mapping(format!(
                        "column {} has kind 'lang' but no language tag",
                        mapping.column
                    )))
                }
                _ => None,
            };
            let base = match mapping.kind {
                ValueKind::Slug => {
                    let base = mapping.base.clone().unwrap_or_else(|| subject_base.clone());
                    check_base(&base)?;
                    Some(base)
                }
                _ => None,
            };
            columns.push(CompiledColumn {
                column: mapping.column.clone(),
                predicate,
                kind: mapping.kind,
                lang,
                base,
                capitalize: mapping.capitalize,
            });
        }

        Ok(CompiledMapping {
            subject_base,
            subject_column: self.subject_column.clone(),
            subject_capitalize: self.subject_capitalize,
            class,
            rdf_type,
            columns,
        })
    }
}

// A base must itself be an absolute IRI so that appending a slug yields one.
fn check_base(base: &str) -> Result<()> {
    iri(base)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledMapping {
    pub subject_base: String,
    pub subject_column: Column,
    pub subject_capitalize: bool,
    pub class: Option<NamedNode>,
    pub rdf_type: NamedNode,
    pub columns: Vec<CompiledColumn>,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledColumn {
    pub column: Column,
    pub predicate: NamedNode,
    pub kind: ValueKind,
    pub lang: Option<String>,
    pub base: Option<String>,
    pub capitalize: bool,
}
