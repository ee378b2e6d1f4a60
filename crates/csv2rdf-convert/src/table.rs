//! Mapping-driven converter for arbitrary tables

use csv2rdf_core::{iri, lang_literal, Literal, NamedNode, Term, Triple, VocabularyRegistry};
use tracing::{debug, info};

use crate::converter::{ConversionJob, Converter};
use crate::mapping::{CompiledColumn, CompiledMapping, TableMapping, ValueKind};
use crate::normalize::{german_to_english_float, name_to_uri, parse_yes_no};
use crate::source::{CsvSource, Record};
use crate::{ConvertError, Result};

/// Context key overriding the mapping's `subject_base`
pub const SUBJECT_BASE_KEY: &str = "subject_base";

/// Converts each CSV row into one subject described by the mapped columns.
///
/// Empty cells produce no triple. A cell that cannot be converted aborts the run with the
/// row number attached.
pub struct TableConverter {
    job: ConversionJob,
    mapping: TableMapping,
    vocabularies: VocabularyRegistry,
}

impl TableConverter {
    pub fn new(job: ConversionJob, mapping: TableMapping) -> Self {
        Self::with_vocabularies(job, mapping, VocabularyRegistry::default())
    }

    pub fn with_vocabularies(
        job: ConversionJob,
        mapping: TableMapping,
        vocabularies: VocabularyRegistry,
    ) -> Self {
        Self {
            job,
            mapping,
            vocabularies,
        }
    }

    pub fn mapping(&self) -> &TableMapping {
        &self.mapping
    }

    pub fn into_job(self) -> ConversionJob {
        self.job
    }

    fn compile(&self) -> Result<CompiledMapping> {
        let base_override = self
            .job
            .context()
            .and_then(|ctx| ctx.get_str(SUBJECT_BASE_KEY));
        self.mapping.compile(&self.vocabularies, base_override)
    }
}

impl Converter for TableConverter {
    fn job(&self) -> &ConversionJob {
        &self.job
    }

    fn job_mut(&mut self) -> &mut ConversionJob {
        &mut self.job
    }

    fn convert(&mut self) -> Result<()> {
        let plan = self.compile()?;
        let mut source = CsvSource::open(self.job.input_path(), &self.mapping.csv)?;

        let referenced = std::iter::once(&plan.subject_column).chain(plan.columns.iter().map(|c| &c.column));
        for column in referenced {
            if !source.has_column(column) {
                return Err(ConvertError::Mapping(format!(
                    "column {} not found in {}",
                    column,
                    self.job.input_path().display()
                )));
            }
        }

        let mut rows = 0u64;
        for record in source.records() {
            let record = record?;
            let triples = row_triples(&plan, &record).map_err(|e| e.at_row(record.row()))?;
            let added = self.job.graph_mut().extend(triples);
            debug!("Row {}: {} new triples", record.row(), added);
            rows += 1;
        }

        info!(
            "Converted {} rows into {} triples",
            rows,
            self.job.graph().len()
        );
        Ok(())
    }
}

fn row_triples(plan: &CompiledMapping, record: &Record) -> Result<Vec<Triple>> {
    let subject_cell = non_empty(record.get(&plan.subject_column)).ok_or_else(|| {
        ConvertError::Mapping(format!("empty subject column {}", plan.subject_column))
    })?;
    let subject = mint(&plan.subject_base, subject_cell, plan.subject_capitalize)?;

    let mut triples = Vec::with_capacity(plan.columns.len() + 1);
    if let Some(class) = &plan.class {
        triples.push(Triple::new(subject.clone(), plan.rdf_type.clone(), class.clone()));
    }
    for column in &plan.columns {
        if let Some(cell) = non_empty(record.get(&column.column)) {
            let object = cell_term(column, cell)?;
            triples.push(Triple::new(subject.clone(), column.predicate.clone(), object));
        }
    }
    Ok(triples)
}

fn cell_term(column: &CompiledColumn, cell: &str) -> Result<Term> {
    let term: Term = match column.kind {
        ValueKind::String => Literal::new_simple_literal(cell).into(),
        ValueKind::Lang => {
            let tag = column.lang.as_deref().unwrap_or_default();
            lang_literal(cell, tag)?.into()
        }
        ValueKind::Integer => {
            let value = cell.trim().parse::<i64>().map_err(|_| ConvertError::InvalidNumber {
                input: cell.to_string(),
            })?;
            Literal::from(value).into()
        }
        ValueKind::DecimalDe => Literal::from(german_to_english_float(cell)?).into(),
        ValueKind::YesNo => Literal::from(parse_yes_no(cell)).into(),
        ValueKind::Iri => iri(cell.trim())?.into(),
        ValueKind::Slug => {
            let base = column.base.as_deref().unwrap_or_default();
            mint(base, cell, column.capitalize)?.into()
        }
    };
    Ok(term)
}

fn mint(base: &str, name: &str, capitalize: bool) -> Result<NamedNode> {
    let slug = name_to_uri(name, capitalize);
    if slug.is_empty() {
        return Err(ConvertError::Mapping(format!(
            "'{}' does not yield a URI component",
            name
        )));
    }
    Ok(iri(format!("{}{}", base, slug))?)
}

fn non_empty(cell: Option<&str>) -> Option<&str> {
    cell.filter(|c| !c.trim().is_empty())
}
