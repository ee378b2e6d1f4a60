use csv2rdf_convert::{
    german_to_english_float, name_to_uri, ConversionJob, ConvertError, Converter, CsvOptions,
    CsvSource,
};
use csv2rdf_core::{iri, Literal, Triple, VocabularyRegistry};
use oxrdfio::{RdfFormat, RdfParser};
use proptest::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Rating converter in the shape of a per-dataset converter: one subject per row, named
/// after the reviewer, with a German-decimal score.
struct RatingConverter {
    job: ConversionJob,
    vocab: VocabularyRegistry,
}

impl Converter for RatingConverter {
    fn job(&self) -> &ConversionJob {
        &self.job
    }

    fn job_mut(&mut self) -> &mut ConversionJob {
        &mut self.job
    }

    fn convert(&mut self) -> Result<(), ConvertError> {
        let mut source = CsvSource::open(self.job.input_path(), &CsvOptions::default())?;
        let name = self.vocab.term("schema", "name")?;
        let rating = self.vocab.term("schema", "ratingValue")?;
        for record in source.records() {
            let record = record?;
            let reviewer = record.by_name("reviewer").unwrap_or_default();
            let subject = iri(format!(
                "http://example.org/rating/{}",
                name_to_uri(reviewer, false)
            ))?;
            let score = german_to_english_float(record.by_name("score").unwrap_or_default())?;
            self.job
                .add(Triple::new(subject.clone(), name.clone(), Literal::new_simple_literal(reviewer)));
            self.job
                .add(Triple::new(subject, rating.clone(), Literal::from(score)));
        }
        Ok(())
    }
}

struct Unextended {
    job: ConversionJob,
}

impl Converter for Unextended {
    fn job(&self) -> &ConversionJob {
        &self.job
    }

    fn job_mut(&mut self) -> &mut ConversionJob {
        &mut self.job
    }
}

fn fixture(csv: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ratings.csv");
    fs::write(&input, csv).unwrap();
    (dir, input)
}

// Statement count according to a conforming N-Triples parser; fails on any malformed line
fn parsed_statements(text: &str) -> usize {
    RdfParser::from_format(RdfFormat::NTriples)
        .for_reader(text.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .expect("output is valid N-Triples")
        .len()
}

const RATINGS: &str = "reviewer,score\nKnud Möller,\"4,5\"\nJosé \"Pepe\" Ruiz,\"3,0\"\nAnna Öz,5\n";

#[test]
fn test_n_triples_become_n_lines() {
    let (dir, input) = fixture(RATINGS);
    let job = ConversionJob::from_output_directory(&input, dir.path(), None).unwrap();
    let mut converter = RatingConverter {
        job,
        vocab: VocabularyRegistry::default(),
    };

    converter.convert().unwrap();
    let n = converter.job().graph().len();
    assert_eq!(n, 6);
    assert_eq!(converter.serialize().unwrap(), n);

    let output = dir.path().join("ratings.csv.nt");
    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), n);
    assert_eq!(parsed_statements(&text), n);
    assert!(text.contains(
        "<http://example.org/rating/knud-moller> <http://schema.org/ratingValue> \"4.5\"^^<http://www.w3.org/2001/XMLSchema#double> ."
    ));
    assert!(text.contains("\"Jos\u{e9} \\\"Pepe\\\" Ruiz\""));
}

#[test]
fn test_serialize_twice_is_identical() {
    let (dir, input) = fixture(RATINGS);
    let out = dir.path().join("out.nt");
    let job = ConversionJob::from_output_path(&input, &out, None).unwrap();
    let mut converter = RatingConverter {
        job,
        vocab: VocabularyRegistry::default(),
    };
    converter.convert().unwrap();

    converter.serialize().unwrap();
    let first = fs::read(&out).unwrap();
    converter.serialize().unwrap();
    let second = fs::read(&out).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_serialize_overwrites_existing_output() {
    let (dir, input) = fixture(RATINGS);
    let out = dir.path().join("out.nt");
    fs::write(&out, "stale content that is longer than nothing\n").unwrap();

    let job = ConversionJob::from_output_path(&input, &out, None).unwrap();
    job.serialize().unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_unextended_converter_fails_not_implemented() {
    let (dir, input) = fixture(RATINGS);
    let job = ConversionJob::from_output_directory(&input, dir.path(), None).unwrap();
    let mut converter = Unextended { job };

    match converter.run() {
        Err(ConvertError::NotImplemented { type_name, operation }) => {
            assert!(type_name.ends_with("Unextended"));
            assert_eq!(operation, "convert");
        }
        other => panic!("expected NotImplemented, got {:?}", other.map(|_| ())),
    }
    assert!(!dir.path().join("ratings.csv.nt").exists());
}

#[test]
fn test_converters_as_trait_objects() {
    let (dir, input) = fixture(RATINGS);
    let mut converters: Vec<Box<dyn Converter>> = vec![
        Box::new(RatingConverter {
            job: ConversionJob::from_output_path(&input, dir.path().join("a.nt"), None).unwrap(),
            vocab: VocabularyRegistry::default(),
        }),
        Box::new(Unextended {
            job: ConversionJob::from_output_path(&input, dir.path().join("b.nt"), None).unwrap(),
        }),
    ];

    let results: Vec<bool> = converters.iter_mut().map(|c| c.run().is_ok()).collect();
    assert_eq!(results, vec![true, false]);
}

#[test]
fn test_bad_score_aborts_conversion() {
    let (dir, input) = fixture("reviewer,score\nKnud,super\n");
    let job = ConversionJob::from_output_directory(&input, dir.path(), None).unwrap();
    let mut converter = RatingConverter {
        job,
        vocab: VocabularyRegistry::default(),
    };
    assert!(matches!(
        converter.convert(),
        Err(ConvertError::InvalidNumber { .. })
    ));
}

proptest! {
    #[test]
    fn slug_is_idempotent(name in "\\PC{0,40}") {
        let once = name_to_uri(&name, false);
        prop_assert_eq!(name_to_uri(&once, false), once.clone());
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
        prop_assert!(!once.starts_with('-') && !once.ends_with('-') && !once.contains("--"));
    }

    #[test]
    fn capitalized_slug_lowercases_to_plain_slug(name in "[a-zA-Z äöüÄÖÜß.-]{0,30}") {
        let plain = name_to_uri(&name, false);
        let capitalized = name_to_uri(&name, true);
        prop_assert_eq!(capitalized.to_ascii_lowercase(), plain);
    }

    #[test]
    fn german_decimal_matches_english(int in 0u32..100_000, frac in 0u32..100) {
        let german = format!("{},{:02}", int, frac);
        let english: f64 = format!("{}.{:02}", int, frac).parse().unwrap();
        prop_assert_eq!(german_to_english_float(german.as_str()).unwrap(), english);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn serialized_output_parses_to_graph_size(
        reviewers in prop::collection::vec("[a-zA-Zäöüß\"\\\\ ]{1,16}", 1..8),
    ) {
        let mut csv = String::from("reviewer,score\n");
        for (i, reviewer) in reviewers.iter().enumerate() {
            csv.push_str(&format!("\"{}\",\"{},5\"\n", reviewer.replace('"', "\"\""), i));
        }
        let (dir, input) = fixture(&csv);
        let job = ConversionJob::from_output_directory(&input, dir.path(), None).unwrap();
        let mut converter = RatingConverter {
            job,
            vocab: VocabularyRegistry::default(),
        };

        let written = converter.run().unwrap();
        let text = fs::read_to_string(dir.path().join("ratings.csv.nt")).unwrap();
        prop_assert_eq!(written, converter.job().graph().len());
        prop_assert_eq!(text.lines().count(), written);
        prop_assert_eq!(parsed_statements(&text), written);
    }
}
