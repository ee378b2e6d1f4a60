//! Value normalization helpers for building URIs and literals from spreadsheet cells.
//!
//! The float and boolean helpers assume German-language source data and are named
//! accordingly; they are not general-purpose parsers.

use crate::{ConvertError, Result};

/// Turn any string into a URI path component.
///
/// Transliterates to ASCII, replaces every run of characters outside `[A-Za-z0-9_-]` with a
/// single `-`, trims `-` from both ends and lower-cases the result. With `capitalize`, each
/// `-`-separated component gets an upper-case first letter.
///
/// ```
/// use csv2rdf_convert::name_to_uri;
///
/// assert_eq!(name_to_uri("Knud Möller", false), "knud-moller");
/// assert_eq!(name_to_uri("Knud Möller", true), "Knud-Moller");
/// ```
pub fn name_to_uri(name: &str, capitalize: bool) -> String {
    let ascii = deunicode::deunicode_with_tofu(name, "-");

    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }

    if capitalize {
        slug.split('-')
            .map(capitalize_component)
            .collect::<Vec<_>>()
            .join("-")
    } else {
        slug
    }
}

fn capitalize_component(component: &str) -> String {
    let mut chars = component.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Input accepted by [`german_to_english_float`]: cell text or an already numeric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<'a> {
    Text(&'a str),
    Number(f64),
}

impl<'a> From<&'a str> for NumericInput<'a> {
    fn from(value: &'a str) -> Self {
        NumericInput::Text(value)
    }
}

impl<'a> From<&'a String> for NumericInput<'a> {
    fn from(value: &'a String) -> Self {
        NumericInput::Text(value.as_str())
    }
}

impl From<f64> for NumericInput<'_> {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<f32> for NumericInput<'_> {
    fn from(value: f32) -> Self {
        NumericInput::Number(f64::from(value))
    }
}

impl From<i32> for NumericInput<'_> {
    fn from(value: i32) -> Self {
        NumericInput::Number(f64::from(value))
    }
}

/// Convert a German-style decimal ("1,59") into an `f64`.
///
/// Text has surrounding whitespace trimmed and every `,` replaced by `.` before parsing.
/// Numbers are returned unchanged. Anything that does not parse to a finite number fails
/// with [`ConvertError::InvalidNumber`]; there is no fallback value.
///
/// ```
/// use csv2rdf_convert::german_to_english_float;
///
/// assert_eq!(german_to_english_float("1,59").unwrap(), 1.59);
/// assert_eq!(german_to_english_float(1.59).unwrap(), 1.59);
/// assert!(german_to_english_float("abc").is_err());
/// ```
pub fn german_to_english_float<'a>(value: impl Into<NumericInput<'a>>) -> Result<f64> {
    match value.into() {
        NumericInput::Number(n) => Ok(n),
        NumericInput::Text(text) => {
            let normalized = text.trim().replace(',', ".");
            match normalized.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                _ => Err(ConvertError::InvalidNumber {
                    input: text.to_string(),
                }),
            }
        }
    }
}

/// German yes/no cell: `true` only for a case-insensitive "ja"
pub fn parse_yes_no(value: &str) -> bool {
    value.eq_ignore_ascii_case("ja")
}
