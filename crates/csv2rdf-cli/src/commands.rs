//! CLI command definitions and handlers

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use csv2rdf_convert::{name_to_uri, ConversionJob, Context, Converter, TableConverter, TableMapping};
use csv2rdf_core::VocabularyRegistry;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "csv2rdf")]
#[command(about = "Convert CSV tables into RDF N-Triples")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a CSV file using a table mapping
    Convert {
        /// CSV input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output folder; the file is named <input file name>.nt
        #[arg(long, required_unless_present = "output", conflicts_with = "output")]
        out_dir: Option<PathBuf>,

        /// Exact output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Table mapping (JSON)
        #[arg(short, long)]
        mapping: PathBuf,

        /// Context object (JSON) passed to the converter
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Context entry, repeatable; values are parsed as JSON, falling back to strings
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Output format for the run summary
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the URI slug of a name
    Slug {
        /// Text to convert
        text: String,

        /// Capitalize each slug component
        #[arg(long)]
        capitalize: bool,
    },

    /// List the built-in vocabularies
    Vocabs {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show system information
    Info,
}

/// Output format options
#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    fn render<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<String> {
        Ok(match self {
            OutputFormat::Text => text(),
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
        })
    }
}

/// Command execution result
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ConversionSummary {
    input: String,
    output: String,
    triples: usize,
}

/// Execute CLI commands
pub struct CommandExecutor {
    vocabularies: VocabularyRegistry,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::with_vocabularies(VocabularyRegistry::default())
    }

    pub fn with_vocabularies(vocabularies: VocabularyRegistry) -> Self {
        Self { vocabularies }
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Convert {
                input,
                out_dir,
                output,
                mapping,
                context,
                set,
                format,
            } => self.execute_convert(input, out_dir, output, mapping, context, set, format),
            Commands::Slug { text, capitalize } => self.execute_slug(&text, capitalize),
            Commands::Vocabs { format } => self.execute_vocabs(format),
            Commands::Info => self.execute_info(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn execute_convert(
        &self,
        input: PathBuf,
        out_dir: Option<PathBuf>,
        output: Option<PathBuf>,
        mapping: PathBuf,
        context: Option<PathBuf>,
        set: Vec<String>,
        format: OutputFormat,
    ) -> Result<CommandResult> {
        let mapping = TableMapping::from_json_file(&mapping)?;
        let context = build_context(context, &set)?;

        let job = match (out_dir, output) {
            (_, Some(file)) => ConversionJob::from_output_path(&input, &file, context)?,
            (Some(dir), None) => ConversionJob::from_output_directory(&input, &dir, context)?,
            (None, None) => return Err(anyhow::anyhow!("Either --out-dir or --output must be specified")),
        };

        let mut converter = TableConverter::with_vocabularies(job, mapping, self.vocabularies.clone());
        let triples = converter
            .run()
            .with_context(|| format!("converting {}", input.display()))?;

        let summary = ConversionSummary {
            input: converter.job().input_path().display().to_string(),
            output: converter.job().output_path().display().to_string(),
            triples,
        };
        let rendered = format.render(&summary, || {
            format!("Wrote {} triples to {}", summary.triples, summary.output)
        })?;
        println!("{}", rendered);

        Ok(CommandResult {
            success: true,
            message: format!("Converted {}", summary.input),
            data: Some(serde_json::to_value(&summary)?),
        })
    }

    fn execute_slug(&self, text: &str, capitalize: bool) -> Result<CommandResult> {
        let slug = name_to_uri(text, capitalize);
        println!("{}", slug);

        Ok(CommandResult {
            success: !slug.is_empty(),
            message: if slug.is_empty() {
                format!("'{}' does not yield a URI component", text)
            } else {
                slug.clone()
            },
            data: Some(serde_json::json!({ "slug": slug })),
        })
    }

    fn execute_vocabs(&self, format: OutputFormat) -> Result<CommandResult> {
        let listing: serde_json::Map<String, serde_json::Value> = self
            .vocabularies
            .iter()
            .map(|(prefix, ns)| (prefix.to_string(), serde_json::json!(ns.base().as_str())))
            .collect();

        let rendered = format.render(&listing, || {
            self.vocabularies
                .iter()
                .map(|(prefix, ns)| format!("{:<8} {}", prefix, ns.base().as_str()))
                .collect::<Vec<_>>()
                .join("\n")
        })?;
        println!("{}", rendered);

        Ok(CommandResult {
            success: true,
            message: format!("{} vocabularies", listing.len()),
            data: Some(serde_json::Value::Object(listing)),
        })
    }

    fn execute_info(&self) -> Result<CommandResult> {
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "repository": env!("CARGO_PKG_REPOSITORY"),
            "output_format": "application/n-triples",
            "value_kinds": ["string", "lang", "integer", "decimal_de", "yes_no", "iri", "slug"]
        });

        let result = serde_json::to_string_pretty(&info)?;
        println!("{}", result);

        Ok(CommandResult {
            success: true,
            message: "System information".to_string(),
            data: Some(info),
        })
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge the optional context file with `--set` entries; later entries win
pub fn build_context(file: Option<PathBuf>, entries: &[String]) -> Result<Option<Context>> {
    if file.is_none() && entries.is_empty() {
        return Ok(None);
    }
    let base = match file {
        Some(path) => Context::from_json_file(&path)?,
        None => Context::new(),
    };
    let mut values: serde_json::Map<String, serde_json::Value> =
        base.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

    for entry in entries {
        let (key, raw) = entry
            .split_once('=')
            .with_context(|| format!("context entry '{}' is not KEY=VALUE", entry))?;
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        debug!("Context {} = {}", key, value);
        values.insert(key.to_string(), value);
    }

    Ok(Some(values.into_iter().collect()))
}
