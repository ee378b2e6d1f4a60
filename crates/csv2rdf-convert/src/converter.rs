//! Conversion jobs and the converter contract

use csv2rdf_core::{Graph, NTriplesWriter, Triple};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::context::Context;
use crate::{ConvertError, Result};

/// How the output location was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Output folder; the file is named `<input file name>.nt`
    Directory(PathBuf),
    /// Exact output file path
    File(PathBuf),
}

/// State of one conversion run: validated paths, caller context and the graph under
/// construction.
///
/// A job starts with an empty graph. Converters append to it during
/// [`Converter::convert`]; [`ConversionJob::serialize`] only reads it. Nothing enforces
/// that `convert` runs first: serializing an unconverted job writes an empty file.
#[derive(Debug)]
pub struct ConversionJob {
    input: PathBuf,
    output: PathBuf,
    target: OutputTarget,
    context: Option<Context>,
    graph: Graph,
}

impl ConversionJob {
    /// Write to `<out_dir>/<input file name>.nt`
    pub fn from_output_directory(
        input: impl AsRef<Path>,
        out_dir: impl AsRef<Path>,
        context: Option<Context>,
    ) -> Result<Self> {
        let given = input.as_ref();
        let input = validate_input(given)?;
        let out_dir = out_dir.as_ref();
        let dir = validate_directory(out_dir, out_dir)?;

        // Named after the path as given, so a symlinked input keeps the link's name
        let file_name = given
            .file_name()
            .or_else(|| input.file_name())
            .ok_or_else(|| ConvertError::InvalidInput {
                path: input.clone(),
                reason: "has no file name".to_string(),
            })?;
        let mut output_name = file_name.to_os_string();
        output_name.push(".nt");
        let output = dir.join(output_name);

        Ok(Self::new(input, output, OutputTarget::Directory(dir), context))
    }

    /// Write to exactly `output`; its containing directory must exist
    pub fn from_output_path(
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        context: Option<Context>,
    ) -> Result<Self> {
        let input = validate_input(input.as_ref())?;
        let requested = output.as_ref();

        if requested.is_dir() {
            return Err(ConvertError::InvalidOutput {
                path: requested.to_path_buf(),
                reason: "is a directory, expected a file path".to_string(),
            });
        }
        let file_name = requested
            .file_name()
            .ok_or_else(|| ConvertError::InvalidOutput {
                path: requested.to_path_buf(),
                reason: "has no file name".to_string(),
            })?;
        let parent = match requested.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let dir = validate_directory(parent, requested)?;
        let output = dir.join(file_name);

        Ok(Self::new(input, output.clone(), OutputTarget::File(output), context))
    }

    fn new(input: PathBuf, output: PathBuf, target: OutputTarget, context: Option<Context>) -> Self {
        info!("Converting {} to {}", input.display(), output.display());
        Self {
            input,
            output,
            target,
            context,
            graph: Graph::new(),
        }
    }

    /// Absolute path of the CSV input
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    /// Absolute path of the N-Triples output
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn output_target(&self) -> &OutputTarget {
        &self.target
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Append a triple; returns `false` if the graph already held it
    pub fn add(&mut self, triple: Triple) -> bool {
        self.graph.insert(triple)
    }

    /// Mutable graph access for converters. The graph only supports appends.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Write the graph to the output path as N-Triples, replacing any existing file.
    ///
    /// Returns the number of statements written. On failure the file may be partially
    /// written; the handle is closed either way.
    pub fn serialize(&self) -> Result<usize> {
        let file = File::create(&self.output).map_err(|e| ConvertError::io(&self.output, e))?;
        let mut writer = NTriplesWriter::new(BufWriter::new(file));
        writer
            .write_graph(&self.graph)
            .map_err(|e| ConvertError::io(&self.output, e))?;
        let written = writer.written();
        writer
            .finish()
            .map_err(|e| ConvertError::io(&self.output, e))?;

        info!("Wrote {} triples to {}", written, self.output.display());
        Ok(written)
    }
}

fn validate_input(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: &str| ConvertError::InvalidInput {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    let metadata = fs::metadata(path).map_err(|_| invalid("file does not exist"))?;
    if !metadata.is_file() {
        return Err(invalid("is not a regular file"));
    }
    fs::canonicalize(path).map_err(|e| invalid(&e.to_string()))
}

// `reported` is the path named in the error, which differs from `dir` for output files.
fn validate_directory(dir: &Path, reported: &Path) -> Result<PathBuf> {
    let invalid = |reason: String| ConvertError::InvalidOutput {
        path: reported.to_path_buf(),
        reason,
    };
    let metadata = fs::metadata(dir)
        .map_err(|_| invalid(format!("directory '{}' does not exist", dir.display())))?;
    if !metadata.is_dir() {
        return Err(invalid(format!("'{}' is not a directory", dir.display())));
    }
    fs::canonicalize(dir).map_err(|e| invalid(e.to_string()))
}

/// Contract every converter satisfies.
///
/// Implementors own a [`ConversionJob`] and override [`Converter::convert`] to read the
/// input and append triples to the job's graph. The default `convert` fails with
/// [`ConvertError::NotImplemented`].
pub trait Converter {
    fn job(&self) -> &ConversionJob;

    fn job_mut(&mut self) -> &mut ConversionJob;

    /// Populate the graph from the input. On `Ok` the graph is complete.
    fn convert(&mut self) -> Result<()> {
        Err(ConvertError::NotImplemented {
            type_name: std::any::type_name::<Self>(),
            operation: "convert",
        })
    }

    /// Write the graph to the job's output path, returning the statement count
    fn serialize(&self) -> Result<usize> {
        self.job().serialize()
    }

    /// `convert` followed by `serialize`
    fn run(&mut self) -> Result<usize> {
        self.convert()?;
        self.serialize()
    }
}

/// A bare job is a converter that has not been extended: `convert` is not implemented.
impl Converter for ConversionJob {
    fn job(&self) -> &ConversionJob {
        self
    }

    fn job_mut(&mut self) -> &mut ConversionJob {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ratings.csv");
        let mut file = File::create(&input).unwrap();
        writeln!(file, "name,rating").unwrap();
        (dir, input)
    }

    #[test]
    fn test_output_directory_derives_file_name() {
        let (dir, input) = fixture();
        let job = ConversionJob::from_output_directory(&input, dir.path(), None).unwrap();
        assert!(job.graph().is_empty());
        assert!(job.input_path().is_absolute());
        assert_eq!(
            job.output_path().file_name().unwrap().to_str(),
            Some("ratings.csv.nt")
        );
        assert!(matches!(job.output_target(), OutputTarget::Directory(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_input_keeps_link_name() {
        let (dir, target) = fixture();
        let link = dir.path().join("latest.csv");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let job = ConversionJob::from_output_directory(&link, dir.path(), None).unwrap();
        assert_eq!(
            job.output_path().file_name().unwrap().to_str(),
            Some("latest.csv.nt")
        );
        assert_eq!(job.input_path(), fs::canonicalize(&target).unwrap());
    }

    #[test]
    fn test_output_path_is_used_verbatim() {
        let (dir, input) = fixture();
        let wanted = dir.path().join("graph.nt");
        let job = ConversionJob::from_output_path(&input, &wanted, None).unwrap();
        assert_eq!(job.output_path(), fs::canonicalize(dir.path()).unwrap().join("graph.nt"));
        assert!(matches!(job.output_target(), OutputTarget::File(_)));
    }

    #[test]
    fn test_invalid_input() {
        let (dir, _) = fixture();
        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            ConversionJob::from_output_directory(&missing, dir.path(), None),
            Err(ConvertError::InvalidInput { .. })
        ));
        assert!(matches!(
            ConversionJob::from_output_directory(dir.path(), dir.path(), None),
            Err(ConvertError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_invalid_output() {
        let (dir, input) = fixture();
        let missing = dir.path().join("nowhere");
        assert!(matches!(
            ConversionJob::from_output_directory(&input, &missing, None),
            Err(ConvertError::InvalidOutput { .. })
        ));
        assert!(matches!(
            ConversionJob::from_output_directory(&input, &input, None),
            Err(ConvertError::InvalidOutput { .. })
        ));
        assert!(matches!(
            ConversionJob::from_output_path(&input, missing.join("out.nt"), None),
            Err(ConvertError::InvalidOutput { .. })
        ));
        assert!(matches!(
            ConversionJob::from_output_path(&input, dir.path(), None),
            Err(ConvertError::InvalidOutput { .. })
        ));
    }

    #[test]
    fn test_base_convert_is_not_implemented() {
        let (dir, input) = fixture();
        let mut job = ConversionJob::from_output_directory(&input, dir.path(), None).unwrap();
        match job.convert() {
            Err(ConvertError::NotImplemented { type_name, operation }) => {
                assert!(type_name.ends_with("ConversionJob"));
                assert_eq!(operation, "convert");
            }
            other => panic!("expected NotImplemented, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_before_convert_writes_empty_file() {
        let (dir, input) = fixture();
        let job = ConversionJob::from_output_directory(&input, dir.path(), None).unwrap();
        assert_eq!(job.serialize().unwrap(), 0);
        assert_eq!(fs::read_to_string(job.output_path()).unwrap(), "");
    }

    #[test]
    fn test_context_is_passed_through() {
        let (dir, input) = fixture();
        let ctx = Context::new().with("dataset", "ratings");
        let job = ConversionJob::from_output_directory(&input, dir.path(), Some(ctx.clone())).unwrap();
        assert_eq!(job.context(), Some(&ctx));
    }
}
