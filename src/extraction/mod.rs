//! Source Model Extractor.
//!
//! Turns source text into [`ClassDefinition`] and [`InterfaceDefinition`]
//! facts through the [`SourceExtractor`] trait. Downstream stages only see
//! those facts, so a grammar-based extractor can replace the lexical one
//! without touching them.
//!
//! Extraction is fail-soft per file: an unreadable or malformed file becomes
//! an [`ExtractionWarning`] and the scan continues.

pub mod complexity;
pub mod csharp;
pub mod lexer;
pub mod members;

pub use csharp::CSharpExtractor;

use crate::cancellation::CancellationToken;
use crate::core::{ClassDefinition, ExtractionWarning, InterfaceDefinition};
use crate::errors::AnalysisError;
use crate::observability::{increment_processed, set_current_file, set_progress};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Facts extracted from a single file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileFacts {
    pub classes: Vec<ClassDefinition>,
    pub interfaces: Vec<InterfaceDefinition>,
}

/// Merged facts for a set of files, in file-path order.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutput {
    pub classes: Vec<ClassDefinition>,
    pub interfaces: Vec<InterfaceDefinition>,
    pub warnings: Vec<ExtractionWarning>,
    pub files_analyzed: usize,
}

pub trait SourceExtractor: Send + Sync {
    fn language(&self) -> &'static str;

    /// Lower-case extensions without the dot.
    fn extensions(&self) -> &[&'static str];

    fn extract(&self, source: &str, path: &Path) -> Result<FileFacts, AnalysisError>;

    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

/// Read and extract one file.
pub fn extract_file(
    extractor: &dyn SourceExtractor,
    path: &Path,
) -> Result<FileFacts, AnalysisError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AnalysisError::io_with_path(e.to_string(), path))?;
    let source = String::from_utf8(bytes)
        .map_err(|_| AnalysisError::parse_with_path("file is not valid UTF-8", path))?;
    let source = source.strip_prefix('\u{feff}').unwrap_or(&source);
    extractor.extract(source, path)
}

/// Extract every file the extractor handles.
///
/// Files are processed in sorted order (in parallel when `parallel` is set)
/// and merged in that order, so the output does not depend on scheduling.
/// Only cancellation or timeout makes this return `Err`.
pub fn extract_files(
    extractor: &dyn SourceExtractor,
    files: &[PathBuf],
    parallel: bool,
    token: &CancellationToken,
) -> Result<ExtractionOutput, AnalysisError> {
    let mut files: Vec<&PathBuf> = files.iter().filter(|p| extractor.handles(p)).collect();
    files.sort();
    files.dedup();
    set_progress(0, files.len());
    debug!(
        files = files.len(),
        language = extractor.language(),
        parallel,
        "extracting source facts"
    );

    let run = |path: &&PathBuf| -> (PathBuf, Result<FileFacts, AnalysisError>) {
        if let Err(e) = token.check() {
            return ((*path).clone(), Err(e));
        }
        let _file = set_current_file(*path);
        let result = extract_file(extractor, path);
        increment_processed();
        ((*path).clone(), result)
    };

    let outcomes: Vec<_> = if parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };
    token.check()?;

    Ok(merge_outcomes(outcomes))
}

fn merge_outcomes(outcomes: Vec<(PathBuf, Result<FileFacts, AnalysisError>)>) -> ExtractionOutput {
    let mut output = ExtractionOutput::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(facts) => {
                output.files_analyzed += 1;
                output.classes.extend(facts.classes);
                output.interfaces.extend(facts.interfaces);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping file");
                output.warnings.push(ExtractionWarning {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }
    output
        .classes
        .sort_by(|a, b| (&a.file_path, a.line).cmp(&(&b.file_path, b.line)));
    output
        .interfaces
        .sort_by(|a, b| (&a.file_path, a.line).cmp(&(&b.file_path, b.line)));
    output
}

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}
