//! Check command - validate a batch of documents against one registry

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use brewxml_schema::{TypeRegistry, ValidationError, check_document};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::report::{Diagnostic, render_snippet};

/// Arguments for the check command.
pub struct CheckArgs {
    pub paths: Vec<PathBuf>,
    pub schema: PathBuf,
    pub json: bool,
    pub show_source: bool,
}

/// Validation result for one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,

    /// File content, kept for source snippets. Empty if unreadable.
    pub content: String,

    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: Vec<JsonFile<'a>>,
    total: usize,
    passed: usize,
    failed: usize,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    passed: bool,
    errors: &'a [Diagnostic],
}

/// Execute the check command. Returns whether every file passed.
pub fn execute(args: CheckArgs) -> Result<bool> {
    let registry = super::load_registry(&args.schema)?;
    let files = collect_files(&args.paths)?;
    tracing::debug!(count = files.len(), "found documents to check");

    let reports = check_files(&files, &registry);

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    if args.json {
        write_json_report(&mut out, &reports)?;
    } else {
        write_text_report(&mut out, &reports, args.show_source, color)?;
    }
    out.flush()?;

    Ok(reports.iter().all(FileReport::passed))
}

/// Expand directories into their `*.xml` files, recursively. Explicit files
/// are kept whatever their extension. The result is sorted and deduplicated.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let (found, skipped) = xml_files_in(path);
            if skipped > 0 {
                tracing::warn!(path = %path.display(), skipped, "some entries could not be read");
            }
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            bail!("Path does not exist: {}", path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// `*.xml` files under `root`, plus the number of entries the walk could
/// not read. Each unreadable entry is logged.
fn xml_files_in(root: &Path) -> (Vec<PathBuf>, usize) {
    let mut files = Vec::new();
    let mut skipped = 0;
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).display().to_string();
                tracing::warn!(path = %path, error = %err, "skipping unreadable entry");
                skipped += 1;
                continue;
            }
        };
        let is_xml = entry.path().extension().is_some_and(|ext| ext == "xml");
        if entry.file_type().is_file() && is_xml {
            files.push(entry.into_path());
        }
    }
    (files, skipped)
}

/// Validate every file in parallel. Reports keep the order of `files`.
pub fn check_files(files: &[PathBuf], registry: &TypeRegistry) -> Vec<FileReport> {
    files
        .par_iter()
        .map(|path| check_file(path, registry))
        .collect()
}

pub fn check_file(path: &Path, registry: &TypeRegistry) -> FileReport {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "unreadable document");
            return FileReport {
                path: path.to_path_buf(),
                content: String::new(),
                diagnostics: vec![Diagnostic::new(
                    "X-2-2",
                    format!("Failed to read file: {}", err),
                )],
            };
        }
    };

    let diagnostics = match check_document(&content, registry) {
        Ok(errors) => errors
            .iter()
            .map(|error| validation_diagnostic(error, &content))
            .collect(),
        Err(err) => vec![
            Diagnostic::new(err.error_code(), err.to_string()).with_span(err.span(), &content),
        ],
    };
    tracing::trace!(path = %path.display(), errors = diagnostics.len(), "checked document");

    FileReport {
        path: path.to_path_buf(),
        content,
        diagnostics,
    }
}

fn validation_diagnostic(error: &ValidationError, content: &str) -> Diagnostic {
    Diagnostic::new(error.error_code(), error.to_string())
        .with_path(error.path.to_string())
        .with_span(error.span, content)
}

/// Per-file status lines, the errors of failing files, then totals.
pub fn write_text_report(
    out: &mut impl Write,
    reports: &[FileReport],
    show_source: bool,
    color: bool,
) -> io::Result<()> {
    for report in reports {
        let name = report.path.display().to_string();
        if report.passed() {
            writeln!(out, "Validating {}... OK", name)?;
            continue;
        }

        writeln!(out, "Validating {}... FAIL", name)?;
        for diagnostic in &report.diagnostics {
            writeln!(out, "  - {}", diagnostic.message)?;
            if show_source
                && let Some(snippet) = render_snippet(diagnostic, &name, &report.content, color)
            {
                writeln!(out, "{}", snippet)?;
            }
        }
    }

    let passed = reports.iter().filter(|r| r.passed()).count();
    writeln!(out, "{}", "-".repeat(30))?;
    writeln!(
        out,
        "Total: {}, Passed: {}, Failed: {}",
        reports.len(),
        passed,
        reports.len() - passed
    )
}

pub fn write_json_report(out: &mut impl Write, reports: &[FileReport]) -> io::Result<()> {
    let passed = reports.iter().filter(|r| r.passed()).count();
    let report = JsonReport {
        files: reports
            .iter()
            .map(|r| JsonFile {
                path: r.path.display().to_string(),
                passed: r.passed(),
                errors: &r.diagnostics,
            })
            .collect(),
        total: reports.len(),
        passed,
        failed: reports.len() - passed,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
