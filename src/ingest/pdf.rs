//! Page-description quote files (`.pdf`) via an external text extractor.
//!
//! ## Why shell out?
//!
//! Pulling reliable text out of a PDF means fonts, encodings and content
//! streams. Mature command-line tools (`pdftotext` from poppler, `mutool` from
//! MuPDF) already do this well, so the extractor runs one of them as a child
//! process and reads back plain text. There is deliberately no in-process
//! fallback: a missing tool is reported, not papered over.
//!
//! ## Temporary output
//!
//! The tool writes into a fresh [`TempDir`] created per call. The directory
//! is owned by the `parse` stack frame, so it is removed on every exit path,
//! including tool failure and panic.

use super::line::parse_quote_lines;
use super::{ensure_supported, Ingest};
use crate::error::MemeError;
use crate::quote::QuoteModel;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Placeholder replaced by the source PDF path.
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder replaced by the temporary output path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

const OUTPUT_FILE_NAME: &str = "extracted.txt";
const TEMP_PREFIX: &str = "quote-meme-pdf-";

/// An external command that turns a PDF into plain text.
///
/// `args` is a template: [`INPUT_PLACEHOLDER`] and [`OUTPUT_PLACEHOLDER`] are
/// substituted with the source and temporary output paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionTool {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for ExtractionTool {
    fn default() -> Self {
        Self::pdftotext()
    }
}

impl ExtractionTool {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `pdftotext <input> <output>` (poppler-utils / xpdf).
    pub fn pdftotext() -> Self {
        Self::new(
            "pdftotext",
            vec![INPUT_PLACEHOLDER.into(), OUTPUT_PLACEHOLDER.into()],
        )
    }

    /// `mutool draw -F txt -o <output> <input>` (mupdf-tools).
    pub fn mutool() -> Self {
        Self::new(
            "mutool",
            ["draw", "-F", "txt", "-o", OUTPUT_PLACEHOLDER, INPUT_PLACEHOLDER]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    /// Pick the first known tool found on `PATH`: `pdftotext`, then `mutool`.
    ///
    /// Falls back to `pdftotext` when neither is installed, so the failure
    /// surfaces as [`MemeError::ExtractionToolFailure`] when a PDF is parsed
    /// rather than at start-up.
    pub fn detect() -> Self {
        for tool in [Self::pdftotext(), Self::mutool()] {
            if let Ok(found) = which::which(&tool.program) {
                debug!("Using PDF text extractor {}", found.display());
                return Self::new(found, tool.args);
            }
        }
        debug!("No PDF text extractor found on PATH; defaulting to pdftotext");
        Self::pdftotext()
    }

    /// Parse a whitespace-separated command line such as
    /// `"mutool draw -F txt -o {output} {input}"`.
    ///
    /// A command without placeholders gets `{input} {output}` appended, so
    /// `"pdftotext -layout"` works as expected.
    pub fn from_command_line(line: &str) -> Result<Self, MemeError> {
        let mut parts = line.split_whitespace().map(String::from);
        let program = parts
            .next()
            .ok_or_else(|| MemeError::InvalidConfig("PDF tool command is empty".into()))?;
        let mut args: Vec<String> = parts.collect();
        let has_placeholder = args
            .iter()
            .any(|a| a.contains(INPUT_PLACEHOLDER) || a.contains(OUTPUT_PLACEHOLDER));
        if !has_placeholder {
            args.push(INPUT_PLACEHOLDER.into());
            args.push(OUTPUT_PLACEHOLDER.into());
        }
        Ok(Self::new(program, args))
    }

    /// Short name for messages, e.g. `pdftotext` for `/usr/bin/pdftotext`.
    pub fn display_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Concrete argument list for one invocation.
    fn args_for(&self, input: &Path, output: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg.as_str() {
                INPUT_PLACEHOLDER => input.as_os_str().to_owned(),
                OUTPUT_PLACEHOLDER => output.as_os_str().to_owned(),
                other => other
                    .replace(INPUT_PLACEHOLDER, &input.to_string_lossy())
                    .replace(OUTPUT_PLACEHOLDER, &output.to_string_lossy())
                    .into(),
            })
            .collect()
    }

    /// Run the tool to completion. Blocks the calling thread.
    fn run(&self, input: &Path, output: &Path) -> Result<(), MemeError> {
        let args = self.args_for(input, output);
        debug!("Running {} {:?}", self.program.display(), args);

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| MemeError::ExtractionToolFailure {
                tool: self.display_name(),
                status: None,
                diagnostic: if e.kind() == std::io::ErrorKind::NotFound {
                    format!("program '{}' not found", self.program.display())
                } else {
                    format!("failed to start: {e}")
                },
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&result.stdout).trim().to_string();
            let diagnostic = [stderr, stdout]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or_else(|| format!("exited with {}", result.status));
            return Err(MemeError::ExtractionToolFailure {
                tool: self.display_name(),
                status: result.status.code(),
                diagnostic,
            });
        }

        Ok(())
    }
}

/// Extractor for `.pdf` files.
#[derive(Debug, Clone, Default)]
pub struct PdfIngestor {
    tool: ExtractionTool,
    temp_parent: Option<PathBuf>,
}

impl PdfIngestor {
    /// `temp_parent` is where the per-call scratch directory is created;
    /// `None` means the system temp directory.
    pub fn new(tool: ExtractionTool, temp_parent: Option<PathBuf>) -> Self {
        Self { tool, temp_parent }
    }

    pub fn tool(&self) -> &ExtractionTool {
        &self.tool
    }

    fn scratch_dir(&self) -> Result<TempDir, MemeError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        let dir = match &self.temp_parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        dir.map_err(|e| MemeError::Internal(format!("Failed to create temp dir: {e}")))
    }

    fn extract_text(&self, input: &Path, scratch: &TempDir) -> Result<String, MemeError> {
        let output = scratch.path().join(OUTPUT_FILE_NAME);
        self.tool.run(input, &output)?;

        match std::fs::read(&output) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "{} produced no output for {}",
                    self.tool.display_name(),
                    input.display()
                );
                Ok(String::new())
            }
            Err(source) => Err(MemeError::ReadFailed {
                path: output,
                source,
            }),
        }
    }
}

impl Ingest for PdfIngestor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn parse(&self, path: &Path) -> Result<Vec<QuoteModel>, MemeError> {
        ensure_supported(self, path)?;

        let scratch = self.scratch_dir()?;
        let text = self.extract_text(path, &scratch);

        if let Err(e) = scratch.close() {
            warn!("Failed to remove PDF scratch directory: {e}");
        }

        let (quotes, skipped) = parse_quote_lines(text?.lines());
        if skipped > 0 {
            debug!(
                "Skipped {} non-conforming lines in {}",
                skipped,
                path.display()
            );
        }
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn command_line_without_placeholders_appends_them() {
        let tool = ExtractionTool::from_command_line("pdftotext -layout").unwrap();
        assert_eq!(tool.program, PathBuf::from("pdftotext"));
        assert_eq!(tool.args, vec!["-layout", "{input}", "{output}"]);
    }

    #[test]
    fn command_line_with_placeholders_is_kept() {
        let tool = ExtractionTool::from_command_line("mutool draw -F txt -o {output} {input}")
            .unwrap();
        assert_eq!(tool, ExtractionTool::mutool());
    }

    #[test]
    fn empty_command_line_is_invalid() {
        assert!(matches!(
            ExtractionTool::from_command_line("   "),
            Err(MemeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn placeholders_are_substituted() {
        let tool = ExtractionTool::new(
            "x",
            vec!["{input}".into(), "--out={output}".into(), "-q".into()],
        );
        let args = tool.args_for(Path::new("/in/a.pdf"), Path::new("/tmp/o.txt"));
        assert_eq!(
            args,
            vec![
                OsString::from("/in/a.pdf"),
                OsString::from("--out=/tmp/o.txt"),
                OsString::from("-q"),
            ]
        );
    }

    #[test]
    fn display_name_strips_directories() {
        let tool = ExtractionTool::new("/usr/local/bin/pdftotext", vec![]);
        assert_eq!(tool.display_name(), "pdftotext");
    }

    #[test]
    fn missing_tool_fails_without_leaking() {
        let scratch_parent = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        let pdf = docs.path().join("quotes.pdf");
        std::fs::write(&pdf, "%PDF-1.4").unwrap();

        let ingestor = PdfIngestor::new(
            ExtractionTool::new("quote-meme-no-such-extractor", ExtractionTool::pdftotext().args),
            Some(scratch_parent.path().to_path_buf()),
        );
        let err = ingestor.parse(&pdf).unwrap_err();
        match err {
            MemeError::ExtractionToolFailure { status, .. } => assert_eq!(status, None),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(entries(scratch_parent.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn tool_output_goes_through_line_convention() {
        let scratch_parent = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        // `cp` stands in for a real extractor: the ".pdf" already holds text.
        let pdf = docs.path().join("quotes.pdf");
        std::fs::write(&pdf, "\"Chase the sun.\" - Unknown\n\u{c}\"Run free.\" - Unknown\n").unwrap();

        let ingestor = PdfIngestor::new(
            ExtractionTool::new("cp", vec!["{input}".into(), "{output}".into()]),
            Some(scratch_parent.path().to_path_buf()),
        );
        let quotes = ingestor.parse(&pdf).unwrap();
        assert_eq!(
            quotes,
            vec![
                QuoteModel::new("Chase the sun.", "Unknown").unwrap(),
                QuoteModel::new("Run free.", "Unknown").unwrap(),
            ]
        );
        assert_eq!(entries(scratch_parent.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_reports_status() {
        let scratch_parent = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        let pdf = docs.path().join("quotes.pdf");
        std::fs::write(&pdf, "%PDF-1.4").unwrap();

        let ingestor = PdfIngestor::new(
            ExtractionTool::new("false", vec![]),
            Some(scratch_parent.path().to_path_buf()),
        );
        match ingestor.parse(&pdf).unwrap_err() {
            MemeError::ExtractionToolFailure { status, .. } => assert_eq!(status, Some(1)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(entries(scratch_parent.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn tool_without_output_yields_no_quotes() {
        let scratch_parent = tempfile::tempdir().unwrap();
        let docs = tempfile::tempdir().unwrap();
        let pdf = docs.path().join("quotes.pdf");
        std::fs::write(&pdf, "%PDF-1.4").unwrap();

        let ingestor = PdfIngestor::new(
            ExtractionTool::new("true", vec![]),
            Some(scratch_parent.path().to_path_buf()),
        );
        assert!(ingestor.parse(&pdf).unwrap().is_empty());
        assert_eq!(entries(scratch_parent.path()), 0);
    }

    #[test]
    fn rejects_other_extensions() {
        let err = PdfIngestor::default()
            .parse(Path::new("quotes.docx"))
            .unwrap_err();
        assert!(matches!(err, MemeError::UnsupportedFormat { .. }));
    }
}
