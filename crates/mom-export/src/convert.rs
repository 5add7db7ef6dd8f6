use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Docx,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }
}

/// Turns a DOCX file into another format by whatever means it likes.
pub trait DocumentConverter {
    /// Convert `input` into `format`, writing to `output`. Returns the path
    /// actually written.
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf, ExportError>;
}

/// Converts with `pandoc`. PDF output needs a PDF engine (a LaTeX
/// distribution by default) installed alongside.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
    pdf_engine: Option<String>,
}

impl PandocConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            pdf_engine: None,
        }
    }

    pub fn with_pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = Some(engine.into());
        self
    }

    pub fn command(&self, input: &Path, output: &Path, format: OutputFormat) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(input).args(["--from", "docx", "--output"]).arg(output);
        if format == OutputFormat::Pdf
            && let Some(engine) = &self.pdf_engine
        {
            command.arg(format!("--pdf-engine={engine}"));
        }
        command
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl DocumentConverter for PandocConverter {
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf, ExportError> {
        run(self.command(input, output, format))?;
        ensure_written(output)?;
        Ok(output.to_path_buf())
    }
}

/// Converts with a headless LibreOffice (`soffice`).
///
/// LibreOffice only lets you pick an output directory, so the result is
/// produced in a scratch directory and copied to the requested path.
#[derive(Debug, Clone)]
pub struct LibreOfficeConverter {
    program: PathBuf,
}

impl LibreOfficeConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn command(&self, input: &Path, out_dir: &Path, format: OutputFormat) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["--headless", "--convert-to", format.extension(), "--outdir"])
            .arg(out_dir)
            .arg(input);
        command
    }
}

impl Default for LibreOfficeConverter {
    fn default() -> Self {
        Self::new("soffice")
    }
}

impl DocumentConverter for LibreOfficeConverter {
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf, ExportError> {
        let scratch = tempfile::tempdir()?;
        run(self.command(input, scratch.path(), format))?;

        let stem = input.file_stem().unwrap_or_default();
        let mut produced_name = OsString::from(stem);
        produced_name.push(".");
        produced_name.push(format.extension());
        let produced = scratch.path().join(produced_name);

        ensure_written(&produced)?;
        fs::copy(&produced, output)?;
        Ok(output.to_path_buf())
    }
}

fn run(mut command: Command) -> Result<(), ExportError> {
    let program = command.get_program().to_string_lossy().into_owned();
    info!(%program, "running converter");

    let output = command
        .output()
        .map_err(|source| ExportError::ConverterUnavailable {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExportError::Conversion {
            program,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

fn ensure_written(path: &Path) -> Result<(), ExportError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ExportError::MissingOutput(path.display().to_string()))
    }
}
