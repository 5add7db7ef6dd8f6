use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use mom_core::models::placeholder::Replacements;

use crate::convert::{DocumentConverter, OutputFormat, PandocConverter};
use crate::docx::fill_template;
use crate::error::ExportError;
use crate::styles::DocumentStyles;

/// Fills a template and hands it to a converter.
pub struct Generator {
    converter: Box<dyn DocumentConverter>,
    styles: DocumentStyles,
    format: OutputFormat,
    work_dir: Option<PathBuf>,
}

impl Generator {
    pub fn new(converter: Box<dyn DocumentConverter>) -> Self {
        Self {
            converter,
            styles: DocumentStyles::default(),
            format: OutputFormat::default(),
            work_dir: None,
        }
    }

    pub fn styles(mut self, styles: DocumentStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Directory for the intermediate DOCX. Defaults to the output's parent.
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Fill `template_path` with `replacements` and write the result to
    /// `output_path`.
    ///
    /// For PDF output the filled document is written to a uniquely named
    /// intermediate file that is removed once this returns, whether or not
    /// the conversion succeeded.
    pub fn generate(
        &self,
        template_path: &Path,
        output_path: &Path,
        replacements: &Replacements,
    ) -> Result<(), ExportError> {
        info!(template = %template_path.display(), "loading template");
        let template = fs::read(template_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                ExportError::TemplateNotFound(template_path.display().to_string())
            }
            _ => ExportError::Io(e),
        })?;

        let filled = fill_template(&template, replacements, &self.styles)?;

        match self.format {
            OutputFormat::Docx => fs::write(output_path, &filled)?,
            OutputFormat::Pdf => {
                let intermediate = self.write_intermediate(&filled, output_path)?;
                self.converter
                    .convert(intermediate.path(), output_path, self.format)?;

                let intermediate_path = intermediate.path().to_path_buf();
                if let Err(e) = intermediate.close() {
                    warn!(path = %intermediate_path.display(), "failed to remove intermediate file: {e}");
                }
            }
        }

        info!(output = %output_path.display(), format = ?self.format, "minutes generated");
        Ok(())
    }

    fn write_intermediate(
        &self,
        filled: &[u8],
        output_path: &Path,
    ) -> Result<NamedTempFile, ExportError> {
        let dir = match (&self.work_dir, output_path.parent()) {
            (Some(dir), _) => dir.clone(),
            (None, Some(parent)) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            (None, _) => std::env::temp_dir(),
        };

        let mut file = tempfile::Builder::new()
            .prefix("mom-")
            .suffix(".docx")
            .tempfile_in(&dir)?;
        file.write_all(filled)?;
        file.flush()?;
        Ok(file)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(Box::new(PandocConverter::default()))
    }
}

/// Fill `template_path` and convert it to a PDF at `output_path` with pandoc
/// and the default styles.
pub fn generate(
    template_path: &Path,
    output_path: &Path,
    replacements: &Replacements,
) -> Result<(), ExportError> {
    Generator::default().generate(template_path, output_path, replacements)
}
