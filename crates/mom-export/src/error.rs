use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("DOCX generation failed: {0}")]
    Docx(String),

    #[error("converter `{program}` could not be started: {source}")]
    ConverterUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("conversion with `{program}` failed ({status}): {stderr}")]
    Conversion {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("converter reported success but wrote nothing to {0}")]
    MissingOutput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
