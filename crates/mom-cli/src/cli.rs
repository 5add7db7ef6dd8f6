use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use mom_core::models::meeting::MeetingForm;
use mom_core::models::placeholder::Replacements;
use mom_export::convert::OutputFormat;

use crate::config::MomConfig;

#[derive(Debug, Parser)]
#[command(name = "mom", version, about = "Generate minutes of meeting from a DOCX template")]
pub struct Cli {
    /// Config file. Defaults to `<config dir>/mom/config.json`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log as JSON lines.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill the template and write the minutes.
    Generate(GenerateArgs),
    /// Write a config file with default settings.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config.
    ShowConfig,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Pdf,
    Docx,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Docx => OutputFormat::Docx,
        }
    }
}

/// Values come from `--values`, else `--form`, else the field flags.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Template DOCX (overrides the config).
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Output file (overrides the config).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Output format (overrides the config).
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// JSON file holding a raw placeholder map, e.g. `{"{dept}": "Ops"}`.
    #[arg(long, conflicts_with = "form")]
    pub values: Option<PathBuf>,

    /// JSON file holding a meeting form.
    #[arg(long)]
    pub form: Option<PathBuf>,

    #[command(flatten)]
    pub fields: FormFields,
}

#[derive(Debug, Default, Args)]
pub struct FormFields {
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub start_time: Option<String>,
    #[arg(long)]
    pub end_time: Option<String>,
    #[arg(long)]
    pub agenda: Option<String>,
    /// Absent members, comma-separated.
    #[arg(long)]
    pub absent: Option<String>,
    /// One bullet point; repeat for more.
    #[arg(long = "note")]
    pub notes: Vec<String>,
}

impl FormFields {
    pub fn to_form(&self) -> MeetingForm {
        MeetingForm {
            department: self.department.clone().unwrap_or_default(),
            date: self.date.clone().unwrap_or_default(),
            start_time: self.start_time.clone().unwrap_or_default(),
            end_time: self.end_time.clone().unwrap_or_default(),
            agenda: self.agenda.clone().unwrap_or_default(),
            absent: self.absent.clone().unwrap_or_default(),
            notes: self.notes.join("\n"),
        }
    }
}

impl GenerateArgs {
    /// Build the placeholder mapping, refusing to go on with any field missing.
    pub fn replacements(&self) -> eyre::Result<Replacements> {
        if let Some(path) = &self.values {
            let contents = fs::read_to_string(path)
                .map_err(|e| eyre::eyre!("failed to read values at {}: {e}", path.display()))?;
            let replacements: Replacements = serde_json::from_str(&contents)?;

            let missing = replacements.missing_keys();
            if !missing.is_empty() {
                return Err(eyre::eyre!(
                    "missing required placeholders: {}",
                    missing.join(", ")
                ));
            }
            return Ok(replacements);
        }

        let form = match &self.form {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .map_err(|e| eyre::eyre!("failed to read form at {}: {e}", path.display()))?;
                serde_json::from_str::<MeetingForm>(&contents)?
            }
            None => self.fields.to_form(),
        };

        Ok(form.into_replacements()?)
    }
}

/// Run `mom generate` against `config`. Returns the path written.
pub fn run_generate(config: &MomConfig, args: &GenerateArgs) -> eyre::Result<PathBuf> {
    let replacements = args.replacements()?;

    let mut config = config.clone();
    if let Some(format) = args.format {
        config.format = format.into();
    }
    let template = args
        .template
        .clone()
        .unwrap_or_else(|| config.template_path.clone());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path.clone());

    config
        .generator()
        .generate(&template, &output, &replacements)?;

    Ok(output)
}
