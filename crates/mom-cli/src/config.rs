use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mom_export::convert::{DocumentConverter, LibreOfficeConverter, OutputFormat, PandocConverter};
use mom_export::generate::Generator;
use mom_export::styles::DocumentStyles;

/// Current config version. Bump this when changing the shape and teach
/// [`load_config`] how to read the older one.
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomConfig {
    /// Schema version. Missing = written by hand, treated as current.
    #[serde(default = "current_version")]
    pub config_version: u32,
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Where intermediate DOCX files go. Defaults to the output's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub styles: DocumentStyles,
    #[serde(default)]
    pub converter: ConverterConfig,
}

impl Default for MomConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            template_path: default_template_path(),
            output_path: default_output_path(),
            work_dir: None,
            format: OutputFormat::default(),
            styles: DocumentStyles::default(),
            converter: ConverterConfig::default(),
        }
    }
}

impl MomConfig {
    pub fn generator(&self) -> Generator {
        let generator = Generator::new(self.converter.build())
            .styles(self.styles.clone())
            .format(self.format);
        match &self.work_dir {
            Some(dir) => generator.work_dir(dir),
            None => generator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConverterConfig {
    Pandoc {
        #[serde(default = "default_pandoc")]
        program: PathBuf,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pdf_engine: Option<String>,
    },
    LibreOffice {
        #[serde(default = "default_soffice")]
        program: PathBuf,
    },
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig::Pandoc {
            program: default_pandoc(),
            pdf_engine: None,
        }
    }
}

impl ConverterConfig {
    pub fn build(&self) -> Box<dyn DocumentConverter> {
        match self {
            ConverterConfig::Pandoc {
                program,
                pdf_engine,
            } => {
                let converter = PandocConverter::new(program);
                Box::new(match pdf_engine {
                    Some(engine) => converter.with_pdf_engine(engine),
                    None => converter,
                })
            }
            ConverterConfig::LibreOffice { program } => {
                Box::new(LibreOfficeConverter::new(program))
            }
        }
    }
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

fn default_template_path() -> PathBuf {
    PathBuf::from("template.docx")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.pdf")
}

fn default_pandoc() -> PathBuf {
    PathBuf::from("pandoc")
}

fn default_soffice() -> PathBuf {
    PathBuf::from("soffice")
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("mom").join("config.json"))
}

/// Load the config at `path`, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> eyre::Result<MomConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(MomConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Check the version on the raw JSON before committing to the current shape.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(u64::from(CURRENT_VERSION));
    if on_disk_version > u64::from(CURRENT_VERSION) {
        return Err(eyre::eyre!(
            "config_version {on_disk_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    let config: MomConfig = serde_json::from_value(json)?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &MomConfig) -> eyre::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
