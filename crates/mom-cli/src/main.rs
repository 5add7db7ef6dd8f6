use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use mom_cli::cli::{Cli, Command, run_generate};
use mom_cli::config::{self, MomConfig};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };

    match cli.command {
        Command::Generate(args) => {
            let config = config::load_config(&config_path)?;
            let output = run_generate(&config, &args)?;
            println!("{}", output.display());
        }
        Command::InitConfig { force } => {
            if config_path.exists() && !force {
                return Err(eyre::eyre!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                ));
            }
            config::save_config(&config_path, &MomConfig::default())?;
            println!("{}", config_path.display());
        }
        Command::ShowConfig => {
            let config = config::load_config(&config_path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
