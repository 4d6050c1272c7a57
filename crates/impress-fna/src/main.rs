//! fna binary

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use impress_fna::{logging, Config, Runner};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "fna")]
#[command(about = "Manage key/value attributes in file names", long_about = None)]
struct Cli {
    /// Configuration file; may be repeated. Replaces the default search.
    #[arg(short, long = "config", value_name = "FILE")]
    config: Vec<PathBuf>,

    /// Do not read the default configuration files
    #[arg(long)]
    no_default_config: bool,

    /// Initial decoder
    #[arg(short, long)]
    decoder: Option<String>,

    /// Initial encoder
    #[arg(short, long)]
    encoder: Option<String>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Commands and their arguments; `help` lists commands
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    commands: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> impress_fna::Result<()> {
    let mut config = Config::load(&cli.config, !cli.no_default_config)?;
    if cli.decoder.is_some() {
        config.option.decoder = cli.decoder;
    }
    if cli.encoder.is_some() {
        config.option.encoder = cli.encoder;
    }
    let registries = config.registries()?;
    Runner::stdout(registries).run(cli.commands)
}
