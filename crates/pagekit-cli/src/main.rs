//! Pagekit CLI: lint and inspect object repositories
//!
//! ## Usage
//!
//! ```bash
//! pagekit check pages/*.xml                       # Validate every element, every platform
//! pagekit check LoginPage.xml -p web              # Web variants only
//! pagekit resolve LoginPage.xml lblCountry -p web --set '$$countryName$$=USA'
//! pagekit list LoginPage.xml                      # Elements and their platforms
//! ```

use clap::Parser;
use pagekit_cli::{
    handlers::{execute_check, execute_list, execute_resolve},
    logging::init_logging,
    Cli, CliConfig, CliResult, ColorChoice, Commands, Reporter, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    init_logging(verbosity, color.should_color());

    let config = CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_framework_file(cli.config.as_deref())?;
    let reporter = Reporter::new(config.color.should_color(), verbosity.is_quiet());

    match cli.command {
        Commands::Check(args) => execute_check(&config, &args, &reporter),
        Commands::Resolve(args) => execute_resolve(&config, &args, &reporter),
        Commands::List(args) => execute_list(&args, &reporter),
    }
}
