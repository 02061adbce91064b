use std::io;
use std::process;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;
use tracing::error;

use azinfra::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    let args = cli::parse_args()?;

    let log_level = match &args.command {
        Commands::Compile(opts) => opts.log_level,
        Commands::Status(opts) => opts.log_level,
        Commands::Validate(opts) => opts.log_level,
        Commands::Completions(opts) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opts.shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
    };

    azinfra::init_logging(log_level)?;

    let result = match &args.command {
        Commands::Compile(opts) => azinfra::run_compile(opts).map(|out| println!("{}", out)),
        Commands::Status(opts) => azinfra::run_status(opts).map(|out| println!("{}", out)),
        Commands::Validate(opts) => azinfra::run_validate(opts),
        Commands::Completions(_) => Ok(()),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}
