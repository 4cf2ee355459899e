mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // 初始化日志系统
    diagrun::logger::init_logger(&config.log.level);

    match &cli.command {
        Commands::List => {
            cli::list();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Selfcheck { names } => {
            if cli::selfcheck(&config, names).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
