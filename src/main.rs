use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use hubzip::cli::Cli;

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let label = error_label(std::io::stderr().is_terminal());
            eprintln!("{}: {} {:#}", env!("CARGO_PKG_NAME"), label, err);
            ExitCode::FAILURE
        }
    }
}

// colored only looks at stdout, so redirected stderr has to be checked here
fn error_label(colorize: bool) -> String {
    if colorize {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
