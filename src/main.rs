use std::io;
use std::process::ExitCode;

use clap::Parser;
use term_probe::{logging, run, Cli, EnvConfig, ProcessEnv, ProcessProbe};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = EnvConfig::from_env().with_overrides(cli.no_tty_command, cli.no_session);
    logging::init(config.log_filter.as_deref());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(&cli.mode(), &config, &ProcessProbe::new(), &ProcessEnv, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "report failed");
            eprintln!("term-probe: {err}");
            ExitCode::FAILURE
        }
    }
}
