use anyhow::Result;
use clap::Parser;
use unitymap::cli::{Cli, Commands};
use unitymap::commands::{check_project, handle_analyze, init_config, AnalyzeConfig};
use unitymap::observability::{init_logging, install_panic_hook};

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_panic_hook();

    let success = match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            config,
            timeout,
            jobs,
            no_parallel,
            verbosity,
            quiet,
        } => {
            init_logging(verbosity, quiet);
            handle_analyze(AnalyzeConfig {
                path,
                format,
                output,
                config,
                timeout,
                jobs,
                parallel: should_use_parallel(no_parallel),
                verbosity,
                quiet,
            })?
        }
        Commands::Check { path, config } => {
            init_logging(0, false);
            check_project(&path, config.as_deref())?
        }
        Commands::Init { force } => {
            init_logging(0, false);
            init_config(force)?;
            true
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn should_use_parallel(no_parallel: bool) -> bool {
    !no_parallel
}
