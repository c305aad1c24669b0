use crate::io::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "unitymap")]
#[command(about = "Structural quality analyzer for Unity projects", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a Unity project and report insights and recommendations
    Analyze {
        /// Project root (the folder containing Assets and ProjectSettings)
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to the nearest .unitymap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Abort the analysis after this many seconds
        #[arg(long, env = "UNITYMAP_TIMEOUT")]
        timeout: Option<u64>,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        /// Analyze files sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Increase log verbosity (-v debug, -vv trace)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,

        /// Only print errors and hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Check that a directory looks like an analyzable Unity project
    Check {
        path: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default .unitymap.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_analyze_command() {
        let cli = Cli::parse_from([
            "unitymap",
            "analyze",
            "/projects/demo",
            "--format",
            "json",
            "--timeout",
            "30",
            "-j",
            "2",
            "-vv",
        ]);
        match cli.command {
            Commands::Analyze {
                path,
                format,
                timeout,
                jobs,
                verbosity,
                no_parallel,
                quiet,
                ..
            } => {
                assert_eq!(path, PathBuf::from("/projects/demo"));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(timeout, Some(30));
                assert_eq!(jobs, 2);
                assert_eq!(verbosity, 2);
                assert!(!no_parallel);
                assert!(!quiet);
            }
            other => panic!("expected analyze, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::parse_from(["unitymap", "analyze", "."]);
        match cli.command {
            Commands::Analyze {
                format, output, jobs, ..
            } => {
                assert_eq!(format, OutputFormat::Terminal);
                assert!(output.is_none());
                assert_eq!(jobs, 0);
            }
            other => panic!("expected analyze, got {:?}", other),
        }
    }

    #[test]
    fn test_init_force_flag() {
        let cli = Cli::parse_from(["unitymap", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init { force: true }));
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
