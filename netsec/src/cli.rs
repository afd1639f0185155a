// netsec/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netsec")]
#[command(
    about = "Artifact-chained training pipeline for network security classifiers",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Defaults to `run` in the current directory.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the training pipeline (ingestion -> validation -> transformation -> training)
    Run {
        /// Project directory (holds pipeline.yaml)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧹 Removes every run under the configured artifact directory
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

impl Cli {
    /// The subcommand to execute, with the bare invocation mapped to `run`.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Run {
            project_dir: PathBuf::from("."),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_bare_invocation_runs() -> Result<()> {
        let args = Cli::parse_from(["netsec"]);
        match args.into_command() {
            Commands::Run { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_project_dir() -> Result<()> {
        let args = Cli::parse_from(["netsec", "run", "--project-dir", "/tmp"]);
        match args.into_command() {
            Commands::Run { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_clean() -> Result<()> {
        let args = Cli::parse_from(["netsec", "clean"]);
        match args.into_command() {
            Commands::Clean { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                Ok(())
            }
            _ => bail!("Expected Clean command"),
        }
    }
}
