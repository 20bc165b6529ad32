use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lector", version, about = "Inspect what a captured page would read aloud")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress extraction logging.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the narration passages extracted from a snapshot.
    Extract(ExtractArgs),
    /// List the embedded frames a snapshot carries.
    Frames(FramesArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Snapshot JSON file captured from a rendered page.
    pub snapshot: PathBuf,

    /// Emit the passage list as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Join line-structured passages into sentence-shaped paragraphs.
    #[arg(long)]
    pub join_lines: bool,
}

#[derive(Debug, Args)]
pub struct FramesArgs {
    /// Snapshot JSON file captured from a rendered page.
    pub snapshot: PathBuf,

    /// Emit the frame list as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extract_with_flags() {
        let cli =
            Cli::try_parse_from(["lector", "extract", "page.json", "--json", "--join-lines"])
                .unwrap();
        match cli.command {
            Commands::Extract(args) => {
                assert_eq!(args.snapshot.to_str(), Some("page.json"));
                assert!(args.json);
                assert!(args.join_lines);
            }
            Commands::Frames(_) => panic!("expected extract"),
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["lector", "-v", "-q", "extract", "page.json"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["lector", "-vv", "frames", "page.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
