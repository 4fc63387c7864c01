use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "mdbridge", version, about = "Discover, enrich and convert legacy Access databases into SQLite")]
pub struct Cli {
    /// Read settings from this file instead of the user config directory
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}
impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::WARN,
            (false, 0) => LevelFilter::INFO,
            (false, 1) => LevelFilter::DEBUG,
            (false, _) => LevelFilter::TRACE,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find database files in a folder and enrich them from the nearest catalog
    Discover {
        /// Folder to scan; a folder dialog is shown when omitted
        #[arg(value_name = "FOLDER")]
        folder: Option<PathBuf>,
    },
    /// Convert database files into SQLite stores
    Convert {
        /// Write every store into this directory instead of next to its source
        #[arg(long, short, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Handle a host message, reading its JSON payload from stdin
    Handle {
        /// `mdbSelectFolder` or `mdbConvert`
        #[arg(value_name = "MESSAGE_TYPE")]
        message_type: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["mdbridge", "discover"], LevelFilter::INFO)]
    #[case(&["mdbridge", "-v", "discover"], LevelFilter::DEBUG)]
    #[case(&["mdbridge", "discover", "-vvv"], LevelFilter::TRACE)]
    #[case(&["mdbridge", "--quiet", "discover"], LevelFilter::WARN)]
    fn test_log_level(#[case] args: &[&str], #[case] expected: LevelFilter) {
        assert_eq!(Cli::parse_from(args).log_level(), expected);
    }

    #[test]
    fn test_convert_arguments() {
        let cli = Cli::try_parse_from(["mdbridge", "convert", "-o", "/out", "a.mdb", "b.accdb"]).unwrap();
        let Command::Convert { output_dir, files } = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(output_dir, Some(PathBuf::from("/out")));
        assert_eq!(files, vec![PathBuf::from("a.mdb"), PathBuf::from("b.accdb")]);

        assert!(Cli::try_parse_from(["mdbridge", "convert"]).is_err());
    }
}
