use clap::{Parser, Subcommand};
use tempo_events::{domain::UserEventId, SortOrder};

#[derive(Debug, Parser)]
#[command(name = "tempo")]
#[command(about = "Record time entries and browse them by day")]
pub struct Cli {
    /// Use local in-memory data instead of the events backend
    #[arg(long, global = true)]
    pub dev: bool,

    /// List days newest first
    #[arg(long, global = true, conflicts_with = "asc")]
    pub desc: bool,

    /// List days oldest first
    #[arg(long, global = true)]
    pub asc: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Sort order requested on the command line, if any.
    pub fn sort_order(&self) -> Option<SortOrder> {
        if self.desc {
            Some(SortOrder::Descending)
        } else if self.asc {
            Some(SortOrder::Ascending)
        } else {
            None
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show all entries grouped by day
    List,
    /// Start the recorder
    Start,
    /// Stop the recorder and save the entry
    Stop,
    /// Show whether the recorder is running
    Status,
    /// Start the recorder and show elapsed time until Ctrl-C
    Record,
    /// Change the title of an entry
    Rename { id: UserEventId, title: String },
    /// Delete an entry
    Delete { id: UserEventId },
    /// Print config path and create default file if missing
    ConfigPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rename_with_id_and_title() {
        let cli = Cli::parse_from(["tempo", "rename", "4", "Planning"]);

        let Commands::Rename { id, title } = cli.command else {
            panic!("expected rename");
        };
        assert_eq!(id, UserEventId::new(4));
        assert_eq!(title, "Planning");
    }

    #[test]
    fn sort_flags_are_global() {
        let cli = Cli::parse_from(["tempo", "list", "--desc"]);
        assert_eq!(cli.sort_order(), Some(SortOrder::Descending));

        let cli = Cli::parse_from(["tempo", "--dev", "list"]);
        assert!(cli.dev);
        assert_eq!(cli.sort_order(), None);
    }

    #[test]
    fn conflicting_sort_flags_are_rejected() {
        assert!(Cli::try_parse_from(["tempo", "list", "--asc", "--desc"]).is_err());
    }
}
