// Command-line surface: exactly two positional arguments.

use clap::Parser;

const PROGRAM: &str = "trello_move";

/// Move a Trello card to another list using partial, case-insensitive names.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "trello_move", version, about)]
pub struct Args {
    /// Part of the card's name
    #[arg(value_name = "CARD_NAME", allow_hyphen_values = true)]
    pub card: String,

    /// Part of the target list's name
    #[arg(value_name = "COLUMN", allow_hyphen_values = true)]
    pub column: String,
}

/// Parse from an explicit argument list (first item is the program name).
pub fn parse_from<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args)
}

/// Short usage shown when the argument count is wrong.
pub fn usage() -> String {
    format!("Usage: {PROGRAM} <card_name> <column>\ne.g. {PROGRAM} fcas testing")
}
