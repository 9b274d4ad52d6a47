// Command driver: resolve credentials and session, fetch the board's lists
// and cards, pick the card and the target list by fuzzy name, then move.

use crate::api::{BoardApi, TrelloClient};
use crate::cli::Args;
use crate::config::{self, ConfigStore, Settings};
use crate::credentials::Credentials;
use crate::fuzzy;
use crate::ui::{self, Prompt, TerminalPrompt};
use anyhow::Result;
use std::fmt;
use tracing::{debug, warn};

/// What a run did, rendered as the final line the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadyInList { card: String, list: String },
    Moved { card: String, from: String, to: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AlreadyInList { card, list } => {
                write!(f, "Card '{card}' is already in list '{list}'")
            }
            Outcome::Moved { card, from, to } => {
                write!(f, "Moved card '{card}' from '{from}' to '{to}'")
            }
        }
    }
}

/// Move the card matching `card_needle` into the list matching
/// `list_needle` on `board_id`. No request is sent when the card is
/// already there.
pub fn move_card_by_name<A: BoardApi>(
    api: &A,
    board_id: &str,
    card_needle: &str,
    list_needle: &str,
    prompt: &mut dyn Prompt,
) -> Result<Outcome> {
    let pb = ui::spinner("Fetching lists and cards...");
    let fetched = api
        .list_lists(board_id)
        .and_then(|lists| Ok((lists, api.list_cards(board_id)?)));
    pb.finish_and_clear();
    let (lists, cards) = fetched?;
    debug!(lists = lists.len(), cards = cards.len(), "fetched board contents");

    let card = fuzzy::resolve(card_needle, &cards, prompt)?;
    let target = fuzzy::resolve(list_needle, &lists, prompt)?;

    if card.list_id == target.id {
        return Ok(Outcome::AlreadyInList {
            card: card.name.clone(),
            list: target.name.clone(),
        });
    }

    // A card on an archived list references a list the board no longer returns.
    let from = match lists.iter().find(|l| l.id == card.list_id) {
        Some(list) => list.name.clone(),
        None => {
            warn!(list_id = %card.list_id, "current list of card not found on board");
            card.list_id.clone()
        }
    };

    let pb = ui::spinner("Moving card...");
    let moved = api.move_card(&card.id, &target.id);
    pb.finish_and_clear();
    let moved = moved?;
    debug!(card_id = %moved.id, list_id = %moved.list_id, "move acknowledged");

    Ok(Outcome::Moved {
        card: card.name.clone(),
        from,
        to: target.name.clone(),
    })
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    let settings = Settings::from_env()?;
    let creds = Credentials::resolve(&settings.env_file)?;
    let mut prompt = TerminalPrompt;

    let store = ConfigStore::new(&settings.config_path);
    let session = config::load_or_authorize(
        &store,
        &settings.authorize_url,
        &creds,
        |token| TrelloClient::new(&settings.api_base_url, &creds.api_key, token),
        &mut prompt,
    )?;
    debug!(board = %session.board_name, "using board");

    let api = TrelloClient::new(&settings.api_base_url, &creds.api_key, &session.token)?;
    let outcome = move_card_by_name(&api, &session.board_id, &args.card, &args.column, &mut prompt)?;
    println!("\n{outcome}");
    Ok(())
}
