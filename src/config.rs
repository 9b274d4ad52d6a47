// Runtime settings and the persisted session (token + selected board).
//
// The session lives in a small YAML file in the user's home directory. When
// it is missing, `load_or_authorize` runs the one-time interactive flow:
// show the authorization URL, take the pasted token, let the user pick a
// board, and write the file.

use crate::api::BoardApi;
use crate::credentials::Credentials;
use crate::errors::TrelloMoveError;
use crate::ui::{self, Prompt};
use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://api.trello.com/1";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://trello.com/1/authorize";
pub const CONFIG_FILE_NAME: &str = ".trello_config.yml";

/// Where to talk to and where to keep state. Built once in `main` and
/// passed down so tests can point everything at temp dirs and mock servers.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub authorize_url: String,
    pub config_path: PathBuf,
    pub env_file: PathBuf,
}

impl Settings {
    /// Defaults, with `TRELLO_API_URL` and `TRELLO_CONFIG_FILE` as
    /// overrides for the API base URL and the session file.
    pub fn from_env() -> Result<Self> {
        let api_base_url =
            std::env::var("TRELLO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let config_path = match std::env::var_os("TRELLO_CONFIG_FILE") {
            Some(p) => PathBuf::from(p),
            None => dirs::home_dir()
                .context("Could not determine the home directory")?
                .join(CONFIG_FILE_NAME),
        };
        Ok(Settings {
            api_base_url,
            authorize_url: DEFAULT_AUTHORIZE_URL.into(),
            config_path,
            env_file: PathBuf::from(".env"),
        })
    }
}

/// The persisted session: member token plus the board cards are moved on.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub token: String,
    pub board_id: String,
    pub board_name: String,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("token", &"<redacted>")
            .field("board_id", &self.board_id)
            .field("board_name", &self.board_name)
            .finish()
    }
}

/// Reads and writes the session file as a whole.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no session has been saved yet.
    pub fn load(&self) -> Result<Option<SessionConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let cfg: SessionConfig = serde_yaml::from_str(&text).map_err(|e| self.invalid(e))?;
        for (key, value) in [
            ("token", &cfg.token),
            ("board_id", &cfg.board_id),
            ("board_name", &cfg.board_name),
        ] {
            if value.trim().is_empty() {
                return Err(self.invalid(format!("`{key}` is empty")).into());
            }
        }
        debug!(path = %self.path.display(), board = %cfg.board_name, "loaded session config");
        Ok(Some(cfg))
    }

    pub fn save(&self, cfg: &SessionConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let text = serde_yaml::to_string(cfg).context("Serializing session config")?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!(path = %self.path.display(), "saved session config");
        Ok(())
    }

    fn invalid(&self, reason: impl ToString) -> TrelloMoveError {
        TrelloMoveError::ConfigParse {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

/// URL the user opens to grant this app a non-expiring read/write token.
pub fn authorization_url(authorize_url: &str, api_key: &str) -> Result<Url> {
    Url::parse_with_params(
        authorize_url,
        &[
            ("expiration", "never"),
            ("scope", "read,write"),
            ("response_type", "token"),
            ("name", "Server Token"),
            ("key", api_key),
        ],
    )
    .with_context(|| format!("Invalid authorization URL {authorize_url}"))
}

/// Load the saved session, or run the first-run flow and save its result.
///
/// `connect` builds a board client for the freshly pasted token; it is only
/// called on first run.
pub fn load_or_authorize<A, F>(
    store: &ConfigStore,
    authorize_url: &str,
    creds: &Credentials,
    connect: F,
    prompt: &mut dyn Prompt,
) -> Result<SessionConfig>
where
    A: BoardApi,
    F: FnOnce(&str) -> Result<A>,
{
    if let Some(cfg) = store.load()? {
        return Ok(cfg);
    }
    info!(path = %store.path().display(), "no session config, starting authorization");

    let url = authorization_url(authorize_url, &creds.api_key)?;
    prompt.say("\nPlease visit this URL to authorize the application:");
    prompt.say(url.as_str());
    let token = prompt.ask_text("Enter the token you received")?;

    let api = connect(&token)?;
    let pb = ui::spinner("Fetching boards...");
    let boards = api.list_boards();
    pb.finish_and_clear();
    let boards = boards?;
    if boards.is_empty() {
        return Err(TrelloMoveError::NoBoards.into());
    }

    let names: Vec<String> = boards.iter().map(|b| b.name.clone()).collect();
    let index = prompt.choose("Available boards:", &names, "Select board number")?;
    let board = boards.get(index).ok_or(TrelloMoveError::InvalidSelection {
        choice: index + 1,
        count: boards.len(),
    })?;

    let cfg = SessionConfig {
        token,
        board_id: board.id.clone(),
        board_name: board.name.clone(),
    };
    store.save(&cfg)?;
    prompt.say(&format!("Saved configuration to {}", store.path().display()));
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Board, Card, List};
    use crate::ui::testing::ScriptedPrompt;
    use tempfile::tempdir;

    struct BoardsOnly {
        boards: Vec<Board>,
        token: String,
    }

    impl BoardApi for BoardsOnly {
        fn list_boards(&self) -> Result<Vec<Board>> {
            assert_eq!(self.token, "pasted-token");
            Ok(self.boards.clone())
        }
        fn list_lists(&self, _: &str) -> Result<Vec<List>> {
            unreachable!("first run only lists boards")
        }
        fn list_cards(&self, _: &str) -> Result<Vec<Card>> {
            unreachable!("first run only lists boards")
        }
        fn move_card(&self, _: &str, _: &str) -> Result<Card> {
            unreachable!("first run only lists boards")
        }
    }

    fn creds() -> Credentials {
        Credentials { api_key: "KEY".into(), secret: "SECRET".into() }
    }

    fn connect(boards: Vec<Board>) -> impl FnOnce(&str) -> Result<BoardsOnly> {
        move |token: &str| {
            Ok(BoardsOnly { boards, token: token.to_string() })
        }
    }

    #[test]
    fn first_run_saves_selected_board_and_reload_round_trips() {
        let td = tempdir().unwrap();
        let store = ConfigStore::new(td.path().join("nested/dir/.trello_config.yml"));
        let mut prompt = ScriptedPrompt::new(&["  pasted-token \n", "2"]);
        let boards = vec![Board::new("B1", "Work"), Board::new("B2", "Home: stuff")];

        let cfg = load_or_authorize(&store, DEFAULT_AUTHORIZE_URL, &creds(), connect(boards), &mut prompt)
            .unwrap();
        assert_eq!(cfg.token, "pasted-token");
        assert_eq!(cfg.board_id, "B2");
        assert_eq!(cfg.board_name, "Home: stuff");
        assert_eq!(prompt.choices_offered, vec![vec!["Work".to_string(), "Home: stuff".to_string()]]);
        assert!(prompt.transcript.iter().any(|l| l.contains("key=KEY")));

        let reloaded = ConfigStore::new(store.path()).load().unwrap().unwrap();
        assert_eq!(reloaded, cfg);
    }

    #[test]
    fn existing_config_skips_authorization() {
        let td = tempdir().unwrap();
        let path = td.path().join(".trello_config.yml");
        fs::write(&path, "board_id: B9\nboard_name: Sprint\ntoken: abc\n").unwrap();
        let store = ConfigStore::new(&path);
        let mut prompt = ScriptedPrompt::default();

        let cfg = load_or_authorize(
            &store,
            DEFAULT_AUTHORIZE_URL,
            &creds(),
            |_: &str| -> Result<BoardsOnly> { panic!("must not connect when configured") },
            &mut prompt,
        )
        .unwrap();
        assert_eq!(cfg.board_id, "B9");
        assert_eq!(cfg.board_name, "Sprint");
        assert!(prompt.transcript.is_empty());
    }

    #[test]
    fn missing_key_is_a_parse_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("cfg.yml");
        fs::write(&path, "token: abc\nboard_id: B1\n").unwrap();
        let err = ConfigStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrelloMoveError>(),
            Some(TrelloMoveError::ConfigParse { .. })
        ));
        assert!(err.to_string().contains("board_name"));
    }

    #[test]
    fn empty_value_is_a_parse_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("cfg.yml");
        fs::write(&path, "token: ''\nboard_id: B1\nboard_name: X\n").unwrap();
        let err = ConfigStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("`token` is empty"));
    }

    #[test]
    fn absent_file_loads_as_none() {
        let td = tempdir().unwrap();
        assert!(ConfigStore::new(td.path().join("nope.yml")).load().unwrap().is_none());
    }

    #[test]
    fn no_boards_is_an_error_and_nothing_is_saved() {
        let td = tempdir().unwrap();
        let store = ConfigStore::new(td.path().join("cfg.yml"));
        let mut prompt = ScriptedPrompt::new(&["pasted-token"]);
        let err = load_or_authorize(&store, DEFAULT_AUTHORIZE_URL, &creds(), connect(vec![]), &mut prompt)
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<TrelloMoveError>(), Some(TrelloMoveError::NoBoards)));
        assert!(!store.path().exists());
    }

    #[test]
    fn out_of_range_board_choice_is_rejected() {
        let td = tempdir().unwrap();
        let store = ConfigStore::new(td.path().join("cfg.yml"));
        let mut prompt = ScriptedPrompt::new(&["pasted-token", "3"]);
        let err = load_or_authorize(
            &store,
            DEFAULT_AUTHORIZE_URL,
            &creds(),
            connect(vec![Board::new("B1", "Work")]),
            &mut prompt,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrelloMoveError>(),
            Some(TrelloMoveError::InvalidSelection { choice: 3, count: 1 })
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn authorization_url_carries_fixed_parameters() {
        let url = authorization_url(DEFAULT_AUTHORIZE_URL, "my key").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(url.path(), "/1/authorize");
        assert!(pairs.contains(&("expiration".into(), "never".into())));
        assert!(pairs.contains(&("scope".into(), "read,write".into())));
        assert!(pairs.contains(&("response_type".into(), "token".into())));
        assert!(pairs.contains(&("key".into(), "my key".into())));
    }
}
