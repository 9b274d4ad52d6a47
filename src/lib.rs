// Library root
// -----------
// The binary (`main.rs`) parses arguments, sets up logging and hands off
// to `app::run`. Everything it needs lives here so it can be tested
// without a terminal or a network.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the Trello REST API and the board,
//   list and card types it returns.
// - `app`: the command driver that ties a run together.
// - `cli`: the two positional arguments.
// - `config`: runtime settings, the saved session file and the first-run
//   authorization flow.
// - `credentials`: api key and secret from the environment or `.env`.
// - `errors`: typed failure modes.
// - `fuzzy`: case-insensitive substring matching with disambiguation.
// - `ui`: the prompt abstraction and the terminal spinner.
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod fuzzy;
pub mod ui;

pub use errors::TrelloMoveError;
