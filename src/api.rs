// API client module: a small blocking HTTP client for the Trello REST API.
// Every call carries the api key and the user token as query parameters
// and maps the JSON response straight into the types below.

use crate::errors::TrelloMoveError;
use crate::fuzzy::Named;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A board owned by the authorized member.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub id: String,
    pub name: String,
}

/// A column on the configured board.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub id: String,
    pub name: String,
}

/// A card and the list that currently holds it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(rename = "idList")]
    pub list_id: String,
}

impl Board {
    pub fn new(id: &str, name: &str) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl List {
    pub fn new(id: &str, name: &str) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl Card {
    pub fn new(id: &str, name: &str, list_id: &str) -> Self {
        Self { id: id.into(), name: name.into(), list_id: list_id.into() }
    }
}

impl Named for Board {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for List {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Card {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The four remote operations the program needs. `TrelloClient` is the
/// real implementation; tests substitute an in-memory board.
pub trait BoardApi {
    fn list_boards(&self) -> Result<Vec<Board>>;
    fn list_lists(&self, board_id: &str) -> Result<Vec<List>>;
    fn list_cards(&self, board_id: &str) -> Result<Vec<Card>>;
    /// Put the card into `list_id` and return the updated card.
    fn move_card(&self, card_id: &str, list_id: &str) -> Result<Card>;
}

/// Blocking client bound to one api key and one member token.
pub struct TrelloClient {
    client: Client,
    base_url: String,
    api_key: String,
    token: String,
}

impl TrelloClient {
    pub fn new(base_url: &str, api_key: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TrelloClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.query(&[("key", self.api_key.as_str()), ("token", self.token.as_str())])
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, fields: &str) -> Result<T> {
        debug!(endpoint = path, "GET");
        let req = self
            .authed(self.client.get(self.url(path)))
            .query(&[("fields", fields)]);
        let res = req
            .send()
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to {path}"))?;
        Self::decode(path, res)
    }

    /// Check the status, then parse the body. Non-2xx responses keep the
    /// body text so the server's reason reaches the user.
    fn decode<T: DeserializeOwned>(path: &str, res: reqwest::blocking::Response) -> Result<T> {
        let status = res.status();
        let body = res
            .text()
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read response from {path}"))?;
        debug!(endpoint = path, %status, "response");
        if !status.is_success() {
            return Err(TrelloMoveError::RequestFailed {
                endpoint: path.to_string(),
                status,
                body,
            }
            .into());
        }
        serde_json::from_str(&body).with_context(|| format!("Parsing {path} response json"))
    }
}

impl BoardApi for TrelloClient {
    fn list_boards(&self) -> Result<Vec<Board>> {
        self.get_json("/members/me/boards", "name,id")
    }

    fn list_lists(&self, board_id: &str) -> Result<Vec<List>> {
        self.get_json(&format!("/boards/{board_id}/lists"), "name,id")
    }

    fn list_cards(&self, board_id: &str) -> Result<Vec<Card>> {
        self.get_json(&format!("/boards/{board_id}/cards"), "name,id,idList")
    }

    fn move_card(&self, card_id: &str, list_id: &str) -> Result<Card> {
        let path = format!("/cards/{card_id}");
        info!(card_id, list_id, "moving card");
        let res = self
            .authed(self.client.put(self.url(&path)))
            .query(&[("idList", list_id)])
            .send()
            .map_err(reqwest::Error::without_url)
            .context("Failed to send move request")?;
        Self::decode(&path, res)
    }
}
