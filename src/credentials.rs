// Credential resolution: the Trello api key and secret come from the
// process environment, falling back to a local `.env` file for whichever
// of the two is missing.

use crate::errors::TrelloMoveError;
use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use tracing::debug;

pub const API_KEY_VAR: &str = "TRELLO_API_KEY";
pub const SECRET_VAR: &str = "TRELLO_SECRET";

/// Application credentials, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve from the real process environment, then `env_file`.
    pub fn resolve(env_file: &Path) -> Result<Self> {
        Self::resolve_with(|name| std::env::var(name).ok(), env_file)
    }

    /// Same as [`Credentials::resolve`] with an explicit variable lookup.
    /// Empty values count as missing.
    pub fn resolve_with<F>(lookup: F, env_file: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut api_key = present(API_KEY_VAR);
        let mut secret = present(SECRET_VAR);

        if api_key.is_none() || secret.is_none() {
            let pairs = read_env_file(env_file)?;
            if api_key.is_none() {
                api_key = first_value(&pairs, API_KEY_VAR);
            }
            if secret.is_none() {
                secret = first_value(&pairs, SECRET_VAR);
            }
        } else {
            debug!("credentials taken from environment");
        }

        let api_key = api_key.ok_or(TrelloMoveError::MissingCredential(API_KEY_VAR))?;
        let secret = secret.ok_or(TrelloMoveError::MissingCredential(SECRET_VAR))?;
        Ok(Credentials { api_key, secret })
    }
}

/// All `KEY=value` pairs from a dotenv file, in file order. A missing file
/// yields nothing; lines dotenvy cannot parse are skipped.
fn read_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    if !path.is_file() {
        debug!(path = %path.display(), "no env file");
        return Ok(Vec::new());
    }
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut pairs = Vec::new();
    for item in iter {
        match item {
            Ok(pair) => pairs.push(pair),
            Err(e) => debug!(path = %path.display(), error = %e, "skipping env file line"),
        }
    }
    debug!(path = %path.display(), entries = pairs.len(), "read env file");
    Ok(pairs)
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, v)| k == key && !v.trim().is_empty())
        .map(|(_, v)| v.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn environment_values_win() {
        let td = tempdir().unwrap();
        let env_file = td.path().join(".env");
        fs::write(&env_file, "TRELLO_API_KEY=fromfile\nTRELLO_SECRET=fromfile\n").unwrap();

        let creds = Credentials::resolve_with(
            env(&[(API_KEY_VAR, "envkey"), (SECRET_VAR, "envsecret")]),
            &env_file,
        )
        .unwrap();
        assert_eq!(creds.api_key, "envkey");
        assert_eq!(creds.secret, "envsecret");
    }

    #[test]
    fn missing_values_fall_back_to_env_file() {
        let td = tempdir().unwrap();
        let env_file = td.path().join(".env");
        fs::write(
            &env_file,
            "# trello\nTRELLO_SECRET=s3cr3t\nTRELLO_API_KEY=abc=def\nTRELLO_SECRET=later\n",
        )
        .unwrap();

        let creds = Credentials::resolve_with(env(&[(API_KEY_VAR, "envkey")]), &env_file).unwrap();
        assert_eq!(creds.api_key, "envkey");
        assert_eq!(creds.secret, "s3cr3t");

        let creds = Credentials::resolve_with(env(&[]), &env_file).unwrap();
        assert_eq!(creds.api_key, "abc=def");
    }

    #[test]
    fn empty_environment_value_counts_as_missing() {
        let td = tempdir().unwrap();
        let env_file = td.path().join(".env");
        fs::write(&env_file, "TRELLO_API_KEY=filekey\n").unwrap();

        let creds = Credentials::resolve_with(
            env(&[(API_KEY_VAR, ""), (SECRET_VAR, "envsecret")]),
            &env_file,
        )
        .unwrap();
        assert_eq!(creds.api_key, "filekey");
    }

    #[test]
    fn missing_api_key_is_reported_first() {
        let td = tempdir().unwrap();
        let err = Credentials::resolve_with(env(&[]), &td.path().join(".env")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TRELLO_API_KEY not found in .env file or environment variables"
        );
    }

    #[test]
    fn missing_secret_is_reported() {
        let td = tempdir().unwrap();
        let err = Credentials::resolve_with(env(&[(API_KEY_VAR, "k")]), &td.path().join(".env"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrelloMoveError>(),
            Some(TrelloMoveError::MissingCredential(SECRET_VAR))
        ));
    }

    #[test]
    fn debug_output_hides_values() {
        let creds = Credentials { api_key: "visible?".into(), secret: "nope".into() };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("visible?"));
        assert!(!shown.contains("nope"));
    }
}
