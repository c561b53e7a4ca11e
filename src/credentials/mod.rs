pub mod prompt;

use keyring::Entry;
use std::fmt;

const SERVICE_NAME: &str = "wealth-score";
const KEY_NAME: &str = "narrative-api-key";

/// Environment variable checked before the keyring. The standard name, so an
/// already-exported key is picked up without any setup.
pub const ENV_KEY_VAR: &str = "OPENAI_API_KEY";

pub use prompt::{prompt_for_api_key, setup_api_key_if_missing};

/// Check for an API key in the environment.
/// Returns Some(key) if the variable is set and non-empty, None otherwise.
pub fn get_key_from_env() -> Option<String> {
    match std::env::var(ENV_KEY_VAR) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

#[derive(Debug)]
pub enum CredentialError {
    KeyringUnavailable(String),
    KeyNotFound,
    StoreFailed(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::KeyringUnavailable(msg) => write!(f, "Keyring unavailable: {}", msg),
            CredentialError::KeyNotFound => write!(f, "API key not found in keyring"),
            CredentialError::StoreFailed(msg) => write!(f, "Failed to store API key: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

fn get_key_sync() -> Result<String, CredentialError> {
    let entry = Entry::new(SERVICE_NAME, KEY_NAME)
        .map_err(|e| CredentialError::KeyringUnavailable(format!("{}", e)))?;

    entry.get_password().map_err(|e| match e {
        keyring::Error::NoEntry => CredentialError::KeyNotFound,
        _ => CredentialError::KeyringUnavailable(format!("{}", e)),
    })
}

fn store_key_sync(key: &str) -> Result<(), CredentialError> {
    let entry = Entry::new(SERVICE_NAME, KEY_NAME)
        .map_err(|e| CredentialError::KeyringUnavailable(format!("{}", e)))?;

    entry
        .set_password(key)
        .map_err(|e| CredentialError::StoreFailed(format!("{}", e)))?;

    Ok(())
}

/// Retrieve the API key from the system keyring.
/// Uses spawn_blocking so the keyring call never blocks the async runtime.
pub async fn get_key() -> Result<String, CredentialError> {
    tokio::task::spawn_blocking(get_key_sync)
        .await
        .map_err(|e| CredentialError::KeyringUnavailable(format!("Task join error: {}", e)))?
}

/// Store the API key in the system keyring.
pub async fn store_key(key: String) -> Result<(), CredentialError> {
    tokio::task::spawn_blocking(move || store_key_sync(&key))
        .await
        .map_err(|e| CredentialError::KeyringUnavailable(format!("Task join error: {}", e)))?
}
