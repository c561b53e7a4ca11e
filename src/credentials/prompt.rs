use anyhow::{Context, Result};

use super::{get_key, get_key_from_env, store_key, CredentialError, ENV_KEY_VAR};

/// Prompt for the narrative service API key without echoing it.
pub fn prompt_for_api_key() -> Result<String> {
    println!("An API key for the narrative service is required.");
    println!("For OpenAI, create one at: https://platform.openai.com/api-keys");
    println!("(You can also export {} instead.)", ENV_KEY_VAR);
    println!();

    let key = rpassword::prompt_password("Enter API key: ")
        .context("Failed to read API key from stdin")?;

    let key = key.trim();

    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    Ok(key.to_string())
}

/// Resolve the API key: environment first, then keyring, then an
/// interactive prompt whose answer is stored for next time.
pub async fn setup_api_key_if_missing() -> Result<String> {
    if let Some(key) = get_key_from_env() {
        return Ok(key);
    }

    match get_key().await {
        Ok(key) => Ok(key),
        Err(CredentialError::KeyNotFound) => {
            let key = prompt_for_api_key()?;

            store_key(key.clone())
                .await
                .context("Failed to store API key in keyring")?;

            println!("API key stored securely in the system keyring.");

            Ok(key)
        }
        Err(CredentialError::KeyringUnavailable(msg)) => {
            anyhow::bail!(
                "System keyring unavailable and {} is not set. Export the key \
                or enable a keyring (macOS Keychain, Windows Credential Store, \
                or Linux Secret Service).\nError: {}",
                ENV_KEY_VAR,
                msg
            );
        }
        Err(e) => {
            anyhow::bail!("Failed to access keyring: {}", e);
        }
    }
}
