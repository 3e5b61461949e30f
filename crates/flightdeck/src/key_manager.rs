use std::env;

use keyring::Entry;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Keyring service under which secrets are stored.
const KEYRING_SERVICE: &str = "flightdeck";

/// Chat provider credential. Required before any completion call can
/// be made; missing means startup fails.
pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";

/// Flight data provider credential. Its absence degrades to an in-band
/// tool error string rather than a startup failure.
pub const FLIGHT_API_KEY: &str = "CLIENTSECRET";

#[derive(Error, Debug)]
pub enum KeyManagerError {
    #[error("Could not find {0} in environment variables or keyring")]
    NotFound(String),
}

/// A place secrets can be looked up from.
#[cfg_attr(test, automock)]
pub trait SecretSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

pub struct EnvSource;

impl SecretSource for EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.is_empty())
    }
}

pub struct KeyringSource;

impl SecretSource for KeyringSource {
    fn get(&self, name: &str) -> Option<String> {
        Entry::new(KEYRING_SERVICE, name)
            .and_then(|entry| entry.get_password())
            .ok()
    }
}

/// Look a secret up in the environment first, falling back to the OS
/// keyring.
pub fn get_secret(name: &str) -> Result<String, KeyManagerError> {
    get_secret_from(name, &[&EnvSource, &KeyringSource])
}

pub fn get_secret_from(
    name: &str,
    sources: &[&dyn SecretSource],
) -> Result<String, KeyManagerError> {
    sources
        .iter()
        .find_map(|source| source.get(name))
        .ok_or_else(|| KeyManagerError::NotFound(name.to_string()))
}
