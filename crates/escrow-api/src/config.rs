//! Server configuration read from the environment at startup.

use std::net::SocketAddr;

use escrow_core::ids::AccountId;
use uuid::Uuid;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`HOST`).
    pub host: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Ledger account that holds escrowed tokens (`ESCROW_ACCOUNT_ID`).
    /// A random account is generated when unset.
    pub escrow_account: AccountId,
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` or `ESCROW_ACCOUNT_ID` is set to
    /// an unparsable value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` or `ESCROW_ACCOUNT_ID` is set to
    /// an unparsable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };

        let escrow_account = match lookup("ESCROW_ACCOUNT_ID") {
            Some(raw) => Uuid::parse_str(&raw).map(AccountId).map_err(|e| {
                AppError::Config(format!("ESCROW_ACCOUNT_ID must be a UUID: {e}"))
            })?,
            None => AccountId::new_v4(),
        };

        Ok(Self {
            host,
            port,
            escrow_account,
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST` and `PORT` do not form a socket
    /// address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(
            config.socket_addr().unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_explicit_values_are_used() {
        let account = Uuid::new_v4();
        let account_str = account.to_string();

        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("ESCROW_ACCOUNT_ID", account_str.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.escrow_account, AccountId(account));
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("PORT")));
    }

    #[test]
    fn test_invalid_escrow_account_is_a_config_error() {
        let result = ServerConfig::from_lookup(lookup(&[("ESCROW_ACCOUNT_ID", "not-a-uuid")]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("ESCROW_ACCOUNT_ID")));
    }

    #[test]
    fn test_unparsable_host_fails_socket_addr() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", "not a host")])).unwrap();

        assert!(matches!(config.socket_addr(), Err(AppError::Config(_))));
    }
}
