//! Configuration loader for chatrelay.
//!
//! Reads an optional TOML file into [`RelayConfig`], then applies environment
//! overrides. Precedence, lowest first: built-in defaults, config file,
//! environment (including a `.env` file), command-line flags (applied by
//! the binary).

use std::path::Path;

use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ConfigError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "chatrelay.toml";

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_HUB_URL: &str = "MERCURE_URL";
pub const ENV_HUB_TOKEN: &str = "MERCURE_JWT_TOKEN";
pub const ENV_PUBLISH_TIMEOUT: &str = "CHATRELAY_PUBLISH_TIMEOUT_SECS";
pub const ENV_PUBLISH_MAX_ATTEMPTS: &str = "CHATRELAY_PUBLISH_MAX_ATTEMPTS";
pub const ENV_BIND: &str = "CHATRELAY_BIND";

/// Load variables from a `.env` file in the working directory, if present.
///
/// Variables already set in the process environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env file: {e}"),
    }
}

/// Load configuration from file and process environment.
///
/// - `path = None` reads `chatrelay.toml` if it exists, otherwise defaults.
/// - `path = Some(..)` must exist.
/// - A file that exists but fails to parse is always an error.
pub async fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = read_config_file(path).await?;
    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    Ok(config)
}

async fn read_config_file(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let (config_path, required) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!("No {} found, using defaults", config_path.display());
            return Ok(RelayConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    toml::from_str::<RelayConfig>(&content).map_err(|err| ConfigError::Parse {
        path: config_path.display().to_string(),
        reason: err.to_string(),
    })
}

/// Overlay environment variables onto `config`.
///
/// `lookup` returns the value of a variable, or `None` when unset. Empty
/// values count as unset, except `MERCURE_JWT_TOKEN` where empty clears
/// the token.
pub fn apply_env_overrides(
    config: &mut RelayConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

    if let Some(url) = get(ENV_DATABASE_URL) {
        config.database_url = url;
    }
    if let Some(url) = get(ENV_HUB_URL) {
        config.hub.url = url;
    }
    if let Some(token) = lookup(ENV_HUB_TOKEN) {
        config.hub.token = Some(token).filter(|t| !t.is_empty());
    }
    if let Some(secs) = get(ENV_PUBLISH_TIMEOUT) {
        let secs: u64 = parse_env(ENV_PUBLISH_TIMEOUT, &secs)?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnv {
                var: ENV_PUBLISH_TIMEOUT,
                reason: "timeout must be at least 1 second".to_string(),
            });
        }
        config.hub.publish_timeout_secs = secs;
    }
    if let Some(attempts) = get(ENV_PUBLISH_MAX_ATTEMPTS) {
        config.hub.max_attempts = parse_env(ENV_PUBLISH_MAX_ATTEMPTS, &attempts)?;
    }
    if let Some(bind) = get(ENV_BIND) {
        let (host, port) = bind.rsplit_once(':').ok_or_else(|| ConfigError::InvalidEnv {
            var: ENV_BIND,
            reason: format!("expected host:port, got {bind:?}"),
        })?;
        config.server.port = parse_env(ENV_BIND, port)?;
        config.server.host = host.to_string();
    }

    Ok(())
}

fn parse_env<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        var,
        reason: format!("{value:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[tokio::test]
    async fn read_config_explicit_file_parses() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("relay.toml");
        tokio::fs::write(
            &path,
            r#"
database_url = "sqlite://relay.db?mode=rwc"

[hub]
max_attempts = 3
"#,
        )
        .await
        .unwrap();

        let config = read_config_file(Some(&path)).await.unwrap();
        assert_eq!(config.database_url, "sqlite://relay.db?mode=rwc");
        assert_eq!(config.hub.max_attempts, 3);
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn read_config_explicit_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.toml");

        let err = read_config_file(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn read_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!").await.unwrap();

        let err = read_config_file(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = RelayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("DATABASE_URL", "sqlite:///data/chat.db"),
                ("MERCURE_URL", "https://hub.example.com/.well-known/mercure"),
                ("MERCURE_JWT_TOKEN", "jwt"),
                ("CHATRELAY_PUBLISH_TIMEOUT_SECS", "3"),
                ("CHATRELAY_PUBLISH_MAX_ATTEMPTS", "4"),
                ("CHATRELAY_BIND", "127.0.0.1:9000"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database_url, "sqlite:///data/chat.db");
        assert_eq!(config.hub.url, "https://hub.example.com/.well-known/mercure");
        assert_eq!(config.hub.token.as_deref(), Some("jwt"));
        assert_eq!(config.hub.publish_timeout_secs, 3);
        assert_eq!(config.hub.max_attempts, 4);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn env_empty_values_are_ignored_and_empty_token_clears() {
        let mut config = RelayConfig::default();
        config.hub.token = Some("from-file".to_string());

        apply_env_overrides(
            &mut config,
            env(&[("DATABASE_URL", ""), ("MERCURE_JWT_TOKEN", "")]),
        )
        .unwrap();

        assert_eq!(config.database_url, "sqlite://chatrelay.db?mode=rwc");
        assert!(config.hub.token.is_none());
    }

    #[test]
    fn env_invalid_numbers_are_rejected() {
        let mut config = RelayConfig::default();
        let err = apply_env_overrides(
            &mut config,
            env(&[("CHATRELAY_PUBLISH_MAX_ATTEMPTS", "lots")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { var: "CHATRELAY_PUBLISH_MAX_ATTEMPTS", .. }
        ));

        let err = apply_env_overrides(&mut config, env(&[("CHATRELAY_BIND", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "CHATRELAY_BIND", .. }));
    }

    #[test]
    fn env_zero_publish_timeout_is_rejected() {
        let mut config = RelayConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("CHATRELAY_PUBLISH_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { var: "CHATRELAY_PUBLISH_TIMEOUT_SECS", .. }
        ));
        assert_eq!(config.hub.publish_timeout_secs, 10);
    }
}
