/// Connection settings, resolved once from global flags and their environment fallbacks.
use std::time::Duration;

use thiserror::Error;

use crate::cli::Cli;

/// How the RPaaS API is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Straight to the RPaaS API, optionally with basic auth.
    Direct {
        url: String,
        user: Option<String>,
        password: Option<String>,
    },
    /// Through the Tsuru service proxy, authenticated with a Tsuru token.
    Tsuru { target: String, token: String },
}

/// Explicit configuration handed to every command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: Endpoint,
    /// Connect timeout, and overall timeout of non-streaming requests.
    pub timeout: Duration,
}

/// The global flags do not describe a usable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "no RPaaS API configured: set --rpaas-url (RPAAS_URL) or --tsuru-target (TSURU_TARGET)"
    )]
    NoEndpoint,

    #[error("a Tsuru token is required with --tsuru-target (use --tsuru-token or TSURU_TOKEN)")]
    MissingToken,
}

impl AppConfig {
    /// Resolve the endpoint. A direct RPaaS URL wins over a Tsuru target.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when neither mode is configured, or when a Tsuru
    /// target is given without a token.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let endpoint = match (
            non_empty(cli.rpaas_url.as_deref()),
            non_empty(cli.tsuru_target.as_deref()),
        ) {
            (Some(url), _) => Endpoint::Direct {
                url,
                user: non_empty(cli.rpaas_user.as_deref()),
                password: cli.rpaas_password.clone(),
            },
            (None, Some(target)) => Endpoint::Tsuru {
                target,
                token: non_empty(cli.tsuru_token.as_deref()).ok_or(ConfigError::MissingToken)?,
            },
            (None, None) => return Err(ConfigError::NoEndpoint),
        };

        Ok(Self {
            endpoint,
            timeout: cli.timeout.into(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
