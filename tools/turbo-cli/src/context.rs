//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use turbo_auth::{Actor, CredentialProvider, Credentials, MemoryCredentials};
use turbo_data::{AuthenticatedClient, FetchClient, RefreshTokenProvider};
use turbo_store::{CartEngine, HttpBackend, OrderEngine};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// The backend as the CLI talks to it.
pub type Backend = HttpBackend<AuthenticatedClient<Arc<FetchClient>, dyn CredentialProvider>>;

/// Cart and order engines sharing one backend.
pub struct Engines {
    pub cart: Arc<CartEngine<Backend>>,
    pub orders: OrderEngine<Backend>,
}

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, environment overrides applied.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            None => match Self::find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        config.apply_env();

        if let Some(ref path) = config_path {
            tracing::debug!(path = %path.display(), "configuration loaded");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config_path, config));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// The configured actor. Required for commands that are checked against
    /// the user's role.
    pub fn actor(&self) -> Result<Actor> {
        match self.config.session.actor() {
            Some(actor) => Ok(actor),
            None => bail!("session.user_id is not set. Add it to turbo.toml under [session]."),
        }
    }

    /// Build the engines against the configured backend.
    ///
    /// With a refresh token the session renews itself on 401; without one a
    /// rejected access token ends the session.
    pub fn engines(&self) -> Result<Engines> {
        let api = &self.config.api;
        let raw = Arc::new(FetchClient::from_config(api).context("Invalid [api] configuration")?);

        let session = &self.config.session;
        let store = Arc::new(match (&session.access_token, &session.refresh_token) {
            (Some(access), Some(refresh)) => {
                MemoryCredentials::new(Credentials::new(access.as_str(), refresh.as_str()))
            }
            (Some(access), None) => MemoryCredentials::new(Credentials::access_only(access.as_str())),
            (None, _) => MemoryCredentials::logged_out(),
        });

        let credentials: Arc<dyn CredentialProvider> = if session.refresh_token.is_some() {
            Arc::new(RefreshTokenProvider::new(
                raw.clone(),
                store,
                api.refresh_path.clone(),
            ))
        } else {
            store
        };

        self.output.debug(&format!("Using backend {}", api.base_url));
        let backend = Arc::new(HttpBackend::new(AuthenticatedClient::new(raw, credentials)));
        let feedback = Arc::new(self.output.clone());
        let cart = Arc::new(CartEngine::new(backend.clone()).with_feedback(feedback.clone()));
        let orders = OrderEngine::new(backend, cart.clone()).with_feedback(feedback);

        Ok(Engines { cart, orders })
    }
}
